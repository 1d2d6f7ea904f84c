use indexmap::IndexMap;
use tracing::debug;

use super::{
    extract::{self, SectionData},
    section::SectionState,
};

/// Per-section data keyed by section name; `None` marks a section without data.
pub type SectionsData = IndexMap<String, Option<SectionData>>;

/// A named section that shows itself when a broadcast carries its name.
#[derive(Debug, Clone)]
pub struct SectionContainer {
    section: SectionState,
    visible: bool,
}

impl SectionContainer {
    pub fn new(section: SectionState) -> Self {
        Self {
            section,
            visible: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.section.name
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn section(&self) -> &SectionState {
        &self.section
    }

    pub fn section_mut(&mut self) -> &mut SectionState {
        &mut self.section
    }

    pub fn show_hide(&mut self, name: &str, active: bool) {
        if name == self.section.name {
            self.visible = active;
        }
    }

    /// Show and populate when `data` holds values for this section, otherwise hide.
    pub fn load(&mut self, data: &SectionsData) {
        match data.get(self.name()) {
            Some(Some(values)) if extract::has_any_value(values) => {
                extract::populate(&mut self.section, values);
                self.visible = true;
            }
            _ => self.visible = false,
        }
    }

    /// The section's values, or `None` when no field holds data.
    pub fn values(&self) -> Option<SectionData> {
        let values = extract::extract(&self.section);
        extract::has_any_value(&values).then_some(values)
    }

    pub fn clear(&mut self) {
        self.visible = false;
    }
}

/// Delivers `(name, active)` to every registered container.
#[derive(Debug, Clone, Default)]
pub struct VisibilityBroadcaster {
    containers: Vec<SectionContainer>,
}

impl VisibilityBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, container: SectionContainer) {
        self.containers.push(container);
    }

    pub fn broadcast(&mut self, name: &str, active: bool) {
        debug!(section = name, active, "section visibility broadcast");
        for container in &mut self.containers {
            container.show_hide(name, active);
        }
    }

    pub fn load(&mut self, data: &SectionsData) {
        for container in &mut self.containers {
            container.load(data);
        }
    }

    pub fn values(&self) -> SectionsData {
        self.containers
            .iter()
            .map(|container| (container.name().to_string(), container.values()))
            .collect()
    }

    pub fn clear(&mut self) {
        for container in &mut self.containers {
            container.clear();
        }
    }

    pub fn container(&self, name: &str) -> Option<&SectionContainer> {
        self.containers.iter().find(|container| container.name() == name)
    }

    pub fn container_mut(&mut self, name: &str) -> Option<&mut SectionContainer> {
        self.containers
            .iter_mut()
            .find(|container| container.name() == name)
    }
}

/// The activation control paired with a section by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionToggle {
    name: String,
    active: bool,
}

impl SectionToggle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Flip the flag and tell every container about it.
    pub fn activate(&mut self, broadcaster: &mut VisibilityBroadcaster) {
        self.active = !self.active;
        broadcaster.broadcast(&self.name, self.active);
    }

    /// Sync the flag from loaded data without broadcasting.
    pub fn load(&mut self, data: &SectionsData) {
        self.active = matches!(
            data.get(&self.name),
            Some(Some(values)) if extract::has_any_value(values)
        );
    }

    pub fn clear(&mut self) {
        self.active = false;
    }
}
