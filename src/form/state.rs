use std::fmt;

use tracing::{debug, warn};

use crate::{
    app::{FormOptions, StatusLine},
    domain::{FieldKind, FormLayout, check_layout},
};

use super::{
    error::FormError,
    extract::{self, SectionData},
    field::{FieldState, FieldValue},
    hooks::FormHooks,
    identity::{IdentityRequest, IdentityResolution, IdentitySequencer},
    navigation::{BadgeState, SectionNavigationIndex},
    section::{SectionKind, SectionState},
    snapshot::FormSnapshot,
    validator::ValidationResult,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DirtyState {
    #[default]
    Clean,
    Dirty,
}

/// Outcome of an operation that may need to discard unsaved changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// The host declined to discard; nothing changed.
    Declined,
}

/// What a single field event produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub validation: ValidationResult,
    /// Badge of the owning subform after the edit; `None` for the primary section.
    pub badge: Option<BadgeState>,
    /// Set when the edit touched the identity source; the host resolves it
    /// and hands the result to [`FormState::resolve_identity`].
    pub identity_request: Option<IdentityRequest>,
}

pub struct FormState {
    /// Primary section first, then subforms in registration order.
    sections: Vec<SectionState>,
    navigation: SectionNavigationIndex,
    dirty: DirtyState,
    identity: String,
    version: String,
    identity_source: Option<String>,
    sequencer: IdentitySequencer,
    /// `None` until the host installs hooks; saves are then not accepted.
    hooks: Option<Box<dyn FormHooks>>,
    discard_fallback: bool,
    status: StatusLine,
}

impl fmt::Debug for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormState")
            .field("sections", &self.sections)
            .field("navigation", &self.navigation)
            .field("dirty", &self.dirty)
            .field("identity", &self.identity)
            .field("version", &self.version)
            .field("hooks_installed", &self.hooks.is_some())
            .finish_non_exhaustive()
    }
}

impl FormState {
    pub fn from_layout(layout: &FormLayout, options: &FormOptions) -> Result<Self, FormError> {
        check_layout(layout)?;

        let mut sections = Vec::with_capacity(layout.subforms.len() + 1);
        sections.push(SectionState::primary(&layout.primary, options));
        let mut navigation = SectionNavigationIndex::new();
        for (index, subform) in layout.subforms.iter().enumerate() {
            let section = SectionState::subform(subform, index, options);
            if let SectionKind::Subform { title, tags } = &section.kind {
                navigation.register(index, title.clone(), tags.clone())?;
            }
            sections.push(section);
        }
        if !navigation.is_empty() {
            navigation.activate(0)?;
        }

        let identity_source = layout
            .primary
            .fields
            .iter()
            .find(|field| field.identity_source)
            .map(|field| field.name.clone());

        debug!(
            sections = sections.len(),
            identity_source = identity_source.as_deref().unwrap_or("<none>"),
            "form initialised"
        );

        Ok(Self {
            sections,
            navigation,
            dirty: DirtyState::Clean,
            identity: String::new(),
            version: String::new(),
            identity_source,
            sequencer: IdentitySequencer::default(),
            hooks: None,
            discard_fallback: options.discard_fallback,
            status: StatusLine::new(),
        })
    }

    pub fn with_hooks(mut self, hooks: Box<dyn FormHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn set_hooks(&mut self, hooks: Box<dyn FormHooks>) {
        self.hooks = Some(hooks);
    }

    pub fn dirty_state(&self) -> DirtyState {
        self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty == DirtyState::Dirty
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn set_identity(&mut self, identity: impl Into<String>) {
        self.identity = identity.into();
    }

    /// The version, when its stored text parses as an integer.
    pub fn version(&self) -> Option<i64> {
        let trimmed = self.version.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse().ok()
    }

    pub fn set_version(&mut self, version: Option<i64>) {
        self.version = version.map(|value| value.to_string()).unwrap_or_default();
    }

    pub fn set_version_text(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    pub fn sections(&self) -> &[SectionState] {
        &self.sections
    }

    pub fn primary(&self) -> &SectionState {
        &self.sections[0]
    }

    pub fn subforms(&self) -> &[SectionState] {
        &self.sections[1..]
    }

    pub fn section(&self, name: &str) -> Option<&SectionState> {
        self.sections.iter().find(|section| section.name == name)
    }

    pub fn navigation(&self) -> &SectionNavigationIndex {
        &self.navigation
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.sections.iter().find_map(|section| section.field(name))
    }

    pub fn show_subform(&mut self, subform_index: usize) -> Result<(), FormError> {
        self.navigation.activate(subform_index)
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.navigation.set_search(term);
    }

    /// Assign `value` to the named field and process the edit.
    pub fn set_field(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<FieldEdit, FormError> {
        let (section_index, field_index) = self.locate(name)?;
        let value = value.into();
        self.sections[section_index].fields[field_index].assign(&value);
        self.status.editing(name);
        self.field_event(section_index, field_index, true)
    }

    /// Like [`FormState::set_field`], converting raw text for the field's kind first.
    pub fn set_field_input(&mut self, name: &str, raw: &str) -> Result<FieldEdit, FormError> {
        let kind: FieldKind = self
            .field(name)
            .map(|field| field.kind().clone())
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        self.set_field(name, FieldValue::from_input(&kind, raw))
    }

    /// A field-level event without a value change, such as leaving the field.
    pub fn touch_field(&mut self, name: &str) -> Result<FieldEdit, FormError> {
        let (section_index, field_index) = self.locate(name)?;
        self.field_event(section_index, field_index, false)
    }

    /// Apply a finished identity request. Returns false when a newer request
    /// was issued since, or the form was cleared or loaded in between.
    pub fn resolve_identity(&mut self, resolution: IdentityResolution) -> bool {
        if !self.sequencer.accept(&resolution.request) {
            warn!(
                sequence = resolution.request.sequence,
                "discarding stale identity token"
            );
            return false;
        }
        debug!(sequence = resolution.request.sequence, "identity updated");
        self.identity = resolution.token;
        true
    }

    pub fn pending_identity(&self) -> Option<u64> {
        self.sequencer.pending()
    }

    /// Recompute one subform's badge from its current data.
    pub fn refresh_badge(&mut self, subform_index: usize) -> Result<BadgeState, FormError> {
        let section = self
            .sections
            .get(subform_index + 1)
            .ok_or(FormError::UnknownSubform(subform_index))?;
        let has_data = extract::has_any_value(&extract::extract(section));
        let is_valid = section.validate_silently();
        self.navigation.update_badge(subform_index, has_data, is_valid)
    }

    pub fn refresh_badges(&mut self) {
        for index in 0..self.navigation.len() {
            // indices come from the navigation itself
            let _ = self.refresh_badge(index);
        }
    }

    /// Validate every section, showing messages on failing fields.
    pub fn validate_all(&mut self) -> bool {
        let mut all_valid = true;
        for section in &mut self.sections {
            if !section.validate() {
                all_valid = false;
            }
        }
        all_valid
    }

    /// Visible validation messages per field, in form order.
    pub fn messages(&self) -> Vec<(String, Vec<String>)> {
        self.sections
            .iter()
            .flat_map(|section| section.fields.iter())
            .filter(|field| field.has_visible_messages())
            .map(|field| (field.name().to_string(), field.visible_messages()))
            .collect()
    }

    pub fn compute_snapshot(&self) -> FormSnapshot {
        let mut data = SectionData::new();
        for section in &self.sections {
            extract::extract_into(section, &mut data);
        }
        FormSnapshot {
            identity: self.identity.clone(),
            version: self.version(),
            validation: self.sections.iter().all(SectionState::validate_silently),
            data,
        }
    }

    /// Hand the current snapshot to the host's save hook and mark the form clean.
    ///
    /// Without installed hooks nobody takes the snapshot, so the form keeps
    /// its dirty state and later clears or loads still ask for confirmation.
    pub fn save(&mut self) -> FormSnapshot {
        let snapshot = self.compute_snapshot();
        self.hand_over(&snapshot);
        snapshot
    }

    /// Save, then clear without asking. Nothing is cleared when no hook took the save.
    pub fn save_and_clear(&mut self) -> FormSnapshot {
        let snapshot = self.compute_snapshot();
        if self.hand_over(&snapshot) {
            self.reset_all();
            self.notify_clear();
        }
        snapshot
    }

    pub fn clear(&mut self) -> Transition {
        if !self.confirm_discard() {
            return Transition::Declined;
        }
        self.reset_all();
        self.notify_clear();
        Transition::Applied
    }

    /// Replace identity and version and populate every section from `snapshot`.
    ///
    /// Fields absent from the snapshot keep their current value.
    pub fn load(&mut self, snapshot: &FormSnapshot) -> Transition {
        if !self.confirm_discard() {
            return Transition::Declined;
        }
        self.sequencer.invalidate();
        self.identity = snapshot.identity.clone();
        self.set_version(snapshot.version);
        for section in &mut self.sections {
            extract::populate(section, &snapshot.data);
        }
        self.refresh_badges();
        self.dirty = DirtyState::Clean;
        self.status.loaded(&self.identity);
        debug!(identity = %self.identity, "snapshot loaded");
        Transition::Applied
    }

    fn locate(&self, name: &str) -> Result<(usize, usize), FormError> {
        self.sections
            .iter()
            .enumerate()
            .find_map(|(section_index, section)| {
                section
                    .fields
                    .iter()
                    .position(|field| field.name() == name)
                    .map(|field_index| (section_index, field_index))
            })
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    fn field_event(
        &mut self,
        section_index: usize,
        field_index: usize,
        value_changed: bool,
    ) -> Result<FieldEdit, FormError> {
        let field = &mut self.sections[section_index].fields[field_index];
        let validation = field.validate();
        let seed = (value_changed && self.identity_source.as_deref() == Some(field.name()))
            .then(|| field.value.as_str().unwrap_or_default().to_string())
            .filter(|seed| !seed.is_empty());

        if self.dirty == DirtyState::Clean {
            debug!("form marked dirty");
        }
        self.dirty = DirtyState::Dirty;

        let badge = if section_index > 0 {
            Some(self.refresh_badge(section_index - 1)?)
        } else {
            None
        };
        let identity_request = seed.map(|seed| self.sequencer.issue(seed));

        Ok(FieldEdit {
            validation,
            badge,
            identity_request,
        })
    }

    fn hand_over(&mut self, snapshot: &FormSnapshot) -> bool {
        let Some(hooks) = self.hooks.as_mut() else {
            warn!("no save hook installed; keeping unsaved changes");
            self.status.save_unhandled();
            return false;
        };
        hooks.on_save(snapshot);
        self.dirty = DirtyState::Clean;
        self.status.saved(snapshot.validation);
        debug!(identity = %snapshot.identity, valid = snapshot.validation, "form saved");
        true
    }

    fn notify_clear(&mut self) {
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.on_clear();
        }
    }

    fn confirm_discard(&mut self) -> bool {
        if self.dirty == DirtyState::Clean {
            return true;
        }
        let confirmed = match self.hooks.as_mut() {
            Some(hooks) => hooks.confirm_discard(),
            None => self.discard_fallback,
        };
        if confirmed {
            true
        } else {
            warn!("discard declined; keeping unsaved changes");
            self.status.discard_declined();
            false
        }
    }

    fn reset_all(&mut self) {
        for section in &mut self.sections {
            extract::clear(section);
        }
        self.sequencer.invalidate();
        self.identity.clear();
        self.version.clear();
        self.navigation.reset_badges();
        self.dirty = DirtyState::Clean;
        self.status.cleared();
        debug!("form cleared");
    }
}
