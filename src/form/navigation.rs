use super::error::FormError;

/// Visual state of a subform's navigation button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BadgeState {
    /// No data entered.
    #[default]
    Neutral,
    /// Has data that fails validation.
    Attention,
    /// Has valid data.
    Populated,
}

impl BadgeState {
    pub fn from_flags(has_data: bool, is_valid: bool) -> Self {
        match (has_data, is_valid) {
            (false, _) => BadgeState::Neutral,
            (true, false) => BadgeState::Attention,
            (true, true) => BadgeState::Populated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub title: String,
    pub tags: Vec<String>,
    pub has_data: bool,
    pub is_valid: bool,
    search_title: String,
    search_tags: Vec<String>,
}

impl NavEntry {
    fn new(title: String, tags: Vec<String>) -> Self {
        let search_title = title.to_lowercase();
        let search_tags = tags.iter().map(|tag| tag.to_lowercase()).collect();
        Self {
            title,
            tags,
            has_data: false,
            is_valid: true,
            search_title,
            search_tags,
        }
    }

    pub fn badge(&self) -> BadgeState {
        BadgeState::from_flags(self.has_data, self.is_valid)
    }

    /// `needle` is expected to be lowercase already.
    fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.search_title.contains(needle)
            || self.search_tags.iter().any(|tag| tag.contains(needle))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SectionNavigationIndex {
    entries: Vec<NavEntry>,
    active_index: Option<usize>,
    search: String,
}

impl SectionNavigationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; indices must arrive in registration order.
    pub fn register(
        &mut self,
        subform_index: usize,
        title: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<(), FormError> {
        if subform_index != self.entries.len() {
            return Err(FormError::NavigationOrder {
                expected: self.entries.len(),
                got: subform_index,
            });
        }
        self.entries.push(NavEntry::new(title.into(), tags));
        Ok(())
    }

    pub fn update_badge(
        &mut self,
        subform_index: usize,
        has_data: bool,
        is_valid: bool,
    ) -> Result<BadgeState, FormError> {
        let entry = self
            .entries
            .get_mut(subform_index)
            .ok_or(FormError::UnknownSubform(subform_index))?;
        entry.has_data = has_data;
        entry.is_valid = is_valid;
        Ok(entry.badge())
    }

    pub fn reset_badges(&mut self) {
        for entry in &mut self.entries {
            entry.has_data = false;
            entry.is_valid = true;
        }
    }

    /// Indices whose title or tags contain `search_term`, ignoring case.
    pub fn filter(&self, search_term: &str) -> Vec<usize> {
        let needle = search_term.to_lowercase();
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.matches(&needle))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Entries passing the current search term.
    pub fn visible_entries(&self) -> impl Iterator<Item = (usize, &NavEntry)> {
        let visible = self.filter(&self.search);
        visible
            .into_iter()
            .filter_map(|index| self.entries.get(index).map(|entry| (index, entry)))
    }

    /// Show exactly one subform. The search term has no say in which one.
    pub fn activate(&mut self, subform_index: usize) -> Result<(), FormError> {
        if subform_index >= self.entries.len() {
            return Err(FormError::UnknownSubform(subform_index));
        }
        self.active_index = Some(subform_index);
        Ok(())
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn is_displayed(&self, subform_index: usize) -> bool {
        self.active_index == Some(subform_index)
    }

    pub fn entry(&self, subform_index: usize) -> Option<&NavEntry> {
        self.entries.get(subform_index)
    }

    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
