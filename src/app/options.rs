use std::borrow::Cow;

/// How a field's pattern constraint is matched against its value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatternMatch {
    /// The pattern may match anywhere in the value.
    #[default]
    Partial,
    /// The pattern must match the whole value.
    Full,
}

#[derive(Debug, Clone)]
pub struct FormOptions {
    pub pattern_match: PatternMatch,
    /// Answer used for discard confirmation when the host installs no hooks.
    pub discard_fallback: bool,
    /// Prefix for subforms declared without a title, followed by their 1-based position.
    pub untitled_prefix: Cow<'static, str>,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            pattern_match: PatternMatch::Partial,
            discard_fallback: false,
            untitled_prefix: Cow::Borrowed("Form"),
        }
    }
}

impl FormOptions {
    pub fn with_pattern_match(mut self, mode: PatternMatch) -> Self {
        self.pattern_match = mode;
        self
    }

    pub fn with_discard_fallback(mut self, discard: bool) -> Self {
        self.discard_fallback = discard;
        self
    }

    pub fn with_untitled_prefix(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
        self.untitled_prefix = prefix.into();
        self
    }
}
