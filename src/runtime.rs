use anyhow::{Context, Result};
use serde_json::Value;

use crate::{
    app::FormOptions,
    domain::parse_form_layout,
    form::{FormHooks, FormSnapshot, FormState, Transition},
};

/// Builder that turns a layout document into a ready [`FormState`].
pub struct ProductForm {
    layout: Value,
    options: FormOptions,
    hooks: Option<Box<dyn FormHooks>>,
    snapshot: Option<FormSnapshot>,
}

impl std::fmt::Debug for ProductForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductForm")
            .field("layout", &self.layout)
            .field("options", &self.options)
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}

impl ProductForm {
    pub fn new(layout: Value) -> Self {
        Self {
            layout,
            options: FormOptions::default(),
            hooks: None,
            snapshot: None,
        }
    }

    pub fn with_options(mut self, options: FormOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_hooks(mut self, hooks: impl FormHooks + 'static) -> Self {
        self.hooks = Some(Box::new(hooks));
        self
    }

    /// Snapshot loaded into the freshly built form.
    pub fn with_snapshot(mut self, snapshot: FormSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn build(self) -> Result<FormState> {
        let ProductForm {
            layout,
            options,
            hooks,
            snapshot,
        } = self;

        let layout = parse_form_layout(&layout).context("failed to parse form layout")?;
        let mut state = FormState::from_layout(&layout, &options)?;
        if let Some(hooks) = hooks {
            state.set_hooks(hooks);
        }
        if let Some(snapshot) = snapshot {
            // a new form is clean, so loading cannot be declined
            let transition = state.load(&snapshot);
            debug_assert_eq!(transition, Transition::Applied);
        }
        Ok(state)
    }
}
