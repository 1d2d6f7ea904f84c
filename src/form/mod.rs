mod error;
pub mod extract;
mod field;
mod hooks;
mod identity;
mod navigation;
mod section;
mod snapshot;
mod state;
mod validator;
mod visibility;

pub use error::{ConfigurationError, FormError};
pub use extract::SectionData;
pub use field::{FieldState, FieldValue};
#[cfg(test)]
pub(crate) use hooks::MockFormHooks;
pub use hooks::FormHooks;
#[cfg(test)]
pub(crate) use identity::MockIdentityGenerator;
pub use identity::{
    DefaultIdentityGenerator, IdentityGenerator, IdentityRequest, IdentityResolution,
    IdentitySequencer,
};
pub use navigation::{BadgeState, NavEntry, SectionNavigationIndex};
pub use section::{SectionKind, SectionState};
pub use snapshot::FormSnapshot;
pub use state::{DirtyState, FieldEdit, FormState, Transition};
pub use validator::{
    ConstraintKind, FieldConstraint, FieldRules, ValidationResult, validate,
};
pub use visibility::{SectionContainer, SectionToggle, SectionsData, VisibilityBroadcaster};
