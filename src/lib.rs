#![deny(rust_2018_idioms)]

mod app;
mod domain;
mod form;
mod io;
mod runtime;


pub use app::{FormOptions, PatternMatch, StatusLine};
pub use domain::{
    FieldDescriptor, FieldKind, FormLayout, LayoutError, RESERVED_FIELDS, SectionLayout,
    SubformLayout, parse_form_layout,
};
pub use form::{
    BadgeState, ConfigurationError, ConstraintKind, DefaultIdentityGenerator, DirtyState,
    FieldConstraint, FieldEdit, FieldRules, FieldState, FieldValue, FormError,
    FormHooks, FormSnapshot, FormState, IdentityGenerator, IdentityRequest, IdentityResolution,
    IdentitySequencer, NavEntry, SectionContainer, SectionData, SectionKind,
    SectionNavigationIndex, SectionState, SectionToggle, SectionsData, Transition,
    ValidationResult, VisibilityBroadcaster, extract, validate,
};
pub use io::{
    DocumentFormat, OutputDestination, OutputOptions, emit_snapshot, load_layout,
    parse_document_any, parse_document_str, parse_snapshot, render_snapshot,
    snapshot_from_value,
};
pub use runtime::ProductForm;

pub mod prelude {
    pub use super::{FormOptions, FormSnapshot, FormState, ProductForm, Transition};
}
