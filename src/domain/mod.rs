mod parser;
mod schema;

pub(crate) use parser::check_layout;
pub use parser::{LayoutError, parse_form_layout};
pub use schema::{
    FieldDescriptor, FieldKind, FormLayout, RESERVED_FIELDS, SectionLayout, SubformLayout,
    is_reserved,
};
