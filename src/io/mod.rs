mod format;
mod input;
mod output;

pub use format::DocumentFormat;
pub use input::{
    load_layout, parse_document_any, parse_document_str, parse_snapshot, snapshot_from_value,
};
pub use output::{OutputDestination, OutputOptions, emit_snapshot, render_snapshot};
