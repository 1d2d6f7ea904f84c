mod options;
mod status;

pub use options::{FormOptions, PatternMatch};
pub use status::StatusLine;
