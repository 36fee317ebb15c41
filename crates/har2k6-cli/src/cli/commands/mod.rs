//! CLI command handlers, one per file.

mod completions;
mod convert;

pub use completions::run_completions;
pub use convert::{flag_override, run_convert, ConvertOverrides};
