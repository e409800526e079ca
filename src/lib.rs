pub mod beautifier;
pub mod config;
pub mod directive;
pub mod exit_codes;
pub mod file_processor;
pub mod formatter;

pub use crate::beautifier::{Beautifier, BeautifyError, ExternalBeautifier};
pub use crate::directive::{DirectiveMatch, find_directives};
pub use crate::formatter::{FormatError, format_alpine};
