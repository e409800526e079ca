//! Template discovery and formatting of files on disk.

mod discovery;
mod processing;

pub use discovery::*;
pub use processing::*;
