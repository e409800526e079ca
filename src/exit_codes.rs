/// Exit codes for alpinefmt
///
/// These exit codes allow users and CI/CD systems to distinguish between
/// files needing formatting and actual failures.
/// Success - Nothing to change, or all files were formatted
pub const SUCCESS: i32 = 0;

/// Changes needed - `--check` found files that would be reformatted
pub const CHANGES_NEEDED: i32 = 1;

/// Tool error - Configuration error, file access error, or beautifier failure
pub const TOOL_ERROR: i32 = 2;

/// Helper functions for consistent exit behavior
pub mod exit {
    use super::{CHANGES_NEEDED, SUCCESS, TOOL_ERROR};

    /// Exit with success code (0)
    pub fn success() -> ! {
        std::process::exit(SUCCESS);
    }

    /// Exit with changes needed code (1)
    pub fn changes_needed() -> ! {
        std::process::exit(CHANGES_NEEDED);
    }

    /// Exit with tool error code (2)
    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}
