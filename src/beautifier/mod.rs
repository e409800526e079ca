//! The expression beautifier.
//!
//! Formatting rules are not implemented here. A [`Beautifier`] takes one script
//! expression and returns it formatted, single- or multi-line. The command-line
//! tool uses an [`ExternalBeautifier`], which pipes each expression through a
//! configured program:
//!
//! ```toml
//! [beautifier]
//! tool = "js-beautify"   # built-in: js-beautify, prettier
//! timeout = 30000        # ms per expression, 0 disables
//!
//! [tools.my-formatter]
//! command = ["my-formatter", "--stdin"]
//! stdin = true
//! stdout = true
//! ```

pub mod config;
pub mod executor;
pub mod registry;

pub use config::{BeautifierConfig, ToolDefinition};
pub use executor::{BeautifyError, ToolExecutor, ToolOutput};
pub use registry::ToolRegistry;

use std::collections::HashMap;

/// Formats a single script expression.
///
/// Implementations must be deterministic: the same input always produces the
/// same output.
pub trait Beautifier: Send + Sync {
    fn beautify(&self, code: &str) -> Result<String, BeautifyError>;
}

impl<F> Beautifier for F
where
    F: Fn(&str) -> Result<String, BeautifyError> + Send + Sync,
{
    fn beautify(&self, code: &str) -> Result<String, BeautifyError> {
        self(code)
    }
}

/// Beautifier backed by an external program.
pub struct ExternalBeautifier {
    executor: ToolExecutor,
    tool_id: String,
    tool: ToolDefinition,
}

impl ExternalBeautifier {
    pub fn new(tool_id: impl Into<String>, tool: ToolDefinition, timeout_ms: u64) -> Self {
        Self {
            executor: ToolExecutor::new(timeout_ms),
            tool_id: tool_id.into(),
            tool,
        }
    }

    /// Resolve the configured tool against the built-in and user-defined tools.
    pub fn from_config(
        config: &BeautifierConfig,
        user_tools: &HashMap<String, ToolDefinition>,
    ) -> Result<Self, BeautifyError> {
        let registry = ToolRegistry::new(user_tools.clone());
        let tool = registry.get(&config.tool).ok_or_else(|| BeautifyError::UnknownTool {
            tool: config.tool.clone(),
            available: registry.list_tools().join(", "),
        })?;

        log::debug!(
            "[alpinefmt-beautifier] Using '{}': {}",
            config.tool,
            tool.command.join(" ")
        );

        Ok(Self::new(config.tool.clone(), tool.clone(), config.timeout))
    }

    pub fn tool_id(&self) -> &str {
        &self.tool_id
    }

    /// Fail early, before any file is touched, when the program is missing.
    pub fn ensure_available(&self) -> Result<(), BeautifyError> {
        match self.tool.program() {
            Some(program) if self.executor.is_tool_available(program) => Ok(()),
            Some(program) => Err(BeautifyError::ToolNotFound {
                tool: program.to_string(),
            }),
            None => Err(BeautifyError::ExecutionFailed {
                tool: self.tool_id.clone(),
                message: "Empty command".to_string(),
            }),
        }
    }
}

impl Beautifier for ExternalBeautifier {
    fn beautify(&self, code: &str) -> Result<String, BeautifyError> {
        let output = self.executor.format(&self.tool, code, None)?;
        // Command-line formatters end their output with a newline, the expression doesn't.
        Ok(output.trim_end_matches(['\n', '\r']).to_string())
    }
}
