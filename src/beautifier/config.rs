//! Configuration types for the expression beautifier.

use serde::{Deserialize, Serialize};

/// Which tool formats directive expressions, and how long it may take.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct BeautifierConfig {
    /// Tool ID, either built-in or defined under `[tools]` (default: "js-beautify")
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Timeout per expression in milliseconds, 0 disables it (default: 30000)
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_tool() -> String {
    "js-beautify".to_string()
}

fn default_timeout() -> u64 {
    30_000
}

impl Default for BeautifierConfig {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            timeout: default_timeout(),
        }
    }
}

/// Definition of an external tool.
///
/// The tool receives one expression and must print the formatted expression.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ToolDefinition {
    /// Command to run (first element is the binary, rest are arguments)
    pub command: Vec<String>,

    /// Whether the tool reads the expression from stdin (default: true).
    /// When false, the expression is passed as the last argument.
    #[serde(default = "default_true")]
    pub stdin: bool,

    /// Whether the tool writes the result to stdout (default: true)
    #[serde(default = "default_true")]
    pub stdout: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ToolDefinition {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            stdin: true,
            stdout: true,
        }
    }
}

impl ToolDefinition {
    pub fn new<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Binary name, if the command is not empty.
    pub fn program(&self) -> Option<&str> {
        self.command.first().map(String::as_str)
    }
}
