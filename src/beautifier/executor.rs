//! Runs an external beautifier over a single expression.
//!
//! The expression goes in via stdin (or as the last argument), the result
//! comes back on stdout. Tool availability is checked lazily against `PATH`
//! and cached.

use super::config::ToolDefinition;
use std::collections::HashMap;
use std::env;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

/// Result of executing a tool.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, -1 when the process was terminated by a signal.
    pub exit_code: i32,
    pub success: bool,
}

/// Error while beautifying an expression.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BeautifyError {
    #[error("Tool '{tool}' not found in PATH")]
    ToolNotFound { tool: String },

    #[error("Unknown beautifier '{tool}' (available: {available})")]
    UnknownTool { tool: String, available: String },

    #[error("Tool '{tool}' failed: {message}")]
    ExecutionFailed { tool: String, message: String },

    #[error("Tool '{tool}' timed out after {timeout_ms}ms")]
    Timeout { tool: String, timeout_ms: u64 },

    #[error("I/O error: {message}")]
    Io { message: String },

    /// Raised by in-process beautifiers that reject their input.
    #[error("{0}")]
    Rejected(String),
}

/// Executor for running external tools.
pub struct ToolExecutor {
    /// Tool name -> available
    tool_cache: Arc<Mutex<HashMap<String, bool>>>,
    default_timeout_ms: u64,
}

impl ToolExecutor {
    pub fn new(default_timeout_ms: u64) -> Self {
        Self {
            tool_cache: Arc::new(Mutex::new(HashMap::new())),
            default_timeout_ms,
        }
    }

    /// Check if a tool is available (lazy, cached).
    pub fn is_tool_available(&self, tool_name: &str) -> bool {
        if let Some(&available) = self
            .tool_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tool_name)
        {
            return available;
        }

        let available = check_tool_exists(tool_name);
        log::debug!("[alpinefmt-beautifier] Tool '{tool_name}' available: {available}");

        self.tool_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(tool_name.to_string(), available);

        available
    }

    /// Run `tool_def` with `input`, waiting at most `timeout_ms` (or the default).
    pub fn execute(
        &self,
        tool_def: &ToolDefinition,
        input: &str,
        timeout_ms: Option<u64>,
    ) -> Result<ToolOutput, BeautifyError> {
        let Some(tool_name) = tool_def.program() else {
            return Err(BeautifyError::ExecutionFailed {
                tool: "unknown".to_string(),
                message: "Empty command".to_string(),
            });
        };

        if !self.is_tool_available(tool_name) {
            return Err(BeautifyError::ToolNotFound {
                tool: tool_name.to_string(),
            });
        }

        let mut cmd = Command::new(tool_name);
        cmd.args(&tool_def.command[1..]);

        if tool_def.stdin {
            cmd.stdin(Stdio::piped());
        } else {
            cmd.arg(input);
            cmd.stdin(Stdio::null());
        }
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| BeautifyError::Io {
            message: format!("Failed to spawn '{tool_name}': {e}"),
        })?;

        let mut stdout_handle = child
            .stdout
            .take()
            .map(|stdout| thread::spawn(move || read_pipe_to_string(stdout)));
        let mut stderr_handle = child
            .stderr
            .take()
            .map(|stderr| thread::spawn(move || read_pipe_to_string(stderr)));

        // Dropping stdin at the end of this block closes the pipe
        if tool_def.stdin
            && let Some(mut stdin) = child.stdin.take()
            && let Err(e) = stdin.write_all(input.as_bytes())
        {
            // A tool that stops reading early still reports through its exit status
            if e.kind() != ErrorKind::BrokenPipe {
                drop(stdin);
                abandon(&mut child, [stdout_handle.take(), stderr_handle.take()]);
                return Err(BeautifyError::Io {
                    message: format!("Failed to write to stdin: {e}"),
                });
            }
            log::debug!("[alpinefmt-beautifier] '{tool_name}' closed stdin early");
        }

        let timeout = Duration::from_millis(timeout_ms.unwrap_or(self.default_timeout_ms));
        let status = if timeout.is_zero() {
            child.wait().map_err(|e| BeautifyError::Io {
                message: format!("Failed to wait for '{tool_name}': {e}"),
            })?
        } else {
            let start = Instant::now();
            loop {
                if let Some(status) = child.try_wait().map_err(|e| BeautifyError::Io {
                    message: format!("Failed to poll '{tool_name}': {e}"),
                })? {
                    break status;
                }
                if start.elapsed() >= timeout {
                    abandon(&mut child, [stdout_handle.take(), stderr_handle.take()]);
                    return Err(BeautifyError::Timeout {
                        tool: tool_name.to_string(),
                        timeout_ms: timeout.as_millis() as u64,
                    });
                }
                thread::sleep(Duration::from_millis(5));
            }
        };

        let stdout = join_reader(stdout_handle.take()).map_err(|message| BeautifyError::Io { message })?;
        let stderr = join_reader(stderr_handle.take()).map_err(|message| BeautifyError::Io { message })?;

        Ok(ToolOutput {
            stdout,
            stderr,
            exit_code: status.code().unwrap_or(-1),
            success: status.success(),
        })
    }

    /// Run a formatter and return its stdout.
    ///
    /// A non-zero exit means the tool rejected the input.
    pub fn format(
        &self,
        tool_def: &ToolDefinition,
        input: &str,
        timeout_ms: Option<u64>,
    ) -> Result<String, BeautifyError> {
        let output = self.execute(tool_def, input, timeout_ms)?;
        let tool = tool_def.program().unwrap_or_default().to_string();

        if !output.success {
            let exit_code = output.exit_code;
            let stderr = output.stderr.trim();
            return Err(BeautifyError::ExecutionFailed {
                tool,
                message: format!("Exit code {exit_code}: {stderr}"),
            });
        }

        if !tool_def.stdout {
            return Err(BeautifyError::ExecutionFailed {
                tool,
                message: "Formatter doesn't output to stdout".to_string(),
            });
        }

        Ok(output.stdout)
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::new(30_000)
    }
}

/// Check if a tool binary exists, either as a path or somewhere on `PATH`.
fn check_tool_exists(tool_name: &str) -> bool {
    let candidate = Path::new(tool_name);
    if candidate.components().count() > 1 {
        return candidate.is_file();
    }

    let Some(paths) = env::var_os("PATH") else {
        return false;
    };

    env::split_paths(&paths).any(|dir| {
        let path = dir.join(tool_name);
        if path.is_file() {
            return true;
        }
        cfg!(windows)
            && ["exe", "cmd", "bat"]
                .iter()
                .any(|ext| path.with_extension(ext).is_file())
    })
}

/// Kill `child`, reap it and wait for its output readers to finish.
fn abandon(child: &mut Child, readers: [Option<thread::JoinHandle<std::io::Result<String>>>; 2]) {
    let _ = child.kill();
    let _ = child.wait();
    for reader in readers {
        let _ = join_reader(reader);
    }
}

fn read_pipe_to_string<R: Read>(mut pipe: R) -> std::io::Result<String> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).to_string())
}

fn join_reader(handle: Option<thread::JoinHandle<std::io::Result<String>>>) -> Result<String, String> {
    match handle {
        Some(handle) => match handle.join() {
            Ok(res) => res.map_err(|e| format!("Failed to read output: {e}")),
            Err(_) => Err("Output reader thread panicked".to_string()),
        },
        None => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executor_creation() {
        let executor = ToolExecutor::new(10_000);
        assert_eq!(executor.default_timeout_ms, 10_000);
    }

    #[test]
    fn test_tool_not_found() {
        let executor = ToolExecutor::default();
        let tool_def = ToolDefinition::new(["nonexistent-tool-xyz123"]);

        let result = executor.execute(&tool_def, "a", None);
        assert!(matches!(result, Err(BeautifyError::ToolNotFound { .. })));
    }

    #[test]
    fn test_empty_command() {
        let executor = ToolExecutor::default();
        let result = executor.execute(&ToolDefinition::default(), "a", None);
        assert!(matches!(result, Err(BeautifyError::ExecutionFailed { .. })));
    }

    #[test]
    fn test_availability_is_cached() {
        let executor = ToolExecutor::default();
        assert!(!executor.is_tool_available("nonexistent-tool-xyz123"));
        let cache = executor.tool_cache.lock().unwrap();
        assert_eq!(cache.get("nonexistent-tool-xyz123"), Some(&false));
    }

    #[test]
    #[cfg(unix)]
    fn test_format_with_cat() {
        let executor = ToolExecutor::default();
        let tool_def = ToolDefinition::new(["cat"]);

        let output = executor.format(&tool_def, "open = !open", None).expect("cat should succeed");
        assert_eq!(output, "open = !open");
    }

    #[test]
    #[cfg(unix)]
    fn test_expression_as_argument() {
        let executor = ToolExecutor::default();
        let tool_def = ToolDefinition {
            command: vec!["echo".to_string()],
            stdin: false,
            stdout: true,
        };

        let output = executor.format(&tool_def, "count++", None).expect("echo should succeed");
        assert_eq!(output, "count++\n");
    }

    #[test]
    #[cfg(unix)]
    fn test_non_zero_exit_is_failure() {
        let executor = ToolExecutor::default();
        let tool_def = ToolDefinition::new(["sh", "-c", "cat > /dev/null; echo 'Unexpected token' >&2; exit 3"]);

        match executor.format(&tool_def, "{ a: ", None) {
            Err(BeautifyError::ExecutionFailed { tool, message }) => {
                assert_eq!(tool, "sh");
                assert_eq!(message, "Exit code 3: Unexpected token");
            }
            other => panic!("expected ExecutionFailed, got {other:?}"),
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_tool_closing_stdin_early_reports_exit_status() {
        let executor = ToolExecutor::default();
        let tool_def = ToolDefinition::new(["sh", "-c", "exec 0<&-; echo 'Unexpected token' >&2; exit 3"]);
        // Larger than a pipe buffer, so the write cannot finish before stdin is closed
        let input = "a = 1;\n".repeat(200_000);

        match executor.format(&tool_def, &input, None) {
            Err(BeautifyError::ExecutionFailed { message, .. }) => {
                assert_eq!(message, "Exit code 3: Unexpected token");
            }
            other => panic!("expected ExecutionFailed, got {other:?}"),
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_timeout() {
        let executor = ToolExecutor::new(5);
        let tool_def = ToolDefinition {
            command: vec!["sleep".to_string(), "1".to_string()],
            stdin: false,
            stdout: true,
        };

        let result = executor.execute(&tool_def, "1", Some(5));
        assert!(matches!(result, Err(BeautifyError::Timeout { .. })));
    }
}
