//! Command-line executor: builds deterministic org CLI invocations and
//! decodes their JSON output.

use std::collections::BTreeMap;
use std::process::Command;

use serde::Serialize;
use serde_json::Value;

use crate::core::defaults;
use crate::core::progress::{MessageSet, ProgressEventKind, ProgressSink};
use crate::utils::shell;

use super::ExecutorError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Num(i64),
    Str(String),
}

impl From<bool> for FlagValue {
    fn from(v: bool) -> Self {
        FlagValue::Bool(v)
    }
}

impl From<i64> for FlagValue {
    fn from(v: i64) -> Self {
        FlagValue::Num(v)
    }
}

impl From<&str> for FlagValue {
    fn from(v: &str) -> Self {
        FlagValue::Str(v.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(v: String) -> Self {
        FlagValue::Str(v)
    }
}

/// One org CLI invocation. Flags live in a BTreeMap so identical
/// descriptors always serialize to the identical command line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDescriptor {
    pub command: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub positional_args: Vec<String>,
    pub flags: BTreeMap<String, FlagValue>,
    pub messages: MessageSet,
}

impl CommandDescriptor {
    pub fn new(command: impl Into<String>, messages: MessageSet) -> Self {
        Self {
            command: command.into(),
            positional_args: Vec::new(),
            flags: BTreeMap::new(),
            messages,
        }
    }

    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.positional_args.push(value.into());
        self
    }

    pub fn flag(mut self, name: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        self.flags.insert(name.into(), value.into());
        self
    }

    /// Argument vector passed to the org CLI binary. Flag order is the
    /// BTreeMap's sorted key order; `Bool(false)` flags are omitted.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![self.command.clone()];
        args.extend(self.positional_args.iter().cloned());
        for (name, value) in &self.flags {
            match value {
                FlagValue::Bool(true) => args.push(format!("--{}", name)),
                FlagValue::Bool(false) => {}
                FlagValue::Num(n) => {
                    args.push(format!("--{}", name));
                    args.push(n.to_string());
                }
                FlagValue::Str(s) => {
                    args.push(format!("--{}", name));
                    args.push(s.clone());
                }
            }
        }
        args
    }

    /// Shell-quoted rendering of the invocation, for detail payloads.
    pub fn to_command_line(&self) -> String {
        shell::quote_args(&self.to_args())
    }
}

pub trait CommandExecutor {
    fn execute(
        &self,
        desc: &CommandDescriptor,
        progress: &dyn ProgressSink,
    ) -> std::result::Result<Value, ExecutorError>;
}

/// Production executor shelling out to the org CLI binary.
pub struct OrgCliExecutor {
    pub binary: String,
}

impl OrgCliExecutor {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for OrgCliExecutor {
    fn default() -> Self {
        Self::new(defaults::CLI_BINARY)
    }
}

impl CommandExecutor for OrgCliExecutor {
    fn execute(
        &self,
        desc: &CommandDescriptor,
        progress: &dyn ProgressSink,
    ) -> std::result::Result<Value, ExecutorError> {
        progress.notify(ProgressEventKind::Progress, &desc.messages.progress_msg);

        let output = Command::new(&self.binary)
            .args(desc.to_args())
            .output()
            .map_err(|e| {
                progress.notify(ProgressEventKind::Error, &desc.messages.error_msg);
                ExecutorError::spawn(format!("Failed to spawn {}: {}", self.binary, e))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            match serde_json::from_str::<Value>(&stdout) {
                Ok(value) => {
                    progress.notify(ProgressEventKind::Success, &desc.messages.success_msg);
                    Ok(value)
                }
                Err(e) => {
                    progress.notify(ProgressEventKind::Error, &desc.messages.error_msg);
                    Err(ExecutorError::unparseable(format!(
                        "stdout was not JSON: {}",
                        e
                    ))
                    .with_streams(stdout, stderr))
                }
            }
        } else {
            progress.notify(ProgressEventKind::Error, &desc.messages.error_msg);
            let exit_code = output.status.code().unwrap_or(-1);
            Err(decode_failure(exit_code, &stdout, &stderr))
        }
    }
}

/// Decode a structured error from the command's streams. The org CLI writes
/// `{"status":1,"name":...,"message":...}` to stdout under --json; older
/// builds write it to stderr. Anything else becomes a synthetic
/// unparseable error. Both streams are carried on the error either way.
fn decode_failure(exit_code: i32, stdout: &str, stderr: &str) -> ExecutorError {
    for stream in [stdout, stderr] {
        if let Ok(raw) = serde_json::from_str::<Value>(stream) {
            let name = raw
                .get("name")
                .and_then(Value::as_str)
                .map(|s| s.to_string());
            let message = raw
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Command failed")
                .to_string();
            return ExecutorError::command(exit_code, name, message, Some(raw))
                .with_streams(stdout, stderr);
        }
    }

    let text = if stderr.trim().is_empty() { stdout } else { stderr };
    ExecutorError::unparseable(format!(
        "exit {} with undecodable error stream: {}",
        exit_code,
        text.trim()
    ))
    .with_streams(stdout, stderr)
}
