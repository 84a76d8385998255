//! Executor contracts and outcome normalization.
//!
//! Executors return `Result<Value, ExecutorError>` — never a result node —
//! and the wrap helpers here are the single seam where a foreign outcome is
//! turned into an EXECUTOR-kind node before it enters the tree.

pub mod api;
pub mod cli;

use serde::Serialize;
use serde_json::Value;

pub use api::{ApiExecutor, ApiRequest, RestApiExecutor};
pub use cli::{CommandDescriptor, CommandExecutor, FlagValue, OrgCliExecutor};

use crate::core::detail::Detail;
use crate::core::error::{ApiFailedDetails, CommandFailedDetails, Error};
use crate::core::node::{NodeKind, NodeOptions, ResultNode};

/// Well-known error names returned by the remote org, mapped explicitly
/// instead of substring-matched. Anything unrecognized is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RemoteErrorCode {
    OrgNotFound,
    RequestTimeout,
    DeployFailed,
    InvalidCredentials,
    Unknown,
}

impl RemoteErrorCode {
    pub fn from_remote_name(name: &str) -> Self {
        match name {
            "NamedOrgNotFound" | "NoOrgFound" | "NOT_FOUND" => RemoteErrorCode::OrgNotFound,
            "RequestTimeout" | "REQUEST_LIMIT_EXCEEDED" => RemoteErrorCode::RequestTimeout,
            "DeployFailed" | "MetadataTransferError" => RemoteErrorCode::DeployFailed,
            "InvalidCredentials" | "INVALID_LOGIN" => RemoteErrorCode::InvalidCredentials,
            _ => RemoteErrorCode::Unknown,
        }
    }

    /// An expected negative outcome is a graceful "no" (Failure), not a
    /// crash (Error): e.g. deleting an org that is already gone.
    pub fn is_expected_negative(&self) -> bool {
        matches!(self, RemoteErrorCode::OrgNotFound)
    }
}

/// Normalized rejection from either executor shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorError {
    pub remote_code: RemoteErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_name: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

impl ExecutorError {
    pub fn command(
        exit_code: i32,
        remote_name: Option<String>,
        message: impl Into<String>,
        raw: Option<Value>,
    ) -> Self {
        let remote_code = remote_name
            .as_deref()
            .map(RemoteErrorCode::from_remote_name)
            .unwrap_or(RemoteErrorCode::Unknown);
        Self {
            remote_code,
            remote_name,
            message: message.into(),
            exit_code: Some(exit_code),
            http_status: None,
            raw,
            stdout: None,
            stderr: None,
        }
    }

    pub fn unparseable(message: impl Into<String>) -> Self {
        Self {
            remote_code: RemoteErrorCode::Unknown,
            remote_name: Some("UnparseableOutput".to_string()),
            message: message.into(),
            exit_code: None,
            http_status: None,
            raw: None,
            stdout: None,
            stderr: None,
        }
    }

    pub fn spawn(message: impl Into<String>) -> Self {
        Self {
            remote_code: RemoteErrorCode::Unknown,
            remote_name: None,
            message: message.into(),
            exit_code: None,
            http_status: None,
            raw: None,
            stdout: None,
            stderr: None,
        }
    }

    pub fn api(
        http_status: Option<u16>,
        remote_name: Option<String>,
        message: impl Into<String>,
        raw: Option<Value>,
    ) -> Self {
        let remote_code = remote_name
            .as_deref()
            .map(RemoteErrorCode::from_remote_name)
            .unwrap_or(RemoteErrorCode::Unknown);
        Self {
            remote_code,
            remote_name,
            message: message.into(),
            exit_code: None,
            http_status,
            raw,
            stdout: None,
            stderr: None,
        }
    }

    /// Record the streams the command produced, so the resulting engine
    /// error carries them for inspection.
    pub fn with_streams(mut self, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        self.stdout = Some(stdout.into());
        self.stderr = Some(stderr.into());
        self
    }

    pub fn is_expected_negative(&self) -> bool {
        self.remote_code.is_expected_negative()
    }

    /// Translate into an engine error for a command-line invocation. The
    /// captured streams and structured payload travel into the details.
    pub fn into_command_error(self, command_line: &str) -> Error {
        match self.remote_code {
            RemoteErrorCode::OrgNotFound => Error::org_not_found(self.message),
            RemoteErrorCode::RequestTimeout => Error::executor_command_timeout(command_line),
            _ if self.remote_name.as_deref() == Some("UnparseableOutput") => {
                Error::executor_output_unparseable(command_line, self.message)
            }
            _ => Error::executor_command_failed(CommandFailedDetails {
                command_line: command_line.to_string(),
                exit_code: self.exit_code.unwrap_or(-1),
                remote_name: self.remote_name,
                stdout: self.stdout.unwrap_or_default(),
                stderr: self.stderr.unwrap_or_default(),
                raw: self.raw,
            }),
        }
    }

    /// Translate into an engine error for an API operation.
    pub fn into_api_error(self, operation: &str) -> Error {
        match self.remote_code {
            RemoteErrorCode::OrgNotFound => Error::org_not_found(self.message),
            _ => Error::executor_api_failed(ApiFailedDetails {
                operation: operation.to_string(),
                http_status: self.http_status,
                remote_name: self.remote_name,
                error: self.message,
            }),
        }
    }
}

/// Wrap a command-line executor outcome into an EXECUTOR-kind node with a
/// COMMAND-kind child recording the exact invocation.
pub fn cli_outcome_node(
    desc: &CommandDescriptor,
    outcome: std::result::Result<Value, ExecutorError>,
) -> ResultNode {
    let command_line = desc.to_command_line();
    let mut node = ResultNode::new(
        NodeKind::Executor,
        desc.command.clone(),
        Detail::Executor {
            command_line: Some(command_line.clone()),
            operation: None,
            output: None,
            messages: desc.messages.clone(),
        },
        NodeOptions::detached(),
    );

    match outcome {
        Ok(output) => {
            attach_command_child(&mut node, &command_line, 0);
            if let Detail::Executor { output: slot, .. } = &mut node.detail {
                *slot = Some(output);
            }
            finish_success(&mut node);
        }
        Err(err) => {
            attach_command_child(&mut node, &command_line, err.exit_code.unwrap_or(-1));
            let expected = err.is_expected_negative();
            let engine_err = err.into_command_error(&command_line);
            finish_rejection(&mut node, engine_err, expected);
        }
    }

    node
}

/// Wrap an API executor outcome into an EXECUTOR-kind node.
pub fn api_outcome_node(
    req: &ApiRequest,
    outcome: std::result::Result<Value, ExecutorError>,
) -> ResultNode {
    let mut node = ResultNode::new(
        NodeKind::Executor,
        req.operation.clone(),
        Detail::Executor {
            command_line: None,
            operation: Some(req.operation.clone()),
            output: None,
            messages: req.messages.clone(),
        },
        NodeOptions::detached(),
    );

    match outcome {
        Ok(output) => {
            if let Detail::Executor { output: slot, .. } = &mut node.detail {
                *slot = Some(output);
            }
            finish_success(&mut node);
        }
        Err(err) => {
            let expected = err.is_expected_negative();
            let engine_err = err.into_api_error(&req.operation);
            finish_rejection(&mut node, engine_err, expected);
        }
    }

    node
}

fn attach_command_child(node: &mut ResultNode, command_line: &str, exit_code: i32) {
    let mut child = ResultNode::new(
        NodeKind::Command,
        command_line.split_whitespace().next().unwrap_or("command"),
        Detail::Command {
            command_line: command_line.to_string(),
            exit_code,
        },
        NodeOptions::detached(),
    );
    let finished = if exit_code == 0 {
        child.succeed()
    } else {
        child.fail()
    };
    if finished.is_ok() {
        // parent is detached and executing; attach cannot bubble or fail
        let _ = node.add_child(child);
    }
}

fn finish_success(node: &mut ResultNode) {
    // freshly built executing node; the transition cannot fail
    let _ = node.succeed();
}

fn finish_rejection(node: &mut ResultNode, err: Error, expected_negative: bool) {
    let outcome = if expected_negative {
        node.fail()
    } else {
        node.error(err)
    };
    debug_assert!(outcome.is_ok());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::NodeStatus;
    use crate::core::progress::MessageSet;

    fn messages() -> MessageSet {
        MessageSet::new("working", "done", "failed")
    }

    fn descriptor() -> CommandDescriptor {
        CommandDescriptor::new("force:org:delete", messages())
            .flag("targetusername", "ghost-org")
            .flag("json", true)
    }

    #[test]
    fn cli_success_wraps_output_and_command_child() {
        let node = cli_outcome_node(&descriptor(), Ok(serde_json::json!({"status": 0})));
        assert_eq!(node.status, NodeStatus::Success);
        assert_eq!(node.kind, NodeKind::Executor);
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].kind, NodeKind::Command);
        assert_eq!(node.children[0].status, NodeStatus::Success);
    }

    #[test]
    fn expected_negative_rejection_becomes_failure() {
        let err = ExecutorError::command(
            1,
            Some("NamedOrgNotFound".to_string()),
            "No org found with alias ghost-org",
            None,
        );
        assert!(err.is_expected_negative());
        let node = cli_outcome_node(&descriptor(), Err(err));
        assert_eq!(node.status, NodeStatus::Failure);
        assert_eq!(node.children[0].status, NodeStatus::Failure);
    }

    #[test]
    fn unknown_rejection_becomes_error_with_cause() {
        let err = ExecutorError::command(
            1,
            Some("SomethingWeird".to_string()),
            "it broke",
            None,
        );
        let node = cli_outcome_node(&descriptor(), Err(err));
        assert_eq!(node.status, NodeStatus::Error);
        let cause = node.terminal_error().expect("cause recorded");
        assert_eq!(cause.code, "executor.command_failed");
    }

    #[test]
    fn command_failure_details_carry_streams_and_payload() {
        let raw = serde_json::json!({
            "status": 1,
            "name": "DeployFailed",
            "message": "component failures"
        });
        let err = ExecutorError::command(
            1,
            Some("DeployFailed".to_string()),
            "component failures",
            Some(raw.clone()),
        )
        .with_streams(raw.to_string(), "warning: deprecated flag");

        let node = cli_outcome_node(&descriptor(), Err(err));
        assert_eq!(node.status, NodeStatus::Error);
        let cause = node.terminal_error().expect("cause recorded");
        assert_eq!(cause.code, "executor.command_failed");
        assert_eq!(cause.details["raw"], raw);
        assert!(cause.details["stdout"]
            .as_str()
            .expect("stdout recorded")
            .contains("DeployFailed"));
        assert_eq!(cause.details["stderr"], "warning: deprecated flag");
    }

    #[test]
    fn api_rejection_maps_remote_names() {
        let req = ApiRequest {
            operation: "user.create".to_string(),
            org_alias: "demo".to_string(),
            params: serde_json::json!({}),
            messages: messages(),
        };
        let err = ExecutorError::api(Some(400), Some("INVALID_LOGIN".to_string()), "bad creds", None);
        assert_eq!(err.remote_code, RemoteErrorCode::InvalidCredentials);
        let node = api_outcome_node(&req, Err(err));
        assert_eq!(node.status, NodeStatus::Error);
        assert_eq!(
            node.terminal_error().expect("cause").code,
            "executor.api_failed"
        );
    }
}
