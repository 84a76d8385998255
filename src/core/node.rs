//! Hierarchical result record for one unit of work.
//!
//! A node moves Initialized -> Executing -> exactly one of
//! Success/Failure/Error. Terminal transitions set `finished_at` once and
//! freeze `children`; any later transition or child attach is rejected.
//! Bubbling is reported through ordinary control flow (`Attach`), never by
//! unwinding.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::core::detail::Detail;
use crate::core::error::{codes, Error, ErrorCode, Hint, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Engine,
    Action,
    Executor,
    Utility,
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeStatus {
    Initialized,
    Executing,
    Success,
    Failure,
    Error,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Initialized => "INITIALIZED",
            NodeStatus::Executing => "EXECUTING",
            NodeStatus::Success => "SUCCESS",
            NodeStatus::Failure => "FAILURE",
            NodeStatus::Error => "ERROR",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            NodeStatus::Success | NodeStatus::Failure | NodeStatus::Error
        )
    }
}

/// Governs how a child's terminal status affects this node.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeOptions {
    pub bubble_error: bool,
    pub bubble_failure: bool,
    pub failure_is_error: bool,
    pub start_now: bool,
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            bubble_error: true,
            bubble_failure: true,
            failure_is_error: false,
            start_now: true,
        }
    }
}

impl NodeOptions {
    /// No bubbling at all; the owner sets this node's status explicitly.
    pub fn detached() -> Self {
        Self {
            bubble_error: false,
            bubble_failure: false,
            failure_is_error: false,
            start_now: true,
        }
    }
}

/// Outcome of attaching a child node.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attach {
    /// Child kept; parent status unchanged.
    Kept,
    /// Child failure bubbled; parent is now Failure (or Error when
    /// `failure_is_error`). Non-interrupting: the owner decides whether to
    /// continue composing.
    BubbledFailure,
    /// Child error bubbled; parent is now Error. The owner must stop
    /// composing and return its node.
    BubbledError,
}

/// Serializable snapshot of the error that terminated a node.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeError {
    pub code: String,
    pub message: String,
    pub details: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
}

impl From<&Error> for NodeError {
    fn from(err: &Error) -> Self {
        Self {
            code: err.code.as_str().to_string(),
            message: err.message.clone(),
            details: err.details.clone(),
            hints: err.hints.clone(),
        }
    }
}

impl NodeError {
    /// Rebuild an engine error from the snapshot, for the outer boundary.
    pub fn to_error(&self) -> Error {
        let code = codes::parse_code(&self.code).unwrap_or(ErrorCode::InternalUnexpected);
        let mut err = Error::new(code, self.message.clone(), self.details.clone());
        err.hints = self.hints.clone();
        err
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultNode {
    pub kind: NodeKind,
    pub name: String,
    pub status: NodeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    pub detail: Detail,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResultNode>,
    #[serde(skip)]
    pub options: NodeOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<NodeError>,
}

impl ResultNode {
    pub fn new(kind: NodeKind, name: impl Into<String>, detail: Detail, options: NodeOptions) -> Self {
        let (status, started_at) = if options.start_now {
            (NodeStatus::Executing, Some(Utc::now()))
        } else {
            (NodeStatus::Initialized, None)
        };

        Self {
            kind,
            name: name.into(),
            status,
            started_at,
            finished_at: None,
            detail,
            children: Vec::new(),
            options,
            error: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn terminal_error(&self) -> Option<&NodeError> {
        self.error.as_ref()
    }

    pub fn start(&mut self) -> Result<()> {
        if self.status != NodeStatus::Initialized {
            return Err(Error::node_invalid_transition(
                &self.name,
                self.status.as_str(),
                NodeStatus::Executing.as_str(),
            ));
        }
        self.status = NodeStatus::Executing;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    pub fn succeed(&mut self) -> Result<()> {
        self.terminal(NodeStatus::Success)
    }

    pub fn fail(&mut self) -> Result<()> {
        self.terminal(NodeStatus::Failure)
    }

    pub fn error(&mut self, err: Error) -> Result<()> {
        self.terminal(NodeStatus::Error)?;
        self.error = Some(NodeError::from(&err));
        Ok(())
    }

    fn terminal(&mut self, to: NodeStatus) -> Result<()> {
        if self.status != NodeStatus::Executing {
            return Err(Error::node_invalid_transition(
                &self.name,
                self.status.as_str(),
                to.as_str(),
            ));
        }
        self.status = to;
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Attach a child node, applying the bubbling rules from `options`.
    ///
    /// The child is appended whatever its status. A child Error bubbles when
    /// `bubble_error` is set: this node becomes Error (absorbing the child's
    /// error as cause) and `Attach::BubbledError` tells the owner to stop. A
    /// child Failure bubbles when `bubble_failure` is set, without
    /// interrupting composition. Attaching to a terminal node is rejected
    /// and leaves `children` untouched.
    pub fn add_child(&mut self, child: ResultNode) -> Result<Attach> {
        if self.is_terminal() {
            return Err(Error::node_child_after_terminal(
                &self.name,
                self.status.as_str(),
            ));
        }
        // a not-yet-started parent must reject the attach outright, before
        // `children` is touched; bubbling transitions require Executing
        if self.status != NodeStatus::Executing {
            return Err(Error::node_invalid_transition(
                &self.name,
                self.status.as_str(),
                NodeStatus::Executing.as_str(),
            ));
        }

        let child_status = child.status;
        let cause = child.terminal_error().cloned();
        let child_name = child.name.clone();
        self.children.push(child);

        match child_status {
            NodeStatus::Error if self.options.bubble_error => {
                let err = match cause {
                    Some(snapshot) => snapshot.to_error(),
                    None => Error::internal_unexpected(format!(
                        "child '{}' errored without a cause",
                        child_name
                    )),
                };
                self.error(err)?;
                Ok(Attach::BubbledError)
            }
            NodeStatus::Failure if self.options.bubble_failure => {
                if self.options.failure_is_error {
                    self.error(Error::action_failed(&child_name))?;
                } else {
                    self.fail()?;
                }
                Ok(Attach::BubbledFailure)
            }
            _ => Ok(Attach::Kept),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(options: NodeOptions) -> ResultNode {
        ResultNode::new(
            NodeKind::Action,
            "test-node",
            Detail::Utility {
                operation: "noop".to_string(),
                output: None,
            },
            options,
        )
    }

    fn errored_child() -> ResultNode {
        let mut child = node(NodeOptions::detached());
        child
            .error(Error::internal_unexpected("boom"))
            .expect("fresh node accepts error");
        child
    }

    fn failed_child() -> ResultNode {
        let mut child = node(NodeOptions::detached());
        child.fail().expect("fresh node accepts fail");
        child
    }

    #[test]
    fn start_now_begins_executing_with_timestamp() {
        let n = node(NodeOptions::default());
        assert_eq!(n.status, NodeStatus::Executing);
        assert!(n.started_at.is_some());
        assert!(n.finished_at.is_none());
    }

    #[test]
    fn explicit_start_from_initialized() {
        let mut n = node(NodeOptions {
            start_now: false,
            ..NodeOptions::default()
        });
        assert_eq!(n.status, NodeStatus::Initialized);
        assert!(n.started_at.is_none());
        n.start().expect("start from Initialized");
        assert_eq!(n.status, NodeStatus::Executing);
    }

    #[test]
    fn terminal_status_is_set_exactly_once() {
        let mut n = node(NodeOptions::default());
        n.succeed().expect("first terminal transition");
        assert!(n.finished_at.is_some());

        let finished = n.finished_at;
        assert!(n.succeed().is_err());
        assert!(n.fail().is_err());
        assert!(n.error(Error::internal_unexpected("late")).is_err());
        assert_eq!(n.status, NodeStatus::Success);
        assert_eq!(n.finished_at, finished);
    }

    #[test]
    fn terminal_requires_executing() {
        let mut n = node(NodeOptions {
            start_now: false,
            ..NodeOptions::default()
        });
        let err = n.succeed().expect_err("terminal from Initialized rejected");
        assert_eq!(err.code, ErrorCode::NodeInvalidTransition);
    }

    #[test]
    fn add_child_after_terminal_is_rejected_and_children_untouched() {
        let mut parent = node(NodeOptions::default());
        let _ = parent
            .add_child(failed_child())
            .expect("attach while executing");
        // bubble_failure made the parent terminal
        assert_eq!(parent.status, NodeStatus::Failure);
        assert_eq!(parent.children.len(), 1);

        let err = parent
            .add_child(failed_child())
            .expect_err("attach after terminal rejected");
        assert_eq!(err.code, ErrorCode::NodeChildAfterTerminal);
        assert_eq!(parent.children.len(), 1);
    }

    #[test]
    fn add_child_before_start_is_rejected_and_children_untouched() {
        let mut parent = node(NodeOptions {
            start_now: false,
            ..NodeOptions::default()
        });
        let err = parent
            .add_child(failed_child())
            .expect_err("attach before start rejected");
        assert_eq!(err.code, ErrorCode::NodeInvalidTransition);
        assert!(parent.children.is_empty());
        assert_eq!(parent.status, NodeStatus::Initialized);

        parent.start().expect("start after rejected attach");
        let _ = parent.add_child(failed_child()).expect("attach once started");
        assert_eq!(parent.children.len(), 1);
    }

    #[test]
    fn child_error_bubbles_to_parent_error() {
        let mut parent = node(NodeOptions::default());
        let attach = parent.add_child(errored_child()).expect("attach");
        assert_eq!(attach, Attach::BubbledError);
        assert_eq!(parent.status, NodeStatus::Error);
        let cause = parent.terminal_error().expect("cause absorbed");
        assert_eq!(cause.code, ErrorCode::InternalUnexpected.as_str());
        assert_eq!(parent.children.len(), 1);
    }

    #[test]
    fn child_failure_bubbles_to_parent_failure() {
        let mut parent = node(NodeOptions::default());
        let attach = parent.add_child(failed_child()).expect("attach");
        assert_eq!(attach, Attach::BubbledFailure);
        assert_eq!(parent.status, NodeStatus::Failure);
        assert!(parent.terminal_error().is_none());
    }

    #[test]
    fn failure_is_error_escalates_bubbled_failure() {
        let mut parent = node(NodeOptions {
            failure_is_error: true,
            ..NodeOptions::default()
        });
        let attach = parent.add_child(failed_child()).expect("attach");
        assert_eq!(attach, Attach::BubbledFailure);
        assert_eq!(parent.status, NodeStatus::Error);
        let cause = parent.terminal_error().expect("escalated cause");
        assert_eq!(cause.code, ErrorCode::ActionFailed.as_str());
    }

    #[test]
    fn detached_parent_absorbs_everything() {
        let mut parent = node(NodeOptions::detached());
        assert_eq!(parent.add_child(errored_child()).expect("attach"), Attach::Kept);
        assert_eq!(parent.add_child(failed_child()).expect("attach"), Attach::Kept);
        assert_eq!(parent.status, NodeStatus::Executing);
        assert_eq!(parent.children.len(), 2);
        parent.succeed().expect("owner decides the outcome");
    }

    #[test]
    fn successful_child_attaches_silently() {
        let mut parent = node(NodeOptions::default());
        let mut child = node(NodeOptions::detached());
        child.succeed().expect("child succeeds");
        assert_eq!(parent.add_child(child).expect("attach"), Attach::Kept);
        assert_eq!(parent.status, NodeStatus::Executing);
    }

    #[test]
    fn node_error_snapshot_round_trips() {
        let original = Error::org_not_found("demo-org");
        let snapshot = NodeError::from(&original);
        let rebuilt = snapshot.to_error();
        assert_eq!(rebuilt.code, ErrorCode::OrgNotFound);
        assert_eq!(rebuilt.message, original.message);
        assert_eq!(rebuilt.hints.len(), original.hints.len());
    }
}
