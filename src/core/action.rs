//! Action contract: a named, validated unit of work that composes executor
//! calls and yields exactly one ACTION-kind result node.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::core::context::ActionContext;
use crate::core::detail::{ActionDetail, Detail};
use crate::core::error::{Error, Result};
use crate::core::node::{NodeKind, NodeOptions, ResultNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    Api,
    Cli,
}

/// Static metadata for one action. Pacing delays throttle progress
/// notifications only; they never retry work.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub category: ActionCategory,
    pub required_options: &'static [&'static str],
    pub progress_delay: u64,
    pub success_delay: u64,
    pub error_delay: u64,
}

pub trait Action {
    fn meta(&self) -> &ActionMeta;

    /// Pure, synchronous. Fails with `action.missing_option` naming the
    /// first missing required key; called before any executor is invoked.
    fn validate_options(&self, options: &Value) -> Result<()> {
        validate_required(self.meta(), options)
    }

    /// The action's only operation besides validate. Negative outcomes
    /// travel inside the returned node; `Err` is reserved for conditions
    /// the action could not normalize itself.
    fn execute(&self, ctx: &ActionContext, options: &Value) -> Result<ResultNode>;
}

pub fn validate_required(meta: &ActionMeta, options: &Value) -> Result<()> {
    for key in meta.required_options {
        let present = options
            .get(key)
            .and_then(Value::as_str)
            .map(|s| !s.is_empty())
            .unwrap_or(false);
        if !present {
            return Err(Error::action_missing_option(meta.name, *key));
        }
    }
    Ok(())
}

/// Fetch a required string option. `validate_options` runs first, but
/// execute paths still go through this so direct library callers get the
/// same error.
pub fn require_str<'a>(meta: &ActionMeta, options: &'a Value, key: &str) -> Result<&'a str> {
    options
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::action_missing_option(meta.name, key))
}

/// Baseline ACTION-kind node: bubbles both errors and failures, started.
pub fn action_node(meta: &ActionMeta, detail: ActionDetail) -> ResultNode {
    ResultNode::new(
        NodeKind::Action,
        meta.name,
        Detail::Action(detail),
        NodeOptions::default(),
    )
}

/// UTILITY-kind child recording a local collaborator call that succeeded.
pub fn utility_node(operation: impl Into<String>, output: Option<Value>) -> ResultNode {
    let mut node = ResultNode::new(
        NodeKind::Utility,
        "utility",
        Detail::Utility {
            operation: operation.into(),
            output,
        },
        NodeOptions::detached(),
    );
    // freshly built executing node; the transition cannot fail
    let _ = node.succeed();
    node
}

/// Static name -> action lookup.
pub struct ActionRegistry {
    actions: HashMap<&'static str, Box<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    pub fn register(&mut self, action: Box<dyn Action>) {
        self.actions.insert(action.meta().name, action);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Action> {
        self.actions.get(name).map(|a| a.as_ref())
    }

    pub fn metas(&self) -> Vec<&ActionMeta> {
        let mut metas: Vec<&ActionMeta> = self.actions.values().map(|a| a.meta()).collect();
        metas.sort_by_key(|m| m.name);
        metas
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
