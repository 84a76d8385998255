//! Typed detail payloads for result nodes.
//!
//! Every node kind carries an explicit detail schema instead of an opaque
//! value; action details are further tagged by action name.

use serde::Serialize;
use serde_json::Value;

use crate::core::progress::MessageSet;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Detail {
    #[serde(rename_all = "camelCase")]
    Engine {
        recipe: String,
        target_org: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        dev_hub: Option<String>,
        total_steps: usize,
        completed_steps: usize,
    },
    Action(ActionDetail),
    #[serde(rename_all = "camelCase")]
    Executor {
        #[serde(skip_serializing_if = "Option::is_none")]
        command_line: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        operation: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        output: Option<Value>,
        messages: MessageSet,
    },
    #[serde(rename_all = "camelCase")]
    Utility {
        operation: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        output: Option<Value>,
    },
    #[serde(rename_all = "camelCase")]
    Command {
        command_line: String,
        exit_code: i32,
    },
    /// Placeholder for an action that errored before it could compose its
    /// typed detail (e.g. its definition file was unreadable).
    #[serde(rename_all = "camelCase")]
    Aborted { options: Value },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action")]
pub enum ActionDetail {
    #[serde(rename = "create-user", rename_all = "camelCase")]
    CreateUser {
        definition_file: String,
        user_alias: String,
        base_username: String,
        unique_username: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        default_password: Option<String>,
        messages: MessageSet,
    },
    #[serde(rename = "configure-admin-user", rename_all = "camelCase")]
    ConfigureAdminUser {
        definition_file: String,
        admin_username: String,
        messages: MessageSet,
    },
    #[serde(rename = "deploy-metadata", rename_all = "camelCase")]
    DeployMetadata {
        mdapi_source: String,
        command_line: String,
        messages: MessageSet,
    },
    #[serde(rename = "delete-scratch-org", rename_all = "camelCase")]
    DeleteScratchOrg {
        scratch_org_alias: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        swallowed_error: Option<String>,
        messages: MessageSet,
    },
}
