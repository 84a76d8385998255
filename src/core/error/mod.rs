use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod codes;
pub mod help;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationMissingArgument,
    ValidationInvalidArgument,
    ValidationUnknownErrorCode,

    RecipeInvalidJson,
    RecipeUnknownAction,
    RecipeUnknownHandler,

    ActionMissingOption,
    ActionInvalidOption,
    ActionFailed,

    NodeInvalidTransition,
    NodeChildAfterTerminal,

    ExecutorCommandFailed,
    ExecutorCommandTimeout,
    ExecutorOutputUnparseable,
    ExecutorApiFailed,

    OrgNotFound,

    ConfigFileNotFound,
    ConfigInvalidJson,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",
            ErrorCode::ValidationUnknownErrorCode => "validation.unknown_error_code",

            ErrorCode::RecipeInvalidJson => "recipe.invalid_json",
            ErrorCode::RecipeUnknownAction => "recipe.unknown_action",
            ErrorCode::RecipeUnknownHandler => "recipe.unknown_handler",

            ErrorCode::ActionMissingOption => "action.missing_option",
            ErrorCode::ActionInvalidOption => "action.invalid_option",
            ErrorCode::ActionFailed => "action.failed",

            ErrorCode::NodeInvalidTransition => "node.invalid_transition",
            ErrorCode::NodeChildAfterTerminal => "node.child_after_terminal",

            ErrorCode::ExecutorCommandFailed => "executor.command_failed",
            ErrorCode::ExecutorCommandTimeout => "executor.command_timeout",
            ErrorCode::ExecutorOutputUnparseable => "executor.output_unparseable",
            ErrorCode::ExecutorApiFailed => "executor.api_failed",

            ErrorCode::OrgNotFound => "org.not_found",

            ErrorCode::ConfigFileNotFound => "config.file_not_found",
            ErrorCode::ConfigInvalidJson => "config.invalid_json",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingOptionDetails {
    pub action: String,
    pub option: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidOptionDetails {
    pub action: String,
    pub option: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidTransitionDetails {
    pub node: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildAfterTerminalDetails {
    pub node: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandFailedDetails {
    pub command_line: String,
    pub exit_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_name: Option<String>,
    pub stdout: String,
    pub stderr: String,
    /// Structured error payload decoded from the command's output, when one
    /// was present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFailedDetails {
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_name: Option<String>,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ValidationMissingArgument,
            "Missing required argument",
            serde_json::json!({ "args": args }),
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = serde_json::to_value(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn validation_unknown_error_code(code: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ValidationUnknownErrorCode,
            "Unknown error code",
            serde_json::json!({ "code": code.into() }),
        )
        .with_hint("Run 'orgforge error codes' to list available codes")
    }

    pub fn recipe_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        Self::new(
            ErrorCode::RecipeInvalidJson,
            "Recipe file is not valid JSON",
            serde_json::json!({ "path": path.into(), "error": err.to_string() }),
        )
    }

    pub fn recipe_unknown_action(name: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::RecipeUnknownAction,
            "Recipe references an unknown action",
            serde_json::json!({ "action": name.into() }),
        )
        .with_hint("Run 'orgforge actions' to list registered actions")
    }

    pub fn recipe_unknown_handler(step: impl Into<String>, handler: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::RecipeUnknownHandler,
            "Step references a handler missing from the handler table",
            serde_json::json!({ "step": step.into(), "handler": handler.into() }),
        )
    }

    pub fn action_missing_option(action: impl Into<String>, option: impl Into<String>) -> Self {
        let option = option.into();
        let details = serde_json::to_value(MissingOptionDetails {
            action: action.into(),
            option: option.clone(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ActionMissingOption,
            format!("Missing required action option '{}'", option),
            details,
        )
    }

    pub fn action_invalid_option(
        action: impl Into<String>,
        option: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = serde_json::to_value(InvalidOptionDetails {
            action: action.into(),
            option: option.into(),
            problem: problem.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::ActionInvalidOption, "Invalid action option", details)
    }

    pub fn action_failed(action: impl Into<String>) -> Self {
        let action = action.into();
        Self::new(
            ErrorCode::ActionFailed,
            format!("Action '{}' reported a failure", action),
            serde_json::json!({ "action": action }),
        )
    }

    pub fn node_invalid_transition(
        node: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        let details = serde_json::to_value(InvalidTransitionDetails {
            node: node.into(),
            from: from.into(),
            to: to.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::NodeInvalidTransition,
            "Result node transition not allowed",
            details,
        )
    }

    pub fn node_child_after_terminal(node: impl Into<String>, status: impl Into<String>) -> Self {
        let details = serde_json::to_value(ChildAfterTerminalDetails {
            node: node.into(),
            status: status.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::NodeChildAfterTerminal,
            "Cannot attach a child to a terminal result node",
            details,
        )
    }

    pub fn executor_command_failed(details: CommandFailedDetails) -> Self {
        let details =
            serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ExecutorCommandFailed,
            "Org CLI command failed",
            details,
        )
    }

    pub fn executor_command_timeout(command_line: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExecutorCommandTimeout,
            "Org CLI command timed out",
            serde_json::json!({ "commandLine": command_line.into() }),
        )
        .with_retryable(true)
    }

    pub fn executor_output_unparseable(command_line: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExecutorOutputUnparseable,
            "Org CLI produced output that could not be decoded",
            serde_json::json!({ "commandLine": command_line.into(), "raw": raw.into() }),
        )
    }

    pub fn executor_api_failed(details: ApiFailedDetails) -> Self {
        let details =
            serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::ExecutorApiFailed, "Org API call failed", details)
    }

    pub fn org_not_found(alias: impl Into<String>) -> Self {
        let alias = alias.into();
        Self::new(
            ErrorCode::OrgNotFound,
            format!("No org found for alias '{}'", alias),
            serde_json::json!({ "alias": alias }),
        )
        .with_hint("Verify the alias with your org CLI's alias list")
    }

    pub fn config_file_not_found(path: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ConfigFileNotFound,
            "Configuration file not found",
            serde_json::json!({ "path": path.into() }),
        )
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration file",
            serde_json::json!({ "path": path.into(), "error": err.to_string() }),
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalIoError,
            "IO error",
            serde_json::json!({ "error": error.into(), "context": context }),
        )
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalJsonError,
            "JSON error",
            serde_json::json!({ "error": error.into(), "context": context }),
        )
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = Some(retryable);
        self
    }

    /// Attach a serialized result tree to the details, so the error
    /// envelope of a failed run still carries everything that happened.
    pub fn with_tree<T: serde::Serialize>(mut self, tree: &T) -> Self {
        if let Ok(value) = serde_json::to_value(tree) {
            match &mut self.details {
                Value::Object(map) => {
                    map.insert("tree".to_string(), value);
                }
                other => {
                    *other = serde_json::json!({ "details": other.clone(), "tree": value });
                }
            }
        }
        self
    }
}
