use super::{codes, ErrorCode, Hint};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorHelpSummary {
    pub code: String,
    pub summary: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorHelp {
    pub code: String,
    pub summary: String,
    pub details_schema: serde_json::Value,
    pub hints: Vec<Hint>,
}

pub fn list() -> Vec<ErrorHelpSummary> {
    codes::all_codes()
        .iter()
        .copied()
        .map(|code| {
            let help = explain(code);
            ErrorHelpSummary {
                code: help.code,
                summary: help.summary,
            }
        })
        .collect()
}

pub fn explain(code: ErrorCode) -> ErrorHelp {
    match code {
        ErrorCode::ValidationMissingArgument => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Missing required CLI argument".to_string(),
            details_schema: serde_json::json!({"args":"string[]"}),
            hints: vec![Hint {
                message: "Rerun the command with the required argument(s)".to_string(),
            }],
        },
        ErrorCode::ValidationInvalidArgument => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Invalid CLI argument".to_string(),
            details_schema: serde_json::json!({"field":"string","problem":"string"}),
            hints: vec![Hint {
                message: "Verify the argument value and try again".to_string(),
            }],
        },
        ErrorCode::ValidationUnknownErrorCode => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Unknown error code".to_string(),
            details_schema: serde_json::json!({"code":"string"}),
            hints: vec![Hint {
                message: "Run `orgforge error codes` to list available codes".to_string(),
            }],
        },
        ErrorCode::RecipeInvalidJson => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Recipe file is not valid JSON".to_string(),
            details_schema: serde_json::json!({"path":"string","error":"string"}),
            hints: vec![Hint {
                message: "Fix JSON syntax in the recipe file".to_string(),
            }],
        },
        ErrorCode::RecipeUnknownAction => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Recipe step names an action that is not registered".to_string(),
            details_schema: serde_json::json!({"action":"string"}),
            hints: vec![Hint {
                message: "Run `orgforge actions` and correct the step's action name".to_string(),
            }],
        },
        ErrorCode::RecipeUnknownHandler => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Step handler name is missing from the supplied handler table".to_string(),
            details_schema: serde_json::json!({"step":"string","handler":"string"}),
            hints: vec![Hint {
                message: "Register the handler in the handler table or remove it from the step"
                    .to_string(),
            }],
        },
        ErrorCode::ActionMissingOption => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Required action option is missing".to_string(),
            details_schema: serde_json::json!({"action":"string","option":"string"}),
            hints: vec![Hint {
                message: "Add the named option to the step's options object".to_string(),
            }],
        },
        ErrorCode::ActionInvalidOption => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Action option value is invalid".to_string(),
            details_schema: serde_json::json!({"action":"string","option":"string","problem":"string"}),
            hints: vec![Hint {
                message: "Correct the option value to match the action's expectations".to_string(),
            }],
        },
        ErrorCode::ActionFailed => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Action reported a failure that was escalated to an error".to_string(),
            details_schema: serde_json::json!({"action":"string"}),
            hints: vec![Hint {
                message: "Inspect the step's result tree for the failing child".to_string(),
            }],
        },
        ErrorCode::NodeInvalidTransition => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Result node received a transition its state does not allow".to_string(),
            details_schema: serde_json::json!({"node":"string","from":"string","to":"string"}),
            hints: vec![Hint {
                message: "Report as an orgforge bug if seen outside custom action code".to_string(),
            }],
        },
        ErrorCode::NodeChildAfterTerminal => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Child attach attempted on a terminal result node".to_string(),
            details_schema: serde_json::json!({"node":"string","status":"string"}),
            hints: vec![Hint {
                message: "Report as an orgforge bug if seen outside custom action code".to_string(),
            }],
        },
        ErrorCode::ExecutorCommandFailed => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Org CLI command returned non-zero".to_string(),
            details_schema: serde_json::json!({"commandLine":"string","exitCode":"number","remoteName":"string?","stdout":"string","stderr":"string","raw":"object?"}),
            hints: vec![Hint {
                message: "Inspect stdout/stderr in error.details for the underlying failure"
                    .to_string(),
            }],
        },
        ErrorCode::ExecutorCommandTimeout => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Org CLI command timed out".to_string(),
            details_schema: serde_json::json!({"commandLine":"string"}),
            hints: vec![Hint {
                message: "Retry, or raise the wait passed to the command".to_string(),
            }],
        },
        ErrorCode::ExecutorOutputUnparseable => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Org CLI output could not be decoded as JSON".to_string(),
            details_schema: serde_json::json!({"commandLine":"string","raw":"string"}),
            hints: vec![Hint {
                message: "Check that the org CLI binary supports --json output".to_string(),
            }],
        },
        ErrorCode::ExecutorApiFailed => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Org API call failed".to_string(),
            details_schema: serde_json::json!({"operation":"string","httpStatus":"number?","remoteName":"string?","error":"string"}),
            hints: vec![Hint {
                message: "Inspect error.details for the remote error name and message".to_string(),
            }],
        },
        ErrorCode::OrgNotFound => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "No org matches the given alias".to_string(),
            details_schema: serde_json::json!({"alias":"string"}),
            hints: vec![Hint {
                message: "List authenticated orgs with your org CLI and verify the alias"
                    .to_string(),
            }],
        },
        ErrorCode::ConfigFileNotFound => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Referenced configuration/definition file does not exist".to_string(),
            details_schema: serde_json::json!({"path":"string"}),
            hints: vec![Hint {
                message: "Check the definitionFile path relative to the project config root"
                    .to_string(),
            }],
        },
        ErrorCode::ConfigInvalidJson => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Configuration/definition file is invalid JSON".to_string(),
            details_schema: serde_json::json!({"path":"string","error":"string"}),
            hints: vec![Hint {
                message: "Fix JSON syntax in the referenced file".to_string(),
            }],
        },
        ErrorCode::InternalIoError => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Internal IO error".to_string(),
            details_schema: serde_json::json!({"error":"string","context":"string?"}),
            hints: vec![Hint {
                message: "Report as an orgforge bug if persistent".to_string(),
            }],
        },
        ErrorCode::InternalJsonError => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Internal JSON error".to_string(),
            details_schema: serde_json::json!({"error":"string","context":"string?"}),
            hints: vec![Hint {
                message: "Report as an orgforge bug if persistent".to_string(),
            }],
        },
        ErrorCode::InternalUnexpected => ErrorHelp {
            code: code.as_str().to_string(),
            summary: "Unexpected internal error".to_string(),
            details_schema: serde_json::json!({}),
            hints: vec![Hint {
                message: "Report as an orgforge bug with steps to reproduce".to_string(),
            }],
        },
    }
}
