//! CLI response formatting and output.
//!
//! Provides the `{status, result}` JSON envelope, printing, and exit code
//! mapping.

use orgforge::error::Hint;
use orgforge::{Error, ErrorCode, Result};
use serde::Serialize;

/// Top-level response: `status` 0 carries the success result, `status` 1
/// carries the structured error.
#[derive(Debug, Serialize)]
pub struct EngineResponse {
    pub status: i32,
    pub result: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResult {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl EngineResponse {
    pub fn success(result: serde_json::Value) -> Self {
        Self { status: 0, result }
    }

    pub fn from_error(err: &Error) -> Self {
        let result = ErrorResult {
            code: err.code.as_str().to_string(),
            message: err.message.clone(),
            details: err.details.clone(),
            hints: if err.hints.is_empty() {
                None
            } else {
                Some(err.hints.clone())
            },
            retryable: err.retryable,
        };
        Self {
            status: 1,
            result: serde_json::to_value(result)
                .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new())),
        }
    }

    fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize response".to_string()))
        })
    }
}

fn print_response(response: &EngineResponse) -> Result<()> {
    use std::io::{self, Write};

    let payload = response.to_json()?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", payload) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(()); // Exit gracefully on SIGPIPE
        }
        return Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        ));
    }
    Ok(())
}

pub fn print_json_result(result: Result<serde_json::Value>) -> Result<()> {
    match result {
        Ok(data) => print_response(&EngineResponse::success(data)),
        Err(err) => print_response(&EngineResponse::from_error(&err)),
    }
}

pub fn map_cmd_result_to_json<T: Serialize>(
    result: Result<(T, i32)>,
) -> (Result<serde_json::Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (
                Err(Error::internal_json(
                    err.to_string(),
                    Some("serialize response".to_string()),
                )),
                1,
            ),
        },
        Err(err) => {
            let exit_code = exit_code_for_error(err.code);
            (Err(err), exit_code)
        }
    }
}

fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ValidationMissingArgument
        | ErrorCode::ValidationInvalidArgument
        | ErrorCode::ValidationUnknownErrorCode
        | ErrorCode::RecipeInvalidJson
        | ErrorCode::RecipeUnknownAction
        | ErrorCode::RecipeUnknownHandler
        | ErrorCode::ActionMissingOption
        | ErrorCode::ActionInvalidOption => 2,

        ErrorCode::OrgNotFound
        | ErrorCode::ConfigFileNotFound
        | ErrorCode::ConfigInvalidJson => 4,

        ErrorCode::ActionFailed
        | ErrorCode::ExecutorCommandFailed
        | ErrorCode::ExecutorCommandTimeout
        | ErrorCode::ExecutorOutputUnparseable
        | ErrorCode::ExecutorApiFailed => 20,

        ErrorCode::NodeInvalidTransition
        | ErrorCode::NodeChildAfterTerminal
        | ErrorCode::InternalIoError
        | ErrorCode::InternalJsonError
        | ErrorCode::InternalUnexpected => 1,
    }
}
