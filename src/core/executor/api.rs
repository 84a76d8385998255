//! API executor: performs org operations over HTTP instead of the CLI.

use serde::Serialize;
use serde_json::Value;

use crate::core::defaults;
use crate::core::progress::{MessageSet, ProgressEventKind, ProgressSink};

use super::ExecutorError;

/// One API operation against the target org.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    /// Dotted operation name, e.g. `user.create`.
    pub operation: String,
    pub org_alias: String,
    pub params: Value,
    pub messages: MessageSet,
}

pub trait ApiExecutor {
    fn execute(
        &self,
        req: &ApiRequest,
        progress: &dyn ProgressSink,
    ) -> std::result::Result<Value, ExecutorError>;
}

/// Production executor posting operations to the org's REST endpoint.
pub struct RestApiExecutor {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl RestApiExecutor {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn endpoint(&self, operation: &str) -> String {
        format!(
            "{}/services/orgforge/{}",
            self.base_url.trim_end_matches('/'),
            operation.replace('.', "/")
        )
    }
}

impl Default for RestApiExecutor {
    fn default() -> Self {
        Self::new(defaults::API_URL)
    }
}

impl ApiExecutor for RestApiExecutor {
    fn execute(
        &self,
        req: &ApiRequest,
        progress: &dyn ProgressSink,
    ) -> std::result::Result<Value, ExecutorError> {
        progress.notify(ProgressEventKind::Progress, &req.messages.progress_msg);

        let response = self
            .client
            .post(self.endpoint(&req.operation))
            .header("X-Org-Alias", &req.org_alias)
            .json(&req.params)
            .send()
            .map_err(|e| {
                progress.notify(ProgressEventKind::Error, &req.messages.error_msg);
                ExecutorError::api(None, None, format!("transport error: {}", e), None)
            })?;

        let status = response.status();
        let body: Value = response.json().unwrap_or(Value::Null);

        if status.is_success() {
            progress.notify(ProgressEventKind::Success, &req.messages.success_msg);
            return Ok(body);
        }

        progress.notify(ProgressEventKind::Error, &req.messages.error_msg);
        let remote_name = body
            .get("errorCode")
            .and_then(Value::as_str)
            .map(|s| s.to_string());
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("API call failed")
            .to_string();
        Err(ExecutorError::api(
            Some(status.as_u16()),
            remote_name,
            message,
            Some(body),
        ))
    }
}
