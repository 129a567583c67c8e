//! YouGile task API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::config::YouGileConfig;
use crate::errors::{BotError, BotResult};

const SERVICE: &str = "YouGile";

/// Title used when the model did not provide one.
pub const DEFAULT_TASK_TITLE: &str = "Новая задача";

/// Payload for `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub column_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Value>>,
}

impl NewTask {
    /// Build a payload from one task entry of the model's analysis.
    ///
    /// `assignees` and `tags` are only sent when they are non-empty lists.
    pub fn from_entry(entry: &Value, column_id: &str) -> Self {
        let non_empty_list = |key: &str| {
            entry
                .get(key)
                .and_then(Value::as_array)
                .filter(|items| !items.is_empty())
                .cloned()
        };

        Self {
            title: entry
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_TASK_TITLE)
                .to_string(),
            description: entry
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            column_id: column_id.to_string(),
            assigned: non_empty_list("assignees"),
            tags: non_empty_list("tags"),
        }
    }
}

/// A task as returned by YouGile after creation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedTask {
    /// Remote identifier; `Null` if the response carried none.
    #[serde(default)]
    pub id: Value,
}

/// Destination for tasks extracted from an analysis.
#[async_trait]
pub trait TaskTracker: Send + Sync {
    /// Create a single task.
    async fn create_task(&self, task: &NewTask) -> BotResult<CreatedTask>;
}

/// YouGile REST client.
pub struct YouGileClient {
    client: Client,
    config: YouGileConfig,
}

impl YouGileClient {
    pub fn new(config: YouGileConfig, timeout: Duration) -> BotResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Internal {
                reason: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client, config })
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.config.api_base)
    }
}

#[async_trait]
impl TaskTracker for YouGileClient {
    async fn create_task(&self, task: &NewTask) -> BotResult<CreatedTask> {
        let api_key = self.config.require_api_key().inspect_err(|e| error!("{e}"))?;

        info!(title = %task.title, "Creating YouGile task");

        let response = self
            .client
            .post(self.tasks_url())
            .bearer_auth(api_key)
            .json(task)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "YouGile request failed");
                BotError::Transport {
                    service: SERVICE.to_string(),
                    reason: e.to_string(),
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| BotError::Transport {
            service: SERVICE.to_string(),
            reason: format!("Failed to read response: {e}"),
        })?;

        if !status.is_success() {
            error!(status = status.as_u16(), body = %body, "YouGile returned an error");
            return Err(BotError::UpstreamHttp {
                service: SERVICE.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let created: CreatedTask = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, body = %body, "Unexpected YouGile response structure");
            BotError::ResponseShape {
                service: SERVICE.to_string(),
                reason: e.to_string(),
            }
        })?;

        info!(id = %created.id, "YouGile task created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base: &str, api_key: Option<&str>) -> YouGileClient {
        YouGileClient::new(
            YouGileConfig {
                api_key: api_key.map(str::to_string),
                column_id: Some("col-1".to_string()),
                api_base: base.to_string(),
            },
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_payload_defaults() {
        let task = NewTask::from_entry(&json!({"task_id": "T1"}), "col-1");
        assert_eq!(
            serde_json::to_value(&task).unwrap(),
            json!({"title": "Новая задача", "description": "", "columnId": "col-1"})
        );
    }

    #[test]
    fn test_payload_optional_lists() {
        let entry = json!({
            "title": "Login form",
            "description": "Email + password",
            "assignees": ["user-1"],
            "tags": []
        });
        let task = NewTask::from_entry(&entry, "col-9");
        assert_eq!(
            serde_json::to_value(&task).unwrap(),
            json!({
                "title": "Login form",
                "description": "Email + password",
                "columnId": "col-9",
                "assigned": ["user-1"]
            })
        );
    }

    #[tokio::test]
    async fn test_create_task() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tasks"))
            .and(header("authorization", "Bearer yg-key"))
            .and(body_json(json!({
                "title": "Login form",
                "description": "",
                "columnId": "col-1"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "yg-42"})))
            .expect(1)
            .mount(&server)
            .await;

        let task = NewTask::from_entry(&json!({"title": "Login form"}), "col-1");
        let created = client(&server.uri(), Some("yg-key"))
            .create_task(&task)
            .await
            .unwrap();
        assert_eq!(created.id, json!("yg-42"));
    }

    #[tokio::test]
    async fn test_create_task_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(500).set_body_string("column not found"))
            .mount(&server)
            .await;

        let task = NewTask::from_entry(&json!({"title": "x"}), "col-1");
        let err = client(&server.uri(), Some("yg-key"))
            .create_task(&task)
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("column not found"));
        assert!(matches!(err, BotError::UpstreamHttp { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let task = NewTask::from_entry(&json!({"title": "x"}), "col-1");
        let err = client(&server.uri(), None)
            .create_task(&task)
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("YOUGILE_API_KEY"));
    }
}
