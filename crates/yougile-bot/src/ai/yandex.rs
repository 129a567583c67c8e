//! Yandex GPT completion provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::YandexGptConfig;
use crate::errors::{BotError, BotResult};

use super::provider::{AIMessage, AIResponse, CompletionProvider, GenerateOptions, TokenUsage};

const SERVICE: &str = "Yandex GPT";

/// Yandex GPT request message
#[derive(Debug, Serialize)]
struct YandexMessage {
    role: &'static str,
    text: String,
}

/// Yandex GPT completion options
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionOptions {
    stream: bool,
    temperature: f32,
    /// The API takes the token budget as a string.
    max_tokens: String,
}

/// Yandex GPT request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct YandexRequest {
    model_uri: String,
    completion_options: CompletionOptions,
    messages: Vec<YandexMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct YandexAlternativeMessage {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct YandexAlternative {
    #[serde(default)]
    message: YandexAlternativeMessage,
}

/// Token counters come back as decimal strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YandexUsage {
    #[serde(default)]
    input_text_tokens: Option<String>,
    #[serde(default)]
    completion_tokens: Option<String>,
    #[serde(default)]
    total_tokens: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YandexResult {
    #[serde(default)]
    alternatives: Vec<YandexAlternative>,
    #[serde(default)]
    usage: YandexUsage,
    #[serde(default)]
    model_version: Option<String>,
}

/// Yandex GPT response
#[derive(Debug, Deserialize)]
struct YandexResponse {
    #[serde(default)]
    result: YandexResult,
}

fn count(raw: Option<&String>) -> u32 {
    raw.and_then(|v| v.parse().ok()).unwrap_or(0)
}

impl From<&YandexUsage> for TokenUsage {
    fn from(usage: &YandexUsage) -> Self {
        Self {
            input_tokens: count(usage.input_text_tokens.as_ref()),
            output_tokens: count(usage.completion_tokens.as_ref()),
            total_tokens: count(usage.total_tokens.as_ref()),
        }
    }
}

/// Yandex GPT provider.
pub struct YandexGptProvider {
    client: Client,
    config: YandexGptConfig,
}

impl YandexGptProvider {
    /// Create a provider with a per-request timeout.
    pub fn new(config: YandexGptConfig, timeout: Duration) -> BotResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Internal {
                reason: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client, config })
    }

    fn build_request(
        &self,
        messages: &[AIMessage],
        options: &GenerateOptions,
    ) -> BotResult<YandexRequest> {
        Ok(YandexRequest {
            model_uri: self.config.model_uri()?,
            completion_options: CompletionOptions {
                stream: false,
                temperature: options.temperature,
                max_tokens: options.max_tokens.to_string(),
            },
            messages: messages
                .iter()
                .map(|msg| YandexMessage {
                    role: msg.role.as_str(),
                    text: msg.content.clone(),
                })
                .collect(),
        })
    }
}

#[async_trait]
impl CompletionProvider for YandexGptProvider {
    fn name(&self) -> &'static str {
        "yandex-gpt"
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some() && self.config.folder_id.is_some()
    }

    async fn generate_text(
        &self,
        messages: &[AIMessage],
        options: &GenerateOptions,
    ) -> BotResult<AIResponse> {
        let api_key = self.config.require_api_key().inspect_err(|e| error!("{e}"))?;
        let request = self
            .build_request(messages, options)
            .inspect_err(|e| error!("{e}"))?;

        info!(model_uri = %request.model_uri, "Sending request to Yandex GPT");

        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Yandex GPT request failed");
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
            error!(status = status.as_u16(), body = %body, "Yandex GPT returned an error");
            return Err(BotError::UpstreamHttp {
                service: SERVICE.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let api_response: YandexResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, body = %body, "Unexpected Yandex GPT response structure");
            BotError::ResponseShape {
                service: SERVICE.to_string(),
                reason: e.to_string(),
            }
        })?;

        let result = api_response.result;
        let text = if let Some(first) = result.alternatives.into_iter().next() {
            first.message.text
        } else {
            warn!("Yandex GPT response has no alternatives");
            String::new()
        };

        let usage = TokenUsage::from(&result.usage);
        info!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Yandex GPT call succeeded"
        );

        Ok(AIResponse {
            text,
            usage,
            model: result
                .model_version
                .unwrap_or_else(|| self.config.model.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BotConfig;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(url: &str) -> YandexGptConfig {
        let mut config = BotConfig::from_lookup(|_| None).yandex;
        config.api_key = Some("secret".to_string());
        config.folder_id = Some("b1gfolder".to_string());
        config.url = url.to_string();
        config
    }

    fn options() -> GenerateOptions {
        GenerateOptions {
            temperature: 0.1,
            max_tokens: 4000,
        }
    }

    fn provider(config: YandexGptConfig) -> YandexGptProvider {
        YandexGptProvider::new(config, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_request_shape() {
        let provider = provider(config("http://unused"));
        let request = provider
            .build_request(&[AIMessage::user("hello")], &options())
            .unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "modelUri": "gpt://b1gfolder/yandexgpt-lite/latest",
                "completionOptions": {"stream": false, "temperature": 0.1_f32, "maxTokens": "4000"},
                "messages": [{"role": "user", "text": "hello"}]
            })
        );
    }

    #[tokio::test]
    async fn test_generate_text_extracts_first_alternative() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(json!({"messages": [{"role": "user", "text": "hi"}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {
                    "alternatives": [
                        {"message": {"role": "assistant", "text": "{\"ok\": true}"}, "status": "ALTERNATIVE_STATUS_FINAL"},
                        {"message": {"role": "assistant", "text": "ignored"}}
                    ],
                    "usage": {"inputTextTokens": "12", "completionTokens": "5", "totalTokens": "17"},
                    "modelVersion": "23.10.2024"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider(config(&server.uri()));
        let response = provider
            .generate_text(&[AIMessage::user("hi")], &options())
            .await
            .unwrap();

        assert_eq!(response.text, "{\"ok\": true}");
        assert_eq!(response.usage.total_tokens, 17);
        assert_eq!(response.model, "23.10.2024");
    }

    #[tokio::test]
    async fn test_missing_alternatives_yield_empty_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {}})))
            .mount(&server)
            .await;

        let response = provider(config(&server.uri()))
            .generate_text(&[AIMessage::user("hi")], &options())
            .await
            .unwrap();
        assert!(response.text.is_empty());
        assert_eq!(response.usage, TokenUsage::default());
    }

    #[tokio::test]
    async fn test_http_error_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
            .mount(&server)
            .await;

        let err = provider(config(&server.uri()))
            .generate_text(&[AIMessage::user("hi")], &options())
            .await
            .err()
            .unwrap();
        match err {
            BotError::UpstreamHttp { status, body, .. } => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad token");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_shape_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = provider(config(&server.uri()))
            .generate_text(&[AIMessage::user("hi")], &options())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, BotError::ResponseShape { .. }));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = config(&server.uri());
        config.api_key = None;
        let provider = provider(config);
        assert!(!provider.is_configured());

        let err = provider
            .generate_text(&[AIMessage::user("hi")], &options())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, BotError::ConfigurationMissing { .. }));
    }

    #[test]
    fn test_system_role_is_forwarded() {
        let provider = provider(config("http://unused"));
        let request = provider
            .build_request(
                &[AIMessage::system("be brief"), AIMessage::user("hi")],
                &options(),
            )
            .unwrap();
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].role, "user");
    }
}
