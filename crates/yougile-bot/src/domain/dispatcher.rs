//! Request dispatcher.

use std::sync::Arc;

use tracing::{error, info};

use crate::ai::{AIMessage, CompletionProvider, GenerateOptions, YandexGptProvider};
use crate::config::BotConfig;
use crate::entities::{Request, RequestType, ResultEnvelope};
use crate::errors::{BotError, BotResult};
use crate::prompts::PromptStore;
use crate::yougile::{TaskTracker, YouGileClient};

use super::{build_report, create_tasks};

/// Message of the envelope returned for a request without text.
pub const EMPTY_TEXT_MESSAGE: &str = "Отсутствует текст запроса";

/// Routes a request through the model and into the matching flow.
pub struct Dispatcher {
    prompts: Arc<PromptStore>,
    provider: Arc<dyn CompletionProvider>,
    tracker: Arc<dyn TaskTracker>,
    column_id: Option<String>,
    options: GenerateOptions,
}

impl Dispatcher {
    pub fn new(
        prompts: Arc<PromptStore>,
        provider: Arc<dyn CompletionProvider>,
        tracker: Arc<dyn TaskTracker>,
        column_id: Option<String>,
        options: GenerateOptions,
    ) -> Self {
        Self {
            prompts,
            provider,
            tracker,
            column_id,
            options,
        }
    }

    /// Wire the Yandex GPT provider and the YouGile client from configuration.
    pub fn from_config(config: &BotConfig, prompts: Arc<PromptStore>) -> BotResult<Self> {
        let provider = YandexGptProvider::new(config.yandex.clone(), config.timeout)?;
        let tracker = YouGileClient::new(config.yougile.clone(), config.timeout)?;

        Ok(Self::new(
            prompts,
            Arc::new(provider),
            Arc::new(tracker),
            config.yougile.column_id.clone(),
            GenerateOptions {
                temperature: config.yandex.temperature,
                max_tokens: config.yandex.max_tokens,
            },
        ))
    }

    /// Process one request.
    ///
    /// Problems with the request itself (no text, no prompt) and unparseable
    /// model output come back as `error` envelopes. Everything else that goes
    /// wrong is returned as an error.
    pub async fn dispatch(&self, request: &Request) -> BotResult<ResultEnvelope> {
        let request_type = request.request_type;

        if request.text.is_empty() {
            return Ok(ResultEnvelope::error(
                request_type.as_str(),
                EMPTY_TEXT_MESSAGE,
            ));
        }

        let prompt_key = request_type.prompt_key();
        let template = self.prompts.get(prompt_key);
        if template.is_empty() {
            error!(prompt_key, "Prompt template not found");
            return Ok(ResultEnvelope::error(
                request_type.as_str(),
                format!("Промпт '{prompt_key}' не найден"),
            ));
        }

        let prompt = self.prompts.compose(template, &request.text)?;
        info!(
            request_type = %request_type,
            provider = self.provider.name(),
            "Requesting completion"
        );
        let response = self
            .provider
            .generate_text(&[AIMessage::user(prompt)], &self.options)
            .await?;

        match request_type {
            RequestType::Analysis => {
                create_tasks(
                    self.tracker.as_ref(),
                    self.column_id.as_deref(),
                    &response.text,
                )
                .await
            }
            _ => build_report(&response.text, prompt_key),
        }
    }

    /// Like [`Dispatcher::dispatch`], but errors become `error` envelopes.
    pub async fn run(&self, request: &Request) -> ResultEnvelope {
        match self.dispatch(request).await {
            Ok(envelope) => envelope,
            Err(err) => failure_envelope(request, &err),
        }
    }
}

/// `error` envelope for an error that escaped [`Dispatcher::dispatch`].
pub(crate) fn failure_envelope(request: &Request, err: &BotError) -> ResultEnvelope {
    let failure = err.failure();
    error!(kind = ?err.kind(), error = %failure.detail(), "Request failed");
    ResultEnvelope::error(
        request.request_type.as_str(),
        format!("Ошибка: {}", failure.detail()),
    )
}
