//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use yougile_bot::ai::{AIMessage, AIResponse, CompletionProvider, GenerateOptions, TokenUsage};
use yougile_bot::yougile::{CreatedTask, NewTask, TaskTracker};
use yougile_bot::{BotConfig, BotError, BotResult, Dispatcher, PromptStore};

/// Completion provider that answers with canned text and records prompts.
pub struct StubProvider {
    reply: Result<String, u16>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Provider whose every call fails with an upstream HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn generate_text(
        &self,
        messages: &[AIMessage],
        _options: &GenerateOptions,
    ) -> BotResult<AIResponse> {
        self.prompts
            .lock()
            .unwrap()
            .extend(messages.iter().map(|m| m.content.clone()));

        match &self.reply {
            Ok(text) => Ok(AIResponse {
                text: text.clone(),
                usage: TokenUsage::default(),
                model: "stub".to_string(),
            }),
            Err(status) => Err(BotError::UpstreamHttp {
                service: "stub".to_string(),
                status: *status,
                body: "upstream unavailable".to_string(),
            }),
        }
    }
}

/// Tracker that records titles and hands out sequential ids.
#[derive(Default)]
pub struct StubTracker {
    pub titles: Mutex<Vec<String>>,
}

#[async_trait]
impl TaskTracker for StubTracker {
    async fn create_task(&self, task: &NewTask) -> BotResult<CreatedTask> {
        let mut titles = self.titles.lock().unwrap();
        titles.push(task.title.clone());
        Ok(CreatedTask {
            id: json!(format!("yg-{}", titles.len())),
        })
    }
}

/// Templates for every request type.
pub fn prompt_store() -> PromptStore {
    let templates: HashMap<String, String> = [
        ("analysis", "ANALYSIS PROMPT"),
        ("calendar_sync", "CALENDAR PROMPT"),
        ("governance", "GOVERNANCE PROMPT"),
        ("sprint_analytics", "SPRINT PROMPT"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    PromptStore::new(templates)
}

pub fn options() -> GenerateOptions {
    GenerateOptions {
        temperature: 0.1,
        max_tokens: 4000,
    }
}

/// Dispatcher over stubs.
pub fn stub_dispatcher(
    provider: Arc<StubProvider>,
    tracker: Arc<StubTracker>,
    column_id: Option<&str>,
) -> Dispatcher {
    Dispatcher::new(
        Arc::new(prompt_store()),
        provider,
        tracker,
        column_id.map(str::to_string),
        options(),
    )
}

/// Configuration pointing both APIs at mock servers.
pub fn mock_config(yandex_url: &str, yougile_base: &str, column_id: Option<&str>) -> BotConfig {
    let mut values: HashMap<&str, String> = HashMap::from([
        ("YANDEX_API_KEY", "ya-key".to_string()),
        ("YANDEX_FOLDER_ID", "b1gfolder".to_string()),
        ("YANDEX_GPT_URL", yandex_url.to_string()),
        ("YOUGILE_API_KEY", "yg-key".to_string()),
        ("YOUGILE_API_BASE", yougile_base.to_string()),
        ("BOT_API_TIMEOUT_SECS", "5".to_string()),
    ]);
    if let Some(column_id) = column_id {
        values.insert("YOUGILE_COLUMN_ID", column_id.to_string());
    }
    BotConfig::from_lookup(|key| values.get(key).cloned())
}

/// A Yandex GPT completion response carrying `text`.
pub fn completion_body(text: &str) -> serde_json::Value {
    json!({
        "result": {
            "alternatives": [
                {"message": {"role": "assistant", "text": text}, "status": "ALTERNATIVE_STATUS_FINAL"}
            ],
            "usage": {"inputTextTokens": "120", "completionTokens": "80", "totalTokens": "200"},
            "modelVersion": "23.10.2024"
        }
    })
}
