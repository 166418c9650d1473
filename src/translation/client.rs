use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::translation::language::Language;
use crate::translation::prompt::PromptTemplate;
use crate::utils::{ApiConfig, Result, TranslatorError};

pub const SYSTEM_MESSAGE: &str = "You are a professional translator. Your task is to translate text while preserving meaning and tone. Only respond with the translated text, no explanations or additional content.";

/// Everything needed to translate one cell.
#[derive(Debug, Clone, Copy)]
pub struct TranslationRequest<'a> {
    pub text: &'a str,
    pub source: Language,
    pub target: Language,
    pub prompt: &'a PromptTemplate,
    pub field: Option<&'a str>,
}

impl TranslationRequest<'_> {
    pub fn user_prompt(&self) -> String {
        self.prompt
            .format(self.source.name(), self.target.name(), self.text, self.field)
    }
}

#[async_trait]
pub trait Translate: Send + Sync {
    async fn translate(&self, request: TranslationRequest<'_>) -> Result<String>;
}

/// OpenAI-compatible chat-completions backend. One request per call, no retry.
pub struct TranslationClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl TranslationClient {
    pub fn new(api: &ApiConfig, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(TranslatorError::ConfigError(
                "API key is not set; run `xlsx-translator set-key <KEY>` or set OPENAI_API_KEY".to_string(),
            ));
        }

        let mut builder = Client::builder();
        if let Some(secs) = api.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: api.endpoint.clone(),
            model: api.model.clone(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn call_api(&self, user_prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_MESSAGE,
                },
                Message {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TranslatorError::ApiError(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let body: ChatResponse = response.json().await?;
        first_completion(body)
    }
}

fn first_completion(body: ChatResponse) -> Result<String> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| TranslatorError::ApiError("No completion in response".to_string()))
}

#[async_trait]
impl Translate for TranslationClient {
    async fn translate(&self, request: TranslationRequest<'_>) -> Result<String> {
        let user_prompt = request.user_prompt();
        debug!(
            source = %request.source,
            target = %request.target,
            text = request.text,
            prompt = %user_prompt,
            "Translation request"
        );

        let translated = self.call_api(&user_prompt).await?;
        debug!(original = request.text, translated = %translated, "Translation result");
        Ok(translated)
    }
}
