use crate::config::Config;
use crate::i18n::{Language, MetricsReport, TranslationMetrics};
use crate::rate_limit::RateLimiter;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// OpenAI Chat Completion request for translation
#[derive(Debug, Serialize)]
struct TranslationRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Check if a model is a reasoning model that doesn't support temperature
fn is_reasoning_model(model: &str) -> bool {
    model.starts_with("gpt-5")
        || model.starts_with("o1")
        || model.starts_with("o3")
        || model.starts_with("o4")
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// Build the system prompt for translation.
///
/// The French pair anchors the expected output: the bare translation, with
/// placeholders such as `$num` left untouched.
fn build_translation_system_prompt(target_language: &str) -> String {
    format!(
        r#"You are a Translator. For a given input text, output ONLY the {} equivalent.

French Example:

Input:
You are a technical writer. Summarize the $num most relevant nodes from the provided XML to pass on to creative writers.

Output:
Vous êtes rédacteur technique. Résumez les $num nœuds les plus pertinents du XML fourni pour les transmettre aux rédacteurs créatifs."#,
        target_language
    )
}

/// Result of one translation attempt.
///
/// A failed call still yields usable text (the untranslated source), so one
/// bad key never stops a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Translated(String),
    Fallback { text: String, error: String },
}

impl TranslationOutcome {
    #[cfg(test)]
    pub(crate) fn text(&self) -> &str {
        match self {
            TranslationOutcome::Translated(text) => text,
            TranslationOutcome::Fallback { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            TranslationOutcome::Translated(text) => text,
            TranslationOutcome::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, TranslationOutcome::Fallback { .. })
    }
}

/// Something that can translate one string into a target language.
pub trait Translate {
    fn translate(
        &self,
        text: &str,
        target_language: Language,
    ) -> impl Future<Output = TranslationOutcome> + Send;
}

/// Translator backed by an OpenAI-compatible chat completions endpoint.
pub struct OpenAiTranslator {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    limiter: RateLimiter,
    metrics: TranslationMetrics,
}

impl OpenAiTranslator {
    pub fn new(client: reqwest::Client, config: &Config, limiter: RateLimiter) -> Self {
        Self {
            client,
            api_url: config.openai_api_url.clone(),
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
            limiter,
            metrics: TranslationMetrics::new(),
        }
    }

    /// Translator paced by the configured requests-per-minute ceiling.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            reqwest::Client::new(),
            config,
            RateLimiter::per_minute(config.requests_per_minute),
        )
    }

    pub fn metrics(&self) -> MetricsReport {
        self.metrics.report()
    }

    fn build_request(&self, text: &str, target_language: Language) -> TranslationRequest {
        TranslationRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: build_translation_system_prompt(target_language.name()),
                },
                Message {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
            // Reasoning models don't support temperature
            temperature: if is_reasoning_model(&self.model) {
                None
            } else {
                Some(0.3)
            },
        }
    }

    /// One paced request; any failure is returned as an error.
    ///
    /// A failure is only counted once the request has been admitted by the
    /// limiter and counted as a call.
    async fn request_translation(&self, text: &str, target_language: Language) -> Result<String> {
        let request = self.build_request(text, target_language);

        // Held until the response body has been read.
        let _permit = self
            .limiter
            .acquire()
            .await
            .context("Rate limiter closed")?;
        self.metrics.record_api_call();

        let result = self.send_request(&request).await;
        if result.is_err() {
            self.metrics.record_api_failure();
        }
        result
    }

    async fn send_request(&self, request: &TranslationRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .context("Failed to send translation request to OpenAI API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            anyhow::bail!("OpenAI API error during translation ({}): {}", status, body);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI translation response")?;

        let translated = chat_response
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .context("OpenAI translation response contained no choices")?;

        Ok(translated)
    }
}

impl Translate for OpenAiTranslator {
    async fn translate(&self, text: &str, target_language: Language) -> TranslationOutcome {
        match self.request_translation(text, target_language).await {
            Ok(translated) => TranslationOutcome::Translated(translated),
            Err(e) => TranslationOutcome::Fallback {
                text: text.to_string(),
                error: format!("{:#}", e),
            },
        }
    }
}
