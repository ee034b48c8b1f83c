//! Suggestion provider backed by the OpenAI chat completions API.

/// Environment-based provider configuration.
pub mod config;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use wastewise_core::{
    model::{Category, CategoryTotals, Suggestion},
    ports::{ProviderError, SuggestionProvider, SuggestionRequest},
    suggest::emoji,
};

pub use config::{ConfigError, OpenAiConfig};

const MAX_TOKENS: u32 = 600;
const TEMPERATURE: f64 = 0.7;

/// Body of POST /chat/completions
#[derive(Debug, Serialize)]
struct ChatRequest<'req> {
    model: &'req str,
    messages: [ChatMessage<'req>; 1],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'req> {
    role: &'req str,
    content: &'req str,
}

/// Response from /chat/completions, reduced to what we read.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

/// One suggestion as the model is asked to write it.
#[derive(Debug, Deserialize)]
struct ModelTip {
    category: String,
    title: String,
    body: String,
    #[serde(default)]
    emoji: Option<String>,
}

/// Suggestion provider asking a chat model for coaching tips.
pub struct OpenAiSuggestionProvider {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiSuggestionProvider {
    /// Create a provider with its own HTTP client bounded by `config.timeout`.
    ///
    /// # Errors
    ///
    /// Returns the [`reqwest::Error`] raised when the HTTP client cannot be built.
    pub fn new(config: OpenAiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent("wastewise/0.1")
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl SuggestionProvider for OpenAiSuggestionProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>, ProviderError> {
        let prompt = build_prompt(&request.totals, request.count);
        let body = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: &prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let req = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body);

        let response = fetch_json::<ChatResponse>(req).await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ProviderError::Empty)?;

        debug!(model = %self.config.model, "received model answer");
        parse_suggestions(&content, &request.totals, request.count)
    }
}

/// Build the provider behind a shared handle, ready for the suggestion engine.
///
/// # Errors
///
/// Returns the [`reqwest::Error`] raised when the HTTP client cannot be built.
pub fn provider(config: OpenAiConfig) -> Result<Arc<dyn SuggestionProvider>, reqwest::Error> {
    Ok(Arc::new(OpenAiSuggestionProvider::new(config)?))
}

/// Coaching prompt listing the user's totals and asking for `count` JSON tips.
#[must_use]
pub fn build_prompt(totals: &CategoryTotals, count: usize) -> String {
    format!(
        "You are WasteWise, an AI waste-reduction coach. A user has logged the following waste this month:\n\
         - Food waste: {food} kg\n\
         - Plastic waste: {plastic} kg\n\
         - Energy waste: {energy} kWh\n\n\
         Give {count} specific, encouraging, and actionable suggestions to help them reduce waste.\n\
         For each suggestion, return JSON with keys: category (food/plastic/energy), title (short), body (2 sentences max), emoji.\n\
         Return only a JSON array, no other text.",
        food = totals.food,
        plastic = totals.plastic,
        energy = totals.energy,
    )
}

/// Decode the model's answer into at most `count` suggestions.
///
/// # Errors
///
/// Returns [`ProviderError::Malformed`] when the answer is not a JSON array of
/// tips with a known category and non-blank title and body, and
/// [`ProviderError::Empty`] for an empty array.
pub fn parse_suggestions(
    content: &str,
    totals: &CategoryTotals,
    count: usize,
) -> Result<Vec<Suggestion>, ProviderError> {
    let tips: Vec<ModelTip> = serde_json::from_str(strip_code_fence(content))
        .map_err(|err| ProviderError::Malformed(err.to_string()))?;

    if tips.is_empty() {
        return Err(ProviderError::Empty);
    }

    tips.into_iter()
        .take(count)
        .map(|tip| {
            let category: Category = tip
                .category
                .parse()
                .map_err(|_err| ProviderError::Malformed(format!("category {}", tip.category)))?;

            let title = tip.title.trim();
            let body = tip.body.trim();
            if title.is_empty() || body.is_empty() {
                return Err(ProviderError::Malformed("blank title or body".into()));
            }

            let symbol = tip
                .emoji
                .map(|raw| raw.trim().to_owned())
                .filter(|raw| !raw.is_empty())
                .unwrap_or_else(|| emoji(category).to_owned());

            Ok(Suggestion {
                category,
                emoji: symbol,
                title: title.to_owned(),
                body: body.to_owned(),
                amount: totals.get(category),
            })
        })
        .collect()
}

// Models like to wrap JSON in ```json fences despite being told not to.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = match inner.split_once('\n') {
        Some((_lang, rest)) => rest,
        // Single-line fence; drop a language tag glued to the opening backticks.
        None => inner.trim_start_matches(|ch: char| ch.is_ascii_alphanumeric()),
    };
    inner.trim_end().trim_end_matches("```").trim()
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else if err.is_decode() {
        ProviderError::Malformed(err.to_string())
    } else {
        ProviderError::Network(err.to_string())
    }
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ProviderError> {
    req.send()
        .await
        .map_err(transport_error)?
        .error_for_status()
        .map_err(transport_error)?
        .json()
        .await
        .map_err(transport_error)
}
