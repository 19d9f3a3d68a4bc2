//! OpenAI API Provider
//!
//! This module implements the LLMProvider trait for OpenAI-compatible
//! chat completions endpoints.

use crate::config::Config;
use crate::error::{ChatSheetError, Result};
use crate::llm::client::LLMHttpClient;
use crate::llm::provider::{GenerationParams, LLMProvider, LLMResponse, Message, MessageRole};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// OpenAI API base URL
const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Chat completions path, appended to the base URL
const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Default model
const DEFAULT_MODEL: &str = "gpt-4";

/// OpenAI GPT API provider
pub struct OpenAIProvider {
    /// API key for authentication
    api_key: String,
    /// Model to use (e.g., "gpt-4", "gpt-4o")
    model: String,
    /// API base URL
    base_url: String,
    /// HTTP client for making requests
    client: LLMHttpClient,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    ///
    /// # Arguments
    /// * `api_key` - OpenAI API key
    /// * `model` - Model identifier (defaults to gpt-4)
    pub fn new(api_key: impl Into<String>, model: Option<String>) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: OPENAI_API_BASE.to_string(),
            client: LLMHttpClient::new()?,
        })
    }

    /// Build a provider from the application configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ChatSheetError::LLMApiKeyMissing("OpenAI".to_string()))?;

        let mut provider = Self::new(api_key, Some(config.model.clone()))?
            .with_client(LLMHttpClient::with_timeout(config.timeout_secs)?);
        if let Some(ref base) = config.api_base {
            provider = provider.with_base_url(base);
        }
        Ok(provider)
    }

    /// Use a custom API base URL (e.g. a compatible proxy)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a preconfigured HTTP client
    pub fn with_client(mut self, client: LLMHttpClient) -> Self {
        self.client = client;
        self
    }

    /// Full chat completions URL
    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH)
    }

    /// Convert our Message format to OpenAI format
    fn convert_messages_to_openai(&self, messages: &[Message]) -> Vec<OpenAIMessage> {
        messages
            .iter()
            .map(|msg| OpenAIMessage {
                role: match msg.role {
                    MessageRole::User => "user",
                    MessageRole::System => "system",
                }
                .to_string(),
                content: msg.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn generate(
        &self,
        messages: &[Message],
        params: Option<&GenerationParams>,
    ) -> Result<LLMResponse> {
        let defaults = GenerationParams::default();
        let params = params.unwrap_or(&defaults);

        let request = OpenAIRequest {
            model: self.model.clone(),
            messages: self.convert_messages_to_openai(messages),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        let headers = LLMHttpClient::build_headers(&self.api_key)?;
        tracing::debug!(model = %self.model, messages = messages.len(), "sending chat completion");

        let response_text = self
            .client
            .post_with_retry(&self.endpoint(), headers, &request)
            .await
            .map_err(|e| match e {
                ChatSheetError::LLMApiError {
                    message, status, ..
                } => ChatSheetError::LLMApiError {
                    provider: self.provider_name().to_string(),
                    message,
                    status,
                },
                other => other,
            })?;

        let response = parse_completion(&response_text)?;
        tracing::debug!(
            input_tokens = ?response.input_tokens,
            output_tokens = ?response.output_tokens,
            "chat completion received"
        );
        Ok(response)
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }

    fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Decode a chat completion body into a response
fn parse_completion(body: &str) -> Result<LLMResponse> {
    let response: OpenAIResponse =
        serde_json::from_str(body).map_err(|e| ChatSheetError::LLMApiError {
            provider: "OpenAI".to_string(),
            message: format!("Failed to parse response: {}", e),
            status: 0,
        })?;

    let content = response
        .choices
        .first()
        .and_then(|choice| choice.message.content.clone())
        .unwrap_or_default();

    Ok(LLMResponse {
        content,
        input_tokens: response.usage.as_ref().map(|u| u.prompt_tokens),
        output_tokens: response.usage.as_ref().map(|u| u.completion_tokens),
        model: response.model,
    })
}

/// OpenAI API request format
#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// OpenAI API message format
#[derive(Debug, Serialize, Clone)]
struct OpenAIMessage {
    role: String,
    content: String,
}

/// OpenAI API response format
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: Option<String>,
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

/// Choice in OpenAI response
#[derive(Debug, Deserialize)]
struct Choice {
    message: OpenAIMessageResponse,
}

/// Message in OpenAI response
#[derive(Debug, Deserialize)]
struct OpenAIMessageResponse {
    content: Option<String>,
}

/// Token usage information
#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
