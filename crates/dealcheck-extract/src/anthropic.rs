//! Field extraction through the Anthropic Messages API.

use std::time::Duration;

use dealcheck_core::rules::FieldRules;
use dealcheck_core::{DocumentKind, ExtractError, ExtractionRequest, FieldExtractor, FieldRecord};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::json_block::first_json_object;
use crate::prompt::{system_prompt, user_prompt};
use crate::shape::{shape_contract, shape_crm};

/// Anthropic API base URL.
pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com";

/// Required API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default model used for extraction.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

const CONTRACT_MAX_TOKENS: u32 = 2048;
const CRM_MAX_TOKENS: u32 = 1024;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for [`AnthropicExtractor`].
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub model: String,
    /// Without trailing slash, e.g. `https://api.anthropic.com`.
    pub base_url: String,
    pub timeout: Duration,
    /// Contract fields that must come back as numbers or null.
    pub numeric_fields: Vec<String>,
}

impl AnthropicConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: ANTHROPIC_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            numeric_fields: FieldRules::default().numeric_fields,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Extracts fields by asking a Claude model for a JSON object.
pub struct AnthropicExtractor {
    client: reqwest::blocking::Client,
    config: AnthropicConfig,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<ApiMessage>,
}

#[derive(Serialize)]
struct ApiMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicExtractor {
    pub fn new(config: AnthropicConfig) -> Result<Self, ExtractError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExtractError::Request(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    fn request_body(&self, request: &ExtractionRequest<'_>) -> MessagesRequest<'_> {
        let max_tokens = match request.kind {
            DocumentKind::Contract => CONTRACT_MAX_TOKENS,
            DocumentKind::Crm => CRM_MAX_TOKENS,
        };
        MessagesRequest {
            model: &self.config.model,
            max_tokens,
            temperature: 0.0,
            system: system_prompt(request, &self.config.numeric_fields),
            messages: vec![ApiMessage {
                role: "user",
                content: user_prompt(request),
            }],
        }
    }

    fn complete(&self, body: &MessagesRequest<'_>) -> Result<String, ExtractError> {
        let url = format!("{}/v1/messages", self.config.base_url);
        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(body)
            .send()
            .map_err(|e| ExtractError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ExtractError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: MessagesResponse = resp
            .json()
            .map_err(|e| ExtractError::MalformedResponse(e.to_string()))?;
        reply_text(reply)
    }
}

impl FieldExtractor for AnthropicExtractor {
    fn extract(&self, request: &ExtractionRequest<'_>) -> Result<FieldRecord, ExtractError> {
        let body = self.request_body(request);
        info!(
            kind = request.kind.as_str(),
            model = %self.config.model,
            chars = request.text.len(),
            "requesting field extraction"
        );

        let text = self.complete(&body)?;
        let object = first_json_object(&text)?;
        let record = match request.kind {
            DocumentKind::Contract => {
                shape_contract(object, request.expected_fields, &self.config.numeric_fields)?
            }
            DocumentKind::Crm => shape_crm(object, request.expected_fields)?,
        };

        info!(kind = request.kind.as_str(), fields = record.len(), "extraction complete");
        Ok(record)
    }
}

fn reply_text(reply: MessagesResponse) -> Result<String, ExtractError> {
    let text: String = reply
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();
    if text.trim().is_empty() {
        return Err(ExtractError::MalformedResponse(
            "model reply has no text content".to_string(),
        ));
    }
    Ok(text)
}
