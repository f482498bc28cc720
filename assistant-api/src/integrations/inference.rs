//! Client for hosted model inference
//!
//! Talks to a Hugging Face Inference API compatible service: one endpoint per
//! model under `{base_url}/models/{model}`, JSON in and out.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use extractors::{EntityRecognizer, RecognizerError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_types::Entity;
use tracing::{debug, info, instrument, warn};

use crate::config::InferenceConfig;

/// Reply used when the model produces no text
pub const FALLBACK_REPLY: &str = "Sorry, I didn't understand. Could you repeat?";

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Connection to inference service failed: {0}")]
    ConnectionFailed(String),

    #[error("Inference service error: {0}")]
    ServerError(String),

    #[error("Invalid response from inference service: {0}")]
    InvalidResponse(String),
}

/// Conversational model capability
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn reply(&self, message: &str) -> Result<String, InferenceError>;
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct GeneratedText {
    #[serde(default)]
    generated_text: String,
}

pub struct InferenceClient {
    client: Client,
    config: InferenceConfig,
    api_token: RwLock<Option<String>>,
}

impl InferenceClient {
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InferenceError::ConnectionFailed(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            chat_model = %config.chat_model,
            ner_model = %config.ner_model,
            "Initialized inference client"
        );

        let api_token = RwLock::new(config.api_token.clone());
        Ok(Self {
            client,
            config,
            api_token,
        })
    }

    /// Swap the bearer token used for subsequent requests
    pub fn set_api_token(&self, token: Option<String>) {
        if let Ok(mut current) = self.api_token.write() {
            *current = token;
        }
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/models/{}", self.config.base_url.trim_end_matches('/'), model)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        model: &str,
        request: &InferenceRequest<'_>,
    ) -> Result<T, InferenceError> {
        let token = self.api_token.read().ok().and_then(|token| token.clone());
        let mut builder = self.client.post(self.model_url(model)).json(request);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Failed to reach inference service");
            InferenceError::ConnectionFailed(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, model = %model, "Inference request failed");
            return Err(InferenceError::ServerError(format!(
                "{model} returned {status}: {error_text}"
            )));
        }

        response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse inference response");
            InferenceError::InvalidResponse(e.to_string())
        })
    }

    /// Raw text generation from the chat model
    #[instrument(skip(self, message), fields(model = %self.config.chat_model))]
    pub async fn generate(&self, message: &str) -> Result<String, InferenceError> {
        let request = InferenceRequest {
            inputs: message,
            parameters: None,
        };

        let generations: Vec<GeneratedText> = self.post(&self.config.chat_model, &request).await?;
        let text = generations
            .into_iter()
            .next()
            .map(|generation| generation.generated_text.trim().to_string())
            .unwrap_or_default();

        debug!(reply_len = text.len(), "Received chat reply");
        Ok(text)
    }

    /// Aggregated entity spans from the NER model
    #[instrument(skip(self, text), fields(model = %self.config.ner_model, text_len = text.len()))]
    pub async fn entities(&self, text: &str) -> Result<Vec<Entity>, InferenceError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let request = InferenceRequest {
            inputs: text,
            parameters: Some(serde_json::json!({ "aggregation_strategy": "simple" })),
        };

        let entities: Vec<Entity> = self.post(&self.config.ner_model, &request).await?;
        debug!(count = entities.len(), "Received entities");
        Ok(entities)
    }
}

#[async_trait]
impl ChatModel for InferenceClient {
    async fn reply(&self, message: &str) -> Result<String, InferenceError> {
        let text = self.generate(message).await?;
        if text.is_empty() {
            Ok(FALLBACK_REPLY.to_string())
        } else {
            Ok(text)
        }
    }
}

#[async_trait]
impl EntityRecognizer for InferenceClient {
    async fn recognize(&self, text: &str) -> Result<Vec<Entity>, RecognizerError> {
        self.entities(text).await.map_err(|e| match e {
            InferenceError::InvalidResponse(msg) => RecognizerError::InvalidOutput(msg),
            other => RecognizerError::Unavailable(other.to_string()),
        })
    }
}
