use async_trait::async_trait;
use shared_types::Entity;

/// Named-entity recognition capability. Implementations are usually backed by
/// a remote model; the extractor only reads spans labelled as dates.
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    async fn recognize(&self, text: &str) -> Result<Vec<Entity>, RecognizerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RecognizerError {
    #[error("Recognizer unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid recognizer output: {0}")]
    InvalidOutput(String),
}

/// Recognizer that never finds anything. Leaves extraction to the regex
/// detectors and the weekday fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRecognizer;

#[async_trait]
impl EntityRecognizer for NoopRecognizer {
    async fn recognize(&self, _text: &str) -> Result<Vec<Entity>, RecognizerError> {
        Ok(Vec::new())
    }
}
