use actix_web::{web, HttpResponse, Result};
use extractors::{DateExtractor, EntityRecognizer};
use shared_types::{
    ChatRequest, ChatResponse, ExtractDatesRequest, ExtractDatesResponse, NerRequest, NerResponse,
};
use std::sync::Arc;
use tracing::warn;

use crate::integrations::inference::ChatModel;

pub const EMPTY_MESSAGE_REPLY: &str = "Please provide a message.";

#[derive(Debug)]
pub enum NlpError {
    Inference(String),
}

impl std::fmt::Display for NlpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NlpError::Inference(msg) => write!(f, "{}", msg),
        }
    }
}

impl actix_web::error::ResponseError for NlpError {
    fn error_response(&self) -> HttpResponse {
        match self {
            NlpError::Inference(msg) => {
                HttpResponse::BadGateway().json(serde_json::json!({ "error": msg }))
            }
        }
    }
}

pub async fn chat(
    model: web::Data<Arc<dyn ChatModel>>,
    request: web::Json<ChatRequest>,
) -> Result<HttpResponse, NlpError> {
    let message = request.into_inner().message.unwrap_or_default();
    if message.trim().is_empty() {
        return Ok(HttpResponse::Ok().json(ChatResponse {
            response: EMPTY_MESSAGE_REPLY.to_string(),
        }));
    }

    let response = model.reply(message.trim()).await.map_err(|e| {
        warn!(error = %e, "Chat request failed");
        NlpError::Inference(e.to_string())
    })?;

    Ok(HttpResponse::Ok().json(ChatResponse { response }))
}

pub async fn ner(
    recognizer: web::Data<Arc<dyn EntityRecognizer>>,
    request: web::Json<NerRequest>,
) -> Result<HttpResponse, NlpError> {
    let text = request.into_inner().text;
    if text.trim().is_empty() {
        return Ok(HttpResponse::Ok().json(NerResponse { entities: vec![] }));
    }

    let entities = recognizer.recognize(&text).await.map_err(|e| {
        warn!(error = %e, "NER request failed");
        NlpError::Inference(e.to_string())
    })?;

    Ok(HttpResponse::Ok().json(NerResponse { entities }))
}

pub async fn extract_dates(
    extractor: web::Data<Arc<DateExtractor>>,
    request: web::Json<ExtractDatesRequest>,
) -> Result<HttpResponse> {
    let dates = extractor.extract_dates(&request.text).await;

    Ok(HttpResponse::Ok().json(ExtractDatesResponse {
        dates: dates.into_iter().collect(),
    }))
}
