use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::database::Database;
use crate::helpers::credential_provider::CredentialProvider;

pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the AI-powered Smart Assistant API!"
    }))
}

pub async fn health(
    db: web::Data<Arc<Database>>,
    credentials: web::Data<Arc<CredentialProvider>>,
) -> impl Responder {
    let google = if credentials.is_connected() {
        "connected"
    } else {
        "not_connected"
    };

    if db.ping().await {
        HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected",
            "google": google
        }))
    } else {
        HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "unhealthy",
            "database": "disconnected",
            "google": google
        }))
    }
}
