use crate::config::ApiConfig;
use crate::integrations::inference::InferenceClient;
use actix_web::{web, HttpResponse, Result};
use shared_types::{ApiKeyConfig, SettingsResponse, UpdateApiKeysRequest};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct SettingsAppState {
    pub config: Arc<std::sync::RwLock<ApiConfig>>,
    pub config_path: PathBuf,
}

fn mask_api_key(key: &Option<String>) -> Option<String> {
    key.as_ref().map(|k| {
        let visible: String = k.chars().take(6).collect();
        let hidden = k.chars().count().saturating_sub(6);
        if hidden == 0 {
            return "*".repeat(visible.chars().count());
        }
        let masked = format!("{}{}", visible, "*".repeat(hidden));
        if masked.chars().count() > 40 {
            format!("{}...", masked.chars().take(37).collect::<String>())
        } else {
            masked
        }
    })
}

pub async fn get_settings(data: web::Data<SettingsAppState>) -> Result<HttpResponse> {
    let config = data.config.read().map_err(|e| {
        actix_web::error::ErrorInternalServerError(format!(
            "Failed to acquire config read lock: {}",
            e
        ))
    })?;

    let api_keys = vec![ApiKeyConfig {
        name: "inference".to_string(),
        key: mask_api_key(&config.inference.api_token),
        is_configured: config.inference.api_token.is_some(),
    }];

    let response = SettingsResponse {
        config_file_path: data.config_path.to_string_lossy().to_string(),
        api_keys,
        chat_model: config.inference.chat_model.clone(),
        ner_model: config.inference.ner_model.clone(),
    };

    Ok(HttpResponse::Ok().json(response))
}

pub async fn update_api_keys(
    data: web::Data<SettingsAppState>,
    inference: web::Data<Arc<InferenceClient>>,
    request: web::Json<UpdateApiKeysRequest>,
) -> Result<HttpResponse> {
    let token = request
        .into_inner()
        .inference_api_token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let config_clone = {
        let mut config = data.config.write().map_err(|e| {
            actix_web::error::ErrorInternalServerError(format!(
                "Failed to acquire config write lock: {}",
                e
            ))
        })?;
        config.inference.api_token = token.clone();
        config.clone()
    };

    config_clone.save(&data.config_path).map_err(|e| {
        actix_web::error::ErrorInternalServerError(format!("Failed to write config file: {}", e))
    })?;

    inference.set_api_token(token);

    info!("Updated inference API token in settings");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "path": data.config_path.to_string_lossy()
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[::core::prelude::v1::test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key(&None), None);
        assert_eq!(mask_api_key(&Some("abc".to_string())).as_deref(), Some("***"));
        assert_eq!(
            mask_api_key(&Some("hf_abcdefgh".to_string())).as_deref(),
            Some("hf_abc*****")
        );
        let long = mask_api_key(&Some("x".repeat(60))).unwrap();
        assert_eq!(long.len(), 40);
        assert!(long.ends_with("..."));
    }

    #[actix_web::test]
    async fn test_update_then_read_settings() {
        let dir = tempfile::tempdir().unwrap();
        let state = SettingsAppState {
            config: Arc::new(std::sync::RwLock::new(ApiConfig::default())),
            config_path: dir.path().join("api.toml"),
        };
        let inference = Arc::new(InferenceClient::new(Default::default()).unwrap());

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .app_data(web::Data::new(inference))
                .route("/settings", web::get().to(get_settings))
                .route("/settings/api-keys", web::post().to(update_api_keys)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/settings/api-keys")
            .set_json(serde_json::json!({ "inference_api_token": "hf_secret_token" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let saved = ApiConfig::from_file(&state.config_path).unwrap();
        assert_eq!(saved.inference.api_token.as_deref(), Some("hf_secret_token"));

        let req = test::TestRequest::get().uri("/settings").to_request();
        let body: SettingsResponse = test::call_and_read_body_json(&app, req).await;
        assert!(body.api_keys[0].is_configured);
        assert_eq!(body.api_keys[0].key.as_deref(), Some("hf_sec*********"));
    }
}
