use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use assistant_api::config::{ApiConfig, TokenStorage};
use assistant_api::handlers;
use assistant_api::handlers::settings::SettingsAppState;
use assistant_api::helpers;
use assistant_api::helpers::credential_provider::CredentialProvider;
use assistant_api::helpers::google_oauth::GoogleOAuthClient;
use assistant_api::helpers::oauth_state::OAuthStateManager;
use assistant_api::helpers::token_store::{FileTokenStore, KeyringTokenStore, TokenStore};
use assistant_api::integrations::gmail::GmailClient;
use assistant_api::integrations::google_calendar::GoogleCalendarClient;
use assistant_api::integrations::inference::{ChatModel, InferenceClient};
use assistant_api::jobs::event_sync::EmailEventSync;
use clap::Parser;
use extractors::{DateExtractor, EntityRecognizer};
use std::sync::Arc;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,
}

fn init_tracing(log_file_path: Option<String>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("assistant-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file_path);

    // Load config
    let (config, config_path) =
        ApiConfig::load().map_err(|e| startup_error("Failed to load config", e))?;
    tracing::info!("Loaded config from {:?}", config_path);

    // Initialize database
    let db = helpers::database::initialize_database()
        .map_err(|e| startup_error("Failed to initialize database", e))?;
    if let Ok(db_path) = helpers::database::get_db_path() {
        tracing::info!("Database initialized at: {:?}", db_path);
    }

    let (host, port) = config.bind_address();
    tracing::info!("Server will listen on {}:{}", host, port);

    // Google OAuth and token storage
    let google_oauth_config = config.google_oauth.clone().unwrap_or_default();
    if google_oauth_config.client_id.is_empty() {
        tracing::warn!(
            "No Google OAuth client_id in {:?}; Calendar and Gmail features stay disconnected",
            config_path
        );
    }
    let redirect_uri = google_oauth_config
        .redirect_uri
        .clone()
        .unwrap_or_else(|| format!("http://{}:{}/api/oauth/google/callback", host, port));
    let oauth_client = Arc::new(
        GoogleOAuthClient::new(
            &google_oauth_config.client_id,
            google_oauth_config.client_secret.as_deref(),
            &redirect_uri,
        )
        .map_err(|e| startup_error("Failed to initialize OAuth client", e))?,
    );

    let token_store: Box<dyn TokenStore> = match config.storage.token_store {
        TokenStorage::File => {
            let token_path = helpers::database::get_token_path()
                .map_err(|e| startup_error("Failed to resolve token path", e))?;
            tracing::info!("Storing Google tokens in {:?}", token_path);
            Box::new(FileTokenStore::new(token_path))
        }
        TokenStorage::Keyring => {
            tracing::info!("Storing Google tokens in the OS keychain");
            Box::new(KeyringTokenStore::new(google_oauth_config.client_id.clone()))
        }
    };

    let credentials = Arc::new(CredentialProvider::new(oauth_client, token_store));
    let state_manager = Arc::new(OAuthStateManager::new());

    if credentials.is_connected() {
        tracing::info!("Google account connected");
    }

    // Model inference
    let inference = Arc::new(
        InferenceClient::new(config.inference.clone())
            .map_err(|e| startup_error("Failed to initialize inference client", e))?,
    );
    let chat_model: Arc<dyn ChatModel> = inference.clone();
    let recognizer: Arc<dyn EntityRecognizer> = inference.clone();
    let extractor = Arc::new(DateExtractor::with_default_parser(recognizer.clone()));

    // Google APIs and the email sync job
    let gmail = Arc::new(GmailClient::new(credentials.clone()));
    let calendar = Arc::new(GoogleCalendarClient::new(credentials.clone()));
    let event_sync = Arc::new(EmailEventSync::new(
        db.async_connection.clone(),
        gmail,
        calendar.clone(),
        extractor.clone(),
    ));

    if let Some(interval_secs) = config.sync.interval_secs.filter(|secs| *secs > 0) {
        tracing::info!("Syncing events from email every {} seconds", interval_secs);
        let sync = event_sync.clone();
        let query = config.sync.query.clone();
        let max_emails = config.sync.max_emails;
        tokio::spawn(async move {
            // Give the server a moment to come up first
            tokio::time::sleep(std::time::Duration::from_secs(2)).await;
            sync.run_periodic(
                std::time::Duration::from_secs(interval_secs),
                query,
                max_emails,
            )
            .await;
        });
    }

    let settings_state = SettingsAppState {
        config: Arc::new(std::sync::RwLock::new(config.clone())),
        config_path,
    };

    tracing::info!("Starting server on {}:{}", host, port);

    let event_sync_for_server = event_sync.clone();
    let server = HttpServer::new(move || {
        // Configure CORS
        let cors = if let Some(cors_config) = &config.cors {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(settings_state.clone()))
            .app_data(web::Data::new(credentials.clone()))
            .app_data(web::Data::new(state_manager.clone()))
            .app_data(web::Data::new(inference.clone()))
            .app_data(web::Data::new(chat_model.clone()))
            .app_data(web::Data::new(recognizer.clone()))
            .app_data(web::Data::new(extractor.clone()))
            .app_data(web::Data::new(calendar.clone()))
            .app_data(web::Data::new(event_sync_for_server.clone()))
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run();

    let handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }

        tracing::info!("Ctrl+C received, shutting down...");
        event_sync.shutdown();

        handle.stop(true).await;
    });

    server.await
}
