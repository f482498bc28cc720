use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ApiConfig {
    pub cors: Option<CorsConfig>,
    pub server: Option<ServerConfig>,
    #[serde(default)]
    pub inference: InferenceConfig,
    pub google_oauth: Option<GoogleOAuthConfig>,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Hosted model inference, Hugging Face Inference API compatible
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InferenceConfig {
    #[serde(default = "default_inference_url")]
    pub base_url: String,
    pub api_token: Option<String>,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_ner_model")]
    pub ner_model: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_inference_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_chat_model() -> String {
    "facebook/blenderbot-400M-distill".to_string()
}

fn default_ner_model() -> String {
    "dbmdz/bert-large-cased-finetuned-conll03-english".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_inference_url(),
            api_token: None,
            chat_model: default_chat_model(),
            ner_model: default_ner_model(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SyncConfig {
    /// Periodic email sync is off when unset
    pub interval_secs: Option<u64>,
    #[serde(default = "default_max_emails")]
    pub max_emails: u32,
    #[serde(default = "default_query")]
    pub query: String,
}

fn default_max_emails() -> u32 {
    20
}

fn default_query() -> String {
    "newer_than:7d".to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: None,
            max_emails: default_max_emails(),
            query: default_query(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    #[default]
    File,
    Keyring,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub token_store: TokenStorage,
}

impl ApiConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let config = Self::from_file(&config_path)?;
        Ok((config, config_path))
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .build()?
            .try_deserialize()
    }

    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    /// Host and port, falling back to 127.0.0.1:8080
    pub fn bind_address(&self) -> (String, u16) {
        match &self.server {
            Some(server) => (server.host.clone(), server.port),
            None => ("127.0.0.1".to_string(), 8080),
        }
    }
}

const DEFAULT_CONFIG: &str = r#"
[cors]
allowed_origins = ["http://localhost:3000"]

[server]
host = "127.0.0.1"
port = 8080

[inference]
base_url = "https://api-inference.huggingface.co"
# api_token = "hf_..."
chat_model = "facebook/blenderbot-400M-distill"
ner_model = "dbmdz/bert-large-cased-finetuned-conll03-english"
timeout_ms = 30000

[google_oauth]
# Google Cloud Console OAuth2 client for Calendar and Gmail
client_id = ""
# client_secret = "..."
# redirect_uri = "http://127.0.0.1:8080/api/oauth/google/callback"

[sync]
# interval_secs = 300
max_emails = 20
query = "newer_than:7d"

[storage]
# "file" keeps tokens in token.json under the data directory, "keyring" uses the OS keychain
token_store = "file"
"#;

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("smart-assistant").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
