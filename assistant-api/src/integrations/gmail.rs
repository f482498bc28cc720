use anyhow::{Context, Result};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use mail_parser::MessageParser;
use serde::Deserialize;
use shared_types::EmailMessage;
use std::sync::Arc;
use tracing::debug;

use crate::helpers::credential_provider::CredentialProvider;

pub const GMAIL_API: &str = "https://gmail.googleapis.com/gmail/v1";

/// Gmail's `raw` field is base64url, with or without padding
const RAW_MESSAGE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Deserialize)]
struct MessageList {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMessage {
    id: String,
    thread_id: Option<String>,
    raw: String,
}

/// Read-only Gmail v1 client for the connected account
pub struct GmailClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialProvider>,
}

impl GmailClient {
    pub fn new(credentials: Arc<CredentialProvider>) -> Self {
        Self::with_base_url(credentials, GMAIL_API)
    }

    pub fn with_base_url(credentials: Arc<CredentialProvider>, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Ids of messages matching a Gmail search query, newest first
    pub async fn list_message_ids(&self, query: &str, max_results: u32) -> Result<Vec<String>> {
        let access_token = self.credentials.access_token().await?;

        let response = self
            .http
            .get(format!("{}/users/me/messages", self.base_url))
            .bearer_auth(access_token)
            .query(&[("q", query), ("maxResults", &max_results.to_string())])
            .send()
            .await
            .context("Failed to reach Gmail")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gmail returned {}: {}", status, body);
        }

        let list: MessageList = response
            .json()
            .await
            .context("Failed to parse Gmail message list")?;

        debug!(count = list.messages.len(), query = %query, "Listed Gmail messages");
        Ok(list.messages.into_iter().map(|m| m.id).collect())
    }

    pub async fn fetch_message(&self, id: &str) -> Result<EmailMessage> {
        let access_token = self.credentials.access_token().await?;

        let response = self
            .http
            .get(format!("{}/users/me/messages/{}", self.base_url, id))
            .bearer_auth(access_token)
            .query(&[("format", "raw")])
            .send()
            .await
            .context("Failed to reach Gmail")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gmail returned {} for message {}: {}", status, id, body);
        }

        let message: RawMessage = response
            .json()
            .await
            .with_context(|| format!("Failed to parse Gmail message {}", id))?;

        parse_raw_message(message.id, message.thread_id, &message.raw)
    }
}

/// Decode a base64url RFC 822 message and keep the subject and text body.
/// HTML-only messages are converted to plain text by the MIME parser.
pub fn parse_raw_message(id: String, thread_id: Option<String>, raw: &str) -> Result<EmailMessage> {
    let bytes = RAW_MESSAGE_ENGINE
        .decode(raw.trim())
        .with_context(|| format!("Message {} is not valid base64url", id))?;

    let parsed = MessageParser::default()
        .parse(&bytes)
        .with_context(|| format!("Failed to parse message {}", id))?;

    let subject = parsed.subject().map(|s| s.to_string());
    let body_text = parsed.body_text(0).map(|s| s.trim().to_string());

    Ok(EmailMessage {
        id,
        thread_id,
        subject,
        body_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(message: &str) -> String {
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(message)
    }

    #[test]
    fn test_parse_plain_text_message() {
        let raw = encode(
            "From: alice@example.com\r\n\
             To: bob@example.com\r\n\
             Subject: Dentist appointment\r\n\
             Content-Type: text/plain; charset=utf-8\r\n\
             \r\n\
             Your appointment is on 2024-03-15.\r\n",
        );

        let email = parse_raw_message("m1".to_string(), Some("t1".to_string()), &raw).unwrap();

        assert_eq!(email.id, "m1");
        assert_eq!(email.thread_id.as_deref(), Some("t1"));
        assert_eq!(email.subject.as_deref(), Some("Dentist appointment"));
        assert_eq!(email.body_text.as_deref(), Some("Your appointment is on 2024-03-15."));
    }

    #[test]
    fn test_parse_padded_input() {
        let raw = base64::engine::general_purpose::URL_SAFE.encode(
            "Subject: Hi\r\nContent-Type: text/plain\r\n\r\nBody\r\n",
        );

        let email = parse_raw_message("m2".to_string(), None, &raw).unwrap();
        assert_eq!(email.subject.as_deref(), Some("Hi"));
    }

    #[test]
    fn test_greek_subject_is_decoded() {
        let raw = encode(
            "Subject: =?UTF-8?B?zqPPhc69zqzOvc+EzrfPg863?=\r\n\
             Content-Type: text/plain; charset=utf-8\r\n\
             \r\n\
             Την Παρασκευή\r\n",
        );

        let email = parse_raw_message("m3".to_string(), None, &raw).unwrap();
        assert_eq!(email.subject.as_deref(), Some("Συνάντηση"));
        assert_eq!(email.body_text.as_deref(), Some("Την Παρασκευή"));
    }

    #[test]
    fn test_invalid_base64() {
        assert!(parse_raw_message("bad".to_string(), None, "!!!").is_err());
    }
}
