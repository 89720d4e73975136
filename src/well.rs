//! Well API client.
//!
//! The Well is the private service entries are filed into. Submission is
//! a single authenticated POST; the trait exists so the conversation flow
//! can be exercised against a recording mock in tests.

use crate::config::WellConfig;
use crate::entry::NewEntry;
use crate::error::WellError;
use async_trait::async_trait;
use std::time::Duration;

/// Result of a successful submission: HTTP status plus response text,
/// both relayed back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub status: u16,
    pub body: String,
}

/// Submission seam for the Well API.
#[async_trait]
pub trait WellApi: Send + Sync {
    /// Submit one entry. Non-2xx responses and transport failures are
    /// errors; there is no automatic retry.
    async fn submit(&self, entry: &NewEntry) -> Result<Receipt, WellError>;
}

/// HTTP client for the Well API.
pub struct WellClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl WellClient {
    /// Create a client from configuration.
    pub fn new(config: &WellConfig) -> Result<Self, WellError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl WellApi for WellClient {
    async fn submit(&self, entry: &NewEntry) -> Result<Receipt, WellError> {
        tracing::debug!(entry_type = entry.entry_type.as_str(), "submitting entry");

        let response = self
            .http
            .post(&self.url)
            .header("X-API-Key", &self.api_key)
            .json(entry)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(WellError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Receipt {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryType;

    #[test]
    fn test_client_from_config() {
        let config = WellConfig {
            url: "https://well.example.org/entries".to_string(),
            api_key: "secret".to_string(),
            timeout_seconds: 5,
        };

        let client = WellClient::new(&config).unwrap();
        assert_eq!(client.url, "https://well.example.org/entries");
        assert_eq!(client.api_key, "secret");
    }

    #[test]
    fn test_rejection_message_names_status() {
        let err = WellError::Rejected {
            status: 403,
            body: "bad key".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("403"));
        assert!(text.contains("bad key"));
    }

    #[test]
    fn test_submission_payload_shape() {
        let entry = NewEntry::new(EntryType::Bookmark, "https://example.org");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"type":"bookmark","body":"https://example.org"}"#);
    }
}
