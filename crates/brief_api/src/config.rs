use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Where the backend lives and how patient the client is.
///
/// The effective base is the host part concatenated with the webhook path
/// prefix, mirroring how the n8n deployment is addressed. Only the document
/// generation call carries a deadline; every other operation is unbounded.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub webhook_path: String,
    pub generate_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5678".to_string(),
            webhook_path: "/webhook".to_string(),
            generate_timeout: Duration::from_secs(120),
        }
    }
}

impl ApiSettings {
    /// Validates the two configured URL parts once, at startup, so a bad
    /// address fails with a clear diagnostic instead of surfacing as a
    /// transport error on the first request.
    pub fn resolve(base_url: &str, webhook_path: &str) -> Result<Self, ConfigError> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        let parsed = Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                url: base_url.to_string(),
            });
        }
        let webhook_path = webhook_path.trim();
        if !webhook_path.is_empty() && !webhook_path.starts_with('/') {
            return Err(ConfigError::RelativeWebhookPath {
                path: webhook_path.to_string(),
            });
        }
        Ok(Self {
            base_url: base_url.to_string(),
            webhook_path: webhook_path.to_string(),
            ..Self::default()
        })
    }

    /// Full URL for an API path such as `/api/projects`.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url.trim_end_matches('/'),
            self.webhook_path,
            path
        )
    }
}

/// Rejected backend address, raised before any request goes out.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("the backend base URL is empty")]
    EmptyBaseUrl,
    #[error("the backend base URL {url:?} does not parse: {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("the backend base URL {url:?} must use http or https")]
    UnsupportedScheme { url: String },
    #[error("the webhook path {path:?} must start with '/'")]
    RelativeWebhookPath { path: String },
}
