//! Client configuration: server address, bearer token and save debounce.

use crate::client::error::ClientError;
use std::time::Duration;
use url::Url;

/// Default server URL
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

pub const SERVER_URL_ENV: &str = "NOTES_SERVER_URL";
pub const TOKEN_ENV: &str = "NOTES_TOKEN";

/// Quiet period after the last edit before a note is saved
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    server_url: Url,
    token: Option<String>,
    save_debounce: Duration,
}

impl ClientConfig {
    /// Create a configuration for an `http(s)://` server address
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        let server_url = Url::parse(server_url).map_err(|e| ClientError::InvalidUrl {
            url: server_url.to_string(),
            message: e.to_string(),
        })?;
        if !matches!(server_url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl {
                url: server_url.to_string(),
                message: "expected an http or https URL".to_string(),
            });
        }
        Ok(Self {
            server_url,
            token: None,
            save_debounce: DEFAULT_SAVE_DEBOUNCE,
        })
    }

    /// Read `NOTES_SERVER_URL` and `NOTES_TOKEN`
    pub fn from_env() -> Result<Self, ClientError> {
        let server_url = std::env::var(SERVER_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let mut config = Self::new(server_url.trim())?;
        config.set_token(std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()));
        Ok(config)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_save_debounce(mut self, debounce: Duration) -> Self {
        self.save_debounce = debounce;
        self
    }

    /// Set the JWT token
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Get the JWT token
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Clear the token (logout)
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn server_url(&self) -> &str {
        self.server_url.as_str().trim_end_matches('/')
    }

    pub fn save_debounce(&self) -> Duration {
        self.save_debounce
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    /// Socket endpoint, `ws(s)://<server>/ws`, carrying the token as a query
    /// parameter since upgrade requests cannot set headers in browsers
    pub fn ws_url(&self) -> Result<Url, ClientError> {
        let mut url = self.server_url.clone();
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme).map_err(|_| ClientError::InvalidUrl {
            url: self.server_url.to_string(),
            message: format!("cannot switch scheme to {}", scheme),
        })?;

        let path = format!("{}/ws", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url.set_query(None);
        if let Some(token) = &self.token {
            url.query_pairs_mut().append_pair("token", token);
        }
        Ok(url)
    }
}
