use std::env;
use std::time::Duration;

use async_trait::async_trait;
use learn_core::model::{Module, decode_modules};
use reqwest::Client;
use storage::{ModuleSource, SourceError};
use url::Url;

use crate::error::RemoteContentError;

/// Feed fetched when `LEARN_REMOTE_URL` is not set.
pub const DEFAULT_REMOTE_URL: &str =
    "https://raw.githubusercontent.com/christopherplain/learning-app-data/main/data2.json";

/// Upper bound on one feed request, connect through body.
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteContentConfig {
    pub url: Url,
    pub timeout: Duration,
}

impl RemoteContentConfig {
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Parse a feed URL.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if `raw` is not an absolute URL.
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        Url::parse(raw.trim()).map(Self::new)
    }

    /// Read the remote feed settings from the environment.
    ///
    /// Returns `None` when `LEARN_REMOTE_DISABLED` is truthy or the configured
    /// URL does not parse. `LEARN_REMOTE_TIMEOUT_SECS` overrides the request
    /// timeout.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        if env::var("LEARN_REMOTE_DISABLED").is_ok_and(|value| is_truthy(&value)) {
            return None;
        }
        let raw = env::var("LEARN_REMOTE_URL").unwrap_or_else(|_| DEFAULT_REMOTE_URL.into());
        match Self::parse(&raw) {
            Ok(config) => Some(match env::var("LEARN_REMOTE_TIMEOUT_SECS") {
                Ok(secs) => config.with_timeout(parse_timeout(&secs)),
                Err(_) => config,
            }),
            Err(err) => {
                tracing::warn!(url = %raw, error = %err, "ignoring invalid remote content url");
                None
            }
        }
    }
}

fn parse_timeout(raw: &str) -> Duration {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        _ => {
            tracing::warn!(value = %raw, "ignoring invalid remote timeout");
            DEFAULT_REMOTE_TIMEOUT
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Fetches the module feed over HTTP. One request per call, no retries.
#[derive(Clone, Debug)]
pub struct RemoteContentService {
    client: Client,
    config: Option<RemoteContentConfig>,
}

impl RemoteContentService {
    #[must_use]
    pub fn new(config: Option<RemoteContentConfig>) -> Self {
        Self::with_client(Client::new(), config)
    }

    #[must_use]
    pub fn with_client(client: Client, config: Option<RemoteContentConfig>) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Fetch and decode the remote module feed.
    ///
    /// # Errors
    ///
    /// Returns `RemoteContentError` when the service is disabled, the request
    /// fails or returns a non-success status, or the body is not a module feed.
    pub async fn fetch_modules(&self) -> Result<Vec<Module>, RemoteContentError> {
        let config = self
            .config
            .as_ref()
            .ok_or(RemoteContentError::Disabled)?;

        let response = self
            .client
            .get(config.url.clone())
            .timeout(config.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RemoteContentError::HttpStatus(response.status()));
        }

        let body = response.bytes().await?;
        Ok(decode_modules(&body)?)
    }
}

#[async_trait]
impl ModuleSource for RemoteContentService {
    fn name(&self) -> &str {
        "remote"
    }

    async fn fetch_modules(&self) -> Result<Vec<Module>, SourceError> {
        RemoteContentService::fetch_modules(self)
            .await
            .map_err(SourceError::from)
    }
}
