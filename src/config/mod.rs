//! Typed client configuration.
//!
//! Loads once at startup from environment variables or a TOML file and is
//! then passed explicitly to every manager. Fails fast if required values
//! are missing. The access token is wrapped in secrecy::SecretString to
//! prevent log leaks.

pub mod secrets;

use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Default Box API root. Endpoint paths are joined onto it.
pub const DEFAULT_BASE_URI: &str = "https://api.box.com/2.0/";

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("box-v2-rust/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Smallest page size the events endpoint accepts.
pub const MIN_STREAM_LIMIT: u32 = 1;
/// Largest page size the events endpoint accepts.
pub const MAX_STREAM_LIMIT: u32 = 500;
/// Page size the server applies when `limit` is omitted.
pub const DEFAULT_STREAM_LIMIT: u32 = 100;

/// Inclusive bounds on the events page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StreamLimits {
    pub min: u32,
    pub max: u32,
}

impl StreamLimits {
    pub fn contains(&self, limit: u32) -> bool {
        (self.min..=self.max).contains(&limit)
    }

    /// Bounds must be non-empty, start at 1 or above, and admit
    /// [`DEFAULT_STREAM_LIMIT`], which callers send when they pick no limit.
    pub fn validate(self) -> Result<Self> {
        if self.min == 0 || self.min > self.max || !self.contains(DEFAULT_STREAM_LIMIT) {
            return Err(Error::Config(format!(
                "stream_limits must satisfy 1 <= min <= {DEFAULT_STREAM_LIMIT} <= max, got {}..={}",
                self.min, self.max
            )));
        }
        Ok(self)
    }
}

impl Default for StreamLimits {
    fn default() -> Self {
        Self {
            min: MIN_STREAM_LIMIT,
            max: MAX_STREAM_LIMIT,
        }
    }
}

#[derive(Debug)]
pub struct BoxConfig {
    pub base_uri: Url,
    pub access_token: SecretString,
    /// User id sent as `As-User` so an admin token acts on a user's behalf.
    pub as_user: Option<String>,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub stream_limits: StreamLimits,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

/// On-disk TOML layout. Everything except the token is optional.
#[derive(Debug, Deserialize)]
struct FileConfig {
    base_uri: Option<String>,
    access_token: String,
    as_user: Option<String>,
    user_agent: Option<String>,
    request_timeout_secs: Option<u64>,
    stream_limits: Option<StreamLimits>,
    otel_endpoint: Option<String>,
    log_level: Option<String>,
}

impl BoxConfig {
    /// Configuration with defaults for everything but the token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            base_uri: default_base_uri(),
            access_token: SecretString::from(access_token.into()),
            as_user: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            stream_limits: StreamLimits::default(),
            otel_endpoint: None,
            log_level: "info".to_string(),
        }
    }

    /// Point the client at a different API root (a proxy or a mock server).
    pub fn with_base_uri(mut self, uri: &str) -> Result<Self> {
        self.base_uri = parse_base_uri(uri)?;
        Ok(self)
    }

    pub fn with_as_user(mut self, user_id: impl Into<String>) -> Self {
        self.as_user = Some(user_id.into());
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Page-size bounds come from `BOX_STREAM_LIMIT_MIN` and
    /// `BOX_STREAM_LIMIT_MAX`; either may be set alone.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        let base_uri = match std::env::var("BOX_API_BASE_URI") {
            Ok(uri) => parse_base_uri(&uri)?,
            Err(_) => default_base_uri(),
        };
        let request_timeout = match std::env::var("BOX_REQUEST_TIMEOUT_SECS") {
            Ok(secs) => Duration::from_secs(secs.parse().map_err(|e| {
                Error::Config(format!("BOX_REQUEST_TIMEOUT_SECS is not a number: {e}"))
            })?),
            Err(_) => DEFAULT_REQUEST_TIMEOUT,
        };
        let defaults = StreamLimits::default();
        let stream_limits = StreamLimits {
            min: optional_u32_var("BOX_STREAM_LIMIT_MIN")?.unwrap_or(defaults.min),
            max: optional_u32_var("BOX_STREAM_LIMIT_MAX")?.unwrap_or(defaults.max),
        }
        .validate()?;

        Ok(Self {
            base_uri,
            access_token: SecretString::from(required_var("BOX_ACCESS_TOKEN")?),
            as_user: std::env::var("BOX_AS_USER").ok(),
            user_agent: std::env::var("BOX_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            request_timeout,
            stream_limits,
            otel_endpoint: std::env::var("OTEL_ENDPOINT").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: FileConfig =
            toml::from_str(content).map_err(|e| Error::Config(format!("bad config: {e}")))?;

        let stream_limits = file.stream_limits.unwrap_or_default().validate()?;

        Ok(Self {
            base_uri: match file.base_uri {
                Some(uri) => parse_base_uri(&uri)?,
                None => default_base_uri(),
            },
            access_token: SecretString::from(file.access_token),
            as_user: file.as_user,
            user_agent: file
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            request_timeout: file
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            stream_limits,
            otel_endpoint: file.otel_endpoint,
            log_level: file.log_level.unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read config {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// URI of the events endpoint.
    pub fn events_endpoint(&self) -> Result<Url> {
        self.endpoint("events")
    }

    /// Join a relative endpoint path onto the API root.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_uri
            .join(path)
            .map_err(|e| Error::Config(format!("cannot build endpoint {path}: {e}")))
    }
}

fn default_base_uri() -> Url {
    Url::parse(DEFAULT_BASE_URI).expect("DEFAULT_BASE_URI is a valid URL")
}

/// Parse an API root, forcing a trailing slash so `join` appends rather
/// than replaces the last segment.
fn parse_base_uri(uri: &str) -> Result<Url> {
    let normalized = if uri.ends_with('/') {
        uri.to_string()
    } else {
        format!("{uri}/")
    };
    Url::parse(&normalized).map_err(|e| Error::Config(format!("invalid base uri {uri}: {e}")))
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| Error::Config(format!("required environment variable {name} is not set")))
}

fn optional_u32_var(name: &str) -> Result<Option<u32>> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("{name} is not a number: {e}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn events_endpoint_joins_onto_base() {
        let config = BoxConfig::new("token");
        assert_eq!(
            config.events_endpoint().unwrap().as_str(),
            "https://api.box.com/2.0/events"
        );
    }

    #[test]
    fn base_uri_without_trailing_slash_keeps_last_segment() {
        let config = BoxConfig::new("token")
            .with_base_uri("http://localhost:8080/2.0")
            .unwrap();
        assert_eq!(
            config.events_endpoint().unwrap().as_str(),
            "http://localhost:8080/2.0/events"
        );
    }

    #[test]
    fn toml_config_applies_defaults() {
        let config = BoxConfig::from_toml_str(r#"access_token = "abc""#).unwrap();
        assert_eq!(config.access_token.expose_secret(), "abc");
        assert_eq!(config.base_uri.as_str(), DEFAULT_BASE_URI);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.stream_limits, StreamLimits::default());
        assert!(config.as_user.is_none());
    }

    #[test]
    fn toml_config_reads_all_fields() {
        let config = BoxConfig::from_toml_str(
            r#"
            base_uri = "http://127.0.0.1:9000/api"
            access_token = "abc"
            as_user = "12345"
            user_agent = "tests"
            request_timeout_secs = 5
            log_level = "debug"

            [stream_limits]
            min = 10
            max = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.base_uri.as_str(), "http://127.0.0.1:9000/api/");
        assert_eq!(config.as_user.as_deref(), Some("12345"));
        assert_eq!(config.user_agent, "tests");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.stream_limits, StreamLimits { min: 10, max: 250 });
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn toml_config_rejects_inverted_limits() {
        let result = BoxConfig::from_toml_str(
            r#"
            access_token = "abc"
            [stream_limits]
            min = 100
            max = 10
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn toml_config_rejects_limits_excluding_default() {
        for (min, max) in [(10, 50), (101, 500), (0, 500)] {
            let result = BoxConfig::from_toml_str(&format!(
                "access_token = \"abc\"\n[stream_limits]\nmin = {min}\nmax = {max}\n"
            ));
            assert!(matches!(result, Err(Error::Config(_))), "{min}..={max}");
        }
    }

    #[test]
    fn default_base_uri_parses() {
        assert_eq!(default_base_uri().as_str(), DEFAULT_BASE_URI);
    }

    #[test]
    fn toml_config_requires_token() {
        let result = BoxConfig::from_toml_str(r#"as_user = "1""#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn stream_limits_are_inclusive() {
        let limits = StreamLimits::default();
        assert!(limits.contains(MIN_STREAM_LIMIT));
        assert!(limits.contains(MAX_STREAM_LIMIT));
        assert!(!limits.contains(MIN_STREAM_LIMIT - 1));
        assert!(!limits.contains(MAX_STREAM_LIMIT + 1));
    }
}
