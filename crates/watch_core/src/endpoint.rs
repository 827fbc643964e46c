use std::fmt;

use thiserror::Error;

/// Message shown next to the settings input when a save is rejected.
pub const ENDPOINT_HINT: &str = "Please enter a valid URL, starting with http:// or https://";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("endpoint is empty")]
    Empty,
    #[error("endpoint must start with http:// or https://")]
    MissingScheme,
    #[error("endpoint is not a valid url: {0}")]
    Malformed(String),
}

/// Base address of the backend, e.g. `https://bot.example.com`.
///
/// Always starts with `http://` or `https://` and never ends with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn parse(raw: &str) -> Result<Self, EndpointError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EndpointError::Empty);
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(EndpointError::MissingScheme);
        }
        let base = trimmed.strip_suffix('/').unwrap_or(trimmed);
        let parsed = url::Url::parse(base).map_err(|err| EndpointError::Malformed(err.to_string()))?;
        if parsed.host_str().is_none() {
            return Err(EndpointError::Malformed("missing host".to_string()));
        }
        Ok(Self(base.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Address of the live channel: `http` becomes `ws`, `https` becomes `wss`.
    pub fn live_url(&self) -> String {
        let rest = self.0.strip_prefix("http").unwrap_or(&self.0);
        format!("ws{rest}/ws")
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_strips_one_trailing_slash() {
        let endpoint = Endpoint::parse("  https://bot.example.com/ ").unwrap();
        assert_eq!(endpoint.as_str(), "https://bot.example.com");
    }

    #[test]
    fn rejects_missing_scheme_and_empty_input() {
        assert_eq!(Endpoint::parse("   "), Err(EndpointError::Empty));
        assert_eq!(
            Endpoint::parse("bot.example.com"),
            Err(EndpointError::MissingScheme)
        );
        assert_eq!(
            Endpoint::parse("ftp://bot.example.com"),
            Err(EndpointError::MissingScheme)
        );
    }

    #[test]
    fn rejects_scheme_without_host() {
        assert!(matches!(
            Endpoint::parse("http://"),
            Err(EndpointError::Malformed(_))
        ));
    }

    #[test]
    fn live_url_swaps_scheme() {
        let plain = Endpoint::parse("http://localhost:8000").unwrap();
        assert_eq!(plain.live_url(), "ws://localhost:8000/ws");

        let secure = Endpoint::parse("https://api.example.com").unwrap();
        assert_eq!(secure.live_url(), "wss://api.example.com/ws");
    }

    #[test]
    fn trailing_slash_does_not_leak_into_live_url() {
        let endpoint = Endpoint::parse("https://api.example.com/").unwrap();
        assert_eq!(endpoint.live_url(), "wss://api.example.com/ws");
    }
}
