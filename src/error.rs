//! Error types for the Lacework SDK

use std::time::Duration;
use thiserror::Error;

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the SDK
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("unable to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors returned by the API or raised while talking to it.
///
/// Variants built from an HTTP response carry the request line and the
/// server's message, e.g. `[GET] https://demo.lacework.net/api/v2/Alerts\n  [500] ...`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized: access token rejected, check the API key and secret")]
    Unauthorized,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate limited, retry after {0:?}")]
    RateLimit(Duration),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("server error: {0}")]
    ServerError(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected API response: {0}")]
    InvalidResponse(String),

    #[error("unable to parse next page locator '{0}'")]
    MalformedCursor(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "unable to connect to the Lacework API".to_string()
        } else {
            err.to_string()
        };
        ApiError::Network(reason)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("unable to parse config: {0}")]
    ParseError(String),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("unable to save config: {0}")]
    SaveError(String),

    #[error("account cannot be empty")]
    MissingAccount,

    #[error("API key and secret are required to request an access token")]
    MissingApiKeys,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Windowed search parameter errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("window size cannot be greater than max history ({window_days} > {max_history_days} days)")]
    WindowExceedsHistory {
        window_days: u32,
        max_history_days: u32,
    },

    #[error("window size must be at least one day")]
    ZeroWindow,

    #[error("max history of {max_history_days} days reaches past the supported date range")]
    HistoryOutOfRange { max_history_days: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_points_at_credentials() {
        assert!(ApiError::Unauthorized.to_string().contains("API key"));
    }

    #[test]
    fn test_rate_limit_reports_delay() {
        let msg = ApiError::RateLimit(Duration::from_secs(30)).to_string();
        assert_eq!(msg, "rate limited, retry after 30s");
    }

    #[test]
    fn test_http_errors_keep_request_detail() {
        let detail = "[POST] https://demo.lacework.net/api/v2/Inventory/search\n  [500] boom";
        let err: Error = ApiError::ServerError(detail.to_string()).into();
        assert_eq!(err.to_string(), format!("server error: {}", detail));
    }

    #[test]
    fn test_malformed_cursor_names_locator() {
        let err = ApiError::MalformedCursor("NextPage/abc".to_string());
        assert_eq!(
            err.to_string(),
            "unable to parse next page locator 'NextPage/abc'"
        );
    }

    #[test]
    fn test_search_errors_are_transparent() {
        let err: Error = SearchError::WindowExceedsHistory {
            window_days: 10,
            max_history_days: 5,
        }
        .into();

        assert!(matches!(err, Error::Search(SearchError::WindowExceedsHistory { .. })));
        assert_eq!(
            err.to_string(),
            "window size cannot be greater than max history (10 > 5 days)"
        );

        let err: Error = SearchError::ZeroWindow.into();
        assert!(matches!(err, Error::Search(SearchError::ZeroWindow)));

        let err = SearchError::HistoryOutOfRange {
            max_history_days: 200_000_000,
        };
        assert!(err.to_string().starts_with("max history of 200000000 days"));
    }

    #[test]
    fn test_config_errors() {
        let err: Error = ConfigError::MissingAccount.into();
        assert_eq!(err.to_string(), "account cannot be empty");

        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("search: [window").unwrap_err();
        assert!(matches!(ConfigError::from(yaml_err), ConfigError::ParseError(_)));
    }
}
