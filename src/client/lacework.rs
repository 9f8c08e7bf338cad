//! Lacework API v2 client implementation

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::{debug, info};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use super::ApiTransport;
use super::api::{AlertsService, EntitiesService, InventoryService, VulnerabilitiesService};
use super::pagination::{self, Pageable};
use crate::config::{Config, SearchSettings};
use crate::error::{ApiError, ConfigError, Error, Result};

/// Path used to exchange API keys for an access token
pub const API_TOKENS_PATH: &str = "/api/v2/access/tokens";

/// Lifetime requested for new access tokens, in seconds
const DEFAULT_TOKEN_EXPIRY_SECS: u64 = 3600;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client-side request rate
const RATE_LIMIT_PER_SECOND: u32 = 10;

/// Access token issued by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Lacework API client
pub struct LaceworkClient {
    http: HttpClient,
    base_url: String,
    subaccount: Option<String>,
    search: SearchSettings,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    auth_state: Arc<RwLock<AuthState>>,
}

/// Internal authentication state
#[derive(Debug, Clone, Default)]
struct AuthState {
    api_key: Option<String>,
    api_secret: Option<String>,
    token: Option<String>,
    /// `None` for tokens supplied by the caller, which are never refreshed
    expires_at: Option<DateTime<Utc>>,
}

/// Builder for [`LaceworkClient`]
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    account: String,
    subaccount: Option<String>,
    api_key: Option<String>,
    api_secret: Option<String>,
    token: Option<String>,
    base_url: Option<String>,
    timeout: Duration,
    search: SearchSettings,
}

impl ClientBuilder {
    fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            subaccount: None,
            api_key: None,
            api_secret: None,
            token: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            search: SearchSettings::default(),
        }
    }

    /// Set the API key pair used to request access tokens
    pub fn api_keys(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self.api_secret = Some(secret.into());
        self
    }

    /// Use a pre-issued access token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the base URL (`https://<account>.lacework.net` by default)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Scope requests to a sub-account
    pub fn subaccount(mut self, subaccount: impl Into<String>) -> Self {
        self.subaccount = Some(subaccount.into()).filter(|s: &String| !s.is_empty());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the limits used by windowed searches
    pub fn search_settings(mut self, search: SearchSettings) -> Self {
        self.search = search;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<LaceworkClient> {
        let account = account_name(&self.account);
        if account.is_empty() {
            return Err(ConfigError::MissingAccount.into());
        }
        self.search.validate()?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| format!("https://{}.lacework.net", account))
            .trim_end_matches('/')
            .to_string();

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(format!("lacework-sdk-rs/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let quota = Quota::per_second(
            NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN),
        );

        info!(
            "API client created: url={} timeout={:?} subaccount={:?}",
            base_url, self.timeout, self.subaccount
        );

        Ok(LaceworkClient {
            http,
            base_url,
            subaccount: self.subaccount,
            search: self.search,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
            auth_state: Arc::new(RwLock::new(AuthState {
                api_key: self.api_key,
                api_secret: self.api_secret,
                token: self.token,
                expires_at: None,
            })),
        })
    }
}

/// Accept either `demo` or the fully qualified `demo.lacework.net`
fn account_name(account: &str) -> &str {
    let account = account.trim();
    let account = account
        .strip_prefix("https://")
        .or_else(|| account.strip_prefix("http://"))
        .unwrap_or(account);
    account
        .split_once(".lacework.net")
        .map_or(account, |(name, _)| name)
}

impl LaceworkClient {
    /// Start building a client for `account`
    pub fn builder(account: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(account)
    }

    /// Create a client from a loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut builder = Self::builder(&config.account)
            .timeout(Duration::from_secs(config.timeout_secs))
            .search_settings(config.search);
        if let (Some(key), Some(secret)) = (&config.api_key, &config.api_secret) {
            builder = builder.api_keys(key, secret);
        }
        if let Some(subaccount) = &config.subaccount {
            builder = builder.subaccount(subaccount);
        }
        if let Some(url) = &config.api_url {
            builder = builder.base_url(url);
        }
        builder.build()
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Limits used by windowed searches
    pub fn search_settings(&self) -> SearchSettings {
        self.search
    }

    /// Fetch the page following `pageable` into it. See [`pagination::next_page`].
    pub async fn next_page<P: Pageable>(&self, pageable: &mut P) -> Result<bool> {
        pagination::next_page(self, pageable).await
    }

    pub fn alerts(&self) -> AlertsService<'_> {
        AlertsService::new(self)
    }

    pub fn entities(&self) -> EntitiesService<'_> {
        EntitiesService::new(self)
    }

    pub fn inventory(&self) -> InventoryService<'_> {
        InventoryService::new(self).with_settings(self.search)
    }

    pub fn vulnerabilities(&self) -> VulnerabilitiesService<'_> {
        VulnerabilitiesService::new(self)
    }

    /// Store an access token and its expiry
    pub async fn set_token(&self, token: AccessToken) {
        let mut state = self.auth_state.write().await;
        state.token = Some(token.token);
        state.expires_at = Some(token.expires_at);
    }

    /// Exchange the API key pair for a new access token
    pub async fn generate_token(&self) -> Result<AccessToken> {
        let (key_id, secret) = {
            let state = self.auth_state.read().await;
            match (&state.api_key, &state.api_secret) {
                (Some(key), Some(secret)) => (key.clone(), secret.clone()),
                _ => return Err(ConfigError::MissingApiKeys.into()),
            }
        };

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct TokenRequest<'a> {
            key_id: &'a str,
            expiry_time: u64,
        }

        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, API_TOKENS_PATH);
        debug!("Requesting access token from {}", url);
        let response = self
            .http
            .post(&url)
            .header("X-LW-UAKS", secret)
            .json(&TokenRequest {
                key_id: &key_id,
                expiry_time: DEFAULT_TOKEN_EXPIRY_SECS,
            })
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized.into());
        }
        if !status.is_success() {
            return Err(status_error(&Method::POST, &url, status, &text, None).into());
        }

        let token: AccessToken = serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse token response: {}", e))
        })?;
        self.set_token(token.clone()).await;
        Ok(token)
    }

    /// Check if the token is missing or will expire soon (within 5 minutes)
    async fn is_token_expired(&self) -> bool {
        let state = self.auth_state.read().await;
        match (&state.token, state.expires_at) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(_), Some(expires_at)) => expires_at - chrono::Duration::minutes(5) < Utc::now(),
        }
    }

    async fn has_api_keys(&self) -> bool {
        let state = self.auth_state.read().await;
        state.api_key.is_some() && state.api_secret.is_some()
    }

    /// Get the current token, requesting a new one if necessary
    async fn valid_token(&self) -> Result<String> {
        if self.is_token_expired().await {
            self.generate_token().await?;
        }

        let state = self.auth_state.read().await;
        state.token.clone().ok_or(ApiError::Unauthorized.into())
    }

    async fn request_inner(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        self.rate_limiter.until_ready().await;

        let token = self.valid_token().await?;

        let url = format!("{}{}", self.base_url, path);
        debug!("Request: [{}] {}", method, url);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/json");
        if let Some(subaccount) = &self.subaccount {
            request = request.header("Account-Name", subaccount);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response: {}", e)))?;
        debug!("Response: [{}] {} ({} bytes)", status.as_u16(), url, text.len());

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text).map_err(|e| {
                ApiError::InvalidResponse(format!("Failed to parse response: {}", e)).into()
            });
        }

        Err(status_error(&method, &url, status, &text, retry_after).into())
    }
}

#[async_trait]
impl ApiTransport for LaceworkClient {
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        // A token minted during this attempt is not refreshed again on 401
        let cached_token = !self.is_token_expired().await;
        let result = self.request_inner(method.clone(), path, body).await;

        if matches!(result, Err(Error::Api(ApiError::Unauthorized)))
            && cached_token
            && self.has_api_keys().await
        {
            debug!("Access token rejected, requesting a new one");
            self.generate_token().await?;
            return self.request_inner(method, path, body).await;
        }

        result
    }
}

/// Map a non-success status to an error carrying the server's message
fn status_error(
    method: &Method,
    url: &str,
    status: StatusCode,
    body: &str,
    retry_after: Option<u64>,
) -> ApiError {
    let detail = format!(
        "[{}] {}\n  [{}] {}",
        method,
        url,
        status.as_u16(),
        error_message(body)
    );

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::FORBIDDEN => ApiError::Forbidden(detail),
        StatusCode::NOT_FOUND => ApiError::NotFound(detail),
        StatusCode::TOO_MANY_REQUESTS => {
            ApiError::RateLimit(Duration::from_secs(retry_after.unwrap_or(60)))
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ApiError::BadRequest(detail),
        status if status.is_server_error() => ApiError::ServerError(detail),
        _ => ApiError::InvalidResponse(detail),
    }
}

/// Extract the most specific message from an error body
fn error_message(body: &str) -> String {
    let fallback = || body.trim().to_string();

    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };

    let data = value.get("data");
    ["statusMessage", "message", "Message"]
        .iter()
        .find_map(|field| data.and_then(|d| d.get(*field)).and_then(Value::as_str))
        .or_else(|| value.get("message").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(fallback)
}
