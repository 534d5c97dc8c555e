//! JSON client for the remote `/api/v1` backend
//!
//! Every request carries the locale, a fresh request id and, when a session
//! exists, the bearer token and the user id. Non-2xx answers become
//! [`ApiError::Status`] with the most specific message the body offers.

use reqwest::{Client, Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    config::ClientConfig,
    error::{ApiError, ApiResult},
    locale::DEFAULT_LOCALE,
    session::SessionManager,
};

/// Header carrying a per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Header carrying the signed-in user id
pub const USER_ID_HEADER: &str = "X-User-Id";

/// HTTP client for the backend API
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    api_url: String,
    locale: String,
    session: SessionManager,
}

impl ApiClient {
    /// Create a client from the loaded configuration
    pub fn new(config: &ClientConfig, session: SessionManager) -> Self {
        Self::with_api_url(config.api_url(), &config.locale, session)
    }

    /// Create a client against an explicit API root (origin plus `/api/v1`)
    pub fn with_api_url(api_url: impl Into<String>, locale: &str, session: SessionManager) -> Self {
        let locale = locale.trim();
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            locale: if locale.is_empty() {
                DEFAULT_LOCALE.to_string()
            } else {
                locale.to_string()
            },
            session,
        }
    }

    /// Session the client reads credentials from
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// `GET` a path and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(self.request(Method::GET, path), Method::GET, path)
            .await
    }

    /// `GET` a path with URL-encoded query parameters
    pub async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path).query(query);
        self.send(builder, Method::GET, path).await
    }

    /// `POST` a JSON body
    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path).json(body);
        self.send(builder, Method::POST, path).await
    }

    /// `PUT` a JSON body
    pub async fn put_json<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PUT, path).json(body);
        self.send(builder, Method::PUT, path).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.api_url, path);
        let mut builder = self
            .http
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT_LANGUAGE, &self.locale)
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());

        match self.session.access_token() {
            Ok(Some(token)) if !token.is_empty() => builder = builder.bearer_auth(token),
            Ok(_) => {}
            Err(e) => warn!("Failed to read access token: {}", e),
        }

        match self.session.user_id() {
            Ok(Some(user_id)) if !user_id.is_empty() => {
                builder = builder.header(USER_ID_HEADER, user_id)
            }
            Ok(_) => {}
            Err(e) => warn!("Failed to read user id: {}", e),
        }

        builder
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        method: Method,
        path: &str,
    ) -> ApiResult<T> {
        info!("{} {}", method, path);

        let response = builder.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, path, e);
            ApiError::Transport(e)
        })?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(ApiError::Transport)?;
        // Empty or non-JSON bodies read as `{}`.
        let body: Value = serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Object(Default::default()));

        if !(200..300).contains(&status) {
            let message = extract_error_message(&body, status);
            debug!("{} {} answered {}: {}", method, path, status, message);
            return Err(ApiError::Status { status, message });
        }

        serde_json::from_value(body).map_err(|e| ApiError::Decode {
            status,
            message: e.to_string(),
        })
    }
}

/// Pick the user-facing message out of an error body
///
/// Tries `error.message`, then `detail`, then `message`, and falls back to
/// `Request failed (<status>)`.
pub fn extract_error_message(body: &Value, status: u16) -> String {
    body.pointer("/error/message")
        .and_then(Value::as_str)
        .or_else(|| body.get("detail").and_then(Value::as_str))
        .or_else(|| body.get("message").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed ({})", status))
}
