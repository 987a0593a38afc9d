//! API client construction
//!
//! Builds one authenticated HTTP client per API family. Authentication is injected at the
//! transport layer as a default header, so call sites never build auth headers themselves.

use crate::error::CliError;
use crate::profile::Profile;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// API families exposed by the CLI, each mounted under its own path on the API root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiFamily {
    FastEdge,
    Cloud,
}

impl ApiFamily {
    /// Path appended to the API root outside local mode.
    pub fn path_suffix(self) -> &'static str {
        match self {
            ApiFamily::FastEdge => "/fastedge",
            ApiFamily::Cloud => "/cloud",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ApiFamily::FastEdge => "fastedge",
            ApiFamily::Cloud => "cloud",
        }
    }
}

impl fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A successful (2xx) response, body kept as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Decode the body. A payload that does not match the expected shape is reported as a
    /// request failure carrying the body, since it came from the server.
    pub fn json<T: DeserializeOwned>(&self, context: &str) -> Result<T, CliError> {
        serde_json::from_slice(&self.body).map_err(|e| CliError::Request {
            context: format!("{}: unexpected response ({})", context, e),
            status: self.status,
            body: String::from_utf8_lossy(&self.body).into_owned(),
        })
    }
}

/// Decoded payload plus the body it was decoded from.
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    pub value: T,
    pub body: Vec<u8>,
}

impl<T: DeserializeOwned> Decoded<T> {
    pub fn from_response(response: ApiResponse, context: &str) -> Result<Self, CliError> {
        let value = response.json(context)?;
        Ok(Self {
            value,
            body: response.body,
        })
    }
}

/// Authenticated client bound to one API family and one base URL.
pub struct ClientHandle {
    family: ApiFamily,
    base_url: String,
    http: Client,
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientHandle")
            .field("family", &self.family)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ClientHandle {
    pub fn family(&self) -> ApiFamily {
        self.family
    }

    /// Effective base URL, family suffix included unless built in local mode.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str, context: &str) -> Result<ApiResponse, CliError> {
        self.send(Method::GET, path, context, |req| req).await
    }

    pub async fn get_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
        context: &str,
    ) -> Result<ApiResponse, CliError> {
        self.send(Method::GET, path, context, |req| req.query(query))
            .await
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<ApiResponse, CliError> {
        self.send(Method::POST, path, context, |req| req.json(body))
            .await
    }

    pub async fn post_bytes(
        &self,
        path: &str,
        body: Vec<u8>,
        context: &str,
    ) -> Result<ApiResponse, CliError> {
        self.send(Method::POST, path, context, |req| {
            req.header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                .body(body)
        })
        .await
    }

    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<ApiResponse, CliError> {
        self.send(Method::PUT, path, context, |req| req.json(body))
            .await
    }

    pub async fn patch_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<ApiResponse, CliError> {
        self.send(Method::PATCH, path, context, |req| req.json(body))
            .await
    }

    pub async fn delete(&self, path: &str, context: &str) -> Result<ApiResponse, CliError> {
        self.send(Method::DELETE, path, context, |req| req).await
    }

    async fn send<F>(
        &self,
        method: Method,
        path: &str,
        context: &str,
        build: F,
    ) -> Result<ApiResponse, CliError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = self.url(path);
        debug!(family = %self.family, method = %method, path, "dispatching request");
        let request = build(self.http.request(method.clone(), &url));

        let response = request.send().await.map_err(|e| map_transport_error(context, e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| map_transport_error(context, e))?
            .to_vec();
        debug!(
            family = %self.family,
            method = %method,
            path,
            status = status.as_u16(),
            bytes = body.len(),
            "response received"
        );

        if !status.is_success() {
            return Err(CliError::Request {
                context: context.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn map_transport_error(context: &str, error: reqwest::Error) -> CliError {
    let message = if error.is_timeout() {
        format!("request timeout: {}", error)
    } else if error.is_connect() {
        format!("connection error: {}", error)
    } else {
        format!("HTTP error: {}", error)
    };
    CliError::Transport {
        context: context.to_string(),
        message,
    }
}

/// Builds [`ClientHandle`]s from a resolved profile.
pub struct ClientFactory;

impl ClientFactory {
    /// Build a client for `family` rooted at `base_url`. Local mode drops the family suffix.
    pub fn build(
        profile: &Profile,
        family: ApiFamily,
        base_url: &str,
        local: bool,
    ) -> Result<ClientHandle, CliError> {
        let effective = Self::effective_base_url(base_url, family, local);
        Url::parse(&effective).map_err(|e| {
            CliError::ClientInit(format!("invalid base URL '{}': {}", effective, e))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, Self::auth_header(profile)?);

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("gcore-cli/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CliError::ClientInit(e.to_string()))?;

        info!(family = %family, base_url = %effective, local, "API client ready");
        Ok(ClientHandle {
            family,
            base_url: effective,
            http,
        })
    }

    /// Base URL with the family suffix applied (or skipped in local mode).
    pub fn effective_base_url(base_url: &str, family: ApiFamily, local: bool) -> String {
        let root = base_url.trim_end_matches('/');
        if local {
            root.to_string()
        } else {
            format!("{}{}", root, family.path_suffix())
        }
    }

    /// `APIKey <key>` when an API key is set, otherwise `Bearer <token>`.
    fn auth_header(profile: &Profile) -> Result<HeaderValue, CliError> {
        let value = match (&profile.api_key, &profile.cloud_auth_token) {
            (Some(key), _) => format!("APIKey {}", key),
            (None, Some(token)) => format!("Bearer {}", token),
            (None, None) => {
                return Err(CliError::missing_credential(format!(
                    "profile '{}' has no api_key or cloud_auth_token",
                    profile.name
                )))
            }
        };
        let mut header = HeaderValue::from_str(&value).map_err(|e| {
            CliError::config(format!("credential contains invalid characters: {}", e))
        })?;
        header.set_sensitive(true);
        Ok(header)
    }
}
