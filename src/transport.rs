//! HTTP seam between the polling logic and the network.
//!
//! [`HttpTransport`] is the default, backed by `reqwest` with redirects
//! disabled so the submission's `Location` header can be read directly.
//! Timeouts are applied by the caller, so implementations don't need their own.

use std::future::Future;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE, LOCATION, USER_AGENT};
use reqwest::{redirect, Client, Method, Url};

use crate::error::{BingError, Result};

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0";

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "en,es;q=0.9,en-US;q=0.8";

/// A cookie-authenticated request to Bing.
#[derive(Debug, Clone)]
pub struct BingRequest {
    pub method: Method,
    pub url: Url,
    /// Raw `_U` cookie value, without the `_U=` prefix.
    pub cookie: String,
}

/// The parts of a Bing response the client looks at.
#[derive(Debug, Clone, Default)]
pub struct BingResponse {
    pub status: u16,
    pub status_text: String,
    pub location: Option<String>,
    pub body: String,
}

impl BingResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends [`BingRequest`]s. Must not follow redirects.
pub trait Transport: Send + Sync {
    fn send(&self, request: BingRequest) -> impl Future<Output = Result<BingResponse>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(&self, request: BingRequest) -> impl Future<Output = Result<BingResponse>> + Send {
        (**self).send(request)
    }
}

/// Default transport built on `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Create a transport with browser-like default headers and no redirects.
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE));

        let http = Client::builder()
            .default_headers(headers)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| BingError::Network {
                context: "Failed to build HTTP client".into(),
                source: e,
            })?;
        Ok(Self { http })
    }

    /// Use a custom `reqwest::Client` (for proxies or TLS settings).
    ///
    /// The client must be built with `redirect::Policy::none()`, otherwise
    /// submissions will look like authentication failures.
    pub fn with_http_client(client: Client) -> Self {
        Self { http: client }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: BingRequest) -> Result<BingResponse> {
        let cookie = HeaderValue::from_str(&format!("_U={}", request.cookie)).map_err(|_| {
            BingError::InvalidArgument("Cookie contains characters not allowed in a header".into())
        })?;

        let resp = self
            .http
            .request(request.method.clone(), request.url.clone())
            .header(COOKIE, cookie)
            .send()
            .await
            .map_err(|e| BingError::Network {
                context: format!("{} {} failed", request.method, request.url.path()),
                source: e,
            })?;

        let status = resp.status();
        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = resp.text().await.map_err(|e| BingError::Network {
            context: "Failed to read Bing response body".into(),
            source: e,
        })?;

        Ok(BingResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            location,
            body,
        })
    }
}
