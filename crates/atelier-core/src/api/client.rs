//! HTTP transport for the content administration API.
//!
//! `ApiClient` resolves request paths against the configured base, attaches
//! the bearer token, serializes the payload and hands the response to the
//! classifier. Transport failures on explicit `http`/`https` URLs are retried
//! once with the other scheme.

use std::sync::Arc;

use anyhow::Result;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::access::{CredentialAccessor, Navigator};
use super::classify::ResponseClassifier;
use super::refresh::{RefreshOutcome, RefreshTask};
use super::url::{append_query, build_url, flip_scheme, has_http_scheme};
use super::ApiError;
use crate::auth::token::is_expiring_soon;
use crate::config::ClientConfig;
use crate::models::{ServerEnvelope, UploadFile, UPLOAD_FIELD};

/// What a request carries.
#[derive(Debug, Clone, Default)]
pub enum Payload {
    #[default]
    Empty,
    /// Query string for GET, JSON body otherwise.
    Json(Value),
    /// Multipart body, every file under the `file` field.
    Files(Vec<UploadFile>),
}

#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub payload: Payload,
    /// Applied last, so they override the defaults.
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            payload: Payload::Empty,
            headers: HeaderMap::new(),
        }
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn json(mut self, data: Value) -> Self {
        self.payload = Payload::Json(data);
        self
    }

    pub fn files(mut self, files: Vec<UploadFile>) -> Self {
        self.payload = Payload::Files(files);
        self
    }

    pub fn header(mut self, name: header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// A request ready to be sent, possibly more than once.
struct PreparedRequest {
    method: Method,
    headers: HeaderMap,
    body: PreparedBody,
}

enum PreparedBody {
    None,
    Json(String),
    Files(Vec<UploadFile>),
}

struct ClientInner {
    http: Client,
    config: ClientConfig,
    credentials: Arc<dyn CredentialAccessor>,
    navigator: Arc<dyn Navigator>,
    refresh: Arc<RefreshTask>,
}

/// API client for the content administration backend.
/// Clone is cheap - all clones share one connection pool, credential accessor
/// and refresh task.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    pub fn new(
        config: ClientConfig,
        credentials: Arc<dyn CredentialAccessor>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let verify_url = build_url(&config.verify_path, &config.api_base, &config.origin);
        let refresh = Arc::new(RefreshTask::new(
            http.clone(),
            verify_url,
            config.refresh_header.clone(),
            credentials.clone(),
        ));

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                config,
                credentials,
                navigator,
                refresh,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.inner.navigator
    }

    /// Absolute URL for a request path.
    pub fn build_url(&self, path: &str) -> String {
        let config = &self.inner.config;
        build_url(path, &config.api_base, &config.origin)
    }

    /// Revalidate the token now. Concurrent calls share one verification request.
    pub async fn trigger_refresh(&self) -> RefreshOutcome {
        self.inner.refresh.trigger().await
    }

    pub async fn is_refreshing(&self) -> bool {
        self.inner.refresh.is_pending().await
    }

    fn auth_headers(&self, token: Option<&str>, multipart: bool) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        if !multipart {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::InvalidRequest(format!("Invalid token header: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Send a request and classify the response.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<ServerEnvelope> {
        let token = self.inner.credentials.token();

        if let Some(ref token) = token {
            if is_expiring_soon(token, self.inner.config.refresh_threshold_secs) {
                debug!("Token expiring soon, refreshing in background");
                let refresh = self.inner.refresh.clone();
                tokio::spawn(async move {
                    refresh.trigger().await;
                });
            }
        }

        let RequestOptions {
            method,
            payload,
            headers: extra_headers,
        } = options;

        let multipart = matches!(payload, Payload::Files(_));
        let mut headers = self.auth_headers(token.as_deref(), multipart)?;
        for (name, value) in extra_headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let mut url = self.build_url(path);
        let body = match payload {
            Payload::Empty => PreparedBody::None,
            Payload::Json(data) if method == Method::GET => {
                url = append_query(&url, &data);
                PreparedBody::None
            }
            Payload::Json(data) => PreparedBody::Json(serde_json::to_string(&data)?),
            Payload::Files(files) => PreparedBody::Files(files),
        };

        let prepared = PreparedRequest {
            method,
            headers,
            body,
        };

        // Only a scheme the caller or the configured base spelled out is worth flipping
        let explicit_scheme = has_http_scheme(path) || has_http_scheme(&self.inner.config.api_base);

        match self.send_with_fallback(url, &prepared, explicit_scheme).await {
            Ok(envelope) => Ok(envelope),
            Err(e) => {
                error!(path = path, error = %e, "Request failed");
                Err(e.into())
            }
        }
    }

    async fn send_with_fallback(
        &self,
        url: String,
        prepared: &PreparedRequest,
        explicit_scheme: bool,
    ) -> Result<ServerEnvelope, ApiError> {
        match self.send_once(&url, prepared).await {
            Err(e) if e.is_transport() && explicit_scheme => match flip_scheme(&url) {
                Some(alternate) => {
                    warn!(from = %url, to = %alternate, error = %e, "Request failed, retrying with alternate scheme");
                    self.send_once(&alternate, prepared).await
                }
                None => Err(e),
            },
            other => other,
        }
    }

    fn build_request(&self, url: &str, prepared: &PreparedRequest) -> Result<RequestBuilder, ApiError> {
        let builder = self
            .inner
            .http
            .request(prepared.method.clone(), url)
            .headers(prepared.headers.clone());

        Ok(match &prepared.body {
            PreparedBody::None => builder,
            PreparedBody::Json(body) => builder.body(body.clone()),
            PreparedBody::Files(files) => builder.multipart(multipart_form(files)?),
        })
    }

    async fn send_once(&self, url: &str, prepared: &PreparedRequest) -> Result<ServerEnvelope, ApiError> {
        debug!(method = %prepared.method, url = url, "Sending request");

        let response = self
            .build_request(url, prepared)?
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    ApiError::InvalidRequest(e.to_string())
                } else {
                    ApiError::NetworkError(e)
                }
            })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();

        let classifier = ResponseClassifier {
            credentials: self.inner.credentials.as_ref(),
            navigator: self.inner.navigator.as_ref(),
            config: &self.inner.config,
        };
        let parsed = classifier.classify(status, &headers, &body)?;
        Ok(ServerEnvelope::normalize(parsed, status.as_u16()))
    }

    // ===== Verbs =====

    /// GET with optional query parameters.
    pub async fn get(&self, path: &str, params: Option<Value>) -> Result<ServerEnvelope> {
        let mut options = RequestOptions::new(Method::GET);
        if let Some(params) = params {
            options = options.json(params);
        }
        self.request(path, options).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ServerEnvelope> {
        let data = serde_json::to_value(body)?;
        self.request(path, RequestOptions::new(Method::POST).json(data))
            .await
    }

    /// POST without a body.
    pub async fn post_empty(&self, path: &str) -> Result<ServerEnvelope> {
        self.request(path, RequestOptions::new(Method::POST)).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ServerEnvelope> {
        let data = serde_json::to_value(body)?;
        self.request(path, RequestOptions::new(Method::PUT).json(data))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<ServerEnvelope> {
        self.request(path, RequestOptions::new(Method::DELETE)).await
    }

    /// Multipart POST, one `file` part per entry.
    pub async fn upload(&self, path: &str, files: Vec<UploadFile>) -> Result<ServerEnvelope> {
        self.request(path, RequestOptions::new(Method::POST).files(files))
            .await
    }
}

fn multipart_form(files: &[UploadFile]) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for file in files {
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(ref mime) = file.mime {
            part = part
                .mime_str(mime)
                .map_err(|e| ApiError::InvalidRequest(format!("Invalid MIME type {}: {}", mime, e)))?;
        }
        form = form.part(UPLOAD_FIELD, part);
    }
    Ok(form)
}
