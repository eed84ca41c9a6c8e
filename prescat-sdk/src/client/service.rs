//! Request dispatch for a versioned Preservation Catalog API.
//!
//! Every endpoint method goes through [`VersionedApiService`], which builds
//! the request URL, encodes parameters, sends the request and turns the
//! outcome into either the raw body or a classified [`ClientError`].

use bytes::Bytes;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::formatter::{self, ResponseSummary};
use crate::config::ClientConfig;
use crate::error::{ClientError, ErrorKind};
use crate::objects::Params;

/// The endpoint method a request is made for, and the object it concerns.
/// Both end up in diagnostic messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller<'a> {
    pub operation: &'static str,
    pub object_id: Option<&'a str>,
}

impl<'a> Caller<'a> {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            object_id: None,
        }
    }

    pub fn for_object(operation: &'static str, object_id: &'a str) -> Self {
        Self {
            operation,
            object_id: Some(object_id),
        }
    }
}

/// Dispatcher shared by every endpoint API.
///
/// Holds the HTTP client, the catalog's base URL and the API-version path
/// segment. It keeps no state between calls, and cloning it shares the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct VersionedApiService {
    http: Client,
    base_url: Url,
    api_version: String,
}

impl VersionedApiService {
    /// Build a dispatcher with an HTTP client configured from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::with_http_client(build_http_client(config)?, config))
    }

    /// Build a dispatcher around a custom `reqwest::Client`.
    ///
    /// The client is used as is: the token, read timeout and redirect policy
    /// from `config` are not applied to it.
    pub fn with_http_client(http: Client, config: &ClientConfig) -> Self {
        Self {
            http,
            base_url: config.url.clone(),
            api_version: config.api_version.clone(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// `{api_version}/{path}`, or just `path` when the API version is blank.
    pub fn request_path(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if self.api_version.is_empty() {
            path.to_string()
        } else {
            format!("{}/{path}", self.api_version)
        }
    }

    /// Absolute URL for the resource at `path`.
    pub fn request_url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(&self.request_path(path))?)
    }

    /// `GET` the resource at `path`, with `params` as the query string.
    pub async fn get(
        &self,
        path: &str,
        params: &Params,
        caller: Caller<'_>,
    ) -> Result<Bytes, ClientError> {
        self.http_response(Method::GET, path, params, caller).await
    }

    /// `GET` the resource at `path`, handing each chunk of the body to
    /// `on_data` as it arrives.
    ///
    /// The body is never buffered as a whole. On a failed response the sink is
    /// not called and the error body is used for the diagnostic message.
    pub async fn get_streaming<F>(
        &self,
        path: &str,
        params: &Params,
        caller: Caller<'_>,
        mut on_data: F,
    ) -> Result<(), ClientError>
    where
        F: FnMut(Bytes),
    {
        let url = self.request_url(path)?;
        let request = with_query(self.http.get(url.clone()), params);
        let mut resp = self.send(request, &Method::GET, &url).await?;
        if !resp.status().is_success() {
            return Err(self.failure(resp, caller).await);
        }

        let mut received = 0usize;
        while let Some(chunk) = resp.chunk().await.map_err(|e| transport_error(&e))? {
            received += chunk.len();
            on_data(chunk);
        }
        debug!(%url, bytes = received, "Streamed Preservation Catalog response");
        Ok(())
    }

    /// `GET` the JSON resource at `path` and decode it into `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        caller: Caller<'_>,
    ) -> Result<T, ClientError> {
        let url = self.request_url(path)?;
        let request = self
            .http
            .get(url.clone())
            .header(header::ACCEPT, "application/json");
        let resp = self.send(request, &Method::GET, &url).await?;
        let body = self.success_body(resp, caller).await?;

        serde_json::from_slice(&body).map_err(|e| {
            ClientError::UnexpectedResponse(formatter::format_parse_failure(
                url.as_str(),
                caller.object_id,
                caller.operation,
                &e.to_string(),
            ))
        })
    }

    /// `POST` `params` as a JSON body to `path`.
    pub async fn post(
        &self,
        path: &str,
        params: &Params,
        caller: Caller<'_>,
    ) -> Result<Bytes, ClientError> {
        self.http_response(Method::POST, path, params, caller).await
    }

    /// `PATCH` `params` as a JSON body to `path`.
    pub async fn patch(
        &self,
        path: &str,
        params: &Params,
        caller: Caller<'_>,
    ) -> Result<Bytes, ClientError> {
        self.http_response(Method::PATCH, path, params, caller).await
    }

    /// `PUT` `params` as a JSON body to `path`.
    pub async fn put(
        &self,
        path: &str,
        params: &Params,
        caller: Caller<'_>,
    ) -> Result<Bytes, ClientError> {
        self.http_response(Method::PUT, path, params, caller).await
    }

    /// `DELETE` the resource at `path`, with `params` as the query string.
    pub async fn delete(
        &self,
        path: &str,
        params: &Params,
        caller: Caller<'_>,
    ) -> Result<Bytes, ClientError> {
        self.http_response(Method::DELETE, path, params, caller).await
    }

    async fn http_response(
        &self,
        method: Method,
        path: &str,
        params: &Params,
        caller: Caller<'_>,
    ) -> Result<Bytes, ClientError> {
        let url = self.request_url(path)?;
        let request = self.http.request(method.clone(), url.clone());
        let request = if method == Method::GET || method == Method::DELETE {
            with_query(request, params)
        } else {
            match params.to_json() {
                Some(body) => request.json(&body),
                None => request,
            }
        };

        let resp = self.send(request, &method, &url).await?;
        self.success_body(resp, caller).await
    }

    async fn send(
        &self,
        request: RequestBuilder,
        method: &Method,
        url: &Url,
    ) -> Result<Response, ClientError> {
        debug!(%method, %url, "Sending Preservation Catalog request");
        request.send().await.map_err(|e| {
            let err = transport_error(&e);
            warn!(%method, %url, error = %err, "Preservation Catalog request did not complete");
            err
        })
    }

    async fn success_body(
        &self,
        resp: Response,
        caller: Caller<'_>,
    ) -> Result<Bytes, ClientError> {
        if !resp.status().is_success() {
            return Err(self.failure(resp, caller).await);
        }
        resp.bytes().await.map_err(|e| transport_error(&e))
    }

    /// Read the body of a non-2xx response and classify it. The message
    /// carries the canonical reason phrase for the status.
    async fn failure(&self, resp: Response, caller: Caller<'_>) -> ClientError {
        let status = resp.status();
        let url = resp.url().to_string();
        let body = resp.text().await.unwrap_or_default();

        let kind = formatter::classify_status(status)
            .unwrap_or(ErrorKind::UnexpectedResponse);
        let summary = ResponseSummary::new(url, status, body);
        let message = formatter::format(&summary, caller.object_id, caller.operation);

        warn!(
            operation = caller.operation,
            object_id = caller.object_id,
            status = %status,
            url = %summary.url,
            kind = ?kind,
            "Preservation Catalog returned an error response"
        );
        ClientError::new(kind, message)
    }
}

fn with_query(request: RequestBuilder, params: &Params) -> RequestBuilder {
    if params.is_empty() {
        request
    } else {
        request.query(&params.query_pairs())
    }
}

/// `User-Agent` sent with every request.
pub fn user_agent() -> String {
    format!("preservation-client {}", crate::VERSION)
}

/// Build the HTTP client used by [`VersionedApiService::new`].
///
/// Redirects are not followed: a 3xx is reported as an unexpected response.
pub fn build_http_client(config: &ClientConfig) -> Result<Client, ClientError> {
    let mut headers = HeaderMap::new();
    if let Some(token) = &config.token {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            ClientError::Configuration(
                "token contains characters that are not allowed in an HTTP header".to_string(),
            )
        })?;
        value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, value);
    }

    let mut builder = Client::builder()
        .user_agent(user_agent())
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::none());
    if let Some(timeout) = config.read_timeout {
        builder = builder.read_timeout(timeout);
    }

    builder
        .build()
        .map_err(|e| ClientError::Configuration(format!("failed to build http client: {e}")))
}

/// Classify an error raised before a complete response was received.
fn transport_error(e: &reqwest::Error) -> ClientError {
    if e.is_builder() {
        return ClientError::Configuration(format!("invalid request: {}", error_chain(e)));
    }
    let kind = if e.is_timeout() {
        "Timeout"
    } else if e.is_connect() {
        "ConnectionFailed"
    } else if e.is_body() || e.is_decode() {
        "BodyError"
    } else {
        "RequestError"
    };
    ClientError::ConnectionFailed(formatter::format_connection_failure(kind, &error_chain(e)))
}

/// `e` followed by each of its sources, `: `-separated.
fn error_chain(e: &reqwest::Error) -> String {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    message
}
