use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::{
    transport::{HttpRequest, ReqwestTransport, Transport},
    AlgoliaError, ClientOptions, Config, Mode, RequestOptions, Result,
};

/// Number of attempts, across distinct hosts, before a request gives up.
pub const MAX_ATTEMPTS: usize = 4;

pub(crate) const API_KEY_HEADER: &str = "X-Algolia-API-Key";
pub(crate) const APPLICATION_ID_HEADER: &str = "X-Algolia-Application-Id";

/// One logical API call, before a host is chosen.
#[derive(Clone, Debug)]
pub struct Request {
    pub method: Method,
    /// Path and query string, starting with `/`.
    pub path: String,
    /// Already-serialized JSON payload.
    pub body: Option<String>,
    pub options: RequestOptions,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            options: RequestOptions::default(),
        }
    }

    /// Serializes `body` as the JSON payload.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let encoded =
            serde_json::to_string(body).map_err(|err| AlgoliaError::Encode(err.to_string()))?;
        self.body = Some(encoded);
        Ok(self)
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

/// HTTP client for the Algolia REST API.
///
/// Requests are sent to the host chosen by [`Config`]'s resolver and fail
/// over to the next host on transport errors, up to [`MAX_ATTEMPTS`].
/// Non-2xx responses are returned as [`AlgoliaError::Http`] without retry.
#[derive(Clone, Debug)]
pub struct AlgoliaClient<T = ReqwestTransport> {
    config: Config,
    options: ClientOptions,
    transport: T,
}

impl AlgoliaClient {
    /// Creates a client with the default `reqwest` transport.
    pub fn new(config: Config) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }

    /// Creates a client from `ALGOLIA_APPLICATION_ID` and `ALGOLIA_API_KEY`.
    ///
    /// ```no_run
    /// use algolia_http::AlgoliaClient;
    ///
    /// let client = AlgoliaClient::from_env().expect("missing ALGOLIA_* env vars");
    /// ```
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Config::from_env()?))
    }
}

impl<T: Transport> AlgoliaClient<T> {
    /// Creates a client sending requests through `transport`.
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self {
            config,
            options: ClientOptions::default(),
            transport,
        }
    }

    /// Applies timeout and polling options.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Connect and read timeouts for a 0-based attempt.
    pub fn timeouts_for_attempt(&self, attempt: usize) -> (Duration, Duration) {
        let factor = attempt as u64 + 1;
        (
            Duration::from_millis(self.options.connect_timeout_ms.saturating_mul(factor)),
            Duration::from_millis(self.options.read_timeout_ms.saturating_mul(factor)),
        )
    }

    /// Sends a raw logical request and decodes the JSON response.
    ///
    /// Use this for endpoints without a dedicated method.
    pub async fn request(&self, mode: Mode, request: Request) -> Result<Value> {
        let headers = self.build_headers(&request.options)?;
        let mut attempt = 0usize;

        loop {
            let host = self.config.resolve_host(mode, attempt);
            let url = format!("{}://{}{}", self.config.scheme().as_str(), host, request.path);
            let (connect_timeout, read_timeout) = self.timeouts_for_attempt(attempt);

            #[cfg(feature = "tracing")]
            tracing::debug!(method = %request.method, %host, %mode, attempt, "dispatching request");

            let outcome = self
                .transport
                .send(HttpRequest {
                    method: request.method.clone(),
                    url,
                    headers: headers.clone(),
                    body: request.body.clone(),
                    connect_timeout,
                    read_timeout,
                })
                .await;

            match outcome {
                Ok(response) if (200..300).contains(&response.status) => {
                    return decode_body(&response.body);
                }
                Ok(response) => {
                    return Err(AlgoliaError::Http {
                        status: response.status,
                        body: response.body,
                    });
                }
                Err(err) if !err.is_retryable() => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(%host, attempt, error = %err, "request could not be issued");

                    return Err(AlgoliaError::Transport(err));
                }
                Err(err) => {
                    attempt += 1;

                    #[cfg(feature = "tracing")]
                    tracing::warn!(%host, attempt, error = %err, "transport failure");

                    if attempt >= MAX_ATTEMPTS {
                        return Err(AlgoliaError::TransportFailure {
                            attempts: attempt,
                            message: format!("all hosts unreachable, last error: {err}"),
                        });
                    }
                }
            }
        }
    }

    /// Dispatches a write and injects `indexName` into the response.
    pub(crate) async fn write(&self, index: &str, request: Request) -> Result<Value> {
        let value = self.request(Mode::Write, request).await?;
        Ok(inject_index_name(value, index))
    }

    fn build_headers(&self, options: &RequestOptions) -> Result<Vec<(String, String)>> {
        let mut headers = Vec::with_capacity(options.headers.len() + 3);
        for (name, value) in &options.headers {
            HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
                AlgoliaError::Validation(format!("invalid header name '{name}': {err}"))
            })?;
            HeaderValue::from_str(value).map_err(|err| {
                AlgoliaError::Validation(format!("invalid value for header '{name}': {err}"))
            })?;
            headers.push((name.clone(), value.clone()));
        }
        headers.push((API_KEY_HEADER.to_owned(), self.config.api_key().to_owned()));
        headers.push((
            APPLICATION_ID_HEADER.to_owned(),
            self.config.application_id().to_owned(),
        ));
        headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
        Ok(headers)
    }
}

pub(crate) fn decode_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body)
        .map_err(|err| AlgoliaError::Decode(format!("invalid response JSON: {err}; body: {body}")))
}

/// Adds `indexName` to object responses so they can be waited on.
pub(crate) fn inject_index_name(value: Value, index: &str) -> Value {
    match value {
        Value::Object(mut map) => {
            map.insert("indexName".to_owned(), Value::String(index.to_owned()));
            Value::Object(map)
        }
        other => other,
    }
}

pub(crate) fn ensure_not_empty(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AlgoliaError::Validation(format!("{what} cannot be empty")));
    }
    Ok(())
}
