use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use reqwest::Method;

/// One HTTP call as issued by the dispatcher.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// Sent in order. Custom headers come before identity headers.
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

/// Status and raw body of a received response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransportErrorKind {
    Connect,
    Timeout,
    /// Failed while sending the request or reading the response body.
    Request,
    /// Could not build or issue the request at all, e.g. a malformed URL.
    Other,
}

/// No response was received from the host.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Whether another host may succeed where this attempt failed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            TransportErrorKind::Connect | TransportErrorKind::Timeout | TransportErrorKind::Request
        )
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_builder() {
            TransportErrorKind::Other
        } else if err.is_request() || err.is_body() || err.is_decode() {
            TransportErrorKind::Request
        } else {
            TransportErrorKind::Other
        };
        Self::new(kind, err.to_string())
    }
}

/// Sends a single HTTP request without retrying.
///
/// Any received response, whatever its status, is `Ok`. `Err` means no
/// response arrived; the dispatcher fails over to another host only when
/// [`TransportError::is_retryable`] holds.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        (**self).send(request)
    }
}

/// `reqwest` transport with TLS 1.2 as minimum version.
///
/// `reqwest` fixes the connect timeout per client, so one client is kept
/// per distinct connect timeout.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    clients: Arc<Mutex<Vec<(Duration, reqwest::Client)>>>,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn client_for(&self, connect_timeout: Duration) -> Result<reqwest::Client, TransportError> {
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((_, client)) = clients
            .iter()
            .find(|(timeout, _)| *timeout == connect_timeout)
        {
            return Ok(client.clone());
        }

        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .build()
            .map_err(TransportError::from)?;
        clients.push((connect_timeout, client.clone()));
        Ok(client)
    }
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        let client = self.client_for(request.connect_timeout);
        async move {
            let client = client?;
            let mut builder = client
                .request(request.method, &request.url)
                .timeout(request.read_timeout);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::VecDeque;
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    use super::{HttpRequest, HttpResponse, Transport, TransportError, TransportErrorKind};

    type Outcome = Result<HttpResponse, TransportError>;

    /// Replays scripted outcomes and records every request.
    #[derive(Clone, Default)]
    pub(crate) struct ScriptedTransport {
        outcomes: Arc<Mutex<VecDeque<Outcome>>>,
        requests: Arc<Mutex<Vec<HttpRequest>>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new(outcomes: Vec<Outcome>) -> Self {
            Self {
                outcomes: Arc::new(Mutex::new(outcomes.into())),
                requests: Arc::default(),
            }
        }

        pub(crate) fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().expect("requests mutex").clone()
        }

        pub(crate) fn hits(&self) -> usize {
            self.requests.lock().expect("requests mutex").len()
        }
    }

    pub(crate) fn ok(body: serde_json::Value) -> Outcome {
        Ok(HttpResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    pub(crate) fn status(status: u16, body: &str) -> Outcome {
        Ok(HttpResponse {
            status,
            body: body.to_owned(),
        })
    }

    pub(crate) fn refused() -> Outcome {
        Err(TransportError::new(
            TransportErrorKind::Connect,
            "connection refused",
        ))
    }

    pub(crate) fn malformed() -> Outcome {
        Err(TransportError::new(
            TransportErrorKind::Other,
            "builder error: invalid URL",
        ))
    }

    impl Transport for ScriptedTransport {
        fn send(&self, request: HttpRequest) -> impl Future<Output = Outcome> + Send {
            self.requests.lock().expect("requests mutex").push(request);
            let outcome = self
                .outcomes
                .lock()
                .expect("outcomes mutex")
                .pop_front()
                .unwrap_or_else(|| status(500, "{\"message\":\"no scripted response\"}"));
            async move { outcome }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ReqwestTransport, TransportError, TransportErrorKind};

    #[test]
    fn reuses_client_per_connect_timeout() {
        let transport = ReqwestTransport::new();
        transport
            .client_for(Duration::from_secs(2))
            .expect("client builds");
        transport
            .client_for(Duration::from_secs(2))
            .expect("client builds");
        transport
            .client_for(Duration::from_secs(4))
            .expect("client builds");
        assert_eq!(transport.clients.lock().expect("clients mutex").len(), 2);
    }

    #[test]
    fn only_network_failures_are_retryable() {
        let retryable = [
            TransportErrorKind::Connect,
            TransportErrorKind::Timeout,
            TransportErrorKind::Request,
        ];
        for kind in retryable {
            assert!(TransportError::new(kind, "x").is_retryable(), "{kind:?}");
        }
        assert!(!TransportError::new(TransportErrorKind::Other, "x").is_retryable());
    }
}
