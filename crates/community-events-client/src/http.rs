//! HTTP collaborator used by the request methods.
//!
//! The request methods never talk to the network directly. They build a
//! [`RequestDescriptor`] and hand it to an [`HttpClient`], which answers with
//! the status, headers and body of the response. [`ReqwestHttpClient`] is the
//! default implementation.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use crate::error::TransportResult;

/// A boxed future for the object-safe transport trait.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A request ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: &'static str,
    /// Path relative to the service base URL, authentication segment resolved.
    pub uri: String,
    /// Query string parameters.
    pub qs: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
}

/// Status, headers and body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are lower-cased.
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// Builder method to add a header.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Looks up a header, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

/// Sends request descriptors and returns raw responses.
///
/// Any status code is a successful transport result; interpreting it is up to
/// the caller. Errors are reserved for failures to obtain a response.
pub trait HttpClient: Send + Sync {
    fn make_request(&self, request: RequestDescriptor)
    -> BoxFuture<'_, TransportResult<HttpResponse>>;
}

impl<T: HttpClient + ?Sized> HttpClient for std::sync::Arc<T> {
    fn make_request(
        &self,
        request: RequestDescriptor,
    ) -> BoxFuture<'_, TransportResult<HttpResponse>> {
        (**self).make_request(request)
    }
}

#[cfg(feature = "http")]
pub use self::reqwest_client::ReqwestHttpClient;

#[cfg(feature = "http")]
mod reqwest_client {
    use community_events_core::ServiceConfig;
    use reqwest::{Client, Method};
    use tracing::{debug, trace};
    use url::Url;

    use super::{BoxFuture, HttpClient, HttpResponse, RequestDescriptor};
    use crate::error::{TransportError, TransportResult};

    /// [`HttpClient`] backed by `reqwest`.
    pub struct ReqwestHttpClient {
        client: Client,
        base_url: Url,
        credentials: Option<(String, String)>,
    }

    impl ReqwestHttpClient {
        /// Creates a client from the service configuration.
        pub fn new(config: &ServiceConfig) -> TransportResult<Self> {
            let client = Client::builder()
                .danger_accept_invalid_certs(!config.verify_tls)
                .timeout(config.timeout)
                .user_agent(&config.user_agent)
                .build()
                .map_err(|e| TransportError::Setup(e.to_string()))?;

            let credentials = match (&config.username, &config.password) {
                (Some(u), Some(p)) => Some((u.clone(), p.clone())),
                _ => None,
            };

            Ok(Self {
                client,
                base_url: config.base_url.clone(),
                credentials,
            })
        }

        pub fn base_url(&self) -> &Url {
            &self.base_url
        }

        /// Resolves the descriptor URI and query against the base URL.
        pub fn request_url(&self, request: &RequestDescriptor) -> TransportResult<Url> {
            let mut url = self
                .base_url
                .join(&request.uri)
                .map_err(|e| TransportError::InvalidUrl {
                    url: request.uri.clone(),
                    message: e.to_string(),
                })?;
            if !request.qs.is_empty() {
                url.query_pairs_mut().extend_pairs(&request.qs);
            }
            Ok(url)
        }

        async fn send(&self, request: RequestDescriptor) -> TransportResult<HttpResponse> {
            let method = Method::from_bytes(request.method.as_bytes()).map_err(|_| {
                TransportError::Request(format!("invalid HTTP method: {}", request.method))
            })?;
            let url = self.request_url(&request)?;

            let mut builder = self.client.request(method, url.clone());
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            if let Some((username, password)) = &self.credentials {
                builder = builder.basic_auth(username, Some(password));
            }

            debug!(method = request.method, url = %url, "Sending request");
            let response = builder
                .send()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))?;

            let status = response.status().as_u16();
            let mut result = HttpResponse::new(status, String::new());
            for (name, value) in response.headers() {
                if let Ok(value) = value.to_str() {
                    result = result.with_header(name.as_str(), value);
                }
            }
            result.body = response
                .text()
                .await
                .map_err(|e| TransportError::Body(e.to_string()))?;

            trace!(status, bytes = result.body.len(), "Received response");
            Ok(result)
        }
    }

    impl HttpClient for ReqwestHttpClient {
        fn make_request(
            &self,
            request: RequestDescriptor,
        ) -> BoxFuture<'_, TransportResult<HttpResponse>> {
            Box::pin(self.send(request))
        }
    }

}
