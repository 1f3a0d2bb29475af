//! Request methods of the calendar API.
//!
//! Every method follows the same flow: validate the query, build a
//! [`RequestDescriptor`], send it, check the status and content type, and
//! hand the body to the matching feed parser. The per-method differences are
//! captured by a static [`Operation`].

mod attendees;
mod event;
mod events;

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::http::{HttpClient, HttpResponse, RequestDescriptor};

pub use attendees::{ATTENDEES, attendees};
pub use event::{EVENT, event};
pub use events::{EVENTS, events};

/// Placeholder for the authentication type in URI templates.
const AUTH_TYPE_SEGMENT: &str = "{authType}/";

const ATOM_CONTENT_TYPE: &str = "application/atom+xml";

/// A required-parameter rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// The field must be present and non-empty.
    Field(&'static str),
    /// At least one of the fields must be present and non-empty. The first one
    /// is reported when all are missing.
    AnyOf(&'static [&'static str]),
}

/// Static description of one API method.
#[derive(Debug, Clone, Copy)]
pub struct Operation {
    pub name: &'static str,
    /// URI relative to the base URL, with an `{authType}` segment.
    pub uri: &'static str,
    /// Query fields forwarded to the server.
    pub whitelist: &'static [&'static str],
    /// Query fields forced to a value, overriding the caller.
    pub fixed: &'static [(&'static str, &'static str)],
    pub required: &'static [Requirement],
}

impl Operation {
    /// Checks required parameters.
    pub fn validate(&self, query: &Query) -> ServiceResult<()> {
        for requirement in self.required {
            let missing = match requirement {
                Requirement::Field(field) => (!query.is_set(field)).then_some(*field),
                Requirement::AnyOf(fields) => {
                    if fields.iter().any(|field| query.is_set(field)) {
                        None
                    } else {
                        fields.first().copied()
                    }
                }
            };
            if let Some(field) = missing {
                return Err(ServiceError::MissingParameter {
                    field,
                    operation: self.name,
                });
            }
        }
        Ok(())
    }

    /// Resolves the URI template for an authentication type.
    ///
    /// Without an authentication type the segment is removed.
    pub fn resolve_uri(&self, auth_type: Option<&str>) -> String {
        match auth_type.filter(|t| !t.is_empty()) {
            Some(auth_type) => self
                .uri
                .replace(AUTH_TYPE_SEGMENT, &format!("{auth_type}/")),
            None => self.uri.replace(AUTH_TYPE_SEGMENT, ""),
        }
    }

    /// Builds the request descriptor for a validated query.
    pub fn build_request(
        &self,
        query: &Query,
        options: &RequestOptions,
        default_auth_type: Option<&str>,
    ) -> RequestDescriptor {
        let auth_type = options.auth_type.as_deref().or(default_auth_type);

        let mut qs: BTreeMap<String, String> = query
            .iter()
            .filter(|(name, _)| self.whitelist.iter().any(|field| field == name))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        for (name, value) in self.fixed {
            qs.insert(name.to_string(), value.to_string());
        }

        let mut headers = options.headers.clone();
        headers.insert("accept".to_string(), ATOM_CONTENT_TYPE.to_string());

        RequestDescriptor {
            method: "GET",
            uri: self.resolve_uri(auth_type),
            qs,
            headers,
        }
    }

    /// Sends the request and returns the body of a valid Atom response.
    pub(crate) async fn execute<C: HttpClient + ?Sized>(
        &self,
        client: &C,
        query: &Query,
        options: &RequestOptions,
        default_auth_type: Option<&str>,
    ) -> ServiceResult<String> {
        self.validate(query)?;

        let request = self.build_request(query, options, default_auth_type);
        debug!(
            operation = self.name,
            uri = %request.uri,
            params = request.qs.len(),
            "Dispatching request"
        );

        let response = client.make_request(request).await?;
        self.check_response(response)
    }

    /// Enforces the status and content type contract.
    pub fn check_response(&self, response: HttpResponse) -> ServiceResult<String> {
        if response.status != 200 {
            warn!(operation = self.name, status = response.status, "Unexpected response status");
            let message = if response.body.is_empty() {
                "received response with unexpected status code".to_string()
            } else {
                response.body
            };
            return Err(ServiceError::UnexpectedStatus {
                status: response.status,
                message,
            });
        }

        let content_type = response.content_type().unwrap_or_default();
        if !content_type.starts_with(ATOM_CONTENT_TYPE) {
            warn!(operation = self.name, content_type, "Unexpected content type");
            return Err(ServiceError::UnexpectedContentType {
                content_type: content_type.to_string(),
            });
        }

        Ok(response.body)
    }
}

/// Query parameters of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(BTreeMap<String, String>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set a parameter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder method to set a parameter when a value is given.
    pub fn with_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Whether `name` has a non-empty value.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(|value| !value.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Per-call request options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Authentication type substituted into the URI. Falls back to the
    /// configured default.
    pub auth_type: Option<String>,
    /// Extra request headers. `accept` is always set to Atom.
    pub headers: BTreeMap<String, String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auth_type(mut self, auth_type: impl Into<String>) -> Self {
        self.auth_type = Some(auth_type.into());
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }
}
