//! Service facade over the request methods.

use community_events_core::ServiceConfig;
use community_events_parsers::{Attendee, Event};

use crate::error::ServiceResult;
use crate::http::HttpClient;
use crate::methods::{self, Query, RequestOptions};

/// Calendar API client.
///
/// Holds the transport and the default authentication type. Both are
/// immutable, so one service can serve concurrent calls.
pub struct CommunityEventsService<C> {
    client: C,
    auth_type: Option<String>,
}

impl<C: HttpClient> CommunityEventsService<C> {
    /// Creates a service without a default authentication type.
    pub fn new(client: C) -> Self {
        Self {
            client,
            auth_type: None,
        }
    }

    /// Creates a service using the defaults of `config`.
    pub fn with_config(client: C, config: &ServiceConfig) -> Self {
        Self {
            client,
            auth_type: config.auth_type.clone(),
        }
    }

    /// Builder method to set the default authentication type.
    pub fn with_auth_type(mut self, auth_type: impl Into<String>) -> Self {
        self.auth_type = Some(auth_type.into());
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn auth_type(&self) -> Option<&str> {
        self.auth_type.as_deref()
    }

    /// Lists the events of a community calendar.
    ///
    /// Requires `calendarUuid` and at least one of `startDate` and `endDate`.
    pub async fn list_events(
        &self,
        query: &Query,
        options: &RequestOptions,
    ) -> ServiceResult<Vec<Event>> {
        methods::events(&self.client, query, options, self.auth_type()).await
    }

    /// Fetches one event instance by `eventInstUuid`.
    pub async fn get_event(&self, query: &Query, options: &RequestOptions) -> ServiceResult<Event> {
        methods::event(&self.client, query, options, self.auth_type()).await
    }

    /// Lists the attendees of an event instance by `eventInstUuid`.
    pub async fn list_attendees(
        &self,
        query: &Query,
        options: &RequestOptions,
    ) -> ServiceResult<Vec<Attendee>> {
        methods::attendees(&self.client, query, options, self.auth_type()).await
    }
}

#[cfg(feature = "http")]
impl CommunityEventsService<crate::http::ReqwestHttpClient> {
    /// Creates a `reqwest`-backed service from configuration.
    pub fn from_config(config: &ServiceConfig) -> crate::error::TransportResult<Self> {
        let client = crate::http::ReqwestHttpClient::new(config)?;
        Ok(Self::with_config(client, config))
    }
}
