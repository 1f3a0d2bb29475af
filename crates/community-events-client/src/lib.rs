//! Request methods, HTTP transport and CLI for the community calendar API.
//!
//! [`CommunityEventsService`] validates queries, sends them through an
//! [`HttpClient`] and parses the Atom responses into [`Event`] and
//! [`Attendee`] values.

pub mod cli;
pub mod error;
pub mod http;
pub mod methods;
pub mod service;

pub use community_events_parsers::{Attendee, Event};
pub use error::{CliError, ErrorCode, ServiceError, ServiceResult, TransportError, TransportResult};
#[cfg(feature = "http")]
pub use http::ReqwestHttpClient;
pub use http::{BoxFuture, HttpClient, HttpResponse, RequestDescriptor};
pub use methods::{ATTENDEES, EVENT, EVENTS, Operation, Query, RequestOptions, Requirement};
pub use service::CommunityEventsService;
