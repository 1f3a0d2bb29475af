//! Fetch a single event instance.

use community_events_parsers::{Event, parse_event};

use super::{Operation, Query, RequestOptions, Requirement};
use crate::error::ServiceResult;
use crate::http::HttpClient;

pub static EVENT: Operation = Operation {
    name: "event",
    uri: "calendar/{authType}/atom/calendar/event",
    whitelist: &["eventInstUuid"],
    fixed: &[],
    required: &[Requirement::Field("eventInstUuid")],
};

pub async fn event<C: HttpClient + ?Sized>(
    client: &C,
    query: &Query,
    options: &RequestOptions,
    default_auth_type: Option<&str>,
) -> ServiceResult<Event> {
    let body = EVENT
        .execute(client, query, options, default_auth_type)
        .await?;
    Ok(parse_event(&body)?)
}
