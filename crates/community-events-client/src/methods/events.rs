//! List the event instances of a community calendar.

use community_events_parsers::{Event, parse_events};

use super::{Operation, Query, RequestOptions, Requirement};
use crate::error::ServiceResult;
use crate::http::HttpClient;

/// `GET calendar/{authType}/atom/calendar/event?calendarUuid=...`
pub static EVENTS: Operation = Operation {
    name: "events",
    uri: "calendar/{authType}/atom/calendar/event",
    whitelist: &["calendarUuid", "startDate", "endDate", "page", "ps", "tags"],
    fixed: &[],
    required: &[
        Requirement::Field("calendarUuid"),
        Requirement::AnyOf(&["startDate", "endDate"]),
    ],
};

/// Fetches the events of `calendarUuid` between `startDate` and/or `endDate`.
pub async fn events<C: HttpClient + ?Sized>(
    client: &C,
    query: &Query,
    options: &RequestOptions,
    default_auth_type: Option<&str>,
) -> ServiceResult<Vec<Event>> {
    let body = EVENTS
        .execute(client, query, options, default_auth_type)
        .await?;
    Ok(parse_events(&body)?)
}
