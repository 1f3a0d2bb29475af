//! List the people attending an event instance.

use community_events_parsers::{Attendee, parse_attendees};

use super::{Operation, Query, RequestOptions, Requirement};
use crate::error::ServiceResult;
use crate::http::HttpClient;

/// The `type` parameter is always `attend`; the API has no other listing.
pub static ATTENDEES: Operation = Operation {
    name: "attendees",
    uri: "calendar/{authType}/atom/calendar/event/attendees",
    whitelist: &["eventInstUuid", "page", "ps"],
    fixed: &[("type", "attend")],
    required: &[Requirement::Field("eventInstUuid")],
};

pub async fn attendees<C: HttpClient + ?Sized>(
    client: &C,
    query: &Query,
    options: &RequestOptions,
    default_auth_type: Option<&str>,
) -> ServiceResult<Vec<Attendee>> {
    let body = ATTENDEES
        .execute(client, query, options, default_auth_type)
        .await?;
    Ok(parse_attendees(&body)?)
}
