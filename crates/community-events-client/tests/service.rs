//! Request methods against a stub transport.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use community_events_client::{
    BoxFuture, CommunityEventsService, ErrorCode, HttpClient, HttpResponse, Query,
    RequestDescriptor, RequestOptions, ServiceError, TransportError, TransportResult,
};

const EVENTS: &str = include_str!("../../community-events-parsers/tests/fixtures/events.xml");
const EVENT: &str = include_str!("../../community-events-parsers/tests/fixtures/event.xml");
const ATTENDEES: &str = include_str!("../../community-events-parsers/tests/fixtures/attendees.xml");

const CALENDAR_UUID: &str = "5dd83cd6-d3a5-4fb3-89cd-1e2c04e52250";
const EVENT_INST_UUID: &str = "6513270e-269e-0d37-f2a7-4de452e6b438";

/// Answers every request with the same response and records what it got.
struct StubClient {
    response: Result<HttpResponse, String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl StubClient {
    fn new(status: u16, content_type: &str, body: &str) -> Self {
        Self::responding(Ok(
            HttpResponse::new(status, body).with_header("Content-Type", content_type)
        ))
    }

    fn atom(body: &str) -> Self {
        Self::new(200, "application/atom+xml; charset=UTF-8", body)
    }

    fn failing(message: &str) -> Self {
        Self::responding(Err(message.to_string()))
    }

    fn responding(response: Result<HttpResponse, String>) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> RequestDescriptor {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

impl HttpClient for StubClient {
    fn make_request(
        &self,
        request: RequestDescriptor,
    ) -> BoxFuture<'_, TransportResult<HttpResponse>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        let response = self.response.clone().map_err(TransportError::Request);
        Box::pin(async move { response })
    }
}

fn events_query() -> Query {
    Query::new()
        .with("calendarUuid", CALENDAR_UUID)
        .with("startDate", "2017-01-04T20:32:31.171Z")
}

#[tokio::test]
async fn list_events_end_to_end() {
    let service = CommunityEventsService::new(StubClient::atom(EVENTS));

    let events = service
        .list_events(&events_query(), &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(events.len(), 32);
    let first = &events[0];
    assert_eq!(
        first.author.as_ref().unwrap().user_id,
        "0ef1f4c0-1d35-1033-9e5f-c3fa2a3f8a2e"
    );
    assert!(first.link("self").unwrap().href.ends_with(EVENT_INST_UUID));
    assert_eq!(
        first.start_date.unwrap().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "2017-01-04T20:32:31.171Z"
    );
    assert_eq!(service.client().calls(), 1);
}

#[tokio::test]
async fn list_events_request_shape() {
    let service = CommunityEventsService::new(StubClient::atom(EVENTS)).with_auth_type("oauth");
    let query = events_query().with("ps", "50").with("unknown", "dropped");

    service
        .list_events(&query, &RequestOptions::new())
        .await
        .unwrap();

    let request = service.client().last_request();
    assert_eq!(request.method, "GET");
    assert_eq!(request.uri, "calendar/oauth/atom/calendar/event");
    assert_eq!(request.headers["accept"], "application/atom+xml");
    let params: Vec<_> = request.qs.keys().map(String::as_str).collect();
    assert_eq!(params, ["calendarUuid", "ps", "startDate"]);
}

#[tokio::test]
async fn missing_calendar_uuid_fails_before_sending() {
    let service = CommunityEventsService::new(StubClient::atom(EVENTS));
    let query = Query::new().with("startDate", "2017-01-04T20:32:31.171Z");

    let err = service
        .list_events(&query, &RequestOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::MissingParameter);
    let message = err.to_string();
    assert!(message.contains("calendarUuid"));
    assert!(message.contains("events"));
    assert_eq!(service.client().calls(), 0);
}

#[tokio::test]
async fn missing_date_range_fails_before_sending() {
    let service = CommunityEventsService::new(StubClient::atom(EVENTS));
    let query = Query::new().with("calendarUuid", CALENDAR_UUID);

    let err = service
        .list_events(&query, &RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::MissingParameter {
            field: "startDate",
            operation: "events"
        }
    ));
    assert_eq!(service.client().calls(), 0);
}

#[tokio::test]
async fn html_response_is_an_auth_failure() {
    let service =
        CommunityEventsService::new(StubClient::new(200, "text/html", "<html>login</html>"));

    let err = service
        .list_events(&events_query(), &RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::UnexpectedContentType { .. }));
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn forbidden_status_carries_body() {
    let service = CommunityEventsService::new(StubClient::new(
        403,
        "text/plain",
        "You are not a member of this community",
    ));

    let err = service
        .list_events(&events_query(), &RequestOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::UnexpectedStatus);
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.to_string(), "You are not a member of this community");
}

#[tokio::test]
async fn transport_errors_pass_through() {
    let service = CommunityEventsService::new(StubClient::failing("connection reset"));

    let err = service
        .list_events(&events_query(), &RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Transport(TransportError::Request(ref m)) if m == "connection reset"
    ));
    assert_eq!(service.client().calls(), 1);
}

#[tokio::test]
async fn get_event() {
    let service = CommunityEventsService::new(StubClient::atom(EVENT));
    let query = Query::new()
        .with("eventInstUuid", EVENT_INST_UUID)
        .with("calendarUuid", CALENDAR_UUID);

    let event = service.get_event(&query, &RequestOptions::new()).await.unwrap();
    assert_eq!(event.id, EVENT_INST_UUID);

    let request = service.client().last_request();
    assert_eq!(request.uri, "calendar/atom/calendar/event");
    let params: Vec<_> = request.qs.iter().collect();
    assert_eq!(params.len(), 1);
    assert_eq!(request.qs["eventInstUuid"], EVENT_INST_UUID);
}

#[tokio::test]
async fn get_event_from_feed_is_a_structural_mismatch() {
    let service = CommunityEventsService::new(StubClient::atom(EVENTS));
    let query = Query::new().with("eventInstUuid", EVENT_INST_UUID);

    let err = service
        .get_event(&query, &RequestOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::StructuralMismatch);
}

#[tokio::test]
async fn list_attendees_forces_attend_type() {
    let service = CommunityEventsService::new(StubClient::atom(ATTENDEES)).with_auth_type("oauth");
    let query = Query::new()
        .with("eventInstUuid", EVENT_INST_UUID)
        .with("type", "follow");
    let options = RequestOptions::new().with_auth_type("basic");

    let attendees = service.list_attendees(&query, &options).await.unwrap();
    assert_eq!(attendees.len(), 3);

    let request = service.client().last_request();
    assert_eq!(request.uri, "calendar/basic/atom/calendar/event/attendees");
    assert_eq!(request.qs["type"], "attend");
    assert_eq!(request.qs["eventInstUuid"], EVENT_INST_UUID);
}

#[tokio::test]
async fn list_attendees_requires_event_instance() {
    let service = CommunityEventsService::new(StubClient::atom(ATTENDEES));

    let err = service
        .list_attendees(&Query::new().with("eventInstUuid", ""), &RequestOptions::new())
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "{query.eventInstUuid} must be defined in [attendees] request"
    );
    assert_eq!(service.client().calls(), 0);
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let service = CommunityEventsService::new(StubClient::atom("<feed"));

    let err = service
        .list_events(&events_query(), &RequestOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidResponse);
}

/// Answers each request with the Atom body registered for its URI.
struct RoutingClient {
    routes: Vec<(&'static str, &'static str)>,
    calls: AtomicUsize,
}

impl HttpClient for RoutingClient {
    fn make_request(
        &self,
        request: RequestDescriptor,
    ) -> BoxFuture<'_, TransportResult<HttpResponse>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self
            .routes
            .iter()
            .find(|(uri, _)| *uri == request.uri)
            .map(|(_, body)| {
                HttpResponse::new(200, *body).with_header("Content-Type", "application/atom+xml")
            })
            .ok_or_else(|| TransportError::Request(format!("no route for {}", request.uri)));
        Box::pin(async move {
            tokio::task::yield_now().await;
            response
        })
    }
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let service = CommunityEventsService::new(RoutingClient {
        routes: vec![
            ("calendar/atom/calendar/event", EVENTS),
            ("calendar/atom/calendar/event/attendees", ATTENDEES),
        ],
        calls: AtomicUsize::new(0),
    });
    let calendar_query = events_query();
    let events_options = RequestOptions::new();
    let attendees_query = Query::new().with("eventInstUuid", EVENT_INST_UUID);
    let attendees_options = RequestOptions::new();

    let (events, attendees) = tokio::join!(
        service.list_events(&calendar_query, &events_options),
        service.list_attendees(&attendees_query, &attendees_options),
    );

    assert_eq!(events.unwrap().len(), 32);
    assert_eq!(attendees.unwrap().len(), 3);
    assert_eq!(service.client().calls.load(Ordering::SeqCst), 2);
}
