//! Declarative extraction of community calendar records from Atom XML.

pub mod entry;
pub mod error;
pub mod feed;
pub mod model;
pub mod record;
pub mod schema;
pub mod transforms;
pub mod xpath;

pub use entry::{
    ATTENDEE_LINK_RELATIONS, ATTENDEE_SCHEMA, EVENT_LINK_RELATIONS, EVENT_SCHEMA, LinkRelations,
    parse_attendee_entry, parse_attendee_record, parse_event_entry, parse_event_record,
};
pub use error::{ParseError, ParseResult};
pub use feed::{
    FeedParser, XmlInput, parse_attendee_records, parse_attendees, parse_event,
    parse_event_record_document, parse_event_records, parse_events,
};
pub use model::{Attendee, Event, Link, Links, Source, UserInfo};
pub use record::{FieldValue, Record};
pub use schema::{FieldSpec, ParseSchema, parse_node};
pub use transforms::{parse_user_info, to_boolean, to_date, urn_to_id, user_info};
pub use xpath::{ATOM_NS, Evaluator, SNX_NS, Scalar, XPathContext, parse_xml};
