//! Feed and document level parsers.
//!
//! Responses come in two shapes: an `atom:feed` wrapping zero or more
//! entries, or a bare `atom:entry` for single-item lookups. Input may be raw
//! XML text or an already parsed document.

use sxd_document::dom::Document;
use sxd_xpath::nodeset::Node;
use tracing::debug;

use crate::entry::{
    parse_attendee_entry, parse_attendee_record, parse_event_entry, parse_event_record,
};
use crate::error::{ParseError, ParseResult};
use crate::model::{Attendee, Event};
use crate::record::Record;
use crate::xpath::{Evaluator, XPathContext, parse_xml};

const FEED_PATH: &str = "/atom:feed";
const FEED_ENTRIES_PATH: &str = "/atom:feed/atom:entry";
const ENTRY_PATH: &str = "/atom:entry";

type EntryParser<T> = for<'d> fn(&Evaluator<'d>, Node<'d>) -> ParseResult<T>;

/// XML handed to a feed parser.
#[derive(Clone, Copy)]
pub enum XmlInput<'a> {
    /// Unparsed XML text.
    Text(&'a str),
    /// A document parsed by the caller.
    Document(Document<'a>),
}

impl<'a> From<&'a str> for XmlInput<'a> {
    fn from(xml: &'a str) -> Self {
        Self::Text(xml)
    }
}

impl<'a> From<&'a String> for XmlInput<'a> {
    fn from(xml: &'a String) -> Self {
        Self::Text(xml)
    }
}

impl<'a> From<Document<'a>> for XmlInput<'a> {
    fn from(doc: Document<'a>) -> Self {
        Self::Document(doc)
    }
}

/// Parses text inputs, then runs `f` on the document.
fn with_document<T>(
    input: XmlInput<'_>,
    f: impl for<'d> FnOnce(Document<'d>) -> ParseResult<T>,
) -> ParseResult<T> {
    match input {
        XmlInput::Text(xml) => {
            let package = parse_xml(xml)?;
            f(package.as_document())
        }
        XmlInput::Document(doc) => f(doc),
    }
}

/// Locates entries in Atom documents and applies the entry parsers.
#[derive(Debug, Clone, Default)]
pub struct FeedParser {
    context: XPathContext,
}

impl FeedParser {
    pub fn new(context: XPathContext) -> Self {
        Self { context }
    }

    /// Every event entry of a feed, in document order.
    pub fn events<'a>(&self, input: impl Into<XmlInput<'a>>) -> ParseResult<Vec<Event>> {
        self.feed_entries(input.into(), parse_event_entry)
    }

    /// Every attendee entry of a feed, in document order.
    pub fn attendees<'a>(&self, input: impl Into<XmlInput<'a>>) -> ParseResult<Vec<Attendee>> {
        self.feed_entries(input.into(), parse_attendee_entry)
    }

    /// The single event of an entry document.
    pub fn event<'a>(&self, input: impl Into<XmlInput<'a>>) -> ParseResult<Event> {
        self.single_entry(input.into(), parse_event_entry)
    }

    pub fn event_records<'a>(&self, input: impl Into<XmlInput<'a>>) -> ParseResult<Vec<Record>> {
        self.feed_entries(input.into(), parse_event_record)
    }

    pub fn attendee_records<'a>(
        &self,
        input: impl Into<XmlInput<'a>>,
    ) -> ParseResult<Vec<Record>> {
        self.feed_entries(input.into(), parse_attendee_record)
    }

    pub fn event_record<'a>(&self, input: impl Into<XmlInput<'a>>) -> ParseResult<Record> {
        self.single_entry(input.into(), parse_event_record)
    }

    fn feed_entries<T>(&self, input: XmlInput<'_>, parse: EntryParser<T>) -> ParseResult<Vec<T>> {
        with_document(input, |doc| {
            let eval = self.context.evaluator();
            let root = Node::from(doc.root());
            if eval.select_first(FEED_PATH, root)?.is_none() {
                return Err(ParseError::StructuralMismatch(
                    "document root is not an atom:feed".to_string(),
                ));
            }

            let entries = eval.select_nodes(FEED_ENTRIES_PATH, root)?;
            debug!(entries = entries.len(), "parsing feed");
            entries.into_iter().map(|entry| parse(&eval, entry)).collect()
        })
    }

    fn single_entry<T>(&self, input: XmlInput<'_>, parse: EntryParser<T>) -> ParseResult<T> {
        with_document(input, |doc| {
            let eval = self.context.evaluator();
            let entry = eval
                .select_first(ENTRY_PATH, doc.root().into())?
                .ok_or_else(|| {
                    ParseError::StructuralMismatch(
                        "document has no top-level atom:entry".to_string(),
                    )
                })?;
            parse(&eval, entry)
        })
    }
}

/// Parses an events feed with the default namespace bindings.
pub fn parse_events<'a>(input: impl Into<XmlInput<'a>>) -> ParseResult<Vec<Event>> {
    FeedParser::default().events(input)
}

/// Parses an attendees feed with the default namespace bindings.
pub fn parse_attendees<'a>(input: impl Into<XmlInput<'a>>) -> ParseResult<Vec<Attendee>> {
    FeedParser::default().attendees(input)
}

/// Parses a single event entry document with the default namespace bindings.
pub fn parse_event<'a>(input: impl Into<XmlInput<'a>>) -> ParseResult<Event> {
    FeedParser::default().event(input)
}

pub fn parse_event_records<'a>(input: impl Into<XmlInput<'a>>) -> ParseResult<Vec<Record>> {
    FeedParser::default().event_records(input)
}

pub fn parse_attendee_records<'a>(input: impl Into<XmlInput<'a>>) -> ParseResult<Vec<Record>> {
    FeedParser::default().attendee_records(input)
}

pub fn parse_event_record_document<'a>(input: impl Into<XmlInput<'a>>) -> ParseResult<Record> {
    FeedParser::default().event_record(input)
}
