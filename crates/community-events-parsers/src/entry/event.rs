//! Calendar event entries.

use std::sync::LazyLock;

use sxd_xpath::nodeset::Node;
use tracing::trace;

use super::{LinkRelations, category_terms, fold_links, parse_source, source_schema};
use crate::error::ParseResult;
use crate::model::Event;
use crate::record::{FieldValue, Record};
use crate::schema::{FieldSpec, ParseSchema, parse_node};
use crate::transforms::{id_from_urn, to_boolean, to_date, user_info};
use crate::xpath::Evaluator;

/// Relation names kept on event links.
pub static EVENT_LINK_RELATIONS: LazyLock<LinkRelations> = LazyLock::new(|| {
    LinkRelations::new(&[
        ("self", "self"),
        ("alternate", "alternate"),
        (
            "http://www.ibm.com/xmlns/prod/sn/calendar/event/parentevent",
            "parentevent",
        ),
        (
            "http://www.ibm.com/xmlns/prod/sn/calendar/event/attend",
            "attend",
        ),
        (
            "http://www.ibm.com/xmlns/prod/sn/calendar/event/follow",
            "follow",
        ),
        (
            "http://www.ibm.com/xmlns/prod/sn/calendar/event/attendees",
            "attendees",
        ),
        ("http://www.ibm.com/xmlns/prod/sn/container", "container"),
    ])
});

static EVENT_SOURCE_SCHEMA: LazyLock<ParseSchema> = LazyLock::new(|| {
    source_schema().field(
        "edit",
        "string(atom:link[@rel=\"edit\" and @type=\"application/atom+xml\"]/@href)",
    )
});

/// Fields extracted from an event `<entry>`.
pub static EVENT_SCHEMA: LazyLock<ParseSchema> = LazyLock::new(|| {
    ParseSchema::new()
        .field("id", FieldSpec::scalar_with("string(atom:id)", id_from_urn))
        .field(
            "published",
            FieldSpec::scalar_with("string(atom:published)", to_date),
        )
        .field(
            "updated",
            FieldSpec::scalar_with("string(atom:updated)", to_date),
        )
        .field(
            "startDate",
            FieldSpec::scalar_with("string(snx:startDate)", to_date),
        )
        .field(
            "endDate",
            FieldSpec::scalar_with("string(snx:endDate)", to_date),
        )
        .field(
            "allday",
            FieldSpec::scalar_with("number(snx:allday)", to_boolean),
        )
        .field("title", "string(atom:title[@type=\"text\"])")
        .field("summary", "string(atom:summary[@type=\"html\"])")
        .field("eventUuid", "string(snx:eventUuid)")
        .field("eventInstUuid", "string(snx:eventInstUuid)")
        .field("repeats", "string(snx:repeats)")
        .field("location", "string(snx:location)")
        .field("parentEvent", "string(snx:parentEvent)")
        .field("followed", "string(snx:followed)")
        .field("attended", "string(snx:attended)")
        .field("communityUuid", "string(snx:communityUuid)")
        .field("source", FieldSpec::node("atom:source", event_source))
        .field(
            "tags",
            FieldSpec::multi("atom:category[@term and not(@scheme)]", category_terms),
        )
        .field("links", FieldSpec::multi("atom:link", event_links))
        .field("contributor", user_info("atom:contributor"))
        .field("author", user_info("atom:author"))
});

fn event_source<'d>(eval: &Evaluator<'d>, node: Option<Node<'d>>) -> ParseResult<FieldValue> {
    parse_source(eval, node, &EVENT_SOURCE_SCHEMA)
}

fn event_links<'d>(eval: &Evaluator<'d>, nodes: &[Node<'d>]) -> ParseResult<FieldValue> {
    fold_links(eval, nodes, &EVENT_LINK_RELATIONS)
}

/// Parses an event `<entry>` into a record.
pub fn parse_event_record<'d>(eval: &Evaluator<'d>, entry: Node<'d>) -> ParseResult<Record> {
    let record = parse_node(eval, entry, &EVENT_SCHEMA)?;
    trace!(id = record.text("id").unwrap_or_default(), "parsed event entry");
    Ok(record)
}

/// Parses an event `<entry>` into an [`Event`].
pub fn parse_event_entry<'d>(eval: &Evaluator<'d>, entry: Node<'d>) -> ParseResult<Event> {
    parse_event_record(eval, entry)?.decode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::xpath::{XPathContext, parse_xml};
    use chrono::{TimeZone, Utc};

    const ENTRY: &str = r#"<entry xmlns="http://www.w3.org/2005/Atom" xmlns:snx="http://www.ibm.com/xmlns/prod/sn">
  <id>urn:lsid:ibm.com:calendar:event-2c688d78-5a78-42b2-a2dd-bd5f5493fdc2</id>
  <title type="text">Release planning</title>
  <summary type="html">&lt;p&gt;Agenda&lt;/p&gt;</summary>
  <published>2017-01-02T09:00:00.000Z</published>
  <updated>2017-01-03T09:00:00.000Z</updated>
  <snx:startDate>2017-01-05T14:00:00.000Z</snx:startDate>
  <snx:endDate></snx:endDate>
  <snx:allday>0</snx:allday>
  <snx:eventUuid>8f1d2c7a-0c9e-4a55-9a43-4b1b0d6f6a10</snx:eventUuid>
  <snx:eventInstUuid>2c688d78-5a78-42b2-a2dd-bd5f5493fdc2</snx:eventInstUuid>
  <snx:repeats>false</snx:repeats>
  <snx:location>Room 4</snx:location>
  <snx:communityUuid>5dd83cd6-d3a5-4fb3-89cd-1e2c04e52250</snx:communityUuid>
  <category scheme="http://www.ibm.com/xmlns/prod/sn/type" term="event"/>
  <category term="planning"/>
  <category term="release"/>
  <link rel="self" type="application/atom+xml" href="https://example.com/self"/>
  <link rel="http://www.ibm.com/xmlns/prod/sn/calendar/event/attend" type="application/atom+xml" href="https://example.com/attend"/>
  <link rel="edit" type="application/atom+xml" href="https://example.com/edit"/>
  <author>
    <name>Jane Doe</name>
    <snx:userid>0ef1f4c0-1d35-1033-9e5f-c3fa2a3f8a2e</snx:userid>
    <snx:userState>active</snx:userState>
    <email>jane@example.com</email>
  </author>
  <source>
    <id>urn:lsid:ibm.com:calendar:calendar-5dd83cd6-d3a5-4fb3-89cd-1e2c04e52250</id>
    <title type="text">Team calendar</title>
    <link rel="self" type="application/atom+xml" href="https://example.com/calendar"/>
    <link rel="edit" type="application/atom+xml" href="https://example.com/calendar/edit"/>
  </source>
</entry>"#;

    fn parse(xml: &str) -> ParseResult<Event> {
        let package = parse_xml(xml)?;
        let doc = package.as_document();
        let eval = XPathContext::default().evaluator();
        let entry = eval
            .select_first("/atom:entry", doc.root().into())?
            .expect("entry element");
        parse_event_entry(&eval, entry)
    }

    #[test]
    fn event_fields() {
        let event = parse(ENTRY).unwrap();

        assert_eq!(event.id, "2c688d78-5a78-42b2-a2dd-bd5f5493fdc2");
        assert_eq!(event.title, "Release planning");
        assert_eq!(event.summary, "<p>Agenda</p>");
        assert_eq!(
            event.start_date,
            Some(Utc.with_ymd_and_hms(2017, 1, 5, 14, 0, 0).unwrap())
        );
        assert_eq!(event.end_date, None);
        assert!(!event.allday);
        assert_eq!(event.location, "Room 4");
        assert_eq!(event.parent_event, "");
        assert_eq!(event.tags, ["planning", "release"]);
        assert_eq!(event.community_uuid, "5dd83cd6-d3a5-4fb3-89cd-1e2c04e52250");
    }

    #[test]
    fn event_links_and_nested_records() {
        let event = parse(ENTRY).unwrap();

        assert_eq!(event.links.len(), 2);
        assert_eq!(event.link("self").unwrap().href, "https://example.com/self");
        assert_eq!(
            event.link("attend").unwrap().rel,
            "http://www.ibm.com/xmlns/prod/sn/calendar/event/attend"
        );
        assert!(event.link("edit").is_none());

        let source = event.source.unwrap();
        assert_eq!(source.title, "Team calendar");
        assert_eq!(source.self_href, "https://example.com/calendar");
        assert_eq!(source.edit.as_deref(), Some("https://example.com/calendar/edit"));

        let author = event.author.unwrap();
        assert_eq!(author.user_id, "0ef1f4c0-1d35-1033-9e5f-c3fa2a3f8a2e");
        assert!(!author.is_external);
        assert!(event.contributor.is_none());
    }

    #[test]
    fn record_has_every_schema_field() {
        let package = parse_xml(ENTRY).unwrap();
        let doc = package.as_document();
        let eval = XPathContext::default().evaluator();
        let entry = eval
            .select_first("/atom:entry", doc.root().into())
            .unwrap()
            .unwrap();
        let record = parse_event_record(&eval, entry).unwrap();

        for name in EVENT_SCHEMA.names() {
            assert!(record.contains(name), "missing {name}");
        }
        assert_eq!(record.get("allday"), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn allday_flag() {
        let xml = ENTRY.replace("<snx:allday>0</snx:allday>", "<snx:allday>1</snx:allday>");
        assert!(parse(&xml).unwrap().allday);

        let xml = ENTRY.replace("<snx:allday>0</snx:allday>", "");
        assert!(!parse(&xml).unwrap().allday);
    }

    #[test]
    fn id_without_uuid_is_rejected() {
        let xml = ENTRY.replace(
            "urn:lsid:ibm.com:calendar:event-2c688d78-5a78-42b2-a2dd-bd5f5493fdc2",
            "urn:lsid:ibm.com:calendar:event",
        );
        assert!(matches!(
            parse(&xml),
            Err(ParseError::MalformedIdentifier(_))
        ));
    }
}
