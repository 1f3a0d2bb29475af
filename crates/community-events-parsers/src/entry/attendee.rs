//! Event attendee entries.

use std::sync::LazyLock;

use sxd_xpath::nodeset::Node;
use tracing::trace;

use super::{LinkRelations, fold_links, parse_source, source_schema};
use crate::error::ParseResult;
use crate::model::Attendee;
use crate::record::{FieldValue, Record};
use crate::schema::{FieldSpec, ParseSchema, parse_node};
use crate::transforms::{id_from_urn, to_date, user_info};
use crate::xpath::Evaluator;

/// Relation names kept on attendee links.
pub static ATTENDEE_LINK_RELATIONS: LazyLock<LinkRelations> = LazyLock::new(|| {
    LinkRelations::new(&[
        ("self", "self"),
        ("http://www.ibm.com/xmlns/prod/sn/container", "container"),
    ])
});

static ATTENDEE_SOURCE_SCHEMA: LazyLock<ParseSchema> = LazyLock::new(source_schema);

/// Fields extracted from an attendee `<entry>`.
pub static ATTENDEE_SCHEMA: LazyLock<ParseSchema> = LazyLock::new(|| {
    ParseSchema::new()
        .field("id", FieldSpec::scalar_with("string(atom:id)", id_from_urn))
        .field(
            "updated",
            FieldSpec::scalar_with("string(atom:updated)", to_date),
        )
        .field("title", "string(atom:title[@type=\"text\"])")
        .field("role", "string(snx:role)")
        .field(
            "category",
            "string(atom:category[@scheme=\"http://www.ibm.com/xmlns/prod/sn/type\"]/@term)",
        )
        .field("communityUuid", "string(snx:communityUuid)")
        .field("source", FieldSpec::node("atom:source", attendee_source))
        .field("links", FieldSpec::multi("atom:link", attendee_links))
        .field("author", user_info("atom:author"))
});

fn attendee_source<'d>(eval: &Evaluator<'d>, node: Option<Node<'d>>) -> ParseResult<FieldValue> {
    parse_source(eval, node, &ATTENDEE_SOURCE_SCHEMA)
}

fn attendee_links<'d>(eval: &Evaluator<'d>, nodes: &[Node<'d>]) -> ParseResult<FieldValue> {
    fold_links(eval, nodes, &ATTENDEE_LINK_RELATIONS)
}

/// Parses an attendee `<entry>` into a record.
pub fn parse_attendee_record<'d>(eval: &Evaluator<'d>, entry: Node<'d>) -> ParseResult<Record> {
    let record = parse_node(eval, entry, &ATTENDEE_SCHEMA)?;
    trace!(id = record.text("id").unwrap_or_default(), "parsed attendee entry");
    Ok(record)
}

/// Parses an attendee `<entry>` into an [`Attendee`].
pub fn parse_attendee_entry<'d>(eval: &Evaluator<'d>, entry: Node<'d>) -> ParseResult<Attendee> {
    parse_attendee_record(eval, entry)?.decode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xpath::{XPathContext, parse_xml};

    const ENTRY: &str = r#"<entry xmlns="http://www.w3.org/2005/Atom" xmlns:snx="http://www.ibm.com/xmlns/prod/sn">
  <id>urn:lsid:ibm.com:calendar:attendee-7b0b3f5e-9d2c-4c1a-8e2f-6a9d1c3e5f70</id>
  <title type="text">Jane Doe is attending</title>
  <updated>2017-01-03T10:15:00.000Z</updated>
  <category scheme="http://www.ibm.com/xmlns/prod/sn/type" term="attend"/>
  <snx:role>attendee</snx:role>
  <snx:communityUuid>5dd83cd6-d3a5-4fb3-89cd-1e2c04e52250</snx:communityUuid>
  <link rel="self" type="application/atom+xml" href="https://example.com/attendee"/>
  <link rel="http://www.ibm.com/xmlns/prod/sn/container" type="application/atom+xml" href="https://example.com/community"/>
  <link rel="http://www.ibm.com/xmlns/prod/sn/calendar/event/attend" type="application/atom+xml" href="https://example.com/ignored"/>
  <author>
    <name>Jane Doe</name>
    <snx:userid>0ef1f4c0-1d35-1033-9e5f-c3fa2a3f8a2e</snx:userid>
    <snx:userState>active</snx:userState>
    <email>jane@example.com</email>
    <snx:isExternal>true</snx:isExternal>
  </author>
  <contributor><name>Not parsed</name></contributor>
  <source>
    <id>urn:lsid:ibm.com:calendar:event-2c688d78-5a78-42b2-a2dd-bd5f5493fdc2</id>
    <title type="text">Release planning</title>
    <link rel="self" type="application/atom+xml" href="https://example.com/event"/>
  </source>
</entry>"#;

    fn parse_record() -> Record {
        let package = parse_xml(ENTRY).unwrap();
        let doc = package.as_document();
        let eval = XPathContext::default().evaluator();
        let entry = eval
            .select_first("/atom:entry", doc.root().into())
            .unwrap()
            .unwrap();
        parse_attendee_record(&eval, entry).unwrap()
    }

    #[test]
    fn attendee_fields() {
        let attendee: Attendee = parse_record().decode().unwrap();

        assert_eq!(attendee.id, "7b0b3f5e-9d2c-4c1a-8e2f-6a9d1c3e5f70");
        assert_eq!(attendee.title, "Jane Doe is attending");
        assert_eq!(attendee.role, "attendee");
        assert_eq!(attendee.category, "attend");
        assert_eq!(attendee.community_uuid, "5dd83cd6-d3a5-4fb3-89cd-1e2c04e52250");
        assert!(attendee.updated.is_some());

        let author = attendee.author.unwrap();
        assert_eq!(author.name, "Jane Doe");
        assert!(author.is_external);
    }

    #[test]
    fn attendee_links_only_self_and_container() {
        let attendee: Attendee = parse_record().decode().unwrap();
        let names: Vec<_> = attendee.links.keys().map(String::as_str).collect();
        assert_eq!(names, ["container", "self"]);
        assert_eq!(
            attendee.link("container").unwrap().href,
            "https://example.com/community"
        );
    }

    #[test]
    fn attendee_source_has_no_edit_link() {
        let record = parse_record();
        let source = record.get("source").unwrap().as_record().unwrap();
        assert!(!source.contains("edit"));
        assert_eq!(source.text("self"), Some("https://example.com/event"));
    }

    #[test]
    fn attendee_has_no_contributor() {
        assert!(!parse_record().contains("contributor"));
    }
}
