//! Parsers for single Atom `<entry>` elements.
//!
//! Both entry types share two structural rules: links are folded into one
//! record keyed by a renamed relation, and `atom:source` is parsed with a
//! small nested schema.

mod attendee;
mod event;

use std::collections::HashMap;

use sxd_xpath::nodeset::Node;
use tracing::debug;

use crate::error::ParseResult;
use crate::record::{FieldValue, Record};
use crate::schema::{ParseSchema, parse_node};
use crate::xpath::Evaluator;

pub use attendee::{
    ATTENDEE_LINK_RELATIONS, ATTENDEE_SCHEMA, parse_attendee_entry, parse_attendee_record,
};
pub use event::{EVENT_LINK_RELATIONS, EVENT_SCHEMA, parse_event_entry, parse_event_record};

/// Immutable table from a link's `rel` attribute to an output name.
#[derive(Debug, Clone)]
pub struct LinkRelations {
    names: HashMap<&'static str, &'static str>,
}

impl LinkRelations {
    pub fn new(pairs: &[(&'static str, &'static str)]) -> Self {
        Self {
            names: pairs.iter().copied().collect(),
        }
    }

    /// Output name for `rel`, or `None` for unknown relations.
    pub fn name_for(&self, rel: &str) -> Option<&'static str> {
        self.names.get(rel).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn link_schema() -> ParseSchema {
    ParseSchema::new()
        .field("rel", "string(@rel)")
        .field("type", "string(@type)")
        .field("href", "string(@href)")
}

/// Folds link nodes into one record keyed by renamed relation.
///
/// A later link with the same resolved name overwrites an earlier one.
/// Links with an unknown relation are skipped.
fn fold_links<'d>(
    eval: &Evaluator<'d>,
    nodes: &[Node<'d>],
    relations: &LinkRelations,
) -> ParseResult<FieldValue> {
    let schema = link_schema();
    let mut links = Record::new();
    for node in nodes {
        let link = parse_node(eval, *node, &schema)?;
        let rel = link.text("rel").unwrap_or_default().to_string();
        match relations.name_for(&rel) {
            Some(name) => links.insert(name, link),
            None => debug!(rel = %rel, "dropping link with unknown relation"),
        }
    }
    Ok(links.into())
}

/// Source fields common to both entry types.
fn source_schema() -> ParseSchema {
    ParseSchema::new()
        .field("id", "string(atom:id)")
        .field("title", "string(atom:title[@type=\"text\"])")
        .field(
            "self",
            "string(atom:link[@rel=\"self\" and @type=\"application/atom+xml\"]/@href)",
        )
}

fn parse_source<'d>(
    eval: &Evaluator<'d>,
    node: Option<Node<'d>>,
    schema: &ParseSchema,
) -> ParseResult<FieldValue> {
    match node {
        Some(node) => Ok(parse_node(eval, node, schema)?.into()),
        None => Ok(FieldValue::Null),
    }
}

/// `term` attributes of category nodes, in document order.
fn category_terms<'d>(_: &Evaluator<'d>, nodes: &[Node<'d>]) -> ParseResult<FieldValue> {
    Ok(FieldValue::List(
        nodes
            .iter()
            .filter_map(|node| crate::xpath::attribute(*node, "term"))
            .map(|term| FieldValue::Text(term.to_string()))
            .collect(),
    ))
}
