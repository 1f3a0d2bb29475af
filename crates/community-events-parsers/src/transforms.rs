//! Value transforms shared by the entry parsers.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use sxd_xpath::nodeset::Node;
use tracing::warn;

use crate::error::{ParseError, ParseResult};
use crate::record::FieldValue;
use crate::schema::{FieldSpec, ParseSchema, parse_node};
use crate::xpath::{Evaluator, Scalar};

/// Trailing UUID of a URN-style atom id.
static URN_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-zA-Z0-9]{8}-[a-zA-Z0-9]{4}-[a-zA-Z0-9]{4}-[a-zA-Z0-9]{4}-[a-zA-Z0-9]{12})$")
        .expect("Invalid URN id regex")
});

/// Fields of an `atom:author` / `atom:contributor` element.
static USER_INFO_SCHEMA: LazyLock<ParseSchema> = LazyLock::new(|| {
    ParseSchema::new()
        .field("name", "string(atom:name)")
        .field("userId", "string(snx:userid)")
        .field("userState", "string(snx:userState)")
        .field("email", "string(atom:email)")
        .field(
            "isExternal",
            "boolean(snx:isExternal[normalize-space(.) = 'true'])",
        )
});

/// Extracts the UUID suffix of a URN such as
/// `urn:lsid:ibm.com:calendar:event-2c688d78-5a78-42b2-a2dd-bd5f5493fdc2`.
pub fn urn_to_id(urn: &str) -> ParseResult<String> {
    let urn = urn.trim();
    URN_ID_REGEX
        .captures(urn)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ParseError::MalformedIdentifier(urn.to_string()))
}

/// [`urn_to_id`] as a scalar transform.
pub fn id_from_urn(raw: Scalar) -> ParseResult<FieldValue> {
    urn_to_id(&raw.into_text()).map(FieldValue::Text)
}

/// Parses an Atom timestamp.
///
/// Accepts RFC 3339, basic offsets (`+0100`), timestamps without an offset
/// and bare dates. The last two are taken as UTC, a bare date at midnight.
/// Empty or unparseable text yields [`FieldValue::Null`], so one odd entry
/// never fails a whole feed.
pub fn to_date(raw: Scalar) -> ParseResult<FieldValue> {
    let text = raw.into_text();
    let text = text.trim();
    if text.is_empty() {
        return Ok(FieldValue::Null);
    }

    match parse_timestamp(text) {
        Some(date) => Ok(FieldValue::Date(date)),
        None => {
            warn!(value = text, "ignoring unparseable timestamp");
            Ok(FieldValue::Null)
        }
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Truthiness of a scalar: non-zero numbers, non-empty text.
pub fn to_boolean(raw: Scalar) -> ParseResult<FieldValue> {
    let flag = match raw {
        Scalar::Boolean(b) => b,
        Scalar::Number(n) => n != 0.0 && !n.is_nan(),
        Scalar::Text(text) => !text.is_empty(),
    };
    Ok(FieldValue::Bool(flag))
}

/// Parses a person construct (author, contributor).
pub fn parse_user_info<'d>(eval: &Evaluator<'d>, node: Option<Node<'d>>) -> ParseResult<FieldValue> {
    match node {
        Some(node) => Ok(parse_node(eval, node, &USER_INFO_SCHEMA)?.into()),
        None => Ok(FieldValue::Null),
    }
}

/// `FieldSpec` for a person construct under `selector`.
pub fn user_info(selector: &'static str) -> FieldSpec {
    FieldSpec::node(selector, parse_user_info)
}
