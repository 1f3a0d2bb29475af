//! Typed views of parsed entries.
//!
//! Field names serialize in camelCase, matching the keys of the records the
//! entry schemas produce, so a [`Record`](crate::Record) decodes directly into
//! these types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person construct (`atom:author`, `atom:contributor`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub name: String,
    pub user_id: String,
    pub user_state: String,
    pub email: String,
    pub is_external: bool,
}

/// One `atom:link`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub href: String,
}

/// Links of an entry, keyed by their renamed relation (`self`, `container`, ...).
pub type Links = BTreeMap<String, Link>;

/// Provenance of an entry (`atom:source`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub title: String,
    #[serde(rename = "self")]
    pub self_href: String,
    /// Only present on event sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<String>,
}

/// A calendar event instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// UUID taken from the end of the atom id.
    pub id: String,
    pub title: String,
    /// HTML description.
    pub summary: String,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub allday: bool,
    pub event_uuid: String,
    pub event_inst_uuid: String,
    pub repeats: String,
    pub location: String,
    pub parent_event: String,
    pub followed: String,
    pub attended: String,
    pub community_uuid: String,
    /// Terms of the scheme-less categories, in document order.
    pub tags: Vec<String>,
    pub links: Links,
    pub source: Option<Source>,
    pub author: Option<UserInfo>,
    pub contributor: Option<UserInfo>,
}

impl Event {
    /// Returns the link stored under a renamed relation.
    pub fn link(&self, name: &str) -> Option<&Link> {
        self.links.get(name)
    }
}

/// A person attending an event instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub id: String,
    pub title: String,
    pub updated: Option<DateTime<Utc>>,
    pub role: String,
    /// Term of the `http://www.ibm.com/xmlns/prod/sn/type` category.
    pub category: String,
    pub community_uuid: String,
    pub links: Links,
    pub source: Option<Source>,
    pub author: Option<UserInfo>,
}

impl Attendee {
    pub fn link(&self, name: &str) -> Option<&Link> {
        self.links.get(name)
    }
}
