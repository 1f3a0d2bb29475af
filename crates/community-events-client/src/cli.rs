//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::methods::{Query, RequestOptions};

/// community-events - Query community calendars
#[derive(Debug, Parser)]
#[command(name = "community-events")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "COMMUNITY_EVENTS_CONFIG")]
    pub config: PathBuf,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Authentication type for this call (overrides the configuration)
    #[arg(long)]
    pub auth_type: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Per-call options derived from the global flags.
    pub fn request_options(&self) -> RequestOptions {
        match &self.auth_type {
            Some(auth_type) => RequestOptions::new().with_auth_type(auth_type),
            None => RequestOptions::new(),
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the events of a community calendar
    Events {
        /// Community calendar UUID
        #[arg(long)]
        calendar_uuid: String,

        /// Include instances ending after this date
        #[arg(long, required_unless_present = "end_date")]
        start_date: Option<String>,

        /// Include instances ending before this date
        #[arg(long)]
        end_date: Option<String>,

        /// Page number
        #[arg(long)]
        page: Option<u32>,

        /// Page size
        #[arg(long)]
        ps: Option<u32>,

        /// Filter by tag
        #[arg(long)]
        tags: Option<String>,
    },

    /// Show a single event instance
    Event {
        /// Event instance UUID
        #[arg(long)]
        event_inst_uuid: String,
    },

    /// List the attendees of an event instance
    Attendees {
        /// Event instance UUID
        #[arg(long)]
        event_inst_uuid: String,

        /// Page number
        #[arg(long)]
        page: Option<u32>,

        /// Page size
        #[arg(long)]
        ps: Option<u32>,
    },
}

impl Command {
    /// Query parameters for the command.
    pub fn query(&self) -> Query {
        match self {
            Self::Events {
                calendar_uuid,
                start_date,
                end_date,
                page,
                ps,
                tags,
            } => Query::new()
                .with("calendarUuid", calendar_uuid)
                .with_opt("startDate", start_date.as_deref())
                .with_opt("endDate", end_date.as_deref())
                .with_opt("page", page.map(|p| p.to_string()))
                .with_opt("ps", ps.map(|p| p.to_string()))
                .with_opt("tags", tags.as_deref()),
            Self::Event { event_inst_uuid } => Query::new().with("eventInstUuid", event_inst_uuid),
            Self::Attendees {
                event_inst_uuid,
                page,
                ps,
            } => Query::new()
                .with("eventInstUuid", event_inst_uuid)
                .with_opt("page", page.map(|p| p.to_string()))
                .with_opt("ps", ps.map(|p| p.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_arguments() {
        let cli = Cli::try_parse_from([
            "community-events",
            "--config",
            "service.toml",
            "events",
            "--calendar-uuid",
            "5dd83cd6-d3a5-4fb3-89cd-1e2c04e52250",
            "--start-date",
            "2017-01-04T20:32:31.171Z",
            "--ps",
            "50",
        ])
        .unwrap();

        let query = cli.command.query();
        assert_eq!(
            query.get("calendarUuid"),
            Some("5dd83cd6-d3a5-4fb3-89cd-1e2c04e52250")
        );
        assert_eq!(query.get("startDate"), Some("2017-01-04T20:32:31.171Z"));
        assert_eq!(query.get("ps"), Some("50"));
        assert_eq!(query.get("endDate"), None);
        assert_eq!(cli.request_options(), RequestOptions::new());
    }

    #[test]
    fn events_need_a_date() {
        let result = Cli::try_parse_from([
            "community-events",
            "--config",
            "service.toml",
            "events",
            "--calendar-uuid",
            "c",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn auth_type_flag() {
        let cli = Cli::try_parse_from([
            "community-events",
            "--config",
            "service.toml",
            "--auth-type",
            "oauth",
            "event",
            "--event-inst-uuid",
            "e",
        ])
        .unwrap();
        assert_eq!(cli.request_options().auth_type.as_deref(), Some("oauth"));
        assert_eq!(cli.command.query().get("eventInstUuid"), Some("e"));
    }

    #[test]
    fn attendees_arguments() {
        let cli = Cli::try_parse_from([
            "community-events",
            "-c",
            "service.toml",
            "attendees",
            "--event-inst-uuid",
            "e",
            "--page",
            "2",
        ])
        .unwrap();
        let query = cli.command.query();
        assert_eq!(query.get("page"), Some("2"));
        assert_eq!(query.get("type"), None);
    }
}
