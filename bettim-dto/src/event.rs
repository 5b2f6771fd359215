//! Sports events shown on the admin dashboard.
//!
//! The dashboard mixes two representations of the same shape: events already
//! persisted by the platform (they carry a database identifier) and events
//! sourced from an external provider that can be imported.

use serde::{Deserialize, Serialize};

/// A team taking part in an event
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logo_url: String,
}

/// Upcoming sports event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Persisted identifier, present only for events stored by the platform
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub db_id: Option<String>,

    /// Provider event identifier (used for deletion)
    pub id: String,

    /// Sport / competition type (e.g. "NBA")
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Start time in milliseconds since epoch
    #[serde(default)]
    pub start_date: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default)]
    pub home_team: Team,

    #[serde(default)]
    pub away_team: Team,

    #[serde(default)]
    pub is_visible: bool,

    #[serde(default)]
    pub is_in_database: bool,
}

impl Event {
    /// Whether the platform already stores this event
    pub fn is_persisted(&self) -> bool {
        self.db_id.is_some() || self.is_in_database
    }

    /// "Home VS Away" label
    pub fn matchup(&self) -> String {
        format!("{} VS {}", self.home_team.name, self.away_team.name)
    }

    /// The action the dashboard offers for this event
    pub fn action(&self) -> EventAction {
        if self.is_persisted() || self.is_visible {
            EventAction::Remove
        } else {
            EventAction::Add
        }
    }
}

/// Dashboard toggle for one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    /// Import an external event (POST)
    Add,
    /// Remove a persisted event (DELETE)
    Remove,
}

impl EventAction {
    pub fn label(self) -> &'static str {
        match self {
            EventAction::Add => "Add",
            EventAction::Remove => "Remove",
        }
    }
}

/// `data` payload of `GET /admin/events/dashboard`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEvents {
    #[serde(default)]
    pub db_events: Vec<Event>,
    #[serde(default)]
    pub external_events: Vec<Event>,
}

impl DashboardEvents {
    /// Look up an event in either group
    pub fn find(&self, id: &str) -> Option<&Event> {
        self.db_events
            .iter()
            .chain(self.external_events.iter())
            .find(|e| e.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.db_events.is_empty() && self.external_events.is_empty()
    }
}
