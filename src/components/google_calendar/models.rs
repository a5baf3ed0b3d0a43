use chrono::{DateTime, Utc};
use serde_json::Value;

/// Simplified calendar event representation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub start_date_time: Option<String>,
    pub start_date: Option<String>,
    pub end_date_time: Option<String>,
}

impl CalendarEvent {
    /// An all-day event on the given YYYY-MM-DD date
    pub fn all_day(date: &str, summary: &str) -> Self {
        Self {
            summary: Some(summary.to_string()),
            start_date: Some(date.to_string()),
            ..Default::default()
        }
    }

    /// A timed event between two RFC 3339 timestamps
    pub fn timed(start: &str, end: &str, summary: &str) -> Self {
        Self {
            summary: Some(summary.to_string()),
            start_date_time: Some(start.to_string()),
            end_date_time: Some(end.to_string()),
            ..Default::default()
        }
    }

    /// Title shown for the event, empty when the calendar has none
    pub fn title(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }

    /// Build an event from one entry of the API's `items` array
    pub fn from_api_item(item: &Value) -> Self {
        let field = |outer: &str, inner: &str| {
            item.get(outer)
                .and_then(|o| o.as_object())
                .and_then(|o| o.get(inner))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };

        Self {
            id: item.get("id").and_then(|id| id.as_str()).unwrap_or("").to_string(),
            summary: item.get("summary").and_then(|s| s.as_str()).map(|s| s.to_string()),
            start_date_time: field("start", "dateTime"),
            start_date: field("start", "date"),
            end_date_time: field("end", "dateTime"),
        }
    }
}

/// Number of upcoming days requested for a placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Today only
    Today,
    /// The next seven days
    Week,
}

impl Window {
    /// Window for a placeholder, seven days when it is marked daily
    pub fn for_placeholder(daily: bool) -> Self {
        if daily {
            Window::Week
        } else {
            Window::Today
        }
    }

    pub fn days(self) -> u32 {
        match self {
            Window::Today => 1,
            Window::Week => 7,
        }
    }
}

/// One events.list request
#[derive(Debug, Clone, PartialEq)]
pub struct EventsQuery {
    pub calendar_id: String,
    pub time_min: DateTime<Utc>,
    pub max_results: u32,
}
