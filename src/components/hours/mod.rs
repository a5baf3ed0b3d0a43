//! Turns calendar events into the one-line hours shown in a placeholder.
//!
//! Each event becomes `"{weekday} {month}/{day} - {status}"`, where the status
//! is the event title, or "Closed for the day" once today's hours are over.

use crate::components::google_calendar::CalendarEvent;
use crate::diagnostics::DiagnosticLog;
use crate::error::{malformed_event_error, OpenHoursResult};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use std::fmt;
use tracing::warn;

/// Shown when a location has no upcoming events
pub const NO_HOURS_LISTED: &str = "No Hours Listed";

/// Status for today's entry once its end time has passed
pub const CLOSED_FOR_THE_DAY: &str = "Closed for the day";

/// Shown when the events could not be fetched
pub const UNABLE_TO_LOAD: &str = "Unable to load hours";

/// Clock time given to the start of an all-day event
const ALL_DAY_START: &str = "T00:00:00";

/// Clock time given to the end of an all-day event
const ALL_DAY_END: &str = "T23:59:00";

/// One formatted day of hours
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDayEntry {
    pub weekday_label: String,
    pub month_day_label: String,
    pub status_text: String,
}

impl fmt::Display for ResolvedDayEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} - {}", self.weekday_label, self.month_day_label, self.status_text)
    }
}

/// Result of resolving a location's hours
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationHours {
    Listed(Vec<ResolvedDayEntry>),
    NoneListed,
    Unavailable,
}

impl LocationHours {
    /// Lines to write into the placeholder
    pub fn lines(&self) -> Vec<String> {
        match self {
            LocationHours::Listed(entries) => entries.iter().map(ToString::to_string).collect(),
            LocationHours::NoneListed => vec![NO_HOURS_LISTED.to_string()],
            LocationHours::Unavailable => vec![UNABLE_TO_LOAD.to_string()],
        }
    }
}

/// Raw start and end timestamps of an event, synthesized for all-day events
pub fn event_bounds(event: &CalendarEvent, utc_offset: &str) -> OpenHoursResult<(String, String)> {
    let date = match (&event.start_date, &event.start_date_time) {
        (Some(date), _) => date.clone(),
        // YYYY-MM-DD prefix of the written timestamp
        (None, Some(start)) => start.chars().take(10).collect(),
        (None, None) => {
            return Err(malformed_event_error(&format!(
                "event '{}' has no start date or time",
                event.id
            )))
        }
    };

    let start = event
        .start_date_time
        .clone()
        .unwrap_or_else(|| format!("{}{}{}", date, ALL_DAY_START, utc_offset));
    let end = event
        .end_date_time
        .clone()
        .unwrap_or_else(|| format!("{}{}{}", date, ALL_DAY_END, utc_offset));

    Ok((start, end))
}

fn parse_instant(raw: &str, event: &CalendarEvent) -> OpenHoursResult<DateTime<chrono::FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).map_err(|e| {
        malformed_event_error(&format!("event '{}' has unreadable time '{}': {}", event.id, raw, e))
    })
}

/// Format one event relative to `now`, in `now`'s timezone
pub fn format_day<Tz: TimeZone>(
    event: &CalendarEvent,
    now: &DateTime<Tz>,
    utc_offset: &str,
) -> OpenHoursResult<ResolvedDayEntry> {
    let (start_raw, end_raw) = event_bounds(event, utc_offset)?;
    let start = parse_instant(&start_raw, event)?.with_timezone(&now.timezone());
    let end = parse_instant(&end_raw, event)?;

    // Only the day of the month is compared, so a stale event from an earlier
    // month with the same day number also reads as closed.
    let status_text = if start.day() == now.day() && end.with_timezone(&Utc) < now.with_timezone(&Utc) {
        CLOSED_FOR_THE_DAY.to_string()
    } else {
        event.title().to_string()
    };

    Ok(ResolvedDayEntry {
        weekday_label: start.weekday().to_string(),
        month_day_label: format!("{}/{}", start.month(), start.day()),
        status_text,
    })
}

/// Resolve every event of a location, skipping malformed ones
pub fn resolve_location<Tz: TimeZone>(
    events: &[CalendarEvent],
    now: &DateTime<Tz>,
    utc_offset: &str,
    log: &DiagnosticLog,
) -> LocationHours {
    let entries: Vec<ResolvedDayEntry> = events
        .iter()
        .filter_map(|event| match format_day(event, now, utc_offset) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping event: {}", e);
                log.log(&format!("Skipping event: {}", e));
                None
            }
        })
        .collect();

    if entries.is_empty() {
        LocationHours::NoneListed
    } else {
        LocationHours::Listed(entries)
    }
}

/// Display lines for a location's events
pub fn format_location<Tz: TimeZone>(
    events: &[CalendarEvent],
    now: &DateTime<Tz>,
    utc_offset: &str,
    log: &DiagnosticLog,
) -> Vec<String> {
    resolve_location(events, now, utc_offset, log).lines()
}
