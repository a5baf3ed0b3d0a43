mod client;
pub mod models;

pub use client::GoogleCalendarClient;
pub use models::{CalendarEvent, EventsQuery, Window};

use crate::config::Config;
use crate::error::{Error, OpenHoursResult};
use crate::utils::time::start_of_day;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone};

/// Anything that can answer an events.list query
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Return the events matching the query, in start-time order
    async fn list_events(&self, query: &EventsQuery) -> OpenHoursResult<Vec<CalendarEvent>>;
}

/// Build the query for a location's upcoming hours
pub fn events_query<Tz: TimeZone>(
    config: &Config,
    location: &str,
    window: Window,
    now: &DateTime<Tz>,
) -> OpenHoursResult<EventsQuery> {
    let calendar_id = config
        .calendar_for(location)
        .ok_or_else(|| Error::UnknownLocation(location.to_string()))?;

    Ok(EventsQuery {
        calendar_id: calendar_id.to_string(),
        time_min: start_of_day(now),
        max_results: window.days(),
    })
}

/// Fetch upcoming events for a location, starting at midnight of `now`'s date
pub async fn fetch_events<Tz: TimeZone>(
    source: &dyn EventSource,
    config: &Config,
    location: &str,
    window: Window,
    now: &DateTime<Tz>,
) -> OpenHoursResult<Vec<CalendarEvent>> {
    let query = events_query(config, location, window, now)?;
    source.list_events(&query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_events_query_for_known_location() {
        let mut config = Config::default();
        config.locations.insert("MAIN".to_string(), "main@example.com".to_string());
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap();

        let query = events_query(&config, "MAIN", Window::Week, &now).unwrap();
        assert_eq!(query.calendar_id, "main@example.com");
        assert_eq!(query.max_results, 7);
        assert_eq!(query.time_min, Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_events_query_for_unknown_location() {
        let config = Config::default();
        let now = Utc::now();

        match events_query(&config, "NOWHERE", Window::Today, &now) {
            Err(Error::UnknownLocation(location)) => assert_eq!(location, "NOWHERE"),
            other => panic!("expected UnknownLocation, got {:?}", other),
        }
    }
}
