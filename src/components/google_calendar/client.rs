use super::models::{CalendarEvent, EventsQuery};
use super::EventSource;
use crate::error::{google_calendar_error, OpenHoursResult};
use crate::utils::time::to_iso_millis;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Google Calendar v3 client authenticated with an API key
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleCalendarClient {
    pub fn new(api_key: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the events.list URL for a query
    pub fn events_url(&self, query: &EventsQuery) -> OpenHoursResult<Url> {
        let mut url = Url::parse(&format!("{}/calendars", self.base_url))
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| google_calendar_error("Base URL cannot carry a path"))?
            .push(&query.calendar_id)
            .push("events");

        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("timeMin", &to_iso_millis(&query.time_min))
            .append_pair("showDeleted", "false")
            .append_pair("singleEvents", "true")
            .append_pair("maxResults", &query.max_results.to_string())
            .append_pair("orderBy", "startTime");

        Ok(url)
    }
}

#[async_trait]
impl EventSource for GoogleCalendarClient {
    async fn list_events(&self, query: &EventsQuery) -> OpenHoursResult<Vec<CalendarEvent>> {
        let url = self.events_url(query)?;
        debug!("Requesting events for calendar {}", query.calendar_id);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to fetch events: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to fetch events: HTTP {} - {}",
                status, error_body
            )));
        }

        let response_data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse events response: {}", e)))?;

        // The API leaves out `items` entirely when nothing matches
        let events = response_data
            .get("items")
            .and_then(|i| i.as_array())
            .map(|items| items.iter().map(CalendarEvent::from_api_item).collect())
            .unwrap_or_default();

        Ok(events)
    }
}
