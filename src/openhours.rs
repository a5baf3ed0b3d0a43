use crate::components::google_calendar::{
    fetch_events, CalendarEvent, EventSource, GoogleCalendarClient, Window,
};
use crate::components::hours::{event_bounds, resolve_location, LocationHours};
use crate::components::page::{Page, Placeholder, PlaceholderId};
use crate::config::{Config, ConfigUpdate};
use crate::diagnostics::{DiagnosticLog, LogSink, TracingSink};
use crate::error::{Error, OpenHoursResult};
use chrono::{DateTime, Local, TimeZone, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Version reported when loading
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How one placeholder settled during a refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderOutcome {
    pub id: PlaceholderId,
    pub location: String,
    pub window: Window,
    pub hours: LocationHours,
}

/// Every placeholder's outcome, available once all have settled
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub outcomes: Vec<PlaceholderOutcome>,
}

impl RefreshSummary {
    /// Placeholders that received at least one day of hours
    pub fn listed(&self) -> usize {
        self.count(|hours| matches!(hours, LocationHours::Listed(_)))
    }

    /// Placeholders showing the "No Hours Listed" default
    pub fn none_listed(&self) -> usize {
        self.count(|hours| matches!(hours, LocationHours::NoneListed))
    }

    /// Placeholders whose fetch failed
    pub fn unavailable(&self) -> usize {
        self.count(|hours| matches!(hours, LocationHours::Unavailable))
    }

    fn count(&self, predicate: impl Fn(&LocationHours) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(&o.hours)).count()
    }
}

/// Actions accepted by [`OpenHours::dispatch`]
#[derive(Debug, Clone)]
pub enum Command {
    Config(ConfigUpdate),
    Load,
    Debug(Option<String>),
    Unknown(String),
}

impl Command {
    /// Parse an action name and its parameters, e.g. `("config", {"apiKey": ".."})`
    pub fn parse(action: &str, params: Option<&Value>) -> OpenHoursResult<Self> {
        match action.to_lowercase().as_str() {
            "config" => {
                let update = match params {
                    Some(params) => serde_json::from_value(params.clone())
                        .map_err(|e| Error::Serialization(e.to_string()))?,
                    None => ConfigUpdate::default(),
                };
                Ok(Command::Config(update))
            }
            "load" => Ok(Command::Load),
            "debug" => Ok(Command::Debug(
                params
                    .and_then(|p| p.get("message"))
                    .and_then(|m| m.as_str())
                    .map(|m| m.to_string()),
            )),
            _ => Ok(Command::Unknown(action.to_string())),
        }
    }
}

/// Fetches and renders open hours for every placeholder on a page
pub struct OpenHours {
    config: Config,
    log: DiagnosticLog,
    source: Option<Arc<dyn EventSource>>,
}

impl OpenHours {
    pub fn new(config: Config) -> Self {
        Self {
            log: DiagnosticLog::with_silence(Arc::new(TracingSink), config.silent),
            config,
            source: None,
        }
    }

    /// Send diagnostic lines to a custom sink
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log = DiagnosticLog::with_silence(sink, self.log.is_silent());
        self
    }

    /// Use a specific event source instead of the Google client
    pub fn with_source(mut self, source: Arc<dyn EventSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    pub fn set_key(&mut self, key: &str) {
        self.config.api_key = key.to_string();
    }

    pub fn set_calendars(&mut self, calendars: HashMap<String, String>) {
        self.config.locations = calendars;
    }

    pub fn set_time_offset(&mut self, offset: &str) {
        self.config.utc_offset = offset.to_string();
    }

    pub fn set_silence(&mut self, silence: bool) {
        self.config.silent = silence;
        self.log.set_silence(silence);
    }

    /// Apply whichever settings the update carries
    pub fn configure(&mut self, update: ConfigUpdate) {
        if let Some(silence) = update.silence {
            self.set_silence(silence);
        }
        if let Some(calendars) = update.calendar {
            self.set_calendars(calendars);
        }
        if let Some(key) = update.api_key {
            self.set_key(&key);
        }
        if let Some(offset) = update.time_offset {
            self.set_time_offset(&offset);
        }
    }

    /// Write a line to the diagnostic log
    pub fn log_message(&self, text: &str) {
        self.log.log(text);
    }

    /// Run a single command
    pub async fn dispatch(
        &mut self,
        command: Command,
        page: &mut dyn Page,
    ) -> OpenHoursResult<Option<RefreshSummary>> {
        match command {
            Command::Config(update) => {
                self.configure(update);
                Ok(None)
            }
            Command::Load => self.load(page).await.map(Some),
            Command::Debug(message) => {
                if let Some(message) = message {
                    self.log_message(&message);
                }
                Ok(None)
            }
            Command::Unknown(action) => {
                self.log_message(&format!("Unknown Command for openhours(): {}", action));
                Ok(None)
            }
        }
    }

    /// Load the hours once the page is ready, if it has an openhours container
    pub async fn bootstrap_page(&mut self, page: &mut dyn Page) -> OpenHoursResult<Option<RefreshSummary>> {
        if !page.has_container() {
            debug!("No openhours container on the page");
            return Ok(None);
        }

        self.log_message("Placeholder for Open Hours Found");
        self.log_message("Load called");
        self.load(page).await.map(Some)
    }

    /// Check the configuration, ready the event source and refresh every placeholder
    pub async fn load(&mut self, page: &mut dyn Page) -> OpenHoursResult<RefreshSummary> {
        if !self.config.is_ready() {
            // Configuration problems must always be heard
            self.config.silent = false;
            self.log.force_unsilence();
            self.log.log(
                "Google Calendar API Key and Calendar(s) not set! Please read Open Hours doc for more information.",
            );
            warn!("Load skipped, configuration missing");
            return Err(Error::ConfigurationMissing);
        }

        self.log.log(&format!("Version: {}", VERSION));

        let source: Arc<dyn EventSource> = match &self.source {
            Some(source) => Arc::clone(source),
            None => Arc::new(GoogleCalendarClient::new(
                &self.config.api_key,
                &self.config.api_base_url,
            )),
        };
        info!("Calendar client ready, listing upcoming hours");

        self.refresh_all(page, source.as_ref()).await
    }

    /// Refresh every placeholder using the current time in the display timezone
    pub async fn refresh_all(
        &self,
        page: &mut dyn Page,
        source: &dyn EventSource,
    ) -> OpenHoursResult<RefreshSummary> {
        let summary = match self.config.display_timezone()? {
            Some(tz) => self.refresh_at(page, source, Utc::now().with_timezone(&tz)).await,
            None => self.refresh_at(page, source, Local::now()).await,
        };
        Ok(summary)
    }

    /// Refresh every placeholder as of `now`
    ///
    /// All fetches are issued together and each placeholder is written as soon
    /// as its own fetch settles.
    pub async fn refresh_at<Tz: TimeZone>(
        &self,
        page: &mut dyn Page,
        source: &dyn EventSource,
        now: DateTime<Tz>,
    ) -> RefreshSummary {
        let mut pending = FuturesUnordered::new();

        for placeholder in page.placeholders() {
            let window = Window::for_placeholder(placeholder.daily);
            self.log.log(&format!("Getting hours for: {}", placeholder.location));

            // Show the pending marker straight away so the page doesn't jump later
            page.clear(placeholder.id);

            let config = &self.config;
            let now = now.clone();
            pending.push(async move {
                let result = fetch_events(source, config, &placeholder.location, window, &now).await;
                (placeholder, window, result)
            });
        }

        let mut summary = RefreshSummary::default();
        while let Some((placeholder, window, result)) = pending.next().await {
            let hours = self.settle(&placeholder, result, &now);
            page.write(placeholder.id, &hours.lines());

            summary.outcomes.push(PlaceholderOutcome {
                id: placeholder.id,
                location: placeholder.location,
                window,
                hours,
            });
        }

        info!(
            "Refreshed {} placeholders ({} listed, {} empty, {} unavailable)",
            summary.outcomes.len(),
            summary.listed(),
            summary.none_listed(),
            summary.unavailable()
        );
        summary
    }

    fn settle<Tz: TimeZone>(
        &self,
        placeholder: &Placeholder,
        result: OpenHoursResult<Vec<CalendarEvent>>,
        now: &DateTime<Tz>,
    ) -> LocationHours {
        match result {
            Ok(events) => {
                for event in &events {
                    if let Ok((start, end)) = event_bounds(event, &self.config.utc_offset) {
                        self.log.log(&format!("{} Event: {} - {}", placeholder.location, start, end));
                    }
                }
                resolve_location(&events, now, &self.config.utc_offset, &self.log)
            }
            Err(e) => {
                error!("Failed to load hours for {}: {}", placeholder.location, e);
                self.log.log(&format!("Unable to load hours for {}: {}", placeholder.location, e));
                LocationHours::Unavailable
            }
        }
    }
}
