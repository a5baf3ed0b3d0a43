use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Google Calendar API key and calendar(s) not set")]
    #[diagnostic(
        code(openhours::configuration_missing),
        help("Set OPENHOURS_API_KEY and add a [calendars] table to the config file")
    )]
    ConfigurationMissing,

    #[error("No calendar configured for location: {0}")]
    #[diagnostic(code(openhours::unknown_location))]
    UnknownLocation(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(openhours::google_calendar))]
    GoogleCalendar(String),

    #[error("Malformed event: {0}")]
    #[diagnostic(code(openhours::malformed_event))]
    MalformedEvent(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(openhours::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(openhours::config))]
    Config(String),

    #[error("Page error: {0}")]
    #[diagnostic(code(openhours::page))]
    Page(String),

    #[error(transparent)]
    #[diagnostic(code(openhours::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(openhours::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(openhours::other))]
    Other(String),
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type OpenHoursResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(message: &str) -> Error {
    Error::Environment(message.to_string())
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create malformed event errors
pub fn malformed_event_error(message: &str) -> Error {
    Error::MalformedEvent(message.to_string())
}

/// Helper to create page errors
pub fn page_error(message: &str) -> Error {
    Error::Page(message.to_string())
}
