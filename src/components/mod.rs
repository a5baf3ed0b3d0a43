// Export components
pub mod google_calendar;
pub mod hours;
pub mod page;

// Re-export the pieces the orchestrator wires together
pub use google_calendar::{EventSource, GoogleCalendarClient};
pub use hours::LocationHours;
pub use page::{Page, StaticPage};
