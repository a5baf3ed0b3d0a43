mod layout;

pub use layout::{PlaceholderLayout, StaticPage};

/// Marker identifying the container that holds the placeholders
pub const CONTAINER_ID: &str = "openhours";

/// Attribute carrying a placeholder's location name
pub const LOCATION_ATTRIBUTE: &str = "data-openhours-location";

/// Class marking a placeholder that lists the coming week
pub const DAILY_CLASS: &str = "dailyHours";

/// Content shown while a placeholder's hours are being fetched
pub const PENDING_MARKER: &str = "-";

/// Position of a placeholder within its page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaceholderId(pub usize);

/// A page element that receives hours for one location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub id: PlaceholderId,
    pub location: String,
    pub daily: bool,
}

/// The page the hours are rendered into
pub trait Page {
    /// Whether the page carries the openhours container
    fn has_container(&self) -> bool;

    /// Every placeholder inside the container, in document order
    fn placeholders(&self) -> Vec<Placeholder>;

    /// Replace a placeholder's content with the pending marker
    fn clear(&mut self, id: PlaceholderId);

    /// Replace a placeholder's content with the given lines
    fn write(&mut self, id: PlaceholderId, lines: &[String]);
}
