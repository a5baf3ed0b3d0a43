pub mod components;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod openhours;
pub mod startup;
pub mod utils;

pub use openhours::{Command, OpenHours, RefreshSummary};
