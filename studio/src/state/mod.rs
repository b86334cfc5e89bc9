//! View state for the studio, history and settings pages.
//!
//! Each page owns a single value mutated through `&mut self`; async methods
//! take the [`ApiClient`](crate::net::client::ApiClient) by reference and
//! leave the state idle whether the call succeeds or fails.

pub mod history;
pub mod settings;
pub mod studio;

pub use history::HistoryPanel;
pub use settings::SettingsState;
pub use studio::StudioState;
