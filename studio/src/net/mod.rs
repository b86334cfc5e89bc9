//! Async HTTP client for the Molbert API.
//!
//! [`client::ApiClient`] holds the connection pool, origin and token store;
//! the sibling modules add operations to it with their own `impl` blocks.

pub mod billing;
pub mod client;
pub mod images;
pub mod items;
pub mod types;
pub mod users;

#[cfg(test)]
pub(crate) mod test_helpers;
