//! Molbert studio client.
//!
//! SYSTEM CONTEXT
//! ==============
//! The studio is a thin layer over the Molbert REST API. Every data-bearing
//! operation is one request/response call; everything else is view state a UI
//! binds to. This crate provides both halves:
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Typed configuration parsed from environment variables |
//! | [`error`] | [`StudioError`] and its single-message display form |
//! | [`token`] | Bearer token persisted under a fixed key on disk |
//! | [`auth`] | Route table, auth gate and form validation |
//! | [`file`] | [`LocalFile`], the in-memory stand-in for a browser `File` |
//! | [`request`] | Generation modes, parameters and request payloads |
//! | [`net`] | Async HTTP client for images, users, items and billing |
//! | [`state`] | Studio, history and settings view state |

pub mod auth;
pub mod config;
pub mod error;
pub mod file;
pub mod net;
pub mod request;
pub mod state;
pub mod token;

pub use config::StudioConfig;
pub use error::StudioError;
pub use file::LocalFile;
pub use net::client::ApiClient;
pub use request::{GenerationParams, GenerationRequest, Mode};
pub use token::TokenStore;
