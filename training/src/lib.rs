//! Safety-training portal client.
//!
//! SYSTEM CONTEXT
//! ==============
//! The portal keeps its data in a hosted entity store: documents, quiz
//! questions, test results and chat logs, plus a hosted consultant agent.
//! This crate wraps that store in a typed client and implements the pieces
//! the portal computes locally.
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Typed configuration parsed from environment variables |
//! | [`error`] | [`TrainingError`] and its single-message display form |
//! | [`entities`] | Entity records and the [`entities::Entity`] naming trait |
//! | [`client`] | Async HTTP client for entities, uploads and agent conversations |
//! | [`documents`] | Library search, draft validation, create and archive |
//! | [`quiz`] | Category catalogue and the quiz session state machine |
//! | [`stats`] | Statistics aggregated from logs, results and documents |
//! | [`chat`] | Consultant chat session over the [`chat::ChatBackend`] seam |

pub mod chat;
pub mod client;
pub mod config;
pub mod documents;
pub mod entities;
pub mod error;
pub mod quiz;
pub mod stats;

#[cfg(test)]
mod test_helpers;

pub use client::TrainingClient;
pub use config::TrainingConfig;
pub use error::TrainingError;
pub use quiz::QuizSession;
pub use stats::Statistics;
