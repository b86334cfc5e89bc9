//! Entity records stored by the portal backend.
//!
//! Records come back with server-assigned `id` and `created_date`; the
//! `New*` structs are what the portal posts. Missing optional fields
//! deserialize to their defaults so older rows still load.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A record type addressable at `/entities/{NAME}`.
pub trait Entity: DeserializeOwned + Send {
    const NAME: &'static str;
}

// =============================================================================
// DOCUMENTS
// =============================================================================

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_ARCHIVED: &str = "archived";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub document_type: String,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub date_issued: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_date: Option<String>,
}

impl Document {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

impl Entity for Document {
    const NAME: &'static str = "Document";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDocument {
    pub title: String,
    pub document_type: String,
    pub number: String,
    pub date_issued: Option<String>,
    pub description: String,
    pub tags: Vec<String>,
    pub file_url: Option<String>,
    pub status: String,
}

// =============================================================================
// QUESTIONS AND RESULTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub id: String,
    pub category: String,
    pub question_text: String,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// Text of the first option flagged correct.
    #[must_use]
    pub fn correct_answer(&self) -> Option<&str> {
        self.options.iter().find(|o| o.is_correct).map(|o| o.text.as_str())
    }
}

impl Entity for Question {
    const NAME: &'static str = "Question";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    #[serde(default)]
    pub id: String,
    pub user_email: String,
    pub category: String,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u32,
    pub passed: bool,
    #[serde(default)]
    pub duration_seconds: u64,
    #[serde(default)]
    pub created_date: Option<String>,
}

impl Entity for TestResult {
    const NAME: &'static str = "TestResult";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTestResult {
    pub user_email: String,
    pub category: String,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u32,
    pub passed: bool,
    pub duration_seconds: u64,
}

// =============================================================================
// CONVERSATION LOGS AND USERS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationLog {
    #[serde(default)]
    pub id: String,
    pub user_email: String,
    pub question: String,
    #[serde(default)]
    pub conversation_id: String,
    #[serde(default)]
    pub created_date: Option<String>,
}

impl Entity for ConversationLog {
    const NAME: &'static str = "ConversationLog";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewConversationLog {
    pub user_email: String,
    pub question: String,
    pub conversation_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingUser {
    #[serde(default)]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl Entity for TrainingUser {
    const NAME: &'static str = "User";
}
