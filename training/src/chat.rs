//! Consultant chat over the hosted agent.
//!
//! DESIGN
//! ======
//! The agent lives behind [`ChatBackend`] so sessions can be driven by the
//! real [`TrainingClient`] or by a scripted backend in tests. Replies are
//! read by re-fetching the conversation until the newest message is no
//! longer the user's.
//!
//! A send is rejected while a reply is pending, so at most one question is
//! in flight per session.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::TrainingClient;
use crate::entities::{ConversationLog, NewConversationLog};
use crate::error::TrainingError;

pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

pub const CONVERSATION_NAME: &str = "Консультация по охране труда";
pub const CONVERSATION_DESCRIPTION: &str = "Задайте вопрос виртуальному преподавателю";

/// Prompts offered on an empty conversation.
pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "Какие требования к СИЗ?",
    "Порядок проведения СОУТ",
    "Правила работы на высоте",
    "Требования электробезопасности",
];

pub const ERR_EMPTY_QUESTION: &str = "Enter a question";
pub const ERR_REPLY_PENDING: &str = "Wait for the current reply";
pub const ERR_NO_CONVERSATION: &str = "The conversation has not started";
pub const ERR_START_FAILED: &str = "Could not start the conversation";
pub const ERR_SEND_FAILED: &str = "Could not send the message";
pub const ERR_REPLY_TIMEOUT: &str = "The consultant did not reply in time";

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMetadata {
    pub name: String,
    pub description: String,
}

impl Default for ConversationMetadata {
    fn default() -> Self {
        Self { name: CONVERSATION_NAME.to_owned(), description: CONVERSATION_DESCRIPTION.to_owned() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl ChatMessage {
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == ROLE_USER
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMessage {
    pub role: String,
    pub content: String,
}

/// A tool invocation the agent made while answering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub arguments_string: Option<String>,
    #[serde(default)]
    pub results: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCallState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl ToolCall {
    /// `"knowledge.search"` reads as `"search knowledge"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = self.name.as_deref().unwrap_or("function");
        name.split('.').rev().collect::<Vec<_>>().join(" ").to_lowercase()
    }

    #[must_use]
    pub fn state(&self) -> ToolCallState {
        match self.status.as_deref().unwrap_or("pending") {
            "running" | "in_progress" => ToolCallState::Running,
            "success" => ToolCallState::Completed,
            "completed" if self.results_failed() => ToolCallState::Failed,
            "completed" => ToolCallState::Completed,
            "failed" | "error" => ToolCallState::Failed,
            _ => ToolCallState::Pending,
        }
    }

    /// String results mentioning an error, or a JSON `success: false`.
    fn results_failed(&self) -> bool {
        match &self.results {
            Some(serde_json::Value::String(text)) => {
                if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(text) {
                    if parsed.get("success") == Some(&serde_json::Value::Bool(false)) {
                        return true;
                    }
                }
                let lower = text.to_lowercase();
                lower.contains("error") || lower.contains("failed")
            }
            Some(value) => value.get("success") == Some(&serde_json::Value::Bool(false)),
            None => false,
        }
    }
}

// =============================================================================
// BACKEND SEAM
// =============================================================================

/// Agent operations a chat session needs. Enables scripted backends in tests.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    async fn create_conversation(
        &self,
        agent_name: &str,
        metadata: &ConversationMetadata,
    ) -> Result<Conversation, TrainingError>;

    async fn add_message(&self, conversation_id: &str, message: &NewMessage) -> Result<(), TrainingError>;

    async fn fetch_conversation(&self, conversation_id: &str) -> Result<Conversation, TrainingError>;

    /// Persist the question for portal statistics.
    async fn record_question(&self, log: &NewConversationLog) -> Result<(), TrainingError>;
}

#[async_trait::async_trait]
impl ChatBackend for TrainingClient {
    async fn create_conversation(
        &self,
        agent_name: &str,
        metadata: &ConversationMetadata,
    ) -> Result<Conversation, TrainingError> {
        TrainingClient::create_conversation(self, agent_name, metadata).await
    }

    async fn add_message(&self, conversation_id: &str, message: &NewMessage) -> Result<(), TrainingError> {
        TrainingClient::add_message(self, conversation_id, message).await.map(drop)
    }

    async fn fetch_conversation(&self, conversation_id: &str) -> Result<Conversation, TrainingError> {
        TrainingClient::fetch_conversation(self, conversation_id).await
    }

    async fn record_question(&self, log: &NewConversationLog) -> Result<(), TrainingError> {
        self.create::<ConversationLog, _>(log).await.map(drop)
    }
}

// =============================================================================
// SESSION
// =============================================================================

#[derive(Debug, Default)]
pub struct ChatSession {
    conversation_id: Option<String>,
    user_email: Option<String>,
    messages: Vec<ChatMessage>,
    pending: bool,
    error: Option<String>,
}

impl ChatSession {
    /// Questions are logged under `user_email` when it is known.
    #[must_use]
    pub fn new(user_email: Option<String>) -> Self {
        Self { user_email, ..Self::default() }
    }

    /// Open a conversation with `agent_name`.
    ///
    /// # Errors
    ///
    /// Propagates the backend error; the session keeps no conversation.
    pub async fn open(&mut self, backend: &dyn ChatBackend, agent_name: &str) -> Result<(), TrainingError> {
        match backend.create_conversation(agent_name, &ConversationMetadata::default()).await {
            Ok(conversation) => {
                tracing::info!(conversation_id = %conversation.id, agent_name, "conversation opened");
                self.conversation_id = Some(conversation.id);
                self.messages = conversation.messages;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(agent_name, error = %e, "conversation open failed");
                self.error = Some(ERR_START_FAILED.to_owned());
                Err(e)
            }
        }
    }

    /// Send `input` as the user's next question.
    ///
    /// # Errors
    ///
    /// Rejects blank input, a send while a reply is pending, and a session
    /// without a conversation. Backend failures clear the pending flag.
    pub async fn send(&mut self, backend: &dyn ChatBackend, input: &str) -> Result<(), TrainingError> {
        let question = input.trim();
        if question.is_empty() {
            return Err(TrainingError::validation(ERR_EMPTY_QUESTION));
        }
        if self.pending {
            return Err(TrainingError::InvalidState(ERR_REPLY_PENDING));
        }
        let conversation_id = self.conversation_id.clone().ok_or(TrainingError::InvalidState(ERR_NO_CONVERSATION))?;

        self.pending = true;
        self.error = None;
        let message = NewMessage { role: ROLE_USER.to_owned(), content: question.to_owned() };
        self.messages.push(ChatMessage { role: message.role.clone(), content: Some(message.content.clone()), tool_calls: Vec::new() });

        let result = self.deliver(backend, &conversation_id, &message).await;
        if let Err(e) = &result {
            tracing::warn!(%conversation_id, error = %e, "send failed");
            self.pending = false;
            self.error = Some(ERR_SEND_FAILED.to_owned());
        }
        result
    }

    async fn deliver(
        &self,
        backend: &dyn ChatBackend,
        conversation_id: &str,
        message: &NewMessage,
    ) -> Result<(), TrainingError> {
        backend.add_message(conversation_id, message).await?;
        if let Some(email) = &self.user_email {
            let log = NewConversationLog {
                user_email: email.clone(),
                question: message.content.clone(),
                conversation_id: conversation_id.to_owned(),
            };
            backend.record_question(&log).await?;
        }
        Ok(())
    }

    /// Re-read the conversation; returns `true` once a reply has arrived.
    ///
    /// # Errors
    ///
    /// Propagates the backend error; local messages are left as they were.
    pub async fn refresh(&mut self, backend: &dyn ChatBackend) -> Result<bool, TrainingError> {
        let Some(conversation_id) = self.conversation_id.clone() else {
            return Err(TrainingError::InvalidState(ERR_NO_CONVERSATION));
        };
        let conversation = backend.fetch_conversation(&conversation_id).await?;
        self.messages = conversation.messages;
        let replied = self.messages.last().is_some_and(|m| !m.is_user());
        if replied {
            self.pending = false;
        }
        Ok(replied)
    }

    /// Poll every `interval` until a reply arrives or `max_polls` run out.
    ///
    /// Running out clears the pending flag so the user can ask again.
    ///
    /// # Errors
    ///
    /// Propagates the first backend error.
    pub async fn wait_for_reply(
        &mut self,
        backend: &dyn ChatBackend,
        interval: Duration,
        max_polls: u32,
    ) -> Result<bool, TrainingError> {
        for poll in 0..max_polls {
            if poll > 0 {
                tokio::time::sleep(interval).await;
            }
            if self.refresh(backend).await? {
                return Ok(true);
            }
        }
        self.pending = false;
        self.error = Some(ERR_REPLY_TIMEOUT.to_owned());
        Ok(false)
    }

    #[must_use]
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn latest_reply(&self) -> Option<&ChatMessage> {
        self.messages.last().filter(|m| !m.is_user())
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
