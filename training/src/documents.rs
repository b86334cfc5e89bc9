//! Regulatory document library.

#[cfg(test)]
#[path = "documents_test.rs"]
mod documents_test;

use std::fmt;
use std::str::FromStr;

use serde_json::json;

use crate::client::{TrainingClient, Upload};
use crate::entities::{Document, NewDocument, STATUS_ACTIVE, STATUS_ARCHIVED};
use crate::error::TrainingError;

pub const ERR_REQUIRED_FIELDS: &str = "Fill in the required fields";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    Gost,
    SanPin,
    Rules,
    Instruction,
    Order,
    Other,
}

impl DocumentType {
    pub const ALL: [Self; 6] = [Self::Gost, Self::SanPin, Self::Rules, Self::Instruction, Self::Order, Self::Other];

    /// Stored value, also the label shown in the library.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gost => "ГОСТ",
            Self::SanPin => "СанПиН",
            Self::Rules => "Правила",
            Self::Instruction => "Инструкция",
            Self::Order => "Приказ",
            Self::Other => "Другое",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = TrainingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let wanted = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().to_lowercase() == wanted)
            .ok_or_else(|| TrainingError::validation(format!("unknown document type: {s}")))
    }
}

/// Active documents, newest first.
///
/// # Errors
///
/// Propagates client errors.
pub async fn list_active(client: &TrainingClient) -> Result<Vec<Document>, TrainingError> {
    client.filter(&json!({ "status": STATUS_ACTIVE }), Some("-created_date")).await
}

/// Documents whose title, number or description contains `query`,
/// ignoring case. A blank query matches everything.
#[must_use]
pub fn search<'a>(documents: &'a [Document], query: &str) -> Vec<&'a Document> {
    let needle = query.trim().to_lowercase();
    documents
        .iter()
        .filter(|doc| {
            needle.is_empty()
                || [Some(doc.title.as_str()), doc.number.as_deref(), doc.description.as_deref()]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Split a comma-separated tag field, dropping blanks.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty()).map(str::to_owned).collect()
}

/// Form contents for a new document.
#[derive(Debug, Clone, Default)]
pub struct DocumentDraft {
    pub title: String,
    pub document_type: Option<DocumentType>,
    pub number: String,
    pub date_issued: String,
    pub description: String,
    pub tags: String,
    pub file: Option<Upload>,
}

impl DocumentDraft {
    /// # Errors
    ///
    /// Returns a validation error when the title or type is missing.
    pub fn validate(&self) -> Result<DocumentType, TrainingError> {
        match self.document_type {
            Some(kind) if !self.title.trim().is_empty() => Ok(kind),
            _ => Err(TrainingError::validation(ERR_REQUIRED_FIELDS)),
        }
    }

    /// The record to store, linking `file_url` if a file was uploaded.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the title or type is missing.
    pub fn to_new_document(&self, file_url: Option<String>) -> Result<NewDocument, TrainingError> {
        let kind = self.validate()?;
        let date_issued = Some(self.date_issued.trim()).filter(|d| !d.is_empty()).map(str::to_owned);
        Ok(NewDocument {
            title: self.title.trim().to_owned(),
            document_type: kind.as_str().to_owned(),
            number: self.number.trim().to_owned(),
            date_issued,
            description: self.description.trim().to_owned(),
            tags: parse_tags(&self.tags),
            file_url,
            status: STATUS_ACTIVE.to_owned(),
        })
    }
}

/// Validate `draft`, upload its file if any, then store the document.
///
/// # Errors
///
/// Validation runs before any request; upload or create failures propagate.
pub async fn create(client: &TrainingClient, draft: &DocumentDraft) -> Result<Document, TrainingError> {
    draft.validate()?;
    let file_url = match &draft.file {
        Some(file) => Some(client.upload_file(file).await?),
        None => None,
    };
    let record = draft.to_new_document(file_url)?;
    let document: Document = client.create(&record).await?;
    tracing::info!(id = %document.id, title = %document.title, "document added");
    Ok(document)
}

/// Remove `id` from the library by archiving it.
///
/// # Errors
///
/// Propagates client errors.
pub async fn archive(client: &TrainingClient, id: &str) -> Result<Document, TrainingError> {
    let document: Document = client.update(id, &json!({ "status": STATUS_ARCHIVED })).await?;
    tracing::info!(id, "document archived");
    Ok(document)
}
