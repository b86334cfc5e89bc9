//! Portal-wide statistics, recomputed from the raw records on every call.

#[cfg(test)]
#[path = "stats_test.rs"]
mod stats_test;

use std::collections::HashSet;

use crate::client::TrainingClient;
use crate::entities::{ConversationLog, Document, TestResult};
use crate::error::TrainingError;
use crate::quiz::{rounded_mean, rounded_percent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBreakdown {
    pub category: String,
    pub total: usize,
    pub passed: usize,
    pub pass_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCount {
    pub document_type: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub unique_users: usize,
    pub total_questions: usize,
    pub tests_taken: usize,
    pub average_score: u32,
    pub pass_rate: u32,
    /// In order of each category's first appearance in the results.
    pub categories: Vec<CategoryBreakdown>,
    /// Active documents only, in order of first appearance.
    pub document_types: Vec<TypeCount>,
}

impl Statistics {
    #[must_use]
    pub fn compute(logs: &[ConversationLog], results: &[TestResult], documents: &[Document]) -> Self {
        let unique_users = logs.iter().map(|l| l.user_email.as_str()).collect::<HashSet<_>>().len();
        let percentages: Vec<u32> = results.iter().map(|r| r.percentage).collect();
        let passed = results.iter().filter(|r| r.passed).count();

        Self {
            unique_users,
            total_questions: logs.len(),
            tests_taken: results.len(),
            average_score: rounded_mean(&percentages),
            pass_rate: rate(passed, results.len()),
            categories: category_breakdown(results),
            document_types: document_type_counts(documents),
        }
    }

    /// Fetch logs, results and documents, then [`Self::compute`].
    ///
    /// # Errors
    ///
    /// Propagates the first client error.
    pub async fn load(client: &TrainingClient) -> Result<Self, TrainingError> {
        let logs: Vec<ConversationLog> = client.list(Some("-created_date")).await?;
        let results: Vec<TestResult> = client.list(Some("-created_date")).await?;
        let documents: Vec<Document> = client.list(None).await?;
        tracing::debug!(logs = logs.len(), results = results.len(), documents = documents.len(), "statistics loaded");
        Ok(Self::compute(&logs, &results, &documents))
    }
}

fn rate(part: usize, whole: usize) -> u32 {
    rounded_percent(part as u64, whole as u64)
}

fn category_breakdown(results: &[TestResult]) -> Vec<CategoryBreakdown> {
    let mut rows: Vec<CategoryBreakdown> = Vec::new();
    for result in results {
        let idx = match rows.iter().position(|row| row.category == result.category) {
            Some(idx) => idx,
            None => {
                rows.push(CategoryBreakdown { category: result.category.clone(), total: 0, passed: 0, pass_rate: 0 });
                rows.len() - 1
            }
        };
        rows[idx].total += 1;
        if result.passed {
            rows[idx].passed += 1;
        }
    }
    for row in &mut rows {
        row.pass_rate = rate(row.passed, row.total);
    }
    rows
}

fn document_type_counts(documents: &[Document]) -> Vec<TypeCount> {
    let mut counts: Vec<TypeCount> = Vec::new();
    for doc in documents.iter().filter(|d| d.is_active()) {
        match counts.iter_mut().find(|c| c.document_type == doc.document_type) {
            Some(entry) => entry.count += 1,
            None => counts.push(TypeCount { document_type: doc.document_type.clone(), count: 1 }),
        }
    }
    counts
}
