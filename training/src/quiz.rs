//! Quiz sessions over the question bank.
//!
//! DESIGN
//! ======
//! A [`QuizSession`] only exists once it has at least one question. Moving
//! forward records the current selection at the current index; moving back
//! restores whatever was recorded there. The last `next` scores the run and
//! hands back a [`QuizOutcome`]; [`QuizSession::cancel`] consumes the session
//! and yields nothing, so a cancelled quiz can never be saved.

#[cfg(test)]
#[path = "quiz_test.rs"]
mod quiz_test;

use std::time::Instant;

use serde_json::json;

use crate::client::TrainingClient;
use crate::entities::{NewTestResult, Question, TestResult};
use crate::error::TrainingError;

/// Minimum rounded percentage that passes.
pub const PASS_THRESHOLD: u32 = 70;

pub const CATEGORIES: [&str; 7] = [
    "Общие требования",
    "Электробезопасность",
    "Пожарная безопасность",
    "Работа на высоте",
    "СОУТ",
    "СИЗ",
    "Первая помощь",
];

pub const ERR_NO_QUESTIONS: &str = "No questions in this category yet";
pub const ERR_NO_SELECTION: &str = "Choose an answer first";
pub const ERR_FINISHED: &str = "The quiz is already finished";

// ===== SCORING =====

/// Count answers that equal the text of their question's correct option.
#[must_use]
pub fn score_answers(questions: &[Question], answers: &[Option<String>]) -> u32 {
    let hits = questions
        .iter()
        .zip(answers)
        .filter(|(question, answer)| match (question.correct_answer(), answer.as_deref()) {
            (Some(correct), Some(given)) => correct == given,
            _ => false,
        })
        .count();
    u32::try_from(hits).unwrap_or(u32::MAX)
}

/// `round(score / total * 100)`, or 0 for an empty quiz.
#[must_use]
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    rounded_percent(u64::from(score), u64::from(total))
}

#[must_use]
pub fn is_passing(percentage: u32) -> bool {
    percentage >= PASS_THRESHOLD
}

/// `100 * part / whole` rounded half up, in integers so exact halves stay exact.
pub(crate) fn rounded_percent(part: u64, whole: u64) -> u32 {
    rounded_div(part.saturating_mul(100), whole)
}

/// Mean of `values` rounded half up, or 0 when empty.
pub(crate) fn rounded_mean(values: &[u32]) -> u32 {
    let sum: u64 = values.iter().copied().map(u64::from).sum();
    rounded_div(sum, values.len() as u64)
}

fn rounded_div(numerator: u64, denominator: u64) -> u32 {
    if denominator == 0 {
        return 0;
    }
    let halves = numerator.saturating_mul(2).saturating_add(denominator) / denominator.saturating_mul(2);
    u32::try_from(halves).unwrap_or(u32::MAX)
}

// ===== SESSION =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub category: String,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u32,
    pub passed: bool,
    pub duration_seconds: u64,
}

impl QuizOutcome {
    #[must_use]
    pub fn to_new_result(&self, user_email: &str) -> NewTestResult {
        NewTestResult {
            user_email: user_email.to_owned(),
            category: self.category.clone(),
            score: self.score,
            total_questions: self.total_questions,
            percentage: self.percentage,
            passed: self.passed,
            duration_seconds: self.duration_seconds,
        }
    }
}

/// What a `next` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Advanced,
    Completed(QuizOutcome),
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    category: String,
    questions: Vec<Question>,
    index: usize,
    answers: Vec<Option<String>>,
    selection: Option<String>,
    started: Instant,
    finished: bool,
}

impl QuizSession {
    /// Start a quiz over the questions in `bank` tagged `category`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the category has no questions.
    pub fn start(category: &str, bank: &[Question]) -> Result<Self, TrainingError> {
        Self::start_at(category, bank, Instant::now())
    }

    /// # Errors
    ///
    /// Returns a validation error when the category has no questions.
    pub fn start_at(category: &str, bank: &[Question], now: Instant) -> Result<Self, TrainingError> {
        let questions: Vec<Question> = bank.iter().filter(|q| q.category == category).cloned().collect();
        if questions.is_empty() {
            return Err(TrainingError::validation(ERR_NO_QUESTIONS));
        }
        tracing::debug!(category, questions = questions.len(), "quiz started");
        Ok(Self {
            category: category.to_owned(),
            answers: vec![None; questions.len()],
            questions,
            index: 0,
            selection: None,
            started: now,
            finished: false,
        })
    }

    /// Choose `answer` for the current question.
    pub fn select(&mut self, answer: &str) {
        if !self.finished {
            self.selection = Some(answer.to_owned());
        }
    }

    /// Record the selection, then advance or finish.
    ///
    /// # Errors
    ///
    /// Fails without a selection or once the quiz has finished.
    pub fn next(&mut self) -> Result<Step, TrainingError> {
        self.next_at(Instant::now())
    }

    /// [`Self::next`] with the finishing time supplied.
    ///
    /// # Errors
    ///
    /// Fails without a selection or once the quiz has finished.
    pub fn next_at(&mut self, now: Instant) -> Result<Step, TrainingError> {
        if self.finished {
            return Err(TrainingError::InvalidState(ERR_FINISHED));
        }
        let Some(selection) = self.selection.clone() else {
            return Err(TrainingError::validation(ERR_NO_SELECTION));
        };
        self.answers[self.index] = Some(selection);

        if self.index + 1 < self.questions.len() {
            self.index += 1;
            self.selection = self.answers[self.index].clone();
            return Ok(Step::Advanced);
        }

        self.finished = true;
        Ok(Step::Completed(self.outcome(now)))
    }

    /// Step back one question, restoring its recorded answer.
    /// Returns `false` on the first question.
    pub fn previous(&mut self) -> bool {
        if self.finished || self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.selection = self.answers[self.index].clone();
        true
    }

    /// Abandon the quiz. Nothing is scored or saved.
    pub fn cancel(self) {
        tracing::debug!(category = %self.category, answered = self.index, "quiz cancelled");
    }

    fn outcome(&self, now: Instant) -> QuizOutcome {
        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        let score = score_answers(&self.questions, &self.answers);
        let percentage = percentage(score, total);
        let outcome = QuizOutcome {
            category: self.category.clone(),
            score,
            total_questions: total,
            percentage,
            passed: is_passing(percentage),
            duration_seconds: now.saturating_duration_since(self.started).as_secs(),
        };
        tracing::info!(
            category = %outcome.category,
            score,
            total,
            percentage,
            passed = outcome.passed,
            "quiz completed"
        );
        outcome
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.index]
    }

    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.questions.len()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// `(index + 1) / total * 100`, rounded.
    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        rounded_percent((self.index + 1) as u64, self.questions.len() as u64)
    }
}

// ===== HISTORY =====

/// How a user last did in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryStats {
    pub attempted: bool,
    pub last_score: Option<u32>,
    pub passed: Option<bool>,
}

/// Stats from the first result in `results` (newest first) for `category`.
#[must_use]
pub fn category_stats(results: &[TestResult], category: &str) -> CategoryStats {
    results
        .iter()
        .find(|r| r.category == category)
        .map_or_else(CategoryStats::default, |last| CategoryStats {
            attempted: true,
            last_score: Some(last.percentage),
            passed: Some(last.passed),
        })
}

/// Totals across one user's results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResultsOverview {
    pub taken: usize,
    pub passed: usize,
    pub average_percentage: u32,
}

#[must_use]
pub fn overview(results: &[TestResult]) -> ResultsOverview {
    if results.is_empty() {
        return ResultsOverview::default();
    }
    let percentages: Vec<u32> = results.iter().map(|r| r.percentage).collect();
    let average_percentage = rounded_mean(&percentages);
    ResultsOverview { taken: results.len(), passed: results.iter().filter(|r| r.passed).count(), average_percentage }
}

// ===== BACKEND =====

/// # Errors
///
/// Propagates client errors.
pub async fn load_questions(client: &TrainingClient) -> Result<Vec<Question>, TrainingError> {
    client.list(None).await
}

/// `user_email`'s results, newest first.
///
/// # Errors
///
/// Propagates client errors.
pub async fn load_results(client: &TrainingClient, user_email: &str) -> Result<Vec<TestResult>, TrainingError> {
    client.filter(&json!({ "user_email": user_email }), Some("-created_date")).await
}

/// # Errors
///
/// Propagates client errors.
pub async fn save_result(
    client: &TrainingClient,
    outcome: &QuizOutcome,
    user_email: &str,
) -> Result<TestResult, TrainingError> {
    client.create(&outcome.to_new_result(user_email)).await
}
