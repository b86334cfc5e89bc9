//! Training portal subcommands.

#[cfg(test)]
#[path = "training_cmd_test.rs"]
mod training_cmd_test;

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use training::chat::{ChatMessage, ChatSession, SUGGESTED_QUESTIONS, ToolCallState};
use training::client::Upload;
use training::documents::{self, DocumentDraft, DocumentType};
use training::quiz::{self, CATEGORIES, QuizSession, Step};
use training::{Statistics, TrainingClient, TrainingConfig};

use crate::{CliError, DocumentsCommand, DocumentsSubcommand, QuizCommand, QuizSubcommand, TrainingCommand, TrainingSubcommand, print_json};

pub(crate) async fn run(config: &TrainingConfig, command: TrainingCommand) -> Result<(), CliError> {
    let client = TrainingClient::new(config)?;
    match command.command {
        TrainingSubcommand::Documents(documents) => run_documents(&client, documents).await,
        TrainingSubcommand::Quiz(quiz) => run_quiz(&client, quiz).await,
        TrainingSubcommand::Stats => run_stats(&client).await,
        TrainingSubcommand::Chat { question, poll_ms, max_polls } => {
            run_chat(&client, question, Duration::from_millis(poll_ms), max_polls).await
        }
    }
}

/// Email of the signed-in portal user, if the backend knows one.
async fn current_email(client: &TrainingClient) -> Option<String> {
    match client.me().await {
        Ok(user) => Some(user.email),
        Err(e) => {
            tracing::warn!(error = %e, "portal user unknown");
            None
        }
    }
}

// ===== DOCUMENTS =====

async fn run_documents(client: &TrainingClient, command: DocumentsCommand) -> Result<(), CliError> {
    match command.command {
        DocumentsSubcommand::List { search } => {
            let all = documents::list_active(client).await?;
            let shown = documents::search(&all, search.as_deref().unwrap_or_default());
            eprintln!("documents: {}", shown.len());
            print_json(&shown)
        }
        DocumentsSubcommand::Add { title, document_type, number, date_issued, description, tags, file } => {
            let draft = DocumentDraft {
                title,
                document_type: Some(document_type.parse::<DocumentType>()?),
                number,
                date_issued,
                description,
                tags,
                file: file.as_deref().map(read_upload).transpose()?,
            };
            print_json(&documents::create(client, &draft).await?)
        }
        DocumentsSubcommand::Archive { id } => {
            documents::archive(client, &id).await?;
            eprintln!("archived {id}");
            Ok(())
        }
    }
}

fn read_upload(path: &Path) -> Result<Upload, CliError> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map_or_else(|| "document".to_owned(), |n| n.to_string_lossy().into_owned());
    Ok(Upload { mime: mime_for(&name).to_owned(), name, bytes })
}

fn mime_for(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()).unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

// ===== QUIZ =====

async fn run_quiz(client: &TrainingClient, command: QuizCommand) -> Result<(), CliError> {
    match command.command {
        QuizSubcommand::Categories => {
            let results = match current_email(client).await {
                Some(email) => quiz::load_results(client, &email).await?,
                None => Vec::new(),
            };
            let summary = quiz::overview(&results);
            println!("taken {} / passed {} / average {}%", summary.taken, summary.passed, summary.average_percentage);
            for category in CATEGORIES {
                let stats = quiz::category_stats(&results, category);
                match (stats.last_score, stats.passed) {
                    (Some(score), Some(passed)) => {
                        println!("{category}: last {score}% ({})", if passed { "passed" } else { "failed" });
                    }
                    _ => println!("{category}: not attempted"),
                }
            }
            Ok(())
        }
        QuizSubcommand::Take { category } => {
            let bank = quiz::load_questions(client).await?;
            let session = QuizSession::start(&category, &bank)?;
            let stdin = io::stdin();
            let Some(outcome) = take_quiz(session, &mut stdin.lock(), &mut io::stdout())? else {
                eprintln!("quiz cancelled");
                return Ok(());
            };
            println!(
                "score {}/{} ({}%): {}",
                outcome.score,
                outcome.total_questions,
                outcome.percentage,
                if outcome.passed { "passed" } else { "failed" }
            );
            match current_email(client).await {
                Some(email) => {
                    quiz::save_result(client, &outcome, &email).await?;
                    eprintln!("result saved");
                }
                None => eprintln!("not signed in to the portal; result not saved"),
            }
            Ok(())
        }
    }
}

/// Drive `session` from line input: an option number answers, `b` goes
/// back, `q` or end of input cancels.
fn take_quiz(
    mut session: QuizSession,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Option<quiz::QuizOutcome>, CliError> {
    loop {
        let question = session.current_question();
        writeln!(
            out,
            "\n[{}/{} {}%] {}",
            session.index() + 1,
            session.total(),
            session.progress_percent(),
            question.question_text
        )?;
        for (i, option) in question.options.iter().enumerate() {
            let marker = if session.selection() == Some(option.text.as_str()) { "*" } else { " " };
            writeln!(out, " {marker}{}. {}", i + 1, option.text)?;
        }
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            session.cancel();
            return Ok(None);
        }
        match line.trim() {
            "q" => {
                session.cancel();
                return Ok(None);
            }
            "b" => {
                session.previous();
            }
            choice => {
                let picked = choice
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| question.options.get(i))
                    .map(|o| o.text.clone());
                let Some(answer) = picked else {
                    writeln!(out, "enter an option number, b or q")?;
                    continue;
                };
                session.select(&answer);
                if let Step::Completed(outcome) = session.next()? {
                    return Ok(Some(outcome));
                }
            }
        }
    }
}

// ===== STATS =====

async fn run_stats(client: &TrainingClient) -> Result<(), CliError> {
    let stats = Statistics::load(client).await?;
    println!("users asking questions: {}", stats.unique_users);
    println!("questions asked:        {}", stats.total_questions);
    println!("tests taken:            {}", stats.tests_taken);
    println!("average score:          {}%", stats.average_score);
    println!("pass rate:              {}%", stats.pass_rate);
    for row in &stats.categories {
        println!("  {}: {}/{} passed ({}%)", row.category, row.passed, row.total, row.pass_rate);
    }
    for entry in &stats.document_types {
        println!("  {}: {}", entry.document_type, entry.count);
    }
    Ok(())
}

// ===== CHAT =====

async fn run_chat(
    client: &TrainingClient,
    question: Option<String>,
    interval: Duration,
    max_polls: u32,
) -> Result<(), CliError> {
    let mut session = ChatSession::new(current_email(client).await);
    session.open(client, client.agent_name()).await?;

    if let Some(question) = question {
        return ask(client, &mut session, &question, interval, max_polls).await;
    }

    eprintln!("ask about workplace safety, for example:");
    for suggestion in SUGGESTED_QUESTIONS {
        eprintln!("  {suggestion}");
    }
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = ask(client, &mut session, &line, interval, max_polls).await {
            eprintln!("error: {}", e.display_message());
        }
    }
    Ok(())
}

async fn ask(
    client: &TrainingClient,
    session: &mut ChatSession,
    question: &str,
    interval: Duration,
    max_polls: u32,
) -> Result<(), CliError> {
    session.send(client, question).await?;
    if !session.wait_for_reply(client, interval, max_polls).await? {
        eprintln!("{}", session.error().unwrap_or("no reply"));
        return Ok(());
    }
    if let Some(reply) = session.latest_reply() {
        println!("{}", render_reply(reply));
    }
    Ok(())
}

fn render_reply(reply: &ChatMessage) -> String {
    let mut lines: Vec<String> = reply
        .tool_calls
        .iter()
        .map(|call| {
            let state = match call.state() {
                ToolCallState::Pending => "waiting",
                ToolCallState::Running => "running",
                ToolCallState::Completed => "done",
                ToolCallState::Failed => "failed",
            };
            format!("[{} • {state}]", call.display_name())
        })
        .collect();
    if let Some(content) = reply.content.as_deref().filter(|c| !c.trim().is_empty()) {
        lines.push(content.to_owned());
    }
    lines.join("\n")
}
