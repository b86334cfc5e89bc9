use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use studio::{StudioConfig, StudioError};
use training::{TrainingConfig, TrainingError};

mod studio_cmd;
mod training_cmd;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not signed in; run `molbert auth login` first")]
    NotSignedIn,
    #[error("this command needs an administrator account")]
    NotAdmin,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Studio(#[from] StudioError),
    #[error("{0}")]
    Training(#[from] TrainingError),
    #[error("io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl CliError {
    fn display_message(&self) -> String {
        match self {
            Self::Studio(e) => e.display_message(),
            Self::Training(e) => e.display_message(),
            other => other.to_string(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "molbert", about = "Molbert image studio and safety-training portal CLI")]
struct Cli {
    #[arg(long, env = "MOLBERT_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "MOLBERT_TOKEN_PATH")]
    token_path: Option<PathBuf>,

    #[arg(long, env = "TRAINING_API_URL")]
    training_url: Option<String>,

    #[arg(long, env = "TRAINING_APP_ID")]
    app_id: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in, sign up and password recovery.
    Auth(AuthCommand),
    /// Generate and edit images.
    Image(ImageCommand),
    /// Recent generations.
    History(HistoryArgs),
    /// Plan and quota snapshot.
    Usage,
    /// Profile and password.
    Profile(ProfileCommand),
    /// Plan upgrades.
    Billing(BillingCommand),
    Items(ItemsCommand),
    Admin(AdminCommand),
    /// Safety-training portal.
    Training(TrainingCommand),
}

// ===== AUTH =====

#[derive(Args, Debug)]
struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
enum AuthSubcommand {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "MOLBERT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
        #[arg(long)]
        full_name: Option<String>,
    },
    /// Email a password reset link.
    Recover {
        #[arg(long)]
        email: String,
    },
    Reset {
        #[arg(long)]
        token: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    Me,
}

// ===== IMAGES =====

#[derive(Args, Debug)]
struct ImageCommand {
    #[command(subcommand)]
    command: ImageSubcommand,
}

/// Output shaping; unset fields keep the operation's defaults.
#[derive(Args, Debug, Clone)]
struct OutputArgs {
    #[arg(long)]
    aspect_ratio: Option<String>,
    #[arg(long)]
    format: Option<String>,
    #[arg(long)]
    resolution: Option<String>,
}

#[derive(Subcommand, Debug)]
enum ImageSubcommand {
    Create {
        #[arg(long)]
        prompt: String,
        #[command(flatten)]
        output: OutputArgs,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Edit around a point; without `--at` the image center is used.
    Edit {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        prompt: String,
        /// Pixel position in the source image, as `X,Y`.
        #[arg(long)]
        at: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    Compose {
        /// Base image, sent last.
        #[arg(long)]
        image: Option<PathBuf>,
        #[arg(long = "extra")]
        extras: Vec<PathBuf>,
        #[arg(long)]
        prompt: String,
        #[command(flatten)]
        output: OutputArgs,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    Filter {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        prompt: String,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    Adjust {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        prompt: String,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Args, Debug)]
struct HistoryArgs {
    /// Download the entry with this id instead of listing.
    #[arg(long)]
    fetch: Option<String>,
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

// ===== ACCOUNT =====

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Show,
    Update {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
}

#[derive(Args, Debug)]
struct BillingCommand {
    #[command(subcommand)]
    command: BillingSubcommand,
}

#[derive(Subcommand, Debug)]
enum BillingSubcommand {
    Upgrade {
        #[arg(long, default_value = "pro")]
        plan: String,
    },
}

#[derive(Args, Debug)]
struct ItemsCommand {
    #[command(subcommand)]
    command: ItemsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ItemsSubcommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminSubcommand {
    Users {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Update {
        id: String,
        #[arg(long)]
        plan: Option<String>,
        #[arg(long)]
        credits: Option<i64>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        superuser: Option<bool>,
    },
    Delete {
        id: String,
    },
}

// ===== TRAINING =====

#[derive(Args, Debug)]
struct TrainingCommand {
    #[command(subcommand)]
    command: TrainingSubcommand,
}

#[derive(Subcommand, Debug)]
enum TrainingSubcommand {
    Documents(DocumentsCommand),
    Quiz(QuizCommand),
    /// Portal-wide statistics.
    Stats,
    /// Ask the safety consultant; without `--question`, read questions from stdin.
    Chat {
        #[arg(long)]
        question: Option<String>,
        #[arg(long, default_value_t = 1000)]
        poll_ms: u64,
        #[arg(long, default_value_t = 60)]
        max_polls: u32,
    },
}

#[derive(Args, Debug)]
struct DocumentsCommand {
    #[command(subcommand)]
    command: DocumentsSubcommand,
}

#[derive(Subcommand, Debug)]
enum DocumentsSubcommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        #[arg(long)]
        title: String,
        #[arg(long = "type")]
        document_type: String,
        #[arg(long, default_value = "")]
        number: String,
        #[arg(long, default_value = "")]
        date_issued: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Comma-separated.
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    Archive {
        id: String,
    },
}

#[derive(Args, Debug)]
struct QuizCommand {
    #[command(subcommand)]
    command: QuizSubcommand,
}

#[derive(Subcommand, Debug)]
enum QuizSubcommand {
    /// Categories with the signed-in user's last result in each.
    Categories,
    /// Take a quiz interactively on stdin.
    Take {
        #[arg(long)]
        category: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {}", e.display_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Training(command) => {
            let config = training_config(cli.training_url.as_deref(), cli.app_id.as_deref())?;
            training_cmd::run(&config, command).await
        }
        command => {
            let mut config = StudioConfig::from_env()?;
            if let Some(url) = &cli.api_url {
                config = config.with_api_url(url);
            }
            if let Some(path) = cli.token_path {
                config.token_path = path;
            }
            studio_cmd::run(&config, command).await
        }
    }
}

/// Env config with flag overrides; `--app-id` stands in for `TRAINING_APP_ID`.
fn training_config(url: Option<&str>, app_id: Option<&str>) -> Result<TrainingConfig, CliError> {
    let mut config = TrainingConfig::from_env_with_app_id(app_id)?;
    if let Some(url) = url {
        config.api_url = url.trim().trim_end_matches('/').to_owned();
    }
    Ok(config)
}

fn print_json(value: &impl serde::Serialize) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
