//! quizmark CLI — grade attempts and inspect assessment analytics.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use uuid::Uuid;

mod commands;

#[derive(Parser)]
#[command(name = "quizmark", version, about = "Assessment grading and analytics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and example test
    Init,

    /// Validate test definition TOML files
    Validate {
        /// Path to a test file or directory
        #[arg(long)]
        test: PathBuf,
    },

    /// Add test definitions to a snapshot, replacing earlier copies
    Import {
        /// Path to a test file or directory
        #[arg(long)]
        test: PathBuf,

        /// Snapshot JSON file (created if missing)
        #[arg(long)]
        snapshot: PathBuf,

        /// Owning teacher, overriding the file's owner_id
        #[arg(long)]
        owner: Option<Uuid>,
    },

    /// Grade an answer sheet against a test without recording anything
    Grade {
        /// Test definition TOML
        #[arg(long)]
        test: PathBuf,

        /// Answer sheet JSON
        #[arg(long)]
        answers: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Start a new attempt
    Start {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        student: Uuid,

        #[arg(long)]
        test: Uuid,
    },

    /// Submit answers for an open attempt
    Submit {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        attempt: Uuid,

        /// Answer sheet JSON
        #[arg(long)]
        answers: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Leave feedback on a graded attempt
    Feedback {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        attempt: Uuid,

        /// Teacher writing the feedback
        #[arg(long)]
        author: Uuid,

        /// Message text, or one of the presets
        #[arg(long)]
        message: String,
    },

    /// Show a student's dashboard
    Student {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        student: Uuid,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show a teacher's dashboard
    Teacher {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        teacher: Uuid,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Rank all students by average score
    Leaderboard {
        #[arg(long)]
        snapshot: PathBuf,

        /// Show only the top N
        #[arg(long)]
        limit: Option<usize>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "quizmark=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { test } => commands::validate::execute(test),
        Commands::Import {
            test,
            snapshot,
            owner,
        } => commands::import::execute(test, snapshot, owner),
        Commands::Grade {
            test,
            answers,
            format,
        } => commands::grade::execute(test, answers, format),
        Commands::Start {
            snapshot,
            student,
            test,
        } => commands::attempt::start(snapshot, student, test).await,
        Commands::Submit {
            snapshot,
            attempt,
            answers,
            format,
        } => commands::attempt::submit(snapshot, attempt, answers, format).await,
        Commands::Feedback {
            snapshot,
            attempt,
            author,
            message,
        } => commands::attempt::feedback(snapshot, attempt, author, message).await,
        Commands::Student {
            snapshot,
            student,
            format,
            config,
        } => commands::student::execute(snapshot, student, format, config),
        Commands::Teacher {
            snapshot,
            teacher,
            format,
            config,
        } => commands::teacher::execute(snapshot, teacher, format, config),
        Commands::Leaderboard {
            snapshot,
            limit,
            format,
        } => commands::leaderboard::execute(snapshot, limit, format),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
