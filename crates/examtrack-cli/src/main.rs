//! examtrack CLI — the user-facing command-line interface.

use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "examtrack", version, about = "Personal study tracking and exam readiness")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare the data directory and seed starter files
    Init,

    /// Show the study dashboard
    Dashboard {
        /// Only include rows belonging to this user
        #[arg(long)]
        owner: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Manage subjects
    Subject {
        #[command(subcommand)]
        command: SubjectCommands,
    },

    /// Record and list study sessions
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },

    /// Record and list self-test results
    Test {
        #[command(subcommand)]
        command: TestCommands,
    },

    /// Rank users by study activity
    Leaderboard,

    /// Inspect or update app settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Copy the data files into a timestamped backup
    Backup,

    /// Check the health of the data directory
    Doctor {
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
enum SubjectCommands {
    /// List subjects
    List {
        #[arg(long)]
        owner: Option<String>,
    },

    /// Add a subject
    Add {
        /// Display name
        name: String,

        /// Importance weight, at least 1
        #[arg(long, default_value_t = 2)]
        credits: u32,

        /// Self-reported mastery, 0-10
        #[arg(long, default_value_t = 5)]
        confidence: u8,

        /// Exam date (YYYY-MM-DD); defaults to the configured fallback
        #[arg(long)]
        exam_date: Option<NaiveDate>,

        /// Explicit id; generated when omitted
        #[arg(long)]
        id: Option<String>,

        #[arg(long)]
        owner: Option<String>,
    },

    /// Remove a subject by id
    Remove { id: String },
}

#[derive(Subcommand)]
enum LogCommands {
    /// Record a study session
    Add {
        /// Subject id the session belongs to
        subject: String,

        /// Session length in hours
        hours: f64,

        /// Task label (e.g. Read, Problems, Past paper)
        #[arg(long, default_value = "Read")]
        task: String,

        /// Optional self-rating, 0-100
        #[arg(long)]
        score: Option<u8>,

        #[arg(long, default_value = "")]
        notes: String,

        /// Session date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        owner: Option<String>,
    },

    /// List recent study sessions
    List {
        #[arg(long, default_value_t = 10)]
        limit: usize,

        #[arg(long)]
        owner: Option<String>,
    },
}

#[derive(Subcommand)]
enum TestCommands {
    /// Record a self-test result
    Add {
        /// Subject id the test belongs to
        subject: String,

        /// Score in percent, 0-100
        score: u8,

        /// Perceived difficulty, 1-5
        #[arg(long, default_value_t = 3)]
        difficulty: u8,

        #[arg(long, default_value = "")]
        notes: String,

        /// Test date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        owner: Option<String>,
    },

    /// List recent self-tests
    List {
        #[arg(long, default_value_t = 10)]
        limit: usize,

        #[arg(long)]
        owner: Option<String>,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Print the current settings
    Show,

    /// Update settings fields
    Set {
        #[arg(long)]
        semester: Option<String>,

        /// Weight of log scores in the blended average, 0-1
        #[arg(long)]
        logs_weight: Option<f64>,

        /// Explicit test-score weight, 0-1
        #[arg(long)]
        tests_weight: Option<f64>,

        /// Fallback exam date (YYYY-MM-DD)
        #[arg(long)]
        default_exam_date: Option<NaiveDate>,

        /// Momentum window in days
        #[arg(long)]
        momentum_days: Option<u32>,

        /// How many focus subjects the dashboard lists
        #[arg(long)]
        focus_n: Option<usize>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examtrack=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Dashboard { owner, format } => commands::dashboard::execute(owner, format),
        Commands::Subject { command } => match command {
            SubjectCommands::List { owner } => commands::subject::list(owner),
            SubjectCommands::Add {
                name,
                credits,
                confidence,
                exam_date,
                id,
                owner,
            } => commands::subject::add(name, credits, confidence, exam_date, id, owner),
            SubjectCommands::Remove { id } => commands::subject::remove(id),
        },
        Commands::Log { command } => match command {
            LogCommands::Add {
                subject,
                hours,
                task,
                score,
                notes,
                date,
                owner,
            } => commands::log::add(subject, hours, task, score, notes, date, owner),
            LogCommands::List { limit, owner } => commands::log::list(limit, owner),
        },
        Commands::Test { command } => match command {
            TestCommands::Add {
                subject,
                score,
                difficulty,
                notes,
                date,
                owner,
            } => commands::selftest::add(subject, score, difficulty, notes, date, owner),
            TestCommands::List { limit, owner } => commands::selftest::list(limit, owner),
        },
        Commands::Leaderboard => commands::leaderboard::execute(),
        Commands::Settings { command } => match command {
            SettingsCommands::Show => commands::settings::show(),
            SettingsCommands::Set {
                semester,
                logs_weight,
                tests_weight,
                default_exam_date,
                momentum_days,
                focus_n,
            } => commands::settings::set(
                semester,
                logs_weight,
                tests_weight,
                default_exam_date,
                momentum_days,
                focus_n,
            ),
        },
        Commands::Backup => commands::backup::execute(),
        Commands::Doctor { format } => commands::doctor::execute(format),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
