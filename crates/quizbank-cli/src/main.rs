//! quizbank CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "quizbank",
    version,
    about = "Turn exam dumps into question banks and practice them"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract questions from PDF or text files into JSON banks
    Extract {
        /// Input files (.pdf goes through the extraction service, anything else is read as text)
        #[arg(long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output file (single input) or directory (several inputs)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Max concurrent extractions
        #[arg(long, default_value = "4")]
        parallelism: usize,

        /// Print every parse diagnostic
        #[arg(long)]
        strict: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a JSON question bank
    Validate {
        /// Path to the bank JSON file
        #[arg(long)]
        bank: PathBuf,
    },

    /// List the questions of a bank, or show one of them
    Show {
        /// Path to the bank JSON file
        #[arg(long)]
        bank: PathBuf,

        /// Question number to show with its solution
        #[arg(long)]
        number: Option<u32>,

        /// Print the question as JSON
        #[arg(long, requires = "number")]
        json: bool,
    },

    /// Practice a bank interactively
    Practice {
        /// Path to the bank JSON file
        #[arg(long)]
        bank: PathBuf,

        /// Shuffle question order
        #[arg(long)]
        shuffle: bool,

        /// Practice at most this many questions
        #[arg(long)]
        limit: Option<usize>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quizbank=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input,
            output,
            parallelism,
            strict,
            config,
        } => commands::extract::execute(input, output, parallelism, strict, config).await,
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Show { bank, number, json } => commands::show::execute(bank, number, json),
        Commands::Practice {
            bank,
            shuffle,
            limit,
            config,
        } => commands::practice::execute(bank, shuffle, limit, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
