//! aicommit - CLI entry point.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use aicommit::commit::{
    CharRatioEstimator, Cl100kEstimator, CommitOptions, CommitOutcome, TokenEstimator, run_commit,
};
use aicommit::git::{GitCli, StageMode, check_git_installed};
use aicommit::{AppError, Config, HttpCompletionClient};

/// Stage changes and commit them with an AI-generated message.
#[derive(Parser, Debug)]
#[command(name = "aicommit")]
#[command(about = "Stage changes and commit them with an AI-generated message")]
#[command(version)]
#[command(group(ArgGroup::new("mode").required(true).args(["all", "add"])))]
struct Cli {
    /// Stage all changed files
    #[arg(short, long)]
    all: bool,

    /// Stage specific files/directories
    #[arg(long, num_args = 1.., value_name = "FILE")]
    add: Option<Vec<String>>,

    /// Generate and print the message without committing (files are still staged)
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<AppError>() {
            Some(app_err) => {
                eprintln!("{}", app_err.diagnostic());
                ExitCode::from(app_err.exit_code())
            }
            None => {
                eprintln!("Unexpected error: {:#}", err);
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mode = StageMode::from_flags(cli.all, cli.add).map_err(AppError::from)?;

    // Step 1: Check prerequisites
    check_git_installed().map_err(AppError::from)?;
    let workdir = std::env::current_dir().context("Failed to read the current directory")?;

    // Step 2: Load configuration
    let config = Config::from_env();
    debug!("{:?}", config);
    let client = HttpCompletionClient::new(&config).map_err(AppError::from)?;
    let git = GitCli::new(workdir);

    // Step 3: Stage, generate and commit
    println!("Generating commit message with {}...", config.model);
    let options = CommitOptions {
        mode,
        dry_run: cli.dry_run,
    };
    let estimator = token_estimator();
    let outcome = run_commit(&git, &client, &*estimator, &options).await?;

    print_outcome(&outcome);
    Ok(())
}

/// BPE token counts when the vocabulary loads, the character ratio otherwise.
fn token_estimator() -> Box<dyn TokenEstimator> {
    match Cl100kEstimator::new() {
        Ok(estimator) => Box::new(estimator),
        Err(e) => {
            warn!("Falling back to character-based token estimate: {}", e);
            Box::new(CharRatioEstimator::default())
        }
    }
}

fn print_outcome(outcome: &CommitOutcome) {
    let files = format!(
        "{} file(s) staged, {} described in detail, {} listed by name",
        outcome.staged.len(),
        outcome.detailed_count,
        outcome.summarized_count
    );
    match &outcome.commit {
        Some(commit) => {
            println!("Successfully committed {} ({}):", commit.oid, files);
            println!("{}", outcome.message);
        }
        None => {
            println!("Dry run, nothing committed ({}). Generated message:", files);
            println!("{}", outcome.message);
        }
    }
}

/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "aicommit=debug" } else { "aicommit=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
