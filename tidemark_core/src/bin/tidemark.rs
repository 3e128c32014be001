use std::process::ExitCode;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use tidemark_core::{Config, Engine, GitWorkspace, Message, Repository, Severity};
use tracing_subscriber::EnvFilter;

/// Output format for reported messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Check that migrations, schema.rb and structure.sql of a branch agree.
#[derive(Parser)]
#[command(name = "tidemark", version, about = "Migration consistency checks for a branch")]
struct Cli {
    /// Repository to inspect
    #[arg(long, default_value = ".")]
    repo: Utf8PathBuf,

    /// Revision the branch is compared against (default: config or "main")
    #[arg(long)]
    base: Option<String>,

    /// Configuration file (default: tidemark.toml in the repository root)
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Additions or deletions at which schema/structure diffs are flagged
    #[arg(long, conflicts_with = "no_large_diff")]
    threshold: Option<u32>,

    /// Skip the large-diff check
    #[arg(long)]
    no_large_diff: bool,

    /// Output format (text or json)
    #[arg(long, default_value = "text", value_enum)]
    format: OutputFormat,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TIDEMARK_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let messages = review(&cli)?;
    print_messages(&messages, cli.format)?;

    let blocking = messages
        .iter()
        .any(|message| message.severity >= Severity::Error);
    Ok(if blocking {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn review(cli: &Cli) -> Result<Vec<Message>> {
    let repository = Repository::open(cli.repo.as_std_path())
        .with_context(|| format!("failed to open repository at {}", cli.repo))?;

    let mut config = match &cli.config {
        Some(path) => Config::load(path.as_std_path())
            .with_context(|| format!("failed to load {path}"))?,
        None => Config::discover(repository.root())
            .context("failed to load repository configuration")?,
    };
    if let Some(threshold) = cli.threshold {
        config.checks.large_diff_threshold = Some(threshold);
    }
    if cli.no_large_diff {
        config.checks.large_diff_threshold = None;
    }

    let base = cli.base.as_deref().unwrap_or_else(|| config.base()).to_owned();
    let patches = repository
        .changeset(&base)
        .with_context(|| format!("failed to compute changeset against {base}"))?;
    tracing::debug!(base = %base, patches = patches.len(), "changeset loaded");

    let workspace = GitWorkspace::new(repository);
    Ok(Engine::from_config(&config).run(&patches, &workspace))
}

fn print_messages(messages: &[Message], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for message in messages {
                println!("{message}");
            }
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(messages).context("failed to serialize messages")?;
            println!("{json}");
        }
    }
    Ok(())
}
