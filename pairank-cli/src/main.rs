mod config;
mod output;
mod session;
mod state;

use anyhow::{bail, Context, Result};
use clap::Parser;
use pairank_core::SessionService;
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::state::JsonFileStore;

#[derive(Parser)]
#[command(name = "pairank", version, about = "Rank items by pairwise human comparisons")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (default: ~/.config/pairank/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the state file holding items and comparisons
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Fixed seed for the pair draw
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create a default config file at ~/.config/pairank/config.toml
    Init,
    /// Register items to be ranked
    Add(AddArgs),
    /// Show the next pair to compare
    Next,
    /// Record the outcome of one comparison
    Record(RecordArgs),
    /// Show items ranked by quality score
    Rankings,
    /// List recorded comparisons in recording order
    History,
    /// Delete every recorded comparison, keeping the items
    Reset(ResetArgs),
    /// Compare pairs interactively until every pair is covered
    Session,
}

#[derive(clap::Args)]
struct AddArgs {
    /// File with one label per line, or a JSON array of labels
    #[arg(long)]
    items: Option<PathBuf>,

    /// Inline label (repeatable)
    #[arg(long = "item")]
    inline_items: Vec<String>,
}

#[derive(clap::Args)]
struct RecordArgs {
    /// ID of the item that won
    #[arg(long)]
    winner: i64,

    /// ID of the item that lost
    #[arg(long)]
    loser: i64,
}

#[derive(clap::Args)]
struct ResetArgs {
    /// Confirm deleting the comparison history
    #[arg(long)]
    yes: bool,
}

/// Effective settings after merging config file and flags (flags win).
struct Settings {
    state_file: PathBuf,
    json: bool,
    seed: Option<u64>,
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::config_path()?,
    };
    let cfg = config::load_config(&config_path)?;

    let state_file = match cli.state.clone().or(cfg.state_file.map(PathBuf::from)) {
        Some(path) => path,
        None => config::default_state_path()?,
    };

    Ok(Settings {
        state_file,
        json: cli.json || cfg.json.unwrap_or(false),
        seed: cli.seed.or(cfg.seed),
    })
}

/// Parse a string as either a JSON array of strings or plain text (one item per line).
fn parse_items_from_str(content: &str) -> Result<Vec<String>> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        let items: Vec<String> = serde_json::from_str(trimmed)
            .context("Input looks like JSON but failed to parse")?;
        Ok(items.into_iter().filter(|s| !s.trim().is_empty()).collect())
    } else {
        Ok(trimmed
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }
}

/// Load labels from all sources: --items file, --item inline args, or stdin.
fn load_items(args: &AddArgs) -> Result<Vec<String>> {
    let mut items = Vec::new();

    if let Some(ref path) = args.items {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read items file {}", path.display()))?;
        items = parse_items_from_str(&content)?;
    }

    items.extend(args.inline_items.iter().cloned());

    // From stdin (only if no file and no inline items)
    if items.is_empty() {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            bail!("No items provided. Use --items <file>, --item <label>, or pipe labels via stdin.");
        }
        let content = stdin
            .lock()
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .context("Failed to read from stdin")?
            .join("\n");
        items = parse_items_from_str(&content)?;
    }

    Ok(items)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Commands::Init = cli.command {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => config::config_path()?,
        };
        config::create_default_config(&path)?;
        println!("Created config at {}", path.display());
        println!("Edit it to set your state file, output format, etc.");
        return Ok(());
    }

    let settings = resolve_settings(&cli)?;
    let store = JsonFileStore::open(&settings.state_file)
        .with_context(|| format!("Failed to open state at {}", settings.state_file.display()))?;
    tracing::debug!(state = %store.path().display(), "using state file");
    let service = SessionService::new(store).with_seed(settings.seed);

    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Add(args) => {
            let labels = load_items(&args)?;
            let created = service.register_items(&labels)?;
            println!("Added {} new items ({} already known)", created.len(), labels.len() - created.len());
        }
        Commands::Next => {
            let result = service.next_pair()?;
            output::print_pair(&result, settings.json);
            if cli.verbose {
                output::print_progress(&service.progress()?);
            }
            // Exit non-zero for the two error outcomes, after printing their shape.
            result.into_pair()?;
        }
        Commands::Record(args) => {
            let comparison = service.record(args.winner, args.loser)?;
            if settings.json {
                println!("{}", serde_json::json!({ "status": "success" }));
            } else {
                println!(
                    "Recorded {} > {} at {}",
                    comparison.winner_id,
                    comparison.loser_id,
                    comparison.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                );
            }
        }
        Commands::Rankings => output::print_rankings(&service.rankings()?, settings.json),
        Commands::History => output::print_history(&service.history()?, settings.json),
        Commands::Reset(args) => {
            if !args.yes {
                bail!("Refusing to delete the comparison history without --yes");
            }
            let removed = service.reset()?;
            println!("Deleted {removed} comparisons");
        }
        Commands::Session => {
            let stdin = io::stdin();
            let summary = session::run_session(&service, stdin.lock(), io::stdout())?;
            println!("\nRecorded {} comparisons this session", summary.recorded);
            output::print_progress(&service.progress()?);
            println!();
            output::print_rankings(&service.rankings()?, settings.json);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_items_plain_lines() {
        let items = parse_items_from_str("  a.png\n\nb.png \n c.png").unwrap();
        assert_eq!(items, vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_parse_items_json_array() {
        let items = parse_items_from_str(r#"["x.jpg", "  ", "y.jpg"]"#).unwrap();
        assert_eq!(items, vec!["x.jpg", "y.jpg"]);
    }

    #[test]
    fn test_parse_items_bad_json() {
        assert!(parse_items_from_str("[\"unterminated").is_err());
    }

    #[test]
    fn test_cli_flags_parse() {
        let cli = Cli::try_parse_from(["pairank", "record", "--winner", "3", "--loser", "5", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Record(args) => assert_eq!((args.winner, args.loser), (3, 5)),
            _ => panic!("expected record"),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "state_file = \"/from/config.json\"\nseed = 1\njson = true\n").unwrap();

        let cli = Cli::try_parse_from([
            "pairank",
            "--config",
            config_path.to_str().unwrap(),
            "--state",
            "/from/flag.json",
            "rankings",
        ])
        .unwrap();
        let settings = resolve_settings(&cli).unwrap();
        assert_eq!(settings.state_file, PathBuf::from("/from/flag.json"));
        assert_eq!(settings.seed, Some(1));
        assert!(settings.json);
    }
}
