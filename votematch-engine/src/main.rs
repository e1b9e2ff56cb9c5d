//! VoteMatch (votematch) - Main entry point
//!
//! Command-line front end for the recommendation engine. Logs go to stderr so
//! `--json` output on stdout stays machine readable.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use votematch_common::config::{self, TomlConfig};
use votematch_common::{Catalog, Mode};
use votematch_engine::services::{PriorityMapper, PriorityMapping};
use votematch_engine::{RecommendationOrchestrator, RecommendationRequest, RecommendationsResult};

/// Command-line arguments for votematch
#[derive(Parser, Debug)]
#[command(name = "votematch")]
#[command(about = "Match voter priorities to candidates and ballot measures")]
#[command(version)]
struct Args {
    /// Config file (overrides VOTEMATCH_CONFIG and the platform default)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory with taxonomy, conflicts, candidates and measures JSON
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recommend candidates and ballot measures for a set of priorities
    Recommend {
        /// Priority text (repeat for several priorities)
        #[arg(short, long = "priority", required = true)]
        priorities: Vec<String>,

        /// Location code (e.g. ZIP code)
        #[arg(short, long)]
        location: String,

        /// Data mode (current or demo)
        #[arg(short, long, default_value = "current")]
        mode: Mode,

        /// Skip the result cache
        #[arg(long)]
        bypass_cache: bool,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how priorities map onto the issue taxonomy
    Analyze {
        /// Priority text (repeat for several priorities)
        #[arg(short, long = "priority", required = true)]
        priorities: Vec<String>,
    },

    /// Write a default config file
    InitConfig {
        /// Destination (defaults to the platform config path)
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = config::load_config(args.config.as_deref()).context("Failed to load config")?;
    init_tracing(&toml_config);

    match args.command {
        Command::InitConfig { path } => {
            let path = match path.or_else(config::default_config_path) {
                Some(path) => path,
                None => anyhow::bail!("No platform config directory; pass a path explicitly"),
            };
            config::write_toml_config(&TomlConfig::default(), &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote default config to {}", path.display());
        }

        Command::Analyze { priorities } => {
            let catalog = load_catalog(&args.data_dir, &toml_config)?;
            let mapper = PriorityMapper::new(catalog);
            let analysis = mapper
                .analyze_priorities(&priorities)
                .context("Priority analysis failed")?;
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }

        Command::Recommend {
            priorities,
            location,
            mode,
            bypass_cache,
            json,
        } => {
            let mut request = RecommendationRequest::new(priorities, location, mode);
            request.bypass_cache = bypass_cache;
            request.validate().context("Invalid request")?;

            let catalog = load_catalog(&args.data_dir, &toml_config)?;
            let mut orchestrator = RecommendationOrchestrator::new(catalog);
            if !toml_config.cache.enabled {
                orchestrator = orchestrator.without_cache();
            }

            let result = orchestrator.generate_recommendations(&request).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_summary(&result);
            }
        }
    }

    Ok(())
}

fn init_tracing(toml_config: &TomlConfig) {
    let level = &toml_config.logging.level;
    let default_filter = format!(
        "votematch={0},votematch_engine={0},votematch_common={0}",
        level
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_catalog(cli_dir: &Option<PathBuf>, toml_config: &TomlConfig) -> Result<Arc<Catalog>> {
    let data_dir = config::resolve_data_dir(cli_dir.as_deref(), toml_config);
    match &data_dir {
        Some(dir) => info!("Loading catalog from {}", dir.display()),
        None => info!("Using built-in catalog"),
    }
    let catalog = Catalog::load(data_dir.as_deref()).context("Failed to load catalog")?;
    Ok(Arc::new(catalog))
}

fn print_summary(result: &RecommendationsResult) {
    if let Some(error) = &result.error {
        println!("Warning: {}", error);
        println!();
    }

    println!("Policy focus:");
    for policy in &result.policy_recommendations.top_policies {
        println!("  - {}", policy);
    }
    println!("{}", result.policy_recommendations.explanation);
    println!();

    println!("Candidates:");
    for c in &result.candidates {
        println!(
            "  {:>5.2}  {} ({}, {})",
            c.alignment_score, c.name, c.party, c.office
        );
        println!("         {}", c.rationale);
    }
    println!();

    println!("Ballot measures:");
    for m in &result.ballot_measures {
        let marker = if m.is_fallback { " [not confirmed for location]" } else { "" };
        println!("  {:>5.2}  {}{}", m.relevance_score, m.title, marker);
        println!("         {}", m.explanation);
    }
}
