//! Multi-agent debate CLI.
//!
//! # Usage
//!
//! ```bash
//! # Tax panel on the default provider
//! debate-agents run --preset tax --prompt "Should we itemize?"
//!
//! # Custom roster, JSON transcript
//! debate-agents run --roster panel.toml --prompt "..." --output outcome.json
//!
//! # Canned tax scenarios, one after another
//! debate-agents scenarios --provider openai
//!
//! # Show the tool manifest
//! debate-agents tools --dir ./context/localFiles
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use coordination::{CapabilityRegistry, DebateEngine};
use debate_agents::presets::{self, TAX_SCENARIOS};
use debate_agents::tools::default_registry;
use debate_agents::{render_outcome, run_with_deadline, AppConfig, ProviderKind, Roster};
use tracing::info;

/// Pause between consecutive scenarios.
const SCENARIO_PAUSE: Duration = Duration::from_secs(2);

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one debate
    Run {
        /// Question put to every responder
        #[arg(long)]
        prompt: String,

        /// TOML roster file (takes precedence over --preset)
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Built-in roster
        #[arg(long, value_enum, default_value_t = Preset::Tax)]
        preset: Preset,

        /// Force every responder onto this provider (openai, anthropic, google)
        #[arg(long)]
        provider: Option<ProviderKind>,

        /// Round budget, initial round included (overrides DEBATE_MAX_ROUNDS)
        #[arg(long)]
        max_rounds: Option<u32>,

        /// Convergence threshold in (0, 1] (overrides DEBATE_CONVERGENCE_THRESHOLD)
        #[arg(long)]
        threshold: Option<f64>,

        /// Write the full outcome as JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run every canned tax scenario in sequence
    Scenarios {
        /// Provider for the tax panel
        #[arg(long, default_value_t = ProviderKind::Anthropic)]
        provider: ProviderKind,
    },

    /// Print the tool manifest
    Tools {
        /// Local files directory (overrides DEBATE_LOCAL_FILES_DIR)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    /// Tax expert, CPA, and financial advisor
    Tax,
    /// Single assistant with every local tool
    Files,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = AppConfig::load()?;

    match args.command {
        Command::Run {
            prompt,
            roster,
            preset,
            provider,
            max_rounds,
            threshold,
            output,
        } => {
            let roster = match roster {
                Some(path) => Roster::load(&path)?,
                None => match preset {
                    Preset::Tax => presets::tax_panel(provider.unwrap_or(ProviderKind::Anthropic)),
                    Preset::Files => {
                        presets::file_assistant(provider.unwrap_or(ProviderKind::Anthropic))
                    }
                },
            };
            let roster = match provider {
                Some(kind) => roster.with_provider(kind),
                None => roster,
            };

            roster.debate.apply(&mut config.debate);
            if let Some(rounds) = max_rounds {
                config.debate.max_rounds = rounds;
            }
            if let Some(threshold) = threshold {
                config.debate.convergence_threshold = threshold;
            }

            let registry = default_registry(&config.local_files_dir)?;
            let engine = build_engine(&roster, &config, &registry)?;
            run_one(&engine, &prompt, &config, output).await
        }
        Command::Scenarios { provider } => {
            let roster = presets::tax_panel(provider);
            let registry = CapabilityRegistry::new();
            let engine = build_engine(&roster, &config, &registry)?;

            for (i, scenario) in TAX_SCENARIOS.iter().enumerate() {
                println!("\n\nSCENARIO {}:", i + 1);
                if let Err(e) = run_one(&engine, scenario, &config, None).await {
                    tracing::error!("Scenario {} failed: {e:#}", i + 1);
                }
                if i + 1 < TAX_SCENARIOS.len() {
                    println!("\n{}", "=".repeat(80));
                    tokio::time::sleep(SCENARIO_PAUSE).await;
                }
            }
            Ok(())
        }
        Command::Tools { dir } => {
            let dir = dir.unwrap_or_else(|| config.local_files_dir.clone());
            let registry = default_registry(&dir)?;
            println!("Tools (local files: {}):", dir.display());
            println!("{}", registry.manifest());
            Ok(())
        }
    }
}

fn build_engine(
    roster: &Roster,
    config: &AppConfig,
    registry: &CapabilityRegistry,
) -> Result<DebateEngine> {
    config.require_keys(&roster.providers())?;
    let responders = roster.build_responders(config, registry)?;
    let engine = DebateEngine::with_config(responders, config.debate.clone())
        .context("invalid debate setup")?;

    info!(
        responders = engine.len(),
        max_rounds = engine.config().max_rounds,
        threshold = engine.config().convergence_threshold,
        "Debate engine ready"
    );
    Ok(engine)
}

async fn run_one(
    engine: &DebateEngine,
    prompt: &str,
    config: &AppConfig,
    output: Option<PathBuf>,
) -> Result<()> {
    println!("Scenario: {prompt}");
    println!("{}", "=".repeat(60));

    let outcome = run_with_deadline(engine, prompt, config.timeout).await?;
    println!("{}", render_outcome(&outcome));
    info!(summary = %outcome.summary_line(), "Debate finished");

    if let Some(path) = output {
        std::fs::write(&path, outcome.to_json()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "Outcome written");
    }
    Ok(())
}
