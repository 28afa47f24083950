//! Lookout CLI - automated UI verification against a running web app
//!
//! Usage:
//!   lookout run <scenarios.json>    Run a scenario suite
//!   lookout list <scenarios.json>   List the scenarios in a suite
//!   lookout init-config [path]      Write a default config file
//!
//! Exit codes from `run`: 0 all scenarios passed, 1 at least one
//! assertion failure, 2 at least one infrastructure error, 3 the browser
//! could not be launched at all.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lookout_browser::{BrowserConfig, BrowserSessionFactory};
use lookout_core::{load_suite, HarnessConfig, RunReport};
use lookout_engine::{summarize, write_report, Harness, EXIT_LAUNCH_FAILURE, EXIT_PASSED};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "lookout")]
#[command(author, version, about = "Automated UI verification harness")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario suite against the application under test
    Run {
        /// Scenario suite (JSON file)
        scenarios: PathBuf,

        /// Base URL of the application under test
        #[arg(long)]
        base_url: Option<String>,

        /// Directory for screenshots and the run report
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Show the browser window instead of running headless
        #[arg(long)]
        headed: bool,

        /// How many scenarios may run at once
        #[arg(short = 'j', long)]
        concurrency: Option<usize>,

        /// Default timeout for navigation and wait steps, in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Configuration file
        #[arg(long, default_value = "lookout.toml")]
        config: PathBuf,
    },

    /// List the scenarios in a suite without running them
    List {
        /// Scenario suite (JSON file)
        scenarios: PathBuf,
    },

    /// Write a default configuration file
    InitConfig {
        /// Where to write the config
        #[arg(default_value = "lookout.toml")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let exit_code = match cli.command {
        Commands::Run {
            scenarios,
            base_url,
            output_dir,
            headed,
            concurrency,
            timeout_ms,
            config,
        } => {
            cmd_run(
                scenarios,
                base_url,
                output_dir,
                headed,
                concurrency,
                timeout_ms,
                config,
            )
            .await?
        }
        Commands::List { scenarios } => cmd_list(scenarios).await?,
        Commands::InitConfig { path } => cmd_init_config(path).await?,
    };

    std::process::exit(exit_code);
}

#[allow(clippy::too_many_arguments)]
async fn cmd_run(
    scenarios_path: PathBuf,
    base_url: Option<String>,
    output_dir: Option<PathBuf>,
    headed: bool,
    concurrency: Option<usize>,
    timeout_ms: Option<u64>,
    config_path: PathBuf,
) -> Result<i32> {
    let mut config = HarnessConfig::load_or_default(&config_path)
        .with_context(|| format!("failed to load config {:?}", config_path))?;

    // CLI flags override file values
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    if let Some(output_dir) = output_dir {
        config.output_dir = output_dir;
    }
    if headed {
        config.headless = false;
    }
    if let Some(concurrency) = concurrency {
        config.concurrency = concurrency;
    }
    if let Some(timeout_ms) = timeout_ms {
        config.default_timeout_ms = timeout_ms;
    }

    let suite = load_suite(&scenarios_path)
        .with_context(|| format!("failed to load suite {:?}", scenarios_path))?;
    info!(
        "Loaded {} scenarios from {:?}, running against {}",
        suite.len(),
        scenarios_path,
        config.base_url
    );

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("failed to create output dir {:?}", config.output_dir))?;

    let factory = BrowserSessionFactory::new(BrowserConfig::from_harness(&config));
    let harness = Harness::new(config.clone(), factory);

    if let Err(e) = harness.preflight().await {
        eprintln!("fatal: {}", e);
        eprintln!("No scenarios were run and no report was written.");
        return Ok(EXIT_LAUNCH_FAILURE);
    }

    let results = harness.run_all(&suite).await;
    let report = RunReport::new(&config.base_url, results);

    let summary = summarize(&report);
    print!("{}", summary.text);

    let report_path = write_report(&report, &config.output_dir).await?;
    println!("Report written to {}", report_path.display());

    Ok(summary.exit_code)
}

async fn cmd_list(scenarios_path: PathBuf) -> Result<i32> {
    let suite = load_suite(&scenarios_path)
        .with_context(|| format!("failed to load suite {:?}", scenarios_path))?;

    println!("{} scenarios in {:?}:", suite.len(), scenarios_path);
    for scenario in &suite {
        println!(
            "  {} ({} steps)",
            scenario.name,
            scenario.steps.len()
        );
    }
    Ok(EXIT_PASSED)
}

async fn cmd_init_config(path: PathBuf) -> Result<i32> {
    HarnessConfig::write_default(&path)
        .with_context(|| format!("failed to write config {:?}", path))?;
    println!("Wrote default configuration to {:?}", path);
    Ok(EXIT_PASSED)
}
