mod config;
mod generate_cmd;
mod onboard_cmd;
mod progress_cmds;
mod reset_cmd;
mod show_cmds;
mod status_cmd;
#[cfg(test)]
mod test_util;
mod tips_cmd;
mod tui;

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tokio_util::sync::CancellationToken;

use config::{CliOverrides, NutriConfig};

#[derive(Parser)]
#[command(
    name = "nutriguide",
    version,
    about = "Profile-driven meal plans and nutrition tracking"
)]
struct Cli {
    /// Data directory (overrides NUTRIGUIDE_DATA_DIR env var)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Gemini API key (overrides GEMINI_API_KEY env var)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Model name (overrides NUTRIGUIDE_MODEL env var)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            data_dir: self.data_dir.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a config file from --api-key, --model and --data-dir
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Create your profile and generate a first plan
    Onboard(onboard_cmd::OnboardArgs),
    /// Show what is stored and what to do next
    Status,
    /// Regenerate the meal plan and guidelines
    Generate,
    /// Show the meal plan
    Plan {
        /// Show only this day (1-based)
        #[arg(long)]
        day: Option<usize>,
        /// Print the stored JSON
        #[arg(long)]
        json: bool,
    },
    /// Show daily calorie and macro guidelines
    Guidelines {
        /// Print the stored JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a weight / mood / adherence check-in
    Log {
        /// Weight in kg
        #[arg(long)]
        weight: String,
        /// Mood from 1 (awful) to 5 (great)
        #[arg(long, default_value_t = nutriguide_core::progress::DEFAULT_MOOD)]
        mood: u8,
        /// Plan adherence percentage (0-100)
        #[arg(long, default_value_t = nutriguide_core::progress::DEFAULT_ADHERENCE)]
        adherence: u8,
        /// Entry date as MM/DD/YYYY (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show recent check-ins, newest first
    History {
        /// Print the stored JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch a fresh set of nutrition tips
    Tips,
    /// Show your profile and daily targets
    Profile,
    /// Launch the interactive dashboard
    Dashboard,
    /// Delete all stored data (profile, plan, guidelines, history)
    Reset {
        /// Skip the confirmation requirement
        #[arg(long)]
        yes: bool,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Execute the `nutriguide init` command: write config file.
fn cmd_init(cli: &CliOverrides, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        gemini: config::GeminiSection {
            api_key: cli.api_key.clone(),
            model: cli.model.clone(),
            base_url: None,
        },
        storage: config::StorageSection {
            data_dir: cli.data_dir.clone(),
        },
    };
    let path = config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    match &cli.api_key {
        Some(key) if key.chars().count() > 8 => {
            let head: String = key.chars().take(4).collect();
            let tail: String = key.chars().skip(key.chars().count() - 4).collect();
            println!("  gemini.api_key = {head}...{tail}");
        }
        Some(_) => println!("  gemini.api_key = (set)"),
        None => println!("  gemini.api_key not set; export {}", config::API_KEY_ENV),
    }
    if let Some(model) = &cli.model {
        println!("  gemini.model = {model}");
    }
    if let Some(dir) = &cli.data_dir {
        println!("  storage.data_dir = {}", dir.display());
    }
    println!();
    println!("Next: run `nutriguide onboard` to create your profile.");

    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// While the dashboard owns the terminal, logs go to a file in the data dir.
fn init_file_logging(config: &NutriConfig) -> anyhow::Result<()> {
    let path = config.store.log_path();
    std::fs::create_dir_all(&config.store.data_dir).with_context(|| {
        format!("failed to create data directory {}", config.store.data_dir.display())
    })?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// A token cancelled on Ctrl-C, so in-flight generation stops cleanly.
fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    token
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let overrides = cli.overrides();

    if matches!(cli.command, Commands::Dashboard) {
        let resolved = NutriConfig::resolve(&overrides)?;
        init_file_logging(&resolved)?;
        return tui::run_dashboard(&resolved, &ctrl_c_token()).await;
    }
    init_stderr_logging();

    match cli.command {
        Commands::Init { force } => {
            cmd_init(&overrides, force)?;
        }
        Commands::Onboard(args) => {
            let resolved = NutriConfig::resolve(&overrides)?;
            onboard_cmd::run_onboard(&resolved, args, &ctrl_c_token()).await?;
        }
        Commands::Status => {
            let resolved = NutriConfig::resolve(&overrides)?;
            status_cmd::run_status(&resolved)?;
        }
        Commands::Generate => {
            let resolved = NutriConfig::resolve(&overrides)?;
            generate_cmd::run_generate(&resolved, &ctrl_c_token()).await?;
        }
        Commands::Plan { day, json } => {
            let resolved = NutriConfig::resolve(&overrides)?;
            show_cmds::run_plan(&resolved, day, json)?;
        }
        Commands::Guidelines { json } => {
            let resolved = NutriConfig::resolve(&overrides)?;
            show_cmds::run_guidelines(&resolved, json)?;
        }
        Commands::Log {
            weight,
            mood,
            adherence,
            date,
        } => {
            let resolved = NutriConfig::resolve(&overrides)?;
            progress_cmds::run_log(&resolved, &weight, mood, adherence, date.as_deref())?;
        }
        Commands::History { json } => {
            let resolved = NutriConfig::resolve(&overrides)?;
            progress_cmds::run_history(&resolved, json)?;
        }
        Commands::Tips => {
            let resolved = NutriConfig::resolve(&overrides)?;
            tips_cmd::run_tips(&resolved, &ctrl_c_token()).await?;
        }
        Commands::Profile => {
            let resolved = NutriConfig::resolve(&overrides)?;
            show_cmds::run_profile(&resolved)?;
        }
        Commands::Dashboard => {
            // Needs file logging; dispatched before the stderr subscriber.
        }
        Commands::Reset { yes } => {
            let resolved = NutriConfig::resolve(&overrides)?;
            reset_cmd::run_reset(&resolved, yes)?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "nutriguide",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
