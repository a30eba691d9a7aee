use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "zerotrust",
    version,
    about = "Zero-trust access decisions for users, devices and applications"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the default policy set to the config path
    Init {
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long)]
        force: bool,
    },
    /// Show the effective configuration as TOML
    Config {
        /// Print only where the configuration is read from
        #[arg(long)]
        path: bool,
    },
    /// List registered applications and whether a policy guards them
    Apps,
    /// Evaluate a single access request
    Evaluate {
        user: String,
        device: String,
        application: String,
        #[arg(long)]
        location: Option<String>,
        /// Pin the wall-clock hour (0-23) instead of reading the system clock
        #[arg(long)]
        at_hour: Option<u8>,
        #[arg(long)]
        json: bool,
    },
    /// Run the built-in scenario catalogue
    Scenarios {
        #[arg(long)]
        at_hour: Option<u8>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path, force } => commands::config::init(path.or(cli.config), force),
        Commands::Config { path: true } => commands::config::print_path(cli.config),
        Commands::Config { path: false } => commands::config::print_effective(cli.config),
        Commands::Apps => commands::apps::execute(cli.config),
        Commands::Evaluate {
            user,
            device,
            application,
            location,
            at_hour,
            json,
        } => commands::evaluate::execute(commands::evaluate::EvaluateInputs {
            config_path: cli.config,
            user,
            device,
            application,
            location,
            at_hour,
            json,
        }),
        Commands::Scenarios { at_hour } => commands::scenarios::execute(cli.config, at_hour),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("security_log=info,warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
