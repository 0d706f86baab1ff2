// src/main.rs
//! iPhone GPS - standalone host for the webhook plugin

use clap::{Parser, Subcommand};
use iphone_gps::{config::HostConfig, host, DisplayHardware};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "iphone-gps", version, about)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the webhook and display until Ctrl+C
    Serve {
        /// Configuration file (default: ~/.config/iphone-gps/config.json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address to listen on, e.g. 0.0.0.0:8080
        #[arg(short, long)]
        bind: Option<String>,

        /// Directory to watch for new .pcap captures
        #[arg(long)]
        capture_dir: Option<PathBuf>,

        /// Display panel used for widget placement
        #[arg(long)]
        hardware: Option<DisplayHardware>,

        /// Show the fix as a single line
        #[arg(long)]
        compact: bool,

        /// Log only, no terminal display
        #[arg(long)]
        headless: bool,
    },
    /// Write a configuration file with default values
    InitConfig {
        path: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Serve {
            config,
            bind,
            capture_dir,
            hardware,
            compact,
            headless,
        } => {
            let mut host_config = HostConfig::load(config.as_deref())?;
            if let Some(bind) = bind {
                host_config.bind = bind;
            }
            if capture_dir.is_some() {
                host_config.capture_dir = capture_dir;
            }
            if let Some(hardware) = hardware {
                host_config.hardware = hardware;
            }
            if compact {
                host_config.plugin.compact_view = Some(true);
            }

            info!("Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            host::run(host_config, headless).await?;
        }
        Command::InitConfig { path } => {
            let path = match path {
                Some(path) => path,
                None => HostConfig::default_path()?,
            };
            HostConfig::default().save(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}
