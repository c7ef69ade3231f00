//! LBaaS A10 VIP CLI (lbaas-vip)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use lbaas_config::global_store;
use lbaas_core::VipEvent;
use lbaas_vip::commands::{load_pools, load_vip, DevicesCommand, OutputFormat, PlanCommand};

#[derive(Parser)]
#[command(name = "lbaas-vip")]
#[command(about = "Preview A10 appliance calls for LBaaS VIP lifecycle events")]
#[command(version)]
#[command(long_about = "
Preview A10 appliance calls for LBaaS VIP lifecycle events

Runs the VIP translator against an in-memory device and prints the
virtual-server, virtual-port and persistence-template calls it issues,
using the per-device settings from the devices file.

Examples:
  lbaas-vip devices                                 # List configured devices
  lbaas-vip plan -D ax1 create --vip vip.json       # Plan a VIP creation
  lbaas-vip plan -D ax1 update --old a.json --new b.json
  lbaas-vip plan -D ax1 -f json delete --vip vip.json
")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Device configuration file
    #[arg(
        short,
        long,
        global = true,
        default_value = "/etc/lbaas-a10/devices.json"
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the appliance calls for a VIP event
    Plan {
        /// Target device name
        #[arg(short = 'D', long)]
        device: String,

        /// JSON array of pools; without it the VIP's pool is assumed to exist
        #[arg(short, long)]
        pools: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        #[command(subcommand)]
        action: PlanAction,
    },

    /// List configured devices
    Devices {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
enum PlanAction {
    /// VIP creation
    Create {
        #[arg(long)]
        vip: PathBuf,
    },

    /// VIP update
    Update {
        /// VIP before the update
        #[arg(long)]
        old: PathBuf,

        /// VIP after the update
        #[arg(long)]
        new: PathBuf,
    },

    /// VIP deletion
    Delete {
        #[arg(long)]
        vip: PathBuf,
    },
}

impl PlanAction {
    fn into_event(self) -> Result<VipEvent> {
        Ok(match self {
            PlanAction::Create { vip } => VipEvent::Created {
                vip: load_vip(vip)?,
            },
            PlanAction::Update { old, new } => VipEvent::Updated {
                old: load_vip(old)?,
                new: load_vip(new)?,
            },
            PlanAction::Delete { vip } => VipEvent::Deleted {
                vip: load_vip(vip)?,
            },
        })
    }
}

async fn run(cli: Cli) -> Result<()> {
    let store = global_store();
    store
        .reload_from_file(&cli.config)
        .with_context(|| format!("Failed to load devices from {}", cli.config.display()))?;

    match cli.command {
        Commands::Plan {
            device,
            pools,
            format,
            action,
        } => {
            let mut cmd = PlanCommand::new(store.clone());
            if let Some(path) = pools {
                cmd = cmd.with_pools(load_pools(path)?);
            }
            let event = action.into_event()?;
            cmd.execute(&device, &event, format).await
        }

        Commands::Devices { format } => DevicesCommand::new(store.clone()).execute(format),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let quiet = cli.quiet;
    let verbose = cli.verbose || cli.debug;

    match run(cli).await {
        Ok(()) => {
            if !quiet {
                log::info!("Command completed successfully");
            }
            std::process::exit(0);
        }
        Err(e) => {
            if !quiet {
                eprintln!("Error: {}", e);

                if verbose {
                    for cause in e.chain().skip(1) {
                        eprintln!("  Caused by: {}", cause);
                    }
                }
            }
            std::process::exit(1);
        }
    }
}
