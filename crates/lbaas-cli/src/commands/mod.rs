//! CLI commands

pub mod devices;
pub mod plan;

pub use devices::DevicesCommand;
pub use plan::{load_pools, load_vip, PlanCommand, PlanOutcome};

/// Output format of command reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
