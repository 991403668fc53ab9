//! Utils

use clap::Parser;

/// Arguments for the scenario demo
#[derive(Debug, Parser)]
pub struct DemoScenarioArgs {
    /// Seed for the scenario's randomized choices
    #[clap(short, long, default_value_t = 42)]
    pub seed: u64,

    /// Generate variation groups and per-combination models
    #[clap(short = 'm', long)]
    pub has_model: bool,

    /// Track stock by IMEI/serial numbers
    #[clap(long)]
    pub imei: bool,

    /// Manage stock by lot/batch (ignored under --imei)
    #[clap(long)]
    pub lot: bool,

    /// Scenario fixture file to load instead of the built-in defaults
    #[clap(short, long)]
    pub fixture: Option<String>,
}
