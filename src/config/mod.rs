pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "rcr")]
#[command(about = "Catch return tooling: CRM lookups and mass conversion")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "rcr.toml")]
    pub config: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Look up a licence and verify the holder's postcode
    Licence {
        licence_number: String,
        #[arg(long)]
        postcode: String,
    },
    /// Start the season's activity for a contact
    CreateActivity { contact_id: String, season: i32 },
    /// Mark the season's activity for a contact as submitted
    UpdateActivity { contact_id: String, season: i32 },
    /// Fetch the CRM roles of an administrative user
    Roles { username: String, password: String },
    /// Convert a catch mass between metric and imperial
    Reconcile {
        #[arg(long, default_value = "metric")]
        unit: String,
        mass: String,
    },
}
