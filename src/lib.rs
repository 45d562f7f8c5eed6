pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::{crm_service::DynamicsCrmService, submissions::SubmissionService};
pub use config::toml_config::AppConfig;
pub use utils::error::{RcrError, Result};
