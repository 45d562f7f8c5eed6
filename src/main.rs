use clap::Parser;
use rcr_returns::app::crm_service_from_config;
use rcr_returns::config::toml_config::LogFormat;
use rcr_returns::config::Command;
use rcr_returns::core::{CatchMass, MeasurementType};
use rcr_returns::domain::ports::CrmLookupService;
use rcr_returns::utils::error::{ErrorSeverity, RcrError};
use rcr_returns::utils::{logger, validation::Validate};
use rcr_returns::{AppConfig, CliConfig, Result};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config = match AppConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let level = config.logging.level.as_deref();
    match config.logging.format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose, level),
        LogFormat::Json => logger::init_json_logger(cli.verbose, level),
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&cli.command, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(command: &Command, config: &AppConfig) -> Result<()> {
    let crm = || crm_service_from_config(config);
    match command {
        Command::Licence {
            licence_number,
            postcode,
        } => {
            let licence = crm()?.get_licence(licence_number, postcode).await?;
            println!("{}", serde_json::to_string_pretty(&licence)?);
        }
        Command::CreateActivity { contact_id, season } => {
            let id = crm()?.create_activity(contact_id, *season).await?;
            println!("✅ Activity started: {}", id);
        }
        Command::UpdateActivity { contact_id, season } => {
            let id = crm()?.update_activity(contact_id, *season).await?;
            println!("✅ Activity submitted: {}", id);
        }
        Command::Roles { username, password } => {
            let identity = crm()?
                .get_authenticated_user_roles(username, password)
                .await?;
            println!("{}", serde_json::to_string_pretty(&identity)?);
        }
        Command::Reconcile { unit, mass } => reconcile(unit, mass)?,
    }
    Ok(())
}

fn reconcile(unit: &str, mass: &str) -> Result<()> {
    let measurement_type: MeasurementType = unit.parse()?;
    let value: Decimal = mass
        .parse()
        .map_err(|_| RcrError::validation("mass", format!("'{}' is not a number", mass)))?;

    let mut catch_mass = CatchMass::new(measurement_type, value);
    catch_mass.validate()?;
    catch_mass.reconcile();
    println!("{}", serde_json::to_string_pretty(&catch_mass)?);
    Ok(())
}
