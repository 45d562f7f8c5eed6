pub mod crm_service;
pub mod submissions;

use crate::adapters::{AadTokenService, DynamicsHttpTransport, MockTokenService, SimulatedTransport};
use crate::config::toml_config::{AppConfig, DynamicsMode};
use crate::core::{CrmContractSimulator, CrmDirectory};
use crate::domain::ports::{CrmTransport, TokenService};
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use crm_service::DynamicsCrmService;
use std::sync::Arc;

/// Wire the CRM client for the configured mode.
pub fn crm_service_from_config(config: &AppConfig) -> Result<DynamicsCrmService> {
    let (transport, tokens): (Arc<dyn CrmTransport>, Arc<dyn TokenService>) =
        match config.dynamics.mode {
            DynamicsMode::Mock => {
                let directory = match &config.mock.directory_file {
                    Some(path) => CrmDirectory::from_file(path)?,
                    None => CrmDirectory::builtin()?,
                };
                tracing::info!("Using Dynamics simulator with {} licences", directory.len());
                let simulator = CrmContractSimulator::new(Arc::new(directory));
                let transport: Arc<dyn CrmTransport> =
                    Arc::new(SimulatedTransport::new(Arc::new(simulator)));
                let tokens: Arc<dyn TokenService> = Arc::new(MockTokenService);
                (transport, tokens)
            }
            DynamicsMode::Dynamics => {
                let endpoint =
                    validate_required_field("dynamics.endpoint", &config.dynamics.endpoint)?;
                let aad = validate_required_field("active_directory", &config.active_directory)?;
                let timeout = config.dynamics.timeout();
                tracing::info!("Using Dynamics endpoint {}", endpoint);
                let transport: Arc<dyn CrmTransport> = Arc::new(DynamicsHttpTransport::new(
                    endpoint,
                    timeout,
                    config.dynamics.api_token.clone(),
                )?);
                let tokens: Arc<dyn TokenService> = Arc::new(AadTokenService::new(
                    &aad.authority,
                    &aad.identity_client_id,
                    &aad.scope_for(endpoint),
                    timeout,
                )?);
                (transport, tokens)
            }
        };

    Ok(DynamicsCrmService::new(
        transport,
        tokens,
        config.dynamics.api_path.clone(),
    ))
}
