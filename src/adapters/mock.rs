use crate::core::simulator::CrmContractSimulator;
use crate::domain::crm::CrmReply;
use crate::domain::ports::CrmTransport;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Routes CRM calls to the in-process contract simulator instead of the network.
#[derive(Clone)]
pub struct SimulatedTransport {
    simulator: Arc<CrmContractSimulator>,
}

impl SimulatedTransport {
    pub fn new(simulator: Arc<CrmContractSimulator>) -> Self {
        tracing::info!("Dynamics contract simulator bound to CRM client");
        Self { simulator }
    }
}

#[async_trait]
impl CrmTransport for SimulatedTransport {
    async fn post(
        &self,
        path: &str,
        authorization: Option<&str>,
        body: serde_json::Value,
    ) -> Result<CrmReply> {
        self.simulator.dispatch(path, authorization, &body)
    }
}
