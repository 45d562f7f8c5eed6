// Domain layer: records, the CRM wire contract and ports (interfaces).

pub mod crm;
pub mod model;
pub mod ports;
