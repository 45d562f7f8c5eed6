pub mod credential;
pub mod directory;
pub mod mass;
pub mod simulator;

pub use directory::{CrmDirectory, CrmDirectoryEntry};
pub use mass::{CatchMass, MeasurementType};
pub use simulator::CrmContractSimulator;
