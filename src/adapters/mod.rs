// Adapters layer: concrete implementations for external systems (CRM http, simulator, tokens, storage).

pub mod http;
pub mod mock;
pub mod storage;
pub mod token;

pub use http::DynamicsHttpTransport;
pub use mock::SimulatedTransport;
pub use storage::InMemorySubmissionStore;
pub use token::{AadTokenService, MockTokenService};
