use crate::domain::crm::CrmReply;
use crate::domain::model::{Catch, Identity, Licence, SmallCatch, Submission, SubmissionStatus};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Outbound channel to the CRM: a real HTTP client or the in-process simulator.
#[async_trait]
pub trait CrmTransport: Send + Sync {
    async fn post(
        &self,
        path: &str,
        authorization: Option<&str>,
        body: serde_json::Value,
    ) -> Result<CrmReply>;
}

#[async_trait]
pub trait TokenService: Send + Sync {
    /// Exchange user credentials for a bearer access token.
    async fn access_token(&self, username: &str, password: &str) -> Result<String>;
}

#[async_trait]
pub trait CrmLookupService: Send + Sync {
    /// Resolve a licence from (at least) its last six characters and
    /// cross-check the holder's postcode.
    async fn get_licence(&self, licence_number: &str, postcode: &str) -> Result<Licence>;

    /// Open the season's activity for a contact with status `Started`.
    async fn create_activity(&self, contact_id: &str, season: i32) -> Result<String>;

    /// Move the season's activity for a contact to `Submitted`.
    async fn update_activity(&self, contact_id: &str, season: i32) -> Result<String>;

    async fn get_authenticated_user_roles(&self, username: &str, password: &str)
        -> Result<Identity>;
}

pub trait SubmissionStore: Send + Sync {
    /// Record a new return; at most one per contact and season.
    fn insert_submission(&self, contact_id: &str, season: i32, activity_id: &str)
        -> Result<Submission>;
    fn submission(&self, id: u64) -> Option<Submission>;
    fn find_submission(&self, contact_id: &str, season: i32) -> Option<Submission>;

    /// Atomically move a submission from `from` to `to`, failing if it is
    /// not currently in `from`.
    fn transition_submission(
        &self,
        id: u64,
        from: SubmissionStatus,
        to: SubmissionStatus,
    ) -> Result<Submission>;
    fn insert_catch(&self, record: Catch) -> Result<u64>;
    fn insert_small_catch(&self, record: SmallCatch) -> Result<u64>;
    fn catches(&self, submission_id: u64) -> Vec<Catch>;
    fn small_catches(&self, submission_id: u64) -> Vec<SmallCatch>;
}
