use crate::domain::model::{Catch, SmallCatch, Submission, SubmissionStatus};
use crate::domain::ports::{CrmLookupService, SubmissionStore};
use crate::utils::error::{RcrError, Result};
use crate::utils::validation::Validate;
use chrono::Datelike;
use std::sync::Arc;

/// Season lifecycle and record intake for catch returns.
///
/// Every record passes `validate` before it reaches the store; catches also
/// have their mass reconciled between validation and storage.
pub struct SubmissionService<S: SubmissionStore> {
    store: S,
    crm: Arc<dyn CrmLookupService>,
}

impl<S: SubmissionStore> SubmissionService<S> {
    pub fn new(store: S, crm: Arc<dyn CrmLookupService>) -> Self {
        Self { store, crm }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open a return for the season and start the matching CRM activity.
    ///
    /// A contact already holding a return for the season is turned away
    /// before any CRM call is made.
    pub async fn start_submission(&self, contact_id: &str, season: i32) -> Result<Submission> {
        if let Some(existing) = self.store.find_submission(contact_id, season) {
            return Err(RcrError::validation(
                "submission",
                format!(
                    "submission {} already exists for {} in {}",
                    existing.id, contact_id, season
                ),
            ));
        }

        let activity_id = self.crm.create_activity(contact_id, season).await?;
        let submission = self
            .store
            .insert_submission(contact_id, season, &activity_id)?;
        tracing::info!(
            "Started submission {} for {} season {} (activity {})",
            submission.id,
            contact_id,
            season,
            activity_id
        );
        Ok(submission)
    }

    /// Close the return and move its CRM activity to `Submitted`.
    ///
    /// The status change is claimed in the store first, so concurrent calls
    /// reach the CRM at most once. A CRM failure reopens the return.
    pub async fn submit(&self, submission_id: u64) -> Result<Submission> {
        let submission = self.store.transition_submission(
            submission_id,
            SubmissionStatus::Incomplete,
            SubmissionStatus::Submitted,
        )?;

        if let Err(e) = self
            .crm
            .update_activity(&submission.contact_id, submission.season)
            .await
        {
            tracing::warn!("Reopening submission {} after CRM failure: {}", submission_id, e);
            self.store.transition_submission(
                submission_id,
                SubmissionStatus::Submitted,
                SubmissionStatus::Incomplete,
            )?;
            return Err(e);
        }

        tracing::info!("Submission {} submitted", submission.id);
        Ok(submission)
    }

    pub fn add_catch(&self, mut record: Catch) -> Result<u64> {
        let submission = self.open_submission(record.submission_id)?;
        record.validate()?;
        if record.date_caught.year() != submission.season {
            return Err(RcrError::validation(
                "dateCaught",
                format!("catch must be within the {} season", submission.season),
            ));
        }

        record.mass.reconcile();
        let id = self.store.insert_catch(record)?;
        tracing::debug!("Stored catch {} on submission {}", id, submission.id);
        Ok(id)
    }

    pub fn add_small_catch(&self, record: SmallCatch) -> Result<u64> {
        let submission = self.open_submission(record.submission_id)?;
        record.validate()?;
        let id = self.store.insert_small_catch(record)?;
        tracing::debug!("Stored small catch {} on submission {}", id, submission.id);
        Ok(id)
    }

    fn open_submission(&self, submission_id: u64) -> Result<Submission> {
        let submission = self
            .store
            .submission(submission_id)
            .ok_or_else(|| RcrError::NotFoundError {
                message: format!("submission {}", submission_id),
            })?;
        if submission.status == SubmissionStatus::Submitted {
            return Err(RcrError::validation(
                "submission",
                format!("submission {} has already been submitted", submission_id),
            ));
        }
        Ok(submission)
    }
}
