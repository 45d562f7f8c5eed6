use crate::domain::model::{Catch, SmallCatch, Submission, SubmissionStatus};
use crate::domain::ports::SubmissionStore;
use crate::utils::error::{RcrError, Result};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    next_id: u64,
    submissions: BTreeMap<u64, Submission>,
    catches: BTreeMap<u64, Catch>,
    small_catches: BTreeMap<u64, SmallCatch>,
}

impl Tables {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Process-local submission store.
#[derive(Default)]
pub struct InMemorySubmissionStore {
    tables: RwLock<Tables>,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl SubmissionStore for InMemorySubmissionStore {
    fn insert_submission(
        &self,
        contact_id: &str,
        season: i32,
        activity_id: &str,
    ) -> Result<Submission> {
        let mut tables = self.write();
        if tables
            .submissions
            .values()
            .any(|s| s.contact_id == contact_id && s.season == season)
        {
            return Err(RcrError::validation(
                "submission",
                format!("a submission for {} in {} already exists", contact_id, season),
            ));
        }

        let submission = Submission {
            id: tables.allocate_id(),
            contact_id: contact_id.to_string(),
            season,
            activity_id: activity_id.to_string(),
            status: SubmissionStatus::Incomplete,
        };
        tables.submissions.insert(submission.id, submission.clone());
        Ok(submission)
    }

    fn submission(&self, id: u64) -> Option<Submission> {
        self.read().submissions.get(&id).cloned()
    }

    fn find_submission(&self, contact_id: &str, season: i32) -> Option<Submission> {
        self.read()
            .submissions
            .values()
            .find(|s| s.contact_id == contact_id && s.season == season)
            .cloned()
    }

    fn transition_submission(
        &self,
        id: u64,
        from: SubmissionStatus,
        to: SubmissionStatus,
    ) -> Result<Submission> {
        let mut tables = self.write();
        let submission = tables
            .submissions
            .get_mut(&id)
            .ok_or_else(|| RcrError::NotFoundError {
                message: format!("submission {}", id),
            })?;
        if submission.status != from {
            return Err(RcrError::validation(
                "submission",
                format!("submission {} is {:?}, not {:?}", id, submission.status, from),
            ));
        }
        submission.status = to;
        Ok(submission.clone())
    }

    fn insert_catch(&self, record: Catch) -> Result<u64> {
        let mut tables = self.write();
        let id = tables.allocate_id();
        tables.catches.insert(id, record);
        Ok(id)
    }

    fn insert_small_catch(&self, record: SmallCatch) -> Result<u64> {
        let mut tables = self.write();
        if tables.small_catches.values().any(|existing| {
            existing.submission_id == record.submission_id
                && existing.activity_id == record.activity_id
                && existing.month == record.month
        }) {
            return Err(RcrError::validation(
                "month",
                format!(
                    "small catch for activity {} in month {} already recorded",
                    record.activity_id, record.month
                ),
            ));
        }

        let id = tables.allocate_id();
        tables.small_catches.insert(id, record);
        Ok(id)
    }

    fn catches(&self, submission_id: u64) -> Vec<Catch> {
        self.read()
            .catches
            .values()
            .filter(|c| c.submission_id == submission_id)
            .cloned()
            .collect()
    }

    fn small_catches(&self, submission_id: u64) -> Vec<SmallCatch> {
        self.read()
            .small_catches
            .values()
            .filter(|c| c.submission_id == submission_id)
            .cloned()
            .collect()
    }
}
