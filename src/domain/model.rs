use crate::core::mass::CatchMass;
use crate::utils::error::{RcrError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub postcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Licence {
    pub licence_number: String,
    pub contact: Contact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub roles: Vec<String>,
}

impl Identity {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Incomplete,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: u64,
    pub contact_id: String,
    pub season: i32,
    /// CRM activity opened for this return.
    pub activity_id: String,
    pub status: SubmissionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catch {
    pub submission_id: u64,
    /// The angler's fishing activity (a river fished) within the return.
    /// A caller-assigned local key, unrelated to the CRM activity id.
    pub activity_id: u64,
    pub date_caught: NaiveDate,
    pub species: String,
    pub method: String,
    pub mass: CatchMass,
    pub released: bool,
    #[serde(default)]
    pub reporting_exclude: bool,
}

impl Validate for Catch {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("species", &self.species)
            .map_err(|_| RcrError::validation("species", "species is required"))?;
        validate_non_empty_string("method", &self.method)
            .map_err(|_| RcrError::validation("method", "method is required"))?;
        if self.date_caught > Local::now().date_naive() {
            return Err(RcrError::validation(
                "dateCaught",
                "date caught cannot be in the future",
            ));
        }
        self.mass.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmallCatchCount {
    pub method: String,
    pub count: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmallCatch {
    pub submission_id: u64,
    /// Local fishing activity key, as on [`Catch::activity_id`].
    pub activity_id: u64,
    /// Calendar month, 1 to 12.
    pub month: u32,
    pub counts: Vec<SmallCatchCount>,
    #[serde(default)]
    pub released: Option<u16>,
}

impl SmallCatch {
    pub fn total_caught(&self) -> u32 {
        self.counts.iter().map(|c| u32::from(c.count)).sum()
    }
}

impl Validate for SmallCatch {
    fn validate(&self) -> Result<()> {
        validate_range("month", self.month, 1, 12)?;

        if self.counts.is_empty() {
            return Err(RcrError::validation("counts", "at least one count is required"));
        }

        let mut methods = HashSet::new();
        for count in &self.counts {
            if count.count == 0 {
                return Err(RcrError::validation(
                    "counts",
                    format!("count for method '{}' must be positive", count.method),
                ));
            }
            if !methods.insert(count.method.as_str()) {
                return Err(RcrError::validation(
                    "counts",
                    format!("method '{}' appears more than once", count.method),
                ));
            }
        }

        if let Some(released) = self.released {
            if u32::from(released) > self.total_caught() {
                return Err(RcrError::validation(
                    "released",
                    "cannot release more fish than were caught",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mass::MeasurementType;
    use rust_decimal::Decimal;

    fn small_catch(counts: &[(&str, u16)], released: Option<u16>) -> SmallCatch {
        SmallCatch {
            submission_id: 1,
            activity_id: 1,
            month: 6,
            counts: counts
                .iter()
                .map(|(method, count)| SmallCatchCount {
                    method: method.to_string(),
                    count: *count,
                })
                .collect(),
            released,
        }
    }

    #[test]
    fn test_small_catch_validation() {
        assert!(small_catch(&[("Fly", 3), ("Bait", 2)], Some(5)).validate().is_ok());
        assert!(small_catch(&[("Fly", 3)], Some(4)).validate().is_err());
        assert!(small_catch(&[("Fly", 3), ("Fly", 1)], None).validate().is_err());
        assert!(small_catch(&[("Fly", 0)], None).validate().is_err());
        assert!(small_catch(&[], None).validate().is_err());

        let mut bad_month = small_catch(&[("Fly", 1)], None);
        bad_month.month = 0;
        assert!(bad_month.validate().is_err());
    }

    #[test]
    fn test_catch_requires_typed_mass() {
        let mut record = Catch {
            submission_id: 1,
            activity_id: 1,
            date_caught: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            species: "Salmon".to_string(),
            method: "Fly".to_string(),
            mass: CatchMass::default(),
            released: false,
            reporting_exclude: false,
        };
        assert!(record.validate().is_err());

        record.mass = CatchMass::new(MeasurementType::Imperial, Decimal::from(120));
        assert!(record.validate().is_ok());

        record.species = "  ".to_string();
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_identity_roles() {
        let identity = Identity {
            username: "admin@example.com".to_string(),
            roles: vec!["RcrAdminUser".to_string()],
        };
        assert!(identity.has_role("RcrAdminUser"));
        assert!(!identity.has_role("RcrFmtUser"));
    }
}
