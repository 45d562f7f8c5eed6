use crate::utils::error::{RcrError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

const BUILTIN_DIRECTORY: &str = include_str!("../../data/crm_directory.csv");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CrmDirectoryEntry {
    #[serde(rename = "permission")]
    pub permission_number: String,
    pub contact_id: String,
    pub postcode: String,
}

/// Read-only licence directory backing the contract simulator.
///
/// Built once at startup and shared behind an `Arc`; there is no way to
/// mutate it afterwards.
#[derive(Debug, Clone, Default)]
pub struct CrmDirectory {
    entries: HashMap<String, CrmDirectoryEntry>,
}

impl CrmDirectory {
    /// The seed directory compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_reader(BUILTIN_DIRECTORY.as_bytes())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(&path)?;
        let directory = Self::from_reader(file)?;
        tracing::info!(
            "Loaded {} directory entries from {}",
            directory.len(),
            path.as_ref().display()
        );
        Ok(directory)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = HashMap::new();
        for row in csv_reader.deserialize::<CrmDirectoryEntry>() {
            let entry = row?;
            if entries.contains_key(&entry.permission_number) {
                return Err(RcrError::ConfigError {
                    message: format!(
                        "Duplicate permission number in directory: {}",
                        entry.permission_number
                    ),
                });
            }
            entries.insert(entry.permission_number.clone(), entry);
        }

        Ok(Self { entries })
    }

    /// Exact-match lookup by permission number.
    pub fn get(&self, permission_number: &str) -> Option<&CrmDirectoryEntry> {
        self.entries.get(permission_number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_directory_contains_seeded_licences() {
        let directory = CrmDirectory::builtin().unwrap();

        let entry = directory.get("B7A718").unwrap();
        assert_eq!(entry.contact_id, "contact-identifier-718");
        assert_eq!(entry.postcode, "WA4 8HT");
        assert!(directory.get("b7a718").is_none());
        assert!(directory.get("notfound").is_none());
    }

    #[test]
    fn test_directory_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "permission,contact_id,postcode").unwrap();
        writeln!(temp_file, "ZZ9001, contact-identifier-9001 , SW1A 1AA").unwrap();

        let directory = CrmDirectory::from_file(temp_file.path()).unwrap();
        assert_eq!(directory.len(), 1);
        assert_eq!(
            directory.get("ZZ9001").unwrap().contact_id,
            "contact-identifier-9001"
        );
    }

    #[test]
    fn test_duplicate_permission_numbers_are_rejected() {
        let csv = "permission,contact_id,postcode\nA1,contact-identifier-1,X\nA1,contact-identifier-2,Y\n";
        assert!(matches!(
            CrmDirectory::from_reader(csv.as_bytes()),
            Err(RcrError::ConfigError { .. })
        ));
    }
}
