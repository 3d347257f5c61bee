//! Member registry repository
//!
//! Members are keyed by name; the on-disk file carries an explicit
//! schema version so a malformed or foreign file is refused on load.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::models::Member;

use super::file_io::{read_json, write_json_atomic};
use super::SCHEMA_VERSION;

/// On-disk shape of the members store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembersFile {
    pub schema_version: u32,
    pub members: Vec<Member>,
}

impl Default for MembersFile {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            members: Vec::new(),
        }
    }
}

/// Repository for member persistence
pub struct MemberRepository {
    path: PathBuf,
    data: RwLock<BTreeMap<String, Member>>,
}

impl MemberRepository {
    /// Create a new member repository backed by the given file
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(BTreeMap::new()),
        }
    }

    /// Load members from disk, validating the schema version
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: MembersFile = read_json(&self.path)?;

        if file_data.schema_version != SCHEMA_VERSION {
            return Err(LedgerError::Schema(format!(
                "members store has schema version {}, expected {}",
                file_data.schema_version, SCHEMA_VERSION
            )));
        }

        let mut data = self.write_guard()?;
        data.clear();
        for member in file_data.members {
            data.insert(member.name.clone(), member);
        }

        Ok(())
    }

    /// Save members to disk (whole-table atomic replace)
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self.read_guard()?;

        let file_data = MembersFile {
            schema_version: SCHEMA_VERSION,
            members: data.values().cloned().collect(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a member by name (case-sensitive)
    pub fn get(&self, name: &str) -> Result<Option<Member>, LedgerError> {
        Ok(self.read_guard()?.get(name).cloned())
    }

    /// Check whether a member name is registered
    pub fn contains(&self, name: &str) -> Result<bool, LedgerError> {
        Ok(self.read_guard()?.contains_key(name))
    }

    /// Get all members, sorted by name
    pub fn get_all(&self) -> Result<Vec<Member>, LedgerError> {
        Ok(self.read_guard()?.values().cloned().collect())
    }

    /// Insert or update a member
    pub fn upsert(&self, member: Member) -> Result<(), LedgerError> {
        self.write_guard()?.insert(member.name.clone(), member);
        Ok(())
    }

    /// Re-key a member under a new name, returning the updated record
    ///
    /// The caller is responsible for re-pointing transactions that
    /// reference the old name.
    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<Member, LedgerError> {
        let mut data = self.write_guard()?;

        if data.contains_key(new_name) {
            return Err(LedgerError::Duplicate {
                entity_type: "Member",
                identifier: new_name.to_string(),
            });
        }

        let mut member = data
            .remove(old_name)
            .ok_or_else(|| LedgerError::member_not_found(old_name))?;
        member.name = new_name.to_string();
        member.updated_at = chrono::Utc::now();
        data.insert(new_name.to_string(), member.clone());

        Ok(member)
    }

    /// Count registered members
    pub fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.read_guard()?.len())
    }

    fn read_guard(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<String, Member>>, LedgerError> {
        self.data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_guard(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<String, Member>>, LedgerError> {
        self.data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, MemberRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("members.json");
        let repo = MemberRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.upsert(Member::new("Alice", Money::from_units(1000))).unwrap();

        let alice = repo.get("Alice").unwrap().unwrap();
        assert_eq!(alice.target.cents(), 100_000);
        assert!(repo.contains("Alice").unwrap());
        assert!(!repo.contains("alice").unwrap());
    }

    #[test]
    fn test_get_all_sorted_by_name() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.upsert(Member::new("Zane", Money::zero())).unwrap();
        repo.upsert(Member::new("Alice", Money::zero())).unwrap();
        repo.upsert(Member::new("Mona", Money::zero())).unwrap();

        let names: Vec<_> = repo.get_all().unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Alice", "Mona", "Zane"]);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.upsert(Member::new("Alice", Money::from_units(1000))).unwrap();
        repo.save().unwrap();

        let repo2 = MemberRepository::new(temp_dir.path().join("members.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.count().unwrap(), 1);
        assert!(repo2.contains("Alice").unwrap());
    }

    #[test]
    fn test_rename() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.upsert(Member::new("Alice", Money::from_units(1000))).unwrap();

        let renamed = repo.rename("Alice", "Alicia").unwrap();
        assert_eq!(renamed.name, "Alicia");
        assert!(!repo.contains("Alice").unwrap());
        assert!(repo.contains("Alicia").unwrap());
    }

    #[test]
    fn test_rename_to_existing_name_rejected() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.upsert(Member::new("Alice", Money::zero())).unwrap();
        repo.upsert(Member::new("Bob", Money::zero())).unwrap();

        let err = repo.rename("Alice", "Bob").unwrap_err();
        assert!(matches!(err, LedgerError::Duplicate { .. }));
    }

    #[test]
    fn test_bad_schema_version_refused() {
        let (temp_dir, repo) = create_test_repo();
        std::fs::write(
            temp_dir.path().join("members.json"),
            r#"{"schema_version": 99, "members": []}"#,
        )
        .unwrap();

        let err = repo.load().unwrap_err();
        assert!(matches!(err, LedgerError::Schema(_)));
    }
}
