//! Member service
//!
//! Registry management: add with duplicate/empty checks, target edits,
//! and renames that re-point every historical transaction so no orphan
//! references can be observed.

use crate::audit::{generate_diff, AuditAction, AuditRecord};
use crate::auth::AdminToken;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Member, Money};
use crate::storage::Storage;

/// Service for member registry management
pub struct MemberService<'a> {
    storage: &'a Storage,
}

/// Field-wise patch for an existing member
#[derive(Debug, Clone, Default)]
pub struct MemberPatch {
    /// New name for the member; historical transactions follow
    pub rename: Option<String>,
    /// New savings target
    pub target: Option<Money>,
}

impl<'a> MemberService<'a> {
    /// Create a new member service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a new member
    pub fn add(
        &self,
        _token: &AdminToken,
        name: impl Into<String>,
        target: Money,
    ) -> LedgerResult<Member> {
        let name: String = name.into();
        let member = Member::new(name.trim(), target);

        member
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        if self.storage.members.contains(&member.name)? {
            return Err(LedgerError::Duplicate {
                entity_type: "Member",
                identifier: member.name,
            });
        }

        self.storage.members.upsert(member.clone())?;
        self.storage.members.save()?;

        self.storage.record_audit(AuditRecord::new(
            AuditAction::MemberAdded,
            &member.name,
            format!("member registered with target {}", member.target),
        ));

        tracing::debug!(name = %member.name, "member added");
        Ok(member)
    }

    /// Get a member by name
    pub fn get(&self, name: &str) -> LedgerResult<Option<Member>> {
        self.storage.members.get(name)
    }

    /// List all members, sorted by name
    pub fn list(&self) -> LedgerResult<Vec<Member>> {
        self.storage.members.get_all()
    }

    /// Apply a field-wise patch to a member
    ///
    /// A rename re-points all of the member's transactions to the new
    /// name in the same operation.
    pub fn update(
        &self,
        _token: &AdminToken,
        name: &str,
        patch: MemberPatch,
    ) -> LedgerResult<Member> {
        let before = self
            .storage
            .members
            .get(name)?
            .ok_or_else(|| LedgerError::member_not_found(name))?;

        let mut member = before.clone();

        if let Some(target) = patch.target {
            if target.is_negative() {
                return Err(LedgerError::Validation(
                    "Savings target may not be negative".into(),
                ));
            }
            member.set_target(target);
            self.storage.members.upsert(member.clone())?;
        }

        if let Some(new_name) = patch.rename.as_deref() {
            let new_name = new_name.trim();
            if new_name.is_empty() {
                return Err(LedgerError::Validation("Member name may not be empty".into()));
            }
            if new_name != name {
                member = self.storage.members.rename(name, new_name)?;

                // Historical rows follow the member
                for mut txn in self.storage.transactions.get_by_member(name)? {
                    txn.member = new_name.to_string();
                    txn.updated_at = chrono::Utc::now();
                    self.storage.transactions.upsert(txn)?;
                }
                self.storage.transactions.save()?;
            }
        }

        self.storage.members.save()?;

        let diff = generate_diff(
            &serde_json::to_value(&before)?,
            &serde_json::to_value(&member)?,
        );
        self.storage.record_audit(AuditRecord::with_diff(
            AuditAction::MemberUpdated,
            &member.name,
            "member updated".to_string(),
            diff,
        ));

        Ok(member)
    }

    /// Count registered members
    pub fn count(&self) -> LedgerResult<usize> {
        self.storage.members.count()
    }
}
