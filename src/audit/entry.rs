//! Audit record structures
//!
//! One record per mutating operation. Records are observational only;
//! nothing in the engine ever consults them for authorization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The mutating action an audit record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    TransactionAdded,
    TransactionUpdated,
    TransactionDeleted,
    MemberAdded,
    MemberUpdated,
    Restore,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TransactionAdded => write!(f, "transaction_added"),
            Self::TransactionUpdated => write!(f, "transaction_updated"),
            Self::TransactionDeleted => write!(f, "transaction_deleted"),
            Self::MemberAdded => write!(f, "member_added"),
            Self::MemberUpdated => write!(f, "member_updated"),
            Self::Restore => write!(f, "restore"),
        }
    }
}

/// A single append-only audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// What happened
    pub action: AuditAction,

    /// Id or key of the affected entity (transaction id, member name,
    /// snapshot filename)
    pub entity_id: String,

    /// Human-readable description of the operation
    pub details: String,

    /// Field-level change summary for updates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl AuditRecord {
    /// Create a new record
    pub fn new(
        action: AuditAction,
        entity_id: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            action,
            entity_id: entity_id.into(),
            details: details.into(),
            diff: None,
        }
    }

    /// Create a record carrying a change summary
    pub fn with_diff(
        action: AuditAction,
        entity_id: impl Into<String>,
        details: impl Into<String>,
        diff: Option<String>,
    ) -> Self {
        Self {
            diff,
            ..Self::new(action, entity_id, details)
        }
    }

    /// Format the record for terminal output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {}: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.action,
            self.entity_id,
            self.details
        );

        if let Some(diff) = &self.diff {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_serde_names() {
        let json = serde_json::to_string(&AuditAction::TransactionAdded).unwrap();
        assert_eq!(json, "\"transaction_added\"");
        let json = serde_json::to_string(&AuditAction::Restore).unwrap();
        assert_eq!(json, "\"restore\"");
    }

    #[test]
    fn test_action_display_matches_serde() {
        assert_eq!(AuditAction::TransactionAdded.to_string(), "transaction_added");
        assert_eq!(AuditAction::MemberUpdated.to_string(), "member_updated");
        assert_eq!(AuditAction::Restore.to_string(), "restore");
    }

    #[test]
    fn test_new_record() {
        let record = AuditRecord::new(
            AuditAction::TransactionAdded,
            "txn-12345678",
            "Alice Deposit 500.00 on 2024-01-05",
        );

        assert_eq!(record.action, AuditAction::TransactionAdded);
        assert_eq!(record.entity_id, "txn-12345678");
        assert!(record.diff.is_none());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let record = AuditRecord::with_diff(
            AuditAction::MemberUpdated,
            "Alice",
            "member updated",
            Some("target: 0.00 -> 1000.00".to_string()),
        );

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: AuditRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.action, AuditAction::MemberUpdated);
        assert_eq!(deserialized.diff.as_deref(), Some("target: 0.00 -> 1000.00"));
    }

    #[test]
    fn test_human_readable_format() {
        let record = AuditRecord::new(AuditAction::Restore, "transactions-20240101-000000.json", "store restored");
        let formatted = record.format_human_readable();
        assert!(formatted.contains("restore"));
        assert!(formatted.contains("transactions-20240101-000000.json"));
    }
}
