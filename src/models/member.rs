//! Member model
//!
//! A member is a participant in the household fund, identified by a
//! unique name and carrying a savings target. Members are never
//! hard-deleted; the transaction log may reference them indefinitely.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// A household fund member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Unique name (case-sensitive key into the registry)
    pub name: String,

    /// Savings target; zero means no target set
    pub target: Money,

    /// When the member was registered
    pub created_at: DateTime<Utc>,

    /// When the member was last modified
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Create a new member
    pub fn new(name: impl Into<String>, target: Money) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            target,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the member record
    pub fn validate(&self) -> Result<(), MemberValidationError> {
        if self.name.trim().is_empty() {
            return Err(MemberValidationError::EmptyName);
        }
        if self.target.is_negative() {
            return Err(MemberValidationError::NegativeTarget(self.target));
        }
        Ok(())
    }

    /// Update the savings target
    pub fn set_target(&mut self, target: Money) {
        self.target = target;
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (target {})", self.name, self.target)
    }
}

/// Validation errors for members
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValidationError {
    EmptyName,
    NegativeTarget(Money),
}

impl fmt::Display for MemberValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Member name may not be empty"),
            Self::NegativeTarget(t) => write!(f, "Savings target may not be negative ({})", t),
        }
    }
}

impl std::error::Error for MemberValidationError {}
