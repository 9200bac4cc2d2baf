//! Domain error taxonomy.
//!
//! Every operation returns these as values; nothing is swallowed and nothing
//! panics. The excluded HTTP layer maps the variants to user-facing messages
//! and status codes. [`QuestCoreError::Store`] wrapping
//! [`StoreError::Unavailable`](crate::graph::StoreError::Unavailable) is the
//! one class a caller may reasonably retry; the engine itself never does.

use std::fmt;
use thiserror::Error;

use crate::credentials::CredentialError;
use crate::graph::StoreError;
use crate::quest::QuestStatus;

/// The entity kinds named in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Usergroup,
    Quest,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::User => "user",
            EntityKind::Usergroup => "usergroup",
            EntityKind::Quest => "quest",
        };
        f.write_str(name)
    }
}

/// Errors from quest engine operations.
#[derive(Debug, Error)]
pub enum QuestCoreError {
    #[error("{kind} {name:?} already exists")]
    AlreadyExists { kind: EntityKind, name: String },

    #[error("{kind} {name:?} not found")]
    NotFound { kind: EntityKind, name: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("login failed")]
    Unauthorized,

    #[error("user is already eligible for this quest")]
    AlreadyEligible,

    #[error("the quest creator cannot complete their own quest")]
    CreatorIneligible,

    #[error("user is not eligible to complete this quest")]
    NotEligible,

    #[error("cannot {action} a quest in the {from} state")]
    InvalidStateTransition {
        from: QuestStatus,
        action: &'static str,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),
}

impl QuestCoreError {
    /// True for the "already done" outcomes that idempotent callers treat as
    /// expected rather than exceptional.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            QuestCoreError::AlreadyExists { .. } | QuestCoreError::AlreadyEligible
        )
    }
}
