use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

const MAX_ID_LENGTH: usize = 256;

fn validate_id(s: &str) -> Result<(), IdError> {
    if s.is_empty() {
        return Err(IdError::Empty);
    }
    if s.len() > MAX_ID_LENGTH {
        return Err(IdError::TooLong(s.len()));
    }
    Ok(())
}

/// A validated project identifier.
///
/// Project ids are caller-supplied and opaque; any non-empty string up to
/// 256 bytes is accepted, with no catalog to validate against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(String);

impl ProjectId {
    /// Create a new `ProjectId` after validation.
    pub fn new(s: impl Into<String>) -> Result<Self, IdError> {
        let s = s.into();
        validate_id(&s)?;
        Ok(Self(s))
    }
}

/// A validated user identifier: the opaque, client-generated id a browser
/// persists locally and reuses across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a new `UserId` after validation.
    pub fn new(s: impl Into<String>) -> Result<Self, IdError> {
        let s = s.into();
        validate_id(&s)?;
        Ok(Self(s))
    }
}

macro_rules! id_conversions {
    ($ty:ident) => {
        impl TryFrom<String> for $ty {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$ty> for String {
            fn from(id: $ty) -> Self {
                id.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

id_conversions!(ProjectId);
id_conversions!(UserId);

/// Errors that can occur when validating an identifier.
#[derive(Debug, Clone, Error)]
pub enum IdError {
    #[error("identifier must not be empty")]
    Empty,

    #[error("identifier length {0} exceeds maximum of {MAX_ID_LENGTH}")]
    TooLong(usize),
}

// ---------------------------------------------------------------------------
// Vote
// ---------------------------------------------------------------------------

/// A vote record stored in DynamoDB, one per (user, project) pair.
///
/// Existence of the record means "currently voted"; absence means "not
/// voted". A repeat toggle from the same user deletes the record rather
/// than incrementing anything. Vote records carry no TTL and persist until
/// toggled off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    /// Opaque user identifier (validated as a UserId at API boundaries).
    pub user_id: String,

    /// Project identifier (validated as a ProjectId at API boundaries).
    pub project_id: String,

    /// Unix epoch seconds of the most recent toggle-on.
    pub voted_at: i64,
}

// ---------------------------------------------------------------------------
// ProjectTally
// ---------------------------------------------------------------------------

/// The aggregate count of currently-active votes for a project.
///
/// Maintained by atomic counter updates alongside each Vote creation and
/// deletion; never allowed below zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectTally {
    pub project_id: String,
    pub count: u64,
}

// ---------------------------------------------------------------------------
// ToggleOutcome (derived, not stored)
// ---------------------------------------------------------------------------

/// The result of one toggle: whether the user's vote is now active, and the
/// project's tally after the toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    pub voted: bool,
    pub count: u64,
}
