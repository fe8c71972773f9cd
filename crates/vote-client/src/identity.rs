use std::fmt;
use std::fs;
use std::path::Path;

use rand::Rng;

use crate::errors::ClientError;

/// The opaque per-client user identifier, generated once and reused.
///
/// Resolved explicitly at startup and threaded through every call; nothing
/// reads it from a hidden global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    /// Load the persisted identity, or generate one and persist it.
    ///
    /// Generated ids are 32 random bytes, hex-encoded. An unreadable or
    /// empty identity file is replaced with a fresh id.
    pub fn load_or_generate(path: &Path) -> Result<Self, ClientError> {
        if let Ok(existing) = fs::read_to_string(path) {
            let trimmed = existing.trim();
            if !trimmed.is_empty() {
                return Ok(Self(trimmed.to_string()));
            }
        }

        let random_bytes: [u8; 32] = rand::rng().random();
        let id: String = random_bytes.iter().map(|b| format!("{b:02x}")).collect();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &id)?;

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
