use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::errors::ClientError;

/// Locally persisted map of the user's believed vote state per project.
///
/// Advisory only: merged into button state before the server has answered,
/// and overwritten by server truth on every toggle response. Server truth
/// always wins.
#[derive(Debug)]
pub struct VoteCache {
    path: PathBuf,
    entries: HashMap<String, bool>,
}

impl VoteCache {
    /// Load the cache. A missing file reads as empty; an unparseable file
    /// is discarded rather than failing startup.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("vote cache unreadable, starting empty: {e}");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, entries })
    }

    /// The believed vote state for a project. Unknown projects read as
    /// not voted.
    pub fn voted_for(&self, project: &str) -> bool {
        self.entries.get(project).copied().unwrap_or(false)
    }

    /// Record server truth for a project and persist.
    pub fn set(&mut self, project: &str, voted: bool) -> Result<(), ClientError> {
        self.entries.insert(project.to_string(), voted);
        self.save()
    }

    fn save(&self) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("vote-client-cache-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn missing_file_reads_empty() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path);

        let cache = VoteCache::load(&path).unwrap();
        assert!(!cache.voted_for("p1"));
    }

    #[test]
    fn set_persists_across_loads() {
        let path = temp_path("roundtrip");
        let _ = fs::remove_file(&path);

        let mut cache = VoteCache::load(&path).unwrap();
        cache.set("p1", true).unwrap();
        cache.set("p2", false).unwrap();

        let reloaded = VoteCache::load(&path).unwrap();
        assert!(reloaded.voted_for("p1"));
        assert!(!reloaded.voted_for("p2"));
        assert!(!reloaded.voted_for("p3"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_reads_empty() {
        let path = temp_path("corrupt");
        fs::write(&path, "{not json").unwrap();

        let cache = VoteCache::load(&path).unwrap();
        assert!(!cache.voted_for("p1"));

        let _ = fs::remove_file(&path);
    }
}
