use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::model::{ProjectId, UserId, Vote};
use crate::store::VoteStore;

/// In-process [`VoteStore`] with the same observable semantics as the
/// DynamoDB implementation. Backs the API integration tests and local runs
/// without AWS credentials.
#[derive(Default)]
pub struct MemVoteStore {
    votes: Mutex<HashMap<(String, String), i64>>,
    tallies: Mutex<HashMap<String, u64>>,
}

impl MemVoteStore {
    fn key(user: &str, project: &str) -> (String, String) {
        (user.to_string(), project.to_string())
    }
}

#[async_trait]
impl VoteStore for MemVoteStore {
    async fn try_insert_vote(&self, vote: &Vote) -> Result<bool, CoreError> {
        let mut votes = self.votes.lock().expect("vote map lock poisoned");
        let key = Self::key(&vote.user_id, &vote.project_id);
        if votes.contains_key(&key) {
            return Ok(false);
        }
        votes.insert(key, vote.voted_at);
        Ok(true)
    }

    async fn try_remove_vote(
        &self,
        user: &UserId,
        project: &ProjectId,
    ) -> Result<bool, CoreError> {
        let mut votes = self.votes.lock().expect("vote map lock poisoned");
        Ok(votes.remove(&Self::key(user.as_ref(), project.as_ref())).is_some())
    }

    async fn bump_tally(&self, project: &ProjectId, delta: i64) -> Result<u64, CoreError> {
        let mut tallies = self.tallies.lock().expect("tally map lock poisoned");
        let count = tallies.entry(project.to_string()).or_insert(0);
        *count = if delta >= 0 {
            count.saturating_add(delta as u64)
        } else {
            count.saturating_sub(delta.unsigned_abs())
        };
        Ok(*count)
    }

    async fn get_tally(&self, project: &ProjectId) -> Result<u64, CoreError> {
        let tallies = self.tallies.lock().expect("tally map lock poisoned");
        Ok(tallies.get(project.as_ref()).copied().unwrap_or(0))
    }
}
