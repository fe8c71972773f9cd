use async_trait::async_trait;

use crate::error::CoreError;
use crate::model::{ProjectId, ToggleOutcome, UserId, Vote};

/// Attempts before a toggle that keeps losing the insert/delete race gives up.
const TOGGLE_ATTEMPTS: usize = 3;

/// Storage operations for vote records and project tallies.
///
/// Implementations must make `try_insert_vote` and `try_remove_vote`
/// conditional on the current existence of the (user, project) record, and
/// `bump_tally` an atomic add. Those two properties are the only
/// serialization points in the system; handlers hold no shared state.
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Insert the vote unless a record for its (user, project) pair already
    /// exists. Returns `false`, writing nothing, when the pair is already
    /// voted.
    async fn try_insert_vote(&self, vote: &Vote) -> Result<bool, CoreError>;

    /// Remove the (user, project) vote record if it exists. Returns `false`
    /// when the pair was not voted.
    async fn try_remove_vote(
        &self,
        user: &UserId,
        project: &ProjectId,
    ) -> Result<bool, CoreError>;

    /// Atomically add `delta` to the project tally and return the new count.
    ///
    /// Decrements are conditional on the stored count covering them, so the
    /// count never drops below zero; a refused decrement returns the current
    /// floored value instead of failing.
    async fn bump_tally(&self, project: &ProjectId, delta: i64) -> Result<u64, CoreError>;

    /// Current tally for a project. Absence of a tally row is not an error
    /// and reads as 0.
    async fn get_tally(&self, project: &ProjectId) -> Result<u64, CoreError>;
}

/// Toggle the (user, project) vote: create the record and bump the tally up
/// if it was absent, delete it and bump the tally down if it was present.
///
/// The conditional insert and delete serialize concurrent toggles for the
/// same pair: exactly one of two racing requests wins each write, and a
/// request that loses both (the pair flipped between its insert and delete
/// attempts) starts over. Exhausting the retry budget yields
/// [`CoreError::Conflict`], which callers surface as a storage failure.
pub async fn toggle_vote(
    store: &dyn VoteStore,
    user: &UserId,
    project: &ProjectId,
    voted_at: i64,
) -> Result<ToggleOutcome, CoreError> {
    let vote = Vote {
        user_id: user.to_string(),
        project_id: project.to_string(),
        voted_at,
    };

    for _ in 0..TOGGLE_ATTEMPTS {
        if store.try_insert_vote(&vote).await? {
            let count = store.bump_tally(project, 1).await?;
            return Ok(ToggleOutcome { voted: true, count });
        }

        if store.try_remove_vote(user, project).await? {
            let count = store.bump_tally(project, -1).await?;
            return Ok(ToggleOutcome {
                voted: false,
                count,
            });
        }

        // Both writes refused: another toggle for this pair landed between
        // our insert and delete attempts. Start over.
    }

    Err(CoreError::Conflict(format!("{user}/{project}")))
}
