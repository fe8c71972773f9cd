use std::sync::Arc;

use vote_core::VoteStore;

use crate::ranking::RankingClient;

/// Shared application state passed to all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Vote and tally storage.
    pub store: Arc<dyn VoteStore>,
    /// Hall-of-fame collaborator notified on new votes, when configured.
    pub ranking: Option<RankingClient>,
}
