pub mod dynamo;
pub mod error;
pub mod mem;
pub mod model;
pub mod store;

pub use dynamo::DynamoVoteStore;
pub use error::CoreError;
pub use mem::MemVoteStore;
pub use model::{IdError, ProjectId, ProjectTally, ToggleOutcome, UserId, Vote};
pub use store::{VoteStore, toggle_vote};
