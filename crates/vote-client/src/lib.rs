pub mod cache;
pub mod errors;
pub mod identity;
pub mod panel;
pub mod transport;

pub use cache::VoteCache;
pub use errors::ClientError;
pub use identity::ClientIdentity;
pub use panel::{ButtonState, ToggleEvent, VotePanel};
pub use transport::{HttpTransport, TallyReply, ToggleReply, VoteTransport};
