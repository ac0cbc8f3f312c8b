//! Round protocol: identifiers, the referee stage machine, and messages.

mod messages;
mod referee;
mod types;

pub use messages::{CommitMessage, RevealMessage};
pub use referee::{RoundRecord, RoundReferee};
pub use types::{RoundId, RoundStage};
