//! A coordinator for shared, turn-based blackjack sessions.
//!
//! One authoritative [`Session`] serialises every participant's wagers and
//! turn actions against a single [`Table`], forces a stand when a participant
//! lets their turn run out, and settles each round against the house. Around
//! it, participants elect a dealer by relaying an [`ElectionToken`] around a
//! priority ring, and estimate the coordinator's clock to show a consistent
//! countdown.
//!
//! # Example
//!
//! ```no_run
//! use bjcoord::{Session, SessionOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), bjcoord::SessionError> {
//! let session = Session::start(SessionOptions::default(), 42)?;
//! println!("{}", session.join("alice"));
//! session.place_wager("alice", 50);
//! let snapshot = session.snapshot();
//! assert_eq!(snapshot.current_turn.as_deref(), Some("alice"));
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod card;
pub mod client;
pub mod clock;
pub mod election;
pub mod error;
pub mod hand;
pub mod input;
pub mod options;
pub mod participant;
pub mod result;
pub mod service;
pub mod session;
pub mod shoe;
pub mod snapshot;
mod sync;
pub mod table;

// Re-export main types
pub use card::{Card, DECK_SIZE, Suit, VisibleCard};
pub use client::{Client, run_heartbeat};
pub use clock::{CoordinatorClock, SyncedClock, estimate_offset};
pub use election::{ElectionStep, ElectionToken, Ring};
pub use error::{
    ClientError, ElectionError, JoinError, SessionError, TransportError, TurnError, WagerError,
};
pub use hand::{DealerHand, hand_value};
pub use input::{TurnAction, parse_wager};
pub use options::{RejoinPolicy, SessionOptions};
pub use participant::{Participant, Status};
pub use result::{Outcome, ParticipantResult, RoundResult};
pub use service::SessionService;
pub use session::Session;
pub use shoe::Shoe;
pub use snapshot::{PlayerView, Snapshot};
pub use table::{Effect, MAX_SEATS, Phase, Table};
