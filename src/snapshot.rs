//! The read-only view of a session handed to participants.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::card::{Card, VisibleCard};
use crate::election::ElectionToken;
use crate::hand::{hand_value, visible_value};
use crate::participant::Status;
use crate::table::Phase;

/// What every participant may see about one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Cards in hand.
    pub hand: Vec<Card>,
    /// Balance outside escrow.
    pub balance: usize,
    /// Escrowed wager.
    pub wager: usize,
    /// Round status.
    pub status: Status,
    /// Whether the participant is heartbeating.
    pub connected: bool,
}

impl PlayerView {
    /// Value of the hand.
    #[must_use]
    pub fn value(&self) -> u8 {
        hand_value(&self.hand)
    }
}

/// An immutable, point-in-time copy of a session.
///
/// The deck is never included, and the dealer's hole card stays hidden until
/// the dealer starts drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Round phase.
    pub phase: Phase,
    /// Every seated participant by name.
    pub participants: BTreeMap<String, PlayerView>,
    /// The dealer's hand as far as it is visible.
    pub dealer_hand: Vec<VisibleCard>,
    /// Human-readable narration of the latest events.
    pub message: String,
    /// Whose turn it is.
    pub current_turn: Option<String>,
    /// Coordinator time (ms) at which the current turn is forced to stand.
    pub turn_deadline: Option<u64>,
    /// The designated dealer.
    pub dealer: Option<String>,
    /// The election token in flight.
    pub election: Option<ElectionToken>,
    /// Election priority of every participant.
    pub priorities: BTreeMap<String, u32>,
    /// Coordinator time (ms) when this snapshot was taken.
    pub coordinator_time: u64,
}

impl Snapshot {
    /// Value of the dealer's face-up cards.
    #[must_use]
    pub fn dealer_value(&self) -> u8 {
        visible_value(&self.dealer_hand)
    }

    /// Looks up a participant.
    #[must_use]
    pub fn participant(&self, name: &str) -> Option<&PlayerView> {
        self.participants.get(name)
    }

    /// Returns a participant's status.
    #[must_use]
    pub fn status_of(&self, name: &str) -> Option<Status> {
        self.participants.get(name).map(|view| view.status)
    }

    /// Returns whether it is `name`'s turn.
    #[must_use]
    pub fn is_turn_of(&self, name: &str) -> bool {
        self.current_turn.as_deref() == Some(name)
    }

    /// Returns the participant holding `priority`.
    #[must_use]
    pub fn holder_of(&self, priority: u32) -> Option<&str> {
        self.priorities
            .iter()
            .find(|&(_, &p)| p == priority)
            .map(|(name, _)| name.as_str())
    }
}
