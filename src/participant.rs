//! Per-participant state owned by the table.

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::hand::{hand_value, is_bust};

/// Where a participant is in the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Has not placed a wager this round.
    AwaitingWager,
    /// Wager placed, waiting for their turn.
    AwaitingTurn,
    /// It is this participant's turn.
    ActingTurn,
    /// Finished their turn without busting.
    Standing,
    /// Went over 21.
    Busted,
}

/// A seated participant.
#[derive(Debug, Clone)]
pub struct Participant {
    name: String,
    balance: usize,
    wager: usize,
    hand: Vec<Card>,
    status: Status,
    priority: u32,
    last_seen: u64,
    connected: bool,
}

impl Participant {
    /// Creates a participant with the given starting balance and election priority.
    #[must_use]
    pub const fn new(name: String, balance: usize, priority: u32, now_ms: u64) -> Self {
        Self {
            name,
            balance,
            wager: 0,
            hand: Vec::new(),
            status: Status::AwaitingWager,
            priority,
            last_seen: now_ms,
            connected: true,
        }
    }

    /// Returns the participant's unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the balance not currently escrowed.
    #[must_use]
    pub const fn balance(&self) -> usize {
        self.balance
    }

    /// Returns the wager escrowed this round.
    #[must_use]
    pub const fn wager(&self) -> usize {
        self.wager
    }

    /// Returns the cards in hand.
    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Returns the election priority assigned at join.
    #[must_use]
    pub const fn priority(&self) -> u32 {
        self.priority
    }

    /// Returns whether the participant has been heard from recently.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connected
    }

    /// Returns the coordinator time of the last heartbeat or join.
    #[must_use]
    pub const fn last_seen(&self) -> u64 {
        self.last_seen
    }

    /// Returns the value of the hand.
    #[must_use]
    pub fn value(&self) -> u8 {
        hand_value(&self.hand)
    }

    /// Moves `amount` from the balance into escrow.
    ///
    /// Returns `false`, leaving everything untouched, unless `0 < amount <= balance`.
    pub(crate) const fn escrow(&mut self, amount: usize) -> bool {
        if amount == 0 || amount > self.balance {
            return false;
        }
        self.balance -= amount;
        self.wager = amount;
        self.status = Status::AwaitingTurn;
        true
    }

    /// Credits winnings or a returned wager.
    pub(crate) const fn credit(&mut self, amount: usize) {
        self.balance += amount;
    }

    /// Adds a card and returns whether the hand is now bust.
    pub(crate) fn receive(&mut self, card: Card) -> bool {
        self.hand.push(card);
        is_bust(&self.hand)
    }

    pub(crate) const fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub(crate) const fn touch(&mut self, now_ms: u64) {
        self.last_seen = now_ms;
        self.connected = true;
    }

    pub(crate) const fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Clears hand and wager for a new round, returning the cards for discard.
    pub(crate) fn reset(&mut self) -> Vec<Card> {
        self.wager = 0;
        self.status = Status::AwaitingWager;
        core::mem::take(&mut self.hand)
    }
}
