//! The authoritative session state machine.
//!
//! [`Table`] owns every piece of mutable session state: the deck, the dealer's
//! hand, the turn order, and each participant's balance, wager, and hand.
//! It is a plain synchronous value. Serialising access to it, and running the
//! timers it asks for, is the job of [`crate::Session`].

use std::collections::BTreeMap;

use crate::card::Card;
use crate::election::{ElectionToken, Ring};
use crate::error::JoinError;
use crate::hand::DealerHand;
use crate::options::{RejoinPolicy, SessionOptions};
use crate::participant::{Participant, Status};
use crate::result::RoundResult;
use crate::shoe::Shoe;
use crate::snapshot::{PlayerView, Snapshot};

mod dealer;
mod election;
pub mod state;
mod turn;
mod wager;

pub use state::{Effect, Phase};

/// Most participants a table seats.
///
/// A hand stops drawing once it is past 21, so its cards add up to at most 31
/// counting aces as 1, and the dealer's to at most 26. Ten such hands plus the
/// dealer's cannot hold all 52 cards (worth 340), so a draw always finds a
/// card in the deck or the discard pile.
pub const MAX_SEATS: usize = 10;

const NEW_ROUND_MESSAGE: &str = "New round started. Please place your bets!";

/// The coordinator's view of one blackjack session.
pub struct Table {
    options: SessionOptions,
    phase: Phase,
    shoe: Shoe,
    participants: BTreeMap<String, Participant>,
    dealer_hand: DealerHand,
    /// Participants in the order their wagers were accepted.
    wager_order: Vec<String>,
    turn_order: Vec<String>,
    current_turn: usize,
    turn_deadline: Option<u64>,
    turn_generation: u64,
    round: u64,
    message: String,
    dealer: Option<String>,
    election: Option<ElectionToken>,
    next_priority: u32,
    last_result: Option<RoundResult>,
    effects: Vec<Effect>,
}

impl Table {
    /// Creates an empty table in the wagering phase with a shuffled deck.
    #[must_use]
    pub fn new(options: SessionOptions, seed: u64) -> Self {
        Self {
            options,
            phase: Phase::Wagering,
            shoe: Shoe::new(seed),
            participants: BTreeMap::new(),
            dealer_hand: DealerHand::new(),
            wager_order: Vec::new(),
            turn_order: Vec::new(),
            current_turn: 0,
            turn_deadline: None,
            turn_generation: 0,
            round: 0,
            message: NEW_ROUND_MESSAGE.to_owned(),
            dealer: None,
            election: None,
            next_priority: 1,
            last_result: None,
            effects: Vec::new(),
        }
    }

    /// Seats a participant, or handles a rejoin per [`RejoinPolicy`].
    ///
    /// Returns the welcome text.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, already seated while rejoining
    /// is rejected, or new while all [`MAX_SEATS`] are taken.
    pub fn join(&mut self, name: &str, now: u64) -> Result<String, JoinError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(JoinError::EmptyName);
        }

        if let Some(existing) = self.participants.get_mut(name) {
            return match self.options.rejoin {
                RejoinPolicy::Reconnect => {
                    existing.touch(now);
                    log::info!("{name} reconnected");
                    Ok(format!("Welcome back to Blackjack, {name}!"))
                }
                RejoinPolicy::Reject => Err(JoinError::NameTaken),
            };
        }

        if self.participants.len() >= MAX_SEATS {
            return Err(JoinError::TableFull);
        }

        let priority = self.next_priority;
        self.next_priority += 1;
        self.participants.insert(
            name.to_owned(),
            Participant::new(
                name.to_owned(),
                self.options.starting_balance,
                priority,
                now,
            ),
        );
        log::info!("{name} joined with priority {priority}");
        Ok(format!("Welcome to Blackjack, {name}!"))
    }

    /// Records that a participant is alive.
    ///
    /// Returns `false` for an unknown name.
    pub fn heartbeat(&mut self, name: &str, now: u64) -> bool {
        self.participants.get_mut(name).is_some_and(|participant| {
            participant.touch(now);
            true
        })
    }

    /// Marks silent participants disconnected and reacts to it.
    ///
    /// A disconnected dealer loses the designation. A pending election whose
    /// originator or next recipient disconnected is abandoned. Disconnected
    /// participants are no longer waited for in the wagering phase. With
    /// [`SessionOptions::auto_election`] set, an election is started if no
    /// dealer is designated.
    pub fn sweep(&mut self, now: u64) {
        let timeout = self.options.heartbeat_timeout.as_millis() as u64;
        for participant in self.participants.values_mut() {
            if participant.is_connected() && now.saturating_sub(participant.last_seen()) > timeout {
                log::warn!("{} stopped heartbeating", participant.name());
                participant.disconnect();
            }
        }

        if let Some(dealer) = &self.dealer {
            if !self.participants.get(dealer).is_some_and(Participant::is_connected) {
                log::warn!("dealer {dealer} is gone, dealership is open");
                self.message = format!("Dealer {dealer} disconnected.");
                self.dealer = None;
            }
        }

        self.abandon_orphaned_election();

        if self.phase == Phase::Wagering {
            self.try_deal(now);
        }

        if self.options.auto_election && self.dealer.is_none() && self.election.is_none() {
            if let Err(err) = self.trigger_election() {
                log::debug!("no election started: {err}");
            }
        }
    }

    /// Assembles the participant-facing view of the table.
    #[must_use]
    pub fn snapshot(&self, now: u64) -> Snapshot {
        let participants = self
            .participants
            .iter()
            .map(|(name, participant)| {
                (
                    name.clone(),
                    PlayerView {
                        hand: participant.hand().to_vec(),
                        balance: participant.balance(),
                        wager: participant.wager(),
                        status: participant.status(),
                        connected: participant.is_connected(),
                    },
                )
            })
            .collect();
        let priorities = self
            .participants
            .iter()
            .map(|(name, participant)| (name.clone(), participant.priority()))
            .collect();

        Snapshot {
            phase: self.phase,
            participants,
            dealer_hand: self.dealer_hand.visible(),
            message: self.message.clone(),
            current_turn: self.current_player().map(str::to_owned),
            turn_deadline: self.turn_deadline,
            dealer: self.dealer.clone(),
            election: self.election.clone(),
            priorities,
            coordinator_time: now,
        }
    }

    /// Takes the effects queued by the operations since the last call.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        core::mem::take(&mut self.effects)
    }

    /// Opens the next round once the payout cooldown for `round` has passed.
    ///
    /// Returns `false`, doing nothing, if the table has moved on since.
    pub fn start_new_round(&mut self, round: u64) -> bool {
        if self.phase != Phase::Payout || self.round != round {
            log::debug!("ignoring stale round restart for round {round}");
            return false;
        }
        self.reset_round(false);
        true
    }

    /// Clears the table for a new wagering phase.
    fn reset_round(&mut self, rebuild_deck: bool) {
        for participant in self.participants.values_mut() {
            let cards = participant.reset();
            self.shoe.discard(cards);
        }
        let dealer_cards = self.dealer_hand.take();
        self.shoe.discard(dealer_cards);

        if rebuild_deck {
            self.shoe.rebuild();
        } else if self.shoe.replenish_below(self.options.reshuffle_threshold) {
            log::info!("deck below {}, reshuffled", self.options.reshuffle_threshold);
        }

        self.wager_order.clear();
        self.turn_order.clear();
        self.current_turn = 0;
        self.turn_deadline = None;
        self.phase = Phase::Wagering;
        self.message = NEW_ROUND_MESSAGE.to_owned();
        log::info!("round {} open for wagers", self.round + 1);
    }

    /// The ring of connected participants.
    fn ring(&self) -> Ring {
        Ring::new(
            self.participants
                .values()
                .filter(|participant| participant.is_connected())
                .map(|participant| (participant.name(), participant.priority())),
        )
    }
}

/// Read access.
impl Table {
    /// Returns the options the table was created with.
    #[must_use]
    pub const fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns a participant.
    #[must_use]
    pub fn participant(&self, name: &str) -> Option<&Participant> {
        self.participants.get(name)
    }

    /// Returns the number of seated participants.
    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Returns the turn order of the current round.
    #[must_use]
    pub fn turn_order(&self) -> &[String] {
        &self.turn_order
    }

    /// Returns the index into the turn order.
    #[must_use]
    pub const fn current_turn_index(&self) -> usize {
        self.current_turn
    }

    /// Returns whose turn it is, if anyone's.
    #[must_use]
    pub fn current_player(&self) -> Option<&str> {
        if self.phase != Phase::Acting {
            return None;
        }
        self.turn_order.get(self.current_turn).map(String::as_str)
    }

    /// Returns the turn generation.
    #[must_use]
    pub const fn turn_generation(&self) -> u64 {
        self.turn_generation
    }

    /// Returns the coordinator time at which the current turn expires.
    #[must_use]
    pub const fn turn_deadline(&self) -> Option<u64> {
        self.turn_deadline
    }

    /// Returns the number of rounds dealt so far.
    #[must_use]
    pub const fn round(&self) -> u64 {
        self.round
    }

    /// Returns the status message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the dealer's full hand.
    #[must_use]
    pub const fn dealer_hand(&self) -> &DealerHand {
        &self.dealer_hand
    }

    /// Returns the designated dealer.
    #[must_use]
    pub fn dealer(&self) -> Option<&str> {
        self.dealer.as_deref()
    }

    /// Returns the election token in flight.
    #[must_use]
    pub const fn election(&self) -> Option<&ElectionToken> {
        self.election.as_ref()
    }

    /// Returns the result of the last settled round.
    #[must_use]
    pub const fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    /// Stacks the deck so the next draws come out in the given order.
    ///
    /// Only allowed while wagering, when no card is in a hand. Returns `false`,
    /// leaving the deck alone, in any other phase. See [`Shoe::stack`].
    pub fn stack_deck(&mut self, draws: &[Card]) -> bool {
        if self.phase != Phase::Wagering {
            log::debug!("refusing to stack the deck with cards in play");
            return false;
        }
        self.shoe.stack(draws);
        true
    }

    /// Counts cards as `(deck, live, discard)`.
    #[must_use]
    pub fn card_census(&self) -> (usize, usize, usize) {
        (
            self.shoe.remaining(),
            self.live_cards().len(),
            self.shoe.discarded(),
        )
    }

    /// Every card currently in a hand, dealer's included.
    #[must_use]
    pub fn live_cards(&self) -> Vec<Card> {
        self.participants
            .values()
            .flat_map(|participant| participant.hand().iter().copied())
            .chain(self.dealer_hand.cards().iter().copied())
            .collect()
    }

    /// Every card not in a hand.
    #[must_use]
    pub fn off_table_cards(&self) -> Vec<Card> {
        self.shoe.off_table()
    }

    /// Returns a participant's status.
    #[must_use]
    pub fn status_of(&self, name: &str) -> Option<Status> {
        self.participants.get(name).map(Participant::status)
    }
}
