//! The deck the coordinator deals from.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::card::{Card, DECK_SIZE, full_deck};

/// A single 52-card deck plus its discard pile.
///
/// Within one shuffle cycle every card exists exactly once, either in the
/// undealt deck, in somebody's hand, or in the discard pile.
pub struct Shoe {
    /// Undealt cards. The top of the deck is the end of the vector.
    cards: Vec<Card>,
    /// Cards collected from finished rounds.
    discard: Vec<Card>,
    /// Number of times a fresh deck was opened.
    cycle: u64,
    rng: ChaCha8Rng,
}

impl Shoe {
    /// Creates a freshly shuffled shoe.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut shoe = Self {
            cards: Vec::with_capacity(DECK_SIZE),
            discard: Vec::new(),
            cycle: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        shoe.rebuild();
        shoe
    }

    /// Throws away everything and opens a fresh, shuffled deck.
    pub fn rebuild(&mut self) {
        self.cards = full_deck();
        self.cards.shuffle(&mut self.rng);
        self.discard.clear();
        self.cycle += 1;
    }

    /// Draws the top card.
    ///
    /// An empty deck is refilled from the discard pile. If the discard pile is
    /// empty as well, every card is live and a fresh deck is opened, putting
    /// duplicates in play. A table capped at [`crate::table::MAX_SEATS`] never
    /// gets there.
    pub fn draw(&mut self) -> Card {
        loop {
            if let Some(card) = self.cards.pop() {
                return card;
            }
            if self.discard.is_empty() {
                log::warn!("every card is live, opening a fresh deck");
                self.rebuild();
            } else {
                log::debug!("deck empty, reshuffling {} discards", self.discard.len());
                self.cards.append(&mut self.discard);
                self.cards.shuffle(&mut self.rng);
            }
        }
    }

    /// Puts finished cards on the discard pile.
    pub fn discard(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.discard.extend(cards);
    }

    /// Rebuilds the deck if fewer than `threshold` cards remain.
    ///
    /// Returns `true` if a rebuild happened. Call only between rounds, when no
    /// card is live.
    pub fn replenish_below(&mut self, threshold: usize) -> bool {
        if self.cards.len() < threshold {
            self.rebuild();
            true
        } else {
            false
        }
    }

    /// Opens a fresh deck with `draws` on top, drawn in the given order.
    ///
    /// The other cards of the 52 are shuffled underneath and the discard pile
    /// is cleared, so the census stays whole as long as no card is in a hand
    /// and `draws` holds no duplicates. Intended for tests and replays.
    pub fn stack(&mut self, draws: &[Card]) {
        let mut deck: Vec<Card> = full_deck()
            .into_iter()
            .filter(|card| !draws.contains(card))
            .collect();
        deck.shuffle(&mut self.rng);
        deck.extend(draws.iter().rev());
        self.cards = deck;
        self.discard.clear();
    }

    /// Returns the number of undealt cards.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Returns the number of discarded cards.
    #[must_use]
    pub fn discarded(&self) -> usize {
        self.discard.len()
    }

    /// Returns how many fresh decks have been opened.
    #[must_use]
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Returns every card not on the table, deck first, for integrity checks.
    #[must_use]
    pub fn off_table(&self) -> Vec<Card> {
        self.cards.iter().chain(&self.discard).copied().collect()
    }
}
