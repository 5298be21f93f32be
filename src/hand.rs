//! Hand evaluation and the dealer's hand.

use crate::card::{Card, VisibleCard};

/// Value above which a hand is bust.
pub const BLACKJACK: u8 = 21;

fn evaluate_cards(cards: &[Card]) -> (u8, bool) {
    let mut value: u8 = 0;
    let mut aces: u8 = 0;

    for card in cards {
        if card.is_ace() {
            aces += 1;
        }
        value = value.saturating_add(card.value());
    }

    while value > BLACKJACK && aces > 0 {
        value -= 10;
        aces -= 1;
    }

    let is_soft = aces > 0 && value <= BLACKJACK;
    (value, is_soft)
}

/// Scores a hand.
///
/// Aces count 11 until that would bust the hand, then they are recounted as 1
/// one at a time. An empty hand is worth 0.
#[must_use]
pub fn hand_value(cards: &[Card]) -> u8 {
    evaluate_cards(cards).0
}

/// Returns whether the hand still counts an ace as 11.
#[must_use]
pub fn is_soft(cards: &[Card]) -> bool {
    evaluate_cards(cards).1
}

/// Returns whether the hand is over 21.
#[must_use]
pub fn is_bust(cards: &[Card]) -> bool {
    hand_value(cards) > BLACKJACK
}

/// Scores the face-up part of a visible hand.
#[must_use]
pub fn visible_value(cards: &[VisibleCard]) -> u8 {
    let up: Vec<Card> = cards.iter().filter_map(VisibleCard::card).collect();
    hand_value(&up)
}

/// The dealer's hand.
#[derive(Debug, Clone, Default)]
pub struct DealerHand {
    /// Cards in the hand.
    cards: Vec<Card>,
    /// Whether the hole card is revealed.
    hole_revealed: bool,
}

impl DealerHand {
    /// Creates a new empty dealer hand.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cards: Vec::new(),
            hole_revealed: false,
        }
    }

    /// Adds a card to the hand.
    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Returns all cards in the hand.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Returns whether the hole card is revealed.
    #[must_use]
    pub const fn is_hole_revealed(&self) -> bool {
        self.hole_revealed
    }

    /// Reveals the hole card.
    pub const fn reveal_hole(&mut self) {
        self.hole_revealed = true;
    }

    /// Returns the hand as participants may see it.
    ///
    /// Until the hole card is revealed only the up card is shown, followed by
    /// a hidden placeholder once a second card has been dealt.
    #[must_use]
    pub fn visible(&self) -> Vec<VisibleCard> {
        if self.hole_revealed || self.cards.len() < 2 {
            return self.cards.iter().copied().map(VisibleCard::Up).collect();
        }
        vec![VisibleCard::Up(self.cards[0]), VisibleCard::Hidden]
    }

    /// Calculates the full value of the hand.
    #[must_use]
    pub fn value(&self) -> u8 {
        hand_value(&self.cards)
    }

    /// Returns whether the hand is bust.
    #[must_use]
    pub fn is_bust(&self) -> bool {
        self.value() > BLACKJACK
    }

    /// Returns the number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns whether the hand is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Empties the hand for a new round, returning the cards for discard.
    pub fn take(&mut self) -> Vec<Card> {
        self.hole_revealed = false;
        core::mem::take(&mut self.cards)
    }
}
