//! Round result types for settlement.

/// How a participant's hand ended against the dealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Dealer busted or the participant scored higher. Pays twice the wager.
    Win,
    /// Equal values. The wager is returned.
    Push,
    /// Dealer scored higher. The wager stays with the house.
    Lose,
    /// The participant went over 21 during their turn.
    Bust,
}

/// Result for a single participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantResult {
    /// The participant's name.
    pub name: String,
    /// The outcome.
    pub outcome: Outcome,
    /// The escrowed wager.
    pub wager: usize,
    /// Amount credited back to the balance.
    pub payout: usize,
    /// The participant's final hand value.
    pub value: u8,
}

impl ParticipantResult {
    /// One line of the status message.
    #[must_use]
    pub fn line(&self) -> String {
        match self.outcome {
            Outcome::Win => format!("{} wins! ", self.name),
            Outcome::Push => format!("{} pushes. ", self.name),
            Outcome::Lose => format!("{} loses. ", self.name),
            Outcome::Bust => format!("{} busted. ", self.name),
        }
    }
}

/// Result of the entire round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    /// Results in turn order.
    pub participants: Vec<ParticipantResult>,
    /// The dealer's final hand value.
    pub dealer_value: u8,
    /// Whether the dealer busted.
    pub dealer_bust: bool,
}

impl RoundResult {
    /// Composes the status message announcing the round.
    #[must_use]
    pub fn message(&self) -> String {
        let mut message = format!("Dealer has {}. ", self.dealer_value);
        for result in &self.participants {
            message.push_str(&result.line());
        }
        message
    }

    /// Looks up one participant's result.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParticipantResult> {
        self.participants.iter().find(|result| result.name == name)
    }
}
