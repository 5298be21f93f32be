//! Parsing of what a human types at the table.

/// A turn action a participant can type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnAction {
    /// Draw a card.
    Hit,
    /// Keep the hand.
    Stand,
}

impl TurnAction {
    /// Parses `h`/`hit` or `s`/`stand`, ignoring case and surrounding space.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "h" | "hit" => Some(Self::Hit),
            "s" | "stand" => Some(Self::Stand),
            _ => None,
        }
    }
}

/// Parses a typed wager.
///
/// Anything that is not a whole number becomes `0`, which the coordinator
/// rejects, leaving the participant still awaiting a wager.
#[must_use]
pub fn parse_wager(input: &str) -> usize {
    input.trim().parse().unwrap_or(0)
}
