//! Session phase and deferred effects.

use serde::{Deserialize, Serialize};

/// Round phase.
///
/// Phases are ordered, so `phase >= Phase::DealerResolving` means the dealer's
/// hole card is public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Accepting wagers for the next round.
    Wagering,
    /// Participants take turns hitting or standing.
    Acting,
    /// The dealer draws out their hand.
    DealerResolving,
    /// Results are shown until the next round opens.
    Payout,
}

/// Something the table wants done later, outside its lock.
///
/// The table itself never sleeps. Whoever owns it drains these after each
/// operation and schedules them; see [`crate::Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Force `name` to stand after the turn timeout, unless `generation` is
    /// stale by then. Replaces any armed timer.
    ArmTurnTimer {
        /// Participant whose turn it is.
        name: String,
        /// Turn generation at arm time.
        generation: u64,
    },
    /// Best-effort cancellation of the armed timer.
    CancelTurnTimer,
    /// Open the next round after the payout cooldown.
    ScheduleNewRound {
        /// The round that just settled.
        round: u64,
    },
}
