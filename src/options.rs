//! Session configuration options.

use core::time::Duration;

/// What happens when a name that is already seated joins again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RejoinPolicy {
    /// Treat it as a reconnection: keep balance and priority.
    #[default]
    Reconnect,
    /// Reject it as a duplicate name.
    Reject,
}

/// Configuration options for a session.
///
/// Use the builder pattern to customize options:
///
/// ```
/// use core::time::Duration;
/// use bjcoord::{RejoinPolicy, SessionOptions};
///
/// let options = SessionOptions::default()
///     .with_turn_timeout(Duration::from_secs(10))
///     .with_rejoin(RejoinPolicy::Reject);
/// assert_eq!(options.turn_timeout, Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Balance granted to a participant on first join.
    pub starting_balance: usize,
    /// How long a participant may take before a stand is forced.
    pub turn_timeout: Duration,
    /// How long results stay on screen before the next round opens.
    pub payout_cooldown: Duration,
    /// At round start, rebuild the deck if fewer cards than this remain.
    pub reshuffle_threshold: usize,
    /// The dealer draws while below this value.
    pub dealer_stands_at: u8,
    /// Rejoin semantics for an already seated name.
    pub rejoin: RejoinPolicy,
    /// A participant silent for longer than this is considered disconnected.
    pub heartbeat_timeout: Duration,
    /// How often the coordinator checks heartbeats.
    pub liveness_interval: Duration,
    /// Whether the coordinator starts an election when no dealer is designated.
    pub auto_election: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            starting_balance: 1000,
            turn_timeout: Duration::from_secs(30),
            payout_cooldown: Duration::from_secs(8),
            reshuffle_threshold: 20,
            dealer_stands_at: 17,
            rejoin: RejoinPolicy::Reconnect,
            heartbeat_timeout: Duration::from_secs(15),
            liveness_interval: Duration::from_secs(1),
            auto_election: true,
        }
    }
}

impl SessionOptions {
    /// Sets the starting balance.
    ///
    /// # Example
    ///
    /// ```
    /// use bjcoord::SessionOptions;
    ///
    /// let options = SessionOptions::default().with_starting_balance(100);
    /// assert_eq!(options.starting_balance, 100);
    /// ```
    #[must_use]
    pub const fn with_starting_balance(mut self, balance: usize) -> Self {
        self.starting_balance = balance;
        self
    }

    /// Sets the turn timeout.
    #[must_use]
    pub const fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = timeout;
        self
    }

    /// Sets the delay between payout and the next round.
    #[must_use]
    pub const fn with_payout_cooldown(mut self, cooldown: Duration) -> Self {
        self.payout_cooldown = cooldown;
        self
    }

    /// Sets the reshuffle threshold.
    ///
    /// # Example
    ///
    /// ```
    /// use bjcoord::SessionOptions;
    ///
    /// let options = SessionOptions::default().with_reshuffle_threshold(30);
    /// assert_eq!(options.reshuffle_threshold, 30);
    /// ```
    #[must_use]
    pub const fn with_reshuffle_threshold(mut self, threshold: usize) -> Self {
        self.reshuffle_threshold = threshold;
        self
    }

    /// Sets the value the dealer stands on.
    #[must_use]
    pub const fn with_dealer_stands_at(mut self, value: u8) -> Self {
        self.dealer_stands_at = value;
        self
    }

    /// Sets the rejoin policy.
    #[must_use]
    pub const fn with_rejoin(mut self, rejoin: RejoinPolicy) -> Self {
        self.rejoin = rejoin;
        self
    }

    /// Sets the heartbeat timeout.
    #[must_use]
    pub const fn with_heartbeat_timeout(mut self, timeout: Duration) -> Self {
        self.heartbeat_timeout = timeout;
        self
    }

    /// Sets how often heartbeats are checked.
    #[must_use]
    pub const fn with_liveness_interval(mut self, interval: Duration) -> Self {
        self.liveness_interval = interval;
        self
    }

    /// Sets whether elections start automatically.
    ///
    /// # Example
    ///
    /// ```
    /// use bjcoord::SessionOptions;
    ///
    /// let options = SessionOptions::default().with_auto_election(false);
    /// assert!(!options.auto_election);
    /// ```
    #[must_use]
    pub const fn with_auto_election(mut self, enabled: bool) -> Self {
        self.auto_election = enabled;
        self
    }
}
