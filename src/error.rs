//! Error types for coordinator operations.
//!
//! The table reports every rejected operation with one of these. The
//! participant-facing surface turns game-logic rejections into silent no-ops;
//! only [`TransportError`] ever reaches a remote caller.

use thiserror::Error;

/// Errors that can occur when joining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum JoinError {
    /// The name is already seated and rejoining is not allowed.
    #[error("Player name is already taken.")]
    NameTaken,
    /// The name is empty.
    #[error("Player name must not be empty.")]
    EmptyName,
    /// Every seat is taken.
    #[error("The table is full.")]
    TableFull,
}

/// Errors that can occur when placing a wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WagerError {
    /// Wagers are only taken during the wagering phase.
    #[error("invalid phase for wagering")]
    InvalidState,
    /// Participant not found.
    #[error("participant not found")]
    PlayerNotFound,
    /// Wager amount is zero.
    #[error("wager amount is zero")]
    ZeroWager,
    /// Wager exceeds the balance.
    #[error("insufficient funds")]
    InsufficientFunds,
    /// A wager is already escrowed this round.
    #[error("wager already placed this round")]
    AlreadyWagered,
}

/// Errors that can occur during turn actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TurnError {
    /// Turn actions are only taken during the acting phase.
    #[error("invalid phase for this action")]
    InvalidState,
    /// Not this participant's turn.
    #[error("not this participant's turn")]
    NotYourTurn,
    /// A turn timer fired after its turn was superseded.
    #[error("turn timer is stale")]
    StaleTimer,
}

/// Errors that can occur while recording an election.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ElectionError {
    /// A dealer is already designated.
    #[error("a dealer is already designated")]
    DealerPresent,
    /// Another election token is already in flight.
    #[error("an election is already in flight")]
    AlreadyPending,
    /// No election token is in flight.
    #[error("no election is in flight")]
    NoPendingToken,
    /// A named participant is not seated or not connected.
    #[error("unknown participant")]
    UnknownParticipant,
    /// The candidate priority does not match the originator or claimant.
    #[error("candidate priority does not match")]
    WrongPriority,
    /// The token is not addressed to the ring successor.
    #[error("token is not addressed to the ring successor")]
    WrongRecipient,
    /// The candidate priority went down.
    #[error("candidate priority regressed")]
    CandidateRegressed,
    /// The token has not yet returned to its originator.
    #[error("token has not completed the ring")]
    RingIncomplete,
}

/// Errors raised by the remote-call boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The coordinator could not be reached.
    #[error("coordinator unreachable: {0}")]
    Unreachable(String),
    /// The coordinator has shut down.
    #[error("coordinator closed")]
    Closed,
}

/// Errors that end a client's attempt to sit down.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The coordinator refused the join.
    #[error("join refused: {0}")]
    Refused(String),
    /// The coordinator could not be reached.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors that can occur when starting a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No Tokio runtime is available to run timers on.
    #[error("a session must be started inside a Tokio runtime")]
    NoRuntime,
}
