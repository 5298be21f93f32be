//! The request/response boundary between participants and the coordinator.
//!
//! A networked transport implements [`SessionService`] on its client stub;
//! [`Session`] implements it directly for in-process play and tests. Game-logic
//! rejections are never errors here: the only failure a caller can see is a
//! [`TransportError`].

use async_trait::async_trait;

use crate::election::ElectionToken;
use crate::error::TransportError;
use crate::session::Session;
use crate::snapshot::Snapshot;

/// Operations a participant can issue against the coordinator.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Joins the table. The text starts with `ERROR` if the name was refused.
    async fn join(&self, name: &str) -> Result<String, TransportError>;

    /// Fetches the current snapshot.
    async fn snapshot(&self) -> Result<Snapshot, TransportError>;

    /// Places a wager.
    async fn place_wager(&self, name: &str, amount: usize) -> Result<(), TransportError>;

    /// Draws a card.
    async fn hit(&self, name: &str) -> Result<(), TransportError>;

    /// Ends the turn.
    async fn stand(&self, name: &str) -> Result<(), TransportError>;

    /// Hands an election token back to the coordinator for the next holder.
    async fn submit_election_token(&self, token: ElectionToken) -> Result<(), TransportError>;

    /// Announces the election winner.
    async fn claim_dealership(&self, name: &str) -> Result<(), TransportError>;

    /// Tells the coordinator this participant is alive.
    async fn heartbeat(&self, name: &str) -> Result<(), TransportError>;

    /// Reads the coordinator's clock in milliseconds since the Unix epoch.
    async fn coordinator_time(&self) -> Result<u64, TransportError>;
}

#[async_trait]
impl SessionService for Session {
    async fn join(&self, name: &str) -> Result<String, TransportError> {
        Ok(Self::join(self, name))
    }

    async fn snapshot(&self) -> Result<Snapshot, TransportError> {
        Ok(Self::snapshot(self))
    }

    async fn place_wager(&self, name: &str, amount: usize) -> Result<(), TransportError> {
        Self::place_wager(self, name, amount);
        Ok(())
    }

    async fn hit(&self, name: &str) -> Result<(), TransportError> {
        Self::hit(self, name);
        Ok(())
    }

    async fn stand(&self, name: &str) -> Result<(), TransportError> {
        Self::stand(self, name);
        Ok(())
    }

    async fn submit_election_token(&self, token: ElectionToken) -> Result<(), TransportError> {
        Self::submit_election_token(self, token);
        Ok(())
    }

    async fn claim_dealership(&self, name: &str) -> Result<(), TransportError> {
        Self::claim_dealership(self, name);
        Ok(())
    }

    async fn heartbeat(&self, name: &str) -> Result<(), TransportError> {
        Self::heartbeat(self, name);
        Ok(())
    }

    async fn coordinator_time(&self) -> Result<u64, TransportError> {
        Ok(Self::coordinator_time(self))
    }
}
