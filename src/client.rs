//! A participant's side of the session.

use core::time::Duration;

use crate::clock::SyncedClock;
use crate::election::{self, ElectionStep};
use crate::error::{ClientError, TransportError};
use crate::service::SessionService;
use crate::snapshot::Snapshot;

/// A seated participant talking to a coordinator through `S`.
pub struct Client<S> {
    service: S,
    name: String,
    clock: SyncedClock,
}

impl<S: SessionService> Client<S> {
    /// Joins the table and synchronises the clock.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Refused`] if the coordinator answered with an
    /// `ERROR` text, or the transport error if it could not be reached.
    pub async fn connect(service: S, name: &str) -> Result<Self, ClientError> {
        let welcome = service.join(name).await?;
        if welcome.starts_with("ERROR") {
            return Err(ClientError::Refused(welcome));
        }
        log::info!("{welcome}");
        let clock = SyncedClock::synchronize(&service).await?;
        Ok(Self {
            service,
            name: name.trim().to_owned(),
            clock,
        })
    }

    /// Returns the participant's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the synchronised clock.
    #[must_use]
    pub const fn clock(&self) -> &SyncedClock {
        &self.clock
    }

    /// Returns the underlying service.
    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Fetches the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the coordinator cannot be reached.
    pub async fn snapshot(&self) -> Result<Snapshot, TransportError> {
        self.service.snapshot().await
    }

    /// Places a wager.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the coordinator cannot be reached.
    pub async fn wager(&self, amount: usize) -> Result<(), TransportError> {
        self.service.place_wager(&self.name, amount).await
    }

    /// Draws a card.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the coordinator cannot be reached.
    pub async fn hit(&self) -> Result<(), TransportError> {
        self.service.hit(&self.name).await
    }

    /// Ends the turn.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the coordinator cannot be reached.
    pub async fn stand(&self) -> Result<(), TransportError> {
        self.service.stand(&self.name).await
    }

    /// Processes the election token in `snapshot` if it is addressed to us.
    ///
    /// Returns the step taken, if any.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the coordinator cannot be reached.
    pub async fn relay_election(
        &self,
        snapshot: &Snapshot,
    ) -> Result<Option<ElectionStep>, TransportError> {
        let Some(step) = election::process(&self.name, snapshot) else {
            return Ok(None);
        };
        match &step {
            ElectionStep::Forward(token) => {
                self.service.submit_election_token(token.clone()).await?;
            }
            ElectionStep::Claim(winner) => {
                self.service.claim_dealership(winner).await?;
            }
        }
        Ok(Some(step))
    }

    /// Time left on the current turn as seen by this participant.
    #[must_use]
    pub fn time_remaining(&self, snapshot: &Snapshot) -> Option<Duration> {
        snapshot
            .turn_deadline
            .map(|deadline| self.clock.remaining(deadline))
    }

    /// Sends heartbeats until one fails.
    ///
    /// Runs forever while the coordinator is reachable. A returned error is
    /// fatal to this participant's session.
    pub async fn run_heartbeat(&self, every: Duration) -> TransportError {
        run_heartbeat(&self.service, &self.name, every).await
    }
}

/// Sends a heartbeat for `name` every `every`, returning the first failure.
pub async fn run_heartbeat<S>(service: &S, name: &str, every: Duration) -> TransportError
where
    S: SessionService + ?Sized,
{
    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        if let Err(err) = service.heartbeat(name).await {
            log::error!("{name}: connection to coordinator lost: {err}");
            return err;
        }
    }
}
