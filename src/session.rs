//! The coordinator: one table, one lock, and the timers it asks for.

use std::sync::{Arc, Weak};

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;

use crate::clock::CoordinatorClock;
use crate::election::ElectionToken;
use crate::error::SessionError;
use crate::options::SessionOptions;
use crate::snapshot::Snapshot;
use crate::sync::Mutex;
use crate::table::{Effect, Table};

/// Everything behind the session lock.
struct Coordinator {
    table: Table,
    turn_timer: Option<AbortHandle>,
    round_restart: Option<AbortHandle>,
}

struct Shared {
    state: Mutex<Coordinator>,
    clock: CoordinatorClock,
    options: SessionOptions,
    runtime: Handle,
}

/// A running blackjack session.
///
/// Every operation takes the single session lock for its whole duration, so
/// wagers, turn actions, timer expirations, and round restarts are applied
/// one at a time in the order they arrive. The lock is never held across an
/// `.await` and never taken twice on one path.
///
/// Game-logic rejections (wrong turn, wrong phase, bad wager) are logged and
/// otherwise ignored; callers learn what happened from the next [`Snapshot`].
///
/// Cloning a `Session` yields another handle to the same table.
#[derive(Clone)]
pub struct Session {
    shared: Arc<Shared>,
}

impl Session {
    /// Opens a session on the current Tokio runtime.
    ///
    /// A background task checks heartbeats every
    /// [`SessionOptions::liveness_interval`] until the last handle is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if called outside a Tokio runtime.
    pub fn start(options: SessionOptions, seed: u64) -> Result<Self, SessionError> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        let shared = Arc::new(Shared {
            state: Mutex::new(Coordinator {
                table: Table::new(options.clone(), seed),
                turn_timer: None,
                round_restart: None,
            }),
            clock: CoordinatorClock::start(),
            options,
            runtime,
        });
        Shared::watch_liveness(&shared);
        log::info!("session ready");
        Ok(Self { shared })
    }

    /// Seats a participant. Returns a welcome text, or one starting with
    /// `ERROR:` if the name was refused.
    pub fn join(&self, name: &str) -> String {
        self.shared
            .apply(|table, now| table.join(name, now))
            .unwrap_or_else(|err| format!("ERROR: {err}"))
    }

    /// Returns a fresh snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.shared.apply(|table, now| table.snapshot(now))
    }

    /// Places a wager. Invalid wagers are ignored.
    pub fn place_wager(&self, name: &str, amount: usize) {
        self.shared
            .apply(|table, now| table.place_wager(name, amount, now))
            .unwrap_or_else(|err| log::debug!("wager by {name} ignored: {err}"));
    }

    /// Draws a card for `name` if it is their turn.
    pub fn hit(&self, name: &str) {
        if let Err(err) = self.shared.apply(|table, now| table.hit(name, now)) {
            log::debug!("hit by {name} ignored: {err}");
        }
    }

    /// Ends `name`'s turn if it is their turn.
    pub fn stand(&self, name: &str) {
        self.shared
            .apply(|table, now| table.stand(name, now))
            .unwrap_or_else(|err| log::debug!("stand by {name} ignored: {err}"));
    }

    /// Records an election token. Tokens that do not continue the ring are ignored.
    pub fn submit_election_token(&self, token: ElectionToken) {
        self.shared
            .apply(|table, _| table.submit_election_token(token))
            .unwrap_or_else(|err| log::debug!("election token ignored: {err}"));
    }

    /// Designates the election winner. Premature or wrong claims are ignored.
    pub fn claim_dealership(&self, name: &str) {
        self.shared
            .apply(|table, _| table.claim_dealership(name))
            .unwrap_or_else(|err| log::debug!("dealer claim for {name} ignored: {err}"));
    }

    /// Starts an election now, as an operator would.
    pub fn trigger_election(&self) {
        if let Err(err) = self.shared.apply(|table, _| table.trigger_election()) {
            log::debug!("election not started: {err}");
        }
    }

    /// Records that `name` is alive.
    pub fn heartbeat(&self, name: &str) {
        if !self.shared.apply(|table, now| table.heartbeat(name, now)) {
            log::debug!("heartbeat from unknown participant {name}");
        }
    }

    /// The coordinator's clock in milliseconds since the Unix epoch.
    #[must_use]
    pub fn coordinator_time(&self) -> u64 {
        self.shared.clock.now()
    }

    /// Runs `f` on the table under the session lock.
    ///
    /// Effects queued by `f` are scheduled like those of any other operation.
    pub fn with_table<R>(&self, f: impl FnOnce(&mut Table) -> R) -> R {
        self.shared.apply(|table, _| f(table))
    }
}

impl Shared {
    /// Applies one operation atomically and schedules what it asked for.
    fn apply<R>(self: &Arc<Self>, op: impl FnOnce(&mut Table, u64) -> R) -> R {
        let now = self.clock.now();
        let mut state = self.state.lock();
        let output = op(&mut state.table, now);
        for effect in state.table.drain_effects() {
            self.schedule(&mut state, effect);
        }
        output
    }

    fn schedule(self: &Arc<Self>, state: &mut Coordinator, effect: Effect) {
        match effect {
            Effect::ArmTurnTimer { name, generation } => {
                if let Some(previous) = state.turn_timer.take() {
                    previous.abort();
                }
                let shared = Arc::downgrade(self);
                let window = self.options.turn_timeout;
                let task = self.runtime.spawn(async move {
                    tokio::time::sleep(window).await;
                    Self::upgrade(&shared, |shared| {
                        shared
                            .apply(|table, now| table.expire_turn(&name, generation, now))
                            .unwrap_or_else(|err| log::debug!("turn timer for {name}: {err}"));
                    });
                });
                state.turn_timer = Some(task.abort_handle());
            }
            Effect::CancelTurnTimer => {
                if let Some(timer) = state.turn_timer.take() {
                    timer.abort();
                }
            }
            Effect::ScheduleNewRound { round } => {
                if let Some(previous) = state.round_restart.take() {
                    previous.abort();
                }
                let shared = Arc::downgrade(self);
                let cooldown = self.options.payout_cooldown;
                let task = self.runtime.spawn(async move {
                    tokio::time::sleep(cooldown).await;
                    Self::upgrade(&shared, |shared| {
                        shared.apply(|table, _| table.start_new_round(round));
                    });
                });
                state.round_restart = Some(task.abort_handle());
            }
        }
    }

    fn watch_liveness(self: &Arc<Self>) {
        let shared = Arc::downgrade(self);
        let every = self.options.liveness_interval;
        self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(shared) = shared.upgrade() else {
                    break;
                };
                shared.apply(Table::sweep);
            }
            log::debug!("session dropped, liveness watch stopped");
        });
    }

    fn upgrade(shared: &Weak<Self>, f: impl FnOnce(&Arc<Self>)) {
        match shared.upgrade() {
            Some(shared) => f(&shared),
            None => log::debug!("session dropped before a deferred callback fired"),
        }
    }
}
