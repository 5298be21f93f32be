//! Ring election of the next dealer.
//!
//! Participants are arranged in a ring by ascending priority. An election
//! token walks the ring once, each holder raising the candidate to its own
//! priority if that is higher, and the originator announces the winner when the
//! token comes back. The coordinator only records the token; every decision is
//! made here, by the participant holding it.

use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;

/// The token relayed around the ring.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElectionToken {
    /// Highest priority seen so far.
    pub candidate_priority: u32,
    /// Who started the election.
    pub originator: String,
    /// Who must process the token next.
    pub next_recipient: String,
}

/// What a token holder does with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElectionStep {
    /// Pass an updated token to the ring successor.
    Forward(ElectionToken),
    /// The walk is complete; announce this participant as dealer.
    Claim(String),
}

/// Participants ordered by ascending priority, wrapping around.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ring {
    members: Vec<(String, u32)>,
}

impl Ring {
    /// Builds a ring from `(name, priority)` pairs in any order.
    pub fn new<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut members: Vec<(String, u32)> = members
            .into_iter()
            .map(|(name, priority)| (name.into(), priority))
            .collect();
        members.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Self { members }
    }

    /// Builds the ring of connected participants visible in a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self::new(
            snapshot
                .priorities
                .iter()
                .filter(|(name, _)| {
                    snapshot
                        .participants
                        .get(*name)
                        .is_some_and(|view| view.connected)
                })
                .map(|(name, &priority)| (name.as_str(), priority)),
        )
    }

    /// Returns the member after `name`, wrapping to the lowest priority.
    ///
    /// A ring of one is its own successor.
    #[must_use]
    pub fn successor(&self, name: &str) -> Option<&str> {
        let index = self.members.iter().position(|(member, _)| member == name)?;
        let next = (index + 1) % self.members.len();
        Some(self.members[next].0.as_str())
    }

    /// Returns the priority of a member.
    #[must_use]
    pub fn priority_of(&self, name: &str) -> Option<u32> {
        self.members
            .iter()
            .find(|(member, _)| member == name)
            .map(|&(_, priority)| priority)
    }

    /// Returns the lowest-priority member.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.members.first().map(|(name, _)| name.as_str())
    }

    /// Returns the members in ring order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns whether the ring is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Creates the token that starts an election from `originator`.
    #[must_use]
    pub fn originate(&self, originator: &str) -> Option<ElectionToken> {
        Some(ElectionToken {
            candidate_priority: self.priority_of(originator)?,
            originator: originator.to_owned(),
            next_recipient: self.successor(originator)?.to_owned(),
        })
    }
}

/// Decides what `me` does with the token in `snapshot`, if anything.
///
/// Returns `None` when no token is in flight, when it is addressed to somebody
/// else, or when `me` is not part of the ring.
#[must_use]
pub fn process(me: &str, snapshot: &Snapshot) -> Option<ElectionStep> {
    let token = snapshot.election.as_ref()?;
    if token.next_recipient != me {
        return None;
    }

    if token.originator == me {
        let winner = snapshot.holder_of(token.candidate_priority)?;
        log::info!(
            "{me}: election returned, priority {} wins ({winner})",
            token.candidate_priority
        );
        return Some(ElectionStep::Claim(winner.to_owned()));
    }

    let ring = Ring::from_snapshot(snapshot);
    let mine = ring.priority_of(me)?;
    let next = ring.successor(me)?;
    let forwarded = ElectionToken {
        candidate_priority: mine.max(token.candidate_priority),
        originator: token.originator.clone(),
        next_recipient: next.to_owned(),
    };
    log::debug!(
        "{me}: forwarding candidate {} to {next}",
        forwarded.candidate_priority
    );
    Some(ElectionStep::Forward(forwarded))
}
