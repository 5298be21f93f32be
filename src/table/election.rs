//! The coordinator's side of the ring election: record, validate, never decide.

use crate::election::ElectionToken;
use crate::error::ElectionError;

use super::Table;

impl Table {
    /// Starts an election on behalf of the lowest-priority connected participant.
    ///
    /// # Errors
    ///
    /// Returns an error if a dealer is designated, an election is already in
    /// flight, or nobody is connected.
    pub fn trigger_election(&mut self) -> Result<ElectionToken, ElectionError> {
        if self.dealer.is_some() {
            return Err(ElectionError::DealerPresent);
        }
        if self.election.is_some() {
            return Err(ElectionError::AlreadyPending);
        }

        let ring = self.ring();
        let token = ring
            .first()
            .and_then(|originator| ring.originate(originator))
            .ok_or(ElectionError::UnknownParticipant)?;
        self.record(token.clone());
        Ok(token)
    }

    /// Records an election token submitted by the participant holding it.
    ///
    /// With no election in flight the token must be a fresh origination. With
    /// one in flight it must be the forward of the pending token by its
    /// recipient. Only one election runs at a time.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the pending token untouched, if the token
    /// does not continue the ring walk.
    pub fn submit_election_token(&mut self, token: ElectionToken) -> Result<(), ElectionError> {
        let ring = self.ring();

        let Some(pending) = &self.election else {
            if self.dealer.is_some() {
                return Err(ElectionError::DealerPresent);
            }
            let priority = ring
                .priority_of(&token.originator)
                .ok_or(ElectionError::UnknownParticipant)?;
            if token.candidate_priority != priority {
                return Err(ElectionError::WrongPriority);
            }
            if ring.successor(&token.originator) != Some(token.next_recipient.as_str()) {
                return Err(ElectionError::WrongRecipient);
            }
            self.record(token);
            return Ok(());
        };

        if token.originator != pending.originator {
            return Err(ElectionError::AlreadyPending);
        }
        if pending.next_recipient == pending.originator {
            return Err(ElectionError::WrongRecipient);
        }
        if token.candidate_priority < pending.candidate_priority {
            return Err(ElectionError::CandidateRegressed);
        }

        let holder = pending.next_recipient.as_str();
        let holder_priority = ring
            .priority_of(holder)
            .ok_or(ElectionError::UnknownParticipant)?;
        if token.candidate_priority != pending.candidate_priority.max(holder_priority) {
            return Err(ElectionError::WrongPriority);
        }
        if ring.successor(holder) != Some(token.next_recipient.as_str()) {
            return Err(ElectionError::WrongRecipient);
        }

        self.record(token);
        Ok(())
    }

    /// Designates the winner once the token has returned to its originator.
    ///
    /// # Errors
    ///
    /// Returns an error if no election is in flight, the token has not come
    /// back yet, or `name` does not hold the winning priority.
    pub fn claim_dealership(&mut self, name: &str) -> Result<(), ElectionError> {
        let pending = self.election.as_ref().ok_or(ElectionError::NoPendingToken)?;
        if pending.next_recipient != pending.originator {
            return Err(ElectionError::RingIncomplete);
        }
        let participant = self
            .participants
            .get(name)
            .ok_or(ElectionError::UnknownParticipant)?;
        if participant.priority() != pending.candidate_priority {
            return Err(ElectionError::WrongPriority);
        }

        log::info!("{name} is the new dealer");
        self.election = None;
        self.dealer = Some(name.to_owned());
        self.message = format!("{name} is the new dealer.");
        Ok(())
    }

    /// Drops the pending token if its originator or holder has left the ring.
    ///
    /// Such a token can never return to its originator. Returns whether the
    /// token was dropped.
    pub(super) fn abandon_orphaned_election(&mut self) -> bool {
        let Some(pending) = &self.election else {
            return false;
        };
        let ring = self.ring();
        if ring.priority_of(&pending.originator).is_some()
            && ring.priority_of(&pending.next_recipient).is_some()
        {
            return false;
        }

        log::warn!(
            "election from {} abandoned, the token can no longer return",
            pending.originator
        );
        self.election = None;
        true
    }

    fn record(&mut self, token: ElectionToken) {
        log::debug!(
            "election token from {} for {} (candidate {})",
            token.originator,
            token.next_recipient,
            token.candidate_priority
        );
        if self.election.is_none() {
            log::info!("{} started a dealer election", token.originator);
        }
        self.election = Some(token);
    }
}
