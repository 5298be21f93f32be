use core::fmt::Write;

use crate::card::Card;
use crate::error::TurnError;
use crate::participant::Status;

use super::{Effect, Phase, Table};

impl Table {
    fn ensure_turn(&self, name: &str) -> Result<(), TurnError> {
        if self.phase != Phase::Acting {
            return Err(TurnError::InvalidState);
        }
        if self.current_player() != Some(name) {
            return Err(TurnError::NotYourTurn);
        }
        Ok(())
    }

    /// Supersedes whatever timer is armed for the current turn.
    fn supersede_timer(&mut self) {
        self.turn_generation += 1;
        self.turn_deadline = None;
        self.effects.push(Effect::CancelTurnTimer);
    }

    /// Arms a fresh turn timer for the current participant.
    fn arm_timer(&mut self, name: String, now: u64) {
        self.turn_generation += 1;
        let window = self.options.turn_timeout.as_millis() as u64;
        self.turn_deadline = Some(now.saturating_add(window));
        self.effects.push(Effect::ArmTurnTimer {
            name,
            generation: self.turn_generation,
        });
    }

    /// Hands the turn to `turn_order[current_turn]`, or to the dealer if
    /// everybody has acted.
    pub(super) fn begin_turn(&mut self, now: u64) {
        let Some(name) = self.turn_order.get(self.current_turn).cloned() else {
            self.turn_deadline = None;
            self.phase = Phase::DealerResolving;
            self.resolve_dealer();
            return;
        };

        if let Some(participant) = self.participants.get_mut(&name) {
            participant.set_status(Status::ActingTurn);
        }
        let _ = write!(self.message, "It's {name}'s turn.");
        self.arm_timer(name, now);
    }

    /// Moves past the participant who just finished.
    ///
    /// The caller has already set their final status.
    fn advance_turn(&mut self, now: u64) {
        self.current_turn += 1;
        self.begin_turn(now);
    }

    /// Participant action: draw one card.
    ///
    /// Busting ends the turn; otherwise the turn timer restarts.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is not in the acting phase or it is not
    /// this participant's turn.
    pub fn hit(&mut self, name: &str, now: u64) -> Result<Card, TurnError> {
        self.ensure_turn(name)?;
        self.supersede_timer();

        let card = self.shoe.draw();
        let busted = self
            .participants
            .get_mut(name)
            .is_some_and(|participant| participant.receive(card));

        if busted {
            log::info!("{name} drew {card} and busted");
            self.end_turn(name, Status::Busted, format!("{name} busted! "), now);
        } else {
            log::debug!("{name} drew {card}");
            self.message = format!("{name} hits. ");
            self.arm_timer(name.to_owned(), now);
        }

        Ok(card)
    }

    /// Participant action: end the turn keeping the current hand.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is not in the acting phase or it is not
    /// this participant's turn.
    pub fn stand(&mut self, name: &str, now: u64) -> Result<(), TurnError> {
        self.ensure_turn(name)?;
        self.supersede_timer();
        log::debug!("{name} stands");
        self.end_turn(name, Status::Standing, format!("{name} stands. "), now);
        Ok(())
    }

    /// A turn timer armed at `generation` has run out.
    ///
    /// Forces the same stand a participant could have chosen, provided the
    /// turn the timer was armed for is still in progress.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the table untouched, if it is no longer this
    /// participant's turn or the turn has been superseded since the timer was
    /// armed.
    pub fn expire_turn(&mut self, name: &str, generation: u64, now: u64) -> Result<(), TurnError> {
        self.ensure_turn(name)?;
        if generation != self.turn_generation {
            return Err(TurnError::StaleTimer);
        }

        self.supersede_timer();
        log::warn!("{name} ran out of time, forcing stand");
        self.end_turn(
            name,
            Status::Standing,
            format!("{name} ran out of time and stands. "),
            now,
        );
        Ok(())
    }

    fn end_turn(&mut self, name: &str, status: Status, note: String, now: u64) {
        if let Some(participant) = self.participants.get_mut(name) {
            participant.set_status(status);
        }
        self.message = note;
        self.advance_turn(now);
    }
}
