use crate::error::WagerError;
use crate::participant::Status;

use super::{Phase, Table};

impl Table {
    /// Places a wager, escrowing it from the participant's balance.
    ///
    /// Once every connected participant has wagered, the cards are dealt and
    /// the first turn begins.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is not taking wagers, the participant is
    /// unknown or already wagered, or the amount is zero or above the balance.
    pub fn place_wager(&mut self, name: &str, amount: usize, now: u64) -> Result<(), WagerError> {
        if self.phase != Phase::Wagering {
            return Err(WagerError::InvalidState);
        }

        let participant = self
            .participants
            .get_mut(name)
            .ok_or(WagerError::PlayerNotFound)?;

        if participant.status() != Status::AwaitingWager {
            return Err(WagerError::AlreadyWagered);
        }
        if amount == 0 {
            return Err(WagerError::ZeroWager);
        }
        if !participant.escrow(amount) {
            return Err(WagerError::InsufficientFunds);
        }

        log::info!("{name} wagers {amount}");
        self.wager_order.push(name.to_owned());
        self.try_deal(now);
        Ok(())
    }

    /// Returns whether every connected participant has wagered.
    fn all_wagers_in(&self) -> bool {
        let mut connected = self
            .participants
            .values()
            .filter(|participant| participant.is_connected())
            .peekable();
        connected.peek().is_some()
            && connected.all(|participant| participant.status() != Status::AwaitingWager)
    }

    /// Deals the round if every wager is in.
    pub(super) fn try_deal(&mut self, now: u64) {
        if self.phase != Phase::Wagering || !self.all_wagers_in() {
            return;
        }

        let order: Vec<String> = self
            .wager_order
            .iter()
            .filter(|name| self.participants.get(*name).is_some_and(|p| p.wager() > 0))
            .cloned()
            .collect();

        if order.is_empty() {
            log::info!("no wagers placed, restarting the round");
            self.reset_round(true);
            return;
        }

        self.deal(order, now);
    }

    /// Deals two cards each, one per pass, participants before the dealer.
    fn deal(&mut self, order: Vec<String>, now: u64) {
        self.round += 1;
        self.phase = Phase::Acting;
        self.turn_order = order;
        self.current_turn = 0;

        for _ in 0..2 {
            for name in &self.turn_order {
                let card = self.shoe.draw();
                if let Some(participant) = self.participants.get_mut(name) {
                    participant.receive(card);
                }
            }
            let card = self.shoe.draw();
            self.dealer_hand.add_card(card);
        }

        log::info!(
            "round {} dealt to {}",
            self.round,
            self.turn_order.join(", ")
        );
        self.message.clear();
        self.begin_turn(now);
    }
}
