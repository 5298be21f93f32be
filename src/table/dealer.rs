use crate::participant::Status;
use crate::result::{Outcome, ParticipantResult, RoundResult};

use super::{Effect, Phase, Table};

impl Table {
    /// Dealer plays out their hand, then the round is settled.
    ///
    /// The dealer reveals the hole card and draws while below
    /// [`SessionOptions::dealer_stands_at`](crate::SessionOptions). Nothing
    /// here waits on a participant, so no timer is involved.
    pub(super) fn resolve_dealer(&mut self) {
        self.dealer_hand.reveal_hole();
        while self.dealer_hand.value() < self.options.dealer_stands_at {
            let card = self.shoe.draw();
            self.dealer_hand.add_card(card);
        }
        log::info!(
            "dealer finishes on {} with {} cards",
            self.dealer_hand.value(),
            self.dealer_hand.len()
        );
        self.settle();
    }

    /// Compares every hand to the dealer's and pays out.
    ///
    /// Wagers were escrowed when placed, so a win credits twice the wager, a
    /// push returns it, and a loss or bust credits nothing.
    fn settle(&mut self) {
        let dealer_value = self.dealer_hand.value();
        let dealer_bust = self.dealer_hand.is_bust();
        let mut results = Vec::with_capacity(self.turn_order.len());

        for name in &self.turn_order {
            let Some(participant) = self.participants.get_mut(name) else {
                continue;
            };
            let wager = participant.wager();
            let value = participant.value();

            let (outcome, payout) = if participant.status() == Status::Busted {
                (Outcome::Bust, 0)
            } else if dealer_bust || value > dealer_value {
                (Outcome::Win, wager * 2)
            } else if value == dealer_value {
                (Outcome::Push, wager)
            } else {
                (Outcome::Lose, 0)
            };

            participant.credit(payout);
            results.push(ParticipantResult {
                name: name.clone(),
                outcome,
                wager,
                payout,
                value,
            });
        }

        let result = RoundResult {
            participants: results,
            dealer_value,
            dealer_bust,
        };
        self.message = result.message();
        log::info!("round {} settled: {}", self.round, self.message.trim_end());
        self.last_result = Some(result);
        self.phase = Phase::Payout;
        self.effects.push(Effect::ScheduleNewRound { round: self.round });
    }
}
