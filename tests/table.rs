//! State machine tests driven directly against `Table`.

use std::collections::HashSet;

use bjcoord::{
    Card, DECK_SIZE, Effect, JoinError, MAX_SEATS, Outcome, Phase, RejoinPolicy, SessionOptions,
    Status, Suit, Table, TurnError, VisibleCard, WagerError, hand_value, parse_wager,
};

const fn card(suit: Suit, rank: u8) -> Card {
    Card::new(suit, rank)
}

fn options() -> SessionOptions {
    SessionOptions::default().with_auto_election(false)
}

fn seated(names: &[&str]) -> Table {
    let mut table = Table::new(options(), 7);
    for name in names {
        table.join(name, 0).unwrap();
    }
    table
}

fn assert_census_whole(table: &Table) {
    let (deck, live, discard) = table.card_census();
    assert_eq!(deck + live + discard, DECK_SIZE);
    let unique: HashSet<Card> = table
        .live_cards()
        .into_iter()
        .chain(table.off_table_cards())
        .collect();
    assert_eq!(unique.len(), DECK_SIZE);
}

fn armed_generation(table: &mut Table) -> u64 {
    table
        .drain_effects()
        .into_iter()
        .rev()
        .find_map(|effect| match effect {
            Effect::ArmTurnTimer { generation, .. } => Some(generation),
            _ => None,
        })
        .expect("a turn timer was armed")
}

fn assert_single_actor(table: &Table) {
    let acting: Vec<&str> = table
        .turn_order()
        .iter()
        .map(String::as_str)
        .filter(|name| table.status_of(name) == Some(Status::ActingTurn))
        .collect();
    assert_eq!(acting.len(), 1, "exactly one participant acts");
    assert_eq!(
        Some(acting[0]),
        table.turn_order().get(table.current_turn_index()).map(String::as_str)
    );
}

#[test]
fn soft_aces_are_counted_once() {
    let aces_and_nine = [
        card(Suit::Hearts, 1),
        card(Suit::Spades, 1),
        card(Suit::Clubs, 9),
    ];
    assert_eq!(hand_value(&aces_and_nine), 21);
    assert_eq!(hand_value(&[]), 0);
    assert_eq!(
        hand_value(&[card(Suit::Hearts, 1), card(Suit::Clubs, 13)]),
        21
    );
    assert_eq!(
        hand_value(&[
            card(Suit::Hearts, 1),
            card(Suit::Clubs, 6),
            card(Suit::Spades, 10)
        ]),
        17
    );
    assert_eq!(
        hand_value(&[
            card(Suit::Hearts, 13),
            card(Suit::Clubs, 12),
            card(Suit::Spades, 2)
        ]),
        22
    );
}

#[test]
fn wager_above_balance_is_rejected() {
    let mut table = Table::new(options().with_starting_balance(100), 1);
    table.join("alice", 0).unwrap();

    assert_eq!(
        table.place_wager("alice", 150, 0).unwrap_err(),
        WagerError::InsufficientFunds
    );
    assert_eq!(
        table.place_wager("alice", parse_wager("lots"), 0).unwrap_err(),
        WagerError::ZeroWager
    );
    assert_eq!(
        table.place_wager("mallory", 10, 0).unwrap_err(),
        WagerError::PlayerNotFound
    );

    let alice = table.participant("alice").unwrap();
    assert_eq!(alice.balance(), 100);
    assert_eq!(alice.wager(), 0);
    assert_eq!(alice.status(), Status::AwaitingWager);
    assert_eq!(table.phase(), Phase::Wagering);
}

#[test]
fn wagers_are_escrowed_and_deal_waits_for_everyone() {
    let mut table = seated(&["alice", "bob"]);

    table.place_wager("alice", 100, 0).unwrap();
    assert_eq!(table.participant("alice").unwrap().balance(), 900);
    assert_eq!(table.status_of("alice"), Some(Status::AwaitingTurn));
    assert_eq!(table.phase(), Phase::Wagering);
    assert_eq!(
        table.place_wager("alice", 10, 0).unwrap_err(),
        WagerError::AlreadyWagered
    );

    table.place_wager("bob", 50, 0).unwrap();
    assert_eq!(table.phase(), Phase::Acting);
    assert_eq!(
        table.place_wager("bob", 50, 0).unwrap_err(),
        WagerError::InvalidState
    );
}

#[test]
fn deal_alternates_and_follows_wager_order() {
    let mut table = seated(&["alice", "bob"]);
    let draws = [
        card(Suit::Hearts, 2),
        card(Suit::Hearts, 3),
        card(Suit::Hearts, 4),
        card(Suit::Clubs, 5),
        card(Suit::Clubs, 6),
        card(Suit::Clubs, 7),
    ];
    assert!(table.stack_deck(&draws));

    table.place_wager("bob", 10, 0).unwrap();
    table.place_wager("alice", 10, 0).unwrap();

    assert_eq!(table.turn_order(), ["bob", "alice"]);
    assert_eq!(table.participant("bob").unwrap().hand(), [draws[0], draws[3]]);
    assert_eq!(
        table.participant("alice").unwrap().hand(),
        [draws[1], draws[4]]
    );
    assert_eq!(table.dealer_hand().cards(), [draws[2], draws[5]]);
    assert_eq!(table.current_player(), Some("bob"));
    assert_single_actor(&table);
    assert!(table.turn_deadline().is_some());
}

#[test]
fn only_the_current_participant_may_act() {
    let mut table = seated(&["alice", "bob"]);
    table.place_wager("alice", 10, 0).unwrap();

    assert_eq!(table.hit("alice", 0).unwrap_err(), TurnError::InvalidState);

    table.place_wager("bob", 10, 0).unwrap();
    let generation = table.turn_generation();
    assert_eq!(table.hit("bob", 0).unwrap_err(), TurnError::NotYourTurn);
    assert_eq!(table.stand("bob", 0).unwrap_err(), TurnError::NotYourTurn);
    assert_eq!(table.turn_generation(), generation);
    assert_eq!(table.current_player(), Some("alice"));
}

#[test]
fn turn_passes_in_order_until_the_dealer_plays() {
    let mut table = seated(&["alice", "bob", "carol"]);
    assert!(table.stack_deck(&[
        card(Suit::Hearts, 10),
        card(Suit::Clubs, 10),
        card(Suit::Spades, 10),
        card(Suit::Diamonds, 10),
        card(Suit::Hearts, 8),
        card(Suit::Clubs, 8),
        card(Suit::Spades, 8),
        card(Suit::Diamonds, 8),
    ]));
    for name in ["alice", "bob", "carol"] {
        table.place_wager(name, 10, 0).unwrap();
    }

    for name in ["alice", "bob", "carol"] {
        assert_eq!(table.phase(), Phase::Acting);
        assert_single_actor(&table);
        assert_eq!(table.current_player(), Some(name));
        table.stand(name, 0).unwrap();
        assert_eq!(table.status_of(name), Some(Status::Standing));
    }

    assert_eq!(table.phase(), Phase::Payout);
    assert_eq!(table.turn_deadline(), None);
    assert_eq!(table.current_player(), None);
    let result = table.last_result().unwrap();
    assert!(result.participants.iter().all(|r| r.outcome == Outcome::Push));
    assert_eq!(table.participant("bob").unwrap().balance(), 1000);
}

#[test]
fn hit_rearms_the_timer_and_bust_moves_on() {
    let mut table = seated(&["alice", "bob"]);
    assert!(table.stack_deck(&[
        card(Suit::Hearts, 10),
        card(Suit::Clubs, 9),
        card(Suit::Spades, 10),
        card(Suit::Hearts, 6),
        card(Suit::Clubs, 8),
        card(Suit::Spades, 7),
        card(Suit::Diamonds, 2),  // alice hit
        card(Suit::Diamonds, 13), // alice hit, bust
    ]));
    table.place_wager("alice", 10, 0).unwrap();
    table.place_wager("bob", 10, 0).unwrap();
    let first = armed_generation(&mut table);

    let drawn = table.hit("alice", 1_000).unwrap();
    assert_eq!(drawn, card(Suit::Diamonds, 2));
    let rearmed = armed_generation(&mut table);
    assert!(rearmed > first);
    assert_eq!(table.status_of("alice"), Some(Status::ActingTurn));
    assert_eq!(table.turn_deadline(), Some(31_000));

    table.hit("alice", 2_000).unwrap();
    assert_eq!(table.status_of("alice"), Some(Status::Busted));
    assert_eq!(table.current_player(), Some("bob"));
    assert!(table.message().starts_with("alice busted!"));
    assert!(table.message().contains("bob's turn"));
    assert_single_actor(&table);
}

#[test]
fn stale_timer_has_no_effect_and_turns_never_double_advance() {
    let mut table = seated(&["alice", "bob"]);
    assert!(table.stack_deck(&[
        card(Suit::Hearts, 5),
        card(Suit::Clubs, 9),
        card(Suit::Spades, 10),
        card(Suit::Hearts, 6),
        card(Suit::Clubs, 8),
        card(Suit::Spades, 7),
        card(Suit::Diamonds, 2),
    ]));
    table.place_wager("alice", 10, 0).unwrap();
    table.place_wager("bob", 10, 0).unwrap();
    let armed_at_deal = armed_generation(&mut table);

    table.hit("alice", 1_000).unwrap();
    let after_hit = table.turn_generation();
    assert!(after_hit > armed_at_deal);

    let before = table.snapshot(5_000);
    assert_eq!(
        table.expire_turn("alice", armed_at_deal, 5_000).unwrap_err(),
        TurnError::StaleTimer
    );
    assert_eq!(table.snapshot(5_000), before);
    assert_eq!(table.turn_generation(), after_hit);

    // Manual stand and the live timer race: whichever lands second is dropped.
    let live = armed_generation(&mut table);
    table.stand("alice", 6_000).unwrap();
    assert_eq!(table.current_turn_index(), 1);
    assert!(table.expire_turn("alice", live, 6_001).is_err());
    assert_eq!(table.current_turn_index(), 1);
    assert_eq!(table.current_player(), Some("bob"));
    assert_single_actor(&table);
}

#[test]
fn live_timer_forces_a_stand() {
    let mut table = seated(&["alice", "bob"]);
    table.place_wager("alice", 10, 0).unwrap();
    table.place_wager("bob", 10, 0).unwrap();
    let generation = armed_generation(&mut table);

    table.expire_turn("alice", generation, 30_000).unwrap();

    assert_eq!(table.status_of("alice"), Some(Status::Standing));
    assert_eq!(table.current_player(), Some("bob"));
    assert!(table.message().contains("alice ran out of time"));
    assert!(table.turn_generation() > generation);
    assert_eq!(
        table.expire_turn("alice", table.turn_generation(), 30_001).unwrap_err(),
        TurnError::NotYourTurn
    );
}

#[test]
fn payout_for_a_win_and_a_bust() {
    let mut table = seated(&["alice", "bob"]);
    assert!(table.stack_deck(&[
        card(Suit::Hearts, 10),   // alice
        card(Suit::Clubs, 10),    // bob
        card(Suit::Diamonds, 10), // dealer up
        card(Suit::Hearts, 12),   // alice: 20
        card(Suit::Clubs, 6),     // bob: 16
        card(Suit::Diamonds, 9),  // dealer hole: 19
        card(Suit::Spades, 13),   // bob hits: 26
    ]));
    table.place_wager("alice", 100, 0).unwrap();
    table.place_wager("bob", 50, 0).unwrap();

    table.stand("alice", 0).unwrap();
    table.hit("bob", 0).unwrap();

    assert_eq!(table.phase(), Phase::Payout);
    assert_eq!(table.dealer_hand().value(), 19);
    assert_eq!(table.participant("alice").unwrap().balance(), 1100);
    assert_eq!(table.participant("bob").unwrap().balance(), 950);
    assert_eq!(table.message(), "Dealer has 19. alice wins! bob busted. ");

    let result = table.last_result().unwrap();
    assert_eq!(result.get("alice").unwrap().outcome, Outcome::Win);
    assert_eq!(result.get("alice").unwrap().payout, 200);
    assert_eq!(result.get("bob").unwrap().outcome, Outcome::Bust);
    assert!(table
        .drain_effects()
        .contains(&Effect::ScheduleNewRound { round: 1 }));
}

#[test]
fn dealer_draws_to_seventeen_and_push_returns_the_wager() {
    let mut table = seated(&["alice"]);
    assert!(table.stack_deck(&[
        card(Suit::Hearts, 10),  // alice
        card(Suit::Clubs, 10),   // dealer up
        card(Suit::Hearts, 8),   // alice: 18
        card(Suit::Clubs, 4),    // dealer hole: 14
        card(Suit::Spades, 4),   // dealer draws: 18
    ]));
    table.place_wager("alice", 40, 0).unwrap();
    table.stand("alice", 0).unwrap();

    assert_eq!(table.dealer_hand().len(), 3);
    assert_eq!(table.participant("alice").unwrap().balance(), 1000);
    assert_eq!(table.message(), "Dealer has 18. alice pushes. ");
}

#[test]
fn dealer_hole_card_stays_hidden_until_resolution() {
    let hole = card(Suit::Spades, 13);
    let mut table = seated(&["alice"]);
    assert!(table.stack_deck(&[
        card(Suit::Hearts, 10),
        card(Suit::Clubs, 7),
        card(Suit::Hearts, 9),
        hole,
    ]));

    assert!(table.snapshot(0).dealer_hand.is_empty());
    table.place_wager("alice", 10, 0).unwrap();

    let snapshot = table.snapshot(0);
    assert_eq!(
        snapshot.dealer_hand,
        [VisibleCard::Up(card(Suit::Clubs, 7)), VisibleCard::Hidden]
    );
    assert_eq!(snapshot.dealer_value(), 7);
    assert_eq!(snapshot.current_turn.as_deref(), Some("alice"));
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(!json.contains(r#"{"suit":"Spades","rank":13}"#));
    assert_eq!(
        serde_json::from_str::<bjcoord::Snapshot>(&json).unwrap(),
        snapshot
    );

    table.stand("alice", 0).unwrap();
    let snapshot = table.snapshot(0);
    assert_eq!(snapshot.phase, Phase::Payout);
    assert_eq!(snapshot.dealer_hand[1], VisibleCard::Up(hole));
    assert_eq!(snapshot.current_turn, None);
}

#[test]
fn new_round_resets_participants_and_ignores_stale_restarts() {
    let mut table = seated(&["alice"]);
    table.place_wager("alice", 10, 0).unwrap();
    table.stand("alice", 0).unwrap();
    assert_eq!(table.phase(), Phase::Payout);

    assert!(!table.start_new_round(table.round() + 1));
    assert_eq!(table.phase(), Phase::Payout);

    assert!(table.start_new_round(table.round()));
    assert_eq!(table.phase(), Phase::Wagering);
    let alice = table.participant("alice").unwrap();
    assert_eq!(alice.status(), Status::AwaitingWager);
    assert!(alice.hand().is_empty());
    assert_eq!(alice.wager(), 0);
    assert!(table.dealer_hand().is_empty());
    assert_eq!(table.message(), "New round started. Please place your bets!");

    assert!(!table.start_new_round(table.round()));
}

#[test]
fn deck_integrity_holds_across_many_rounds() {
    let names = ["alice", "bob", "carol"];
    let mut table = seated(&names);

    for _ in 0..40 {
        for name in names {
            table.place_wager(name, 5, 0).unwrap();
        }
        while table.phase() == Phase::Acting {
            let name = table.current_player().unwrap().to_owned();
            if table.participant(&name).unwrap().value() < 17 {
                table.hit(&name, 0).unwrap();
            } else {
                table.stand(&name, 0).unwrap();
            }
        }
        assert_eq!(table.phase(), Phase::Payout);

        assert_census_whole(&table);

        assert!(table.start_new_round(table.round()));
        let (deck, live, discard) = table.card_census();
        assert_eq!(live, 0);
        assert_eq!(deck + discard, DECK_SIZE);
        assert!(deck >= table.options().reshuffle_threshold);
    }
}

#[test]
fn rejoin_follows_the_configured_policy() {
    let mut table = Table::new(options(), 1);
    assert!(table.join("alice", 0).unwrap().starts_with("Welcome"));
    assert!(table.join("alice", 5).unwrap().starts_with("Welcome back"));
    assert_eq!(table.participant_count(), 1);
    assert_eq!(table.participant("alice").unwrap().priority(), 1);
    assert_eq!(table.join("  ", 0).unwrap_err(), JoinError::EmptyName);

    let mut strict = Table::new(options().with_rejoin(RejoinPolicy::Reject), 1);
    strict.join("alice", 0).unwrap();
    assert_eq!(strict.join("alice", 0).unwrap_err(), JoinError::NameTaken);

    strict.join("bob", 0).unwrap();
    assert_eq!(strict.snapshot(0).priorities["bob"], 2);
}

#[test]
fn silent_participants_are_not_waited_for() {
    let mut table = Table::new(options(), 1);
    table.join("alice", 0).unwrap();
    table.join("bob", 0).unwrap();
    table.place_wager("bob", 10, 1_000).unwrap();
    assert_eq!(table.phase(), Phase::Wagering);

    assert!(table.heartbeat("bob", 14_000));
    assert!(!table.heartbeat("mallory", 14_000));
    table.sweep(15_500);

    assert!(!table.participant("alice").unwrap().is_connected());
    assert!(table.participant("bob").unwrap().is_connected());
    assert_eq!(table.phase(), Phase::Acting);
    assert_eq!(table.turn_order(), ["bob"]);

    assert!(table.join("alice", 16_000).unwrap().starts_with("Welcome back"));
    assert!(table.participant("alice").unwrap().is_connected());
}

#[test]
fn stacking_keeps_the_census_and_waits_for_an_empty_table() {
    let mut table = seated(&["alice"]);
    assert!(table.stack_deck(&[
        card(Suit::Hearts, 10),
        card(Suit::Clubs, 7),
        card(Suit::Hearts, 9),
        card(Suit::Spades, 13),
    ]));
    assert_eq!(table.card_census(), (DECK_SIZE, 0, 0));

    table.place_wager("alice", 10, 0).unwrap();
    let hand = table.participant("alice").unwrap().hand().to_vec();
    assert!(!table.stack_deck(&[card(Suit::Hearts, 2)]));
    assert_eq!(table.participant("alice").unwrap().hand(), hand);
    assert_census_whole(&table);

    table.hit("alice", 0).unwrap();
    assert_census_whole(&table);
    if table.phase() == Phase::Acting {
        table.stand("alice", 0).unwrap();
    }
    assert_census_whole(&table);
}

#[test]
fn seating_stops_at_the_cap() {
    let mut table = Table::new(options(), 1);
    for seat in 0..MAX_SEATS {
        table.join(&format!("p{seat}"), 0).unwrap();
    }

    assert_eq!(table.join("late", 0).unwrap_err(), JoinError::TableFull);
    assert_eq!(table.participant_count(), MAX_SEATS);
    assert!(table.join("p3", 5).unwrap().starts_with("Welcome back"));
}

#[test]
fn full_table_of_greedy_hitters_never_runs_out_of_cards() {
    let names: Vec<String> = (0..MAX_SEATS).map(|seat| format!("p{seat}")).collect();
    let mut table = Table::new(options(), 99);
    for name in &names {
        table.join(name, 0).unwrap();
    }

    for _ in 0..30 {
        for name in &names {
            table.place_wager(name, 5, 0).unwrap();
        }
        while table.phase() == Phase::Acting {
            let name = table.current_player().unwrap().to_owned();
            if table.participant(&name).unwrap().value() < 21 {
                table.hit(&name, 0).unwrap();
            } else {
                table.stand(&name, 0).unwrap();
            }
            assert_census_whole(&table);
        }
        assert_eq!(table.phase(), Phase::Payout);
        assert_census_whole(&table);
        assert!(table.start_new_round(table.round()));
    }
}
