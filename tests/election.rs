//! Ring election, played out by the participants against the table.

use bjcoord::election::process;
use bjcoord::{
    ElectionError, ElectionStep, ElectionToken, Ring, SessionOptions, Table,
};

const NAMES: [&str; 4] = ["ana", "ben", "cat", "dan"];

fn table_of(names: &[&str]) -> Table {
    let mut table = Table::new(SessionOptions::default().with_auto_election(false), 3);
    for name in names {
        table.join(name, 0).unwrap();
    }
    table
}

/// Lets every participant look at the table until nobody holds the token.
/// Returns the recipients in the order they acted.
fn relay(table: &mut Table, names: &[&str]) -> Vec<String> {
    let mut visited = Vec::new();
    for _ in 0..=names.len() * 2 {
        let snapshot = table.snapshot(0);
        let mut steps = names
            .iter()
            .filter_map(|name| process(name, &snapshot).map(|step| (*name, step)));
        let Some((holder, step)) = steps.next() else {
            break;
        };
        assert!(steps.next().is_none(), "the token has a single recipient");

        visited.push(holder.to_owned());
        match step {
            ElectionStep::Forward(token) => table.submit_election_token(token).unwrap(),
            ElectionStep::Claim(winner) => table.claim_dealership(&winner).unwrap(),
        }
    }
    visited
}

#[test]
fn ring_orders_by_priority_and_wraps() {
    let ring = Ring::new([("dan", 4), ("ana", 1), ("cat", 3), ("ben", 2)]);
    assert_eq!(ring.names().collect::<Vec<_>>(), NAMES);
    assert_eq!(ring.successor("ben"), Some("cat"));
    assert_eq!(ring.successor("dan"), Some("ana"));
    assert_eq!(ring.successor("eve"), None);
    assert_eq!(ring.first(), Some("ana"));

    let alone = Ring::new([("ana", 1)]);
    assert_eq!(alone.successor("ana"), Some("ana"));
}

#[test]
fn highest_priority_wins_a_full_circuit() {
    let mut table = table_of(&NAMES);
    let ring = Ring::from_snapshot(&table.snapshot(0));
    let token = ring.originate("ben").unwrap();
    assert_eq!(
        token,
        ElectionToken {
            candidate_priority: 2,
            originator: "ben".to_owned(),
            next_recipient: "cat".to_owned(),
        }
    );
    table.submit_election_token(token).unwrap();

    let visited = relay(&mut table, &NAMES);

    assert_eq!(visited, ["cat", "dan", "ana", "ben"]);
    assert_eq!(table.dealer(), Some("dan"));
    assert_eq!(table.election(), None);
    assert_eq!(table.message(), "dan is the new dealer.");
}

#[test]
fn candidate_never_regresses_on_the_way_round() {
    let mut table = table_of(&NAMES);
    table
        .submit_election_token(Ring::from_snapshot(&table.snapshot(0)).originate("ben").unwrap())
        .unwrap();

    let mut seen = Vec::new();
    while let Some(token) = table.election().cloned() {
        seen.push(token.candidate_priority);
        let snapshot = table.snapshot(0);
        let step = process(&token.next_recipient, &snapshot).unwrap();
        match step {
            ElectionStep::Forward(token) => table.submit_election_token(token).unwrap(),
            ElectionStep::Claim(winner) => table.claim_dealership(&winner).unwrap(),
        }
    }
    assert_eq!(seen, [2, 3, 4, 4]);
}

#[test]
fn single_participant_elects_itself() {
    let mut table = table_of(&["ana"]);
    let token = table.trigger_election().unwrap();
    assert_eq!(token.next_recipient, "ana");

    assert_eq!(relay(&mut table, &["ana"]), ["ana"]);
    assert_eq!(table.dealer(), Some("ana"));
    assert_eq!(
        table.trigger_election().unwrap_err(),
        ElectionError::DealerPresent
    );
}

#[test]
fn concurrent_origination_is_ignored() {
    let mut table = table_of(&NAMES);
    let ring = Ring::from_snapshot(&table.snapshot(0));
    let first = ring.originate("ben").unwrap();
    table.submit_election_token(first.clone()).unwrap();

    assert_eq!(
        table
            .submit_election_token(ring.originate("dan").unwrap())
            .unwrap_err(),
        ElectionError::AlreadyPending
    );
    assert_eq!(
        table.trigger_election().unwrap_err(),
        ElectionError::AlreadyPending
    );
    assert_eq!(table.election(), Some(&first));
}

#[test]
fn malformed_tokens_are_rejected() {
    let mut table = table_of(&NAMES);
    let bad_origin = ElectionToken {
        candidate_priority: 4,
        originator: "ben".to_owned(),
        next_recipient: "cat".to_owned(),
    };
    assert_eq!(
        table.submit_election_token(bad_origin).unwrap_err(),
        ElectionError::WrongPriority
    );

    table
        .submit_election_token(ElectionToken {
            candidate_priority: 2,
            originator: "ben".to_owned(),
            next_recipient: "cat".to_owned(),
        })
        .unwrap();

    let skipped = ElectionToken {
        candidate_priority: 3,
        originator: "ben".to_owned(),
        next_recipient: "ana".to_owned(),
    };
    assert_eq!(
        table.submit_election_token(skipped).unwrap_err(),
        ElectionError::WrongRecipient
    );
    let regressed = ElectionToken {
        candidate_priority: 1,
        originator: "ben".to_owned(),
        next_recipient: "dan".to_owned(),
    };
    assert_eq!(
        table.submit_election_token(regressed).unwrap_err(),
        ElectionError::CandidateRegressed
    );
    assert_eq!(
        table.claim_dealership("dan").unwrap_err(),
        ElectionError::RingIncomplete
    );
    assert_eq!(table.election().unwrap().next_recipient, "cat");
}

#[test]
fn claim_must_match_the_winning_priority() {
    let mut table = table_of(&["ana", "ben"]);
    table.trigger_election().unwrap();
    let snapshot = table.snapshot(0);
    let Some(ElectionStep::Forward(token)) = process("ben", &snapshot) else {
        panic!("ben holds the token");
    };
    assert!(process("ana", &snapshot).is_none());
    table.submit_election_token(token).unwrap();

    assert_eq!(
        table.claim_dealership("ana").unwrap_err(),
        ElectionError::WrongPriority
    );
    table.claim_dealership("ben").unwrap();
    assert_eq!(table.dealer(), Some("ben"));
}

#[test]
fn disconnected_participants_are_left_out_of_the_ring() {
    let mut table = table_of(&NAMES);
    for name in ["ana", "ben", "cat"] {
        table.heartbeat(name, 20_000);
    }
    table.sweep(20_000);
    assert!(!table.participant("dan").unwrap().is_connected());

    let snapshot = table.snapshot(20_000);
    let ring = Ring::from_snapshot(&snapshot);
    assert_eq!(ring.names().collect::<Vec<_>>(), ["ana", "ben", "cat"]);
    assert_eq!(ring.successor("cat"), Some("ana"));

    table.trigger_election().unwrap();
    relay(&mut table, &NAMES);
    assert_eq!(table.dealer(), Some("cat"));
}

#[test]
fn silent_dealer_loses_the_designation() {
    let mut table = Table::new(SessionOptions::default(), 3);
    for name in NAMES {
        table.join(name, 0).unwrap();
    }

    table.sweep(1_000);
    assert!(table.election().is_some(), "no dealer starts an election");
    relay(&mut table, &NAMES);
    assert_eq!(table.dealer(), Some("dan"));

    for name in ["ana", "ben", "cat"] {
        table.heartbeat(name, 20_000);
    }
    table.sweep(20_000);

    assert_eq!(table.dealer(), None);
    let token = table.election().unwrap();
    assert_eq!(token.originator, "ana");
    relay(&mut table, &NAMES);
    assert_eq!(table.dealer(), Some("cat"));
}

#[test]
fn election_is_abandoned_when_its_originator_goes_silent() {
    let mut table = table_of(&NAMES);
    table.trigger_election().unwrap();
    let Some(ElectionStep::Forward(token)) = process("ben", &table.snapshot(0)) else {
        panic!("ben holds the token");
    };
    table.submit_election_token(token).unwrap();
    assert_eq!(table.election().unwrap().next_recipient, "cat");

    for name in ["ben", "cat", "dan"] {
        table.heartbeat(name, 20_000);
    }
    table.sweep(20_000);
    assert!(!table.participant("ana").unwrap().is_connected());
    assert_eq!(table.election(), None);

    table.trigger_election().unwrap();
    assert_eq!(table.election().unwrap().originator, "ben");
    assert_eq!(relay(&mut table, &NAMES), ["cat", "dan", "ben"]);
    assert_eq!(table.dealer(), Some("dan"));
}

#[test]
fn silent_recipient_makes_way_for_a_new_election() {
    let mut table = Table::new(SessionOptions::default(), 3);
    for name in NAMES {
        table.join(name, 0).unwrap();
    }
    table.sweep(1_000);
    assert_eq!(table.election().unwrap().next_recipient, "ben");

    for name in ["ana", "cat", "dan"] {
        table.heartbeat(name, 20_000);
    }
    table.sweep(20_000);

    let token = table.election().unwrap();
    assert_eq!(token.originator, "ana");
    assert_eq!(token.next_recipient, "cat");
    assert_eq!(relay(&mut table, &NAMES), ["cat", "dan", "ana"]);
    assert_eq!(table.dealer(), Some("dan"));
}
