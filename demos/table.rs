//! Terminal blackjack against two bots, all seated at one in-process session.
//!
//! Run with `RUST_LOG=info cargo run --example table` to watch the coordinator.

use core::time::Duration;
use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use bjcoord::{
    Client, Phase, Session, SessionOptions, Snapshot, Status, TurnAction, parse_wager,
    run_heartbeat,
};

const POLL: Duration = Duration::from_millis(250);
const HEARTBEAT: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() {
    env_logger::init();

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let session = match Session::start(SessionOptions::default(), seed) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    for name in ["dora", "hank"] {
        tokio::spawn(bot(session.clone(), name));
    }

    let name = prompt("Your name: ").await;
    let me = match Client::connect(session.clone(), &name).await {
        Ok(client) => client,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    keep_alive(&session, me.name());
    println!("Type 'q' at any prompt to leave.");

    let mut last_message = String::new();
    loop {
        let Ok(snapshot) = me.snapshot().await else {
            break;
        };
        if snapshot.message != last_message {
            render(&snapshot, me.name());
            last_message.clone_from(&snapshot.message);
        }
        let _ = me.relay_election(&snapshot).await;

        match snapshot.status_of(me.name()) {
            Some(Status::AwaitingWager) if snapshot.phase == Phase::Wagering => {
                let balance = snapshot.participant(me.name()).map_or(0, |view| view.balance);
                if balance == 0 {
                    println!("You are out of money. Game over.");
                    break;
                }
                let input = prompt(&format!("Wager (1-{balance}): ")).await;
                if input == "q" {
                    break;
                }
                let _ = me.wager(parse_wager(&input)).await;
            }
            Some(Status::ActingTurn) => {
                let left = me.time_remaining(&snapshot).unwrap_or_default().as_secs();
                let input = prompt(&format!("[{left}s] (h)it or (s)tand: ")).await;
                if input == "q" {
                    break;
                }
                let _ = match TurnAction::parse(&input) {
                    Some(TurnAction::Hit) => me.hit().await,
                    Some(TurnAction::Stand) => me.stand().await,
                    None => Ok(()),
                };
            }
            _ => tokio::time::sleep(POLL).await,
        }
    }
    println!("Goodbye.");
}

/// Plays basic dealer strategy: hit below 17.
async fn bot(session: Session, name: &'static str) {
    let Ok(client) = Client::connect(session.clone(), name).await else {
        return;
    };
    keep_alive(&session, name);

    loop {
        tokio::time::sleep(POLL).await;
        let Ok(snapshot) = client.snapshot().await else {
            return;
        };
        let _ = client.relay_election(&snapshot).await;

        let Some(view) = snapshot.participant(name) else {
            return;
        };
        let acted = match view.status {
            Status::AwaitingWager if snapshot.phase == Phase::Wagering && view.balance > 0 => {
                client.wager(view.balance.min(10)).await
            }
            Status::ActingTurn if view.value() < 17 => client.hit().await,
            Status::ActingTurn => client.stand().await,
            _ => Ok(()),
        };
        if acted.is_err() {
            return;
        }
    }
}

fn keep_alive(session: &Session, name: &str) {
    let session = session.clone();
    let name = name.to_owned();
    tokio::spawn(async move { run_heartbeat(&session, &name, HEARTBEAT).await });
}

fn render(snapshot: &Snapshot, me: &str) {
    println!();
    let dealer: Vec<String> = snapshot
        .dealer_hand
        .iter()
        .map(ToString::to_string)
        .collect();
    println!(
        "Dealer{}: {} ({})",
        snapshot
            .dealer
            .as_deref()
            .map_or_else(String::new, |name| format!(" [{name}]")),
        dealer.join(", "),
        snapshot.dealer_value()
    );
    for (name, view) in &snapshot.participants {
        let cards: Vec<String> = view.hand.iter().map(ToString::to_string).collect();
        let marker = if name == me { "*" } else { " " };
        println!(
            "{marker}{name}: {} ({}) balance {} wager {} {:?}",
            cards.join(", "),
            view.value(),
            view.balance,
            view.wager,
            view.status
        );
    }
    if !snapshot.message.is_empty() {
        println!("{}", snapshot.message);
    }
}

async fn prompt(label: &str) -> String {
    print!("{label}");
    let _ = io::stdout().flush();
    tokio::task::spawn_blocking(|| {
        let mut input = String::new();
        let _ = io::stdin().read_line(&mut input);
        input.trim().to_owned()
    })
    .await
    .unwrap_or_default()
}
