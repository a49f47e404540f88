//! demo Binary
//!
//! Plays a handful of robot brains against each other over an in-process
//! fake table. The real wire protocol and game engine are out of this
//! crate's scope, so this substitutes a minimal broadcast loop for a
//! real socket listener: it sits down every seat, round-robins the initial
//! placement phases, then lets each bot run its ordinary turn for a few
//! ticks before tearing everything down. It exists to exercise [`Actor`]
//! end to end, not to referee a legal game of Catan.

use catan_brain::board::Board;
use catan_brain::diagnostics::LogSink;
use catan_brain::model::{Location, Phase, PieceKind, ScenarioOptions};
use catan_brain::wire::{BrainConfig, Inbound, Outbound};
use catan_brain::{Actor, ActorHandle, TableContext, SeatId};
use clap::Parser;
use colored::Colorize;
use tokio::sync::mpsc::UnboundedReceiver;

/// CLI surface for the demo.
#[derive(Parser, Debug)]
#[command(author, version, about = "play robot brains against each other on a fake table")]
struct DemoArgs {
    #[command(flatten)]
    brain: BrainConfig,
    /// how many seats to fill, 2-6
    #[arg(long, default_value_t = 4)]
    players: u8,
    /// sets the six-player scenario option and the six-player pacing rule
    #[arg(long = "six-player", default_value_t = false)]
    six_player: bool,
}

struct Seat {
    handle: ActorHandle,
    outbox: UnboundedReceiver<Outbound>,
}

#[tokio::main]
async fn main() {
    catan_brain::init_logging();
    let args = DemoArgs::parse();
    let players = args.players.clamp(2, 6);

    let mut options = ScenarioOptions::default();
    options.six_player = args.six_player || players > 4;
    let table = TableContext { bot_only: true, six_player: options.six_player };

    let mut seats: Vec<Seat> = Vec::new();
    for seat in 0..players {
        let mut brain = catan_brain::brain::Brain::new(
            Board::standard(if options.six_player { 3 } else { 2 }),
            options,
            args.brain,
            Box::new(LogSink),
        );
        for other in 0..players {
            brain.game.sit_down(other, format!("bot-{other}"));
        }
        brain.game.my_seat = Some(seat);
        let (handle, outbox) = Actor::spawn(brain, table);
        seats.push(Seat { handle, outbox });
    }

    println!("{}", format!("seated {players} bots, starting initial placement").bold());
    run_initial_placement(&mut seats, players).await;
    run_a_few_turns(&mut seats, players).await;

    for seat in &seats {
        seat.handle.kill();
    }
    println!("{}", "demo finished".bold());
}

/// one pass of settlement+road for every seat, broadcasting each placement
/// back to every actor so trackers stay in sync the way a real server's
/// fan-out would.
async fn run_initial_placement(seats: &mut [Seat], players: u8) {
    for seat in 0..players {
        broadcast(seats, players, Inbound::GameState(Phase::InitSettle1a)).await;
        seats[seat as usize].handle.send(Inbound::Turn(seat)).await;
        if let Some(Outbound::PutPiece { location, kind }) = next_action(&mut seats[seat as usize]).await {
            log_action(seat, kind, &location);
            broadcast(seats, players, Inbound::PutPiece { seat, location, kind }).await;
        }

        broadcast(seats, players, Inbound::GameState(Phase::InitRoad1b)).await;
        if let Some(Outbound::PutPiece { location, kind }) = next_action(&mut seats[seat as usize]).await {
            log_action(seat, kind, &location);
            broadcast(seats, players, Inbound::PutPiece { seat, location, kind }).await;
        }
    }
}

/// a short, deliberately shallow `Play`-phase loop: each seat gets a turn,
/// a couple of ticks to let the driver act, then we move on. A real table
/// would keep going until someone reaches ten points; this is a demo.
async fn run_a_few_turns(seats: &mut [Seat], players: u8) {
    broadcast(seats, players, Inbound::GameState(Phase::Play)).await;
    for seat in 0..players {
        seats[seat as usize].handle.send(Inbound::Turn(seat)).await;
        for _ in 0..3 {
            seats[seat as usize].handle.send(Inbound::TimingPing).await;
            if let Ok(action) = seats[seat as usize].outbox.try_recv() {
                println!("  seat {seat} -> {action:?}");
                if matches!(action, Outbound::EndTurn) {
                    break;
                }
            }
        }
    }
}

async fn broadcast(seats: &mut [Seat], players: u8, msg: Inbound) {
    for seat in 0..players {
        seats[seat as usize].handle.send(msg.clone()).await;
    }
}

async fn next_action(seat: &mut Seat) -> Option<Outbound> {
    seat.outbox.recv().await
}

fn log_action(seat: SeatId, kind: PieceKind, location: &Location) {
    println!("  seat {seat} builds {kind:?} at {location:?}");
}
