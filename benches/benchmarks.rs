//! Benchmarks for the hot pure functions: oracle queries and tracker ETA
//! recomputation. Shape matches the teacher's `benches/benchmarks.rs`
//! (named functions, `criterion_group!`/`criterion_main!`).

use catan_brain::board::Board;
use catan_brain::model::{Game, Location, PieceKind, ScenarioOptions};
use catan_brain::oracle;
use catan_brain::trackers::{PlacementEvent, TrackerSet};
use catan_brain::DUMMY_CANCEL_SEAT;

fn standard_game() -> Game {
    let mut game = Game::new(Board::standard(2), ScenarioOptions::default());
    game.sit_down(0, "us");
    game.sit_down(1, "them");
    game.sit_down(2, "they");
    game
}

fn checking_every_potential_settlement(c: &mut criterion::Criterion) {
    let game = standard_game();
    c.bench_function("is_potential_settlement over every node", |b| {
        b.iter(|| {
            (0..game.board.node_count() as u16)
                .filter(|n| oracle::is_potential_settlement(&game, 0, *n))
                .count()
        })
    });
}

fn checking_every_potential_road(c: &mut criterion::Criterion) {
    let game = standard_game();
    c.bench_function("is_potential_road over every edge", |b| {
        b.iter(|| game.board.edges().filter(|e| oracle::is_potential_road(&game, 0, *e)).count())
    });
}

fn estimating_resource_rarity(c: &mut criterion::Criterion) {
    let game = standard_game();
    c.bench_function("estimate_resource_rarity over the whole board", |b| {
        b.iter(|| oracle::estimate_resource_rarity(&game))
    });
}

fn recomputing_tracker_etas_after_a_placement(c: &mut criterion::Criterion) {
    let game = standard_game();
    let node = game.board.nodes_of_hex(game.board.hexes().next().unwrap())[0];
    c.bench_function("TrackerSet::on_placement (3 seats, one settlement placed)", |b| {
        b.iter_batched(
            TrackerSet::new,
            |mut trackers| {
                let mut g = game.clone();
                g.apply_put_piece(0, Location::Node(node), PieceKind::Settlement);
                trackers.on_placement(
                    &g,
                    PlacementEvent::Placed { seat: 0, kind: PieceKind::Settlement, location: Location::Node(node) },
                );
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn building_a_fresh_plan(c: &mut criterion::Criterion) {
    let game = standard_game();
    let mut trackers = TrackerSet::new();
    trackers.on_placement(
        &game,
        PlacementEvent::Cancelled {
            seat: DUMMY_CANCEL_SEAT,
            kind: PieceKind::Road,
            location: Location::Edge((0, 0)),
        },
    );
    c.bench_function("planner::plan_stuff (Smart strategy)", |b| {
        b.iter(|| {
            catan_brain::planner::plan_stuff(&game, trackers.tracker(0), catan_brain::planner::Strategy::Smart)
        })
    });
}

criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(20)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        checking_every_potential_settlement,
        checking_every_potential_road,
        estimating_resource_rarity,
        recomputing_tracker_etas_after_a_placement,
        building_a_fresh_plan,
}
criterion::criterion_main!(benches);
