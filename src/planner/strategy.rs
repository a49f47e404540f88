//! `plan_stuff(strategy)`: ranks a tracker's currently-legal possible
//! pieces into a fresh [`BuildingPlan`]. `Strategy` is a replaceable
//! heuristic profile — precise play strength is not a correctness property;
//! what's tested is that the plan only ever contains currently-legal
//! pieces, ordered by the strategy's notion of decreasing value.

use super::plan::BuildingPlan;
use crate::model::Game;
use crate::oracle;
use crate::trackers::{PossibleKind, PossiblePiece, Tracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// prioritizes low ETA above all else
    Fast,
    /// weighs piece value (city > settlement > road/ship) and threat
    /// pressure more heavily than raw speed
    Smart,
}

pub fn plan_stuff(game: &Game, tracker: &Tracker, strategy: Strategy) -> BuildingPlan {
    let mut scored: Vec<(PossibleKind, f32)> = tracker
        .all()
        .filter(|p| is_currently_legal(game, p))
        .map(|p| (p.kind, value_of(p, strategy)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let mut plan = BuildingPlan::default();
    plan.replace(scored.into_iter().map(|(kind, _)| kind).collect());
    plan
}

fn is_currently_legal(game: &Game, p: &PossiblePiece) -> bool {
    match p.kind {
        PossibleKind::Road(e) => oracle::is_potential_road(game, p.owner, e),
        PossibleKind::Ship(e) => oracle::is_potential_ship(game, p.owner, e),
        PossibleKind::Settlement(n) => oracle::is_potential_settlement(game, p.owner, n),
        PossibleKind::City(n) => oracle::is_potential_city(game, p.owner, n),
        PossibleKind::BuyDevCard | PossibleKind::PickSpecialItem => true,
    }
}

fn value_of(p: &PossiblePiece, strategy: Strategy) -> f32 {
    let eta_term = -(p.eta as f32);
    let kind_term = match p.kind {
        PossibleKind::City(_) => 4.0,
        PossibleKind::Settlement(_) => 3.0,
        PossibleKind::BuyDevCard => 1.5,
        PossibleKind::Road(_) | PossibleKind::Ship(_) | PossibleKind::PickSpecialItem => 1.0,
    };
    let threat_term = -(p.threats.len() as f32) * 0.1;
    match strategy {
        Strategy::Fast => eta_term * 2.0 + kind_term,
        Strategy::Smart => eta_term + kind_term * 2.0 + threat_term,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::model::ScenarioOptions;
    use crate::trackers::{PlacementEvent, TrackerSet};
    use crate::DUMMY_CANCEL_SEAT;
    use crate::model::{Location, PieceKind};

    #[test]
    fn plan_contains_only_legal_pieces_in_decreasing_value_order() {
        let mut game = Game::new(Board::standard(2), ScenarioOptions::default());
        game.sit_down(0, "us");
        let mut set = TrackerSet::new();
        set.on_placement(
            &game,
            PlacementEvent::Cancelled { seat: DUMMY_CANCEL_SEAT, kind: PieceKind::Road, location: Location::Edge((0, 0)) },
        );
        let plan = plan_stuff(&game, set.tracker(0), Strategy::Fast);
        assert!(!plan.is_empty(), "initial placement should always have legal settlement candidates");
        for kind in plan.iter_top_to_bottom() {
            if let PossibleKind::Settlement(n) = kind {
                assert!(oracle::is_potential_settlement(&game, 0, *n));
            }
        }
    }
}
