//! Recovery from a rejected build request or a rejected dev-card play.

use super::state::BrainState;
use crate::model::{DevCardKind, Game, Location, PieceKind};
use crate::oracle;
use crate::planner::BuildingPlan;
use crate::trackers::{PlacementEvent, PossibleKind, TrackerSet};
use crate::wire::Outbound;
use crate::DUMMY_CANCEL_SEAT;

/// `CancelBuildRequest` means "your last placement/purchase is illegal".
/// During initial placement we just retry; during ordinary play we record
/// the failure, invalidate the tracker entry, clear the plan, and end the
/// turn after echoing the cancel back to the server to restore resources.
pub fn handle_cancel_build_request(
    game: &Game,
    state: &mut BrainState,
    plan: &mut BuildingPlan,
    trackers: &mut TrackerSet,
    kind: PieceKind,
) -> Vec<Outbound> {
    state.failed_builds_this_turn = state.failed_builds_this_turn.saturating_add(1);
    state.reset_counter();

    if oracle::is_initial_placement(game) {
        state.expect.set_only(game.phase);
        return Vec::new();
    }

    state.what_we_failed_to_build = Some(kind);
    if let Some(location) = state.what_we_want_to_build.and_then(piece_location) {
        trackers.on_placement(
            game,
            PlacementEvent::Cancelled { seat: DUMMY_CANCEL_SEAT, kind, location },
        );
    }
    plan.clear();
    state.what_we_want_to_build = None;

    vec![Outbound::CancelBuildRequest(kind), Outbound::EndTurn]
}

fn piece_location(kind: PossibleKind) -> Option<Location> {
    match kind {
        PossibleKind::Road(e) | PossibleKind::Ship(e) => Some(Location::Edge(e)),
        PossibleKind::Settlement(n) | PossibleKind::City(n) => Some(Location::Node(n)),
        PossibleKind::BuyDevCard | PossibleKind::PickSpecialItem => None,
    }
}

/// a `DevCardAction(CANNOT_PLAY)`: record the rejected kind so it isn't
/// retried this turn, and clear any expect-flags tied to it. the caller is
/// responsible for clearing the specific `waiting_for_devcard` flag since
/// that's shared state owned by the driver.
pub fn handle_devcard_rejected(state: &mut BrainState, kind: DevCardKind) {
    state.rejected_play_devcard_type = Some(kind);
    state.waiting_for_devcard = false;
    state.reset_counter();
}

/// true if re-attempting `kind` this turn would violate the "never retry
/// what we just failed to build, this turn" rule
pub fn would_repeat_failed_build(state: &BrainState, kind: PieceKind) -> bool {
    state.what_we_failed_to_build == Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::model::ScenarioOptions;

    fn game_in_play() -> Game {
        let mut g = Game::new(Board::standard(2), ScenarioOptions::default());
        g.sit_down(0, "us");
        g.set_phase(crate::model::Phase::Play);
        g
    }

    #[test]
    fn ordinary_play_cancel_clears_plan_and_ends_turn() {
        let game = game_in_play();
        let mut state = BrainState::default();
        let mut plan = BuildingPlan::default();
        plan.push(PossibleKind::Road((0, 1)));
        let mut trackers = TrackerSet::new();

        let out = handle_cancel_build_request(&game, &mut state, &mut plan, &mut trackers, PieceKind::City);

        assert_eq!(state.what_we_failed_to_build, Some(PieceKind::City));
        assert!(plan.is_empty());
        assert_eq!(state.failed_builds_this_turn, 1);
        assert!(matches!(out[0], Outbound::CancelBuildRequest(PieceKind::City)));
        assert!(matches!(out[1], Outbound::EndTurn));
    }

    #[test]
    fn failed_build_is_never_repeated_same_turn() {
        let mut state = BrainState::default();
        state.what_we_failed_to_build = Some(PieceKind::Road);
        assert!(would_repeat_failed_build(&state, PieceKind::Road));
        assert!(!would_repeat_failed_build(&state, PieceKind::Ship));
    }

    #[test]
    fn initial_placement_cancel_just_retries() {
        let mut game = game_in_play();
        game.set_phase(crate::model::Phase::InitSettle1a);
        let mut state = BrainState::default();
        let mut plan = BuildingPlan::default();
        let mut trackers = TrackerSet::new();

        let out = handle_cancel_build_request(&game, &mut state, &mut plan, &mut trackers, PieceKind::Settlement);

        assert!(out.is_empty());
        assert!(state.expect.init_settle_1a);
        assert!(state.what_we_failed_to_build.is_none());
    }
}
