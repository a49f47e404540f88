//! The brain's own bookkeeping alongside the game model mirror. The
//! `expect_*`/`waiting_for_*` flags *are* the state machine and are kept as
//! a named record rather than collapsed into a single enum, because some
//! phases need a second axis to distinguish how we arrived (e.g.
//! `PLACING_ROBBER` reached by a pre-roll Knight versus a rolled seven).

use crate::board::{EdgeId, NodeId};
use crate::model::{DevCardKind, Phase, PieceKind};
use crate::trackers::PossibleKind;

/// one boolean per phase the brain can be waiting to transition into. At
/// most one `placing_*` flag may be true at a time; enforced by
/// [`ExpectFlags::set_only`], not by the type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpectFlags {
    pub init_settle_1a: bool,
    pub init_road_1b: bool,
    pub init_settle_2a: bool,
    pub init_road_2b: bool,
    pub init_settle_3a: bool,
    pub init_road_3b: bool,
    pub roll: bool,
    pub play: bool,
    pub placing_road: bool,
    pub placing_ship: bool,
    pub placing_settlement: bool,
    pub placing_city: bool,
    pub placing_free_road_1: bool,
    pub placing_free_road_2: bool,
    pub placing_robber: bool,
    pub waiting_for_robber_or_pirate: bool,
    pub waiting_for_discards: bool,
    pub waiting_for_discovery: bool,
    pub waiting_for_monopoly: bool,
    pub waiting_for_rob_choose_player: bool,
    pub special_building: bool,
    pub over: bool,
    pub reset: bool,
}

impl ExpectFlags {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// clears every flag, then sets the one matching `phase`
    pub fn set_only(&mut self, phase: Phase) {
        self.clear();
        let slot = match phase {
            Phase::InitSettle1a => &mut self.init_settle_1a,
            Phase::InitRoad1b => &mut self.init_road_1b,
            Phase::InitSettle2a => &mut self.init_settle_2a,
            Phase::InitRoad2b => &mut self.init_road_2b,
            Phase::InitSettle3a => &mut self.init_settle_3a,
            Phase::InitRoad3b => &mut self.init_road_3b,
            Phase::Roll => &mut self.roll,
            Phase::Play => &mut self.play,
            Phase::PlacingRoad => &mut self.placing_road,
            Phase::PlacingShip => &mut self.placing_ship,
            Phase::PlacingSettlement => &mut self.placing_settlement,
            Phase::PlacingCity => &mut self.placing_city,
            Phase::PlacingFreeRoad1 => &mut self.placing_free_road_1,
            Phase::PlacingFreeRoad2 => &mut self.placing_free_road_2,
            Phase::PlacingRobber => &mut self.placing_robber,
            Phase::WaitingForRobberOrPirate => &mut self.waiting_for_robber_or_pirate,
            Phase::WaitingForDiscards => &mut self.waiting_for_discards,
            Phase::WaitingForDiscovery => &mut self.waiting_for_discovery,
            Phase::WaitingForMonopoly => &mut self.waiting_for_monopoly,
            Phase::WaitingForRobChoosePlayer => &mut self.waiting_for_rob_choose_player,
            Phase::SpecialBuilding => &mut self.special_building,
            Phase::Over => &mut self.over,
            Phase::Reset => &mut self.reset,
        };
        *slot = true;
    }

    /// at most one `PLACING_*` expectation may be true
    pub fn placing_flags_set(&self) -> u8 {
        [
            self.placing_road,
            self.placing_ship,
            self.placing_settlement,
            self.placing_city,
            self.placing_robber,
            self.placing_free_road_1,
            self.placing_free_road_2,
        ]
        .into_iter()
        .filter(|b| *b)
        .count() as u8
    }

    pub fn any_placing(&self) -> bool {
        self.placing_flags_set() > 0
    }
}

/// distinguishes whether `PLACING_ROBBER` was entered via a Knight card
/// (played pre-roll or mid-turn) or via a rolled seven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RobberOrigin {
    #[default]
    None,
    PreRollKnight,
    RolledSeven,
}

#[derive(Debug, Clone, Default)]
pub struct BrainState {
    pub expect: ExpectFlags,
    pub waiting_for_gamestate: bool,
    pub waiting_for_trade_msg: bool,
    pub waiting_for_trade_response: bool,
    pub waiting_for_devcard: bool,
    pub waiting_for_pick_special_item: bool,
    pub waiting_for_fortress_attack: bool,
    /// ticks since the last forward progress; reset on any emitted action
    /// or observed progress
    pub counter: u32,
    pub robber_origin: RobberOrigin,

    // per-turn transient state
    pub what_we_failed_to_build: Option<PieceKind>,
    pub rejected_play_devcard_type: Option<DevCardKind>,
    pub last_initial_settlement: Option<NodeId>,
    pub last_initial_road: Option<EdgeId>,
    pub failed_builds_this_turn: u8,
    pub what_we_want_to_build: Option<PossibleKind>,
    pub move_robber_on_seven: bool,
    pub turn_exception_count: u32,
    /// set once the deadlock counter trips or the server dismisses us;
    /// `Brain::on_message` short-circuits to a no-op once this is true
    pub left_game: bool,

    /// sliding two-slot buffer of per-turn message descriptions
    /// (current, previous), for diagnostics only
    turn_events: [Vec<String>; 2],
}

impl BrainState {
    pub fn reset_counter(&mut self) {
        self.counter = 0;
    }

    pub fn tick(&mut self) {
        self.counter += 1;
    }

    /// record a non-ping, non-chat inbound message
    pub fn record_event(&mut self, description: impl Into<String>) {
        self.turn_events[0].push(description.into());
    }

    pub fn current_turn_events(&self) -> &[String] {
        &self.turn_events[0]
    }

    pub fn previous_turn_events(&self) -> &[String] {
        &self.turn_events[1]
    }

    /// rotates per-turn state on `Turn`
    pub fn begin_new_turn(&mut self) {
        self.turn_events.swap(0, 1);
        self.turn_events[0].clear();
        self.what_we_failed_to_build = None;
        self.rejected_play_devcard_type = None;
        self.failed_builds_this_turn = 0;
        self.move_robber_on_seven = false;
        self.turn_exception_count = 0;
        self.robber_origin = RobberOrigin::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_only_clears_previous_flag() {
        let mut flags = ExpectFlags::default();
        flags.set_only(Phase::PlacingRoad);
        assert!(flags.placing_road);
        flags.set_only(Phase::PlacingCity);
        assert!(!flags.placing_road);
        assert!(flags.placing_city);
        assert_eq!(flags.placing_flags_set(), 1);
    }

    #[test]
    fn begin_new_turn_clears_failed_build_bookkeeping() {
        let mut state = BrainState::default();
        state.what_we_failed_to_build = Some(PieceKind::City);
        state.failed_builds_this_turn = 2;
        state.begin_new_turn();
        assert!(state.what_we_failed_to_build.is_none());
        assert_eq!(state.failed_builds_this_turn, 0);
    }

    #[test]
    fn turn_event_history_slides_one_turn_back() {
        let mut state = BrainState::default();
        state.record_event("a");
        state.record_event("b");
        state.begin_new_turn();
        assert_eq!(state.previous_turn_events(), ["a", "b"]);
        assert!(state.current_turn_events().is_empty());
    }
}
