//! The server-mirrored game phase. The brain never advances this itself —
//! every transition arrives as an inbound `GameState(phase)`.

/// every phase the server can announce. scenario-only variants
/// (`InitSettle3a`/`InitRoad3b`) exist regardless of `ScenarioOptions` so the
/// mirror stays total; the oracle and driver are what branch on the option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    InitSettle1a,
    InitRoad1b,
    InitSettle2a,
    InitRoad2b,
    InitSettle3a,
    InitRoad3b,
    Roll,
    Play,
    PlacingRoad,
    PlacingShip,
    PlacingSettlement,
    PlacingCity,
    PlacingFreeRoad1,
    PlacingFreeRoad2,
    PlacingRobber,
    WaitingForRobberOrPirate,
    WaitingForDiscards,
    WaitingForDiscovery,
    WaitingForMonopoly,
    WaitingForRobChoosePlayer,
    SpecialBuilding,
    Over,
    Reset,
}

impl Phase {
    pub fn is_initial_placement(self) -> bool {
        matches!(
            self,
            Phase::InitSettle1a
                | Phase::InitRoad1b
                | Phase::InitSettle2a
                | Phase::InitRoad2b
                | Phase::InitSettle3a
                | Phase::InitRoad3b
        )
    }

    pub fn is_special_building(self) -> bool {
        matches!(self, Phase::SpecialBuilding)
    }
}
