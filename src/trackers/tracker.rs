//! Opponent/self trackers. One [`Tracker`] per seat, reconciled in three
//! ordered passes on every placement: reconcile this tracker's own lattice
//! with the world event, clear threat lists everywhere, then recompute
//! threats and ETAs against the post-event state.

use super::possible::{PossibleKind, PossiblePiece};
use crate::board::{EdgeId, NodeId};
use crate::model::{Game, Location, PieceKind};
use crate::oracle;
use crate::{Eta, SeatId, DUMMY_CANCEL_SEAT, MAX_SEATS};
use std::collections::HashMap;

/// a piece placement or rejection the trackers must react to
#[derive(Debug, Clone, Copy)]
pub enum PlacementEvent {
    Placed { seat: SeatId, kind: PieceKind, location: Location },
    /// our own placement was rejected by the server; `seat` is conventionally
    /// [`DUMMY_CANCEL_SEAT`] so bookkeeping symmetries hold
    Cancelled { seat: SeatId, kind: PieceKind, location: Location },
}

#[derive(Debug, Clone, Default)]
pub struct Tracker {
    pub seat: SeatId,
    roads: HashMap<EdgeId, PossiblePiece>,
    ships: HashMap<EdgeId, PossiblePiece>,
    settlements: HashMap<NodeId, PossiblePiece>,
    cities: HashMap<NodeId, PossiblePiece>,
    /// has no board coordinate, so it's a single per-seat slot rather than
    /// a location-keyed map
    buy_devcard: Option<PossiblePiece>,
}

impl Tracker {
    pub fn new(seat: SeatId) -> Self {
        Self { seat, ..Default::default() }
    }

    pub fn all(&self) -> impl Iterator<Item = &PossiblePiece> {
        self.roads
            .values()
            .chain(self.ships.values())
            .chain(self.settlements.values())
            .chain(self.cities.values())
            .chain(self.buy_devcard.iter())
    }

    fn all_mut(&mut self) -> impl Iterator<Item = &mut PossiblePiece> {
        self.roads
            .values_mut()
            .chain(self.ships.values_mut())
            .chain(self.settlements.values_mut())
            .chain(self.cities.values_mut())
            .chain(self.buy_devcard.iter_mut())
    }

    pub fn get(&self, kind: PossibleKind) -> Option<&PossiblePiece> {
        match kind {
            PossibleKind::Road(e) => self.roads.get(&e),
            PossibleKind::Ship(e) => self.ships.get(&e),
            PossibleKind::Settlement(n) => self.settlements.get(&n),
            PossibleKind::City(n) => self.cities.get(&n),
            PossibleKind::BuyDevCard => self.buy_devcard.as_ref(),
            PossibleKind::PickSpecialItem => None,
        }
    }

    /// pass 1: commit or invalidate our own lattice entry for a world event
    /// naming our seat
    fn reconcile(&mut self, event: PlacementEvent) {
        match event {
            PlacementEvent::Placed { seat, kind, location } if seat == self.seat => {
                self.drop_entry(kind, location);
            }
            PlacementEvent::Cancelled { seat, kind, location }
                if seat == self.seat || seat == DUMMY_CANCEL_SEAT =>
            {
                self.drop_entry(kind, location);
            }
            _ => {}
        }
    }

    fn drop_entry(&mut self, kind: PieceKind, location: Location) {
        match (kind, location) {
            (PieceKind::Road, Location::Edge(e)) => {
                self.roads.remove(&e);
            }
            (PieceKind::Ship, Location::Edge(e)) => {
                self.ships.remove(&e);
            }
            (PieceKind::Settlement, Location::Node(n)) => {
                self.settlements.remove(&n);
            }
            (PieceKind::City, Location::Node(n)) => {
                self.cities.remove(&n);
                self.settlements.remove(&n);
            }
            _ => {}
        }
    }

    fn clear_threats(&mut self) {
        for p in self.all_mut() {
            p.threats.clear();
            p.biggest_threats.clear();
        }
    }

    /// adds newly-legal candidates and drops now-illegal ones against the
    /// oracle, as it stands after the event has been applied to `Game`
    fn refresh_candidates(&mut self, game: &Game) {
        for node in 0..game.board.node_count() as NodeId {
            upsert(
                &mut self.settlements,
                node,
                oracle::is_potential_settlement(game, self.seat, node),
                || PossiblePiece::new(self.seat, PossibleKind::Settlement(node)),
            );
            upsert(
                &mut self.cities,
                node,
                oracle::is_potential_city(game, self.seat, node),
                || PossiblePiece::new(self.seat, PossibleKind::City(node)),
            );
        }
        for edge in game.board.edges() {
            upsert(
                &mut self.roads,
                edge,
                oracle::is_potential_road(game, self.seat, edge),
                || PossiblePiece::new(self.seat, PossibleKind::Road(edge)),
            );
            upsert(
                &mut self.ships,
                edge,
                oracle::is_potential_ship(game, self.seat, edge),
                || PossiblePiece::new(self.seat, PossibleKind::Ship(edge)),
            );
        }
        if game.devcards_remaining > 0 {
            self.buy_devcard
                .get_or_insert_with(|| PossiblePiece::new(self.seat, PossibleKind::BuyDevCard));
        } else {
            self.buy_devcard = None;
        }
    }

    /// ETA is turns-until-affordable given this seat's production odds;
    /// `0` means buildable right now. Uses the oracle's pip-weighted dice
    /// probability across hexes adjacent to the seat's settlements/cities
    /// as a stand-in for "expected resources per turn".
    fn update_etas(&mut self, game: &Game) {
        let production = self.estimated_production_per_turn(game);
        for p in self.all_mut() {
            let cost: &[(crate::model::ResourceKind, u16)] = match p.kind {
                PossibleKind::Road(_) => oracle::resources_to_build(PieceKind::Road),
                PossibleKind::Ship(_) => oracle::resources_to_build(PieceKind::Ship),
                PossibleKind::Settlement(_) => oracle::resources_to_build(PieceKind::Settlement),
                PossibleKind::City(_) => oracle::resources_to_build(PieceKind::City),
                PossibleKind::BuyDevCard => &oracle::DEVCARD_COST,
                PossibleKind::PickSpecialItem => continue,
            };
            let turns_needed = cost
                .iter()
                .map(|(kind, n)| {
                    let rate = production[*kind as usize].max(1) as f32;
                    (*n as f32 / rate).ceil() as Eta
                })
                .max()
                .unwrap_or(0);
            p.eta = turns_needed;
        }
    }

    fn estimated_production_per_turn(&self, game: &Game) -> [u32; 5] {
        let mut out = [0u32; 5];
        for piece in game.pieces_of(self.seat) {
            if !matches!(piece.kind, PieceKind::Settlement | PieceKind::City) {
                continue;
            }
            let Location::Node(node) = piece.at else { continue };
            let weight = if piece.kind == PieceKind::City { 2 } else { 1 };
            for hex in game.board.hexes_of_node(node) {
                if let crate::board::Terrain::Produces(kind) = game.board.terrain(*hex) {
                    out[kind as usize] += weight * oracle::dice_probability_for_hex(game, *hex);
                }
            }
        }
        out
    }

    /// pass 3b: mark possible pieces of other seats that would contest this
    /// one as threats. a settlement threatens a road/settlement/city at the
    /// same or an adjacent node; a road/ship threatens nothing further
    /// (longest-road threat propagation is an open extension point, not yet
    /// wired).
    fn recompute_threats(&mut self, snapshot: &[(SeatId, Vec<PossibleKind>)]) {
        for p in self.all_mut() {
            let contested_node = match p.kind {
                PossibleKind::Settlement(n) | PossibleKind::City(n) => Some(n),
                _ => None,
            };
            let Some(node) = contested_node else { continue };
            for (other_seat, kinds) in snapshot {
                if *other_seat == p.owner {
                    continue;
                }
                for kind in kinds {
                    if let PossibleKind::Settlement(other_node) = kind {
                        if *other_node == node {
                            p.threats.push(*kind);
                        }
                    }
                }
            }
            p.biggest_threats = p.threats.iter().take(2).copied().collect();
        }
    }
}

fn upsert<K: std::hash::Hash + Eq + Copy>(
    map: &mut HashMap<K, PossiblePiece>,
    key: K,
    should_exist: bool,
    make: impl FnOnce() -> PossiblePiece,
) {
    if should_exist {
        map.entry(key).or_insert_with(make);
    } else {
        map.remove(&key);
    }
}

/// owns one [`Tracker`] per seat and drives the three-pass reconciliation
#[derive(Debug, Clone, Default)]
pub struct TrackerSet {
    trackers: Vec<Tracker>,
}

impl TrackerSet {
    pub fn new() -> Self {
        Self { trackers: (0..MAX_SEATS as SeatId).map(Tracker::new).collect() }
    }

    pub fn tracker(&self, seat: SeatId) -> &Tracker {
        &self.trackers[seat as usize]
    }

    pub fn on_placement(&mut self, game: &Game, event: PlacementEvent) {
        for t in self.trackers.iter_mut() {
            t.reconcile(event);
        }
        for t in self.trackers.iter_mut() {
            t.clear_threats();
        }
        for t in self.trackers.iter_mut() {
            t.refresh_candidates(game);
        }
        let snapshot: Vec<(SeatId, Vec<PossibleKind>)> = self
            .trackers
            .iter()
            .map(|t| (t.seat, t.all().map(|p| p.kind).collect()))
            .collect();
        for t in self.trackers.iter_mut() {
            t.recompute_threats(&snapshot);
            t.update_etas(game);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::model::{Game, ScenarioOptions};

    fn game() -> Game {
        let mut g = Game::new(Board::standard(2), ScenarioOptions::default());
        g.sit_down(0, "us");
        g.sit_down(1, "them");
        g
    }

    #[test]
    fn placing_our_own_settlement_removes_it_from_our_possibles() {
        let g = game();
        let node = g.board.nodes_of_hex(g.board.hexes().next().unwrap())[0];
        let mut set = TrackerSet::new();
        set.on_placement(&g, PlacementEvent::Cancelled { seat: DUMMY_CANCEL_SEAT, kind: PieceKind::Road, location: Location::Edge((0, 0)) });
        assert!(set.tracker(0).get(PossibleKind::Settlement(node)).is_some());

        let mut g2 = g;
        g2.apply_put_piece(0, Location::Node(node), PieceKind::Settlement);
        set.on_placement(&g2, PlacementEvent::Placed { seat: 0, kind: PieceKind::Settlement, location: Location::Node(node) });
        assert!(set.tracker(0).get(PossibleKind::Settlement(node)).is_none());
    }

    #[test]
    fn cancelled_build_uses_dummy_seat_and_still_drops_entry() {
        let g = game();
        let node = g.board.nodes_of_hex(g.board.hexes().next().unwrap())[0];
        let mut set = TrackerSet::new();
        set.on_placement(&g, PlacementEvent::Cancelled { seat: DUMMY_CANCEL_SEAT, kind: PieceKind::Road, location: Location::Edge((0, 0)) });
        assert!(set.tracker(0).get(PossibleKind::Settlement(node)).is_some());
        set.on_placement(
            &g,
            PlacementEvent::Cancelled {
                seat: DUMMY_CANCEL_SEAT,
                kind: PieceKind::Settlement,
                location: Location::Node(node),
            },
        );
        assert!(set.tracker(0).get(PossibleKind::Settlement(node)).is_none());
    }

    #[test]
    fn overlapping_initial_candidates_threaten_each_other() {
        // during initial placement, connectivity isn't required, so the same
        // node is a live candidate for every seat simultaneously
        let g = game();
        let node = g.board.nodes_of_hex(g.board.hexes().next().unwrap())[0];
        let mut set = TrackerSet::new();
        set.on_placement(&g, PlacementEvent::Cancelled { seat: DUMMY_CANCEL_SEAT, kind: PieceKind::Road, location: Location::Edge((0, 0)) });
        let threats = &set.tracker(0).get(PossibleKind::Settlement(node)).unwrap().threats;
        assert!(threats.contains(&PossibleKind::Settlement(node)));
    }
}
