//! The game model mirror: a local, authoritative-free replica mutated only
//! by applying inbound messages; never by the brain's own guesses about
//! what *should* happen next.

use super::devcards::DevCardKind;
use super::phase::Phase;
use super::piece::{Location, PieceKind, PlacedPiece};
use super::player::Player;
use super::resources::ResourceKind;
use crate::board::{Board, EdgeId, HexCoord, NodeId};
use crate::{SeatId, MAX_SEATS};
use std::collections::HashMap;

/// option-gated rules variants; affects legal-move queries and which
/// phases the brain ever expects to see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScenarioOptions {
    pub sea_board: bool,
    pub six_player: bool,
    pub pirate_islands: bool,
    pub three_initial_placements: bool,
    pub cloth_villages: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementOp {
    Set,
    Gain,
    Lose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerElementField {
    Resource(ResourceKind),
    UnknownResource,
    Knights,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevCardOp {
    Draw,
    Play,
    AddOld,
    AddNew,
    /// the server refused a play request; no inventory change, the brain
    /// layer is responsible for reacting (see `brain::recovery`)
    CannotPlay,
}

#[derive(Clone)]
pub struct Game {
    pub board: Board,
    pub options: ScenarioOptions,
    /// our own seat, once we've sat down; `None` before `SitDown`
    pub my_seat: Option<SeatId>,
    seats: [Option<Player>; MAX_SEATS],
    pub phase: Phase,
    pub old_phase: Phase,
    pub current_player: Option<SeatId>,
    pub dice: Option<(u8, u8)>,
    pub devcards_remaining: u16,
    pub robber_hex: Option<HexCoord>,
    pub pirate_hex: Option<HexCoord>,
    settlements_and_cities: HashMap<NodeId, PlacedPiece>,
    roads_and_ships: HashMap<EdgeId, PlacedPiece>,
}

impl Game {
    pub fn new(board: Board, options: ScenarioOptions) -> Self {
        Self {
            board,
            options,
            my_seat: None,
            seats: Default::default(),
            phase: Phase::InitSettle1a,
            old_phase: Phase::InitSettle1a,
            current_player: None,
            dice: None,
            devcards_remaining: 25,
            robber_hex: None,
            pirate_hex: None,
            settlements_and_cities: HashMap::new(),
            roads_and_ships: HashMap::new(),
        }
    }

    pub fn seat(&self, seat: SeatId) -> Option<&Player> {
        self.seats.get(seat as usize)?.as_ref()
    }

    pub fn seat_mut(&mut self, seat: SeatId) -> Option<&mut Player> {
        self.seats.get_mut(seat as usize)?.as_mut()
    }

    pub fn seated(&self) -> impl Iterator<Item = &Player> {
        self.seats.iter().filter_map(|s| s.as_ref())
    }

    pub fn me(&self) -> Option<&Player> {
        self.my_seat.and_then(|s| self.seat(s))
    }

    pub fn settlement_or_city_at(&self, node: NodeId) -> Option<&PlacedPiece> {
        self.settlements_and_cities.get(&node)
    }

    pub fn road_or_ship_at(&self, edge: EdgeId) -> Option<&PlacedPiece> {
        self.roads_and_ships.get(&edge)
    }

    pub fn pieces_of(&self, seat: SeatId) -> impl Iterator<Item = &PlacedPiece> {
        self.settlements_and_cities
            .values()
            .chain(self.roads_and_ships.values())
            .filter(move |p| p.owner == seat)
    }

    // -- mutators, all total and I/O-free -------------------------------

    pub fn sit_down(&mut self, seat: SeatId, nickname: impl Into<String>) {
        self.seats[seat as usize] = Some(Player::new(seat, nickname));
    }

    pub fn set_phase(&mut self, new: Phase) {
        self.old_phase = self.phase;
        self.phase = new;
    }

    pub fn set_current_player(&mut self, seat: SeatId) {
        self.current_player = Some(seat);
    }

    /// called on `Turn(seat)`: rotates to `seat` and clears per-turn state
    pub fn advance_turn(&mut self, seat: SeatId) {
        self.set_current_player(seat);
        if let Some(p) = self.seat_mut(seat) {
            p.start_turn();
        }
    }

    pub fn apply_put_piece(&mut self, seat: SeatId, location: Location, kind: PieceKind) {
        let piece = PlacedPiece { owner: seat, kind, at: location };
        match location {
            Location::Node(n) => {
                self.settlements_and_cities.insert(n, piece);
            }
            Location::Edge(e) => {
                self.roads_and_ships.insert(e, piece);
            }
        }
        if let Some(p) = self.seat_mut(seat) {
            match kind {
                PieceKind::Settlement => p.supply.settlements = p.supply.settlements.saturating_sub(1),
                PieceKind::City => {
                    p.supply.cities = p.supply.cities.saturating_sub(1);
                    p.supply.settlements += 1;
                }
                PieceKind::Road => p.supply.roads = p.supply.roads.saturating_sub(1),
                PieceKind::Ship => p.supply.ships = p.supply.ships.saturating_sub(1),
            }
        }
    }

    /// ships only
    pub fn apply_move_piece(&mut self, seat: SeatId, from: EdgeId, to: EdgeId) {
        if let Some(piece) = self.roads_and_ships.remove(&from) {
            debug_assert_eq!(piece.owner, seat, "moved a ship we don't believe we own");
            debug_assert_eq!(piece.kind, PieceKind::Ship, "apply_move_piece is ships-only");
            self.roads_and_ships.insert(to, PlacedPiece { at: Location::Edge(to), ..piece });
        }
    }

    pub fn apply_dice(&mut self, n: (u8, u8)) {
        self.dice = Some(n);
    }

    pub fn apply_robber_hex(&mut self, hex: HexCoord) {
        self.robber_hex = Some(hex);
    }

    pub fn apply_pirate_hex(&mut self, hex: HexCoord) {
        self.pirate_hex = Some(hex);
    }

    pub fn apply_player_element(
        &mut self,
        seat: SeatId,
        field: PlayerElementField,
        op: ElementOp,
        value: u16,
    ) {
        let Some(player) = self.seat_mut(seat) else { return };
        match field {
            PlayerElementField::Resource(kind) => match op {
                ElementOp::Set => player.hand.set(kind, value),
                ElementOp::Gain => player.hand.gain(kind, value),
                ElementOp::Lose => player.hand.lose(kind, value),
            },
            PlayerElementField::UnknownResource => match op {
                ElementOp::Set => player.hand.unknown = value,
                ElementOp::Gain => player.hand.unknown += value,
                ElementOp::Lose => player.hand.unknown = player.hand.unknown.saturating_sub(value),
            },
            PlayerElementField::Knights => {
                let n = value as u8;
                match op {
                    ElementOp::Set => player.knights_played = n,
                    ElementOp::Gain => player.knights_played = player.knights_played.saturating_add(n),
                    ElementOp::Lose => player.knights_played = player.knights_played.saturating_sub(n),
                }
            }
        }
    }

    /// resource-hand invariant: a mismatched assertion flattens the
    /// opponent's hand to all-unknown of the asserted total. for our own
    /// seat this should always already match; callers are expected to log
    /// the mismatch (diagnostics live at the brain layer, not here).
    pub fn apply_resource_count_assert(&mut self, seat: SeatId, total: u16) {
        let Some(player) = self.seat_mut(seat) else { return };
        if player.hand.total() != total {
            player.hand.flatten_to_unknown(total);
        }
    }

    pub fn apply_devcard_action(&mut self, seat: SeatId, kind: DevCardKind, op: DevCardOp) {
        let Some(player) = self.seat_mut(seat) else { return };
        match op {
            DevCardOp::Draw => player.devcards.draw(kind),
            DevCardOp::Play => {
                player.devcards.play(kind);
                player.played_devcard_this_turn = true;
            }
            DevCardOp::AddOld => {
                let n = player.devcards.playable_now(kind);
                player.devcards.set_old(kind, n + 1);
            }
            DevCardOp::AddNew => {
                let n = player.devcards.bought_this_turn(kind);
                player.devcards.set_new(kind, n + 1);
            }
            DevCardOp::CannotPlay => {}
        }
    }

    pub fn set_longest_road(&mut self, seat: Option<SeatId>) {
        for p in self.seats.iter_mut().flatten() {
            p.has_longest_road = Some(p.seat) == seat;
        }
    }

    pub fn set_largest_army(&mut self, seat: Option<SeatId>) {
        for p in self.seats.iter_mut().flatten() {
            p.has_largest_army = Some(p.seat) == seat;
        }
    }

    /// derived, not server-asserted: one point per settlement, two per
    /// city, two each for longest-road/largest-army, one per held
    /// victory-point card. Lets the brain reason about "who is close to
    /// winning" when weighing trades.
    pub fn victory_points(&self, seat: SeatId) -> u8 {
        let mut points = self
            .pieces_of(seat)
            .map(|p| match p.kind {
                PieceKind::Settlement => 1,
                PieceKind::City => 2,
                PieceKind::Road | PieceKind::Ship => 0,
            })
            .sum::<u8>();
        if let Some(player) = self.seat(seat) {
            if player.has_longest_road {
                points += 2;
            }
            if player.has_largest_army {
                points += 2;
            }
            points += player.devcards.total(DevCardKind::VictoryPoint);
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn game() -> Game {
        let mut g = Game::new(Board::standard(2), ScenarioOptions::default());
        g.sit_down(0, "us");
        g.sit_down(1, "them");
        g.my_seat = Some(0);
        g
    }

    #[test]
    fn sitting_down_creates_a_default_player() {
        let g = game();
        assert_eq!(g.seat(0).unwrap().nickname, "us");
        assert_eq!(g.seat(0).unwrap().hand.total(), 0);
        assert!(g.seat(2).is_none());
    }

    #[test]
    fn put_piece_decrements_supply_and_records_location() {
        let mut g = game();
        let node = g.board.nodes_of_hex(g.board.hexes().next().unwrap())[0];
        g.apply_put_piece(0, Location::Node(node), PieceKind::Settlement);
        assert_eq!(g.seat(0).unwrap().supply.settlements, 4);
        assert_eq!(g.settlement_or_city_at(node).unwrap().owner, 0);
    }

    #[test]
    fn resource_count_mismatch_flattens_opponent_hand() {
        let mut g = game();
        g.apply_player_element(
            1,
            PlayerElementField::Resource(ResourceKind::Wood),
            ElementOp::Gain,
            2,
        );
        g.apply_resource_count_assert(1, 5);
        let hand = &g.seat(1).unwrap().hand;
        assert_eq!(hand.get(ResourceKind::Wood), 0);
        assert_eq!(hand.unknown, 5);
        assert_eq!(hand.total(), 5);
    }

    #[test]
    fn turn_advance_resets_played_devcard_flag() {
        let mut g = game();
        g.apply_devcard_action(0, DevCardKind::Knight, DevCardOp::AddOld);
        g.apply_devcard_action(0, DevCardKind::Knight, DevCardOp::Play);
        assert!(g.seat(0).unwrap().played_devcard_this_turn);
        g.advance_turn(0);
        assert!(!g.seat(0).unwrap().played_devcard_this_turn);
    }

    #[test]
    fn victory_points_counts_pieces_flags_and_cards() {
        let mut g = game();
        let node = g.board.nodes_of_hex(g.board.hexes().next().unwrap())[0];
        g.apply_put_piece(0, Location::Node(node), PieceKind::Settlement);
        assert_eq!(g.victory_points(0), 1);

        g.apply_put_piece(0, Location::Node(node), PieceKind::City);
        assert_eq!(g.victory_points(0), 2);

        g.set_longest_road(Some(0));
        g.set_largest_army(Some(0));
        assert_eq!(g.victory_points(0), 6);

        g.apply_devcard_action(0, DevCardKind::VictoryPoint, DevCardOp::AddOld);
        assert_eq!(g.victory_points(0), 7);
    }
}
