//! The legal-move oracle: pure, read-only queries over the game model
//! mirror. Results must never be cached across a mutation — every query
//! re-derives its answer from `Game` as it stands right now.

use crate::board::{EdgeId, NodeId, Terrain};
use crate::model::{DevCardKind, Game, PieceKind, ResourceKind};
use crate::SeatId;

/// build costs, keyed by the same five resources as `ResourceKind::ALL`
pub fn resources_to_build(kind: PieceKind) -> &'static [(ResourceKind, u16)] {
    match kind {
        PieceKind::Road => &[(ResourceKind::Clay, 1), (ResourceKind::Wood, 1)],
        PieceKind::Ship => &[(ResourceKind::Sheep, 1), (ResourceKind::Wood, 1)],
        PieceKind::Settlement => &[
            (ResourceKind::Clay, 1),
            (ResourceKind::Wood, 1),
            (ResourceKind::Sheep, 1),
            (ResourceKind::Wheat, 1),
        ],
        PieceKind::City => &[(ResourceKind::Ore, 3), (ResourceKind::Wheat, 2)],
    }
}

pub const DEVCARD_COST: [(ResourceKind, u16); 3] =
    [(ResourceKind::Ore, 1), (ResourceKind::Sheep, 1), (ResourceKind::Wheat, 1)];

fn node_occupied(game: &Game, node: NodeId) -> bool {
    game.settlement_or_city_at(node).is_some()
}

fn owns_adjacent_road_or_ship(game: &Game, seat: SeatId, node: NodeId) -> bool {
    game.board
        .edges_of_node(node)
        .iter()
        .any(|e| matches!(game.road_or_ship_at(*e), Some(p) if p.owner == seat))
}

/// "the distance rule": no settlement may sit adjacent to another,
/// regardless of owner
pub fn is_potential_settlement(game: &Game, seat: SeatId, node: NodeId) -> bool {
    if node_occupied(game, node) {
        return false;
    }
    let distance_clear = game
        .board
        .distance_rule_region(node)
        .into_iter()
        .all(|n| n == node || !node_occupied(game, n));
    if !distance_clear {
        return false;
    }
    if is_initial_placement(game) {
        return true;
    }
    owns_adjacent_road_or_ship(game, seat, node)
}

pub fn is_potential_city(game: &Game, seat: SeatId, node: NodeId) -> bool {
    matches!(
        game.settlement_or_city_at(node),
        Some(p) if p.owner == seat && p.kind == PieceKind::Settlement
    )
}

fn edge_endpoint_grants_road(game: &Game, seat: SeatId, edge: EdgeId) -> bool {
    [edge.0, edge.1].into_iter().any(|node| {
        matches!(game.settlement_or_city_at(node), Some(p) if p.owner == seat)
            || owns_adjacent_road_or_ship(game, seat, node)
    })
}

fn edge_is_coastal(game: &Game, edge: EdgeId) -> bool {
    let hexes_a = game.board.hexes_of_node(edge.0);
    let hexes_b = game.board.hexes_of_node(edge.1);
    hexes_a
        .iter()
        .filter(|h| hexes_b.contains(h))
        .any(|h| matches!(game.board.terrain(*h), Terrain::Sea))
}

pub fn is_potential_road(game: &Game, seat: SeatId, edge: EdgeId) -> bool {
    game.road_or_ship_at(edge).is_none() && edge_endpoint_grants_road(game, seat, edge)
}

pub fn is_potential_ship(game: &Game, seat: SeatId, edge: EdgeId) -> bool {
    game.options.sea_board
        && game.road_or_ship_at(edge).is_none()
        && edge_is_coastal(game, edge)
        && edge_endpoint_grants_road(game, seat, edge)
}

fn devcard_playable(game: &Game, seat: SeatId, kind: DevCardKind) -> bool {
    match game.seat(seat) {
        Some(p) => p.devcards.playable_now(kind) > 0 && !p.played_devcard_this_turn,
        None => false,
    }
}

pub fn may_play_knight(game: &Game, seat: SeatId) -> bool {
    devcard_playable(game, seat, DevCardKind::Knight)
}

pub fn may_play_roads(game: &Game, seat: SeatId) -> bool {
    devcard_playable(game, seat, DevCardKind::RoadBuilding)
}

pub fn may_play_mono(game: &Game, seat: SeatId) -> bool {
    devcard_playable(game, seat, DevCardKind::Monopoly)
}

pub fn may_play_disc(game: &Game, seat: SeatId) -> bool {
    devcard_playable(game, seat, DevCardKind::YearOfPlenty)
}

/// standard two-die pip-count probability, scaled to a [0, 36] integer so
/// callers can compare hexes without floating point
pub fn dice_probability_for_hex(game: &Game, hex: crate::board::HexCoord) -> u32 {
    match game.board.dice_number(hex) {
        None => 0,
        Some(n) => match n {
            2 | 12 => 1,
            3 | 11 => 2,
            4 | 10 => 3,
            5 | 9 => 4,
            6 | 8 => 5,
            _ => 0,
        },
    }
}

/// lower value = rarer resource, summed pip-weight (out of 36) across every
/// hex producing that resource on the current board
pub fn estimate_resource_rarity(game: &Game) -> [u32; 5] {
    let mut out = [0u32; 5];
    for hex in game.board.hexes() {
        if let Terrain::Produces(kind) = game.board.terrain(hex) {
            out[kind as usize] += dice_probability_for_hex(game, hex);
        }
    }
    out
}

/// scenario-gated; pirate fortress attacks are not modeled by this crate
/// (no fortress-strength/ship-count bookkeeping), so this always answers
/// "no attack available".
pub fn can_attack_pirate_fortress(game: &Game, _seat: SeatId) -> Option<NodeId> {
    if !game.options.pirate_islands {
        return None;
    }
    None
}

pub fn is_initial_placement(game: &Game) -> bool {
    game.phase.is_initial_placement()
}

pub fn is_special_building(game: &Game) -> bool {
    game.phase.is_special_building()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::model::{Game, Location, ScenarioOptions};

    fn game() -> Game {
        let mut g = Game::new(Board::standard(2), ScenarioOptions::default());
        g.sit_down(0, "us");
        g.sit_down(1, "them");
        g
    }

    #[test]
    fn initial_placement_ignores_connectivity() {
        let g = game();
        let node = g.board.nodes_of_hex(g.board.hexes().next().unwrap())[0];
        assert!(is_potential_settlement(&g, 0, node));
    }

    #[test]
    fn settlement_blocked_by_distance_rule() {
        let mut g = game();
        let node = g.board.nodes_of_hex(g.board.hexes().next().unwrap())[0];
        g.apply_put_piece(1, Location::Node(node), PieceKind::Settlement);
        for neighbor in g.board.neighbors_of_node(node).to_vec() {
            assert!(!is_potential_settlement(&g, 0, neighbor));
        }
    }

    #[test]
    fn ordinary_play_requires_connectivity() {
        let mut g = game();
        g.set_phase(crate::model::Phase::Play);
        let node = g.board.nodes_of_hex(g.board.hexes().next().unwrap())[0];
        assert!(!is_potential_settlement(&g, 0, node));
        let edge = g.board.edges_of_node(node)[0];
        g.apply_put_piece(0, Location::Edge(edge), PieceKind::Road);
        assert!(is_potential_settlement(&g, 0, node));
    }

    #[test]
    fn city_requires_existing_settlement() {
        let mut g = game();
        let node = g.board.nodes_of_hex(g.board.hexes().next().unwrap())[0];
        assert!(!is_potential_city(&g, 0, node));
        g.apply_put_piece(0, Location::Node(node), PieceKind::Settlement);
        assert!(is_potential_city(&g, 0, node));
        assert!(!is_potential_city(&g, 1, node));
    }

    #[test]
    fn resource_rarity_is_zero_for_desert_only_hexes() {
        let g = game();
        let rarity = estimate_resource_rarity(&g);
        assert!(rarity.iter().all(|r| *r <= 20));
    }
}
