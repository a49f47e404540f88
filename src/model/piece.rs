//! Placed-piece bookkeeping for the game model mirror. Distinct from the
//! tracker's *possible* pieces (see `trackers::possible`), which model
//! candidates the brain hasn't built yet.

use crate::board::{EdgeId, NodeId};
use crate::SeatId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Road,
    Ship,
    Settlement,
    City,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Node(NodeId),
    Edge(EdgeId),
}

#[derive(Debug, Clone, Copy)]
pub struct PlacedPiece {
    pub owner: SeatId,
    pub kind: PieceKind,
    pub at: Location,
}

impl PlacedPiece {
    pub fn road(owner: SeatId, edge: EdgeId) -> Self {
        Self { owner, kind: PieceKind::Road, at: Location::Edge(edge) }
    }

    pub fn ship(owner: SeatId, edge: EdgeId) -> Self {
        Self { owner, kind: PieceKind::Ship, at: Location::Edge(edge) }
    }

    pub fn settlement(owner: SeatId, node: NodeId) -> Self {
        Self { owner, kind: PieceKind::Settlement, at: Location::Node(node) }
    }

    pub fn city(owner: SeatId, node: NodeId) -> Self {
        Self { owner, kind: PieceKind::City, at: Location::Node(node) }
    }
}

/// per-seat remaining-piece counts (the physical supply a player can still
/// place); exhausting a count doesn't forbid a build in the mirror (that's
/// the oracle/server's job) but feeds `resources_to_build`-adjacent queries.
#[derive(Debug, Clone, Copy)]
pub struct PieceSupply {
    pub settlements: u8,
    pub cities: u8,
    pub roads: u8,
    pub ships: u8,
}

impl Default for PieceSupply {
    fn default() -> Self {
        Self { settlements: 5, cities: 4, roads: 15, ships: 15 }
    }
}
