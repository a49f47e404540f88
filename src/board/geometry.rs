//! Board generation: a hex-of-hexes land mass, node/edge canonicalization,
//! dice numbers, terrain, and ports. Grounded on the node/edge id scheme
//! used by reference Catan engines (incrementally-assigned ids keyed by the
//! canonical set of hexes meeting at a point), adapted to this crate's own
//! [`HexCoord`]/[`Corner`]/[`Side`] representation.

use super::{Corner, Direction, HexCoord, Side};
use crate::model::ResourceKind;
use std::collections::HashMap;

pub type NodeId = u16;
pub type EdgeId = (NodeId, NodeId);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terrain {
    Produces(ResourceKind),
    Desert,
    Sea,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortKind {
    Generic,
    Specific(ResourceKind),
}

#[derive(Debug, Clone, Copy)]
pub struct Port {
    pub kind: PortKind,
    pub nodes: (NodeId, NodeId),
}

/// the static (never-mutated-after-construction) board shape: graph
/// topology, terrain, dice numbers, ports. Mutable per-game state (robber
/// position, pirate position) lives on `model::Game`, not here.
#[derive(Debug, Clone)]
pub struct Board {
    hexes: Vec<HexCoord>,
    hex_index: HashMap<HexCoord, usize>,
    terrain: HashMap<HexCoord, Terrain>,
    dice_number: HashMap<HexCoord, Option<u8>>,
    node_by_key: HashMap<Vec<HexCoord>, NodeId>,
    node_edges: HashMap<NodeId, Vec<EdgeId>>,
    node_neighbors: HashMap<NodeId, Vec<NodeId>>,
    node_hexes: HashMap<NodeId, Vec<HexCoord>>,
    hex_nodes: HashMap<HexCoord, Vec<NodeId>>,
    edges: Vec<EdgeId>,
    ports: Vec<Port>,
    next_node_id: NodeId,
}

const CORNERS: [Corner; 6] = [
    Corner::North,
    Corner::NorthEast,
    Corner::SouthEast,
    Corner::South,
    Corner::SouthWest,
    Corner::NorthWest,
];

/// standard 18 non-desert number tokens (4-player board); reused (repeated)
/// for the larger 6-player land mass.
const NUMBER_TOKENS: [u8; 18] = [
    2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12,
];

impl Board {
    /// generates a hex-of-hexes land mass with `rings` rings around the
    /// center hex (`rings == 2` is the standard 19-hex 4-player board;
    /// `rings == 3` approximates the 6-player extension — the official
    /// layout is an oval rather than a hexagon, a simplification recorded
    /// in DESIGN.md since board footprint is not a tested invariant).
    pub fn standard(rings: u32) -> Self {
        let hexes = ring_fill(rings);
        let mut board = Board {
            hex_index: hexes.iter().enumerate().map(|(i, h)| (*h, i)).collect(),
            hexes,
            terrain: HashMap::new(),
            dice_number: HashMap::new(),
            node_by_key: HashMap::new(),
            node_edges: HashMap::new(),
            node_neighbors: HashMap::new(),
            node_hexes: HashMap::new(),
            hex_nodes: HashMap::new(),
            edges: Vec::new(),
            ports: Vec::new(),
            next_node_id: 0,
        };
        board.assign_terrain();
        board.build_graph();
        board.assign_ports();
        board
    }

    pub fn hexes(&self) -> impl Iterator<Item = HexCoord> + '_ {
        self.hexes.iter().copied()
    }

    pub fn contains_hex(&self, hex: HexCoord) -> bool {
        self.hex_index.contains_key(&hex)
    }

    pub fn terrain(&self, hex: HexCoord) -> Terrain {
        self.terrain
            .get(&hex)
            .copied()
            .unwrap_or(Terrain::Sea)
    }

    pub fn dice_number(&self, hex: HexCoord) -> Option<u8> {
        self.dice_number.get(&hex).copied().flatten()
    }

    pub fn nodes_of_hex(&self, hex: HexCoord) -> &[NodeId] {
        self.hex_nodes.get(&hex).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn hexes_of_node(&self, node: NodeId) -> &[HexCoord] {
        self.node_hexes.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edges_of_node(&self, node: NodeId) -> &[EdgeId] {
        self.node_edges.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn neighbors_of_node(&self, node: NodeId) -> &[NodeId] {
        self.node_neighbors
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.next_node_id as usize
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().copied()
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn port_at(&self, node: NodeId) -> Option<PortKind> {
        self.ports
            .iter()
            .find(|p| p.nodes.0 == node || p.nodes.1 == node)
            .map(|p| p.kind)
    }

    /// `node` and every node one edge away from it — the distance-rule
    /// region a settlement at `node` would conflict with (no two
    /// settlements may sit on adjacent nodes)
    pub fn distance_rule_region(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = vec![node];
        out.extend_from_slice(self.neighbors_of_node(node));
        out
    }

    fn assign_terrain(&mut self) {
        let mut rng_state: u64 = 0x5EED;
        let mut next = || {
            rng_state ^= rng_state << 13;
            rng_state ^= rng_state >> 7;
            rng_state ^= rng_state << 17;
            rng_state
        };
        let mut terrains = Vec::new();
        let land_count = self.hexes.len();
        let desert_count = (land_count / 19).max(1);
        for i in 0..land_count {
            if i < desert_count {
                terrains.push(Terrain::Desert);
            } else {
                let kind = ResourceKind::ALL[(i - desert_count) % ResourceKind::ALL.len()];
                terrains.push(Terrain::Produces(kind));
            }
        }
        // deterministic shuffle (Fisher-Yates over a xorshift stream) so
        // the desert isn't always hex zero
        for i in (1..terrains.len()).rev() {
            let j = (next() as usize) % (i + 1);
            terrains.swap(i, j);
        }
        let mut numbers: Vec<Option<u8>> = Vec::with_capacity(terrains.len());
        let mut pool = NUMBER_TOKENS.to_vec();
        while pool.len() < terrains.len() {
            pool.extend_from_slice(&NUMBER_TOKENS);
        }
        let mut pool_iter = pool.into_iter();
        for t in &terrains {
            match t {
                Terrain::Desert => numbers.push(None),
                _ => numbers.push(pool_iter.next()),
            }
        }
        for (idx, hex) in self.hexes.clone().into_iter().enumerate() {
            self.terrain.insert(hex, terrains[idx]);
            self.dice_number.insert(hex, numbers[idx]);
        }
    }

    fn build_graph(&mut self) {
        let hexes = self.hexes.clone();
        for hex in hexes {
            let mut this_hex_nodes = Vec::with_capacity(6);
            for corner in CORNERS {
                let id = self.node_id_for(hex, corner);
                this_hex_nodes.push(id);
                self.node_hexes.entry(id).or_default();
                if !self.node_hexes[&id].contains(&hex) {
                    self.node_hexes.get_mut(&id).unwrap().push(hex);
                }
            }
            self.hex_nodes.insert(hex, this_hex_nodes);

            for side in Side::ALL {
                let (ca, cb) = side.endpoints();
                let a = self.node_id_for(hex, ca);
                let b = self.node_id_for(hex, cb);
                let edge: EdgeId = if a < b { (a, b) } else { (b, a) };
                if !self.edges.contains(&edge) {
                    self.edges.push(edge);
                }
                self.node_edges.entry(a).or_default();
                self.node_edges.entry(b).or_default();
                if !self.node_edges[&a].contains(&edge) {
                    self.node_edges.get_mut(&a).unwrap().push(edge);
                }
                if !self.node_edges[&b].contains(&edge) {
                    self.node_edges.get_mut(&b).unwrap().push(edge);
                }
                self.node_neighbors.entry(a).or_default();
                self.node_neighbors.entry(b).or_default();
                if !self.node_neighbors[&a].contains(&b) {
                    self.node_neighbors.get_mut(&a).unwrap().push(b);
                }
                if !self.node_neighbors[&b].contains(&a) {
                    self.node_neighbors.get_mut(&b).unwrap().push(a);
                }
            }
        }
    }

    /// the sorted, deduped set of hexes that physically meet at `corner` of
    /// `hex` — two hexes sharing a corner compute the same key for it, which
    /// is what makes node ids stable regardless of which hex asks first.
    fn node_key(&self, hex: HexCoord, corner: Corner) -> Vec<HexCoord> {
        let mut key: Vec<HexCoord> = corner
            .touching(hex)
            .into_iter()
            .filter(|h| self.hex_index.contains_key(h) || *h == hex)
            .collect();
        key.sort();
        key.dedup();
        key
    }

    /// canonicalizes `(hex, corner)` to a stable [`NodeId`], assigning a
    /// fresh one if this corner hasn't been visited yet
    fn node_id_for(&mut self, hex: HexCoord, corner: Corner) -> NodeId {
        let key = self.node_key(hex, corner);
        if let Some(id) = self.node_by_key.get(&key) {
            return *id;
        }
        let id = self.next_node_id;
        self.next_node_id += 1;
        self.node_by_key.insert(key, id);
        id
    }

    /// looks up the [`NodeId`] for a corner already registered by
    /// [`Self::build_graph`]; only valid after the graph pass has run.
    fn existing_node_id(&self, hex: HexCoord, corner: Corner) -> NodeId {
        let key = self.node_key(hex, corner);
        *self
            .node_by_key
            .get(&key)
            .expect("build_graph must run before assign_ports")
    }

    fn assign_ports(&mut self) {
        let coastal_edges: Vec<EdgeId> = self
            .hexes
            .iter()
            .filter(|h| !matches!(self.terrain(**h), Terrain::Sea))
            .flat_map(|h| {
                Side::ALL.iter().filter_map(move |side| {
                    let neighbor = h.step(side.direction());
                    if self.hex_index.contains_key(&neighbor) {
                        None
                    } else {
                        let (ca, cb) = side.endpoints();
                        Some((*h, ca, cb))
                    }
                })
            })
            .map(|(h, ca, cb)| {
                let a = self.existing_node_id(h, ca);
                let b = self.existing_node_id(h, cb);
                if a < b { (a, b) } else { (b, a) }
            })
            .collect();

        let mut kinds = vec![PortKind::Generic; 4];
        kinds.extend(ResourceKind::ALL.map(PortKind::Specific));
        for (i, edge) in coastal_edges.iter().step_by(3).enumerate() {
            let kind = kinds[i % kinds.len()];
            self.ports.push(Port { kind, nodes: *edge });
        }
    }
}

fn ring_fill(rings: u32) -> Vec<HexCoord> {
    let mut out = vec![HexCoord::ORIGIN];
    for radius in 1..=rings {
        let mut current = HexCoord::ORIGIN;
        for _ in 0..radius {
            current = current.step(Direction::NorthWest);
        }
        for dir in Direction::ALL {
            for _ in 0..radius {
                out.push(current);
                current = current.step(dir);
            }
        }
    }
    out
}
