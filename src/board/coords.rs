//! Hex-grid coordinate math. Hexes sit on a cube lattice (x + y + z == 0);
//! nodes and edges are derived from a hex's six corners/sides so they come
//! out pre-canonicalized (two hexes that share a corner compute the same
//! neighbor set for it).

/// cube coordinate of a hex; `x + y + z == 0` always holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HexCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl HexCoord {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        debug_assert_eq!(x + y + z, 0, "cube coordinates must sum to zero");
        Self { x, y, z }
    }

    pub const ORIGIN: HexCoord = HexCoord { x: 0, y: 0, z: 0 };

    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy, dz) = dir.vector();
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub fn ring_distance(self, other: HexCoord) -> i32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()) / 2
    }

    pub fn neighbors(self) -> [HexCoord; 6] {
        Direction::ALL.map(|d| self.step(d))
    }
}

/// the six directions from one hex to an adjacent hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    SouthEast,
    SouthWest,
    West,
    NorthWest,
    NorthEast,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::East,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
        Direction::NorthEast,
    ];

    fn vector(self) -> (i32, i32, i32) {
        match self {
            Direction::East => (1, -1, 0),
            Direction::SouthEast => (0, -1, 1),
            Direction::SouthWest => (-1, 0, 1),
            Direction::West => (-1, 1, 0),
            Direction::NorthWest => (0, 1, -1),
            Direction::NorthEast => (1, 0, -1),
        }
    }
}

/// the six corners of a hex, in clockwise order starting at the top point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    North,
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
}

impl Corner {
    /// the (up to three) hexes that meet at this corner of `center`, not
    /// filtered for board membership
    pub fn touching(self, center: HexCoord) -> [HexCoord; 3] {
        use Direction::*;
        let (a, b) = match self {
            Corner::North => (NorthEast, NorthWest),
            Corner::NorthEast => (NorthEast, East),
            Corner::SouthEast => (East, SouthEast),
            Corner::South => (SouthEast, SouthWest),
            Corner::SouthWest => (SouthWest, West),
            Corner::NorthWest => (West, NorthWest),
        };
        [center, center.step(a), center.step(b)]
    }
}

/// the six edges of a hex, named after the direction they face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    East,
    SouthEast,
    SouthWest,
    West,
    NorthWest,
    NorthEast,
}

impl Side {
    pub const ALL: [Side; 6] = [
        Side::East,
        Side::SouthEast,
        Side::SouthWest,
        Side::West,
        Side::NorthWest,
        Side::NorthEast,
    ];

    /// the two corners (of `center`) this side connects
    pub fn endpoints(self) -> (Corner, Corner) {
        match self {
            Side::East => (Corner::NorthEast, Corner::SouthEast),
            Side::SouthEast => (Corner::SouthEast, Corner::South),
            Side::SouthWest => (Corner::South, Corner::SouthWest),
            Side::West => (Corner::SouthWest, Corner::NorthWest),
            Side::NorthWest => (Corner::NorthWest, Corner::North),
            Side::NorthEast => (Corner::North, Corner::NorthEast),
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Side::East => Direction::East,
            Side::SouthEast => Direction::SouthEast,
            Side::SouthWest => Direction::SouthWest,
            Side::West => Direction::West,
            Side::NorthWest => Direction::NorthWest,
            Side::NorthEast => Direction::NorthEast,
        }
    }
}
