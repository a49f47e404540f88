//! A "possible piece": one tagged enum covering every Road/Ship/Settlement/
//! City/Card/Special candidate, with a shared header and an arm-specific
//! location, rather than a hierarchy of mutable subtypes.

use crate::board::{EdgeId, NodeId};
use crate::{Eta, Score, SeatId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PossibleKind {
    Road(EdgeId),
    Ship(EdgeId),
    Settlement(NodeId),
    City(NodeId),
    BuyDevCard,
    PickSpecialItem,
}

/// a candidate future placement or purchase, per-seat. Identity for
/// tracker bookkeeping is `(owner, kind)` — a tracker holds at most one
/// possible piece per location per kind.
#[derive(Debug, Clone)]
pub struct PossiblePiece {
    pub owner: SeatId,
    pub kind: PossibleKind,
    pub eta: Eta,
    pub score: Score,
    /// other players' possible pieces that would invalidate or contest this
    /// one before we could realize it
    pub threats: Vec<PossibleKind>,
    /// subset of `threats` judged most urgent; drives planner re-ranking
    pub biggest_threats: Vec<PossibleKind>,
    /// set once this possible piece has had its adjacency expanded into
    /// further possible pieces (e.g. a possible settlement expanding into
    /// the roads that would reach it)
    pub expanded: bool,
}

impl PossiblePiece {
    pub fn new(owner: SeatId, kind: PossibleKind) -> Self {
        Self {
            owner,
            kind,
            eta: Eta::MAX,
            score: 0.0,
            threats: Vec::new(),
            biggest_threats: Vec::new(),
            expanded: false,
        }
    }

    pub fn is_buildable_now(&self) -> bool {
        self.eta == 0
    }
}
