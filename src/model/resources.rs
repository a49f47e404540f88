//! Resource kinds and the per-player resource hand.

/// the five tradeable resources. the board also has a "desert" terrain
/// that produces nothing, so this is not the full terrain enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Clay,
    Ore,
    Sheep,
    Wheat,
    Wood,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Clay,
        ResourceKind::Ore,
        ResourceKind::Sheep,
        ResourceKind::Wheat,
        ResourceKind::Wood,
    ];
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResourceKind::Clay => "clay",
            ResourceKind::Ore => "ore",
            ResourceKind::Sheep => "sheep",
            ResourceKind::Wheat => "wheat",
            ResourceKind::Wood => "wood",
        };
        write!(f, "{s}")
    }
}

/// a player's resource hand. `unknown` holds cards whose exact kind we
/// can't see — always zero for our own hand, used for opponents whenever
/// the mirror can't track composition exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceHand {
    counts: [ResourceCountT; 5],
    pub unknown: ResourceCountT,
}

type ResourceCountT = crate::ResourceCount;

impl ResourceHand {
    pub fn get(&self, kind: ResourceKind) -> ResourceCountT {
        self.counts[kind as usize]
    }

    fn get_mut(&mut self, kind: ResourceKind) -> &mut ResourceCountT {
        &mut self.counts[kind as usize]
    }

    pub fn total(&self) -> ResourceCountT {
        self.counts.iter().sum::<ResourceCountT>() + self.unknown
    }

    pub fn gain(&mut self, kind: ResourceKind, n: ResourceCountT) {
        *self.get_mut(kind) += n;
    }

    /// loses `n` of `kind` if we believe that many are known; any excess
    /// is debited from `unknown` instead of underflowing
    pub fn lose(&mut self, kind: ResourceKind, n: ResourceCountT) {
        let have = self.get(kind);
        let known_loss = have.min(n);
        *self.get_mut(kind) -= known_loss;
        let shortfall = n - known_loss;
        self.unknown = self.unknown.saturating_sub(shortfall);
    }

    pub fn set(&mut self, kind: ResourceKind, n: ResourceCountT) {
        *self.get_mut(kind) = n;
    }

    /// rewrites this hand to `total` cards, all unknown — used when a
    /// `ResourceCount` assertion from the server disagrees with our
    /// mirrored belief about an opponent's hand
    pub fn flatten_to_unknown(&mut self, total: ResourceCountT) {
        self.counts = [0; 5];
        self.unknown = total;
    }

    pub fn can_afford(&self, cost: &[(ResourceKind, ResourceCountT)]) -> bool {
        cost.iter().all(|(kind, n)| self.get(*kind) >= *n)
    }

    pub fn pay(&mut self, cost: &[(ResourceKind, ResourceCountT)]) {
        for (kind, n) in cost {
            self.lose(*kind, *n);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, ResourceCountT)> + '_ {
        ResourceKind::ALL
            .into_iter()
            .map(move |k| (k, self.get(k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lose_more_than_known_debits_unknown() {
        let mut hand = ResourceHand::default();
        hand.gain(ResourceKind::Ore, 1);
        hand.unknown = 3;
        hand.lose(ResourceKind::Ore, 2);
        assert_eq!(hand.get(ResourceKind::Ore), 0);
        assert_eq!(hand.unknown, 2);
        assert_eq!(hand.total(), 2);
    }

    #[test]
    fn flatten_collapses_known_counts() {
        let mut hand = ResourceHand::default();
        hand.gain(ResourceKind::Wood, 4);
        hand.gain(ResourceKind::Clay, 1);
        hand.flatten_to_unknown(5);
        assert_eq!(hand.get(ResourceKind::Wood), 0);
        assert_eq!(hand.get(ResourceKind::Clay), 0);
        assert_eq!(hand.unknown, 5);
        assert_eq!(hand.total(), 5);
    }

    #[test]
    fn afford_and_pay() {
        let mut hand = ResourceHand::default();
        hand.gain(ResourceKind::Wood, 1);
        hand.gain(ResourceKind::Clay, 1);
        let cost = [(ResourceKind::Wood, 1), (ResourceKind::Clay, 1)];
        assert!(hand.can_afford(&cost));
        hand.pay(&cost);
        assert_eq!(hand.total(), 0);
    }
}
