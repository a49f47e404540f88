//! Development card bookkeeping: dev-card inventory split into playable-now
//! and new-this-turn.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DevCardKind {
    Knight,
    RoadBuilding,
    YearOfPlenty,
    Monopoly,
    VictoryPoint,
}

impl DevCardKind {
    pub const ALL: [DevCardKind; 5] = [
        DevCardKind::Knight,
        DevCardKind::RoadBuilding,
        DevCardKind::YearOfPlenty,
        DevCardKind::Monopoly,
        DevCardKind::VictoryPoint,
    ];
}

/// a player's dev-card holdings, aged into "playable now" and "bought this
/// turn" per kind so a card can't be played the same turn it's bought.
#[derive(Debug, Clone, Copy, Default)]
pub struct DevCardInventory {
    old: [u8; 5],
    new: [u8; 5],
}

impl DevCardInventory {
    fn idx(kind: DevCardKind) -> usize {
        DevCardKind::ALL.iter().position(|k| *k == kind).unwrap()
    }

    pub fn playable_now(&self, kind: DevCardKind) -> u8 {
        self.old[Self::idx(kind)]
    }

    pub fn bought_this_turn(&self, kind: DevCardKind) -> u8 {
        self.new[Self::idx(kind)]
    }

    pub fn total(&self, kind: DevCardKind) -> u8 {
        self.playable_now(kind) + self.bought_this_turn(kind)
    }

    pub fn draw(&mut self, kind: DevCardKind) {
        self.new[Self::idx(kind)] += 1;
    }

    pub fn play(&mut self, kind: DevCardKind) {
        let i = Self::idx(kind);
        debug_assert!(self.old[i] > 0, "playing a card we don't hold playable");
        self.old[i] = self.old[i].saturating_sub(1);
    }

    /// sets a raw count directly, used by `apply_devcard_action`'s ADD_OLD /
    /// ADD_NEW ops when the server asserts an absolute total rather than a
    /// delta
    pub fn set_old(&mut self, kind: DevCardKind, n: u8) {
        self.old[Self::idx(kind)] = n;
    }

    pub fn set_new(&mut self, kind: DevCardKind, n: u8) {
        self.new[Self::idx(kind)] = n;
    }

    /// called on `Turn`: last turn's purchases become playable
    pub fn age(&mut self) {
        for i in 0..5 {
            self.old[i] += self.new[i];
            self.new[i] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bought_card_is_not_playable_until_aged() {
        let mut inv = DevCardInventory::default();
        inv.draw(DevCardKind::Knight);
        assert_eq!(inv.playable_now(DevCardKind::Knight), 0);
        assert_eq!(inv.total(DevCardKind::Knight), 1);
        inv.age();
        assert_eq!(inv.playable_now(DevCardKind::Knight), 1);
    }

    #[test]
    fn play_consumes_a_playable_card() {
        let mut inv = DevCardInventory::default();
        inv.draw(DevCardKind::Monopoly);
        inv.age();
        inv.play(DevCardKind::Monopoly);
        assert_eq!(inv.playable_now(DevCardKind::Monopoly), 0);
    }
}
