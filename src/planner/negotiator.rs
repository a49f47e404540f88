//! The negotiator half of planning: considering incoming offers and
//! proposing outgoing ones against the current plan.

use super::offer::{Offer, OfferResponse, ResourceSet};
use crate::model::{Game, ResourceKind};
use crate::oracle;
use crate::trackers::PossibleKind;
use crate::{SeatId, MAX_SEATS};

/// per-player trade-willingness flags, reset every turn
#[derive(Debug, Clone)]
pub struct Negotiator {
    is_selling: Vec<[bool; 5]>,
    wants_another_offer: Vec<[bool; 5]>,
    done_trading: bool,
}

impl Default for Negotiator {
    fn default() -> Self {
        Self {
            is_selling: vec![[true; 5]; MAX_SEATS],
            wants_another_offer: vec![[true; 5]; MAX_SEATS],
            done_trading: false,
        }
    }
}

impl Negotiator {
    pub fn reset_for_turn(&mut self) {
        *self = Self::default();
    }

    pub fn mark_not_selling(&mut self, seat: SeatId, kind: ResourceKind) {
        if let Some(row) = self.is_selling.get_mut(seat as usize) {
            row[kind as usize] = false;
        }
    }

    pub fn is_selling(&self, seat: SeatId, kind: ResourceKind) -> bool {
        self.is_selling.get(seat as usize).is_some_and(|r| r[kind as usize])
    }

    pub fn mark_done_trading(&mut self) {
        self.done_trading = true;
    }

    pub fn done_trading(&self) -> bool {
        self.done_trading
    }

    /// examines an incoming offer addressed to `our_seat`: accept if we can
    /// afford what's asked and the offered set contains something we're
    /// short of; reject if we can't afford the ask; otherwise ignore.
    pub fn consider_offer(&self, game: &Game, our_seat: SeatId, offer: &Offer) -> OfferResponse {
        if !offer.targets(our_seat) {
            return OfferResponse::Ignore;
        }
        let Some(me) = game.seat(our_seat) else { return OfferResponse::Ignore };
        let can_pay = offer.get.iter().all(|(kind, n)| me.hand.get(kind) >= n);
        if !can_pay {
            return OfferResponse::Reject;
        }
        let we_need_something_offered = offer
            .give
            .iter()
            .any(|(kind, n)| n > 0 && me.hand.get(kind) == 0);
        if we_need_something_offered {
            OfferResponse::Accept
        } else {
            OfferResponse::Ignore
        }
    }

    /// proposes a trade that would let `our_seat` complete `target`, or
    /// `None` (marking `done_trading`) if trading is disabled, nothing is
    /// missing, or we have nothing to give.
    pub fn make_offer(
        &mut self,
        game: &Game,
        our_seat: SeatId,
        target: PossibleKind,
        trade_enabled: bool,
    ) -> Option<Offer> {
        if !trade_enabled {
            self.mark_done_trading();
            return None;
        }
        let me = game.seat(our_seat)?;
        let cost = oracle::resources_to_build(match target {
            PossibleKind::Road(_) => crate::model::PieceKind::Road,
            PossibleKind::Ship(_) => crate::model::PieceKind::Ship,
            PossibleKind::Settlement(_) => crate::model::PieceKind::Settlement,
            PossibleKind::City(_) => crate::model::PieceKind::City,
            PossibleKind::BuyDevCard | PossibleKind::PickSpecialItem => {
                self.mark_done_trading();
                return None;
            }
        });

        let mut get = ResourceSet::default();
        for (kind, n) in cost {
            let have = me.hand.get(*kind);
            if have < *n {
                get.add(*kind, n - have);
            }
        }
        if get.is_empty() {
            self.mark_done_trading();
            return None;
        }

        let mut give = ResourceSet::default();
        for kind in ResourceKind::ALL {
            let surplus = me.hand.get(kind).saturating_sub(cost_of(cost, kind));
            if surplus > 0 && get.get(kind) == 0 {
                give.add(kind, 1);
            }
        }
        if give.is_empty() {
            self.mark_done_trading();
            return None;
        }

        let mut to_mask = 0u8;
        for seat in game.seated() {
            if seat.seat != our_seat && self.is_selling(seat.seat, get.iter().next().map(|(k, _)| k).unwrap_or(ResourceKind::Wood)) {
                to_mask |= 1 << seat.seat;
            }
        }

        Some(Offer { from: our_seat, give, get, to_mask })
    }
}

fn cost_of(cost: &[(ResourceKind, u16)], kind: ResourceKind) -> u16 {
    cost.iter().find(|(k, _)| *k == kind).map(|(_, n)| *n).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::model::ScenarioOptions;

    fn game_with_hand() -> Game {
        let mut g = Game::new(Board::standard(2), ScenarioOptions::default());
        g.sit_down(0, "us");
        g.sit_down(1, "them");
        g
    }

    #[test]
    fn consider_offer_rejects_when_we_cannot_pay() {
        let g = game_with_hand();
        let neg = Negotiator::default();
        let offer = Offer {
            from: 1,
            give: ResourceSet::of(ResourceKind::Wheat, 1),
            get: ResourceSet::of(ResourceKind::Ore, 1),
            to_mask: 1 << 0,
        };
        assert_eq!(neg.consider_offer(&g, 0, &offer), OfferResponse::Reject);
    }

    #[test]
    fn consider_offer_ignores_offers_not_addressed_to_us() {
        let g = game_with_hand();
        let neg = Negotiator::default();
        let offer = Offer {
            from: 1,
            give: ResourceSet::of(ResourceKind::Wheat, 1),
            get: ResourceSet::of(ResourceKind::Ore, 1),
            to_mask: 0,
        };
        assert_eq!(neg.consider_offer(&g, 0, &offer), OfferResponse::Ignore);
    }

    #[test]
    fn make_offer_returns_none_and_marks_done_when_trading_disabled() {
        let g = game_with_hand();
        let mut neg = Negotiator::default();
        let result = neg.make_offer(&g, 0, PossibleKind::Road((0, 1)), false);
        assert!(result.is_none());
        assert!(neg.done_trading());
    }
}
