//! Trade offers. An `Offer` is addressed to a mask of seats, not a single
//! target, matching the wire `MakeOffer` message.

use crate::model::ResourceKind;
use crate::{SeatId, MAX_SEATS};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceSet([u16; 5]);

impl ResourceSet {
    pub fn of(kind: ResourceKind, n: u16) -> Self {
        let mut s = Self::default();
        s.0[kind as usize] = n;
        s
    }

    pub fn get(&self, kind: ResourceKind) -> u16 {
        self.0[kind as usize]
    }

    pub fn add(&mut self, kind: ResourceKind, n: u16) {
        self.0[kind as usize] += n;
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u16)> + '_ {
        ResourceKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|n| *n == 0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Offer {
    pub from: SeatId,
    pub give: ResourceSet,
    pub get: ResourceSet,
    /// bitmask over `0..MAX_SEATS`; seat bit set means this offer is open
    /// to that seat
    pub to_mask: u8,
}

impl Offer {
    pub fn targets(&self, seat: SeatId) -> bool {
        (seat as usize) < MAX_SEATS && self.to_mask & (1 << seat) != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferResponse {
    Accept,
    Reject,
    Counter,
    Ignore,
}
