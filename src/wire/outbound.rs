//! Outbound actions the brain may emit.

use crate::model::{DevCardKind, Location, PieceKind, ResourceKind};
use crate::planner::{Offer, ResourceSet};
use crate::wire::inbound::RobberMove;
use crate::SeatId;

#[derive(Debug, Clone, Copy)]
pub enum BuildRequestKind {
    Piece(PieceKind),
    /// kind = -1 on the wire: request a Special Building slot
    SpecialBuildSlot,
    /// kind = -2 on the wire: buy a dev card
    BuyDevCard,
}

/// `ChoosePlayer(seat | -(seat+1) for cloth)`
#[derive(Debug, Clone, Copy)]
pub enum ChoosePlayerTarget {
    Seat(SeatId),
    Cloth(SeatId),
}

#[derive(Debug, Clone)]
pub enum Outbound {
    PutPiece { location: Location, kind: PieceKind },
    BuildRequest(BuildRequestKind),
    BuyDevCard,
    PlayDevCard(DevCardKind),
    PickFreeResources(ResourceSet),
    DiscoveryPick(ResourceSet),
    MonopolyPick(ResourceKind),
    Discard(ResourceSet),
    MoveRobber(RobberMove),
    ChoosePlayer(ChoosePlayerTarget),
    BankTrade { give: ResourceSet, get: ResourceSet },
    OfferTrade(Offer),
    AcceptOffer(SeatId),
    RejectOffer,
    ClearOffer,
    /// emitted on our `ROLL` turn to request the dice roll; named
    /// explicitly here rather than folded into `SimpleRequest`, since every
    /// other roll-triggering action implies its existence.
    RollDice,
    PickSpecialItem { key: String, gi: i32, pi: i32 },
    SimpleRequest { kind: u8, p1: i32, p2: i32 },
    EndTurn,
    LeaveGame(String),
    Resend,
    /// diagnostic reporting only, never parsed by the server as an action
    SendText(String),
    CancelBuildRequest(PieceKind),
}
