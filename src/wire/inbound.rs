//! Inbound messages the brain must handle. Names are normative; the
//! low-level framing/serialization of each message is out of scope here —
//! by the time a value reaches [`crate::brain::Brain::on_message`] it is
//! already one of these well-formed variants.

use crate::board::{EdgeId, HexCoord};
use crate::model::{DevCardKind, DevCardOp, ElementOp, Location, PieceKind, Phase, PlayerElementField};
use crate::planner::Offer;
use crate::SeatId;

/// a decoded `MoveRobber` target. the wire encodes "pirate, not robber" as a
/// sign bit on the coordinate; that decoding is a framing detail and
/// happens before an `Inbound` value is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobberMove {
    pub hex: HexCoord,
    pub is_pirate: bool,
}

#[derive(Debug, Clone)]
pub enum Inbound {
    SitDown { seat: SeatId, name: String },
    RobotDismiss,
    Reset,
    GameState(Phase),
    Turn(SeatId),
    FirstPlayer(SeatId),
    SetTurn(SeatId),
    PutPiece { seat: SeatId, location: Location, kind: PieceKind },
    MovePiece { seat: SeatId, from: EdgeId, to: EdgeId, kind: PieceKind },
    CancelBuildRequest(PieceKind),
    PlayerElement { seat: SeatId, field: PlayerElementField, op: ElementOp, value: u16 },
    ResourceCount { seat: SeatId, total: u16 },
    DevCardCount(u16),
    DevCardAction { seat: SeatId, op: DevCardOp, kind: DevCardKind },
    SetPlayedDevCard { seat: SeatId, played: bool },
    DiceResult(u8, u8),
    DiscardRequest(u16),
    MoveRobber(RobberMove),
    ChoosePlayerRequest(Vec<SeatId>),
    ChoosePlayer(SeatId),
    PickResourcesRequest(u16),
    MakeOffer(Offer),
    /// `None` clears every offer on the table
    ClearOffer(Option<SeatId>),
    AcceptOffer { offerer: SeatId, accepter: SeatId },
    RejectOffer(SeatId),
    SimpleRequest { kind: u8, p1: i32, p2: i32 },
    SimpleAction { kind: u8, p1: i32, p2: i32 },
    SetSpecialItem { key: String, gi: i32, pi: i32 },
    PirateFortressAttackResult { seat: SeatId, strength_remaining: i32 },
    /// emitted by the companion pinger task, never by the server
    TimingPing,
}
