//! The brain driver: the single entry point tying the game model mirror,
//! legal-move oracle, trackers, and planner+negotiator together.
//! `Brain::on_message` is the whole main loop — record the event, mutate the
//! mirror, then dispatch on the (possibly now-changed) phase.

use super::recovery;
use super::state::{BrainState, RobberOrigin};
use crate::board::{Board, HexCoord, NodeId};
use crate::diagnostics::DiagnosticsSink;
use crate::model::{
    DevCardKind, DevCardOp, Game, Location, PieceKind, Phase, ResourceKind, ScenarioOptions,
};
use crate::oracle;
use crate::planner::{self, BuildingPlan, Negotiator, Offer, OfferResponse, ResourceSet};
use crate::trackers::{PlacementEvent, PossibleKind, TrackerSet};
use crate::wire::{BrainConfig, BuildRequestKind, ChoosePlayerTarget, Inbound, Outbound, RobberMove};
use crate::{SeatId, MAX_SEATS};

pub struct Brain {
    pub game: Game,
    pub trackers: TrackerSet,
    pub plan: BuildingPlan,
    pub negotiator: Negotiator,
    pub state: BrainState,
    pub config: BrainConfig,
    diagnostics: Box<dyn DiagnosticsSink>,
}

impl Brain {
    pub fn new(
        board: Board,
        options: ScenarioOptions,
        config: BrainConfig,
        diagnostics: Box<dyn DiagnosticsSink>,
    ) -> Self {
        Self {
            game: Game::new(board, options),
            trackers: TrackerSet::new(),
            plan: BuildingPlan::default(),
            negotiator: Negotiator::default(),
            state: BrainState::default(),
            config,
            diagnostics,
        }
    }

    /// the whole main loop. a `TimingPing` only ever drives timeouts; every
    /// other message records itself, mutates the mirror, and dispatches.
    pub fn on_message(&mut self, msg: Inbound) -> Vec<Outbound> {
        if self.state.left_game {
            return Vec::new();
        }
        if matches!(msg, Inbound::TimingPing) {
            self.state.tick();
            return self.handle_tick();
        }

        self.state.reset_counter();
        self.state.record_event(format!("{msg:?}"));
        self.diagnostics.record(&format!("recv {msg:?}"));
        self.apply_inbound(&msg);

        match &msg {
            Inbound::CancelBuildRequest(kind) => self.handle_cancel_build(*kind),
            Inbound::PickResourcesRequest(n) => self.handle_pick_resources(*n),
            Inbound::MakeOffer(offer) => self.handle_incoming_offer(offer),
            _ => self.dispatch(),
        }
    }

    fn reset_game(&mut self) {
        let board = self.game.board.clone();
        let options = self.game.options;
        self.game = Game::new(board, options);
        self.trackers = TrackerSet::new();
        self.plan.clear();
        self.negotiator.reset_for_turn();
        self.state = BrainState::default();
    }

    fn apply_inbound(&mut self, msg: &Inbound) {
        match msg {
            Inbound::SitDown { seat, name } => self.game.sit_down(*seat, name.clone()),
            Inbound::RobotDismiss => self.state.left_game = true,
            Inbound::Reset => self.reset_game(),
            Inbound::GameState(phase) => {
                self.game.set_phase(*phase);
                self.state.waiting_for_gamestate = false;
                // any phase transition is forward progress; a Knight play that
                // prompted this transition has been acknowledged one way or
                // another by the time a new phase arrives
                self.state.waiting_for_devcard = false;
            }
            Inbound::Turn(seat) => {
                self.game.advance_turn(*seat);
                self.state.begin_new_turn();
                self.negotiator.reset_for_turn();
                self.plan.clear();
            }
            Inbound::FirstPlayer(seat) => self.game.set_current_player(*seat),
            Inbound::SetTurn(seat) => self.game.set_current_player(*seat),
            Inbound::PutPiece { seat, location, kind } => {
                self.game.apply_put_piece(*seat, *location, *kind);
                self.trackers.on_placement(
                    &self.game,
                    PlacementEvent::Placed { seat: *seat, kind: *kind, location: *location },
                );
                self.confirm_planned_build(*seat, Some((*location, *kind)));
            }
            Inbound::MovePiece { seat, from, to, kind } => {
                if *kind == PieceKind::Ship {
                    self.game.apply_move_piece(*seat, *from, *to);
                    self.trackers.on_placement(
                        &self.game,
                        PlacementEvent::Placed {
                            seat: *seat,
                            kind: PieceKind::Ship,
                            location: Location::Edge(*to),
                        },
                    );
                }
            }
            // handled entirely by `handle_cancel_build`, not here
            Inbound::CancelBuildRequest(_) => {}
            Inbound::PlayerElement { seat, field, op, value } => {
                self.game.apply_player_element(*seat, *field, *op, *value)
            }
            Inbound::ResourceCount { seat, total } => {
                self.game.apply_resource_count_assert(*seat, *total)
            }
            Inbound::DevCardCount(n) => self.game.devcards_remaining = *n,
            Inbound::DevCardAction { seat, op, kind } => {
                self.game.apply_devcard_action(*seat, *kind, *op);
                if *op == DevCardOp::Draw {
                    self.confirm_planned_devcard_purchase(*seat);
                }
                if *op == DevCardOp::CannotPlay {
                    recovery::handle_devcard_rejected(&mut self.state, *kind);
                }
            }
            Inbound::SetPlayedDevCard { seat, played } => {
                if let Some(p) = self.game.seat_mut(*seat) {
                    p.played_devcard_this_turn = *played;
                }
            }
            Inbound::DiceResult(a, b) => self.game.apply_dice((*a, *b)),
            Inbound::DiscardRequest(_) => {}
            Inbound::MoveRobber(mv) => {
                if mv.is_pirate {
                    self.game.apply_pirate_hex(mv.hex);
                } else {
                    self.game.apply_robber_hex(mv.hex);
                }
            }
            Inbound::ChoosePlayerRequest(_) => {}
            Inbound::ChoosePlayer(_) => {}
            Inbound::PickResourcesRequest(_) => {}
            Inbound::MakeOffer(offer) => {
                if let Some(p) = self.game.seat_mut(offer.from) {
                    p.open_offer = Some(*offer);
                }
            }
            Inbound::ClearOffer(seat) => match seat {
                Some(s) => {
                    if let Some(p) = self.game.seat_mut(*s) {
                        p.open_offer = None;
                    }
                }
                None => {
                    for seat in 0..MAX_SEATS as SeatId {
                        if let Some(p) = self.game.seat_mut(seat) {
                            p.open_offer = None;
                        }
                    }
                }
            },
            Inbound::AcceptOffer { offerer, accepter: _ } => {
                if let Some(p) = self.game.seat_mut(*offerer) {
                    p.open_offer = None;
                }
            }
            Inbound::RejectOffer(_) => {}
            Inbound::SimpleRequest { .. } => {}
            Inbound::SimpleAction { .. } => {}
            Inbound::SetSpecialItem { .. } => {}
            Inbound::PirateFortressAttackResult { .. } => {
                self.state.waiting_for_fortress_attack = false;
            }
            Inbound::TimingPing => unreachable!("handled before apply_inbound"),
        }
    }

    /// `PickResourcesRequest` (gold hex production): not tied to any phase,
    /// so it's handled directly rather than through `dispatch`. Picks
    /// whatever the current plan's top is still missing first, then fills
    /// any remainder with the rarest-producing resource on the board.
    fn handle_pick_resources(&mut self, n: u16) -> Vec<Outbound> {
        let mut set = ResourceSet::default();
        let mut picked = 0u16;
        if let Some(my_seat) = self.game.my_seat {
            for (kind, need) in self.missing_for_top(my_seat) {
                if picked >= n {
                    break;
                }
                let take = need.min(n - picked);
                set.add(kind, take);
                picked += take;
            }
        }
        if picked < n {
            let rarity = oracle::estimate_resource_rarity(&self.game);
            let rarest = ResourceKind::ALL
                .into_iter()
                .min_by_key(|k| rarity[*k as usize])
                .unwrap_or(ResourceKind::Ore);
            set.add(rarest, n - picked);
        }
        vec![Outbound::PickFreeResources(set)]
    }

    /// `MakeOffer` addressed to us: evaluate it immediately, independent of
    /// phase. Offers we made ourselves, or addressed to other seats, are
    /// already fully handled by `apply_inbound`'s bookkeeping.
    fn handle_incoming_offer(&mut self, offer: &Offer) -> Vec<Outbound> {
        let Some(my_seat) = self.game.my_seat else { return Vec::new() };
        if offer.from == my_seat || !offer.targets(my_seat) {
            return Vec::new();
        }
        match self.negotiator.consider_offer(&self.game, my_seat, offer) {
            OfferResponse::Accept => vec![Outbound::AcceptOffer(offer.from)],
            OfferResponse::Reject => vec![Outbound::RejectOffer],
            OfferResponse::Counter => match self.plan.top() {
                Some(top) => match self.negotiator.make_offer(&self.game, my_seat, top, !self.config.trade_disabled) {
                    Some(counter) => vec![Outbound::OfferTrade(counter)],
                    None => vec![Outbound::RejectOffer],
                },
                None => vec![Outbound::RejectOffer],
            },
            OfferResponse::Ignore => Vec::new(),
        }
    }

    /// `CancelBuildRequest`: during initial placement we immediately retry
    /// (the same turn, the same phase), so the retry is folded into this
    /// same dispatch instead of waiting on another inbound message.
    fn handle_cancel_build(&mut self, kind: PieceKind) -> Vec<Outbound> {
        self.state.waiting_for_gamestate = false;
        let out = recovery::handle_cancel_build_request(
            &self.game,
            &mut self.state,
            &mut self.plan,
            &mut self.trackers,
            kind,
        );

        if oracle::is_initial_placement(&self.game) {
            if self.state.failed_builds_this_turn > 2 * self.config.max_denied_per_turn {
                self.state.left_game = true;
                return vec![Outbound::LeaveGame(format!(
                    "too many denied initial-placement builds this turn: {}",
                    self.state.failed_builds_this_turn
                ))];
            }
            return self.dispatch();
        }

        out
    }

    fn handle_tick(&mut self) -> Vec<Outbound> {
        let mut out = Vec::new();

        if self.state.waiting_for_trade_msg && self.state.counter > 10 {
            self.state.waiting_for_trade_msg = false;
        }

        if self.state.waiting_for_trade_response && self.state.counter > 100 {
            if let Some(my_seat) = self.game.my_seat {
                let open = self.game.seat(my_seat).and_then(|p| p.open_offer);
                if let Some(offer) = open {
                    for seat in 0..MAX_SEATS as SeatId {
                        if offer.targets(seat) {
                            for (kind, n) in offer.get.iter() {
                                if n > 0 {
                                    self.negotiator.mark_not_selling(seat, kind);
                                }
                            }
                        }
                    }
                    if let Some(p) = self.game.seat_mut(my_seat) {
                        p.open_offer = None;
                    }
                }
            }
            self.state.waiting_for_trade_response = false;
            out.push(Outbound::ClearOffer);
        }

        if self.state.waiting_for_gamestate && self.state.counter > 10_000 {
            out.push(Outbound::Resend);
        }

        if self.state.counter > 15_000 {
            self.state.left_game = true;
            out.push(Outbound::LeaveGame(format!(
                "no forward progress after {} ticks",
                self.state.counter
            )));
        }

        out
    }

    fn dispatch(&mut self) -> Vec<Outbound> {
        let Some(my_seat) = self.game.my_seat else { return Vec::new() };
        if self.state.waiting_for_gamestate {
            return Vec::new();
        }
        let our_turn = self.game.current_player == Some(my_seat);

        match self.game.phase {
            Phase::InitSettle1a | Phase::InitSettle2a | Phase::InitSettle3a if our_turn => {
                self.place_initial_settlement(my_seat)
            }
            Phase::InitRoad1b | Phase::InitRoad2b | Phase::InitRoad3b if our_turn => {
                self.place_initial_road(my_seat)
            }
            Phase::PlacingRoad
            | Phase::PlacingShip
            | Phase::PlacingSettlement
            | Phase::PlacingCity
            | Phase::PlacingFreeRoad1
            | Phase::PlacingFreeRoad2
                if our_turn =>
            {
                self.place_planned_piece()
            }
            Phase::PlacingRobber if our_turn => self.move_robber(my_seat),
            Phase::WaitingForRobberOrPirate if our_turn => {
                // the brain never attacks the pirate, only the robber;
                // this just records how we got here
                self.state.robber_origin = RobberOrigin::RolledSeven;
                Vec::new()
            }
            Phase::WaitingForDiscards => self.discard_resources(my_seat),
            Phase::WaitingForDiscovery if our_turn => self.pick_discovery_resources(my_seat),
            Phase::WaitingForMonopoly if our_turn => self.pick_monopoly_resource(my_seat),
            Phase::WaitingForRobChoosePlayer if our_turn => self.choose_rob_victim(),
            Phase::Roll if our_turn => {
                if self.state.waiting_for_devcard {
                    Vec::new()
                } else if self.should_play_knight_to_unblock(my_seat) {
                    self.state.robber_origin = RobberOrigin::PreRollKnight;
                    self.state.waiting_for_devcard = true;
                    vec![Outbound::PlayDevCard(DevCardKind::Knight)]
                } else {
                    self.state.waiting_for_gamestate = true;
                    vec![Outbound::RollDice]
                }
            }
            Phase::Play | Phase::SpecialBuilding if our_turn => self.play_turn(my_seat),
            _ => Vec::new(),
        }
    }

    fn place_initial_settlement(&mut self, my_seat: SeatId) -> Vec<Outbound> {
        let node = (0..self.game.board.node_count() as NodeId)
            .find(|n| oracle::is_potential_settlement(&self.game, my_seat, *n));
        let Some(node) = node else { return Vec::new() };
        self.state.last_initial_settlement = Some(node);
        self.state.what_we_want_to_build = Some(PossibleKind::Settlement(node));
        self.state.waiting_for_gamestate = true;
        vec![Outbound::PutPiece { location: Location::Node(node), kind: PieceKind::Settlement }]
    }

    fn place_initial_road(&mut self, my_seat: SeatId) -> Vec<Outbound> {
        let Some(node) = self.state.last_initial_settlement else { return Vec::new() };
        let edge = self
            .game
            .board
            .edges_of_node(node)
            .iter()
            .copied()
            .find(|e| oracle::is_potential_road(&self.game, my_seat, *e));
        let Some(edge) = edge else { return Vec::new() };
        self.state.last_initial_road = Some(edge);
        self.state.what_we_want_to_build = Some(PossibleKind::Road(edge));
        self.state.waiting_for_gamestate = true;
        vec![Outbound::PutPiece { location: Location::Edge(edge), kind: PieceKind::Road }]
    }

    fn place_planned_piece(&mut self) -> Vec<Outbound> {
        let Some(target) = self.state.what_we_want_to_build else { return Vec::new() };
        let Some((location, kind)) = possible_to_piece(target) else { return Vec::new() };
        self.state.waiting_for_gamestate = true;
        vec![Outbound::PutPiece { location, kind }]
    }

    fn move_robber(&mut self, my_seat: SeatId) -> Vec<Outbound> {
        let our_hexes: Vec<HexCoord> = self
            .game
            .pieces_of(my_seat)
            .filter_map(|p| match p.at {
                Location::Node(n) => Some(n),
                Location::Edge(_) => None,
            })
            .flat_map(|n| self.game.board.hexes_of_node(n).to_vec())
            .collect();
        let target = self
            .game
            .board
            .hexes()
            .find(|h| Some(*h) != self.game.robber_hex && !our_hexes.contains(h));
        let Some(hex) = target else { return Vec::new() };
        self.state.waiting_for_gamestate = true;
        vec![Outbound::MoveRobber(RobberMove { hex, is_pirate: false })]
    }

    /// true once the robber sits on a hex adjacent to one of our own
    /// settlements/cities, i.e. is actively suppressing our production
    fn robber_blocks_our_production(&self, my_seat: SeatId) -> bool {
        let Some(robber_hex) = self.game.robber_hex else { return false };
        self.game
            .pieces_of(my_seat)
            .filter_map(|p| match p.at {
                Location::Node(n) => Some(n),
                Location::Edge(_) => None,
            })
            .any(|n| self.game.board.hexes_of_node(n).contains(&robber_hex))
    }

    /// a playable Knight is worth playing, pre-roll or mid-turn, only when
    /// it would actually free up one of our own production hexes
    fn should_play_knight_to_unblock(&self, my_seat: SeatId) -> bool {
        oracle::may_play_knight(&self.game, my_seat) && self.robber_blocks_our_production(my_seat)
    }

    fn discard_resources(&mut self, my_seat: SeatId) -> Vec<Outbound> {
        let Some(me) = self.game.seat(my_seat) else { return Vec::new() };
        let total = me.hand.total();
        if total <= 7 {
            return Vec::new();
        }
        let mut remaining = total / 2;
        let mut counts: Vec<(ResourceKind, u16)> = me.hand.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        let mut set = ResourceSet::default();
        for (kind, have) in counts {
            if remaining == 0 {
                break;
            }
            let take = have.min(remaining);
            if take > 0 {
                set.add(kind, take);
                remaining -= take;
            }
        }
        self.state.waiting_for_gamestate = true;
        vec![Outbound::Discard(set)]
    }

    fn pick_discovery_resources(&mut self, my_seat: SeatId) -> Vec<Outbound> {
        let mut set = ResourceSet::default();
        let mut picked = 0u16;
        for (kind, n) in self.missing_for_top(my_seat) {
            if picked >= 2 {
                break;
            }
            let take = n.min(2 - picked);
            set.add(kind, take);
            picked += take;
        }
        if picked < 2 {
            set.add(ResourceKind::Wood, 2 - picked);
        }
        self.state.waiting_for_gamestate = true;
        vec![Outbound::DiscoveryPick(set)]
    }

    fn pick_monopoly_resource(&mut self, my_seat: SeatId) -> Vec<Outbound> {
        let kind = self
            .missing_for_top(my_seat)
            .first()
            .map(|(k, _)| *k)
            .unwrap_or(ResourceKind::Ore);
        self.state.waiting_for_gamestate = true;
        vec![Outbound::MonopolyPick(kind)]
    }

    fn choose_rob_victim(&mut self) -> Vec<Outbound> {
        let Some(my_seat) = self.game.my_seat else { return Vec::new() };
        let target = self
            .game
            .seated()
            .filter(|p| p.seat != my_seat && p.hand.total() > 0)
            .max_by_key(|p| p.hand.total())
            .map(|p| p.seat);
        let Some(seat) = target else { return Vec::new() };
        self.state.waiting_for_gamestate = true;
        vec![Outbound::ChoosePlayer(ChoosePlayerTarget::Seat(seat))]
    }

    /// in rough priority order: play a Knight if the robber is sitting on
    /// one of our hexes, play a Road Building two-roads play, play Year of
    /// Plenty / Monopoly if they'd unblock the plan, trade (peer then
    /// bank), then build, else end the turn.
    fn play_turn(&mut self, my_seat: SeatId) -> Vec<Outbound> {
        if self.state.waiting_for_trade_response || self.state.waiting_for_devcard {
            return Vec::new();
        }

        if self.game.phase == Phase::Play && self.should_play_knight_to_unblock(my_seat) {
            self.state.robber_origin = RobberOrigin::PreRollKnight;
            self.state.waiting_for_devcard = true;
            return vec![Outbound::PlayDevCard(DevCardKind::Knight)];
        }

        if self.plan.is_empty() {
            self.plan =
                planner::plan_stuff(&self.game, self.trackers.tracker(my_seat), self.config.strategy.into());
        }

        if let (Some(top), Some(second)) = (self.plan.top(), self.plan.second_from_top()) {
            if matches!(top, PossibleKind::Road(_))
                && matches!(second, PossibleKind::Road(_))
                && oracle::may_play_roads(&self.game, my_seat)
            {
                self.state.what_we_want_to_build = Some(top);
                self.state.waiting_for_devcard = true;
                return vec![Outbound::PlayDevCard(DevCardKind::RoadBuilding)];
            }
        }

        if oracle::may_play_disc(&self.game, my_seat) && self.plan_needs_multiple_resources(my_seat) {
            self.state.waiting_for_devcard = true;
            return vec![Outbound::PlayDevCard(DevCardKind::YearOfPlenty)];
        }

        if oracle::may_play_mono(&self.game, my_seat) && self.plan_blocked_on_single_resource(my_seat) {
            self.state.waiting_for_devcard = true;
            return vec![Outbound::PlayDevCard(DevCardKind::Monopoly)];
        }

        if !self.negotiator.done_trading() {
            if let Some(offer) = self.try_make_offer(my_seat) {
                if let Some(p) = self.game.seat_mut(my_seat) {
                    p.open_offer = Some(offer);
                }
                self.state.waiting_for_trade_response = true;
                return vec![Outbound::OfferTrade(offer)];
            }
            if let Some((give, get)) = self.try_bank_trade(my_seat) {
                return vec![Outbound::BankTrade { give, get }];
            }
        }

        if let Some(target) = self.plan.top() {
            let ready = match possible_to_piece(target) {
                Some((_, kind)) => !recovery::would_repeat_failed_build(&self.state, kind),
                None => matches!(target, PossibleKind::BuyDevCard),
            };
            if ready && self.is_affordable(my_seat, target) {
                return self.begin_build(target);
            }
        }

        vec![Outbound::EndTurn]
    }

    fn begin_build(&mut self, target: PossibleKind) -> Vec<Outbound> {
        self.state.what_we_want_to_build = Some(target);
        self.state.waiting_for_gamestate = true;
        match possible_to_piece(target) {
            Some((_, kind)) => vec![Outbound::BuildRequest(BuildRequestKind::Piece(kind))],
            None if matches!(target, PossibleKind::BuyDevCard) => vec![Outbound::BuyDevCard],
            None => vec![Outbound::EndTurn],
        }
    }

    fn is_affordable(&self, my_seat: SeatId, target: PossibleKind) -> bool {
        let Some(me) = self.game.seat(my_seat) else { return false };
        if matches!(target, PossibleKind::BuyDevCard) {
            return self.game.devcards_remaining > 0 && me.hand.can_afford(&oracle::DEVCARD_COST);
        }
        let Some((_, kind)) = possible_to_piece(target) else { return false };
        me.hand.can_afford(oracle::resources_to_build(kind))
    }

    /// a `PutPiece` naming our own seat confirms a planned build succeeded;
    /// advance the plan past it rather than leaving its now-built top
    /// pointing at a piece we already have.
    fn confirm_planned_build(&mut self, seat: SeatId, built: Option<(Location, PieceKind)>) {
        if Some(seat) != self.game.my_seat {
            return;
        }
        let Some(target) = self.state.what_we_want_to_build else { return };
        if possible_to_piece(target) != built {
            return;
        }
        if self.plan.top() == Some(target) {
            self.plan.pop();
        }
        self.state.what_we_want_to_build = None;
    }

    /// a `DevCardAction(DRAW)` naming our own seat confirms a planned
    /// dev-card purchase; same bookkeeping as [`Self::confirm_planned_build`]
    /// for the one possible-piece kind with no board location.
    fn confirm_planned_devcard_purchase(&mut self, seat: SeatId) {
        if Some(seat) != self.game.my_seat {
            return;
        }
        if self.state.what_we_want_to_build != Some(PossibleKind::BuyDevCard) {
            return;
        }
        if self.plan.top() == Some(PossibleKind::BuyDevCard) {
            self.plan.pop();
        }
        self.state.what_we_want_to_build = None;
    }

    /// resources still short of the plan's top entry's build cost, capped
    /// to what's actually missing
    fn missing_for_top(&self, my_seat: SeatId) -> Vec<(ResourceKind, u16)> {
        let Some(top) = self.plan.top() else { return Vec::new() };
        let Some((_, kind)) = possible_to_piece(top) else { return Vec::new() };
        let Some(me) = self.game.seat(my_seat) else { return Vec::new() };
        oracle::resources_to_build(kind)
            .iter()
            .filter_map(|(rk, n)| {
                let short = n.saturating_sub(me.hand.get(*rk));
                (short > 0).then_some((*rk, short))
            })
            .collect()
    }

    fn plan_needs_multiple_resources(&self, my_seat: SeatId) -> bool {
        self.missing_for_top(my_seat).iter().map(|(_, n)| n).sum::<u16>() >= 2
    }

    fn plan_blocked_on_single_resource(&self, my_seat: SeatId) -> bool {
        matches!(self.missing_for_top(my_seat).as_slice(), [(_, n)] if *n >= 1)
    }

    fn try_make_offer(&mut self, my_seat: SeatId) -> Option<Offer> {
        if self.config.trade_disabled {
            return None;
        }
        let top = self.plan.top()?;
        self.negotiator.make_offer(&self.game, my_seat, top, true)
    }

    fn try_bank_trade(&self, my_seat: SeatId) -> Option<(ResourceSet, ResourceSet)> {
        let top = self.plan.top()?;
        let (_, kind) = possible_to_piece(top)?;
        let me = self.game.seat(my_seat)?;
        let cost = oracle::resources_to_build(kind);
        let (need_kind, need_total) = cost.iter().find(|(rk, n)| me.hand.get(*rk) < *n)?;
        let need_n = need_total - me.hand.get(*need_kind);
        for have_kind in ResourceKind::ALL {
            if have_kind == *need_kind {
                continue;
            }
            let ratio = me.trade_ratio(have_kind);
            let reserved = cost_of(cost, have_kind);
            let spare = me.hand.get(have_kind).saturating_sub(reserved);
            if spare >= ratio * need_n {
                let mut give = ResourceSet::default();
                give.add(have_kind, ratio * need_n);
                let mut get = ResourceSet::default();
                get.add(*need_kind, need_n);
                return Some((give, get));
            }
        }
        None
    }
}

fn possible_to_piece(kind: PossibleKind) -> Option<(Location, PieceKind)> {
    match kind {
        PossibleKind::Road(e) => Some((Location::Edge(e), PieceKind::Road)),
        PossibleKind::Ship(e) => Some((Location::Edge(e), PieceKind::Ship)),
        PossibleKind::Settlement(n) => Some((Location::Node(n), PieceKind::Settlement)),
        PossibleKind::City(n) => Some((Location::Node(n), PieceKind::City)),
        PossibleKind::BuyDevCard | PossibleKind::PickSpecialItem => None,
    }
}

fn cost_of(cost: &[(ResourceKind, u16)], kind: ResourceKind) -> u16 {
    cost.iter().find(|(k, _)| *k == kind).map(|(_, n)| *n).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;
    use crate::model::{DevCardKind, PieceKind};

    fn brain_with_seat(seat: SeatId) -> Brain {
        let mut brain = Brain::new(
            Board::standard(2),
            ScenarioOptions::default(),
            BrainConfig::default(),
            Box::new(NullSink),
        );
        brain.game.sit_down(seat, "us");
        brain.game.sit_down((seat + 1) % 2, "them");
        brain.game.my_seat = Some(seat);
        brain
    }

    #[test]
    fn initial_placement_happy_path() {
        let mut brain = brain_with_seat(0);

        brain.on_message(Inbound::GameState(Phase::InitSettle1a));
        let out = brain.on_message(Inbound::Turn(0));
        let Outbound::PutPiece { location: Location::Node(node), kind: PieceKind::Settlement } = out[0]
        else {
            panic!("expected a settlement PutPiece, got {out:?}");
        };

        brain.on_message(Inbound::GameState(Phase::InitRoad1b));
        let out = brain.on_message(Inbound::PutPiece {
            seat: 0,
            location: Location::Node(node),
            kind: PieceKind::Settlement,
        });
        assert!(matches!(
            out[0],
            Outbound::PutPiece { location: Location::Edge(_), kind: PieceKind::Road }
        ));
        assert_eq!(brain.game.settlement_or_city_at(node).map(|p| p.owner), Some(0));
    }

    #[test]
    fn seven_rolled_discards_then_moves_robber() {
        let mut brain = brain_with_seat(0);
        brain.on_message(Inbound::GameState(Phase::Play));
        brain.on_message(Inbound::SetTurn(1));
        for kind in ResourceKind::ALL {
            brain.game.seat_mut(0).unwrap().hand.gain(kind, 2); // 10 cards total
        }

        let out = brain.on_message(Inbound::GameState(Phase::WaitingForDiscards));
        let Outbound::Discard(set) = &out[0] else { panic!("expected a discard, got {out:?}") };
        assert_eq!(set.iter().map(|(_, n)| n).sum::<u16>(), 5);

        brain.on_message(Inbound::SetTurn(1));
        brain.on_message(Inbound::GameState(Phase::WaitingForRobberOrPirate));
        assert_eq!(brain.state.robber_origin, RobberOrigin::RolledSeven);

        let out = brain.on_message(Inbound::GameState(Phase::PlacingRobber));
        assert!(matches!(out[0], Outbound::MoveRobber(_)));
    }

    #[test]
    fn road_building_card_is_played_when_two_roads_are_planned() {
        let mut brain = brain_with_seat(0);
        brain.on_message(Inbound::GameState(Phase::Play));
        brain.on_message(Inbound::SetTurn(0));
        brain.game.seat_mut(0).unwrap().devcards.set_old(DevCardKind::RoadBuilding, 1);
        brain.plan.push(PossibleKind::Road((0, 1)));
        brain.plan.push(PossibleKind::Road((2, 3)));

        let out = brain.on_message(Inbound::GameState(Phase::Play));
        assert!(matches!(out[0], Outbound::PlayDevCard(DevCardKind::RoadBuilding)));
        assert!(brain.state.waiting_for_devcard);
    }

    #[test]
    fn illegal_build_ends_the_turn_during_ordinary_play() {
        let mut brain = brain_with_seat(0);
        brain.on_message(Inbound::GameState(Phase::Play));
        brain.on_message(Inbound::SetTurn(0));
        brain.plan.push(PossibleKind::Settlement(3));

        let out = brain.on_message(Inbound::CancelBuildRequest(PieceKind::Settlement));
        assert!(matches!(out[0], Outbound::CancelBuildRequest(PieceKind::Settlement)));
        assert!(matches!(out[1], Outbound::EndTurn));
        assert!(brain.plan.is_empty());
    }

    #[test]
    fn illegal_build_retries_during_initial_placement() {
        let mut brain = brain_with_seat(0);
        brain.on_message(Inbound::GameState(Phase::InitSettle1a));
        brain.on_message(Inbound::Turn(0));

        let out = brain.on_message(Inbound::CancelBuildRequest(PieceKind::Settlement));
        assert!(matches!(out[0], Outbound::PutPiece { kind: PieceKind::Settlement, .. }));
        assert!(!brain.state.left_game);
    }

    #[test]
    fn too_many_denied_initial_builds_leaves_the_game() {
        let mut brain = brain_with_seat(0);
        brain.config.max_denied_per_turn = 1;
        brain.on_message(Inbound::GameState(Phase::InitSettle1a));
        brain.on_message(Inbound::Turn(0));

        brain.on_message(Inbound::CancelBuildRequest(PieceKind::Settlement));
        brain.on_message(Inbound::CancelBuildRequest(PieceKind::Settlement));
        let out = brain.on_message(Inbound::CancelBuildRequest(PieceKind::Settlement));

        assert!(matches!(out[0], Outbound::LeaveGame(_)));
        assert!(brain.state.left_game);
    }

    #[test]
    fn trade_response_timeout_clears_offer_and_marks_not_selling() {
        let mut brain = brain_with_seat(0);
        let offer = Offer {
            from: 0,
            give: ResourceSet::of(ResourceKind::Wood, 1),
            get: ResourceSet::of(ResourceKind::Ore, 1),
            to_mask: 1 << 1,
        };
        brain.game.seat_mut(0).unwrap().open_offer = Some(offer);
        brain.state.waiting_for_trade_response = true;

        let mut saw_clear = false;
        for _ in 0..101 {
            let out = brain.on_message(Inbound::TimingPing);
            if out.iter().any(|o| matches!(o, Outbound::ClearOffer)) {
                saw_clear = true;
            }
        }

        assert!(saw_clear);
        assert!(!brain.state.waiting_for_trade_response);
        assert!(!brain.negotiator.is_selling(1, ResourceKind::Ore));
        assert!(brain.game.seat(0).unwrap().open_offer.is_none());
    }

    #[test]
    fn preroll_knight_played_when_robber_blocks_our_production() {
        let mut brain = brain_with_seat(0);
        let node = brain.game.board.nodes_of_hex(brain.game.board.hexes().next().unwrap())[0];
        brain.game.apply_put_piece(0, Location::Node(node), PieceKind::Settlement);
        let hex = brain.game.board.hexes_of_node(node)[0];
        brain.game.apply_robber_hex(hex);
        brain.game.seat_mut(0).unwrap().devcards.set_old(DevCardKind::Knight, 1);
        brain.on_message(Inbound::SetTurn(0));

        let out = brain.on_message(Inbound::GameState(Phase::Roll));
        assert!(matches!(out[0], Outbound::PlayDevCard(DevCardKind::Knight)));
        assert!(brain.state.waiting_for_devcard);
        assert_eq!(brain.state.robber_origin, RobberOrigin::PreRollKnight);
    }

    #[test]
    fn in_play_knight_unblocks_production_mid_turn() {
        let mut brain = brain_with_seat(0);
        let node = brain.game.board.nodes_of_hex(brain.game.board.hexes().next().unwrap())[0];
        brain.game.apply_put_piece(0, Location::Node(node), PieceKind::Settlement);
        let hex = brain.game.board.hexes_of_node(node)[0];
        brain.game.apply_robber_hex(hex);
        brain.game.seat_mut(0).unwrap().devcards.set_old(DevCardKind::Knight, 1);
        brain.on_message(Inbound::SetTurn(0));

        let out = brain.on_message(Inbound::GameState(Phase::Play));
        assert!(matches!(out[0], Outbound::PlayDevCard(DevCardKind::Knight)));
        assert!(brain.state.waiting_for_devcard);
    }

    #[test]
    fn incoming_offer_addressed_to_us_is_accepted_when_favorable() {
        let mut brain = brain_with_seat(0);
        brain.game.seat_mut(0).unwrap().hand.gain(ResourceKind::Ore, 1);
        let offer = Offer {
            from: 1,
            give: ResourceSet::of(ResourceKind::Wheat, 1),
            get: ResourceSet::of(ResourceKind::Ore, 1),
            to_mask: 1 << 0,
        };
        let out = brain.on_message(Inbound::MakeOffer(offer));
        assert!(matches!(out[0], Outbound::AcceptOffer(1)));
        assert!(brain.game.seat(1).unwrap().open_offer.is_some());
    }

    #[test]
    fn incoming_offer_rejected_when_we_cannot_pay() {
        let mut brain = brain_with_seat(0);
        let offer = Offer {
            from: 1,
            give: ResourceSet::of(ResourceKind::Wheat, 1),
            get: ResourceSet::of(ResourceKind::Ore, 1),
            to_mask: 1 << 0,
        };
        let out = brain.on_message(Inbound::MakeOffer(offer));
        assert!(matches!(out[0], Outbound::RejectOffer));
    }

    #[test]
    fn pick_resources_request_picks_exactly_the_requested_count() {
        let mut brain = brain_with_seat(0);
        brain.plan.push(PossibleKind::Settlement(0));

        let out = brain.on_message(Inbound::PickResourcesRequest(2));
        let Outbound::PickFreeResources(set) = &out[0] else {
            panic!("expected a free-resource pick, got {out:?}")
        };
        assert_eq!(set.iter().map(|(_, n)| n).sum::<u16>(), 2);
    }

    #[test]
    fn deadlock_exit_leaves_the_game_and_then_goes_silent() {
        let mut brain = brain_with_seat(2);
        brain.on_message(Inbound::Turn(2));

        let mut saw_leave = false;
        for _ in 0..15_001 {
            let out = brain.on_message(Inbound::TimingPing);
            if out.iter().any(|o| matches!(o, Outbound::LeaveGame(_))) {
                saw_leave = true;
            }
        }
        assert!(saw_leave);
        assert!(brain.state.left_game);

        let out = brain.on_message(Inbound::DiceResult(3, 4));
        assert!(out.is_empty());
    }
}
