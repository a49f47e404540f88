//! The async shell around [`Brain`].
//!
//! One [`Actor`] per game per bot, each a dedicated cooperative task that
//! consumes a bounded event queue and emits actions; a second task (the
//! pinger) enqueues `TimingPing` once a second into that same queue. The
//! queue is the only ordering source of truth — the brain never reads
//! wall-clock time to decide what happened when.

use crate::brain::Brain;
use crate::wire::{Inbound, Outbound};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

/// the event queue has finite capacity; on overflow the producer (the
/// server socket reader, out of scope here) drops or blocks per its own
/// policy. This is just the capacity the channel is built with.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

const BASE_PAUSE: Duration = Duration::from_millis(1000);

/// wraps an [`Inbound`] with the one signal that isn't a server message: the
/// `kill()` sentinel.
#[derive(Debug, Clone)]
enum QueueMessage {
    Game(Inbound),
    Kill,
}

/// handed to whatever feeds this brain's queue (a server socket reader, a
/// companion pinger task, or — in the `demo` binary — a fake in-process
/// table). Cloning and sharing this handle across tasks is how multiple
/// producers push into the one queue.
#[derive(Clone)]
pub struct ActorHandle {
    queue: mpsc::Sender<QueueMessage>,
}

impl ActorHandle {
    /// enqueues an inbound message. overflow/backpressure policy belongs to
    /// the caller: `send` awaits a free slot, `try_send` never
    /// blocks. A closed queue (the actor already exited) is swallowed —
    /// the actor is gone, there's nothing left to deliver to.
    pub async fn send(&self, msg: Inbound) {
        let _ = self.queue.send(QueueMessage::Game(msg)).await;
    }

    /// non-blocking variant of [`Self::send`]; `Err` means the queue is
    /// full or the actor has already exited.
    pub fn try_send(&self, msg: Inbound) -> Result<(), ()> {
        self.queue.try_send(QueueMessage::Game(msg)).map_err(|_| ())
    }

    /// sets `alive = false` and enqueues a sentinel; the loop observes it
    /// at its next dequeue and tears down. Never blocks —
    /// if the queue is full or already closed, the actor is either about to
    /// see this or already gone.
    pub fn kill(&self) {
        let _ = self.queue.try_send(QueueMessage::Kill);
    }
}

/// pacing inputs that aren't part of [`crate::wire::BrainConfig`] because
/// they describe the table, not the brain.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableContext {
    /// every seat at this table is a bot; human-observability pacing can be
    /// divided down since nobody is watching in real time
    pub bot_only: bool,
    pub six_player: bool,
}

/// the running actor: one per game per bot, single-task owner of its
/// [`Brain`], its pure mirror/trackers/planner, and its half of the queue.
/// By construction there is no shared mutable state between actors and no
/// lock contention within one.
pub struct Actor {
    brain: Brain,
    inbox: mpsc::Receiver<QueueMessage>,
    outbox: mpsc::UnboundedSender<Outbound>,
    table: TableContext,
}

impl Actor {
    /// spawns the actor task and its companion pinger task. Returns a
    /// handle producers can enqueue onto, and the unbounded receiver end of
    /// the outbound action stream (unbounded because the brain, not the
    /// channel, is the rate limiter here — it only ever emits in response
    /// to a dequeued message).
    pub fn spawn(
        brain: Brain,
        table: TableContext,
    ) -> (ActorHandle, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::channel(DEFAULT_QUEUE_CAPACITY);
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        // the pinger holds only a *weak* sender: it must never be the thing
        // keeping the queue open. Once the real producer's handle is
        // dropped, the queue should close even if the pinger hasn't ticked
        // yet, so the actor can treat a closed queue as "reset elsewhere"
        // and exit cleanly.
        let pinger_queue = tx.downgrade();
        let handle = ActorHandle { queue: tx };

        let actor = Actor { brain, inbox: rx, outbox: out_tx, table };
        tokio::spawn(actor.run());
        tokio::spawn(Self::pinger(pinger_queue));

        (handle, out_rx)
    }

    /// a second task that periodically enqueues tick messages into the same
    /// queue. Ticks at 1 Hz; exits the moment the queue is closed (the actor
    /// exited or the producer handle was dropped) rather than spinning
    /// forever against a dead receiver.
    async fn pinger(queue: mpsc::WeakSender<QueueMessage>) {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let Some(sender) = queue.upgrade() else { break };
            if sender.send(QueueMessage::Game(Inbound::TimingPing)).await.is_err() {
                break;
            }
        }
    }

    /// the only loop: dequeue, apply, emit, pause, repeat. This is the
    /// entire set of `.await` points in the actor; no other code path
    /// yields.
    async fn run(mut self) {
        loop {
            match self.inbox.recv().await {
                None => break, // a closed queue means "reset elsewhere", exit clean
                Some(QueueMessage::Kill) => break,
                Some(QueueMessage::Game(msg)) => {
                    let waiting_for_trade_response = self.brain.state.waiting_for_trade_response;
                    let actions = self.brain.on_message(msg);
                    let left_game = self.brain.state.left_game;

                    for action in &actions {
                        if self.outbox.send(action.clone()).is_err() {
                            return; // nobody listening for our actions anymore
                        }
                    }
                    if !actions.is_empty() {
                        tokio::time::sleep(self.pause_duration(waiting_for_trade_response)).await;
                    }
                    if left_game {
                        break;
                    }
                }
            }
        }
    }

    /// pause is semantic sleep; it does not change correctness, only
    /// pacing — scaled by six-player/bot-only table context.
    fn pause_duration(&self, was_awaiting_trade_response: bool) -> Duration {
        let mut ms = BASE_PAUSE.as_millis() as f64;
        if self.table.six_player && !was_awaiting_trade_response {
            ms *= 0.75;
        }
        if self.table.bot_only {
            ms /= 4.0;
        }
        Duration::from_millis(ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::diagnostics::NullSink;
    use crate::model::{Phase, ScenarioOptions};
    use crate::wire::BrainConfig;

    fn fresh_brain() -> Brain {
        let mut brain =
            Brain::new(Board::standard(2), ScenarioOptions::default(), BrainConfig::default(), Box::new(NullSink));
        brain.game.sit_down(0, "us");
        brain.game.sit_down(1, "them");
        brain.game.my_seat = Some(0);
        brain
    }

    #[tokio::test]
    async fn actor_emits_an_action_and_can_be_killed() {
        let (handle, mut outbox) = Actor::spawn(fresh_brain(), TableContext::default());

        handle.send(Inbound::GameState(Phase::InitSettle1a)).await;
        handle.send(Inbound::Turn(0)).await;

        let out = outbox.recv().await.expect("brain should have emitted an action");
        assert!(matches!(out, Outbound::PutPiece { .. }));

        handle.kill();
        // the channel closes once the actor task observes the kill and drops its sender
        assert!(outbox.recv().await.is_none());
    }

    #[tokio::test]
    async fn closed_inbox_exits_the_actor_cleanly() {
        let (handle, mut outbox) = Actor::spawn(fresh_brain(), TableContext::default());
        drop(handle);
        assert!(outbox.recv().await.is_none());
    }

    #[test]
    fn six_player_pause_is_shortened_unless_awaiting_trade_response() {
        let actor = Actor {
            brain: fresh_brain(),
            inbox: mpsc::channel(1).1,
            outbox: mpsc::unbounded_channel().0,
            table: TableContext { bot_only: false, six_player: true },
        };
        assert!(actor.pause_duration(false) < BASE_PAUSE);
        assert_eq!(actor.pause_duration(true), BASE_PAUSE);
    }

    #[test]
    fn bot_only_quarters_the_pause() {
        let actor = Actor {
            brain: fresh_brain(),
            inbox: mpsc::channel(1).1,
            outbox: mpsc::unbounded_channel().0,
            table: TableContext { bot_only: true, six_player: false },
        };
        assert_eq!(actor.pause_duration(false), BASE_PAUSE / 4);
    }
}
