//! Fixed-delay scheduling of simulated replies
//!
//! Each pending reply is a sleeping tokio task keyed by the user turn that
//! triggered it. When the delay elapses the request is sent back over a
//! channel; the owner of the `Session` delivers it.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::session::{ReplyPolicy, ReplyRequest, TurnId};

pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(600);

pub struct ReplyScheduler {
    delay: Duration,
    policy: ReplyPolicy,
    tx: mpsc::UnboundedSender<ReplyRequest>,
    pending: HashMap<TurnId, JoinHandle<()>>,
}

impl ReplyScheduler {
    /// Create a scheduler and the receiver its replies arrive on
    pub fn new(
        delay: Duration,
        policy: ReplyPolicy,
    ) -> (Self, mpsc::UnboundedReceiver<ReplyRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            delay,
            policy,
            tx,
            pending: HashMap::new(),
        };
        (scheduler, rx)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn policy(&self) -> ReplyPolicy {
        self.policy
    }

    /// Number of replies still waiting on their delay
    pub fn pending(&self) -> usize {
        self.pending.values().filter(|h| !h.is_finished()).count()
    }

    pub fn schedule(&mut self, request: ReplyRequest) {
        self.pending.retain(|_, handle| !handle.is_finished());

        let turn = request.turn;
        let delay = self.delay;
        let tx = self.tx.clone();
        debug!(turn = turn.0, delay_ms = delay.as_millis() as u64, "Scheduling reply");

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(request).is_err() {
                warn!(turn = turn.0, "Reply receiver dropped");
            }
        });
        self.pending.insert(turn, handle);
    }

    /// Mark a reply as delivered
    pub fn complete(&mut self, turn: TurnId) {
        self.pending.remove(&turn);
    }

    /// Abort one pending reply. Returns whether it was still waiting.
    pub fn cancel(&mut self, turn: TurnId) -> bool {
        match self.pending.remove(&turn) {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    /// Apply the reset policy after the transcript was cleared. Returns how
    /// many replies were cancelled.
    pub fn on_reset(&mut self) -> usize {
        if self.policy == ReplyPolicy::Keep {
            return 0;
        }

        let mut cancelled = 0;
        for (_, handle) in self.pending.drain() {
            if !handle.is_finished() {
                cancelled += 1;
            }
            handle.abort();
        }
        if cancelled > 0 {
            debug!(cancelled, "Cancelled pending replies on reset");
        }
        cancelled
    }
}

impl Drop for ReplyScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }
}
