//! Concurrent dispatch loop
//!
//! One task per inbound message. Shutdown stops intake; tasks already
//! running finish their pipeline before `run` returns.

use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::{ModerationCoordinator, ModerationOutcome};
use crate::types::InboundMessage;

/// Totals for one `run` invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub received: u64,
    pub completed: u64,
    pub aborted: u64,
    pub ignored: u64,
    /// Tasks that panicked; the loop keeps going.
    pub crashed: u64,
}

impl DispatchStats {
    fn tally(&mut self, outcome: &ModerationOutcome) {
        match outcome {
            ModerationOutcome::Ignored(_) => self.ignored += 1,
            ModerationOutcome::Aborted { .. } => self.aborted += 1,
            ModerationOutcome::Completed(_) => self.completed += 1,
        }
    }
}

impl ModerationCoordinator {
    /// Process `message` on its own task.
    pub fn dispatch(self: &Arc<Self>, message: InboundMessage) -> JoinHandle<ModerationOutcome> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.process(&message).await })
    }

    /// Consume `messages` until the stream ends or `shutdown` fires.
    pub async fn run<S>(self: Arc<Self>, messages: S, shutdown: CancellationToken) -> DispatchStats
    where
        S: Stream<Item = InboundMessage> + Send,
    {
        let mut messages = std::pin::pin!(messages);
        let mut tasks = JoinSet::new();
        let mut stats = DispatchStats::default();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(in_flight = tasks.len(), "shutdown requested, draining");
                    break;
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    settle(&mut stats, joined);
                }
                next = messages.next() => match next {
                    Some(message) => {
                        stats.received += 1;
                        let this = Arc::clone(&self);
                        tasks.spawn(async move { this.process(&message).await });
                    }
                    None => break,
                },
            }
        }

        while let Some(joined) = tasks.join_next().await {
            settle(&mut stats, joined);
        }
        info!(?stats, "dispatch loop stopped");
        stats
    }
}

fn settle(stats: &mut DispatchStats, joined: Result<ModerationOutcome, tokio::task::JoinError>) {
    match joined {
        Ok(outcome) => stats.tally(&outcome),
        Err(e) => {
            stats.crashed += 1;
            error!(error = %e, "moderation task crashed");
        }
    }
}
