use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::steps::StepId;
use crate::event::{Event, EventSender};
use crate::store::{BasicsData, HealthData};

/// Data a step hands to the commit operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitPayload {
    Basics(BasicsData),
    Health(HealthData),
    Confirmation,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitError {
    #[error("commit rejected: {0}")]
    Rejected(String),
}

/// The remote call a step performs before its data is stored.
pub trait Committer: Send + Sync {
    fn commit(
        &self,
        payload: CommitPayload,
    ) -> BoxFuture<'static, Result<CommitPayload, CommitError>>;
}

/// Stand-in for a network call: resolves with its input after a fixed delay.
pub struct SimulatedCommitter {
    delay: Duration,
}

impl SimulatedCommitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Committer for SimulatedCommitter {
    fn commit(
        &self,
        payload: CommitPayload,
    ) -> BoxFuture<'static, Result<CommitPayload, CommitError>> {
        let delay = self.delay;
        async move {
            tokio::time::sleep(delay).await;
            Ok(payload)
        }
        .boxed()
    }
}

/// Result of a commit, delivered back to the step that started it.
#[derive(Debug)]
pub struct CommitOutcome {
    pub step: StepId,
    pub ticket: u64,
    pub result: Result<CommitPayload, CommitError>,
}

/// Per-step loading state: at most one commit in flight.
#[derive(Debug, Default)]
pub struct CommitState {
    in_flight: Option<(u64, CancellationToken)>,
    next_ticket: u64,
}

impl CommitState {
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Accept an outcome if it belongs to the commit in flight. Clears loading.
    pub fn finish(&mut self, ticket: u64) -> bool {
        match &self.in_flight {
            Some((current, _)) if *current == ticket => {
                self.in_flight = None;
                true
            }
            _ => false,
        }
    }

    /// Cancel the commit in flight, if any. Its outcome will never be applied.
    pub fn cancel(&mut self) {
        if let Some((ticket, token)) = self.in_flight.take() {
            debug!("Cancelling commit #{ticket}");
            token.cancel();
        }
    }

    fn begin(&mut self, token: CancellationToken) -> u64 {
        self.cancel();
        self.next_ticket += 1;
        self.in_flight = Some((self.next_ticket, token));
        self.next_ticket
    }
}

/// Spawns commit operations and routes their outcomes into the event loop.
pub struct CommitRunner {
    committer: Arc<dyn Committer>,
    events: EventSender,
    root: CancellationToken,
}

impl CommitRunner {
    pub fn new(committer: Arc<dyn Committer>, events: EventSender) -> Self {
        Self {
            committer,
            events,
            root: CancellationToken::new(),
        }
    }

    /// Start a commit for `step`. Any earlier commit tracked by `state` is cancelled.
    pub fn start(&self, step: StepId, payload: CommitPayload, state: &mut CommitState) -> u64 {
        let token = self.root.child_token();
        let ticket = state.begin(token.clone());
        let future = self.committer.commit(payload);
        let events = self.events.clone();

        info!("Committing {} (#{ticket})", step.label());
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("Commit #{ticket} for {} dropped", step.label());
                }
                result = future => {
                    if token.is_cancelled() {
                        return;
                    }
                    if let Err(ref e) = result {
                        warn!("Commit #{ticket} for {} failed: {e}", step.label());
                    }
                    let _ = events.send(Event::Commit(CommitOutcome { step, ticket, result }));
                }
            }
        });
        ticket
    }

    /// Cancel every commit started by this runner.
    pub fn shutdown(&self) {
        self.root.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }
}
