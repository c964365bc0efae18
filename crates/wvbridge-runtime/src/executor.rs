//! Runs deferred script evaluations for asynchronous transports

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use wvbridge_transport::{DeferredResult, TransportError};

/// State shared by every clone of one executor
struct ExecutorState {
    closed: watch::Sender<bool>,
    in_flight: watch::Sender<usize>,
}

/// Spawns evaluations on a Tokio runtime and hands back [`DeferredResult`]s
///
/// Every execution races the executor's close; once [`close`](Self::close)
/// is called, executions still running resolve to
/// [`TransportError::Shutdown`] and new ones fail immediately. Clones share
/// the same close state and in-flight count.
#[derive(Clone)]
pub struct DeferredExecutor {
    handle: Handle,
    state: Arc<ExecutorState>,
}

impl DeferredExecutor {
    /// Create an executor on an existing runtime handle
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            state: Arc::new(ExecutorState {
                closed: watch::Sender::new(false),
                in_flight: watch::Sender::new(0),
            }),
        }
    }

    /// Number of executions and follow-up tasks that have not finished yet
    pub fn in_flight(&self) -> usize {
        *self.state.in_flight.borrow()
    }

    /// Stop accepting work and interrupt everything in flight
    ///
    /// Returns `true` for the call that actually closed the executor.
    pub fn close(&self) -> bool {
        self.state.closed.send_if_modified(|closed| !std::mem::replace(closed, true))
    }

    pub fn is_closed(&self) -> bool {
        *self.state.closed.borrow()
    }

    /// Run an evaluation and return its deferred result
    pub fn run<F>(&self, evaluation: F) -> DeferredResult
    where
        F: Future<Output = Result<String, TransportError>> + Send + 'static,
    {
        let (sender, result) = DeferredResult::channel();
        if self.is_closed() {
            sender.complete(Err(TransportError::Shutdown));
            return result;
        }

        let state = self.begin();
        self.handle.spawn(async move {
            let mut closed = state.closed.subscribe();
            let outcome = tokio::select! {
                outcome = evaluation => outcome,
                _ = closed.wait_for(|closed| *closed) => Err(TransportError::Shutdown),
            };
            state.in_flight.send_modify(|n| *n -= 1);
            sender.complete(outcome);
        });

        result
    }

    /// Spawn a follow-up task that is abandoned on close
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_closed() {
            tracing::debug!("Executor closed, dropping task");
            return;
        }

        let state = self.begin();
        self.handle.spawn(async move {
            let mut closed = state.closed.subscribe();
            tokio::select! {
                _ = task => {}
                _ = closed.wait_for(|closed| *closed) => {}
            }
            state.in_flight.send_modify(|n| *n -= 1);
        });
    }

    /// Wait until nothing is in flight or `timeout` passes
    ///
    /// Returns `true` when drained.
    pub async fn drain(&self, timeout: Duration) -> bool {
        let mut in_flight = self.state.in_flight.subscribe();
        let drained = matches!(
            tokio::time::timeout(timeout, in_flight.wait_for(|n| *n == 0)).await,
            Ok(Ok(_))
        );
        if !drained {
            tracing::warn!(in_flight = self.in_flight(), "Deferred executions did not drain");
        }
        drained
    }

    fn begin(&self) -> Arc<ExecutorState> {
        self.state.in_flight.send_modify(|n| *n += 1);
        self.state.clone()
    }
}
