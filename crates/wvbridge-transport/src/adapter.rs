//! Transport contract between the bridge and a platform web view

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use wvbridge_core::BridgeError;

/// Errors raised while executing an instruction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The web view reported an error while running the script
    #[error("script execution failed: {0}")]
    Execution(String),

    /// The transport is not attached to a web view
    #[error("transport is detached")]
    Detached,

    /// The runtime shut down before the execution finished
    #[error("transport shut down")]
    Shutdown,

    /// The execution was abandoned without a result
    #[error("execution dropped without a result")]
    Dropped,
}

impl From<TransportError> for BridgeError {
    fn from(err: TransportError) -> Self {
        BridgeError::TransportError(err.to_string())
    }
}

/// Receives peer-originated messages from a transport
///
/// The transport extracts `(event_name, raw_payload)` from its own encoding
/// before calling this.
pub trait InboundHandler: Send + Sync {
    fn on_message(&self, event_name: &str, raw_payload: &str);
}

/// Platform mechanism that moves instructions to the web view
pub trait TransportAdapter: Send + Sync {
    /// Run a script instruction against the peer
    fn execute(&self, instruction: &str) -> Execution;

    /// Start delivering peer messages to `inbound`
    fn attach(&self, inbound: Arc<dyn InboundHandler>) -> Result<(), TransportError> {
        let _ = inbound;
        Ok(())
    }

    /// Stop delivering peer messages
    fn detach(&self) {}
}

/// What became of an instruction handed to a transport
#[derive(Debug)]
pub enum Execution {
    /// Handed off; the transport yields no result
    Sent,
    /// Running; the result string arrives later
    Deferred(DeferredResult),
    /// The transport rejected the instruction synchronously
    Failed(TransportError),
    /// Nothing was sent because the bridge is destroyed
    Skipped,
}

impl Execution {
    /// Check if the instruction reached the transport
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Execution::Sent | Execution::Deferred(_))
    }

    /// Check if nothing was sent
    pub fn is_skipped(&self) -> bool {
        matches!(self, Execution::Skipped)
    }

    /// Wait for the transport's verdict
    ///
    /// `Sent` and `Skipped` resolve immediately to `Ok(None)`.
    pub async fn outcome(self) -> Result<Option<String>, TransportError> {
        match self {
            Execution::Sent | Execution::Skipped => Ok(None),
            Execution::Deferred(deferred) => deferred.wait().await.map(Some),
            Execution::Failed(err) => Err(err),
        }
    }
}

/// Completion side of a deferred execution
#[derive(Debug)]
pub struct DeferredSender {
    sender: oneshot::Sender<Result<String, TransportError>>,
}

impl DeferredSender {
    /// Deliver the execution result
    ///
    /// A dropped receiver is fine: the caller chose fire-and-forget.
    pub fn complete(self, result: Result<String, TransportError>) {
        let _ = self.sender.send(result);
    }

    /// Check if the receiving side is gone
    pub fn is_abandoned(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Result of an execution that finishes later
///
/// Dropping it does not cancel the execution.
#[derive(Debug)]
pub struct DeferredResult {
    receiver: oneshot::Receiver<Result<String, TransportError>>,
}

impl DeferredResult {
    /// Create a connected sender/result pair
    pub fn channel() -> (DeferredSender, DeferredResult) {
        let (sender, receiver) = oneshot::channel();
        (DeferredSender { sender }, DeferredResult { receiver })
    }

    /// Wait for the result
    pub async fn wait(self) -> Result<String, TransportError> {
        self.receiver.await.unwrap_or(Err(TransportError::Dropped))
    }

    /// Take the result if it has already arrived
    pub fn try_take(&mut self) -> Option<Result<String, TransportError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(TransportError::Dropped)),
        }
    }
}
