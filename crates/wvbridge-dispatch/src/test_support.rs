//! In-memory transport for unit tests

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wvbridge_core::BridgeConfig;
use wvbridge_transport::{
    DeferredResult, DeferredSender, Execution, InboundHandler, TransportAdapter, TransportError,
};

use crate::{Bridge, ProcessState};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Sent,
    Fail,
    Deferred,
}

/// Records every instruction and keeps the inbound sink it was attached with
pub struct RecordingTransport {
    mode: Mutex<Mode>,
    pub scripts: Mutex<Vec<String>>,
    pub deferred: Mutex<Vec<DeferredSender>>,
    inbound: Mutex<Option<Arc<dyn InboundHandler>>>,
    pub detach_count: AtomicUsize,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Self::with_mode(Mode::Sent)
    }

    pub fn with_mode(mode: Mode) -> Arc<Self> {
        Arc::new(Self {
            mode: Mutex::new(mode),
            scripts: Mutex::new(Vec::new()),
            deferred: Mutex::new(Vec::new()),
            inbound: Mutex::new(None),
            detach_count: AtomicUsize::new(0),
        })
    }

    pub fn set_mode(&self, mode: Mode) {
        *self.mode.lock() = mode;
    }

    pub fn last_script(&self) -> Option<String> {
        self.scripts.lock().last().cloned()
    }

    pub fn script_count(&self) -> usize {
        self.scripts.lock().len()
    }

    pub fn is_attached(&self) -> bool {
        self.inbound.lock().is_some()
    }

    /// Play the peer: deliver a message through the attached sink
    pub fn deliver(&self, event_name: &str, raw_payload: &str) -> bool {
        let inbound = self.inbound.lock().clone();
        match inbound {
            Some(inbound) => {
                inbound.on_message(event_name, raw_payload);
                true
            }
            None => false,
        }
    }

    pub fn detaches(&self) -> usize {
        self.detach_count.load(Ordering::SeqCst)
    }
}

impl TransportAdapter for RecordingTransport {
    fn execute(&self, instruction: &str) -> Execution {
        self.scripts.lock().push(instruction.to_string());
        match *self.mode.lock() {
            Mode::Sent => Execution::Sent,
            Mode::Fail => Execution::Failed(TransportError::Execution("boom".to_string())),
            Mode::Deferred => {
                let (sender, result): (DeferredSender, DeferredResult) = DeferredResult::channel();
                self.deferred.lock().push(sender);
                Execution::Deferred(result)
            }
        }
    }

    fn attach(&self, inbound: Arc<dyn InboundHandler>) -> Result<(), TransportError> {
        *self.inbound.lock() = Some(inbound);
        Ok(())
    }

    fn detach(&self) {
        self.detach_count.fetch_add(1, Ordering::SeqCst);
        *self.inbound.lock() = None;
    }
}

/// An attached bridge over a fresh transport and isolated process state
pub fn connected_bridge() -> (Bridge, Arc<RecordingTransport>, Arc<ProcessState>) {
    let transport = RecordingTransport::new();
    let process = Arc::new(ProcessState::new());
    let bridge = Bridge::connect(transport.clone(), process.clone(), BridgeConfig::default())
        .expect("bridge should connect");
    (bridge, transport, process)
}

/// Extract the request id from a rendered `_callJSFunction` instruction
pub fn request_id_of(script: &str) -> String {
    let start = script.find("(\"").expect("call instruction") + 2;
    let end = script[start..].find('"').expect("closing quote") + start;
    script[start..end].to_string()
}
