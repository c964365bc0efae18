//! Shared test transport for integration tests

#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::Arc;
use wvbridge_core::BridgeConfig;
use wvbridge_dispatch::{Bridge, ProcessState};
use wvbridge_transport::{Execution, InboundHandler, TransportAdapter, TransportError};

/// Records instructions and plays the peer through the attached sink
#[derive(Default)]
pub struct LoopbackTransport {
    scripts: Mutex<Vec<String>>,
    inbound: Mutex<Option<Arc<dyn InboundHandler>>>,
}

impl LoopbackTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().clone()
    }

    pub fn last_script(&self) -> String {
        self.scripts.lock().last().cloned().unwrap_or_default()
    }

    pub fn deliver(&self, event_name: &str, raw_payload: &str) {
        let inbound = self.inbound.lock().clone();
        if let Some(inbound) = inbound {
            inbound.on_message(event_name, raw_payload);
        }
    }

    /// Answer the most recent `_callJSFunction` instruction
    pub fn respond(&self, is_error: bool, response: serde_json::Value) {
        let req_id = request_id_of(&self.last_script());
        let payload = serde_json::json!({"reqId": req_id, "isError": is_error, "response": response});
        self.deliver("_jsCallResponse", &payload.to_string());
    }
}

impl TransportAdapter for LoopbackTransport {
    fn execute(&self, instruction: &str) -> Execution {
        self.scripts.lock().push(instruction.to_string());
        Execution::Sent
    }

    fn attach(&self, inbound: Arc<dyn InboundHandler>) -> Result<(), TransportError> {
        *self.inbound.lock() = Some(inbound);
        Ok(())
    }

    fn detach(&self) {
        *self.inbound.lock() = None;
    }
}

/// Pull the quoted request id out of a call instruction
pub fn request_id_of(script: &str) -> String {
    let start = script.find("(\"").map(|i| i + 2).unwrap_or(0);
    let len = script[start..].find('"').unwrap_or(0);
    script[start..start + len].to_string()
}

pub fn connect(process: &Arc<ProcessState>) -> (Bridge, Arc<LoopbackTransport>) {
    let transport = LoopbackTransport::new();
    let bridge = Bridge::connect(transport.clone(), process.clone(), BridgeConfig::default())
        .expect("bridge should connect");
    (bridge, transport)
}
