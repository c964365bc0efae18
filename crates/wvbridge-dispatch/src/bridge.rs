//! One host-to-web-view channel

use crate::correlation::{CallCallbacks, CallId, CorrelationTable, Resolution};
use crate::registry::ProcessState;
use crate::router::{EventRouter, Listener, Propagation, ensure_not_reserved};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use tokio::sync::oneshot;
use wvbridge_core::{
    AtomicBridgeState, BridgeConfig, BridgeError, BridgeResult, BridgeState, CALL_RESPONSE_EVENT,
};
use wvbridge_transport::{
    CallResponse, Execution, InboundHandler, Instruction, JsonCodec, TransportAdapter,
};

/// Future returned by [`Bridge::call_remote_function_async`]
pub type ResponseFuture = Pin<Box<dyn Future<Output = BridgeResult<Value>> + Send + 'static>>;

/// Result of handing a remote call to the transport
#[derive(Debug)]
pub struct OutboundCall {
    /// Id the peer must answer with; `None` if nothing was sent
    pub call_id: Option<CallId>,
    pub execution: Execution,
}

impl OutboundCall {
    fn skipped() -> Self {
        Self {
            call_id: None,
            execution: Execution::Skipped,
        }
    }
}

/// What the bridge did with an inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundOutcome {
    /// A call response, and how it resolved
    Response(Resolution),
    /// An event, and how many listeners ran
    Event(usize),
    /// The bridge is destroyed
    Dropped,
}

pub(crate) struct BridgeShared {
    id: u64,
    state: AtomicBridgeState,
    config: BridgeConfig,
    codec: JsonCodec,
    transport: Arc<dyn TransportAdapter>,
    process: Arc<ProcessState>,
    router: EventRouter,
    calls: CorrelationTable,
}

impl Drop for BridgeShared {
    fn drop(&mut self) {
        if !self.state.get().is_terminal() {
            self.transport.detach();
            self.process.remove(self.id);
        }
    }
}

/// Message bridge between the host and one web view
///
/// `Bridge` is a cheap handle; clones share the same listeners, pending calls
/// and transport. The bridge is torn down by [`Bridge::destroy`] or when the
/// last handle is dropped.
#[derive(Clone)]
pub struct Bridge {
    shared: Arc<BridgeShared>,
}

impl Bridge {
    /// Create a bridge over `transport` and register it in `process`
    ///
    /// The bridge starts in [`BridgeState::Constructed`]; call
    /// [`attach`](Self::attach) to start receiving peer messages.
    pub fn new(
        transport: Arc<dyn TransportAdapter>,
        process: Arc<ProcessState>,
        config: BridgeConfig,
    ) -> BridgeResult<Self> {
        config.validate()?;

        let id = process.next_bridge_id();
        let shared = Arc::new(BridgeShared {
            id,
            state: AtomicBridgeState::new(BridgeState::Constructed),
            config,
            codec: JsonCodec::new(),
            transport,
            process: process.clone(),
            router: EventRouter::new(),
            calls: CorrelationTable::new(),
        });
        process.register(id, Arc::downgrade(&shared));

        tracing::info!(bridge_id = id, "Bridge constructed");
        Ok(Self { shared })
    }

    /// Create a bridge and attach it in one step
    pub fn connect(
        transport: Arc<dyn TransportAdapter>,
        process: Arc<ProcessState>,
        config: BridgeConfig,
    ) -> BridgeResult<Self> {
        let bridge = Self::new(transport, process, config)?;
        bridge.attach()?;
        Ok(bridge)
    }

    pub(crate) fn from_shared(shared: Arc<BridgeShared>) -> Self {
        Self { shared }
    }

    /// Hand the transport an inbound sink and become active
    pub fn attach(&self) -> BridgeResult<()> {
        let current = self.state();
        if current != BridgeState::Constructed {
            return Err(BridgeError::InvalidState {
                expected: BridgeState::Constructed.to_string(),
                actual: current.to_string(),
            });
        }

        let inbound = Arc::new(BridgeInbound {
            shared: Arc::downgrade(&self.shared),
        });
        self.shared.transport.attach(inbound)?;

        if let Err(actual) = self.shared.state.transition_to(BridgeState::Active) {
            // Destroyed or attached concurrently
            self.shared.transport.detach();
            return Err(BridgeError::InvalidState {
                expected: BridgeState::Constructed.to_string(),
                actual: actual.to_string(),
            });
        }

        tracing::info!(bridge_id = self.id(), "Bridge attached");
        Ok(())
    }

    /// Process-unique id of this bridge
    pub fn id(&self) -> u64 {
        self.shared.id
    }

    pub fn state(&self) -> BridgeState {
        self.shared.state.get()
    }

    pub fn is_destroyed(&self) -> bool {
        self.state().is_terminal()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.shared.config
    }

    /// Process state this bridge is registered in
    pub fn process(&self) -> &Arc<ProcessState> {
        &self.shared.process
    }

    /// Register `listener` for `event_name`
    ///
    /// Does nothing once the bridge is destroyed.
    pub fn on(&self, event_name: &str, listener: Listener) -> BridgeResult<()> {
        self.shared.router.register(event_name, listener)
    }

    /// Register a closure and return its [`Listener`] handle for later removal
    pub fn on_fn<F, R>(&self, event_name: &str, f: F) -> BridgeResult<Listener>
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Propagation>,
    {
        let listener = Listener::new(f);
        self.on(event_name, listener.clone())?;
        Ok(listener)
    }

    /// Remove `listener` from `event_name`, or every listener when `None`
    pub fn off(&self, event_name: &str, listener: Option<&Listener>) -> BridgeResult<()> {
        ensure_not_reserved(event_name)?;
        if self.is_destroyed() {
            return Ok(());
        }
        let removed = self.shared.router.deregister(event_name, listener)?;
        tracing::debug!(bridge_id = self.id(), event = event_name, removed, "Listeners removed");
        Ok(())
    }

    /// Number of listeners registered for `event_name`
    pub fn listener_count(&self, event_name: &str) -> usize {
        self.shared.router.listener_count(event_name)
    }

    /// Number of calls still waiting for a response
    pub fn pending_calls(&self) -> usize {
        self.shared.calls.len()
    }

    /// Send an event with `data` to the peer
    pub fn emit<T: Serialize + ?Sized>(&self, event_name: &str, data: &T) -> BridgeResult<Execution> {
        if !self.state().can_send() {
            return Ok(Execution::Skipped);
        }

        let payload = serde_json::to_value(data)?;
        let script = Instruction::emit(event_name, payload).render(&self.shared.config.entrypoint)?;
        // Serializing `data` runs caller code, which may have destroyed the bridge
        if !self.state().can_send() {
            return Ok(Execution::Skipped);
        }
        tracing::debug!(bridge_id = self.id(), event = event_name, "Emitting event");
        Ok(self.execute(&script))
    }

    /// Call `function_name` on the peer
    ///
    /// `args` becomes the argument list: an array is used as is, `null` means
    /// no arguments and any other value is a single argument. The matching
    /// callback runs when the peer answers; an unanswered call stays pending
    /// until the bridge is destroyed.
    ///
    /// A [`Execution::Deferred`] result only reports whether the instruction
    /// ran once it completes. If it completes with an error no response will
    /// come, and the caller should release the call with
    /// [`discard_call`](Self::discard_call).
    pub fn call_remote_function<A: Serialize + ?Sized>(
        &self,
        function_name: &str,
        args: &A,
        callbacks: CallCallbacks,
    ) -> BridgeResult<OutboundCall> {
        if !self.state().can_send() {
            return Ok(OutboundCall::skipped());
        }

        let args = normalize_args(serde_json::to_value(args)?);
        // A destroy that ran while `args` serialized has closed the table
        let Some(call_id) = self
            .shared
            .calls
            .reserve(&self.shared.process, self.id(), callbacks)
        else {
            return Ok(OutboundCall::skipped());
        };

        let script = match Instruction::call(call_id.to_string(), function_name, args)
            .render(&self.shared.config.entrypoint)
        {
            Ok(script) => script,
            Err(e) => {
                self.shared.calls.discard(&call_id);
                return Err(e.into());
            }
        };

        tracing::debug!(
            bridge_id = self.id(),
            call_id = %call_id,
            function = function_name,
            "Calling remote function"
        );

        if !self.state().can_send() {
            self.shared.calls.discard(&call_id);
            return Ok(OutboundCall::skipped());
        }
        let execution = self.execute(&script);
        if matches!(execution, Execution::Failed(_)) {
            // No response can arrive for an instruction that never ran
            self.shared.calls.discard(&call_id);
            return Ok(OutboundCall {
                call_id: None,
                execution,
            });
        }

        Ok(OutboundCall {
            call_id: Some(call_id),
            execution,
        })
    }

    /// Call `function_name` and wait for the peer's answer
    ///
    /// Resolves to the response on success, [`BridgeError::RemoteCall`] with
    /// the peer's error value, [`BridgeError::Destroyed`] if the bridge goes
    /// away first, or the transport error if the instruction could not run.
    pub fn call_remote_function_async<A: Serialize + ?Sized>(
        &self,
        function_name: &str,
        args: &A,
    ) -> ResponseFuture {
        let (tx, mut rx) = oneshot::channel::<BridgeResult<Value>>();
        let tx = Arc::new(Mutex::new(Some(tx)));
        let on_error_tx = tx.clone();

        let callbacks = CallCallbacks::new()
            .on_success(move |response| {
                if let Some(tx) = tx.lock().take() {
                    let _ = tx.send(Ok(response));
                }
            })
            .on_error(move |response| {
                if let Some(tx) = on_error_tx.lock().take() {
                    let _ = tx.send(Err(BridgeError::RemoteCall(response)));
                }
            });

        let call = match self.call_remote_function(function_name, args, callbacks) {
            Ok(call) => call,
            Err(e) => return Box::pin(async move { Err::<Value, _>(e) }),
        };

        let shared = Arc::downgrade(&self.shared);
        Box::pin(async move {
            match call.execution {
                Execution::Skipped => return Err(BridgeError::Destroyed),
                Execution::Failed(e) => return Err(e.into()),
                Execution::Deferred(deferred) => {
                    tokio::select! {
                        response = &mut rx => {
                            return response.unwrap_or(Err(BridgeError::Destroyed));
                        }
                        outcome = deferred.wait() => {
                            if let Err(e) = outcome {
                                if let (Some(shared), Some(id)) = (shared.upgrade(), call.call_id) {
                                    Bridge::from_shared(shared).discard_call(&id);
                                }
                                return Err(e.into());
                            }
                        }
                    }
                }
                Execution::Sent => {}
            }
            rx.await.unwrap_or(Err(BridgeError::Destroyed))
        })
    }

    /// Release a pending call without running its callbacks
    ///
    /// Returns `false` when the call already resolved or was never pending.
    pub fn discard_call(&self, call_id: &CallId) -> bool {
        let discarded = self.shared.calls.discard(call_id);
        if discarded {
            tracing::debug!(bridge_id = self.id(), call_id = %call_id, "Pending call discarded");
        }
        discarded
    }

    /// Decode and route one message from the peer
    pub fn handle_inbound_message(&self, event_name: &str, raw_payload: &str) -> InboundOutcome {
        if self.is_destroyed() {
            tracing::debug!(bridge_id = self.id(), event = event_name, "Dropping inbound message for destroyed bridge");
            return InboundOutcome::Dropped;
        }

        let payload = self.shared.codec.parse(raw_payload).or_raw(raw_payload);

        if event_name == CALL_RESPONSE_EVENT {
            return InboundOutcome::Response(self.resolve_response(&payload));
        }

        let invoked = self.shared.router.dispatch(event_name, &payload);
        tracing::debug!(bridge_id = self.id(), event = event_name, invoked, "Dispatched inbound event");
        InboundOutcome::Event(invoked)
    }

    fn resolve_response(&self, payload: &Value) -> Resolution {
        let Some(response) = CallResponse::from_payload(payload) else {
            tracing::debug!(bridge_id = self.id(), "Ignoring call response without a request id");
            return Resolution::Unresolved;
        };

        let Ok(call_id) = response.request_id.parse::<CallId>() else {
            tracing::debug!(bridge_id = self.id(), req_id = %response.request_id, "Ignoring call response with foreign request id");
            return Resolution::Unresolved;
        };

        let resolution = self
            .shared
            .calls
            .resolve(&call_id, response.is_error, response.response);
        if resolution == Resolution::Unresolved {
            tracing::debug!(bridge_id = self.id(), call_id = %call_id, "No pending call for response");
        }
        resolution
    }

    /// Tear the bridge down
    ///
    /// Detaches the transport, drops every listener and pending call and
    /// leaves the process registry. Calling it again does nothing.
    pub fn destroy(&self) {
        let previous = match self.shared.state.transition_to(BridgeState::Destroyed) {
            Ok(previous) => previous,
            Err(_) => return,
        };

        self.shared.transport.detach();
        self.shared.router.close();
        let dropped_calls = self.shared.calls.close();
        self.shared.process.remove(self.id());

        tracing::info!(
            bridge_id = self.id(),
            from = %previous,
            dropped_calls,
            "Bridge destroyed"
        );
    }

    fn execute(&self, script: &str) -> Execution {
        let execution = self.shared.transport.execute(script);
        if let Execution::Failed(ref e) = execution {
            tracing::warn!(bridge_id = self.id(), error = %e, "Transport failed to execute instruction");
        }
        execution
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("id", &self.id())
            .field("state", &self.state())
            .finish()
    }
}

/// Inbound sink handed to the transport; holds the bridge weakly
struct BridgeInbound {
    shared: Weak<BridgeShared>,
}

impl InboundHandler for BridgeInbound {
    fn on_message(&self, event_name: &str, raw_payload: &str) {
        match self.shared.upgrade() {
            Some(shared) => {
                Bridge::from_shared(shared).handle_inbound_message(event_name, raw_payload);
            }
            None => tracing::debug!(event = event_name, "Inbound message after bridge was dropped"),
        }
    }
}

/// Turn a call's `args` value into an argument list
pub(crate) fn normalize_args(args: Value) -> Vec<Value> {
    match args {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}
