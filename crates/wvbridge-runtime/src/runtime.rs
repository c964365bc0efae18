//! Tokio runtime for deferred script evaluations

use crate::DeferredExecutor;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::{Builder, Handle, Runtime};
use wvbridge_core::{BridgeConfig, BridgeError, BridgeResult};

/// Settings for the evaluation runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Worker threads; `None` lets Tokio use one per core
    pub worker_threads: Option<usize>,
    pub thread_name: String,
    /// How long [`AsyncRuntime::shutdown`] waits for interrupted work to settle
    pub shutdown_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            thread_name: "wvbridge-worker".to_string(),
            shutdown_timeout: Duration::from_millis(5000),
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the worker count and shutdown timeout from a bridge configuration
    pub fn from_bridge_config(config: &BridgeConfig) -> Self {
        Self {
            worker_threads: config.worker_threads,
            shutdown_timeout: config.shutdown_timeout(),
            ..Self::default()
        }
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

/// Owns the Tokio runtime that asynchronous transports evaluate scripts on
///
/// Dropping it closes its executor, so executions still in flight answer
/// with [`wvbridge_transport::TransportError::Shutdown`].
pub struct AsyncRuntime {
    runtime: Runtime,
    executor: DeferredExecutor,
    config: RuntimeConfig,
}

impl AsyncRuntime {
    pub fn new(config: RuntimeConfig) -> BridgeResult<Self> {
        let mut builder = Builder::new_multi_thread();
        if let Some(threads) = config.worker_threads {
            builder.worker_threads(threads);
        }

        let runtime = builder
            .thread_name(&config.thread_name)
            .enable_all()
            .build()
            .map_err(|e| BridgeError::RuntimeError(format!("failed to start runtime: {e}")))?;

        tracing::debug!(
            workers = ?config.worker_threads,
            thread_name = %config.thread_name,
            "Evaluation runtime started"
        );

        let executor = DeferredExecutor::new(runtime.handle().clone());
        Ok(Self {
            runtime,
            executor,
            config,
        })
    }

    pub fn with_defaults() -> BridgeResult<Self> {
        Self::new(RuntimeConfig::default())
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn handle(&self) -> Handle {
        self.runtime.handle().clone()
    }

    /// Executor for transports that run on this runtime
    ///
    /// Every call returns a clone of the same executor.
    pub fn executor(&self) -> DeferredExecutor {
        self.executor.clone()
    }

    /// Block the calling thread on `future`
    ///
    /// Must not be called from inside the runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Interrupt every deferred execution and wait for them to settle
    ///
    /// Waits at most [`RuntimeConfig::shutdown_timeout`] and returns whether
    /// everything settled. Must not be called from inside the runtime.
    pub fn shutdown(&self) -> bool {
        if self.executor.close() {
            tracing::info!("Shutting down evaluation runtime");
        }
        self.runtime
            .block_on(self.executor.drain(self.config.shutdown_timeout))
    }

    pub fn is_shutting_down(&self) -> bool {
        self.executor.is_closed()
    }
}

impl Drop for AsyncRuntime {
    fn drop(&mut self) {
        self.executor.close();
    }
}
