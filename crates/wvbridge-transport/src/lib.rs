//! wvbridge-transport - JSON codec, wire messages and transport contract
//!
//! This crate provides:
//! - [`JsonCodec`] for defensive payload decoding and script-safe encoding
//! - [`Instruction`] and [`CallResponse`] for the peer wire protocol
//! - [`TransportAdapter`] and [`InboundHandler`], the seam to platform transports

mod adapter;
mod codec;
mod envelope;

pub use adapter::{
    DeferredResult, DeferredSender, Execution, InboundHandler, TransportAdapter, TransportError,
};
pub use codec::{CodecError, JsonCodec, Parsed};
pub use envelope::{CallResponse, Instruction};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CallResponse, CodecError, DeferredResult, Execution, InboundHandler, Instruction,
        JsonCodec, Parsed, TransportAdapter, TransportError,
    };
}
