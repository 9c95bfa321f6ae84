//! Messager Contract - Cross-Domain Message Transport
//!
//! # Sending
//! 1. A whitelisted application calls `SendMessage` with the transport fee
//! 2. The message is queued in the outbox under the next nonce
//!
//! # Delivering
//! 1. The transport endpoint reads the outbox of the remote messager
//! 2. It calls `DeliverMessage` here, which checks the remote messager and the
//!    remote application, de-duplicates by (source chain, nonce) and calls the
//!    local application with `ReceiveMessage`
//!
//! The transport (native bridge, relay network, third party network) only
//! changes how a send is priced; see `transport`.

pub mod contract;
pub mod error;
mod execute;
pub mod msg;
mod query;
pub mod state;
pub mod transport;

pub use crate::error::ContractError;
pub use crate::transport::{Transport, TransportAdapter};
