//! Liquidity Bridge Contract - Relayer-Fronted Cross-Domain Transfers
//!
//! One instance runs on every domain. It is the source side for transfers
//! leaving its domain and the target side for transfers arriving into it.
//!
//! # Source Side (Lock)
//! 1. User quotes the provider fee and reads the provider's chain head
//! 2. User calls `Lock` with the quoted fee and the head as snapshot
//! 3. Funds and the provider's penalty are escrowed under a new transferId
//!
//! # Target Side (Relay / Slash)
//! 1. The provider relays: pays the receiver from its own funds (Filled)
//! 2. After `min_slash_delay` anyone may slash instead: the slasher pays the
//!    receiver (Slashed) and a settlement message is sent to the source side
//! 3. Settlement messages release escrow to the provider or the slasher
//!
//! # Ordering
//! - Per provider key, transfers form a hash chain (snapshot check on lock)
//! - A transfer settles only after its predecessor reached Filled or Slashed
//! - Filled and Slashed are terminal and mutually exclusive

pub mod contract;
pub mod error;
mod execute;
pub mod fee_manager;
pub mod hash;
pub mod msg;
mod query;
pub mod state;

pub use crate::error::ContractError;
pub use crate::fee_manager::{quote_fee, FeeQuote};
pub use crate::hash::{compute_provider_key, compute_transfer_id, keccak256};
