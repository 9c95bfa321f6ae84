//! Execute handlers for the liquidity bridge contract.
//!
//! - `provider` - Provider ledger: registration, penalty reserve, pause
//! - `source` - Lock and inbound settlement (withdraw, slash)
//! - `target` - Relay, slash, retry and liquidity withdraw requests
//! - `settlement` - Payouts, outbound settlement dispatch and their replies
//! - `config` - Token pairs, messager routes, bridge parameters
//! - `admin` - Pause, unpause and admin transfer

mod admin;
mod config;
mod provider;
mod settlement;
mod source;
mod target;

pub use admin::*;
pub use config::*;
pub use provider::*;
pub use settlement::{handle_payout_reply, handle_settlement_reply, PAYOUT_REPLY_ID, SETTLEMENT_REPLY_ID};
pub use source::*;
pub use target::*;
