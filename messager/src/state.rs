//! State definitions for the messager contract.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Coin, Uint128};
use cw_storage_plus::{Item, Map};

use crate::transport::Transport;

#[cw_serde]
pub struct Config {
    pub owner: Addr,
    /// Domain id of this messager
    pub this_chain_id: u64,
    /// Delivery layer allowed to hand inbound messages to this messager
    pub endpoint: Addr,
    pub transport: Transport,
    /// Denom in which transport fees are paid
    pub fee_denom: String,
}

/// A queued outbound message, waiting for the delivery layer to pick it up.
#[cw_serde]
pub struct OutboundMessage {
    pub nonce: u64,
    pub remote_chain_id: u64,
    pub from_app: Addr,
    pub to_messager: String,
    pub to_app: String,
    pub message: Binary,
    pub fee: Coin,
    pub sent_at: u64,
}

pub const CONTRACT_NAME: &str = "crates.io:messager";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const CONFIG: Item<Config> = Item::new("config");

/// Applications allowed to send through this messager
pub const WHITELIST: Map<&Addr, bool> = Map::new("whitelist");

/// Remote chain id -> messager on that chain
pub const REMOTE_MESSAGERS: Map<u64, String> = Map::new("remote_messagers");

/// (local app, remote chain id) -> trusted application on that chain
pub const REMOTE_APPS: Map<(&Addr, u64), String> = Map::new("remote_apps");

pub const OUTBOX: Map<u64, OutboundMessage> = Map::new("outbox");

pub const NEXT_NONCE: Item<u64> = Item::new("next_nonce");

/// (source chain id, nonce) -> block height of delivery
pub const DELIVERED: Map<(u64, u64), u64> = Map::new("delivered");

/// Transport fees held by the messager, withdrawable by the owner
pub const COLLECTED_FEES: Item<Uint128> = Item::new("collected_fees");
