//! State definitions for the liquidity bridge contract.
//!
//! Every record is content-addressed: providers by ProviderKey, transfers by
//! transferId. Both keys can be recomputed from public inputs (see `hash`).

use common::AssetInfo;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Coin, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Admin address for governance operations
    pub admin: Addr,
    /// Whether new locks and provider registrations are blocked
    pub paused: bool,
    /// Domain id of this bridge instance
    pub this_chain_id: u64,
    /// Native denom used to prepay messager fees
    pub native_denom: String,
    /// Receives payouts whose receiver cannot accept them
    pub fallback_receiver: Addr,
    /// Receives protocol fees on lock
    pub fee_collector: Addr,
    /// Seconds after a transfer's timestamp before it may be slashed
    pub min_slash_delay: u64,
}

/// Pending admin change proposal
#[cw_serde]
pub struct PendingAdmin {
    pub new_address: Addr,
    pub execute_after: Timestamp,
}

/// Messager instances serving one remote domain
#[cw_serde]
pub struct MessagerRoute {
    /// Messager the bridge sends settlement messages through
    pub send_service: Addr,
    /// Messager allowed to deliver inbound messages
    pub receive_service: Addr,
}

/// Token pair registration, seen from this domain
#[cw_serde]
pub struct TokenInfo {
    pub remote_chain_id: u64,
    pub local_token: AssetInfo,
    pub remote_token: String,
    pub local_decimals: u8,
    pub remote_decimals: u8,
    /// Charged on lock and paid to the fee collector
    pub protocol_fee: Uint128,
    /// Moved from the provider's reserve into every lock
    pub penalty: Uint128,
}

// ============================================================================
// Provider Ledger
// ============================================================================

/// Fee policy and limits set by a provider
#[cw_serde]
pub struct ProviderConfig {
    pub base_fee: Uint128,
    /// Liquidity fee rate over `LIQUIDITY_FEE_RATE_BASE`
    pub liquidity_fee_rate: u64,
    pub transfer_limit: Uint128,
    pub paused: bool,
}

/// Provider ledger entry keyed by ProviderKey
#[cw_serde]
pub struct ProviderInfo {
    pub provider: Addr,
    pub remote_chain_id: u64,
    pub source_token: String,
    pub target_token: String,
    pub config: ProviderConfig,
    /// Unused penalty reserve, in the source token
    pub penalty_reserve: Uint128,
    /// Id of the provider's latest lock (zero before the first one)
    pub head_transfer_id: [u8; 32],
}

// ============================================================================
// Source Side
// ============================================================================

#[cw_serde]
pub enum LockStatus {
    Locked,
    Withdrawn,
    Slashed,
}

/// Escrow created by a lock
#[cw_serde]
pub struct LockRecord {
    pub provider: Addr,
    pub remote_chain_id: u64,
    pub source_token: String,
    pub target_token: String,
    /// amount + provider fee + penalty
    pub amount_with_fee_and_penalty: Uint128,
    pub penalty: Uint128,
    pub timestamp: u64,
    pub status: LockStatus,
}

// ============================================================================
// Target Side
// ============================================================================

#[cw_serde]
pub enum FillStatus {
    Filled,
    Slashed,
}

/// Terminal settlement of a transfer on the target side
#[cw_serde]
pub struct FillRecord {
    pub status: FillStatus,
    /// Relayer (Filled) or slasher (Slashed)
    pub by: Addr,
    pub provider: String,
    pub source_chain_id: u64,
    pub settled_at: u64,
}

#[cw_serde]
pub enum SettlementKind {
    WithdrawLiquidity,
    Slash,
}

#[cw_serde]
pub enum DispatchStatus {
    Dispatched,
    Failed,
}

/// Outbound settlement message state for a transfer
#[cw_serde]
pub struct SettlementMessage {
    pub kind: SettlementKind,
    pub attempts: u32,
    pub status: DispatchStatus,
    pub last_attempt_at: u64,
}

/// Dispatch in flight, read back by the reply handler
#[cw_serde]
pub struct PendingDispatch {
    pub transfer_ids: Vec<[u8; 32]>,
    pub refund_to: Addr,
    pub fee: Vec<Coin>,
}

/// Native payout in flight, re-routed to the fallback receiver on failure
#[cw_serde]
pub struct PendingPayout {
    pub transfer_id: [u8; 32],
    pub fallback: Addr,
    pub coin: Coin,
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:liquidity-bridge";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = "1.0.0";

/// 7 days in seconds for admin change timelock
pub const ADMIN_TIMELOCK_DURATION: u64 = 604_800;

/// Default slash delay in seconds (30 minutes)
pub const DEFAULT_MIN_SLASH_DELAY: u64 = 1_800;

pub const MIN_SLASH_DELAY_LOWER_BOUND: u64 = 60;

pub const MIN_SLASH_DELAY_UPPER_BOUND: u64 = 604_800;

/// Allowed distance between a lock's timestamp and block time
pub const MAX_TIMESTAMP_DRIFT: u64 = 900;

/// Maximum transfer ids in one liquidity withdraw request
pub const MAX_WITHDRAW_BATCH: usize = 32;

/// Chain head of a provider that never locked
pub const GENESIS_TRANSFER_ID: [u8; 32] = [0u8; 32];

// ============================================================================
// Storage
// ============================================================================

pub const CONFIG: Item<Config> = Item::new("config");

pub const PENDING_ADMIN: Item<PendingAdmin> = Item::new("pending_admin");

/// Key: remote chain id
pub const MESSAGERS: Map<u64, MessagerRoute> = Map::new("messagers");

/// Key: (remote chain id, local token id, remote token)
pub const TOKENS: Map<(u64, &str, &str), TokenInfo> = Map::new("tokens");

/// Key: 32-byte ProviderKey
pub const PROVIDERS: Map<&[u8], ProviderInfo> = Map::new("providers");

/// Key: 32-byte transferId (source side)
pub const LOCKS: Map<&[u8], LockRecord> = Map::new("locks");

/// Key: 32-byte transferId (target side)
pub const FILLS: Map<&[u8], FillRecord> = Map::new("fills");

/// Key: 32-byte transferId (target side)
pub const SETTLEMENT_MESSAGES: Map<&[u8], SettlementMessage> = Map::new("settlement_messages");

pub const PENDING_DISPATCH: Item<PendingDispatch> = Item::new("pending_dispatch");

pub const PENDING_PAYOUT: Item<PendingPayout> = Item::new("pending_payout");
