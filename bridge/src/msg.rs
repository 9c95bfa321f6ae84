//! Message types for the liquidity bridge contract.

use common::AssetInfo;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Timestamp, Uint128};

use crate::state::{DispatchStatus, FillStatus, LockStatus, ProviderConfig, SettlementKind};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct InstantiateMsg {
    pub admin: String,
    /// Domain id of this bridge instance (must not be 0)
    pub this_chain_id: u64,
    /// Native denom used to prepay messager fees
    pub native_denom: String,
    pub fallback_receiver: String,
    pub fee_collector: String,
    /// Defaults to 1800 seconds
    pub min_slash_delay: Option<u64>,
}

// ============================================================================
// Transfer Parameters
// ============================================================================

/// Lock request submitted by a user on the source domain
#[cw_serde]
pub struct LockParams {
    pub remote_chain_id: u64,
    pub provider: String,
    pub source_token: String,
    pub target_token: String,
    /// Fee quoted by `QueryMsg::QuoteFee`, must match exactly
    pub total_fee: Uint128,
    /// Amount in source token units, excluding the fee
    pub amount: Uint128,
    /// Receiver address on the target domain
    pub receiver: String,
    /// Provider head the user observed (32 bytes)
    pub snapshot: Binary,
    pub timestamp: u64,
}

/// Full description of a locked transfer, as relayed on the target domain.
/// The transferId is a pure function of these fields.
#[cw_serde]
pub struct TransferParams {
    pub source_chain_id: u64,
    pub target_chain_id: u64,
    /// Provider head before this lock (32 bytes)
    pub previous_transfer_id: Binary,
    pub provider: String,
    pub source_token: String,
    pub target_token: String,
    pub receiver: String,
    /// Amount in source token units
    pub amount: Uint128,
    pub timestamp: u64,
}

/// Settlement call carried by messagers from the target to the source side
#[cw_serde]
pub enum RemoteCall {
    WithdrawLiquidity {
        transfer_ids: Vec<Binary>,
        provider: String,
    },
    Slash {
        transfer_id: Binary,
        slasher: String,
    },
}

// ============================================================================
// Execute Messages
// ============================================================================

#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Provider Ledger
    // ========================================================================
    /// Create or update the caller's provider entry for a token pair
    RegisterProvider {
        remote_chain_id: u64,
        source_token: String,
        target_token: String,
        base_fee: Uint128,
        liquidity_fee_rate: u64,
        transfer_limit: Uint128,
    },

    /// Deposit native source tokens into the caller's penalty reserve
    DepositPenaltyReserve {
        remote_chain_id: u64,
        source_token: String,
        target_token: String,
    },

    /// Withdraw unused penalty reserve
    WithdrawPenaltyReserve {
        remote_chain_id: u64,
        source_token: String,
        target_token: String,
        amount: Uint128,
    },

    /// Pause or resume new locks against the caller's provider entry
    SetProviderPaused {
        remote_chain_id: u64,
        source_token: String,
        target_token: String,
        paused: bool,
    },

    // ========================================================================
    // Source Side
    // ========================================================================
    /// Lock native tokens (amount + total_fee attached as funds)
    Lock { params: LockParams },

    /// CW20 receive hook (lock, penalty reserve deposit)
    Receive(cw20::Cw20ReceiveMsg),

    /// Inbound settlement from the remote domain's messager
    ReceiveMessage {
        src_chain_id: u64,
        remote_app: String,
        message: Binary,
    },

    // ========================================================================
    // Target Side
    // ========================================================================
    /// Provider pays the receiver out of its own funds
    Relay {
        params: TransferParams,
        expected_transfer_id: Binary,
    },

    /// After the slash delay, anyone pays the receiver and claims the escrow
    RequestSlashAndSettle {
        params: TransferParams,
        expected_transfer_id: Binary,
        fee_prepaid: Uint128,
        extra: Option<Binary>,
    },

    /// Re-send the settlement message of a filled or slashed transfer
    RetrySettlementMessage {
        transfer_id: Binary,
        fee_prepaid: Uint128,
        extra: Option<Binary>,
    },

    /// Ask the source domain to release escrow for relayed transfers
    RequestWithdrawLiquidity {
        remote_chain_id: u64,
        transfer_ids: Vec<Binary>,
        provider: String,
        fee_prepaid: Uint128,
        extra: Option<Binary>,
    },

    // ========================================================================
    // Governance
    // ========================================================================
    RegisterToken {
        remote_chain_id: u64,
        local_token: AssetInfo,
        remote_token: String,
        local_decimals: u8,
        remote_decimals: u8,
        protocol_fee: Uint128,
        penalty: Uint128,
    },

    UpdateToken {
        remote_chain_id: u64,
        local_token: String,
        remote_token: String,
        protocol_fee: Uint128,
        penalty: Uint128,
    },

    SetMessager {
        remote_chain_id: u64,
        send_service: String,
        receive_service: String,
    },

    SetMinSlashDelay { delay_seconds: u64 },

    SetFallbackReceiver { address: String },

    SetFeeCollector { address: String },

    Pause {},

    Unpause {},

    ProposeAdmin { new_admin: String },

    AcceptAdmin {},

    CancelAdminProposal {},
}

/// CW20 receive hook payloads
#[cw_serde]
pub enum ReceiveMsg {
    /// Lock the sent tokens; the sent amount must be amount + total_fee
    Lock { params: LockParams },
    /// Deposit the sent tokens into the sender's penalty reserve
    DepositPenaltyReserve {
        remote_chain_id: u64,
        target_token: String,
    },
}

// ============================================================================
// Query Messages
// ============================================================================

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(Option<PendingAdminResponse>)]
    PendingAdmin {},

    #[returns(MessagerRouteResponse)]
    MessagerRoute { remote_chain_id: u64 },

    #[returns(TokenInfoResponse)]
    TokenInfo {
        remote_chain_id: u64,
        local_token: String,
        remote_token: String,
    },

    #[returns(TokensResponse)]
    Tokens {
        start_after: Option<(u64, String, String)>,
        limit: Option<u32>,
    },

    #[returns(ProviderInfoResponse)]
    ProviderInfo {
        remote_chain_id: u64,
        provider: String,
        source_token: String,
        target_token: String,
    },

    #[returns(ProviderKeyResponse)]
    ProviderKey {
        remote_chain_id: u64,
        provider: String,
        source_token: String,
        target_token: String,
    },

    /// Fee a lock must carry right now
    #[returns(QuoteFeeResponse)]
    QuoteFee {
        remote_chain_id: u64,
        provider: String,
        source_token: String,
        target_token: String,
        amount: Uint128,
    },

    #[returns(TransferIdResponse)]
    ComputeTransferId { params: TransferParams },

    #[returns(Option<LockInfoResponse>)]
    LockInfo { transfer_id: Binary },

    #[returns(Option<FillInfoResponse>)]
    FillInfo { transfer_id: Binary },

    #[returns(Option<SettlementMessageResponse>)]
    SettlementMessage { transfer_id: Binary },
}

// ============================================================================
// Query Responses
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub paused: bool,
    pub this_chain_id: u64,
    pub native_denom: String,
    pub fallback_receiver: Addr,
    pub fee_collector: Addr,
    pub min_slash_delay: u64,
}

#[cw_serde]
pub struct PendingAdminResponse {
    pub new_address: Addr,
    pub execute_after: Timestamp,
}

#[cw_serde]
pub struct MessagerRouteResponse {
    pub remote_chain_id: u64,
    pub send_service: Addr,
    pub receive_service: Addr,
}

#[cw_serde]
pub struct TokenInfoResponse {
    pub remote_chain_id: u64,
    pub local_token: AssetInfo,
    pub remote_token: String,
    pub local_decimals: u8,
    pub remote_decimals: u8,
    pub protocol_fee: Uint128,
    pub penalty: Uint128,
}

#[cw_serde]
pub struct TokensResponse {
    pub tokens: Vec<TokenInfoResponse>,
}

#[cw_serde]
pub struct ProviderInfoResponse {
    pub provider_key: Binary,
    pub provider: Addr,
    pub remote_chain_id: u64,
    pub source_token: String,
    pub target_token: String,
    pub config: ProviderConfig,
    pub penalty_reserve: Uint128,
    pub head_transfer_id: Binary,
}

#[cw_serde]
pub struct ProviderKeyResponse {
    pub provider_key: Binary,
}

#[cw_serde]
pub struct QuoteFeeResponse {
    pub provider_fee: Uint128,
    pub protocol_fee: Uint128,
    pub total_fee: Uint128,
    pub penalty: Uint128,
}

#[cw_serde]
pub struct TransferIdResponse {
    pub transfer_id: Binary,
}

#[cw_serde]
pub struct LockInfoResponse {
    pub provider: Addr,
    pub remote_chain_id: u64,
    pub source_token: String,
    pub target_token: String,
    pub amount_with_fee_and_penalty: Uint128,
    pub penalty: Uint128,
    pub timestamp: u64,
    pub status: LockStatus,
}

#[cw_serde]
pub struct FillInfoResponse {
    pub status: FillStatus,
    pub by: Addr,
    pub provider: String,
    pub source_chain_id: u64,
    pub settled_at: u64,
}

#[cw_serde]
pub struct SettlementMessageResponse {
    pub kind: SettlementKind,
    pub attempts: u32,
    pub status: DispatchStatus,
    pub last_attempt_at: u64,
}
