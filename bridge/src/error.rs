//! Error types for the liquidity bridge contract.

use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("Unauthorized: caller is not the provider {provider}")]
    NotProvider { provider: String },

    #[error("Unauthorized: caller is not the receive service for chain {chain_id}")]
    UnauthorizedMessager { chain_id: u64 },

    #[error("Unauthorized: only pending admin can accept")]
    UnauthorizedPendingAdmin,

    // ========================================================================
    // Admin Errors
    // ========================================================================

    #[error("No pending admin change")]
    NoPendingAdmin,

    #[error("Timelock not expired: {remaining_seconds} seconds remaining")]
    TimelockNotExpired { remaining_seconds: u64 },

    #[error("Bridge is paused")]
    BridgePaused,

    // ========================================================================
    // Concurrency / Ordering Errors
    // ========================================================================

    #[error("Stale snapshot: provider head is {head}, got {got}")]
    StaleSnapshot { head: String, got: String },

    #[error("Predecessor unsettled: {previous} has not been filled or slashed")]
    PredecessorUnsettled { previous: String },

    // ========================================================================
    // Terminal State Errors
    // ========================================================================

    #[error("Transfer already settled: {transfer_id}")]
    AlreadySettled { transfer_id: String },

    #[error("Transfer not settled: {transfer_id}")]
    NotSettled { transfer_id: String },

    #[error("Transfer {transfer_id} is not filled by provider {provider}")]
    NotFilledByProvider {
        transfer_id: String,
        provider: String,
    },

    // ========================================================================
    // Economic Validation Errors
    // ========================================================================

    #[error("Fee mismatch: expected {expected}, got {got}")]
    FeeMismatch { expected: Uint128, got: Uint128 },

    #[error("Transfer limit exceeded: limit is {limit}, requested {requested}")]
    TransferLimitExceeded { limit: Uint128, requested: Uint128 },

    #[error("Insufficient penalty reserve: required {required}, available {available}")]
    InsufficientPenaltyReserve {
        required: Uint128,
        available: Uint128,
    },

    #[error("Provider is paused")]
    ProviderPaused,

    #[error("Invalid liquidity fee rate: {rate} must be below {base}")]
    InvalidFeeRate { rate: u64, base: u64 },

    // ========================================================================
    // Timing Errors
    // ========================================================================

    #[error("Too early to slash: {remaining_seconds} seconds remaining")]
    TooEarly { remaining_seconds: u64 },

    #[error("Invalid timestamp {timestamp}: block time is {now}")]
    InvalidTimestamp { timestamp: u64, now: u64 },

    #[error("Invalid slash delay: must be between {min} and {max} seconds")]
    InvalidSlashDelay { min: u64, max: u64 },

    // ========================================================================
    // Validation Errors
    // ========================================================================

    #[error("Invalid hash length: expected 32 bytes, got {got}")]
    InvalidHashLength { got: usize },

    #[error("Transfer id mismatch: computed {computed}, expected {expected}")]
    TransferIdMismatch { computed: String, expected: String },

    #[error("Invalid chain ID: {chain_id}")]
    InvalidChainId { chain_id: u64 },

    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    #[error("Invalid funds: expected [{expected}], got [{got}]")]
    InvalidFunds { expected: String, got: String },

    #[error("Token pair not registered: {local_token} <-> {remote_token} on chain {chain_id}")]
    TokenNotRegistered {
        chain_id: u64,
        local_token: String,
        remote_token: String,
    },

    #[error("Token {token} does not match the registered asset")]
    TokenMismatch { token: String },

    #[error("Provider not registered")]
    ProviderNotRegistered,

    #[error("Messager not configured for chain {chain_id}")]
    MessagerNotConfigured { chain_id: u64 },

    #[error("Transfer id list must contain between 1 and {max} entries")]
    InvalidBatchSize { max: usize },

    #[error("Unknown reply id: {id}")]
    UnknownReplyId { id: u64 },
}
