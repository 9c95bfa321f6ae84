use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Application {app} is not allowed to send messages")]
    NotWhitelisted { app: String },

    #[error("Caller is not the transport endpoint")]
    NotEndpoint,

    #[error("No remote messager registered for chain {chain_id}")]
    UnknownRemoteChain { chain_id: u64 },

    #[error("No remote application registered for {app} on chain {chain_id}")]
    RemoteAppNotSet { app: String, chain_id: u64 },

    #[error("Untrusted remote messager {got} for chain {chain_id}")]
    UntrustedRemoteMessager { chain_id: u64, got: String },

    #[error("Untrusted remote application {got} for {app} on chain {chain_id}")]
    UntrustedRemoteApp {
        app: String,
        chain_id: u64,
        got: String,
    },

    #[error("Insufficient fee: required {required}, paid {paid}")]
    InsufficientFee { required: Uint128, paid: Uint128 },

    #[error("Only {denom} is accepted as fee")]
    InvalidFeeDenom { denom: String },

    #[error("Invalid message parameters: {reason}")]
    InvalidExtra { reason: String },

    #[error("Gas limit {got} exceeds maximum {max}")]
    GasLimitExceeded { max: u64, got: u64 },

    #[error("Invalid chain id: {chain_id}")]
    InvalidChainId { chain_id: u64 },

    #[error("Insufficient collected fees: requested {requested}, available {available}")]
    InsufficientCollectedFees {
        requested: Uint128,
        available: Uint128,
    },
}
