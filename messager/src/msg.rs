use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Coin, Uint128};

use crate::state::OutboundMessage;
use crate::transport::Transport;

#[cw_serde]
pub struct InstantiateMsg {
    pub owner: String,
    pub this_chain_id: u64,
    pub endpoint: String,
    pub transport: Transport,
    pub fee_denom: String,
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub enum ExecuteMsg {
    /// Queue a message for the trusted remote application (whitelisted apps only)
    SendMessage {
        remote_chain_id: u64,
        message: Binary,
        extra: Option<Binary>,
    },

    /// Hand an inbound message to the local application (endpoint only)
    DeliverMessage {
        src_chain_id: u64,
        nonce: u64,
        from_messager: String,
        from_app: String,
        to_app: String,
        message: Binary,
    },

    // ========================================================================
    // Owner
    // ========================================================================
    SetWhitelist { app: String, allowed: bool },

    SetRemoteMessager {
        remote_chain_id: u64,
        messager: String,
    },

    /// Pair a local application with its counterpart on a remote chain
    SetRemoteApp {
        app: String,
        remote_chain_id: u64,
        remote_app: String,
    },

    SetTransport { transport: Transport },

    SetEndpoint { endpoint: String },

    /// Withdraw collected transport fees (all of them when `amount` is None)
    WithdrawFees {
        recipient: String,
        amount: Option<Uint128>,
    },

    TransferOwnership { new_owner: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(Option<OutboundMessage>)]
    OutboundMessage { nonce: u64 },

    #[returns(OutboundMessagesResponse)]
    OutboundMessages {
        start_after: Option<u64>,
        limit: Option<u32>,
    },

    #[returns(IsDeliveredResponse)]
    IsDelivered { src_chain_id: u64, nonce: u64 },

    #[returns(QuoteFeeResponse)]
    QuoteFee {
        message: Binary,
        extra: Option<Binary>,
    },

    #[returns(Option<String>)]
    RemoteMessager { remote_chain_id: u64 },

    #[returns(Option<String>)]
    RemoteApp { app: String, remote_chain_id: u64 },

    #[returns(IsWhitelistedResponse)]
    IsWhitelisted { app: String },
}

#[cw_serde]
pub struct ConfigResponse {
    pub owner: Addr,
    pub this_chain_id: u64,
    pub endpoint: Addr,
    pub transport: Transport,
    pub transport_name: String,
    pub fee_denom: String,
    pub next_nonce: u64,
    pub collected_fees: Uint128,
}

#[cw_serde]
pub struct OutboundMessagesResponse {
    pub messages: Vec<OutboundMessage>,
}

#[cw_serde]
pub struct IsDeliveredResponse {
    pub delivered: bool,
}

#[cw_serde]
pub struct QuoteFeeResponse {
    pub fee: Coin,
}

#[cw_serde]
pub struct IsWhitelistedResponse {
    pub whitelisted: bool,
}
