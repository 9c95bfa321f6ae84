//! Wire interface between applications and messager contracts.
//!
//! An application (the bridge) sends `MessagerExecuteMsg::SendMessage` to its
//! local messager. On the remote domain the messager delivers the payload by
//! calling the receiving application with `ReceiverExecuteMsg::ReceiveMessage`.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{from_json, to_json_binary, Binary, StdResult};

/// Execute message understood by every messager.
#[cw_serde]
pub enum MessagerExecuteMsg {
    /// Queue `message` for delivery to the trusted remote application on
    /// `remote_chain_id`. Transport fees are attached as funds.
    SendMessage {
        remote_chain_id: u64,
        message: Binary,
        extra: Option<Binary>,
    },
}

/// Execute message every receiving application must accept.
#[cw_serde]
pub enum ReceiverExecuteMsg {
    ReceiveMessage {
        src_chain_id: u64,
        remote_app: String,
        message: Binary,
    },
}

/// Transport parameters attached to a send, encoded as JSON in `extra`.
#[cw_serde]
#[derive(Default)]
pub struct MessageExtra {
    /// Execution gas requested on the remote domain
    pub gas_limit: Option<u64>,
    /// Address receiving any fee overpayment
    pub refund_address: Option<String>,
}

impl MessageExtra {
    pub fn encode(&self) -> StdResult<Binary> {
        to_json_binary(self)
    }

    /// Decode `extra`, treating a missing value as empty parameters.
    pub fn decode(extra: Option<&Binary>) -> StdResult<Self> {
        match extra {
            Some(bytes) if !bytes.is_empty() => from_json(bytes),
            _ => Ok(Self::default()),
        }
    }
}
