//! Asset types for native denoms and CW20 tokens.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Addr, BankMsg, Coin, CosmosMsg, StdResult, Uint128, WasmMsg};
use cw20::Cw20ExecuteMsg;
use std::fmt;

/// A token held by a contract: either a bank denom or a CW20 contract.
#[cw_serde]
pub enum AssetInfo {
    Native { denom: String },
    Cw20 { contract_addr: Addr },
}

impl AssetInfo {
    pub fn native(denom: impl Into<String>) -> Self {
        AssetInfo::Native {
            denom: denom.into(),
        }
    }

    pub fn cw20(contract_addr: Addr) -> Self {
        AssetInfo::Cw20 { contract_addr }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, AssetInfo::Native { .. })
    }

    /// Token identifier used in storage keys and cross-chain params:
    /// the denom for native tokens, the contract address for CW20.
    pub fn id(&self) -> String {
        match self {
            AssetInfo::Native { denom } => denom.clone(),
            AssetInfo::Cw20 { contract_addr } => contract_addr.to_string(),
        }
    }

    /// Message paying `amount` of this asset from the contract to `recipient`.
    pub fn transfer_msg(&self, recipient: &str, amount: Uint128) -> StdResult<CosmosMsg> {
        Ok(match self {
            AssetInfo::Native { denom } => CosmosMsg::Bank(BankMsg::Send {
                to_address: recipient.to_string(),
                amount: vec![Coin {
                    denom: denom.clone(),
                    amount,
                }],
            }),
            AssetInfo::Cw20 { contract_addr } => CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: contract_addr.to_string(),
                msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                    recipient: recipient.to_string(),
                    amount,
                })?,
                funds: vec![],
            }),
        })
    }

    /// CW20 message moving `amount` from `owner` to `recipient` using the
    /// allowance `owner` granted to the calling contract.
    ///
    /// Returns `None` for native assets, which are attached as funds instead.
    pub fn transfer_from_msg(
        &self,
        owner: &str,
        recipient: &str,
        amount: Uint128,
    ) -> StdResult<Option<CosmosMsg>> {
        match self {
            AssetInfo::Native { .. } => Ok(None),
            AssetInfo::Cw20 { contract_addr } => {
                Ok(Some(CosmosMsg::Wasm(WasmMsg::Execute {
                    contract_addr: contract_addr.to_string(),
                    msg: to_json_binary(&Cw20ExecuteMsg::TransferFrom {
                        owner: owner.to_string(),
                        recipient: recipient.to_string(),
                        amount,
                    })?,
                    funds: vec![],
                })))
            }
        }
    }
}

impl fmt::Display for AssetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}
