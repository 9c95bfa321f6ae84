//! Transport adapters.
//!
//! A messager instance is bound to exactly one transport. The transport only
//! decides how a send is priced and which per-message parameters it needs;
//! queuing, delivery checks and replay protection are shared by all of them.

use common::MessageExtra;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Binary, Uint128};

use crate::error::ContractError;

/// Behaviour every transport provides to the messager.
pub trait TransportAdapter {
    /// Short identifier used in events.
    fn name(&self) -> &'static str;

    /// Check the per-message parameters for this transport.
    fn parse_extra(&self, extra: &MessageExtra) -> Result<(), ContractError>;

    /// Fee charged for sending `message` with `extra`.
    fn quote_fee(&self, message: &Binary, extra: &MessageExtra) -> Result<Uint128, ContractError>;
}

/// Canonical bridge mailbox of the remote domain: the sender buys execution
/// gas on the remote side.
#[cw_serde]
pub struct NativeBridgeParams {
    pub base_fee: Uint128,
    pub gas_price: Uint128,
    pub max_gas_limit: u64,
}

/// Generic relay network charging per message and per payload byte.
#[cw_serde]
pub struct RelayNetworkParams {
    pub flat_fee: Uint128,
    pub fee_per_byte: Uint128,
}

/// Third party messaging network with a flat native fee.
#[cw_serde]
pub struct ThirdPartyParams {
    pub native_fee: Uint128,
}

#[cw_serde]
pub enum Transport {
    NativeBridge(NativeBridgeParams),
    RelayNetwork(RelayNetworkParams),
    ThirdParty(ThirdPartyParams),
}

impl Transport {
    fn adapter(&self) -> &dyn TransportAdapter {
        match self {
            Transport::NativeBridge(params) => params,
            Transport::RelayNetwork(params) => params,
            Transport::ThirdParty(params) => params,
        }
    }
}

impl TransportAdapter for Transport {
    fn name(&self) -> &'static str {
        self.adapter().name()
    }

    fn parse_extra(&self, extra: &MessageExtra) -> Result<(), ContractError> {
        self.adapter().parse_extra(extra)
    }

    fn quote_fee(&self, message: &Binary, extra: &MessageExtra) -> Result<Uint128, ContractError> {
        self.adapter().quote_fee(message, extra)
    }
}

impl TransportAdapter for NativeBridgeParams {
    fn name(&self) -> &'static str {
        "native_bridge"
    }

    fn parse_extra(&self, extra: &MessageExtra) -> Result<(), ContractError> {
        let gas_limit = extra.gas_limit.ok_or(ContractError::InvalidExtra {
            reason: "gas_limit is required".to_string(),
        })?;
        if gas_limit == 0 {
            return Err(ContractError::InvalidExtra {
                reason: "gas_limit must be greater than zero".to_string(),
            });
        }
        if gas_limit > self.max_gas_limit {
            return Err(ContractError::GasLimitExceeded {
                max: self.max_gas_limit,
                got: gas_limit,
            });
        }
        Ok(())
    }

    fn quote_fee(&self, _message: &Binary, extra: &MessageExtra) -> Result<Uint128, ContractError> {
        self.parse_extra(extra)?;
        let gas_limit = Uint128::from(extra.gas_limit.unwrap_or_default());
        Ok(self
            .base_fee
            .checked_add(gas_limit.checked_mul(self.gas_price)?)?)
    }
}

impl TransportAdapter for RelayNetworkParams {
    fn name(&self) -> &'static str {
        "relay_network"
    }

    fn parse_extra(&self, _extra: &MessageExtra) -> Result<(), ContractError> {
        Ok(())
    }

    fn quote_fee(&self, message: &Binary, _extra: &MessageExtra) -> Result<Uint128, ContractError> {
        let bytes = Uint128::from(message.len() as u128);
        Ok(self
            .flat_fee
            .checked_add(bytes.checked_mul(self.fee_per_byte)?)?)
    }
}

impl TransportAdapter for ThirdPartyParams {
    fn name(&self) -> &'static str {
        "third_party"
    }

    fn parse_extra(&self, _extra: &MessageExtra) -> Result<(), ContractError> {
        Ok(())
    }

    fn quote_fee(&self, _message: &Binary, _extra: &MessageExtra) -> Result<Uint128, ContractError> {
        Ok(self.native_fee)
    }
}
