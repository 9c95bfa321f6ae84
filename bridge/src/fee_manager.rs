//! Fee and penalty calculation shared by quoting and locking.
//!
//! ## Fee Structure
//!
//! | Component      | Set by   | Formula                                       |
//! |----------------|----------|-----------------------------------------------|
//! | Base fee       | Provider | flat                                          |
//! | Liquidity fee  | Provider | floor(amount * rate / 100_000)                |
//! | Protocol fee   | Admin    | flat per token pair, paid to the fee collector |
//!
//! The penalty is not part of the fee: it is taken from the provider's
//! penalty reserve and escrowed with the lock.

use cosmwasm_std::{StdError, StdResult, Uint128};

use crate::error::ContractError;
use crate::state::{ProviderConfig, TokenInfo};

/// Denominator of the liquidity fee rate (100_000 = 100%)
pub const LIQUIDITY_FEE_RATE_BASE: u64 = 100_000;

/// Breakdown of the fee a lock must carry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeQuote {
    /// Base fee plus liquidity fee, earned by the provider
    pub provider_fee: Uint128,
    pub protocol_fee: Uint128,
    /// provider_fee + protocol_fee
    pub total_fee: Uint128,
    pub penalty: Uint128,
}

/// Fee earned by the provider for `amount`
pub fn provider_fee(config: &ProviderConfig, amount: Uint128) -> StdResult<Uint128> {
    let liquidity_fee = amount.multiply_ratio(
        config.liquidity_fee_rate as u128,
        LIQUIDITY_FEE_RATE_BASE as u128,
    );
    Ok(config.base_fee.checked_add(liquidity_fee)?)
}

/// Quote the full fee of a transfer of `amount` through a provider
pub fn quote_fee(
    config: &ProviderConfig,
    token: &TokenInfo,
    amount: Uint128,
) -> StdResult<FeeQuote> {
    let provider_fee = provider_fee(config, amount)?;
    Ok(FeeQuote {
        provider_fee,
        protocol_fee: token.protocol_fee,
        total_fee: provider_fee.checked_add(token.protocol_fee)?,
        penalty: token.penalty,
    })
}

/// Validate a liquidity fee rate is below 100%
pub fn validate_fee_rate(rate: u64) -> Result<(), ContractError> {
    if rate >= LIQUIDITY_FEE_RATE_BASE {
        return Err(ContractError::InvalidFeeRate {
            rate,
            base: LIQUIDITY_FEE_RATE_BASE,
        });
    }
    Ok(())
}

/// Convert an amount between token decimals, truncating when scaling down.
pub fn convert_decimals(amount: Uint128, from_decimals: u8, to_decimals: u8) -> StdResult<Uint128> {
    if from_decimals == to_decimals {
        return Ok(amount);
    }
    let scale = |diff: u8| {
        10u128
            .checked_pow(diff as u32)
            .map(Uint128::new)
            .ok_or_else(|| StdError::generic_err("Decimals difference too large"))
    };
    if from_decimals > to_decimals {
        Ok(amount.checked_div(scale(from_decimals - to_decimals)?)?)
    } else {
        Ok(amount.checked_mul(scale(to_decimals - from_decimals)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::AssetInfo;

    fn provider_config(base_fee: u128, rate: u64) -> ProviderConfig {
        ProviderConfig {
            base_fee: Uint128::new(base_fee),
            liquidity_fee_rate: rate,
            transfer_limit: Uint128::new(1_000_000),
            paused: false,
        }
    }

    fn token(protocol_fee: u128, penalty: u128) -> TokenInfo {
        TokenInfo {
            remote_chain_id: 2,
            local_token: AssetInfo::native("usrc"),
            remote_token: "utgt".to_string(),
            local_decimals: 6,
            remote_decimals: 6,
            protocol_fee: Uint128::new(protocol_fee),
            penalty: Uint128::new(penalty),
        }
    }

    #[test]
    fn test_quote_small_amount() {
        // floor(300 * 100 / 100000) = 0, so only base + protocol fee remain
        let quote = quote_fee(&provider_config(20, 100), &token(100, 50), Uint128::new(300))
            .unwrap();
        assert_eq!(quote.provider_fee, Uint128::new(20));
        assert_eq!(quote.protocol_fee, Uint128::new(100));
        assert_eq!(quote.total_fee, Uint128::new(120));
        assert_eq!(quote.penalty, Uint128::new(50));
    }

    #[test]
    fn test_quote_liquidity_fee() {
        // 0.1% of 1_000_000 = 1000
        let quote = quote_fee(
            &provider_config(20, 100),
            &token(100, 50),
            Uint128::new(1_000_000),
        )
        .unwrap();
        assert_eq!(quote.provider_fee, Uint128::new(1020));
        assert_eq!(quote.total_fee, Uint128::new(1120));
    }

    #[test]
    fn test_quote_overflow_is_error() {
        let config = provider_config(u128::MAX, 0);
        assert!(quote_fee(&config, &token(1, 0), Uint128::new(1)).is_err());
    }

    #[test]
    fn test_validate_fee_rate() {
        assert!(validate_fee_rate(0).is_ok());
        assert!(validate_fee_rate(99_999).is_ok());
        assert_eq!(
            validate_fee_rate(100_000).unwrap_err(),
            ContractError::InvalidFeeRate {
                rate: 100_000,
                base: 100_000
            }
        );
    }

    #[test]
    fn test_convert_decimals() {
        assert_eq!(
            convert_decimals(Uint128::new(1_000_000), 6, 6).unwrap(),
            Uint128::new(1_000_000)
        );
        // 18 -> 6 truncates
        assert_eq!(
            convert_decimals(Uint128::new(1_500_000_000_000_999), 18, 6).unwrap(),
            Uint128::new(1_500)
        );
        // 6 -> 18 scales up
        assert_eq!(
            convert_decimals(Uint128::new(2), 6, 18).unwrap(),
            Uint128::new(2_000_000_000_000)
        );
        assert!(convert_decimals(Uint128::MAX, 6, 18).is_err());
    }
}
