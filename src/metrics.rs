//! Pool Metrics Calculator
//!
//! Turns raw on-chain state into APR and pool totals. Pure functions, no I/O.
//!
//! APR FORMULA:
//! APR = reward_rate * SECONDS_PER_YEAR * 100 / total_staked
//!
//! For pools whose staked token is a constant-product LP token the rate is
//! scaled by the LP value multiplier:
//! lp_multiplier = pool_total_supply / tracked_reserve / 2 * 1e18
//! APR_lp = APR * (lp_multiplier / 1e18)
//!
//! Ratios are taken before scaling by 1e18 so large pools stay inside the
//! 28-digit decimal range.
//!
//! The multiplier assumes a two-asset pool weighted 50/50. Other pool
//! invariants need a different formula.

use alloy_primitives::{Address, U256};
use eyre::{eyre, Result};
use rust_decimal::Decimal;

// ============================================
// CONSTANTS
// ============================================

/// 365-day year
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Decimals of every staked / reward token handled here
pub const TOKEN_DECIMALS: u32 = 18;

/// 1e18 as a decimal, the fixed-point unit of the LP multiplier
pub const WAD: Decimal = Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0);

/// Largest mantissa a `Decimal` can hold (2^96 - 1)
const MAX_MANTISSA: u128 = (1u128 << 96) - 1;

// ============================================
// CONVERSIONS
// ============================================

/// Convert a fixed-point on-chain integer into a decimal token amount.
///
/// Values beyond 28 significant digits lose their lowest fractional digits.
/// Fails only if the integer part itself cannot be represented.
pub fn wei_to_decimal(value: U256, decimals: u32) -> Result<Decimal> {
    let max = U256::from(MAX_MANTISSA);
    let ten = U256::from(10u8);

    let mut mantissa = value;
    let mut scale = decimals;
    while mantissa > max {
        if scale == 0 {
            return Err(eyre!("Value {} is too large for a decimal", value));
        }
        mantissa /= ten;
        scale -= 1;
    }

    Decimal::try_from_i128_with_scale(mantissa.to::<u128>() as i128, scale)
        .map_err(|e| eyre!("Failed to convert {} to decimal: {}", value, e))
}

/// Token amount with the default 18 decimals, trailing zeros trimmed.
pub fn format_token_amount(value: U256) -> Result<String> {
    Ok(wei_to_decimal(value, TOKEN_DECIMALS)?.normalize().to_string())
}

// ============================================
// APR
// ============================================

/// Annualized percentage yield.
///
/// Returns `None` when nothing is staked. `lp_multiplier` is the WAD-scaled
/// value from [`lp_multiplier`]; pass `None` for plain single-token pools.
pub fn compute_apr(
    reward_rate_per_second: Decimal,
    total_staked_supply: Decimal,
    lp_multiplier: Option<Decimal>,
) -> Result<Option<Decimal>> {
    if total_staked_supply.is_zero() {
        return Ok(None);
    }

    let base = reward_rate_per_second
        .checked_mul(Decimal::from(SECONDS_PER_YEAR))
        .and_then(|v| v.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|v| v.checked_div(total_staked_supply))
        .ok_or_else(|| {
            eyre!(
                "APR overflow (rate {}, staked {})",
                reward_rate_per_second,
                total_staked_supply
            )
        })?;

    let apr = match lp_multiplier {
        Some(multiplier) => multiplier
            .checked_div(WAD)
            .and_then(|m| base.checked_mul(m))
            .ok_or_else(|| {
                eyre!("LP-weighted APR overflow (base {}, multiplier {})", base, multiplier)
            })?,
        None => base,
    };

    Ok(Some(apr))
}

/// WAD-scaled share of pool value attributable to the tracked token.
///
/// `None` when the tracked reserve is empty.
pub fn lp_multiplier(
    pool_total_supply: Decimal,
    tracked_reserve: Decimal,
) -> Result<Option<Decimal>> {
    if tracked_reserve.is_zero() {
        return Ok(None);
    }

    pool_total_supply
        .checked_div(tracked_reserve)
        .and_then(|v| v.checked_div(Decimal::TWO))
        .and_then(|v| v.checked_mul(WAD))
        .map(Some)
        .ok_or_else(|| {
            eyre!(
                "LP multiplier overflow (supply {}, reserve {})",
                pool_total_supply,
                tracked_reserve
            )
        })
}

/// Pick the reserve slot whose token is the tracked token.
///
/// Addresses compare byte-wise, so checksum casing never matters.
pub fn select_tracked_reserve(slots: [(Address, U256); 2], tracked: Address) -> Option<U256> {
    slots
        .into_iter()
        .find(|(token, _)| *token == tracked)
        .map(|(_, reserve)| reserve)
}
