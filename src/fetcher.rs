//! Pool / User Info Fetchers
//!
//! Fires all independent reads for a snapshot at once and fails the whole
//! batch if any read fails. Results go through the metrics calculator.

use alloy_primitives::{Address, U256};
use eyre::{Result, WrapErr};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::chain::contracts::{ILiquidityMining, IPermitToken, IUniswapV2Pair};
use crate::chain::{read_contract, ChainTransport};
use crate::config::NetworkConfig;
use crate::metrics::{
    compute_apr, lp_multiplier, select_tracked_reserve, wei_to_decimal, TOKEN_DECIMALS,
};

// ============================================
// TYPES
// ============================================

/// Reward accounting, symbols resolved per network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Earned {
    pub amount: Decimal,
    pub token: String,
    pub display_token: String,
}

impl Earned {
    fn zero(network: &NetworkConfig) -> Self {
        Self::new(Decimal::ZERO, network)
    }

    fn new(amount: Decimal, network: &NetworkConfig) -> Self {
        Self {
            amount,
            token: network.token_symbol.clone(),
            display_token: network.display_symbol.clone(),
        }
    }
}

/// Reserve pair and LP supply of the pool backing an LP stake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityPoolSnapshot {
    pub reserves: (Decimal, Decimal),
    pub total_supply: Decimal,
}

/// Aggregate snapshot of a staking pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolInfo {
    pub tokens_in_pool: Decimal,
    /// `None` while nothing is staked
    pub apr: Option<Decimal>,
    pub earned: Earned,
    /// Present only for LP-backed pools
    pub liquidity_pool: Option<LiquidityPoolSnapshot>,
}

impl PoolInfo {
    pub fn reserves(&self) -> Option<(Decimal, Decimal)> {
        self.liquidity_pool.as_ref().map(|lp| lp.reserves)
    }

    pub fn pool_total_supply(&self) -> Option<Decimal> {
        self.liquidity_pool.as_ref().map(|lp| lp.total_supply)
    }
}

/// Per-address view of a staking pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub staked_lp_tokens: Decimal,
    pub earned: Earned,
    /// Raw integer, kept exact for allowance comparisons
    pub not_staked_lp_tokens_wei: U256,
    /// Raw integer, kept exact for allowance comparisons
    pub allowance_lp_tokens: U256,
}

impl UserInfo {
    pub fn zero(network: &NetworkConfig) -> Self {
        Self {
            staked_lp_tokens: Decimal::ZERO,
            earned: Earned::zero(network),
            not_staked_lp_tokens_wei: U256::ZERO,
            allowance_lp_tokens: U256::ZERO,
        }
    }
}

// ============================================
// ADDRESS VALIDATION
// ============================================

/// Parse a user-supplied address.
///
/// Accepts `0x` + 40 hex digits. Mixed-case input must carry a valid
/// EIP-55 checksum; all-lower / all-upper input is taken as is.
pub fn parse_address(input: &str) -> Option<Address> {
    let hex = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X"))?;
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());

    if has_lower && has_upper {
        Address::parse_checksummed(format!("0x{}", hex), None).ok()
    } else {
        hex.parse().ok()
    }
}

// ============================================
// FETCHERS
// ============================================

/// Snapshot of a staking pool.
///
/// `has_liquidity_pool` selects the LP-backed batch (reserves + LP supply)
/// over the plain one.
pub async fn fetch_stake_pool_info<T: ChainTransport>(
    transport: &T,
    pool: Address,
    lm: Address,
    network: &NetworkConfig,
    has_liquidity_pool: bool,
) -> Result<PoolInfo> {
    let earned = Earned::zero(network);

    if !has_liquidity_pool {
        let (rate, staked) = futures::try_join!(
            read_contract(transport, lm, ILiquidityMining::rewardRateCall {}),
            read_contract(transport, lm, ILiquidityMining::totalSupplyCall {}),
        )
        .wrap_err_with(|| format!("Failed to read pool state for {:?}", lm))?;

        let tokens_in_pool = wei_to_decimal(staked, TOKEN_DECIMALS)?;
        let apr = compute_apr(wei_to_decimal(rate, TOKEN_DECIMALS)?, tokens_in_pool, None)?;

        debug!("Pool {:?}: {} staked, APR {:?}", lm, tokens_in_pool, apr);

        return Ok(PoolInfo { tokens_in_pool, apr, earned, liquidity_pool: None });
    }

    let (rate, staked, reserves, lp_supply, token0, token1) = futures::try_join!(
        read_contract(transport, lm, ILiquidityMining::rewardRateCall {}),
        read_contract(transport, lm, ILiquidityMining::totalSupplyCall {}),
        read_contract(transport, pool, IUniswapV2Pair::getReservesCall {}),
        read_contract(transport, pool, IUniswapV2Pair::totalSupplyCall {}),
        read_contract(transport, pool, IUniswapV2Pair::token0Call {}),
        read_contract(transport, pool, IUniswapV2Pair::token1Call {}),
    )
    .wrap_err_with(|| format!("Failed to read LP pool state for {:?}", lm))?;

    let reserve0 = U256::from(reserves.reserve0.to::<u128>());
    let reserve1 = U256::from(reserves.reserve1.to::<u128>());

    let tokens_in_pool = wei_to_decimal(staked, TOKEN_DECIMALS)?;
    let total_supply = wei_to_decimal(lp_supply, TOKEN_DECIMALS)?;
    let snapshot = LiquidityPoolSnapshot {
        reserves: (
            wei_to_decimal(reserve0, TOKEN_DECIMALS)?,
            wei_to_decimal(reserve1, TOKEN_DECIMALS)?,
        ),
        total_supply,
    };

    let slots = [(token0, reserve0), (token1, reserve1)];
    let multiplier = match select_tracked_reserve(slots, network.reward_token) {
        Some(reserve) => lp_multiplier(total_supply, wei_to_decimal(reserve, TOKEN_DECIMALS)?)?,
        None => {
            warn!(
                "Pool {:?} does not hold tracked token {:?} (token0 {:?}, token1 {:?})",
                pool, network.reward_token, token0, token1
            );
            None
        }
    };

    let apr = match multiplier {
        Some(m) => compute_apr(wei_to_decimal(rate, TOKEN_DECIMALS)?, tokens_in_pool, Some(m))?,
        None => None,
    };

    debug!("LP pool {:?}: {} staked, APR {:?}", lm, tokens_in_pool, apr);

    Ok(PoolInfo { tokens_in_pool, apr, earned, liquidity_pool: Some(snapshot) })
}

/// Per-address view. A malformed address yields a zeroed result without
/// touching the network.
pub async fn fetch_user_info<T: ChainTransport>(
    transport: &T,
    address: &str,
    pool: Address,
    lm: Address,
    network: &NetworkConfig,
) -> Result<UserInfo> {
    let Some(user) = parse_address(address) else {
        debug!("Invalid address {:?}, returning empty user info", address);
        return Ok(UserInfo::zero(network));
    };

    let (staked, earned, not_staked, allowance) = futures::try_join!(
        read_contract(transport, lm, ILiquidityMining::balanceOfCall { account: user }),
        read_contract(transport, lm, ILiquidityMining::earnedCall { account: user }),
        read_contract(transport, pool, IPermitToken::balanceOfCall { account: user }),
        read_contract(transport, pool, IPermitToken::allowanceCall { owner: user, spender: lm }),
    )
    .wrap_err_with(|| format!("Failed to read user state for {:?}", user))?;

    Ok(UserInfo {
        staked_lp_tokens: wei_to_decimal(staked, TOKEN_DECIMALS)?,
        earned: Earned::new(wei_to_decimal(earned, TOKEN_DECIMALS)?, network),
        not_staked_lp_tokens_wei: not_staked,
        allowance_lp_tokens: allowance,
    })
}
