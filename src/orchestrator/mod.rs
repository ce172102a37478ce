//! Transaction Orchestrator
//!
//! Every operation has the same shape:
//! guard → (permit) → submit → await receipt → classify → notify
//!
//! - Zero amounts are a silent no-op (`Ok(None)`), not an error
//! - A mined-but-reverted transaction is a `Failed` outcome, not an error
//! - Transport and signing failures propagate unchanged; nothing is retried

mod notify;

pub use notify::{Notification, NotificationSink, OperationKind, TracingNotifier, TxStatus};

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chain::contracts::{ILiquidityMining, IPermitToken};
use crate::chain::{ChainTransport, StakeSigner};
use crate::metrics::format_token_amount;
use crate::permit::{build_permit, PermitKind};

/// Gas ceiling for `stakeWithPermit`
pub const STAKE_WITH_PERMIT_GAS_LIMIT: u64 = 300_000;

/// Terminal result of one submitted transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutcome {
    pub hash: TxHash,
    pub status: TxStatus,
}

/// Parse a raw base-10 integer amount
pub fn parse_amount(amount: &str) -> Result<U256> {
    U256::from_str_radix(amount.trim(), 10)
        .map_err(|e| eyre!("Invalid amount {:?}: {}", amount, e))
}

/// Staking operations for one connected account on one network
pub struct StakeExecutor<'a, C, S, N> {
    chain: &'a C,
    signer: &'a S,
    notifier: &'a N,
    primary_chain_id: u64,
}

impl<'a, C, S, N> StakeExecutor<'a, C, S, N>
where
    C: ChainTransport,
    S: StakeSigner,
    N: NotificationSink,
{
    pub fn new(chain: &'a C, signer: &'a S, notifier: &'a N, primary_chain_id: u64) -> Self {
        Self {
            chain,
            signer,
            notifier,
            primary_chain_id,
        }
    }

    /// Permit flavour for the connected network
    pub fn permit_kind(&self) -> PermitKind {
        PermitKind::for_chain(self.chain.chain_id(), self.primary_chain_id)
    }

    /// On-chain allowance increase for the liquidity-mining contract
    pub async fn approve(
        &self,
        amount: &str,
        pool: Address,
        lm: Address,
    ) -> Result<Option<TransactionOutcome>> {
        let Some(value) = non_zero(amount)? else {
            return Ok(None);
        };

        let data = IPermitToken::increaseAllowanceCall {
            spender: lm,
            addedValue: value,
        }
        .abi_encode();
        let tx = request(pool, data.into());

        self.submit(OperationKind::Approve, tx, Some(format_token_amount(value)?))
            .await
            .map(Some)
    }

    /// Gasless stake: sign a permit and submit it with the stake in one call
    pub async fn stake_tokens(
        &self,
        amount: &str,
        pool: Address,
        lm: Address,
    ) -> Result<Option<TransactionOutcome>> {
        let Some(value) = non_zero(amount)? else {
            return Ok(None);
        };

        let kind = self.permit_kind();
        let permit = build_permit(self.chain, self.signer, kind, pool, lm, value)
            .await
            .wrap_err("Failed to build permit")?;

        debug!("Built {} permit for {} on {:?}", kind, value, lm);

        let data = ILiquidityMining::stakeWithPermitCall {
            amount: value,
            permitData: permit.calldata,
        }
        .abi_encode();
        let tx = request(lm, data.into()).gas_limit(STAKE_WITH_PERMIT_GAS_LIMIT);

        self.submit(OperationKind::Stake, tx, Some(format_token_amount(value)?))
            .await
            .map(Some)
    }

    /// Plain stake, relies on a prior `approve`
    pub async fn stake_tokens_without_permit(
        &self,
        amount: &str,
        _pool: Address,
        lm: Address,
    ) -> Result<Option<TransactionOutcome>> {
        let Some(value) = non_zero(amount)? else {
            return Ok(None);
        };

        let data = ILiquidityMining::stakeCall { amount: value }.abi_encode();
        let tx = request(lm, data.into());

        self.submit(OperationKind::Stake, tx, Some(format_token_amount(value)?))
            .await
            .map(Some)
    }

    /// Claim accrued rewards
    pub async fn harvest_tokens(&self, lm: Address) -> Result<TransactionOutcome> {
        let data = ILiquidityMining::getRewardCall {}.abi_encode();
        self.submit(OperationKind::Harvest, request(lm, data.into()), None).await
    }

    /// Withdraw staked principal
    pub async fn withdraw_tokens(&self, amount: &str, lm: Address) -> Result<TransactionOutcome> {
        let value = parse_amount(amount)?;

        let data = ILiquidityMining::withdrawCall { amount: value }.abi_encode();
        let amount = Some(format_token_amount(value)?);
        self.submit(OperationKind::Withdraw, request(lm, data.into()), amount)
            .await
    }

    /// Submit, report pending, wait for the receipt and report the terminal state once
    async fn submit(
        &self,
        kind: OperationKind,
        tx: TransactionRequest,
        amount: Option<String>,
    ) -> Result<TransactionOutcome> {
        let chain_id = self.chain.chain_id();

        let hash = self
            .signer
            .send_transaction(tx)
            .await
            .wrap_err_with(|| format!("Failed to submit {} transaction", kind))?;

        info!("📤 {} submitted on chain {}: {:?}", kind, chain_id, hash);
        self.notify(kind, TxStatus::Pending, hash, amount.clone());

        let success = self
            .chain
            .wait_for_receipt(hash)
            .await
            .wrap_err_with(|| format!("Failed to fetch receipt for {:?}", hash))?;
        let status = TxStatus::from_receipt(success);

        info!("{} {:?} → {}", kind, hash, status);
        self.notify(kind, status, hash, amount);

        Ok(TransactionOutcome { hash, status })
    }

    fn notify(
        &self,
        kind: OperationKind,
        stage: TxStatus,
        tx_hash: TxHash,
        amount: Option<String>,
    ) {
        self.notifier.notify(Notification {
            kind,
            stage,
            chain_id: self.chain.chain_id(),
            tx_hash,
            amount,
        });
    }
}

fn non_zero(amount: &str) -> Result<Option<U256>> {
    let value = parse_amount(amount)?;
    if value.is_zero() {
        debug!("Skipping zero amount");
        return Ok(None);
    }
    Ok(Some(value))
}

fn request(to: Address, data: Bytes) -> TransactionRequest {
    TransactionRequest::default().to(to).input(data.into())
}
