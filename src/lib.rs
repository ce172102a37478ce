//! Permit Staker - gasless liquidity-mining orchestration
//!
//! - `permit`: EIP-712 permit construction (standard / bridge-style)
//! - `orchestrator`: approve, stake, harvest, withdraw with lifecycle notifications
//! - `fetcher`: pool and user snapshots from batched concurrent reads
//! - `metrics`: APR and LP value math on fixed-point decimals
//!
//! Network access goes through the `chain` traits, so everything above runs
//! against any transport/signer the host provides.

pub mod chain;
pub mod config;
pub mod fetcher;
pub mod metrics;
pub mod orchestrator;
pub mod permit;

#[cfg(test)]
mod testing;

pub use chain::{ChainTransport, RpcTransport, StakeSigner, WalletSigner};
pub use config::{Config, NetworkConfig, StakePoolConfig};
pub use fetcher::{
    fetch_stake_pool_info, fetch_user_info, Earned, LiquidityPoolSnapshot, PoolInfo, UserInfo,
};
pub use metrics::compute_apr;
pub use orchestrator::{
    Notification, NotificationSink, OperationKind, StakeExecutor, TracingNotifier,
    TransactionOutcome, TxStatus,
};
pub use permit::{build_permit, PermitKind, PermitPayload};
