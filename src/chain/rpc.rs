//! Alloy-backed transport and signer
//!
//! ⚠️  SECURITY WARNING:
//! - Never log or expose private keys
//! - Load keys from the environment, not from config files

use alloy_network::{EthereumWallet, ReceiptResponse};
use alloy_primitives::{Address, Bytes, Signature, TxHash};
use alloy_provider::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{Eip712Domain, SolStruct};
use eyre::{eyre, Result, WrapErr};
use std::str::FromStr;
use tracing::{debug, info};

use super::{ChainTransport, StakeSigner};

// ============================================
// READ-ONLY TRANSPORT
// ============================================

/// HTTP JSON-RPC connection to one network
#[derive(Clone)]
pub struct RpcTransport {
    provider: DynProvider,
    chain_id: u64,
}

impl RpcTransport {
    /// Connect and resolve the chain id once
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        let provider = ProviderBuilder::new()
            .connect_http(rpc_url.parse().wrap_err("Invalid RPC URL")?)
            .erased();

        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| eyre!("Failed to fetch chain id: {}", e))?;

        debug!("Connected to chain {}", chain_id);

        Ok(Self { provider, chain_id })
    }
}

impl ChainTransport for RpcTransport {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default().to(to).input(input.into());

        self.provider
            .call(tx)
            .await
            .map_err(|e| eyre!("eth_call to {:?} failed: {}", to, e))
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<bool> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), hash)
            .get_receipt()
            .await
            .map_err(|e| eyre!("Failed to get receipt for {:?}: {}", hash, e))?;

        Ok(receipt.status())
    }
}

// ============================================
// WALLET SIGNER
// ============================================

/// Local private key account with a wallet-filled provider for submission
pub struct WalletSigner {
    signer: PrivateKeySigner,
    provider: DynProvider,
}

impl WalletSigner {
    pub fn new(signer: PrivateKeySigner, rpc_url: &str) -> Result<Self> {
        let wallet = EthereumWallet::from(signer.clone());
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(rpc_url.parse().wrap_err("Invalid RPC URL")?)
            .erased();

        Ok(Self { signer, provider })
    }

    /// Load the key from `STAKER_PRIVATE_KEY`
    pub fn from_env(rpc_url: &str) -> Result<Self> {
        let key = std::env::var("STAKER_PRIVATE_KEY")
            .map_err(|_| eyre!("STAKER_PRIVATE_KEY not set"))?;

        let signer = PrivateKeySigner::from_str(key.trim_start_matches("0x"))
            .map_err(|e| eyre!("Failed to parse STAKER_PRIVATE_KEY: {}", e))?;

        info!("✓ Staking wallet loaded: {:?}", signer.address());

        Self::new(signer, rpc_url)
    }
}

impl StakeSigner for WalletSigner {
    fn address(&self) -> Address {
        self.signer.address()
    }

    async fn sign_typed_data<T: SolStruct + Send + Sync>(
        &self,
        payload: &T,
        domain: &Eip712Domain,
    ) -> Result<Signature> {
        let hash = payload.eip712_signing_hash(domain);

        self.signer
            .sign_hash(&hash)
            .await
            .map_err(|e| eyre!("Failed to sign {}: {}", T::NAME, e))
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        let tx = tx.from(self.signer.address());

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| eyre!("Failed to submit transaction: {}", e))?;

        Ok(*pending.tx_hash())
    }
}
