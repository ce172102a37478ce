//! Chain Collaborators
//!
//! The staking core only talks to the network through these traits:
//! - `ChainTransport`: read-only calls and receipt tracking on one network
//! - `StakeSigner`: the connected account (typed-data signing + submission)
//!
//! `RpcTransport` / `WalletSigner` are the alloy-backed implementations.

pub mod contracts;
mod rpc;

pub use rpc::{RpcTransport, WalletSigner};

use alloy_primitives::{Address, Bytes, Signature, TxHash};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{Eip712Domain, SolCall, SolStruct};
use eyre::{eyre, Result};

/// Per-network connection
#[allow(async_fn_in_trait)]
pub trait ChainTransport {
    /// Network this connection is bound to
    fn chain_id(&self) -> u64;

    /// Read-only contract call, returns the raw ABI-encoded result
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes>;

    /// Block until the transaction is mined. Returns the receipt status flag.
    async fn wait_for_receipt(&self, hash: TxHash) -> Result<bool>;
}

/// The connected account
#[allow(async_fn_in_trait)]
pub trait StakeSigner {
    fn address(&self) -> Address;

    /// EIP-712 signature over `payload` in `domain`.
    /// May be user-interactive; a rejection comes back as an error.
    async fn sign_typed_data<T: SolStruct + Send + Sync>(
        &self,
        payload: &T,
        domain: &Eip712Domain,
    ) -> Result<Signature>;

    /// Sign and broadcast. Returns as soon as the node accepted the transaction.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash>;
}

/// Typed read of a single contract function
pub async fn read_contract<T, C>(transport: &T, to: Address, call: C) -> Result<C::Return>
where
    T: ChainTransport,
    C: SolCall,
{
    let raw = transport.call(to, call.abi_encode().into()).await?;

    C::abi_decode_returns(&raw)
        .map_err(|e| eyre!("Failed to decode {} from {:?}: {}", C::SIGNATURE, to, e))
}
