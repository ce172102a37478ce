//! In-memory collaborators for unit tests

use alloy_primitives::{address, keccak256, Address, Bytes, Signature, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{Eip712Domain, SolStruct, SolValue};
use eyre::{eyre, Result};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;

use crate::chain::{ChainTransport, StakeSigner};
use crate::orchestrator::{Notification, NotificationSink};

pub const POOL: Address = address!("A478c2975Ab1Ea89e8196811F51A7B7Ade33eB11");
pub const LM: Address = address!("00000000000000000000000000000000000c0ffe");
pub const TRACKED: Address = address!("6B175474E89094C44Da98b954EedcdeCB5BE3830");
pub const OTHER: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

// Anvil's first dev account (DO NOT USE IN PRODUCTION)
const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub fn wad(tokens: u64) -> U256 {
    U256::from(tokens) * U256::from(10u64).pow(U256::from(18))
}

// ============================================
// CHAIN
// ============================================

/// Canned responses keyed by (contract, selector)
pub struct MockChain {
    chain_id: u64,
    responses: HashMap<(Address, [u8; 4]), Bytes>,
    calls: Mutex<Vec<(Address, Bytes)>>,
    receipt_status: bool,
    receipt_error: bool,
    receipts_awaited: Mutex<Vec<TxHash>>,
}

impl MockChain {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            responses: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            receipt_status: true,
            receipt_error: false,
            receipts_awaited: Mutex::new(Vec::new()),
        }
    }

    pub fn respond<V: SolValue>(self, to: Address, selector: [u8; 4], value: V) -> Self {
        self.respond_raw(to, selector, value.abi_encode())
    }

    pub fn respond_raw(mut self, to: Address, selector: [u8; 4], data: Vec<u8>) -> Self {
        self.responses.insert((to, selector), data.into());
        self
    }

    pub fn with_receipt_status(mut self, status: bool) -> Self {
        self.receipt_status = status;
        self
    }

    /// Receipt polling fails with a transport error after the hash is known
    pub fn with_receipt_error(mut self) -> Self {
        self.receipt_error = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn receipts_awaited(&self) -> Vec<TxHash> {
        self.receipts_awaited.lock().unwrap().clone()
    }
}

impl ChainTransport for MockChain {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes> {
        self.calls.lock().unwrap().push((to, input.clone()));

        let selector: [u8; 4] = input
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| eyre!("calldata too short"))?;

        self.responses
            .get(&(to, selector))
            .cloned()
            .ok_or_else(|| eyre!("execution reverted: no response for {:?} {:02x?}", to, selector))
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<bool> {
        self.receipts_awaited.lock().unwrap().push(hash);
        if self.receipt_error {
            return Err(eyre!("error sending request: connection reset"));
        }
        Ok(self.receipt_status)
    }
}

// ============================================
// SIGNER
// ============================================

/// Real key for signing, records submissions instead of broadcasting
pub struct MockSigner {
    key: PrivateKeySigner,
    reject: bool,
    submit_error: bool,
    signatures: Mutex<usize>,
    sent: Mutex<Vec<TransactionRequest>>,
}

impl MockSigner {
    pub fn new() -> Self {
        Self {
            key: PrivateKeySigner::from_str(TEST_KEY).unwrap(),
            reject: false,
            submit_error: false,
            signatures: Mutex::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Simulates the user declining the wallet prompt
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::new()
        }
    }

    /// Signs normally, every submission fails at the RPC
    pub fn failing_submit() -> Self {
        Self {
            submit_error: true,
            ..Self::new()
        }
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn signatures_requested(&self) -> usize {
        *self.signatures.lock().unwrap()
    }
}

impl StakeSigner for MockSigner {
    fn address(&self) -> Address {
        self.key.address()
    }

    async fn sign_typed_data<T: SolStruct + Send + Sync>(
        &self,
        payload: &T,
        domain: &Eip712Domain,
    ) -> Result<Signature> {
        *self.signatures.lock().unwrap() += 1;
        if self.reject {
            return Err(eyre!("User denied message signature"));
        }
        Ok(self.key.sign_hash(&payload.eip712_signing_hash(domain)).await?)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        if self.submit_error {
            return Err(eyre!("error sending request: connection refused"));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(tx);
        Ok(keccak256(sent.len().to_be_bytes()))
    }
}

// ============================================
// NOTIFICATIONS
// ============================================

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.events.lock().unwrap().push(notification);
    }
}
