//! Gasless Permit Builder
//!
//! Builds an off-chain signed allowance so the liquidity-mining contract can
//! pull pool tokens without a separate approve transaction.
//!
//! Two protocol flavours, picked once per call by chain id:
//! - `Standard` (EIP-2612) on the primary network
//! - `Bridge` (holder/allowed) everywhere else
//!
//! Procedure: read name + nonce → EIP-712 domain → sign → split v/r/s →
//! pre-encode the `permit(...)` call. Nothing is sent from here.

pub mod bridge;
pub mod standard;

use alloy_primitives::{Address, Bytes, Signature, B256, U256};
use alloy_sol_types::{Eip712Domain, SolStruct};
use eyre::{Result, WrapErr};
use tracing::debug;

use crate::chain::contracts::IPermitToken;
use crate::chain::{read_contract, ChainTransport, StakeSigner};

/// Domain version every pool token uses
pub const DOMAIN_VERSION: &str = "1";

// ============================================
// TYPES
// ============================================

/// Which permit protocol a network speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermitKind {
    Standard,
    Bridge,
}

impl PermitKind {
    pub fn for_chain(chain_id: u64, primary_chain_id: u64) -> Self {
        if chain_id == primary_chain_id {
            PermitKind::Standard
        } else {
            PermitKind::Bridge
        }
    }
}

impl std::fmt::Display for PermitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermitKind::Standard => write!(f, "EIP-2612"),
            PermitKind::Bridge => write!(f, "Bridge"),
        }
    }
}

/// The signed message, one variant per protocol
#[derive(Debug)]
pub enum PermitMessage {
    Standard(standard::Permit),
    Bridge(bridge::Permit),
}

impl PermitMessage {
    pub fn kind(&self) -> PermitKind {
        match self {
            PermitMessage::Standard(_) => PermitKind::Standard,
            PermitMessage::Bridge(_) => PermitKind::Bridge,
        }
    }

    pub fn signing_hash(&self, domain: &Eip712Domain) -> B256 {
        match self {
            PermitMessage::Standard(p) => p.eip712_signing_hash(domain),
            PermitMessage::Bridge(p) => p.eip712_signing_hash(domain),
        }
    }
}

/// v / r / s as the permit functions take them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureParts {
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

impl From<&Signature> for SignatureParts {
    fn from(sig: &Signature) -> Self {
        Self {
            v: 27 + sig.v() as u8,
            r: B256::from(sig.r().to_be_bytes::<32>()),
            s: B256::from(sig.s().to_be_bytes::<32>()),
        }
    }
}

/// A signed permit, consumed by exactly one stake call
#[derive(Debug)]
pub struct PermitPayload {
    pub domain: Eip712Domain,
    pub message: PermitMessage,
    pub signature: Signature,
    pub parts: SignatureParts,
    /// Encoded `permit(...)` call, not sent
    pub calldata: Bytes,
}

impl PermitPayload {
    pub fn kind(&self) -> PermitKind {
        self.message.kind()
    }
}

// ============================================
// BUILDER
// ============================================

/// Build and sign a permit letting `spender` pull `amount` of `pool_token`.
///
/// `amount` only applies to the standard flavour; the bridge flavour grants
/// a full allowance. Any failed read or a rejected signature aborts with no
/// partial payload.
pub async fn build_permit<T, S>(
    transport: &T,
    signer: &S,
    kind: PermitKind,
    pool_token: Address,
    spender: Address,
    amount: U256,
) -> Result<PermitPayload>
where
    T: ChainTransport,
    S: StakeSigner,
{
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    build_permit_at(transport, signer, kind, pool_token, spender, amount, now).await
}

#[allow(clippy::too_many_arguments)]
pub(crate) async fn build_permit_at<T, S>(
    transport: &T,
    signer: &S,
    kind: PermitKind,
    pool_token: Address,
    spender: Address,
    amount: U256,
    now_secs: u64,
) -> Result<PermitPayload>
where
    T: ChainTransport,
    S: StakeSigner,
{
    let owner = signer.address();

    let (name, nonce) = futures::try_join!(
        read_contract(transport, pool_token, IPermitToken::nameCall {}),
        read_contract(transport, pool_token, IPermitToken::noncesCall { owner }),
    )
    .wrap_err("Failed to read permit state")?;

    let domain = Eip712Domain::new(
        Some(name.into()),
        Some(DOMAIN_VERSION.into()),
        Some(U256::from(transport.chain_id())),
        Some(pool_token),
        None,
    );

    debug!(
        "Signing {} permit: token={:?}, spender={:?}, nonce={}",
        kind, pool_token, spender, nonce
    );

    let payload = match kind {
        PermitKind::Standard => {
            let permit = standard::message(owner, spender, amount, nonce);
            let signature = signer
                .sign_typed_data(&permit, &domain)
                .await
                .wrap_err("Permit signature was not granted")?;
            let parts = SignatureParts::from(&signature);
            let calldata = standard::encode_call(&permit, &parts);

            PermitPayload {
                domain,
                message: PermitMessage::Standard(permit),
                signature,
                parts,
                calldata,
            }
        }
        PermitKind::Bridge => {
            let permit = bridge::message(owner, spender, nonce, now_secs);
            let signature = signer
                .sign_typed_data(&permit, &domain)
                .await
                .wrap_err("Permit signature was not granted")?;
            let parts = SignatureParts::from(&signature);
            let calldata = bridge::encode_call(&permit, &parts);

            PermitPayload {
                domain,
                message: PermitMessage::Bridge(permit),
                signature,
                parts,
                calldata,
            }
        }
    };

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::contracts::{IBridgePermitToken, IPermitToken};
    use crate::testing::{MockChain, MockSigner, LM, POOL};
    use alloy_sol_types::SolCall;

    fn chain_with_token(chain_id: u64) -> MockChain {
        MockChain::new(chain_id)
            .respond(POOL, IPermitToken::nameCall::SELECTOR, "Uniswap V2".to_string())
            .respond(POOL, IPermitToken::noncesCall::SELECTOR, U256::from(4u64))
    }

    #[test]
    fn test_kind_selection() {
        assert_eq!(PermitKind::for_chain(1, 1), PermitKind::Standard);
        assert_eq!(PermitKind::for_chain(137, 1), PermitKind::Bridge);
        assert_eq!(PermitKind::for_chain(1, 137), PermitKind::Bridge);
    }

    #[test]
    fn test_signature_parts_v_offset() {
        let sig = Signature::new(U256::from(1u64), U256::from(2u64), true);
        let parts = SignatureParts::from(&sig);
        assert_eq!(parts.v, 28);
        assert_eq!(parts.r, B256::from(U256::from(1u64).to_be_bytes::<32>()));

        let sig = Signature::new(U256::from(1u64), U256::from(2u64), false);
        assert_eq!(SignatureParts::from(&sig).v, 27);
    }

    #[tokio::test]
    async fn test_standard_permit() {
        let chain = chain_with_token(1);
        let signer = MockSigner::new();
        let amount = U256::from(1_000u64);

        let payload =
            build_permit_at(&chain, &signer, PermitKind::Standard, POOL, LM, amount, 1_000)
                .await
                .unwrap();

        assert_eq!(payload.kind(), PermitKind::Standard);
        assert_eq!(payload.domain.name.as_deref(), Some("Uniswap V2"));
        assert_eq!(payload.domain.version.as_deref(), Some("1"));
        assert_eq!(payload.domain.chain_id, Some(U256::from(1u64)));
        assert_eq!(payload.domain.verifying_contract, Some(POOL));

        let PermitMessage::Standard(permit) = &payload.message else {
            panic!("expected standard permit");
        };
        assert_eq!(permit.owner, signer.address());
        assert_eq!(permit.spender, LM);
        assert_eq!(permit.value, amount);
        assert_eq!(permit.nonce, U256::from(4u64));
        assert_eq!(permit.deadline, U256::MAX);

        let recovered = payload
            .signature
            .recover_address_from_prehash(&payload.message.signing_hash(&payload.domain))
            .unwrap();
        assert_eq!(recovered, signer.address());

        let call = IPermitToken::permitCall::abi_decode(&payload.calldata).unwrap();
        assert_eq!(call.value, amount);
        assert_eq!(call.v, payload.parts.v);
        assert_eq!(call.r, payload.parts.r);

        // only the two reads, nothing submitted
        assert_eq!(chain.call_count(), 2);
        assert!(signer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_bridge_permit() {
        let chain = chain_with_token(137);
        let signer = MockSigner::new();

        let amount = U256::from(5u64);
        let payload =
            build_permit_at(&chain, &signer, PermitKind::Bridge, POOL, LM, amount, 1_700_000_000)
                .await
                .unwrap();

        assert_eq!(payload.kind(), PermitKind::Bridge);
        assert_eq!(payload.domain.chain_id, Some(U256::from(137u64)));

        let PermitMessage::Bridge(permit) = &payload.message else {
            panic!("expected bridge permit");
        };
        assert_eq!(permit.holder, signer.address());
        assert_eq!(permit.nonce, U256::from(4u64));
        assert_eq!(permit.expiry, U256::from(1_700_003_600u64));
        assert!(permit.allowed);

        let recovered = payload
            .signature
            .recover_address_from_prehash(&payload.message.signing_hash(&payload.domain))
            .unwrap();
        assert_eq!(recovered, signer.address());

        let call = IBridgePermitToken::permitCall::abi_decode(&payload.calldata).unwrap();
        assert!(call.allowed);
        assert_eq!(call.spender, LM);
    }

    #[tokio::test]
    async fn test_build_permit_uses_current_time() {
        let chain = chain_with_token(137);
        let signer = MockSigner::new();
        let before = chrono::Utc::now().timestamp() as u64;

        let payload = build_permit(&chain, &signer, PermitKind::Bridge, POOL, LM, U256::ZERO)
            .await
            .unwrap();

        let PermitMessage::Bridge(permit) = &payload.message else {
            panic!("expected bridge permit");
        };
        let expiry = permit.expiry.to::<u64>();
        assert!(expiry >= before + bridge::EXPIRY_WINDOW_SECS);
        assert!(expiry <= before + bridge::EXPIRY_WINDOW_SECS + 60);
    }

    #[tokio::test]
    async fn test_rejected_signature_fails() {
        let chain = chain_with_token(1);
        let signer = MockSigner::rejecting();

        let amount = U256::from(1u64);
        let result =
            build_permit_at(&chain, &signer, PermitKind::Standard, POOL, LM, amount, 0).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_failed_read_fails() {
        // no nonce response registered
        let chain =
            MockChain::new(1).respond(POOL, IPermitToken::nameCall::SELECTOR, "LP".to_string());
        let signer = MockSigner::new();

        let amount = U256::from(1u64);
        let result =
            build_permit_at(&chain, &signer, PermitKind::Standard, POOL, LM, amount, 0).await;
        assert!(result.is_err());
        assert_eq!(signer.signatures_requested(), 0);
    }
}
