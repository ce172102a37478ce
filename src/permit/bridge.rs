//! Bridge-style permit (every non-primary network)
//!
//! holder / spender / nonce / expiry / allowed. Grants a full allowance
//! instead of an amount and expires one hour after signing.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};

use super::SignatureParts;
use crate::chain::contracts::IBridgePermitToken;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct Permit {
        address holder;
        address spender;
        uint256 nonce;
        uint256 expiry;
        bool allowed;
    }
}

/// Validity window in seconds
pub const EXPIRY_WINDOW_SECS: u64 = 3600;

pub fn message(holder: Address, spender: Address, nonce: U256, now_secs: u64) -> Permit {
    Permit {
        holder,
        spender,
        nonce,
        expiry: U256::from(now_secs + EXPIRY_WINDOW_SECS),
        allowed: true,
    }
}

pub fn encode_call(permit: &Permit, sig: &SignatureParts) -> Bytes {
    IBridgePermitToken::permitCall {
        holder: permit.holder,
        spender: permit.spender,
        nonce: permit.nonce,
        expiry: permit.expiry,
        allowed: permit.allowed,
        v: sig.v,
        r: sig.r,
        s: sig.s,
    }
    .abi_encode()
    .into()
}
