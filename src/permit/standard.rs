//! EIP-2612 permit (primary network)
//!
//! owner / spender / value / nonce / deadline, with an unbounded deadline.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};

use super::SignatureParts;
use crate::chain::contracts::IPermitToken;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct Permit {
        address owner;
        address spender;
        uint256 value;
        uint256 nonce;
        uint256 deadline;
    }
}

/// Never expires
pub const DEADLINE: U256 = U256::MAX;

pub fn message(owner: Address, spender: Address, value: U256, nonce: U256) -> Permit {
    Permit { owner, spender, value, nonce, deadline: DEADLINE }
}

/// `permit(...)` calldata applying the signed message
pub fn encode_call(permit: &Permit, sig: &SignatureParts) -> Bytes {
    IPermitToken::permitCall {
        owner: permit.owner,
        spender: permit.spender,
        value: permit.value,
        deadline: permit.deadline,
        v: sig.v,
        r: sig.r,
        s: sig.s,
    }
    .abi_encode()
    .into()
}
