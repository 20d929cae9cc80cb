//! Meta-withdrawal signing digests.
//!
//! Funds at a stealth address can be withdrawn through a sponsor who pays
//! gas. The stealth key signs a digest over the withdrawal parameters; the
//! external payment contract recovers the signer and checks it against the
//! stealth address. The digest layout is fixed by that contract:
//!
//! ```text
//! inner  = keccak256(abi.encode(chainId, contract, acceptor, token,
//!                               sponsor, fee, hook, data))
//! digest = keccak256("\x19Ethereum Signed Message:\n32" || inner)
//! ```

use cloak_core::abi::{self, AbiValue, Word};
use cloak_core::types::EthAddress;
use cloak_crypto::{keccak256, personal_message_digest};

/// Parameters of a sponsored withdrawal.
#[derive(Clone, Debug)]
pub struct WithdrawalRequest {
    /// Chain the withdrawal executes on.
    pub chain_id: u64,
    /// The payment contract address.
    pub contract: EthAddress,
    /// Destination the funds are released to.
    pub acceptor: EthAddress,
    /// Token being withdrawn.
    pub token: EthAddress,
    /// Relayer submitting the transaction.
    pub sponsor: EthAddress,
    /// Fee paid to the sponsor, as a big-endian uint256 word.
    pub sponsor_fee: Word,
    /// Optional post-withdrawal hook contract (zero address for none).
    pub hook: EthAddress,
    /// Opaque hook calldata.
    pub data: Vec<u8>,
}

/// Computes the digest the stealth private key signs to authorize a
/// sponsored withdrawal.
pub fn withdrawal_digest(request: &WithdrawalRequest) -> [u8; 32] {
    let inner = keccak256(&abi::encode(&[
        AbiValue::Uint(abi::word_from_u64(request.chain_id)),
        AbiValue::Address(request.contract),
        AbiValue::Address(request.acceptor),
        AbiValue::Address(request.token),
        AbiValue::Address(request.sponsor),
        AbiValue::Uint(request.sponsor_fee),
        AbiValue::Address(request.hook),
        AbiValue::Bytes(&request.data),
    ]));
    personal_message_digest(&inner)
}
