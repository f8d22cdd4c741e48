//! State-changing child-ledger calls that only the oracle may issue.
//!
//! The oracle signs each command's digest with its root-ledger key. The child ledger recovers the
//! signer and compares it against the oracle address it was configured with.

use alloy_primitives::{Address, B256};
use alloy_signer::SignerSync;
use serde::{Deserialize, Serialize};

use crate::{
    deposit::DepositRequest,
    errors::EncodingError,
    packed::{solidity_keccak256, PackedValue},
    signature::TxSignature,
    types::BlockHeight,
};

const DEPOSIT_TAG: &[u8] = b"plasmacash.deposit";
const SEAL_TAG: &[u8] = b"plasmacash.seal";

/// Asks the child ledger to seal its pending set into the block after `current`.
///
/// Binding the request to the height the oracle observed makes a replayed request stale once a
/// block has been sealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealBlock {
    /// Latest height known to the oracle when it asked.
    pub current: BlockHeight,
}

/// A command with a domain-separated digest for the oracle to sign.
pub trait OracleMessage {
    /// `keccak256` of the tightly packed, tagged command fields.
    fn signing_hash(&self) -> Result<B256, EncodingError>;
}

impl OracleMessage for DepositRequest {
    fn signing_hash(&self) -> Result<B256, EncodingError> {
        solidity_keccak256(&[
            PackedValue::Bytes(DEPOSIT_TAG.to_vec()),
            PackedValue::uint64(self.slot),
            PackedValue::uint64(self.deposit_block),
            PackedValue::uint256(self.denomination),
            PackedValue::address(self.from),
        ])
    }
}

impl OracleMessage for SealBlock {
    fn signing_hash(&self) -> Result<B256, EncodingError> {
        solidity_keccak256(&[
            PackedValue::Bytes(SEAL_TAG.to_vec()),
            PackedValue::uint64(self.current),
        ])
    }
}

/// A command together with the signature over its [`OracleMessage::signing_hash`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleSigned<T> {
    /// The command.
    pub message: T,

    /// Signature of the issuer.
    pub signature: TxSignature,
}

impl<T: OracleMessage> OracleSigned<T> {
    /// Signs `message` with `signer`.
    pub fn sign<S>(message: T, signer: &S) -> Result<Self, EncodingError>
    where
        S: SignerSync + ?Sized,
    {
        let signature = TxSignature::sign_hash(signer, &message.signing_hash()?)?;
        Ok(Self { message, signature })
    }

    /// Recovers the address that issued the command.
    pub fn signer(&self) -> Result<Address, EncodingError> {
        self.signature.recover(&self.message.signing_hash()?)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;
    use alloy_signer_local::PrivateKeySigner;

    use super::*;

    fn request() -> DepositRequest {
        DepositRequest {
            slot: 42,
            deposit_block: 3,
            denomination: U256::from(10).pow(U256::from(18)),
            from: Address::repeat_byte(7),
        }
    }

    #[test]
    fn recovers_the_issuer() {
        let oracle = PrivateKeySigner::random();
        let signed = OracleSigned::sign(request(), &oracle).expect("must sign");

        assert_eq!(signed.signer(), Ok(oracle.address()));
    }

    #[test]
    fn altered_commands_recover_to_someone_else() {
        let oracle = PrivateKeySigner::random();
        let mut signed = OracleSigned::sign(request(), &oracle).expect("must sign");
        signed.message.from = Address::repeat_byte(8);

        assert_ne!(signed.signer(), Ok(oracle.address()));
    }

    #[test]
    fn commands_are_domain_separated() {
        let deposit = DepositRequest {
            slot: 0,
            deposit_block: 0,
            denomination: U256::ZERO,
            from: Address::ZERO,
        };
        let seal = SealBlock { current: 0 };

        assert_ne!(
            deposit.signing_hash().expect("hash"),
            seal.signing_hash().expect("hash")
        );
    }
}
