//! Plasma transactions and their canonical hash.

use alloy_primitives::{keccak256, Address, Bytes, B256};
use alloy_rlp::{Decodable, Encodable, RlpDecodable, RlpEncodable};
use alloy_signer::SignerSync;
use plasma_cash_smt::MerkleProof;
use serde::{Deserialize, Serialize};

use crate::{
    errors::EncodingError,
    signature::TxSignature,
    types::{BlockHeight, Slot},
};

/// The signed-over part of a transaction, in RLP field order.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
struct UnsignedTx {
    slot: u64,
    prev_block: u64,
    denomination: u32,
    new_owner: Address,
}

/// An intent to transfer one coin to a new owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlasmaTx {
    /// The coin being transferred.
    pub slot: Slot,

    /// Height of the block holding the transaction being spent; `0` for a deposit transaction.
    pub prev_block: BlockHeight,

    /// Denomination of the coin.
    pub denomination: u32,

    /// Recipient of the coin.
    pub new_owner: Address,

    /// Signature of the current owner over [`PlasmaTx::hash`].
    pub signature: Option<TxSignature>,

    /// Inclusion proof of this transaction in its block, once the block is built.
    pub proof: Option<MerkleProof>,
}

impl PlasmaTx {
    /// Creates an unsigned transaction.
    pub const fn new(
        slot: Slot,
        prev_block: BlockHeight,
        denomination: u32,
        new_owner: Address,
    ) -> Self {
        Self {
            slot,
            prev_block,
            denomination,
            new_owner,
            signature: None,
            proof: None,
        }
    }

    /// Creates the transaction that brings a deposited coin into existence on the child ledger.
    pub const fn genesis(slot: Slot, denomination: u32, owner: Address) -> Self {
        Self::new(slot, 0, denomination, owner)
    }

    /// Whether this is a deposit transaction.
    pub const fn is_genesis(&self) -> bool {
        self.prev_block == 0
    }

    /// Canonical digest both ledgers agree on.
    ///
    /// A deposit transaction hashes to `keccak256(uint64 slot)` in tightly packed form, so it
    /// depends on nothing but the slot. Any other transaction hashes to the keccak of its RLP
    /// encoding.
    pub fn hash(&self) -> B256 {
        if self.is_genesis() {
            keccak256(self.slot.to_be_bytes())
        } else {
            keccak256(self.rlp_bytes())
        }
    }

    /// RLP encoding of `[slot, prev_block, denomination, new_owner]`.
    ///
    /// These are the transaction bytes submitted to the root ledger.
    pub fn rlp_bytes(&self) -> Bytes {
        let mut out = Vec::new();
        self.unsigned().encode(&mut out);
        out.into()
    }

    /// Decodes transaction bytes produced by [`PlasmaTx::rlp_bytes`].
    ///
    /// The result carries neither a signature nor a proof.
    pub fn from_rlp_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        let mut buf = bytes;
        let unsigned = UnsignedTx::decode(&mut buf)?;
        if !buf.is_empty() {
            return Err(EncodingError::TrailingBytes(buf.len()));
        }

        Ok(Self::new(
            unsigned.slot,
            unsigned.prev_block,
            unsigned.denomination,
            unsigned.new_owner,
        ))
    }

    /// Signs the transaction hash with `signer`, replacing any previous signature.
    pub fn sign<S>(&mut self, signer: &S) -> Result<(), EncodingError>
    where
        S: SignerSync + ?Sized,
    {
        self.signature = Some(TxSignature::sign_hash(signer, &self.hash())?);
        Ok(())
    }

    /// Consuming variant of [`PlasmaTx::sign`].
    pub fn signed_by<S>(mut self, signer: &S) -> Result<Self, EncodingError>
    where
        S: SignerSync + ?Sized,
    {
        self.sign(signer)?;
        Ok(self)
    }

    /// Recovers the address that signed this transaction.
    pub fn recover_signer(&self) -> Result<Address, EncodingError> {
        self.signature
            .as_ref()
            .ok_or(EncodingError::MissingSignature)?
            .recover(&self.hash())
    }

    /// Attaches an inclusion proof.
    pub fn with_proof(mut self, proof: MerkleProof) -> Self {
        self.proof = Some(proof);
        self
    }

    /// Returns the transaction without its signature and proof, which do not take part in the
    /// hash.
    pub fn stripped(&self) -> Self {
        Self::new(self.slot, self.prev_block, self.denomination, self.new_owner)
    }

    const fn unsigned(&self) -> UnsignedTx {
        UnsignedTx {
            slot: self.slot,
            prev_block: self.prev_block,
            denomination: self.denomination,
            new_owner: self.new_owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, hex};
    use alloy_signer_local::PrivateKeySigner;
    use proptest::prelude::*;

    use super::*;
    use crate::packed::{solidity_keccak256, PackedValue};

    const OWNER: Address = address!("5194b63f10691e46635b27925100cfc0a5ceca62");

    #[test]
    fn rlp_encodes_fields_in_order() {
        let deposit = PlasmaTx::new(5, 0, 1, OWNER);
        assert_eq!(
            deposit.rlp_bytes().as_ref(),
            hex!("d8058001945194b63f10691e46635b27925100cfc0a5ceca62")
        );

        let transfer = PlasmaTx::new(5, 85478557858583, 1, OWNER);
        assert_eq!(
            transfer.rlp_bytes().as_ref(),
            hex!("de05864dbe0713bb1701945194b63f10691e46635b27925100cfc0a5ceca62")
        );
        assert_eq!(transfer.hash(), keccak256(transfer.rlp_bytes()));
    }

    #[test]
    fn decodes_transaction_bytes() {
        let tx = PlasmaTx::from_rlp_bytes(&hex!(
            "da028203e8019450bce46ff7f6b92e4d383e4ada3ecba9e86d1292"
        ))
        .expect("must decode");

        assert_eq!(
            tx,
            PlasmaTx::new(
                2,
                1000,
                1,
                address!("50bce46ff7f6b92e4d383e4ada3ecba9e86d1292")
            )
        );
    }

    #[test]
    fn decoding_rejects_trailing_bytes() {
        let mut bytes = PlasmaTx::new(2, 1000, 1, OWNER).rlp_bytes().to_vec();
        bytes.push(0);

        assert_eq!(
            PlasmaTx::from_rlp_bytes(&bytes),
            Err(EncodingError::TrailingBytes(1))
        );
        assert!(matches!(
            PlasmaTx::from_rlp_bytes(&bytes[..4]),
            Err(EncodingError::Rlp(_))
        ));
    }

    #[test]
    fn genesis_hash_is_packed_slot() {
        let tx = PlasmaTx::genesis(5, 1, OWNER);
        let expected =
            solidity_keccak256(&[PackedValue::uint64(5)]).expect("uint64 always encodes");

        assert_eq!(tx.hash(), expected);
        assert_eq!(tx.hash(), tx.hash());
    }

    #[test]
    fn signature_binds_the_hash() {
        let signer = PrivateKeySigner::random();
        let mut tx = PlasmaTx::new(9, 3000, 1, OWNER)
            .signed_by(&signer)
            .expect("must sign");

        assert_eq!(tx.recover_signer(), Ok(signer.address()));

        tx.new_owner = Address::ZERO;
        assert_ne!(tx.recover_signer(), Ok(signer.address()));
        assert_eq!(
            tx.stripped().recover_signer(),
            Err(EncodingError::MissingSignature)
        );
    }

    #[test]
    fn survives_binary_serialization() {
        let signer = PrivateKeySigner::random();
        let tx = PlasmaTx::new(9, 3000, 1, OWNER)
            .signed_by(&signer)
            .expect("must sign");

        let encoded = bincode::serialize(&tx).expect("must serialize");
        let decoded: PlasmaTx = bincode::deserialize(&encoded).expect("must deserialize");

        assert_eq!(decoded, tx);
    }

    proptest! {
        #[test]
        fn genesis_hash_depends_only_on_slot(
            slot in any::<u64>(),
            denomination_a in any::<u32>(),
            denomination_b in any::<u32>(),
            owner_a in any::<[u8; 20]>(),
            owner_b in any::<[u8; 20]>(),
        ) {
            let a = PlasmaTx::genesis(slot, denomination_a, Address::from(owner_a));
            let b = PlasmaTx::genesis(slot, denomination_b, Address::from(owner_b));

            prop_assert_eq!(a.hash(), b.hash());
        }

        #[test]
        fn rlp_bytes_decode_to_the_same_transaction(
            slot in any::<u64>(),
            prev_block in any::<u64>(),
            denomination in any::<u32>(),
            owner in any::<[u8; 20]>(),
        ) {
            let tx = PlasmaTx::new(slot, prev_block, denomination, Address::from(owner));
            prop_assert_eq!(PlasmaTx::from_rlp_bytes(&tx.rlp_bytes()), Ok(tx));
        }
    }
}
