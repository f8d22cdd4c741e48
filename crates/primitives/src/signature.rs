//! Transaction signatures in the form the root ledger verifies them.

use alloy_primitives::{Address, Bytes, Signature, B256};
use alloy_signer::SignerSync;
use serde::{Deserialize, Serialize};

use crate::errors::EncodingError;

/// Length of an encoded signature: one mode byte followed by `r || s || v`.
pub const SIGNATURE_LEN: usize = 66;

/// Mode byte for a signature over the bare 32-byte hash, with no message prefix.
const RAW_HASH_MODE: u8 = 0;

/// A secp256k1 signature over a transaction hash.
///
/// Encoded as a leading mode byte (always `0x00`, raw-hash mode) followed by the 65-byte
/// signature whose recovery byte is 27 or 28.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Bytes", into = "Bytes")]
pub struct TxSignature(Bytes);

impl TxSignature {
    /// Signs `hash` with `signer`.
    pub fn sign_hash<S>(signer: &S, hash: &B256) -> Result<Self, EncodingError>
    where
        S: SignerSync + ?Sized,
    {
        let signature = signer
            .sign_hash_sync(hash)
            .map_err(|e| EncodingError::InvalidSignature(e.to_string()))?;

        Ok(Self::from_signature(&signature))
    }

    /// Wraps an already produced signature.
    pub fn from_signature(signature: &Signature) -> Self {
        let mut buf = Vec::with_capacity(SIGNATURE_LEN);
        buf.push(RAW_HASH_MODE);
        buf.extend_from_slice(&signature.as_bytes());
        Self(buf.into())
    }

    /// Validates and wraps encoded signature bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EncodingError> {
        Self::try_from(Bytes::copy_from_slice(bytes))
    }

    /// The encoded signature.
    pub const fn as_bytes(&self) -> &Bytes {
        &self.0
    }

    /// Recovers the address that signed `hash`.
    pub fn recover(&self, hash: &B256) -> Result<Address, EncodingError> {
        let signature = Signature::from_raw(&self.0[1..])
            .map_err(|e| EncodingError::InvalidSignature(e.to_string()))?;

        signature
            .recover_address_from_prehash(hash)
            .map_err(|e| EncodingError::InvalidSignature(e.to_string()))
    }
}

impl TryFrom<Bytes> for TxSignature {
    type Error = EncodingError;

    fn try_from(bytes: Bytes) -> Result<Self, Self::Error> {
        if bytes.len() != SIGNATURE_LEN {
            return Err(EncodingError::InvalidSignatureLength(bytes.len()));
        }
        if bytes[0] != RAW_HASH_MODE {
            return Err(EncodingError::UnsupportedSignatureMode(bytes[0]));
        }

        Ok(Self(bytes))
    }
}

impl From<TxSignature> for Bytes {
    fn from(signature: TxSignature) -> Self {
        signature.0
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::keccak256;
    use alloy_signer_local::PrivateKeySigner;

    use super::*;

    #[test]
    fn recovers_the_signer() {
        let signer = PrivateKeySigner::random();
        let hash = keccak256(b"coin");

        let signature = TxSignature::sign_hash(&signer, &hash).expect("must sign");
        let raw = signature.as_bytes();

        assert_eq!(raw.len(), SIGNATURE_LEN);
        assert_eq!(raw[0], RAW_HASH_MODE);
        assert!(raw[65] == 27 || raw[65] == 28);
        assert_eq!(signature.recover(&hash), Ok(signer.address()));
        assert_ne!(
            signature.recover(&keccak256(b"other coin")),
            Ok(signer.address())
        );
    }

    #[test]
    fn rejects_malformed_encodings() {
        assert_eq!(
            TxSignature::from_slice(&[0u8; 65]),
            Err(EncodingError::InvalidSignatureLength(65))
        );

        let mut prefixed = [0u8; SIGNATURE_LEN];
        prefixed[0] = 1;
        assert_eq!(
            TxSignature::from_slice(&prefixed),
            Err(EncodingError::UnsupportedSignatureMode(1))
        );
    }

    #[test]
    fn deserialization_validates_length() {
        assert!(serde_json::from_str::<TxSignature>("\"0x0011\"").is_err());
    }
}
