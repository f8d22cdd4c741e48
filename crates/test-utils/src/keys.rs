//! Fixed accounts used across tests.

use alloy_primitives::B256;
use alloy_signer_local::PrivateKeySigner;

fn signer_from_byte(byte: u8) -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(&B256::repeat_byte(byte)).expect("valid secp256k1 scalar")
}

/// The child-ledger block authority.
pub fn authority() -> PrivateKeySigner {
    signer_from_byte(0x01)
}

/// First user.
pub fn alice() -> PrivateKeySigner {
    signer_from_byte(0x0a)
}

/// Second user.
pub fn bob() -> PrivateKeySigner {
    signer_from_byte(0x0b)
}

/// Third user, usually the dishonest one.
pub fn charlie() -> PrivateKeySigner {
    signer_from_byte(0x0c)
}
