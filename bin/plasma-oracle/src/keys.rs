//! Loading of the oracle and block authority keys.

use std::{fs, path::Path};

use alloy_signer_local::PrivateKeySigner;
use anyhow::Context;

/// Reads a hex-encoded secp256k1 private key, with or without a `0x` prefix, from `path`.
pub(crate) fn load_private_key(path: &Path) -> anyhow::Result<PrivateKeySigner> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read private key from {}", path.display()))?;
    let raw = raw.trim();
    let bytes =
        hex::decode(raw.strip_prefix("0x").unwrap_or(raw)).context("decode private key")?;

    PrivateKeySigner::from_slice(&bytes).context("parse private key")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn key_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "{contents}").expect("write key");
        file
    }

    #[test]
    fn loads_keys_with_and_without_prefix() {
        let hex_key = "0101010101010101010101010101010101010101010101010101010101010101";

        let plain = load_private_key(key_file(hex_key).path()).expect("plain");
        let prefixed =
            load_private_key(key_file(&format!("0x{hex_key}")).path()).expect("prefixed");

        assert_eq!(plain.address(), prefixed.address());
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!(load_private_key(key_file("not a key").path()).is_err());
        assert!(load_private_key(key_file("0102").path()).is_err());
        assert!(load_private_key(Path::new("/nonexistent/authority.key")).is_err());
    }
}
