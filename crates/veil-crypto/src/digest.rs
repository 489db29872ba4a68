//! SHA-256 digest helper shared by the scheme implementations.

use sha2::{Digest, Sha256};

/// Hash the concatenation of `parts` and render the digest as lowercase
/// hex.
pub fn sha256_hex(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(sha256_hex(&[b"a", b"b"]), sha256_hex(&[b"a", b"b"]));
    }

    #[test]
    fn digest_is_64_hex_chars() {
        let hex = sha256_hex(&[b"payload"]);
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn concatenation_order_matters() {
        assert_ne!(sha256_hex(&[b"a", b"b"]), sha256_hex(&[b"b", b"a"]));
    }
}
