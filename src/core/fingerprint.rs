//! Short content fingerprints for logs.
//!
//! Notes and tokens are never logged verbatim; a fingerprint lets repeated
//! requests be correlated without exposing their content.

use sha2::{Digest, Sha256};

/// First 16 hex chars of the SHA-256 of `input`
pub fn fingerprint(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(&digest[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(fingerprint("cafe 50k"), fingerprint("cafe 50k"));
        assert_ne!(fingerprint("cafe 50k"), fingerprint("cafe 60k"));
    }

    #[test]
    fn test_fingerprint_length() {
        let fp = fingerprint("ăn trưa 45k");
        assert_eq!(fp.len(), 16);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_known_digest_prefix() {
        // sha256("") = e3b0c442 98fc1c14 ...
        assert_eq!(fingerprint(""), "e3b0c44298fc1c14");
    }
}
