//! Webhook signature verification
//!
//! GitHub signs the raw request body with HMAC-SHA256 and sends the hex
//! digest in `X-Hub-Signature-256` as `sha256=<hex>`. Verification is
//! constant-time via the Mac comparison.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Checks a signature header against the raw request body.
pub fn verify(secret: &[u8], body: &[u8], signature_header: &str) -> bool {
    let Some((scheme, hex_digest)) = signature_header.split_once('=') else {
        return false;
    };
    if scheme != "sha256" {
        return false;
    }
    let Ok(expected) = hex::decode(hex_digest) else {
        return false;
    };

    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
pub fn sign(secret: &[u8], body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_signature_verifies() {
        let signature = sign(b"s3cret", b"{\"after\":\"abc\"}");
        assert!(verify(b"s3cret", b"{\"after\":\"abc\"}", &signature));
    }

    #[test]
    fn test_tampered_body_fails() {
        let signature = sign(b"s3cret", b"{\"after\":\"abc\"}");
        assert!(!verify(b"s3cret", b"{\"after\":\"abd\"}", &signature));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let signature = sign(b"s3cret", b"payload");
        assert!(!verify(b"other", b"payload", &signature));
    }

    #[test]
    fn test_unsupported_scheme_fails() {
        assert!(!verify(b"s3cret", b"payload", "sha1=deadbeef"));
    }

    #[test]
    fn test_malformed_header_fails() {
        assert!(!verify(b"s3cret", b"payload", "sha256"));
        assert!(!verify(b"s3cret", b"payload", "sha256=not-hex"));
    }
}
