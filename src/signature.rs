//! LINE webhook signature verification
//!
//! LINE signs every webhook delivery with
//! `X-Line-Signature = base64(HMAC-SHA256(channel_secret, raw_body))`.

use base64::engine::general_purpose;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::SignatureInvalid;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Verifies webhook bodies against the channel secret
#[derive(Clone)]
pub struct SignatureVerifier {
    channel_secret: Vec<u8>,
}

impl SignatureVerifier {
    /// Create a verifier for the given channel secret
    pub fn new(channel_secret: impl AsRef<[u8]>) -> Self {
        Self {
            channel_secret: channel_secret.as_ref().to_vec(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length
        HmacSha256::new_from_slice(&self.channel_secret)
            .unwrap_or_else(|_| unreachable!("HMAC key length is unrestricted"))
    }

    /// Compute the base64 signature LINE would send for `body`
    pub fn sign(&self, body: &[u8]) -> String {
        let mut mac = self.mac();
        mac.update(body);
        base64::Engine::encode(&general_purpose::STANDARD, mac.finalize().into_bytes())
    }

    /// Verify the signature header against the raw body
    ///
    /// The comparison runs in constant time.
    pub fn verify(&self, body: &[u8], signature: Option<&str>) -> Result<(), SignatureInvalid> {
        let signature = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(SignatureInvalid::Missing)?;

        let expected = base64::Engine::decode(&general_purpose::STANDARD, signature)
            .map_err(|_| SignatureInvalid::Malformed)?;

        let mut mac = self.mac();
        mac.update(body);
        mac.verify_slice(&expected)
            .map_err(|_| SignatureInvalid::Mismatch)
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("channel_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let verifier = SignatureVerifier::new("test_channel_secret");
        let body = br#"{"destination":"U123","events":[]}"#;

        let signature = verifier.sign(body);
        assert!(verifier.verify(body, Some(&signature)).is_ok());
        assert_eq!(
            verifier.verify(b"tampered", Some(&signature)),
            Err(SignatureInvalid::Mismatch)
        );
    }

    #[test]
    fn test_known_signature() {
        // base64(HMAC-SHA256("key", "The quick brown fox jumps over the lazy dog"))
        let verifier = SignatureVerifier::new("key");
        let body = b"The quick brown fox jumps over the lazy dog";
        assert_eq!(
            verifier.sign(body),
            "97yD9DBThCSxMpjmqm+xQ+9NWaFJRhdZl0edvC0aPNg="
        );
    }

    #[test]
    fn test_missing_signature() {
        let verifier = SignatureVerifier::new("secret");
        assert_eq!(verifier.verify(b"{}", None), Err(SignatureInvalid::Missing));
        assert_eq!(
            verifier.verify(b"{}", Some("  ")),
            Err(SignatureInvalid::Missing)
        );
    }

    #[test]
    fn test_malformed_signature() {
        let verifier = SignatureVerifier::new("secret");
        assert_eq!(
            verifier.verify(b"{}", Some("not base64!!")),
            Err(SignatureInvalid::Malformed)
        );
    }

    #[test]
    fn test_wrong_secret() {
        let signer = SignatureVerifier::new("secret-a");
        let verifier = SignatureVerifier::new("secret-b");
        let signature = signer.sign(b"{}");
        assert_eq!(
            verifier.verify(b"{}", Some(&signature)),
            Err(SignatureInvalid::Mismatch)
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let verifier = SignatureVerifier::new("super-secret");
        assert!(!format!("{:?}", verifier).contains("super-secret"));
    }
}
