// File: src/token.rs
// Purpose: Tamper-evident encoding of rule parameters for the remote round trip

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Server-side key used to sign and verify parameter tokens. Never
/// leaves the server; the client only echoes tokens back.
#[derive(Clone)]
pub struct TokenSecret(Vec<u8>);

impl TokenSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length.
        HmacSha256::new_from_slice(&self.0).expect("hmac key of any length")
    }
}

impl std::fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenSecret(..)")
    }
}

/// Why a token was rejected. Callers get no more detail than this; the
/// wire response must not reveal which check failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed parameter token")]
    Malformed,
    #[error("parameter token failed integrity verification")]
    Tampered,
}

/// Opaque, tamper-evident encoding of a rule's parameter sequence.
///
/// Wire form is `<base64url payload>.<base64url mac>` where the payload
/// is the JSON-encoded parameter list and the mac is HMAC-SHA256 over
/// the encoded payload. The token is safe to hand to an untrusted
/// client: parameters only become authoritative again after `decode`
/// verifies the mac server-side, so a client cannot substitute a looser
/// bound than the server originally issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterToken {
    wire: String,
}

impl ParameterToken {
    /// Encode and sign a parameter sequence.
    pub fn issue(secret: &TokenSecret, parameters: &[String]) -> Self {
        let payload =
            serde_json::to_vec(parameters).expect("a sequence of strings always serializes");
        let encoded = URL_SAFE_NO_PAD.encode(payload);

        let mut mac = secret.mac();
        mac.update(encoded.as_bytes());
        let tag = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Self {
            wire: format!("{}.{}", encoded, tag),
        }
    }

    /// Verify a wire-form token and recover the original parameter
    /// sequence. Verification happens up front; every failure funnels
    /// through `TokenError` and nothing partially decoded escapes.
    pub fn decode(secret: &TokenSecret, wire: &str) -> Result<Vec<String>, TokenError> {
        let (encoded, tag) = wire.split_once('.').ok_or(TokenError::Malformed)?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = secret.mac();
        mac.update(encoded.as_bytes());
        // Constant-time comparison via the Mac trait.
        mac.verify_slice(&tag).map_err(|_| TokenError::Tampered)?;

        let payload = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| TokenError::Malformed)?;
        serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)
    }

    pub fn as_str(&self) -> &str {
        &self.wire
    }
}

impl std::fmt::Display for ParameterToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn secret() -> TokenSecret {
        TokenSecret::new(b"test-secret".to_vec())
    }

    fn params(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_issue_then_decode_round_trip() {
        let token = ParameterToken::issue(&secret(), &params(&["users", "email"]));
        let decoded = ParameterToken::decode(&secret(), token.as_str());
        assert_eq!(decoded, Ok(params(&["users", "email"])));
    }

    #[test]
    fn test_empty_parameter_sequence_round_trips() {
        let token = ParameterToken::issue(&secret(), &[]);
        assert_eq!(ParameterToken::decode(&secret(), token.as_str()), Ok(vec![]));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let token = ParameterToken::issue(&secret(), &params(&["users", "email"]));
        let mut wire = token.as_str().to_string();
        // Flip a character inside the payload half.
        let flipped = if wire.starts_with('A') { 'B' } else { 'A' };
        wire.replace_range(0..1, &flipped.to_string());
        assert_eq!(
            ParameterToken::decode(&secret(), &wire),
            Err(TokenError::Tampered)
        );
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = ParameterToken::issue(&secret(), &params(&["18"]));
        let other = TokenSecret::new(b"other-secret".to_vec());
        assert_eq!(
            ParameterToken::decode(&other, token.as_str()),
            Err(TokenError::Tampered)
        );
    }

    #[test]
    fn test_missing_separator_is_malformed() {
        assert_eq!(
            ParameterToken::decode(&secret(), "no-separator-here"),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_garbage_base64_is_malformed() {
        assert_eq!(
            ParameterToken::decode(&secret(), "!!!.???"),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = ParameterToken::issue(&secret(), &params(&["a/b+c", "d=e"]));
        assert!(!token.as_str().contains('+'));
        assert!(!token.as_str().contains('='));
    }
}
