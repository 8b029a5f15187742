//! OAuth 1.0 HMAC-SHA1 signature generation (RFC 5849).

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};
use rand::RngExt;
use sha1::Sha1;

use crate::LtiError;

/// OAuth unreserved characters: A-Z a-z 0-9 - . _ ~
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode string per RFC 3986.
pub(crate) fn oauth_encode(input: &str) -> String {
    percent_encode(input.as_bytes(), OAUTH_ENCODE_SET).to_string()
}

/// Random nonce (32 hex characters).
pub(crate) fn generate_nonce() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    hex::encode(bytes)
}

/// Current Unix timestamp in seconds.
pub(crate) fn generate_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
        .to_string()
}

/// Build the signature base string per RFC 5849 Section 3.4.1.
///
/// Format: `HTTP_METHOD&encoded_base_url&encoded_parameters`
pub(crate) fn build_signature_base_string(
    method: &str,
    base_url: &str,
    params: &BTreeMap<String, String>,
) -> String {
    let param_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", oauth_encode(k), oauth_encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        oauth_encode(base_url),
        oauth_encode(&param_string)
    )
}

/// Sign `data` with HMAC-SHA1 and return the base64-encoded digest.
///
/// The key is `encode(consumer_secret)&encode(token_secret)`; LTI launches
/// have no token, so the token part is empty.
pub(crate) fn sign_hmac_sha1(consumer_secret: &str, data: &str) -> Result<String, LtiError> {
    let key = format!("{}&", oauth_encode(consumer_secret));
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| LtiError::Signing(e.to_string()))?;
    mac.update(data.as_bytes());
    Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_oauth_encode_unreserved() {
        assert_eq!(oauth_encode("abc123"), "abc123");
        assert_eq!(oauth_encode("-._~"), "-._~");
    }

    #[test]
    fn test_oauth_encode_reserved() {
        assert_eq!(oauth_encode(" "), "%20");
        assert_eq!(oauth_encode("&"), "%26");
        assert_eq!(oauth_encode("="), "%3D");
        assert_eq!(oauth_encode(":"), "%3A");
    }

    #[test]
    fn test_nonce_uniqueness() {
        let nonce1 = generate_nonce();
        let nonce2 = generate_nonce();
        assert_ne!(nonce1, nonce2);
        assert_eq!(nonce1.len(), 32);
    }

    #[test]
    fn test_timestamp_is_numeric() {
        assert!(generate_timestamp().parse::<u64>().unwrap() > 0);
    }

    #[test]
    fn test_signature_base_string_double_encodes_values() {
        let mut params = BTreeMap::new();
        params.insert("oauth_callback".to_owned(), "about:blank".to_owned());
        params.insert("b".to_owned(), "2".to_owned());

        let base = build_signature_base_string("post", "https://example.com/lti", &params);

        assert_eq!(
            base,
            "POST&https%3A%2F%2Fexample.com%2Flti&b%3D2%26oauth_callback%3Dabout%253Ablank"
        );
    }

    #[test]
    fn test_hmac_sha1_known_vector() {
        let mut mac = Hmac::<Sha1>::new_from_slice(b"key").unwrap();
        mac.update(b"The quick brown fox jumps over the lazy dog");
        assert_eq!(
            BASE64_STANDARD.encode(mac.finalize().into_bytes()),
            "3nybhbi3iqa8ino29wqQcBydtNk="
        );
    }

    #[test]
    fn test_sign_depends_on_secret() {
        let a = sign_hmac_sha1("one", "data").unwrap();
        let b = sign_hmac_sha1("two", "data").unwrap();
        assert_ne!(a, b);
    }
}
