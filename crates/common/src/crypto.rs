//! Webhook signature utilities shared across Reviewline crates
//!
//! Twilio signs every webhook request with `X-Twilio-Signature`, computed as
//! `base64(HMAC-SHA1(auth_token, url || k1 || v1 || k2 || v2 ...))` where the
//! POST parameters are sorted by name.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Header carrying the provider signature
pub const TWILIO_SIGNATURE_HEADER: &str = "x-twilio-signature";

fn signed_mac(auth_token: &str, url: &str, params: &[(String, String)]) -> Option<HmacSha1> {
    let mut mac = HmacSha1::new_from_slice(auth_token.as_bytes()).ok()?;

    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();

    mac.update(url.as_bytes());
    for (key, value) in sorted {
        mac.update(key.as_bytes());
        mac.update(value.as_bytes());
    }

    Some(mac)
}

/// Compute the base64 signature Twilio would send for this request
pub fn compute_twilio_signature(
    auth_token: &str,
    url: &str,
    params: &[(String, String)],
) -> String {
    match signed_mac(auth_token, url, params) {
        Some(mac) => STANDARD.encode(mac.finalize().into_bytes()),
        None => String::new(),
    }
}

/// Verify a Twilio signature using constant-time comparison.
pub fn verify_twilio_signature(
    auth_token: &str,
    url: &str,
    params: &[(String, String)],
    signature: &str,
) -> bool {
    let signature_bytes = match STANDARD.decode(signature.trim()) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    match signed_mac(auth_token, url, params) {
        Some(mac) => mac.verify_slice(&signature_bytes).is_ok(),
        None => false,
    }
}
