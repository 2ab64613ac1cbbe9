//! Request signing for the Coinapult REST API.
//!
//! Every private endpoint takes a signed JSON body: the payload carries a
//! strictly increasing nonce and a unix timestamp, and the request carries
//! the API key and a base64 HMAC-SHA512 of the body in the `cpt-key` /
//! `cpt-hmac` headers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::prelude::*;
use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::Result;

/// Tracks the last nonce issued so every call returns a strictly
/// increasing value even when the wall-clock hasn't advanced.
///
/// Uses nanosecond resolution in a `u64`, which overflows around year 2554.
static LAST_NONCE: AtomicU64 = AtomicU64::new(0);

/// Header carrying the API key.
pub const KEY_HEADER: &str = "cpt-key";
/// Header carrying the payload signature.
pub const SIGNATURE_HEADER: &str = "cpt-hmac";

/// Returns a strictly monotonically-increasing nonce with nanosecond resolution.
///
/// Uses the wall-clock as the baseline but guarantees that successive calls
/// always return a value larger than the previous one, even when the clock
/// resolution is too coarse or the clock jumps backwards.
pub fn next_nonce() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_nanos() as u64;

    let mut prev = LAST_NONCE.load(Ordering::Relaxed);
    loop {
        let nonce = now.max(prev + 1);
        match LAST_NONCE.compare_exchange_weak(prev, nonce, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return nonce,
            Err(actual) => prev = actual,
        }
    }
}

/// Returns the current unix timestamp in seconds.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Computes the `cpt-hmac` header value: `Base64(HMAC-SHA512(secret, body))`.
///
/// # Errors
///
/// Returns [`CoinapultError::Setup`](crate::CoinapultError::Setup) when the
/// HMAC primitive rejects the key; that failure is fatal and never retried.
pub fn sign(api_secret: &str, body: &str) -> Result<String> {
    let mut mac = Hmac::<Sha512>::new_from_slice(api_secret.as_bytes())
        .map_err(|e| crate::CoinapultError::Setup(format!("HMAC-SHA512 unavailable: {e}")))?;
    mac.update(body.as_bytes());
    let result = mac.finalize().into_bytes();

    Ok(BASE64_STANDARD.encode(result))
}
