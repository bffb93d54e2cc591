//! Payment provider webhook signatures (HMAC-SHA256).
//!
//! Header format: `t=<unix seconds>,v1=<hex>[,v1=<hex>...]`.
//! Signed payload: `"{t}.{raw body}"` keyed with the shared signing secret.
//! Any `v1` entry may match; unknown keys (e.g. `v0`) are ignored.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature (lowercase for `HeaderMap` lookup)
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Default maximum age of a signed event, in seconds
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

const SCHEME: &str = "v1";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("No signature header")]
    MissingHeader,

    #[error("Unable to extract timestamp and signatures from header")]
    MalformedHeader,

    #[error("No signatures found with expected scheme")]
    NoSignatures,

    #[error("No signatures found matching the expected signature for payload")]
    Mismatch,

    #[error("Timestamp outside the tolerance zone")]
    TimestampOutsideTolerance,

    #[error("Invalid signing secret")]
    InvalidSecret,
}

struct ParsedHeader {
    timestamp: i64,
    signatures: Vec<Vec<u8>>,
}

fn parse_header(header: &str) -> Result<ParsedHeader, SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => {
                timestamp = Some(
                    value
                        .parse::<i64>()
                        .map_err(|_| SignatureError::MalformedHeader)?,
                )
            }
            SCHEME => {
                // Undecodable entries can never match; skip them.
                if let Ok(bytes) = hex::decode(value) {
                    signatures.push(bytes);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::MalformedHeader)?;
    if signatures.is_empty() {
        return Err(SignatureError::NoSignatures);
    }
    Ok(ParsedHeader {
        timestamp,
        signatures,
    })
}

fn mac_for(secret: &str, timestamp: i64, payload: &[u8]) -> Result<HmacSha256, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| SignatureError::InvalidSecret)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Hex signature of `payload` at `timestamp`.
pub fn compute_signature(
    secret: &str,
    timestamp: i64,
    payload: &[u8],
) -> Result<String, SignatureError> {
    let mac = mac_for(secret, timestamp, payload)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Full header value for `payload`, as the provider would send it.
pub fn signature_header(
    secret: &str,
    timestamp: i64,
    payload: &[u8],
) -> Result<String, SignatureError> {
    Ok(format!(
        "t={},{}={}",
        timestamp,
        SCHEME,
        compute_signature(secret, timestamp, payload)?
    ))
}

/// Verify a raw webhook body against its signature header.
///
/// `tolerance_secs <= 0` disables the timestamp check.
pub fn verify(
    header: Option<&str>,
    payload: &[u8],
    secret: &str,
    tolerance_secs: i64,
    now_unix: i64,
) -> Result<(), SignatureError> {
    let header = header.ok_or(SignatureError::MissingHeader)?;
    let parsed = parse_header(header)?;

    let mut matched = false;
    for sig in &parsed.signatures {
        // verify_slice compares in constant time
        if mac_for(secret, parsed.timestamp, payload)?
            .verify_slice(sig)
            .is_ok()
        {
            matched = true;
            break;
        }
    }
    if !matched {
        return Err(SignatureError::Mismatch);
    }

    if tolerance_secs > 0 && now_unix.abs_diff(parsed.timestamp) > tolerance_secs.unsigned_abs() {
        return Err(SignatureError::TimestampOutsideTolerance);
    }
    Ok(())
}
