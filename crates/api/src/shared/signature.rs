use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex HMAC-SHA256 signature of the raw request body
pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-alchemy-signature";

/// Verify a webhook delivery against its claimed signature.
///
/// The digest is computed over the exact raw body bytes as received, never a
/// re-serialized value. The comparison happens on the decoded digest bytes in
/// constant time, so a mismatch leaks no information about how many prefix
/// bytes matched. An empty signing key or an unparseable signature fails
/// closed.
pub fn verify_webhook_signature(
    signing_key: &str,
    raw_body: &[u8],
    claimed_signature: &str,
) -> bool {
    if signing_key.is_empty() || claimed_signature.is_empty() {
        return false;
    }
    let claimed = match hex::decode(claimed_signature) {
        Ok(claimed) => claimed,
        Err(_) => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(signing_key.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(raw_body);
    mac.verify_slice(&claimed).is_ok()
}

/// Hex HMAC-SHA256 of `raw_body` under `signing_key`, the signature a webhook
/// provider attaches to its deliveries.
pub fn compute_webhook_signature(signing_key: &str, raw_body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_key.as_bytes())
        .expect("HMAC accepts keys of any size");
    mac.update(raw_body);
    hex::encode(mac.finalize().into_bytes())
}
