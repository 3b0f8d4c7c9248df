//! Signature verification for identity-provisioning webhooks.
//!
//! The identity provider delivers events through Svix. Each delivery carries
//! three headers: a message id, a unix timestamp, and a space-separated list
//! of `v1,<base64 signature>` entries. The signature is an HMAC-SHA256 over
//! `"{id}.{timestamp}.{body}"` keyed with the base64-decoded secret (the part
//! after the `whsec_` prefix).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CoreError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery id.
pub const HEADER_ID: &str = "svix-id";

/// Header carrying the delivery timestamp (unix seconds).
pub const HEADER_TIMESTAMP: &str = "svix-timestamp";

/// Header carrying the signature list.
pub const HEADER_SIGNATURE: &str = "svix-signature";

/// Prefix of signing secrets as shown in the provider dashboard.
pub const SECRET_PREFIX: &str = "whsec_";

/// Maximum allowed distance between the delivery timestamp and now.
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 5 * 60;

/// Version tag of the only signature scheme we accept.
const SIGNATURE_VERSION: &str = "v1";

/// A webhook signing secret, decoded once at startup.
#[derive(Clone)]
pub struct WebhookSecret {
    key: Vec<u8>,
}

impl std::fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WebhookSecret(..)")
    }
}

impl WebhookSecret {
    /// Parse a `whsec_`-prefixed (or bare) base64 secret.
    pub fn parse(secret: &str) -> Result<Self, CoreError> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        let key = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CoreError::Internal(format!("invalid webhook secret: {e}")))?;
        if key.is_empty() {
            return Err(CoreError::Internal("webhook secret is empty".into()));
        }
        Ok(Self { key })
    }

    /// Build a secret from raw key bytes.
    pub fn from_bytes(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    /// Compute the base64 signature for a delivery.
    pub fn sign(&self, msg_id: &str, timestamp: i64, body: &[u8]) -> String {
        let mac = self.mac_for(msg_id, timestamp, body);
        STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Verify a delivery against its headers.
    ///
    /// `now` is unix seconds; it is a parameter so callers and tests control
    /// the clock.
    pub fn verify(
        &self,
        msg_id: &str,
        timestamp: &str,
        signatures: &str,
        body: &[u8],
        now: i64,
    ) -> Result<(), CoreError> {
        let timestamp: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| CoreError::Unauthorized("invalid webhook timestamp".into()))?;

        if now.abs_diff(timestamp) > TIMESTAMP_TOLERANCE_SECS.unsigned_abs() {
            return Err(CoreError::Unauthorized(
                "webhook timestamp outside the allowed window".into(),
            ));
        }

        let matched = signatures
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == SIGNATURE_VERSION)
            .filter_map(|(_, sig)| STANDARD.decode(sig).ok())
            .any(|sig| {
                self.mac_for(msg_id, timestamp, body)
                    .verify_slice(&sig)
                    .is_ok()
            });

        if matched {
            Ok(())
        } else {
            Err(CoreError::Unauthorized("invalid webhook signature".into()))
        }
    }

    fn mac_for(&self, msg_id: &str, timestamp: i64, body: &[u8]) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key length");
        mac.update(msg_id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(body);
        mac
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const NOW: i64 = 1_700_000_000;
    const BODY: &[u8] = br#"{"type":"user.created","data":{"id":"user_1"}}"#;

    fn secret() -> WebhookSecret {
        WebhookSecret::from_bytes(b"super-secret-key".to_vec())
    }

    #[test]
    fn parses_prefixed_and_bare_secrets() {
        let encoded = STANDARD.encode(b"super-secret-key");
        let a = WebhookSecret::parse(&format!("whsec_{encoded}")).unwrap();
        let b = WebhookSecret::parse(&encoded).unwrap();
        assert_eq!(a.sign("msg", NOW, BODY), b.sign("msg", NOW, BODY));
        assert_eq!(a.sign("msg", NOW, BODY), secret().sign("msg", NOW, BODY));
    }

    #[test]
    fn rejects_undecodable_secret() {
        assert!(WebhookSecret::parse("whsec_***").is_err());
        assert!(WebhookSecret::parse("whsec_").is_err());
    }

    #[test]
    fn accepts_valid_signature() {
        let sig = secret().sign("msg_1", NOW, BODY);
        let header = format!("v1,{sig}");
        assert!(secret()
            .verify("msg_1", &NOW.to_string(), &header, BODY, NOW)
            .is_ok());
    }

    #[test]
    fn accepts_any_matching_entry_in_list() {
        let sig = secret().sign("msg_1", NOW, BODY);
        let header = format!("v1,AAAA v2,{sig} v1,{sig}");
        assert!(secret()
            .verify("msg_1", &NOW.to_string(), &header, BODY, NOW + 30)
            .is_ok());
    }

    #[test]
    fn rejects_tampered_body() {
        let sig = secret().sign("msg_1", NOW, BODY);
        let header = format!("v1,{sig}");
        assert_matches!(
            secret().verify("msg_1", &NOW.to_string(), &header, b"{}", NOW),
            Err(CoreError::Unauthorized(_))
        );
    }

    #[test]
    fn rejects_other_message_id() {
        let sig = secret().sign("msg_1", NOW, BODY);
        let header = format!("v1,{sig}");
        assert!(secret()
            .verify("msg_2", &NOW.to_string(), &header, BODY, NOW)
            .is_err());
    }

    #[test]
    fn extreme_timestamps_are_outside_the_window() {
        let header = "v1,AAAA";
        for ts in [i64::MIN, i64::MAX] {
            let result = secret().verify("msg_1", &ts.to_string(), header, BODY, NOW);
            assert_matches!(result, Err(CoreError::Unauthorized(msg)) if msg.contains("window"));
        }
    }

    #[test]
    fn rejects_stale_timestamp() {
        let sig = secret().sign("msg_1", NOW, BODY);
        let header = format!("v1,{sig}");
        let later = NOW + TIMESTAMP_TOLERANCE_SECS + 1;
        assert!(secret()
            .verify("msg_1", &NOW.to_string(), &header, BODY, later)
            .is_err());
    }

    #[test]
    fn rejects_garbage_headers() {
        assert!(secret().verify("msg_1", "soon", "v1,abc", BODY, NOW).is_err());
        assert!(secret()
            .verify("msg_1", &NOW.to_string(), "", BODY, NOW)
            .is_err());
    }
}
