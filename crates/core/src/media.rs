//! Helpers for the external media host.
//!
//! The catalog only stores opaque media references. These helpers turn
//! references into display URLs, decode inline base64 uploads, check that
//! uploaded bytes really are an image, and sign media API requests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// Base of every display URL. `{cloud}` is the media account name.
pub const DISPLAY_URL_BASE: &str = "https://res.cloudinary.com";

/// Extension appended to references when building display URLs.
pub const DISPLAY_EXTENSION: &str = "png";

/// Default upload size cap (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Build the display URL for a stored media reference.
pub fn display_url(cloud_name: &str, reference: &str) -> String {
    format!("{DISPLAY_URL_BASE}/{cloud_name}/image/upload/{reference}.{DISPLAY_EXTENSION}")
}

/// Decode an inline base64 image, accepting an optional `data:...;base64,`
/// prefix.
pub fn decode_base64_image(payload: &str) -> Result<Vec<u8>, CoreError> {
    let data = match payload.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| CoreError::Validation("malformed data URL".into()))?,
        None => payload,
    };
    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| CoreError::Validation(format!("image is not valid base64: {e}")))?;
    if bytes.is_empty() {
        return Err(CoreError::Validation("no image data provided".into()));
    }
    Ok(bytes)
}

/// Check the size cap and sniff the bytes for a known image format.
///
/// Returns the detected format's canonical extension.
pub fn check_image_bytes(bytes: &[u8], max_bytes: usize) -> Result<&'static str, CoreError> {
    if bytes.len() > max_bytes {
        return Err(CoreError::Validation(format!(
            "file size too large, maximum {} MB allowed",
            max_bytes / (1024 * 1024)
        )));
    }
    let format = image::guess_format(bytes)
        .map_err(|_| CoreError::Validation("only image files are allowed".into()))?;
    Ok(format.extensions_str().first().copied().unwrap_or("bin"))
}

/// Sign a media API request.
///
/// Parameters are sorted by name, joined as `k=v&k=v`, suffixed with the API
/// secret and hashed with SHA-256 (hex). Empty values are left out, matching
/// how the host verifies signatures.
pub fn sign_request(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, &str)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let digest = Sha256::digest(format!("{to_sign}{api_secret}").as_bytes());
    format!("{digest:x}")
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    /// Smallest valid PNG header; enough for format sniffing.
    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn display_url_follows_template() {
        assert_eq!(
            display_url("demo", "uploads/abc123"),
            "https://res.cloudinary.com/demo/image/upload/uploads/abc123.png"
        );
    }

    #[test]
    fn decodes_plain_and_data_url_base64() {
        let encoded = STANDARD.encode(PNG_MAGIC);
        assert_eq!(decode_base64_image(&encoded).unwrap(), PNG_MAGIC);
        let data_url = format!("data:image/png;base64,{encoded}");
        assert_eq!(decode_base64_image(&data_url).unwrap(), PNG_MAGIC);
    }

    #[test]
    fn rejects_bad_base64() {
        assert_matches!(decode_base64_image("%%%"), Err(CoreError::Validation(_)));
        assert!(decode_base64_image("data:image/png;base64").is_err());
        assert!(decode_base64_image("").is_err());
    }

    #[test]
    fn sniffs_png() {
        assert_eq!(check_image_bytes(PNG_MAGIC, 1024).unwrap(), "png");
    }

    #[test]
    fn rejects_non_images_and_oversized_payloads() {
        assert!(check_image_bytes(b"plain text, not an image", 1024).is_err());
        assert!(check_image_bytes(PNG_MAGIC, 4).is_err());
    }

    #[test]
    fn signature_is_order_independent_and_skips_empty_values() {
        let a = sign_request(&[("timestamp", "100"), ("folder", "uploads")], "secret");
        let b = sign_request(
            &[("folder", "uploads"), ("public_id", ""), ("timestamp", "100")],
            "secret",
        );
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn signature_depends_on_secret() {
        let params = [("timestamp", "100")];
        assert_ne!(sign_request(&params, "a"), sign_request(&params, "b"));
    }
}
