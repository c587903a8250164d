use base64::{DecodeError, Engine as _, engine::general_purpose::STANDARD};

/// Marker separating a data-URI header from its payload.
const DATA_URI_MARKER: &str = ";base64,";

/// Decode a base64 media payload.
///
/// Accepts both bare base64 and `data:<mime>;base64,<payload>` URIs, since
/// the broadcast front-ends send the latter.
pub fn decode_media(payload: &str) -> Result<Vec<u8>, DecodeError> {
    let trimmed = payload.trim();
    let body = if trimmed.starts_with("data:") {
        match trimmed.find(DATA_URI_MARKER) {
            Some(idx) => &trimmed[idx + DATA_URI_MARKER.len()..],
            None => trimmed,
        }
    } else {
        trimmed
    };
    STANDARD.decode(body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bare_and_data_uri_payloads_decode_identically() {
        let encoded = STANDARD.encode(b"media bytes");
        let bare = decode_media(&encoded).unwrap();
        let uri = decode_media(&format!("data:image/png;base64,{encoded}")).unwrap();
        assert_eq!(bare, uri);
        assert_eq!(bare, b"media bytes");
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let encoded = format!("  {}\n", STANDARD.encode(b"x"));
        assert_eq!(decode_media(&encoded).unwrap(), b"x");
    }

    #[test]
    fn invalid_base64_is_an_error() {
        assert!(decode_media("not base64!!").is_err());
        assert!(decode_media("data:text/plain,percent-encoded").is_err());
    }
}
