use base64::{engine::general_purpose::STANDARD, Engine as _};
use http::HeaderMap;
use tiffin_core::Credentials;

const AUTHORIZATION: &str = "authorization";
const BASIC_PREFIX: &str = "Basic ";

/// Recover `username:password` from a `Basic` authorization header.
///
/// Only the first `authorization` value is considered. `None` for a missing
/// header, another scheme, bad base64, or a decoded value without a colon.
/// The password keeps any colons after the first.
pub fn extract_credentials(metadata: &HeaderMap) -> Option<Credentials> {
    let header = metadata.get(AUTHORIZATION)?.to_str().ok()?;
    let encoded = header.strip_prefix(BASIC_PREFIX)?;

    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;

    let (username, password) = decoded.split_once(':')?;
    Some(Credentials::new(username, password))
}
