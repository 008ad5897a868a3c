//! Random invitation tokens.

use base64::prelude::*;
use hospice_postgres::types::constants::invitation::TOKEN_BYTES;

/// Returns a URL-safe token made of [`TOKEN_BYTES`] random bytes.
pub fn generate_invitation_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::random();
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_url_safe_and_unique() {
        let first = generate_invitation_token();
        let second = generate_invitation_token();

        assert_ne!(first, second);
        assert_eq!(first.len(), 43);
        assert!(
            first
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }
}
