//! Share-link token generation for published listings.

use rand::Rng;

/// Length of the public share token appended to the configured base URL.
pub const PUBLIC_TOKEN_LEN: usize = 10;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a short random token for a listing's public URL.
///
/// Tokens are lowercase alphanumeric and not guessable in practice; they
/// are generated at most once per listing (repeat publishes reuse the
/// stored URL).
pub fn public_token() -> String {
    let mut rng = rand::rng();
    (0..PUBLIC_TOKEN_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_has_fixed_length_and_alphabet() {
        let token = public_token();
        assert_eq!(token.len(), PUBLIC_TOKEN_LEN);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn tokens_differ_across_calls() {
        // Collision over a handful of draws would indicate a broken RNG.
        let a = public_token();
        let b = public_token();
        assert_ne!(a, b);
    }
}
