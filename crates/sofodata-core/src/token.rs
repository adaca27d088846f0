//! Random identifiers for temporary file names

use rand::Rng;

/// Alphabet used for generated tokens: lowercase ASCII letters and digits.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a random string of `length` lowercase alphanumeric characters.
///
/// Characters are drawn uniformly with replacement. The output is only used
/// to keep temporary file names apart and is not suitable for secrets.
#[must_use]
pub fn generate_random_token(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_length() {
        for n in [0, 1, 7, 32, 128] {
            assert_eq!(generate_random_token(n).len(), n);
        }
    }

    #[test]
    fn test_token_alphabet() {
        let token = generate_random_token(512);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_tokens_differ() {
        assert_ne!(generate_random_token(32), generate_random_token(32));
    }
}
