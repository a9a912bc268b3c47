use rand::{Rng, rngs::OsRng};

/// Characters a generated credential is drawn from: ASCII letters, digits
/// and eight special symbols.
pub const CREDENTIAL_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

pub const DEFAULT_CREDENTIAL_LENGTH: usize = 12;

/// Generates a random credential of `length` characters.
///
/// Every character is an independent uniform draw from
/// [`CREDENTIAL_ALPHABET`] using the operating system CSPRNG. `OsRng`
/// panics if the system source is unavailable; there is no fallback to a
/// weaker generator.
pub fn generate_credential(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| CREDENTIAL_ALPHABET[rng.gen_range(0..CREDENTIAL_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_length_is_twelve() {
        assert_eq!(generate_credential(DEFAULT_CREDENTIAL_LENGTH).len(), 12);
    }

    #[test]
    fn respects_requested_length() {
        assert_eq!(generate_credential(0).len(), 0);
        assert_eq!(generate_credential(64).len(), 64);
    }

    #[test]
    fn stays_within_alphabet() {
        let credential = generate_credential(256);
        assert!(
            credential
                .bytes()
                .all(|b| CREDENTIAL_ALPHABET.contains(&b))
        );
    }
}
