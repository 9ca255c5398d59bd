//! ID generation utilities.

use rand::Rng;
use ulid::Ulid;
use uuid::Uuid;

/// Alphabet used for short external tokens.
const SHORT_TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated short tokens.
pub const SHORT_TOKEN_LEN: usize = 6;

/// Number of token characters appended to a slug.
const SLUG_SUFFIX_LEN: usize = 4;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based primary key.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a bearer token for an authenticated session.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // No time component, unlike ULIDs
        Uuid::new_v4().simple().to_string()
    }

    /// Generate a short lowercase alphanumeric token.
    ///
    /// Used as the external identifier of profiles, ideas and follow
    /// requests. Not security sensitive; uniqueness is enforced by the
    /// database.
    #[must_use]
    pub fn generate_short_token(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..SHORT_TOKEN_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..SHORT_TOKEN_ALPHABET.len());
                char::from(SHORT_TOKEN_ALPHABET[idx])
            })
            .collect()
    }

    /// Build a URL slug from `base` with a short random suffix.
    #[must_use]
    pub fn generate_slug(&self, base: &str) -> String {
        let token = self.generate_short_token();
        slug_with_suffix(base, &token[..SLUG_SUFFIX_LEN])
    }
}

/// Slugify `base` and append `suffix`, falling back to the suffix alone when
/// `base` has no sluggable characters.
#[must_use]
pub fn slug_with_suffix(base: &str, suffix: &str) -> String {
    let base = slug::slugify(base);
    let suffix = slug::slugify(suffix);
    if base.is_empty() {
        suffix
    } else {
        format!("{base}-{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_eq!(id2.len(), 26);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_generate_token() {
        let id_gen = IdGenerator::new();
        let token = id_gen.generate_token();

        assert_eq!(token.len(), 32); // Simple UUID without hyphens
    }

    #[test]
    fn test_short_token_alphabet() {
        let id_gen = IdGenerator::new();
        for _ in 0..100 {
            let token = id_gen.generate_short_token();
            assert_eq!(token.len(), SHORT_TOKEN_LEN);
            assert!(
                token
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            );
        }
    }

    #[test]
    fn test_slug_with_suffix() {
        assert_eq!(slug_with_suffix("Hello World!", "ab12"), "hello-world-ab12");
        assert_eq!(slug_with_suffix("Añadir ideas", "zz"), "anadir-ideas-zz");
        assert_eq!(slug_with_suffix("", "x9"), "x9");
        assert_eq!(slug_with_suffix("???", "x9"), "x9");
    }

    #[test]
    fn test_generate_slug() {
        let id_gen = IdGenerator::new();
        let slug = id_gen.generate_slug("My first idea");

        assert!(slug.starts_with("my-first-idea-"));
        assert_eq!(slug.len(), "my-first-idea-".len() + SLUG_SUFFIX_LEN);
    }
}
