use rand::rngs::OsRng;
use rand::RngCore;

/// Length of the random salt prefixed to every stored credential.
pub const SALT_LEN: usize = 16;

/// Length of the BLAKE3 digest.
pub const DIGEST_LEN: usize = 32;

/// Stretching rounds applied by [`PasswordHasher::USER`].
pub const DEFAULT_ROUNDS: u32 = 100_000;

/// Domain-separated, salted, iterated credential hasher.
///
/// The first round hashes `domain || ":" || salt || password`; every
/// following round re-hashes `salt || password` keyed by the previous
/// digest. Two hashers with different tags or round counts never agree on a
/// digest for the same input, so changing either requires a new tag.
pub struct PasswordHasher {
    domain: &'static str,
    rounds: u32,
}

impl PasswordHasher {
    /// Hasher for user credentials in the users partition.
    pub const USER: Self = Self::new("lfs-user-password-v1");

    /// Create a hasher with a custom domain tag and [`DEFAULT_ROUNDS`].
    pub const fn new(domain: &'static str) -> Self {
        Self {
            domain,
            rounds: DEFAULT_ROUNDS,
        }
    }

    /// Override the round count. Zero is treated as one.
    pub const fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    /// Hash `password` under a freshly generated salt.
    pub fn hash(&self, password: &[u8]) -> PasswordHash {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        self.hash_with_salt(salt, password)
    }

    /// Hash `password` under the given salt.
    pub fn hash_with_salt(&self, salt: [u8; SALT_LEN], password: &[u8]) -> PasswordHash {
        PasswordHash {
            salt,
            digest: self.digest(&salt, password),
        }
    }

    /// Check `password` against a stored hash. Comparison is constant-time.
    pub fn verify(&self, stored: &PasswordHash, password: &[u8]) -> bool {
        let computed = self.digest(&stored.salt, password);
        blake3::Hash::from(computed) == blake3::Hash::from(stored.digest)
    }

    fn digest(&self, salt: &[u8; SALT_LEN], password: &[u8]) -> [u8; DIGEST_LEN] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(salt);
        hasher.update(password);
        let mut state = *hasher.finalize().as_bytes();
        for _ in 1..self.rounds {
            let mut round = blake3::Hasher::new_keyed(&state);
            round.update(salt);
            round.update(password);
            state = *round.finalize().as_bytes();
        }
        state
    }
}

/// A stored credential: `salt || digest`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    salt: [u8; SALT_LEN],
    digest: [u8; DIGEST_LEN],
}

impl PasswordHash {
    /// Encoded length in bytes.
    pub const ENCODED_LEN: usize = SALT_LEN + DIGEST_LEN;

    /// Serialize as `salt || digest`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::ENCODED_LEN);
        out.extend_from_slice(&self.salt);
        out.extend_from_slice(&self.digest);
        out
    }

    /// Parse the `salt || digest` encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PasswordError> {
        if bytes.len() != Self::ENCODED_LEN {
            return Err(PasswordError::InvalidLength {
                expected: Self::ENCODED_LEN,
                actual: bytes.len(),
            });
        }
        let mut salt = [0u8; SALT_LEN];
        let mut digest = [0u8; DIGEST_LEN];
        salt.copy_from_slice(&bytes[..SALT_LEN]);
        digest.copy_from_slice(&bytes[SALT_LEN..]);
        Ok(Self { salt, digest })
    }
}

// Never print digest material.
impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Errors from credential decoding.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("invalid credential length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_correct_password() {
        let stored = PasswordHasher::USER.hash(b"secret");
        assert!(PasswordHasher::USER.verify(&stored, b"secret"));
    }

    #[test]
    fn verify_wrong_password() {
        let stored = PasswordHasher::USER.hash(b"secret");
        assert!(!PasswordHasher::USER.verify(&stored, b"Secret"));
        assert!(!PasswordHasher::USER.verify(&stored, b""));
    }

    #[test]
    fn fresh_salt_per_hash() {
        let a = PasswordHasher::USER.hash(b"same");
        let b = PasswordHasher::USER.hash(b"same");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a, b);
    }

    #[test]
    fn same_salt_is_deterministic() {
        let a = PasswordHasher::USER.hash_with_salt([7; SALT_LEN], b"pw");
        let b = PasswordHasher::USER.hash_with_salt([7; SALT_LEN], b"pw");
        assert_eq!(a, b);
    }

    #[test]
    fn domains_do_not_cross_verify() {
        let other = PasswordHasher::new("some-other-domain-v1");
        let stored = PasswordHasher::USER.hash(b"pw");
        assert!(!other.verify(&stored, b"pw"));
    }

    #[test]
    fn round_count_changes_digest() {
        let salt = [3; SALT_LEN];
        let single = PasswordHasher::new("lfs-user-password-v1").with_rounds(1);
        let stretched = PasswordHasher::USER.hash_with_salt(salt, b"pw");
        assert_ne!(single.hash_with_salt(salt, b"pw"), stretched);
        assert!(!single.verify(&stretched, b"pw"));
    }

    #[test]
    fn zero_rounds_matches_one_round() {
        let salt = [5; SALT_LEN];
        let zero = PasswordHasher::new("test-v1").with_rounds(0);
        let one = PasswordHasher::new("test-v1").with_rounds(1);
        assert_eq!(zero.hash_with_salt(salt, b"pw"), one.hash_with_salt(salt, b"pw"));
    }

    #[test]
    fn bytes_roundtrip_preserves_verification() {
        let stored = PasswordHasher::USER.hash(b"pw");
        let bytes = stored.to_bytes();
        assert_eq!(bytes.len(), PasswordHash::ENCODED_LEN);
        let parsed = PasswordHash::from_bytes(&bytes).unwrap();
        assert!(PasswordHasher::USER.verify(&parsed, b"pw"));
    }

    #[test]
    fn from_bytes_rejects_raw_password() {
        let err = PasswordHash::from_bytes(b"plaintext").unwrap_err();
        assert_eq!(
            err,
            PasswordError::InvalidLength {
                expected: 48,
                actual: 9
            }
        );
    }

    #[test]
    fn debug_hides_digest() {
        let stored = PasswordHasher::USER.hash(b"pw");
        assert_eq!(format!("{stored:?}"), "PasswordHash(..)");
    }
}
