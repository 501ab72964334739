//! Credential primitives for the LFS metadata store.
//!
//! Passwords are never stored as given: each one is hashed with a fresh
//! random salt under a domain-separated BLAKE3 hasher, then stretched over
//! many keyed rounds so a leaked digest is costly to brute-force. All crypto
//! operations wrap established libraries — no custom cryptography.

pub mod password;

pub use password::{PasswordError, PasswordHash, PasswordHasher, DEFAULT_ROUNDS};
