//! Authentication primitives.
//!
//! - [`password`] -- pluggable credential hashing (Argon2id by default).
//! - [`jwt`] -- JWT access-token generation and validation.

pub mod jwt;
pub mod password;
