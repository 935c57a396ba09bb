//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, base64url, constant-time compare)
//! - Password hashing (Argon2id)
//! - Signed, expiring tokens carrying an optional payload

pub mod crypto;
pub mod password;
pub mod token;
