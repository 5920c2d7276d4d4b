//! Platform Crate - Technical Infrastructure
//!
//! Domain-agnostic building blocks shared by the service crates:
//! - Password hashing (Argon2id)
//! - Signed, time-limited tokens (JWT / HS512)
//! - Object storage (S3 / MinIO) with per-call timeouts

pub mod object_store;
pub mod password;
pub mod token;
