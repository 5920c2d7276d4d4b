//! Infrastructure Layer
//!
//! Database implementations of the User Directory.

pub mod postgres;

pub use postgres::PgUserRepository;
