//! Infrastructure Layer
//!
//! PostgreSQL implementation of the Post Store.

pub mod postgres;

pub use postgres::PgPostRepository;
