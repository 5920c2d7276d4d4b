//! Domain Layer - Posts and their images
//!
//! This layer contains:
//! - Domain entities (Post, Image)
//! - Domain value objects (PostStatus, IdempotencyKey)
//! - Repository traits (Post Store)

pub mod entities;
pub mod repository;
pub mod value_objects;
