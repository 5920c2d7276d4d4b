//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary every crate agrees on:
//! - the unified [`error::app_error::AppError`] and its HTTP encoding
//! - typed identifiers ([`id::UserId`], [`id::PostId`], [`id::ImageId`])
//!
//! Only things that are hard to change and mean the same thing in every
//! domain belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
