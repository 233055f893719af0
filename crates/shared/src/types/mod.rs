//! Common types used across the application.

pub mod id;
pub mod pagination;

pub use id::UserId;
pub use pagination::{PageMeta, PageRequest, PageResponse};
