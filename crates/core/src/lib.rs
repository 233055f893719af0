//! Core business logic for thbfx.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//!
//! # Modules
//!
//! - `currency` - Decimal parsing, THB conversion and the rate policy
//! - `auth` - Roles, the record access rule and password hashing
//! - `transaction` - Record validation and list query state

pub mod auth;
pub mod currency;
pub mod transaction;
