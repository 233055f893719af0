//! Shared types, errors, and configuration for thbfx.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types with field-level validation details
//! - Configuration management
//! - JWT token handling and auth payloads
//! - The Bank of Thailand exchange-rate client

pub mod auth;
pub mod bot;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{Claims, TokenKind};
pub use bot::{BotClient, BotRate, ExchangeRateProvider};
pub use config::{AppConfig, BotConfig};
pub use error::{AppError, AppResult, FieldErrors};
pub use jwt::{JwtConfig, JwtError, JwtService};
