//! Shared types, errors, and configuration for Obralis.
//!
//! This crate provides common types used across all other crates:
//! - Currency codes (amounts ride on `rust_decimal::Decimal`)
//! - Pagination types for list endpoints
//! - JWT claims and token services
//! - Transactional email dispatch with provider fallback
//! - Configuration management

pub mod auth;
pub mod config;
pub mod email;
pub mod jwt;
pub mod types;

pub use auth::{Claims, TokenPair};
pub use config::AppConfig;
pub use email::{EmailError, EmailService};
pub use jwt::{JwtConfig, JwtError, JwtService};
