//! Core business logic for Obralis.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `balance` - Balance-consistency protocol for treasury projections
//! - `treasury` - Cash box / bank account transactions and check lifecycle
//! - `billing` - Client/provider bills and payment application rules
//! - `ledger` - Double-entry bookkeeping logic and auto-posting
//! - `stock` - Stock movement quantity rules
//! - `reports` - Trial balance, balance sheet, income statement
//! - `auth` - Password hashing

pub mod auth;
pub mod balance;
pub mod billing;
pub mod ledger;
pub mod reports;
pub mod stock;
pub mod treasury;
