//! Bazaar Core - Shared domain types.
//!
//! This crate provides the types shared by the Bazaar components:
//! - `storefront` - HTTP/JSON backend (records, checkout, orders)
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. Database encodings are behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for document IDs, emails, prices and order status

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
