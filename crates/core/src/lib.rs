//! Lotus Threads Core - Shared types library.
//!
//! This crate provides common types used across all Lotus Threads components:
//! - `storefront` - Client library for the remote commerce API
//! - `cli` - Command-line storefront driver
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no filesystem access. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, products, cart lines, addresses, orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
