//! Draft Order App Core - Shared types library.
//!
//! This crate provides common types used across the Draft Order App
//! components:
//! - `server` - The app backend (widget endpoint + merchant settings API)
//! - `integration-tests` - Black-box tests over the server library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Validated wrappers for shop domains and email addresses,
//!   plus Shopify global ID construction

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
