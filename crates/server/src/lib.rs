//! Draft Order App server library.
//!
//! This crate provides the app backend as a library, allowing it to be
//! tested and reused; the binary in `main.rs` only wires configuration,
//! observability, and the listener around it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod db;
pub mod drafts;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
