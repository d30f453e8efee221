//! Validated wrapper types.
//!
//! These types enforce their invariants at construction time so the rest of
//! the app can pass them around without re-checking.

mod email;
pub mod gid;
mod shop;

pub use email::{Email, EmailError};
pub use shop::{ShopDomain, ShopDomainError};
