//! Data models
//!
//! Shared between the cart engine and its consumers (UI layer, tests).
//! Line IDs are strings: remote lines carry the record key assigned by the
//! persistence layer, guest lines carry a synthesized time-based token.

pub mod cart_line;
pub mod catalog;

// Re-exports
pub use cart_line::*;
pub use catalog::*;
