//! Shared types for the cart store
//!
//! Data models exchanged between the cart engine and its consumers,
//! plus time/ID utilities.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
