//! services/api/src/adapters/mod.rs
//!
//! Concrete implementations of the core ports.

pub mod db;
pub mod identity;
pub mod memory;
pub mod session_cache;
