//! Application layer
//!
//! Orchestrates configuration loading and logging setup behind an explicitly
//! constructed [`AppContext`].

pub mod context;

pub use context::AppContext;
