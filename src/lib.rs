//! Falling-block puzzle simulation (workspace facade crate).
//!
//! Re-exports the member crates under stable paths:
//! `falling_blocks::{core, types}`.

pub use falling_blocks_core as core;
pub use falling_blocks_types as types;
