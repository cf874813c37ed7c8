//! # tc-core
//!
//! Core types shared across all other crates in the workspace: the error
//! taxonomy, the `ensure!` / `fail!` macros, and [`SwapHandle`], the
//! atomically replaceable snapshot used to publish rebuilt calendar indexes.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `fail!` macros.
pub mod errors;

/// Shared snapshot handle (`SwapHandle<T>`).
pub mod handle;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use handle::SwapHandle;
