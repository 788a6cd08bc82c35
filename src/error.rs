//! Error types and result aliases for lunitefmt.
//!
//! The formatter core is best-effort and never fails on malformed input;
//! errors only arise from I/O and configuration in the surrounding layers.
//! [`Result<T>`] is a type alias for `anyhow::Result<T>` used throughout.

use anyhow::Result as AnyhowResult;

pub type Result<T> = AnyhowResult<T>;
