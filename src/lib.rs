//! lunitefmt - Auto-indentation formatter for Lunite source code
//!
//! Rewrites the leading whitespace of each line to match the nesting depth
//! implied by brace/bracket/paren balance, ignoring brackets that appear
//! inside string literals or comments.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cli;
pub mod config;
pub mod directive;
pub mod error;
pub mod indent;
pub mod pipeline;
pub mod scan;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::Config;
pub use directive::{find_directive, parse_directive, DirectiveOverrides};
pub use error::Result;
pub use indent::{compute_edits, Edit, IndentSettings, IndentTracker};
pub use pipeline::{format_file, format_source};
pub use scan::{strip_line, CodeFilter};
