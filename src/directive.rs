//! Inline directive parsing for `~~ lunitefmt:` comments
//!
//! Supports in-file configuration overrides via special comments:
//! `~~ lunitefmt: --tab-size 2 --tabs`

use std::sync::LazyLock;

use regex::Regex;

/// Pattern to match lunitefmt directives
static LUNITEFMT_DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*~~\s*lunitefmt:\s*(.*)\s*$").unwrap());

/// Parsed directive options that can override config
#[derive(Debug, Default, Clone)]
pub struct DirectiveOverrides {
    pub tab_size: Option<usize>,
    pub insert_spaces: Option<bool>,
}

impl DirectiveOverrides {
    /// Check if any overrides are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tab_size.is_none() && self.insert_spaces.is_none()
    }
}

/// Check if a line contains a lunitefmt directive
#[must_use]
pub fn is_directive_line(line: &str) -> bool {
    LUNITEFMT_DIRECTIVE_RE.is_match(line)
}

/// Parse a lunitefmt directive line and return option overrides
///
/// Returns `Some(DirectiveOverrides)` if the line is a directive carrying at
/// least one recognized option, `None` otherwise.
#[must_use]
pub fn parse_directive(line: &str) -> Option<DirectiveOverrides> {
    let caps = LUNITEFMT_DIRECTIVE_RE.captures(line)?;
    let args_str = caps.get(1)?.as_str();

    // Parse the arguments like CLI args
    parse_directive_args(args_str)
}

/// Parse directive arguments into overrides
fn parse_directive_args(args_str: &str) -> Option<DirectiveOverrides> {
    let mut overrides = DirectiveOverrides::default();
    let tokens: Vec<&str> = args_str.split_whitespace().collect();
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            "-t" | "--tab-size" => {
                i += 1;
                if i < tokens.len() {
                    overrides.tab_size = tokens[i].parse().ok();
                }
            }
            "--tabs" => {
                overrides.insert_spaces = Some(false);
            }
            "--spaces" => {
                overrides.insert_spaces = Some(true);
            }
            _ => {
                // Unknown option, skip
            }
        }
        i += 1;
    }

    if overrides.is_empty() {
        None
    } else {
        Some(overrides)
    }
}

/// Scan input for lunitefmt directives and return the first found
///
/// Only the first directive is used (subsequent ones are ignored).
pub fn find_directive<R: std::io::BufRead>(input: &mut R) -> Option<DirectiveOverrides> {
    let mut buffer = String::new();

    while input.read_line(&mut buffer).ok()? > 0 {
        if is_directive_line(&buffer) {
            return parse_directive(&buffer);
        }
        buffer.clear();
    }

    None
}
