/// `IndentTracker` - Bracket-balance indentation tracker
///
/// Carries a running nesting depth across the lines of a document and turns
/// per-line bracket deltas into the indent level each line should receive.
use crate::scan::strip_line;

/// Indentation settings, as supplied by the host editor or the CLI
#[derive(Debug, Clone)]
pub struct IndentSettings {
    /// Number of spaces per indent level (when `insert_spaces` is true)
    pub tab_size: usize,
    /// Indent with spaces rather than one tab per level
    pub insert_spaces: bool,
}

impl Default for IndentSettings {
    fn default() -> Self {
        Self {
            tab_size: 4,
            insert_spaces: true,
        }
    }
}

impl IndentSettings {
    /// The string inserted once per nesting level
    #[must_use]
    pub fn unit(&self) -> String {
        if self.insert_spaces {
            " ".repeat(self.tab_size)
        } else {
            "\t".to_string()
        }
    }
}

/// A full-line replacement for the zero-based line `line`
///
/// Produced only when the replacement differs from the line's current text.
/// The host applying the edits owns the document; the formatter core never
/// mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub line: usize,
    pub new_text: String,
}

/// Adjustment applied to the running depth for a dedent-hint line
pub type DedentAdjustment = fn(usize) -> usize;

/// A keyword-triggered indent adjustment
///
/// Lines whose trimmed text starts with `keyword` have their applied level
/// computed by `adjust` instead of taking the running depth directly. The
/// built-in rules are inert (identity adjustment); the table exists so
/// language-specific rules can be added without touching the main loop.
pub struct DedentRule {
    pub keyword: &'static str,
    pub adjust: DedentAdjustment,
}

fn keep_depth(depth: usize) -> usize {
    depth
}

/// The built-in dedent-hint rules: `else`, `rescue`, `other`, all inert
#[must_use]
pub fn default_dedent_rules() -> Vec<DedentRule> {
    ["else", "rescue", "other"]
        .into_iter()
        .map(|keyword| DedentRule {
            keyword,
            adjust: keep_depth,
        })
        .collect()
}

/// Tracks the running nesting depth across one formatting pass
pub struct IndentTracker {
    /// Current nesting depth, clamped at zero
    depth: usize,
    /// Keyword dedent rules, checked against the start of each trimmed line
    rules: Vec<DedentRule>,
}

impl Default for IndentTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl IndentTracker {
    /// Create a tracker with the built-in dedent rules
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(default_dedent_rules())
    }

    /// Create a tracker with a custom dedent-rule table
    #[must_use]
    pub fn with_rules(rules: Vec<DedentRule>) -> Self {
        Self { depth: 0, rules }
    }

    /// Current running depth
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Compute the indent level for one line and advance the running depth
    ///
    /// Returns `None` for blank (whitespace-only) lines, which contribute no
    /// edit and leave the depth untouched. For all other lines the applied
    /// level is the running depth, except that lines opening with a closing
    /// bracket dedent by one relative to their contents.
    pub fn process_line(&mut self, raw: &str) -> Option<usize> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let stripped = strip_line(raw);
        let open = stripped
            .chars()
            .filter(|c| matches!(c, '{' | '[' | '('))
            .count();
        let close = stripped
            .chars()
            .filter(|c| matches!(c, '}' | ']' | ')'))
            .count();

        let level = if trimmed.starts_with(['}', ']', ')']) {
            self.depth.saturating_sub(1)
        } else if let Some(rule) = self
            .rules
            .iter()
            .find(|rule| trimmed.starts_with(rule.keyword))
        {
            (rule.adjust)(self.depth)
        } else {
            self.depth
        };

        // depth = max(0, depth + open - close)
        self.depth = (self.depth + open).saturating_sub(close);

        Some(level)
    }
}

/// Compute re-indentation edits for a whole document
///
/// Runs a single pass over `lines` in order, O(total characters), and
/// returns one [`Edit`] per line whose current text differs from the
/// correctly indented one. Never fails on malformed input: unbalanced
/// brackets clamp the depth at zero and the scan continues.
#[must_use]
pub fn compute_edits<S: AsRef<str>>(lines: &[S], settings: &IndentSettings) -> Vec<Edit> {
    let unit = settings.unit();
    let mut tracker = IndentTracker::new();
    let mut edits = Vec::new();

    for (idx, raw) in lines.iter().enumerate() {
        let raw = raw.as_ref();
        let Some(level) = tracker.process_line(raw) else {
            continue;
        };

        let mut new_text = unit.repeat(level);
        new_text.push_str(raw.trim());
        if new_text != raw {
            edits.push(Edit {
                line: idx,
                new_text,
            });
        }
    }

    edits
}
