//! Whole-document formatting pipeline
//!
//! Reads a document, computes re-indentation edits with
//! [`compute_edits`](crate::indent::compute_edits), applies them, and writes
//! the result. Line terminator style (LF vs CRLF) and the presence of a
//! trailing newline are preserved.

use std::io::{BufRead, Write};

use crate::config::Config;
use crate::indent::{compute_edits, IndentSettings};
use crate::Result;

/// Result of formatting one document in memory
#[derive(Debug)]
pub struct FormatOutcome {
    /// The formatted document text
    pub text: String,
    /// Number of lines whose indentation changed
    pub changed_lines: usize,
}

/// Format a document held in memory
///
/// Splits `source` into lines, computes edits, and rebuilds the document
/// with the edits applied. The input's line terminator style and trailing
/// newline are reproduced in the output.
#[must_use]
pub fn format_source(source: &str, settings: &IndentSettings) -> FormatOutcome {
    let eol = if source.contains("\r\n") { "\r\n" } else { "\n" };
    let had_trailing_newline = source.ends_with('\n');

    let mut lines: Vec<&str> = source.split('\n').collect();
    if had_trailing_newline {
        // split leaves an empty tail entry after the final newline
        lines.pop();
    }
    let lines: Vec<&str> = lines
        .into_iter()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let edits = compute_edits(&lines, settings);
    let changed_lines = edits.len();

    let mut replaced: Vec<&str> = lines;
    let edit_texts: Vec<(usize, String)> = edits
        .into_iter()
        .map(|edit| (edit.line, edit.new_text))
        .collect();
    for (line, text) in &edit_texts {
        replaced[*line] = text.as_str();
    }

    let mut text = replaced.join(eol);
    if had_trailing_newline {
        text.push_str(eol);
    }

    FormatOutcome {
        text,
        changed_lines,
    }
}

/// Format a document from a reader to a writer
///
/// Returns the number of lines whose indentation changed. The entire input
/// is read before any output is produced, so `input` and `output` may be
/// backed by the same file.
pub fn format_file<R: BufRead, W: Write>(
    mut input: R,
    output: &mut W,
    config: &Config,
) -> Result<usize> {
    let mut source = String::new();
    input.read_to_string(&mut source)?;

    let outcome = format_source(&source, &config.indent_settings());
    output.write_all(outcome.text.as_bytes())?;

    Ok(outcome.changed_lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    fn settings(tab_size: usize) -> IndentSettings {
        IndentSettings {
            tab_size,
            insert_spaces: true,
        }
    }

    #[test]
    fn test_format_source_simple() {
        let source = "foo {\nbar()\n}\n";
        let outcome = format_source(source, &settings(2));
        assert_eq!(outcome.text, "foo {\n  bar()\n}\n");
        assert_eq!(outcome.changed_lines, 1);
    }

    #[test]
    fn test_format_source_already_formatted() {
        let source = "foo {\n  bar()\n}\n";
        let outcome = format_source(source, &settings(2));
        assert_eq!(outcome.text, source);
        assert_eq!(outcome.changed_lines, 0);
    }

    #[test]
    fn test_format_source_preserves_crlf() {
        let source = "foo {\r\nbar()\r\n}\r\n";
        let outcome = format_source(source, &settings(2));
        assert_eq!(outcome.text, "foo {\r\n  bar()\r\n}\r\n");
    }

    #[test]
    fn test_format_source_no_trailing_newline() {
        let source = "foo {\nbar()\n}";
        let outcome = format_source(source, &settings(2));
        assert_eq!(outcome.text, "foo {\n  bar()\n}");
    }

    #[test]
    fn test_format_source_blank_lines_kept() {
        let source = "foo {\n\nbar()\n}\n";
        let outcome = format_source(source, &settings(2));
        assert_eq!(outcome.text, "foo {\n\n  bar()\n}\n");
    }

    #[test]
    fn test_format_source_empty() {
        let outcome = format_source("", &settings(2));
        assert_eq!(outcome.text, "");
        assert_eq!(outcome.changed_lines, 0);
    }

    #[test]
    fn test_format_file_roundtrip() {
        let source = "a [\nb,\n]\n";
        let reader = BufReader::new(Cursor::new(source));
        let mut output = Vec::new();
        let changed = format_file(reader, &mut output, &Config {
            tab_size: 2,
            insert_spaces: true,
        })
        .unwrap();
        assert_eq!(changed, 1);
        assert_eq!(String::from_utf8(output).unwrap(), "a [\n  b,\n]\n");
    }
}
