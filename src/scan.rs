/// `CodeFilter` - Iterator that filters out strings and comments
///
/// Wraps a single line of text and yields only the characters that are
/// actual Lunite code, skipping string literal contents and comments. The
/// indent calculator uses the filtered output purely for bracket counting.
///
/// Scan state is strictly local to one line: a block comment is recognized
/// only when its `~*` opener and `*~` closer appear on the same line, and an
/// unterminated string dies with the line it started on.

/// Type of string delimiter we're currently inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringDelimiter {
    #[default]
    None,
    Single, // '...'
    Double, // "..."
}

impl StringDelimiter {
    fn quote(self) -> Option<char> {
        match self {
            StringDelimiter::None => None,
            StringDelimiter::Single => Some('\''),
            StringDelimiter::Double => Some('"'),
        }
    }
}

/// Iterator adapter that filters out strings and comments
///
/// Yields (position, character) pairs for only the actual code, skipping
/// over string contents, block comments, and line comments.
pub struct CodeFilter<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    instring: StringDelimiter,
    /// Set once a `~~` line comment is seen; nothing after it is yielded
    incomment: bool,
    /// Most recently consumed character
    last: Option<char>,
    /// Character consumed immediately before `last`, for escaped quotes
    prev: Option<char>,
}

impl<'a> CodeFilter<'a> {
    /// Create a new `CodeFilter` over one line of text
    #[must_use]
    pub fn new(line: &'a str) -> Self {
        Self {
            chars: line.char_indices().peekable(),
            instring: StringDelimiter::None,
            incomment: false,
            last: None,
            prev: None,
        }
    }

    /// Check if we're currently inside a string
    #[must_use]
    pub fn instring(&self) -> bool {
        self.instring != StringDelimiter::None
    }

    /// Get the filtered content as a string
    ///
    /// Pre-allocates the result string based on the input size for efficiency.
    pub fn filter_all(&mut self) -> String {
        let size_hint = self.chars.size_hint().0;
        let mut result = String::with_capacity(size_hint);
        for (_, c) in self.by_ref() {
            result.push(c);
        }
        result
    }

    /// Peek at the next character without consuming
    fn peek_next_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Consume the next character, tracking it for escape detection
    fn bump(&mut self) -> Option<(usize, char)> {
        let (pos, c) = self.chars.next()?;
        self.prev = self.last;
        self.last = Some(c);
        Some((pos, c))
    }

    /// Skip past a block comment body, consuming the `*~` closer if present
    fn skip_block_comment(&mut self) {
        while let Some((_, c)) = self.bump() {
            if c == '*' && self.peek_next_char() == Some('~') {
                self.bump();
                return;
            }
        }
    }
}

impl Iterator for CodeFilter<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.incomment {
                return None;
            }
            let (pos, c) = self.bump()?;

            if self.instring == StringDelimiter::None {
                if c == '~' {
                    match self.peek_next_char() {
                        // Block comment: skip to the `*~` closer or to end of line
                        Some('*') => {
                            self.bump();
                            self.skip_block_comment();
                            continue;
                        }
                        // Line comment: nothing after the marker is code
                        Some('~') => {
                            self.incomment = true;
                            return None;
                        }
                        _ => {}
                    }
                }
                if c == '\'' {
                    self.instring = StringDelimiter::Single;
                    continue;
                }
                if c == '"' {
                    self.instring = StringDelimiter::Double;
                    continue;
                }
                return Some((pos, c));
            }

            // Inside a string: contents and quotes never reach the output.
            // A quote preceded by a backslash does not close the string.
            if Some(c) == self.instring.quote() && self.prev != Some('\\') {
                self.instring = StringDelimiter::None;
            }
        }
    }
}

/// Strip string literals and comments from one line of text
///
/// Convenience wrapper around [`CodeFilter`] returning the surviving code
/// characters as a `String`.
#[must_use]
pub fn strip_line(line: &str) -> String {
    CodeFilter::new(line).filter_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_strings_or_comments() {
        let input = "x = foo(a, b)";
        assert_eq!(strip_line(input), input);
    }

    #[test]
    fn test_filter_double_quoted_string() {
        assert_eq!(strip_line(r#"x = "hello" + 5"#), "x =  + 5");
    }

    #[test]
    fn test_filter_single_quoted_string() {
        assert_eq!(strip_line("x = 'hello' + 5"), "x =  + 5");
    }

    #[test]
    fn test_brackets_inside_string_not_emitted() {
        let result = strip_line(r#"foo("a{b}c")"#);
        assert!(!result.contains('{'));
        assert!(!result.contains('}'));
        assert_eq!(result, "foo()");
    }

    #[test]
    fn test_escaped_quote_stays_in_string() {
        // The \" does not close the string; the { stays hidden
        let result = strip_line(r#"x = "a\"{" + y"#);
        assert!(!result.contains('{'));
        assert_eq!(result, "x =  + y");
    }

    #[test]
    fn test_quote_of_other_kind_inside_string() {
        assert_eq!(strip_line(r#"x = "it's fine" + y"#), "x =  + y");
    }

    #[test]
    fn test_line_comment_truncates() {
        assert_eq!(strip_line("x = 1 ~~ { ignored"), "x = 1 ");
    }

    #[test]
    fn test_line_comment_marker_inside_string() {
        assert_eq!(strip_line(r#"x = "~~ not a comment" + 1"#), "x =  + 1");
    }

    #[test]
    fn test_block_comment_same_line() {
        let result = strip_line("a ~* { not counted } *~ b");
        assert!(!result.contains('{'));
        assert!(!result.contains('}'));
        assert_eq!(result, "a  b");
    }

    #[test]
    fn test_block_comment_unterminated_skips_to_eol() {
        assert_eq!(strip_line("a ~* rest { is gone"), "a ");
    }

    #[test]
    fn test_block_comment_inside_string() {
        assert_eq!(strip_line(r#"x = "~* kept *~" + 1"#), "x =  + 1");
    }

    #[test]
    fn test_lone_tilde_is_code() {
        assert_eq!(strip_line("a ~ b"), "a ~ b");
    }

    #[test]
    fn test_unterminated_string_swallows_rest_of_line() {
        assert_eq!(strip_line(r#"x = "unclosed { ["#), "x = ");
    }

    #[test]
    fn test_instring_check() {
        let mut filter = CodeFilter::new(r#"x = "hello""#);
        assert!(!filter.instring());
        // Drain; the closing quote resets the state
        filter.filter_all();
        assert!(!filter.instring());
    }

    #[test]
    fn test_position_tracking() {
        let filter = CodeFilter::new("x = 5");
        let positions: Vec<usize> = filter.map(|(pos, _)| pos).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(strip_line(""), "");
    }
}
