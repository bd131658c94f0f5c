// ABOUTME: Masks SQL comments, string literals and quoted identifiers.
// ABOUTME: Lets the guard find real statement terminators and leading keywords.

/// Quoting and comment conventions of one SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexRules {
    /// `` `name` `` identifiers.
    pub backticks: bool,
    /// `[name]` identifiers.
    pub brackets: bool,
    /// `$tag$ ... $tag$` strings.
    pub dollar_quotes: bool,
    /// `E'...'` strings with backslash escapes.
    pub escape_strings: bool,
    /// Backslash escapes inside every `'...'` string.
    pub backslash_escapes: bool,
    /// Block comments nest.
    pub nested_comments: bool,
}

impl LexRules {
    pub const SQLITE: Self = Self {
        backticks: true,
        brackets: true,
        dollar_quotes: false,
        escape_strings: false,
        backslash_escapes: false,
        nested_comments: false,
    };

    pub const POSTGRES: Self = Self {
        backticks: false,
        brackets: false,
        dollar_quotes: true,
        escape_strings: true,
        backslash_escapes: false,
        nested_comments: true,
    };

    /// PostgreSQL with `standard_conforming_strings = off`.
    pub const POSTGRES_LEGACY: Self = Self {
        backslash_escapes: true,
        ..Self::POSTGRES
    };

    /// Every tokenization a query must pass.
    pub const ALL: [Self; 3] = [Self::SQLITE, Self::POSTGRES, Self::POSTGRES_LEGACY];
}

/// Replace every comment, string literal and quoted identifier with spaces.
///
/// The output has the same number of characters as the input. Unterminated
/// comments and literals run to the end of the text.
pub fn mask(sql: &str, rules: LexRules) -> String {
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(sql.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        i = match (c, next) {
            ('-', Some('-')) => line_comment(&chars, i, &mut out),
            ('/', Some('*')) => block_comment(&chars, i, rules.nested_comments, &mut out),
            ('E' | 'e', Some('\'')) if rules.escape_strings && !follows_word(&chars, i) => {
                out.push(' ');
                quoted(&chars, i + 1, '\'', true, &mut out)
            }
            ('\'', _) => quoted(&chars, i, '\'', rules.backslash_escapes, &mut out),
            ('"', _) => quoted(&chars, i, '"', false, &mut out),
            ('`', _) if rules.backticks => quoted(&chars, i, '`', false, &mut out),
            ('[', _) if rules.brackets => bracketed(&chars, i, &mut out),
            ('$', _) if rules.dollar_quotes && !follows_word(&chars, i) => {
                match dollar_tag(&chars, i) {
                    Some(len) => dollar_quoted(&chars, i, len, &mut out),
                    None => {
                        out.push(c);
                        i + 1
                    }
                }
            }
            _ => {
                out.push(c);
                i + 1
            }
        };
    }

    out
}

fn line_comment(chars: &[char], start: usize, out: &mut String) -> usize {
    let mut i = start;
    while i < chars.len() && chars[i] != '\n' {
        out.push(' ');
        i += 1;
    }
    i
}

fn block_comment(chars: &[char], start: usize, nested: bool, out: &mut String) -> usize {
    out.push_str("  ");
    let mut i = start + 2;
    let mut depth = 1;
    while i < chars.len() {
        match (chars[i], chars.get(i + 1).copied()) {
            ('*', Some('/')) => {
                out.push_str("  ");
                i += 2;
                depth -= 1;
                if depth == 0 {
                    return i;
                }
            }
            ('/', Some('*')) if nested => {
                out.push_str("  ");
                i += 2;
                depth += 1;
            }
            (c, _) => {
                out.push(blank(c));
                i += 1;
            }
        }
    }
    i
}

/// Consume a quoted run starting at `start`; a doubled quote is an escape,
/// and so is a backslash when `backslash` is set.
fn quoted(chars: &[char], start: usize, quote: char, backslash: bool, out: &mut String) -> usize {
    out.push(' ');
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        if backslash && c == '\\' {
            out.push(' ');
            if let Some(&escaped) = chars.get(i + 1) {
                out.push(blank(escaped));
            }
            i += 2;
            continue;
        }
        if c == quote {
            if chars.get(i + 1) == Some(&quote) {
                out.push_str("  ");
                i += 2;
                continue;
            }
            out.push(' ');
            return i + 1;
        }
        out.push(blank(c));
        i += 1;
    }
    chars.len()
}

/// `[name]` has no escapes; the first `]` closes it.
fn bracketed(chars: &[char], start: usize, out: &mut String) -> usize {
    out.push(' ');
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        out.push(blank(c));
        i += 1;
        if c == ']' {
            return i;
        }
    }
    i
}

/// Length of a `$tag$` opener at `start`, counting both dollar signs.
fn dollar_tag(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    match chars.get(i) {
        Some('$') => return Some(2),
        Some(c) if c.is_alphabetic() || *c == '_' => i += 1,
        _ => return None,
    }
    while let Some(&c) = chars.get(i) {
        if c == '$' {
            return Some(i - start + 1);
        }
        if !(c.is_alphanumeric() || c == '_') {
            return None;
        }
        i += 1;
    }
    None
}

fn dollar_quoted(chars: &[char], start: usize, tag_len: usize, out: &mut String) -> usize {
    let tag = &chars[start..start + tag_len];
    let mut i = start + tag_len;
    out.extend(std::iter::repeat_n(' ', tag_len));
    while i < chars.len() {
        if chars[i..].starts_with(tag) {
            out.extend(std::iter::repeat_n(' ', tag_len));
            return i + tag_len;
        }
        out.push(blank(chars[i]));
        i += 1;
    }
    i
}

/// Whether the character before `i` continues an identifier.
fn follows_word(chars: &[char], i: usize) -> bool {
    i > 0 && {
        let prev = chars[i - 1];
        prev.is_alphanumeric() || prev == '_' || prev == '$'
    }
}

fn blank(c: char) -> char {
    if c == '\n' { '\n' } else { ' ' }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite(sql: &str) -> String {
        mask(sql, LexRules::SQLITE)
    }

    fn postgres(sql: &str) -> String {
        mask(sql, LexRules::POSTGRES)
    }

    #[test]
    fn test_line_comment_masked() {
        let masked = sqlite("SELECT 1 -- drop\nFROM t");
        assert!(masked.starts_with("SELECT 1"));
        assert!(!masked.contains("drop"));
        assert!(masked.ends_with("\nFROM t"));
    }

    #[test]
    fn test_block_comment_masked() {
        let masked = sqlite("/* DELETE */SELECT 1");
        assert_eq!(masked.trim(), "SELECT 1");
    }

    #[test]
    fn test_semicolon_inside_literal_masked() {
        let masked = sqlite("SELECT 'a;b' AS x");
        assert!(!masked.contains(';'));
        assert!(masked.starts_with("SELECT"));
    }

    #[test]
    fn test_escaped_quote_stays_inside_literal() {
        let masked = sqlite("SELECT 'it''s; fine' FROM t");
        assert!(!masked.contains(';'));
        assert!(masked.ends_with("FROM t"));
    }

    #[test]
    fn test_unterminated_comment_runs_to_end() {
        let masked = sqlite("SELECT 1 /* ; DROP");
        assert_eq!(masked.trim(), "SELECT 1");
    }

    #[test]
    fn test_quoted_identifier_masked() {
        let masked = sqlite(r#"SELECT "weird;name" FROM t"#);
        assert!(!masked.contains(';'));
    }

    #[test]
    fn test_bracket_identifier_keeps_quote_inside() {
        let masked = sqlite("SELECT 1 AS [x']; SELECT 2");
        assert_eq!(masked, format!("SELECT 1 AS {}; SELECT 2", " ".repeat(4)));
    }

    #[test]
    fn test_brackets_only_in_sqlite() {
        assert!(postgres("SELECT a[1] FROM t").contains("[1]"));
    }

    #[test]
    fn test_dollar_quoted_string_masked() {
        let masked = postgres("SELECT $$'$$; SELECT 2");
        assert_eq!(masked, format!("SELECT {}; SELECT 2", " ".repeat(5)));

        let tagged = postgres("SELECT $fn$ a;b $fn$ FROM t");
        assert!(!tagged.contains(';'));
        assert!(tagged.ends_with("FROM t"));
    }

    #[test]
    fn test_positional_parameter_is_not_a_dollar_quote() {
        assert_eq!(postgres("SELECT $1; SELECT 2"), "SELECT $1; SELECT 2");
    }

    #[test]
    fn test_escape_string_backslash() {
        let masked = postgres(r"SELECT E'\''; SELECT 2");
        assert_eq!(masked, format!("SELECT {}; SELECT 2", " ".repeat(5)));
    }

    #[test]
    fn test_legacy_backslash_in_plain_strings() {
        let masked = mask(r"SELECT '\''; SELECT 2", LexRules::POSTGRES_LEGACY);
        assert!(masked.contains("; SELECT 2"));
        assert!(!sqlite(r"SELECT '\''; SELECT 2").contains("SELECT 2"));
    }

    #[test]
    fn test_nested_comments_in_postgres() {
        let masked = postgres("/* a /* b */ c */ SELECT 1");
        assert_eq!(masked.trim(), "SELECT 1");
        assert!(sqlite("/* a /* b */ c */ SELECT 1").contains("c */"));
    }

    #[test]
    fn test_length_preserved() {
        let sql = "SELECT E'\\n', $t$x$t$, [a b], `c`, 'd' /* e /* f */ */ -- g";
        for rules in LexRules::ALL {
            assert_eq!(mask(sql, rules).chars().count(), sql.chars().count());
        }
    }
}
