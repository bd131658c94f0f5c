// ABOUTME: Query guard - static read-only classification of candidate SQL.
// ABOUTME: Pure function over the query text; no database access.

mod lexer;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

pub use lexer::{LexRules, mask};

/// Keywords that are never allowed anywhere in a query, in any case.
pub const FORBIDDEN_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "TRUNCATE", "CREATE", "GRANT", "REVOKE",
    "EXEC", "EXECUTE", "CALL", "REPLACE", "MERGE", "UPSERT", "DECLARE", "SET", "USE", "BEGIN",
    "COMMIT", "ROLLBACK", "ATTACH", "DETACH", "COPY", "PRAGMA", "VACUUM", "LOCK", "INTO",
];

static FORBIDDEN: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"\b({})\b", FORBIDDEN_KEYWORDS.join("|"));
    Regex::new(&pattern).expect("forbidden keyword pattern is valid")
});

static SELECT_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bSELECT\b").expect("select pattern is valid"));

/// Why a query was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Nothing left after removing comments and whitespace.
    Empty,
    /// The statement does not start with SELECT or WITH ... SELECT.
    NotReadOnly { keyword: String },
    /// A write/DDL/session keyword appears somewhere in the text.
    ForbiddenKeyword { keyword: String },
    /// A statement terminator is followed by another statement.
    MultipleStatements,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("destructive or multi-statement SQL detected: ")?;
        match self {
            RejectReason::Empty => f.write_str("query is empty"),
            RejectReason::NotReadOnly { keyword } => write!(
                f,
                "only SELECT or WITH ... SELECT statements are allowed, found '{}'",
                keyword
            ),
            RejectReason::ForbiddenKeyword { keyword } => {
                write!(f, "forbidden keyword {}", keyword)
            }
            RejectReason::MultipleStatements => f.write_str("multiple statements are not allowed"),
        }
    }
}

/// The guard's allow/reject decision for one query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub allowed: bool,
    pub reason: String,
    pub rejection: Option<RejectReason>,
}

impl Verdict {
    fn allow() -> Self {
        Self {
            allowed: true,
            reason: "read-only query".to_string(),
            rejection: None,
        }
    }

    fn reject(reason: RejectReason) -> Self {
        Self {
            allowed: false,
            reason: reason.to_string(),
            rejection: Some(reason),
        }
    }
}

/// Classify a candidate SQL string as read-only-safe or rejected.
///
/// Comments and quoted text are ignored when locating statement terminators
/// and the leading keyword, but the forbidden-keyword scan runs over the raw
/// text so nothing can be hidden inside a comment or a literal. The text must
/// read as one read-only statement under every dialect's quoting rules, so a
/// quote that only one dialect treats as text cannot hide a terminator.
pub fn classify(sql: &str) -> Verdict {
    let readings: Vec<String> = LexRules::ALL
        .iter()
        .map(|rules| mask(sql, *rules).trim().to_uppercase())
        .collect();
    if readings.iter().any(|body| body.is_empty()) {
        return Verdict::reject(RejectReason::Empty);
    }

    let raw_upper = sql.to_uppercase();
    if let Some(m) = FORBIDDEN.find(&raw_upper) {
        return Verdict::reject(RejectReason::ForbiddenKeyword {
            keyword: m.as_str().to_string(),
        });
    }

    if readings.iter().any(|body| has_second_statement(body)) {
        return Verdict::reject(RejectReason::MultipleStatements);
    }

    for body in &readings {
        let leading = leading_keyword(body);
        match leading.as_str() {
            "SELECT" => {}
            "WITH" if SELECT_WORD.is_match(body) => {}
            _ => return Verdict::reject(RejectReason::NotReadOnly { keyword: leading }),
        }
    }
    Verdict::allow()
}

fn has_second_statement(body: &str) -> bool {
    body.find(';')
        .is_some_and(|pos| !body[pos + 1..].trim().is_empty())
}

/// First word of the statement, skipping opening parentheses.
fn leading_keyword(upper: &str) -> String {
    let rest = upper.trim_start_matches(|c: char| c == '(' || c.is_whitespace());
    let word: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if word.is_empty() {
        rest.chars().take(16).collect()
    } else {
        word
    }
}
