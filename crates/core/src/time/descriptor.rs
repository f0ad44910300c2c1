//! Classified time descriptors.
//!
//! The upstream classifier emits a `{kind, value}` pair where the value
//! is either a single string token or a list of them. That loose shape is
//! decoded exactly once, here, into a tagged union; everything downstream
//! dispatches on typed variants instead of re-inspecting strings.

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Relative day keyword emitted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelativeDay {
    Yesterday,
    Today,
    Tomorrow,
}

impl RelativeDay {
    /// Offset in days relative to "today".
    pub fn offset_days(self) -> i64 {
        match self {
            RelativeDay::Yesterday => -1,
            RelativeDay::Today => 0,
            RelativeDay::Tomorrow => 1,
        }
    }
}

/// Week reference emitted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekRef {
    Current,
    Next,
}

/// A single classified time token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// `today` / `tomorrow` / `yesterday`.
    Relative(RelativeDay),
    /// An English weekday name (`Monday` .. `Sunday`).
    Weekday(Weekday),
    /// A partial date. A bare day number ("28") has no month and is
    /// completed with the current month at resolution time.
    PartialDate { day: u32, month: Option<u32> },
    /// `current_week` / `next_week`.
    WeekRef(WeekRef),
}

impl Token {
    /// Parses one raw classifier value into a token.
    ///
    /// Returns `None` for anything outside the classifier vocabulary,
    /// including malformed `dd/mm` values; callers treat those as
    /// unresolvable rather than as errors.
    pub fn parse(raw: &str) -> Option<Token> {
        let raw = raw.trim();
        match raw.to_ascii_lowercase().as_str() {
            "today" => return Some(Token::Relative(RelativeDay::Today)),
            "tomorrow" => return Some(Token::Relative(RelativeDay::Tomorrow)),
            "yesterday" => return Some(Token::Relative(RelativeDay::Yesterday)),
            "current_week" => return Some(Token::WeekRef(WeekRef::Current)),
            "next_week" => return Some(Token::WeekRef(WeekRef::Next)),
            _ => {}
        }

        if raw.contains('/') {
            return parse_partial_date(raw);
        }

        if raw.chars().all(|c| c.is_ascii_digit()) && !raw.is_empty() {
            let day: u32 = raw.parse().ok()?;
            if (1..=31).contains(&day) {
                return Some(Token::PartialDate { day, month: None });
            }
            return None;
        }

        raw.parse::<Weekday>().ok().map(Token::Weekday)
    }
}

/// Parses `dd/mm`. Three-segment values ("25/03/2024") are rejected, the
/// classifier is expected to emit day/month only.
fn parse_partial_date(raw: &str) -> Option<Token> {
    let mut parts = raw.split('/');
    let day: u32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    if (1..=31).contains(&day) && (1..=12).contains(&month) {
        Some(Token::PartialDate {
            day,
            month: Some(month),
        })
    } else {
        None
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Relative(RelativeDay::Yesterday) => write!(f, "yesterday"),
            Token::Relative(RelativeDay::Today) => write!(f, "today"),
            Token::Relative(RelativeDay::Tomorrow) => write!(f, "tomorrow"),
            Token::Weekday(day) => write!(f, "{day}"),
            Token::PartialDate {
                day,
                month: Some(month),
            } => write!(f, "{day:02}/{month:02}"),
            Token::PartialDate { day, month: None } => write!(f, "{day:02}"),
            Token::WeekRef(WeekRef::Current) => write!(f, "current_week"),
            Token::WeekRef(WeekRef::Next) => write!(f, "next_week"),
        }
    }
}

/// A descriptor value: one token or a list of them.
///
/// The classifier emits both shapes; keeping the distinction explicit is
/// what drives the single-token vs list branching in the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenSet {
    Single(Token),
    List(Vec<Token>),
}

impl TokenSet {
    /// Decodes raw classifier values into a token set.
    ///
    /// A single unparseable value degrades to an empty list, which
    /// resolves to the empty date set.
    pub fn from_raw(values: &[String]) -> TokenSet {
        if let [single] = values {
            return match Token::parse(single) {
                Some(token) => TokenSet::Single(token),
                None => TokenSet::List(Vec::new()),
            };
        }
        TokenSet::List(values.iter().filter_map(|v| Token::parse(v)).collect())
    }

    /// Tokens in this set, in classifier order.
    pub fn tokens(&self) -> &[Token] {
        match self {
            TokenSet::Single(token) => std::slice::from_ref(token),
            TokenSet::List(tokens) => tokens,
        }
    }
}

/// A classified time window descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeDescriptor {
    /// One or more specific days.
    Day(TokenSet),
    /// A whole week.
    Week(TokenSet),
    /// Month/year/semester-scale reference; deliberately unsupported.
    FarTime,
}

impl TimeDescriptor {
    /// Decodes a classifier `{kind, value}` pair.
    ///
    /// Unknown kinds map to [`TimeDescriptor::FarTime`], mirroring how
    /// classifier failures are treated.
    pub fn from_classifier(kind: &str, values: &[String]) -> TimeDescriptor {
        match kind.trim().to_ascii_lowercase().as_str() {
            "day" => TimeDescriptor::Day(TokenSet::from_raw(values)),
            "week" => TimeDescriptor::Week(TokenSet::from_raw(values)),
            _ => TimeDescriptor::FarTime,
        }
    }

    /// The descriptor kind as a lowercase label, used in cache keys and
    /// in the multi-day response header.
    pub fn kind_str(&self) -> &'static str {
        match self {
            TimeDescriptor::Day(_) => "day",
            TimeDescriptor::Week(_) => "week",
            TimeDescriptor::FarTime => "far_time",
        }
    }

    /// Canonical comma-joined token summary, used in cache key params so
    /// the same window always derives the same key.
    pub fn value_summary(&self) -> String {
        match self {
            TimeDescriptor::Day(set) | TimeDescriptor::Week(set) => {
                let mut parts: Vec<String> = set.tokens().iter().map(Token::to_string).collect();
                parts.sort();
                parts.join(",")
            }
            TimeDescriptor::FarTime => String::new(),
        }
    }
}
