//! Built-in constraint validators
//!
//! | name | passes when |
//! |---|---|
//! | `int` | value parses as a base-10 integer |
//! | `string` | always (explicit untyped marker, lowest precedence) |
//! | `alpha` | non-empty, every character is a letter |
//! | `guid` | value parses as a UUID |
//! | `datetime` | value parses as an invariant date or date-time |
//! | `length(n)` / `length(min,max)` | character count equals `n` / lies in `[min, max]` |
//! | `minlength(n)` / `maxlength(n)` | character count is at least / at most `n` |
//! | `range(min,max)` | integer within `[min, max]` |
//! | `min(n)` / `max(n)` | integer at least / at most `n` |
//! | `regex(pattern)` | case-insensitive, anchored full match |
//! | `required` | non-empty |
//!
//! A malformed argument (`length(abc)`, `range(5)`) makes the check fail
//! rather than panic.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::{Regex, RegexBuilder};
use uuid::Uuid;

use super::{Constraint, ValidatorRegistry, DEFAULT_PRIORITY, STRING_PRIORITY};

/// Compiled `regex(...)` arguments, keyed by raw pattern text
///
/// `None` marks a pattern that failed to compile so the failure is only
/// logged once.
static REGEX_CACHE: Lazy<RwLock<HashMap<String, Option<Regex>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Installs every built-in into `registry`
pub(crate) fn register(registry: &mut ValidatorRegistry) {
    registry.add("int", DEFAULT_PRIORITY, |value, _| is_int(value));
    registry.add("string", STRING_PRIORITY, |_, _| true);
    registry.add("alpha", DEFAULT_PRIORITY, |value, _| is_alpha(value));
    registry.add("guid", DEFAULT_PRIORITY, |value, _| is_guid(value));
    registry.add("datetime", DEFAULT_PRIORITY, |value, _| {
        parse_datetime(value).is_some()
    });
    registry.add("length", DEFAULT_PRIORITY, length);
    registry.add("minlength", DEFAULT_PRIORITY, |value, c| {
        single_bound::<usize>(c).is_some_and(|min| char_len(value) >= min)
    });
    registry.add("maxlength", DEFAULT_PRIORITY, |value, c| {
        single_bound::<usize>(c).is_some_and(|max| char_len(value) <= max)
    });
    registry.add("range", DEFAULT_PRIORITY, range);
    registry.add("min", DEFAULT_PRIORITY, |value, c| {
        match (value.parse::<i64>(), single_bound::<i64>(c)) {
            (Ok(n), Some(min)) => n >= min,
            _ => false,
        }
    });
    registry.add("max", DEFAULT_PRIORITY, |value, c| {
        match (value.parse::<i64>(), single_bound::<i64>(c)) {
            (Ok(n), Some(max)) => n <= max,
            _ => false,
        }
    });
    registry.add("regex", DEFAULT_PRIORITY, |value, c| {
        c.argument().is_some_and(|pattern| matches_pattern(value, pattern))
    });
    registry.add("required", DEFAULT_PRIORITY, |value, _| !value.is_empty());
}

pub fn is_int(value: &str) -> bool {
    value.parse::<i64>().is_ok()
}

pub fn is_alpha(value: &str) -> bool {
    !value.is_empty() && value.chars().all(char::is_alphabetic)
}

pub fn is_guid(value: &str) -> bool {
    Uuid::try_parse(value).is_ok()
}

/// Parses the invariant date and date-time shapes accepted by `datetime`
///
/// RFC 3339 timestamps are converted to UTC; bare dates map to midnight.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Anchored, case-insensitive match against a cached compiled pattern
pub fn matches_pattern(value: &str, pattern: &str) -> bool {
    if let Some(compiled) = REGEX_CACHE.read().get(pattern) {
        return compiled.as_ref().is_some_and(|re| re.is_match(value));
    }

    let compiled = compile_anchored(pattern)
        .map_err(|err| tracing::warn!("Invalid regex constraint `{}`: {}", pattern, err))
        .ok();
    let is_match = compiled.as_ref().is_some_and(|re| re.is_match(value));
    REGEX_CACHE.write().insert(pattern.to_string(), compiled);
    is_match
}

/// Compiles `pattern` so that it must match the whole value
pub(crate) fn compile_anchored(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!("^(?:{})$", pattern))
        .case_insensitive(true)
        .build()
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn single_bound<T: std::str::FromStr>(constraint: &Constraint) -> Option<T> {
    match constraint.arguments().as_slice() {
        [bound] => bound.parse().ok(),
        _ => None,
    }
}

fn length(value: &str, constraint: &Constraint) -> bool {
    let len = char_len(value);
    match constraint.arguments().as_slice() {
        [exact] => exact.parse::<usize>().is_ok_and(|n| len == n),
        [min, max] => match (min.parse::<usize>(), max.parse::<usize>()) {
            (Ok(min), Ok(max)) => (min..=max).contains(&len),
            _ => false,
        },
        _ => false,
    }
}

fn range(value: &str, constraint: &Constraint) -> bool {
    let Ok(n) = value.parse::<i64>() else {
        return false;
    };
    match constraint.arguments().as_slice() {
        [min, max] => match (min.parse::<i64>(), max.parse::<i64>()) {
            (Ok(min), Ok(max)) => (min..=max).contains(&n),
            _ => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn check(value: &str, constraint: &str) -> bool {
        let registry = ValidatorRegistry::new();
        registry.validate(value, &Constraint::parse(constraint).unwrap())
    }

    #[rstest]
    #[case("123", true)]
    #[case("-51", true)]
    #[case("0", true)]
    #[case("abc", false)]
    #[case("12.5", false)]
    #[case("", false)]
    fn test_int(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(check(value, "int"), expected);
    }

    #[rstest]
    #[case("electronics", true)]
    #[case("Books", true)]
    #[case("123", false)]
    #[case("games-and-toys", false)]
    #[case("", false)]
    fn test_alpha(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(check(value, "alpha"), expected);
    }

    #[test]
    fn test_guid() {
        assert!(check("550e8400-e29b-41d4-a716-446655440000", "guid"));
        assert!(check("550E8400-E29B-41D4-A716-446655440000", "guid"));
        assert!(!check("invalid-guid", "guid"));
        assert!(!check("not-a-guid", "guid"));
    }

    #[rstest]
    #[case("2023-12-25", true)]
    #[case("2023-12-25T10:30:00", true)]
    #[case("2023-12-25T10:30:00Z", true)]
    #[case("2023-13-01", false)]
    #[case("invalid-date", false)]
    fn test_datetime(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(check(value, "datetime"), expected);
    }

    #[rstest]
    #[case("12345", "length(5)", true)]
    #[case("1234", "length(5)", false)]
    #[case("abc", "length(2,4)", true)]
    #[case("a", "length(2,4)", false)]
    #[case("abcde", "length(2,4)", false)]
    #[case("john", "minlength(3)", true)]
    #[case("jo", "minlength(3)", false)]
    #[case("short", "maxlength(10)", true)]
    #[case("verylongtext", "maxlength(10)", false)]
    #[case("abc", "length(x)", false)]
    fn test_lengths(#[case] value: &str, #[case] constraint: &str, #[case] expected: bool) {
        assert_eq!(check(value, constraint), expected);
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(check("über", "length(4)"));
    }

    #[rstest]
    #[case("25", "range(-50,50)", true)]
    #[case("-50", "range(-50,50)", true)]
    #[case("100", "range(-50,50)", false)]
    #[case("-51", "range(-50,50)", false)]
    #[case("50", "range(0, 100)", true)]
    #[case("abc", "range(0,100)", false)]
    #[case("5", "range(5)", false)]
    #[case("1", "min(1)", true)]
    #[case("0", "min(1)", false)]
    #[case("120", "max(120)", true)]
    #[case("150", "max(120)", false)]
    fn test_numeric_bounds(#[case] value: &str, #[case] constraint: &str, #[case] expected: bool) {
        assert_eq!(check(value, constraint), expected);
    }

    #[test]
    fn test_regex_is_anchored() {
        assert!(check("social-media", "regex([a-z-]+)"));
        assert!(!check("social media!", "regex([a-z-]+)"));
        assert!(!check("ab", "regex(a)"));
    }

    #[test]
    fn test_regex_is_case_insensitive() {
        assert!(check("Social-Media", "regex([a-z-]+)"));
    }

    #[test]
    fn test_regex_with_explicit_anchors() {
        assert!(check("some/path-here", "regex(^[a-z/-]+$)"));
        assert!(!check("InvalidPath123", "regex(^[a-z/-]+$)"));
    }

    #[test]
    fn test_invalid_regex_never_matches() {
        assert!(!check("abc", "regex([a-)"));
        // cached failure takes the fast path
        assert!(!check("abc", "regex([a-)"));
    }

    #[test]
    fn test_required_and_string() {
        assert!(check("hello", "required"));
        assert!(!check("", "required"));
        assert!(check("", "string"));
        assert!(check("anything at all", "string"));
    }

    #[test]
    fn test_parse_datetime_midnight_for_dates() {
        let dt = parse_datetime("2023-12-25").unwrap();
        assert_eq!(dt.to_string(), "2023-12-25 00:00:00");
    }
}
