//! Template parsing and specificity scoring for routes
//!
//! Pure functions: same template in, same segments (or error) out. Parsing
//! is lexical only; constraint names are checked against a validator
//! registry later, when the route is added to a [`Router`](crate::Router).

use std::collections::HashSet;

use super::segment::{Parameter, Segment, WILDCARD_NAME};
use crate::{Constraint, RouteError};

/// Parses a route template into its segments
///
/// # Syntax
///
/// - `text` - literal, compared case-insensitively
/// - `{name}` - required parameter
/// - `{name:int:range(1,9)}` - parameter with ANDed constraints
/// - `{name?}` / `{name:int?}` - optional parameter
/// - `{name=value}` / `{name:int=1}` - parameter with a default
/// - `*` - wildcard, captured as `wildcard`
/// - `{**name}` / `{**name:regex(...)}` - catch-all
///
/// Slashes, colons and `=` inside a constraint's parentheses belong to the
/// argument, so `{**path:regex(^[a-z/-]+$)}` is a single segment.
///
/// # Errors
///
/// - both `*` and `{**name}` in one template
/// - a greedy segment that is not last
/// - a required segment after an optional or defaulted one
/// - a parameter that is both optional and defaulted
/// - a capture name used twice
/// - lexical problems (unbalanced braces, empty names)
///
/// # Examples
///
/// ```
/// use switchyard::route::parse_template;
///
/// let segments = parse_template("/api/my/{color}/{id:int?}/{name?}").unwrap();
/// assert_eq!(segments.len(), 5);
///
/// assert!(parse_template("/{a?}/b").is_err());
/// assert!(parse_template("/invalid/{**slug}/*").is_err());
/// assert!(parse_template("/{arg?=default}").is_err());
/// ```
pub fn parse_template(template: &str) -> Result<Vec<Segment>, RouteError> {
    let segments = split_template(template)?
        .into_iter()
        .map(|token| parse_segment(template, token))
        .collect::<Result<Vec<_>, _>>()?;

    check_shape(template, &segments)?;
    Ok(segments)
}

/// Sum of per-segment specificity weights
///
/// # Examples
///
/// ```
/// use switchyard::route::{parse_template, specificity};
///
/// let literal = parse_template("/docs/special").unwrap();
/// let wildcard = parse_template("/docs/*").unwrap();
/// assert!(specificity(&literal) > specificity(&wildcard));
/// ```
pub fn specificity(segments: &[Segment]) -> u32 {
    segments.iter().map(Segment::specificity).sum()
}

/// Splits on `/` outside braces and constraint arguments, dropping empty
/// tokens
fn split_template(template: &str) -> Result<Vec<&str>, RouteError> {
    let mut tokens = Vec::new();
    let mut braces = 0usize;
    let mut args = ArgumentScanner::default();
    let mut start = 0;

    for (idx, c) in template.char_indices() {
        // parentheses only open an argument inside a parameter
        if braces > 0 && !args.outside(c) {
            continue;
        }
        match c {
            ')' if braces > 0 => {
                return Err(RouteError::malformed(template, "unbalanced `)`"));
            }
            '{' => braces += 1,
            '}' => {
                braces = braces
                    .checked_sub(1)
                    .ok_or_else(|| RouteError::malformed(template, "unbalanced `}`"))?;
            }
            '/' if braces == 0 => {
                tokens.push(&template[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }

    if args.is_open() {
        return Err(RouteError::malformed(template, "unclosed `(`"));
    }
    if braces > 0 {
        return Err(RouteError::malformed(template, "unclosed `{`"));
    }
    tokens.push(&template[start..]);

    Ok(tokens.into_iter().filter(|t| !t.is_empty()).collect())
}

/// Classifies a single token
fn parse_segment(template: &str, token: &str) -> Result<Segment, RouteError> {
    if token == "*" {
        return Ok(Segment::Wildcard(WILDCARD_NAME.to_string()));
    }

    match token.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
        Some(inner) => match inner.strip_prefix("**") {
            Some(rest) => parse_catch_all(template, rest),
            None => parse_parameter(template, inner).map(Segment::Dynamic),
        },
        None if token.contains(['{', '}']) => Err(RouteError::malformed(
            template,
            format!("literal segment `{}` contains a brace", token),
        )),
        None => Ok(Segment::Literal(token.to_string())),
    }
}

/// Parses the inside of `{...}` for a dynamic segment
fn parse_parameter(template: &str, inner: &str) -> Result<Parameter, RouteError> {
    let (body, trailing_optional) = match inner.strip_suffix('?') {
        Some(body) => (body, true),
        None => (inner, false),
    };

    let (body, default) = match find_outside_parens(body, '=') {
        Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
        None => (body, None),
    };

    let mut parts = split_outside_parens(body, ':').into_iter();
    let head = parts.next().unwrap_or_default();
    let (name, named_optional) = match head.strip_suffix('?') {
        Some(name) => (name, true),
        None => (head, false),
    };

    if trailing_optional && named_optional {
        return Err(RouteError::malformed(template, format!("`{{{}}}` repeats `?`", inner)));
    }
    check_name(template, name)?;

    let optional = trailing_optional || named_optional;
    if optional && default.is_some() {
        return Err(RouteError::OptionalWithDefault {
            template: template.to_string(),
            parameter: name.to_string(),
        });
    }
    if default.is_some_and(str::is_empty) {
        return Err(RouteError::malformed(
            template,
            format!("parameter `{}` has an empty default", name),
        ));
    }

    Ok(Parameter {
        name: name.to_string(),
        constraints: parse_constraints(template, parts)?,
        optional,
        default: default.map(str::to_string),
    })
}

/// Parses the inside of `{**...}` after the stars
fn parse_catch_all(template: &str, rest: &str) -> Result<Segment, RouteError> {
    if rest.ends_with('?') || find_outside_parens(rest, '=').is_some() {
        return Err(RouteError::malformed(
            template,
            format!("catch-all `{{**{}}}` cannot be optional or have a default", rest),
        ));
    }

    let mut parts = split_outside_parens(rest, ':').into_iter();
    let name = parts.next().unwrap_or_default();
    check_name(template, name)?;

    Ok(Segment::CatchAll {
        name: name.to_string(),
        constraints: parse_constraints(template, parts)?,
    })
}

fn parse_constraints<'a>(
    template: &str,
    parts: impl Iterator<Item = &'a str>,
) -> Result<Vec<Constraint>, RouteError> {
    parts
        .map(|part| Constraint::parse(part).map_err(|reason| RouteError::malformed(template, reason)))
        .collect()
}

fn check_name(template: &str, name: &str) -> Result<(), RouteError> {
    if name.is_empty() {
        return Err(RouteError::malformed(template, "parameter name is empty"));
    }
    if let Some(c) = name.chars().find(|c| "{}()*?=:/".contains(*c) || c.is_whitespace()) {
        return Err(RouteError::malformed(
            template,
            format!("parameter name `{}` contains `{}`", name, c),
        ));
    }
    Ok(())
}

/// Enforces the structural invariants across all segments
fn check_shape(template: &str, segments: &[Segment]) -> Result<(), RouteError> {
    let has_wildcard = segments.iter().any(|s| matches!(s, Segment::Wildcard(_)));
    let has_catch_all = segments.iter().any(|s| matches!(s, Segment::CatchAll { .. }));
    if has_wildcard && has_catch_all {
        return Err(RouteError::ConflictingGreedy {
            template: template.to_string(),
        });
    }

    if let Some(greedy) = segments.iter().rev().skip(1).find(|s| s.is_greedy()) {
        return Err(RouteError::GreedyNotLast {
            template: template.to_string(),
            segment: greedy.to_string(),
        });
    }

    if let Some(first_omittable) = segments.iter().position(Segment::is_omittable) {
        if let Some(required) = segments[first_omittable..].iter().find(|s| !s.is_omittable()) {
            return Err(RouteError::OptionalBeforeRequired {
                template: template.to_string(),
                segment: required.to_string(),
            });
        }
    }

    let mut seen = HashSet::new();
    for name in segments.iter().filter_map(Segment::name) {
        if !seen.insert(name.to_lowercase()) {
            return Err(RouteError::DuplicateParameter {
                template: template.to_string(),
                parameter: name.to_string(),
            });
        }
    }

    Ok(())
}

/// Nesting state of constraint arguments
///
/// Inside `(...)` a backslash escapes the next character and a `[...]`
/// character class hides parentheses, so regex arguments such as `[(]+` or
/// `\(\d+\)` keep their balance.
#[derive(Debug, Default)]
struct ArgumentScanner {
    depth: usize,
    in_class: bool,
    escaped: bool,
}

impl ArgumentScanner {
    /// Consumes `c`; true when it lies outside every argument
    fn outside(&mut self, c: char) -> bool {
        if self.depth == 0 {
            if c == '(' {
                self.depth = 1;
                return false;
            }
            return true;
        }

        if self.escaped {
            self.escaped = false;
            return false;
        }
        match c {
            '\\' => self.escaped = true,
            ']' if self.in_class => self.in_class = false,
            _ if self.in_class => {}
            '[' => self.in_class = true,
            '(' => self.depth += 1,
            ')' => self.depth -= 1,
            _ => {}
        }
        false
    }

    fn is_open(&self) -> bool {
        self.depth > 0
    }
}

/// Splits on `sep` where it is not inside a constraint argument
fn split_outside_parens(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut args = ArgumentScanner::default();
    let mut start = 0;

    for (idx, c) in text.char_indices() {
        if args.outside(c) && c == sep {
            parts.push(&text[start..idx]);
            start = idx + c.len_utf8();
        }
    }
    parts.push(&text[start..]);
    parts
}

fn find_outside_parens(text: &str, needle: char) -> Option<usize> {
    let mut args = ArgumentScanner::default();
    text.char_indices()
        .find_map(|(idx, c)| (args.outside(c) && c == needle).then_some(idx))
}
