//! Segment model for route templates
//!
//! One [`Segment`] per `/`-delimited template position. Segments are plain
//! data: the parser builds them, the router reads them.

use std::fmt;

use crate::Constraint;

/// Capture name used by a bare `*` segment
pub const WILDCARD_NAME: &str = "wildcard";

/// Specificity weight of a literal segment
pub const LITERAL_WEIGHT: u32 = 1000;
/// Base specificity weight of a dynamic segment
pub const DYNAMIC_WEIGHT: u32 = 100;
/// Extra weight per constraint on a dynamic segment
pub const CONSTRAINT_WEIGHT: u32 = 10;
/// Constraints beyond this count add no further weight
pub const MAX_WEIGHTED_CONSTRAINTS: u32 = 50;
/// Specificity weight of a `*` segment
pub const WILDCARD_WEIGHT: u32 = 2;
/// Specificity weight of a `{**name}` segment
pub const CATCH_ALL_WEIGHT: u32 = 1;

/// A named capture: `{id}`, `{id:int?}`, `{category=Books}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    /// ANDed left to right
    pub constraints: Vec<Constraint>,
    pub optional: bool,
    pub default: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
            optional: false,
            default: None,
        }
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// One template position
///
/// # Examples
///
/// ```
/// use switchyard::route::parse_template;
/// use switchyard::Segment;
///
/// let segments = parse_template("/docs/{id:int?}").unwrap();
/// assert!(matches!(segments[0], Segment::Literal(_)));
/// assert!(segments[1].is_omittable());
///
/// let segments = parse_template("/blog/{**slug}").unwrap();
/// assert!(segments[1].is_greedy());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Exact text, compared case-insensitively
    Literal(String),
    /// `{name[:constraint]*[?|=default]}`
    Dynamic(Parameter),
    /// `*`: captures the remaining path as `/a/b/`
    Wildcard(String),
    /// `{**name[:constraint]*}`: captures the remaining path as `a/b`
    CatchAll {
        name: String,
        constraints: Vec<Constraint>,
    },
}

impl Segment {
    /// Optional or defaulted dynamic segments may be absent from the path
    pub fn is_omittable(&self) -> bool {
        match self {
            Segment::Dynamic(param) => param.optional || param.default.is_some(),
            _ => false,
        }
    }

    pub fn is_greedy(&self) -> bool {
        matches!(self, Segment::Wildcard(_) | Segment::CatchAll { .. })
    }

    /// Capture name, `None` for literals
    pub fn name(&self) -> Option<&str> {
        match self {
            Segment::Literal(_) => None,
            Segment::Dynamic(param) => Some(param.name.as_str()),
            Segment::Wildcard(name) | Segment::CatchAll { name, .. } => Some(name.as_str()),
        }
    }

    pub fn constraints(&self) -> &[Constraint] {
        match self {
            Segment::Dynamic(param) => &param.constraints,
            Segment::CatchAll { constraints, .. } => constraints,
            _ => &[],
        }
    }

    /// Structural weight, highest first: literal, dynamic (heavier with
    /// each constraint), wildcard, catch-all
    pub fn specificity(&self) -> u32 {
        match self {
            Segment::Literal(_) => LITERAL_WEIGHT,
            Segment::Dynamic(param) => {
                let constrained = (param.constraints.len() as u32).min(MAX_WEIGHTED_CONSTRAINTS);
                DYNAMIC_WEIGHT + CONSTRAINT_WEIGHT * constrained
            }
            Segment::Wildcard(_) => WILDCARD_WEIGHT,
            Segment::CatchAll { .. } => CATCH_ALL_WEIGHT,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => f.write_str(text),
            Segment::Dynamic(param) => {
                write!(f, "{{{}", param.name)?;
                for constraint in &param.constraints {
                    write!(f, ":{}", constraint)?;
                }
                if param.optional {
                    f.write_str("?")?;
                }
                if let Some(default) = &param.default {
                    write!(f, "={}", default)?;
                }
                f.write_str("}")
            }
            Segment::Wildcard(_) => f.write_str("*"),
            Segment::CatchAll { name, constraints } => {
                write!(f, "{{**{}", name)?;
                for constraint in constraints {
                    write!(f, ":{}", constraint)?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omittable() {
        assert!(!Segment::Literal("a".into()).is_omittable());
        assert!(!Segment::Dynamic(Parameter::new("id")).is_omittable());
        assert!(Segment::Dynamic(Parameter::new("id").optional()).is_omittable());
        assert!(Segment::Dynamic(Parameter::new("id").with_default("1")).is_omittable());
        assert!(!Segment::Wildcard(WILDCARD_NAME.into()).is_omittable());
    }

    #[test]
    fn test_specificity_order() {
        let literal = Segment::Literal("docs".into());
        let plain = Segment::Dynamic(Parameter::new("id"));
        let typed = Segment::Dynamic(Parameter::new("id").with_constraint(Constraint::new("int")));
        let wildcard = Segment::Wildcard(WILDCARD_NAME.into());
        let catch_all = Segment::CatchAll {
            name: "rest".into(),
            constraints: Vec::new(),
        };

        assert!(literal.specificity() > typed.specificity());
        assert!(typed.specificity() > plain.specificity());
        assert!(plain.specificity() > wildcard.specificity());
        assert!(wildcard.specificity() > catch_all.specificity());
    }

    #[test]
    fn test_heavily_constrained_dynamic_stays_below_literal() {
        let param = (0..200).fold(Parameter::new("x"), |p, _| p.with_constraint(Constraint::new("int")));
        assert!(Segment::Dynamic(param).specificity() < LITERAL_WEIGHT);
    }

    #[test]
    fn test_display() {
        let seg = Segment::Dynamic(
            Parameter::new("id")
                .with_constraint(Constraint::new("int"))
                .with_constraint(Constraint::with_argument("range", "1,5"))
                .optional(),
        );
        assert_eq!(seg.to_string(), "{id:int:range(1,5)?}");
        assert_eq!(
            Segment::Dynamic(Parameter::new("category").with_default("Books")).to_string(),
            "{category=Books}"
        );
    }
}
