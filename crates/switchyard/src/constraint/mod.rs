//! Constraint validators for dynamic route segments
//!
//! A [`Constraint`] is what a template says (`int`, `range(1,12)`,
//! `regex(^[a-z-]+$)`); a [`Validator`] is the registered predicate that
//! decides whether a captured value satisfies it. The [`ValidatorRegistry`]
//! owns the name → validator table and is seeded with the built-ins from
//! [`builtin`] at construction.
//!
//! Validator priorities double as a tie-break when two routes are otherwise
//! equally specific: lower numbers are more authoritative, so a route using
//! `int` (10) outranks an identically shaped route using `string` (1000).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub mod builtin;

/// Priority given to every typed built-in validator
pub const DEFAULT_PRIORITY: i32 = 10;

/// Priority of the `string` marker, the least authoritative built-in
pub const STRING_PRIORITY: i32 = 1000;

// ============================================================================
// Constraint
// ============================================================================

/// A named, optionally parameterized constraint attached to a segment
///
/// The argument is kept as raw text; each validator interprets it. Two-bound
/// validators read it through [`Constraint::arguments`].
///
/// # Examples
///
/// ```
/// use switchyard::Constraint;
///
/// let c = Constraint::parse("range(-50,50)").unwrap();
/// assert_eq!(c.name(), "range");
/// assert_eq!(c.argument(), Some("-50,50"));
/// assert_eq!(c.arguments(), vec!["-50", "50"]);
///
/// let c = Constraint::parse("int").unwrap();
/// assert_eq!(c.argument(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    name: String,
    argument: Option<String>,
}

impl Constraint {
    /// Creates a constraint without an argument
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: None,
        }
    }

    /// Creates a constraint carrying a raw argument
    pub fn with_argument(name: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: Some(argument.into()),
        }
    }

    /// Parses `name` or `name(argument)`
    ///
    /// The argument runs from the first `(` to the final `)` and is not
    /// split, so patterns such as `regex(a{1,3})` survive intact.
    pub fn parse(text: &str) -> Result<Self, String> {
        match text.find('(') {
            None => {
                if text.is_empty() {
                    return Err("empty constraint name".to_string());
                }
                if text.contains(')') {
                    return Err(format!("unbalanced `)` in constraint `{}`", text));
                }
                Ok(Self::new(text))
            }
            Some(open) => {
                let name = &text[..open];
                if name.is_empty() {
                    return Err(format!("constraint `{}` has no name", text));
                }
                let argument = text[open + 1..]
                    .strip_suffix(')')
                    .ok_or_else(|| format!("constraint `{}` is missing a closing `)`", text))?;
                Ok(Self::with_argument(name, argument))
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw argument text between the parentheses
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// The argument split on commas with surrounding whitespace trimmed
    pub fn arguments(&self) -> Vec<&str> {
        self.argument
            .as_deref()
            .map(|arg| arg.split(',').map(str::trim).collect())
            .unwrap_or_default()
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.argument {
            Some(arg) => write!(f, "{}({})", self.name, arg),
            None => f.write_str(&self.name),
        }
    }
}

// ============================================================================
// Validator
// ============================================================================

/// Predicate signature shared by all validators
pub type Predicate = dyn Fn(&str, &Constraint) -> bool + Send + Sync;

/// A registered predicate backing a constraint name
#[derive(Clone)]
pub struct Validator {
    name: String,
    priority: i32,
    predicate: Arc<Predicate>,
}

impl Validator {
    pub fn new<F>(name: impl Into<String>, priority: i32, predicate: F) -> Self
    where
        F: Fn(&str, &Constraint) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            priority,
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower values win ties between otherwise equal routes
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Runs the predicate against a raw captured value
    pub fn validate(&self, value: &str, constraint: &Constraint) -> bool {
        (self.predicate)(value, constraint)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Name → validator table, seeded with the built-ins
///
/// Names are case-insensitive. The registry is an ordinary owned value:
/// each [`Router`](crate::Router) carries its own, so tests never share
/// state.
///
/// # Examples
///
/// ```
/// use switchyard::{Constraint, ValidatorRegistry};
///
/// let mut validators = ValidatorRegistry::new();
/// validators.add("even", 100, |value, _| {
///     value.parse::<i64>().map(|n| n % 2 == 0).unwrap_or(false)
/// });
///
/// let even = Constraint::new("even");
/// assert!(validators.validate("4", &even));
/// assert!(!validators.validate("5", &even));
/// assert!(validators.remove("even"));
/// assert!(!validators.contains("even"));
/// ```
#[derive(Debug, Clone)]
pub struct ValidatorRegistry {
    validators: HashMap<String, Validator>,
}

impl ValidatorRegistry {
    /// Creates a registry holding every built-in validator
    pub fn new() -> Self {
        let mut registry = Self::empty();
        builtin::register(&mut registry);
        registry
    }

    /// Creates a registry with no validators at all
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// Registers a validator, replacing any existing one with the same name
    ///
    /// Returns the validator that was replaced.
    pub fn add<F>(&mut self, name: impl Into<String>, priority: i32, predicate: F) -> Option<Validator>
    where
        F: Fn(&str, &Constraint) -> bool + Send + Sync + 'static,
    {
        self.insert(Validator::new(name, priority, predicate))
    }

    /// Registers an already constructed validator
    pub fn insert(&mut self, validator: Validator) -> Option<Validator> {
        self.validators.insert(key(validator.name()), validator)
    }

    /// Functional builder variant of [`add`](Self::add)
    pub fn with<F>(mut self, name: impl Into<String>, priority: i32, predicate: F) -> Self
    where
        F: Fn(&str, &Constraint) -> bool + Send + Sync + 'static,
    {
        self.add(name, priority, predicate);
        self
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.validators.remove(&key(name)).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(&key(name))
    }

    pub fn get(&self, name: &str) -> Option<&Validator> {
        self.validators.get(&key(name))
    }

    /// Priority of the validator registered under `name`
    pub fn priority(&self, name: &str) -> Option<i32> {
        self.get(name).map(Validator::priority)
    }

    /// Checks a value against a constraint; unknown constraints never pass
    pub fn validate(&self, value: &str, constraint: &Constraint) -> bool {
        self.get(constraint.name())
            .map(|validator| validator.validate(value, constraint))
            .unwrap_or(false)
    }

    /// Registered names in alphabetical order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.values().map(Validator::name).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn key(name: &str) -> String {
    name.to_lowercase()
}
