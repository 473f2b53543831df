//! Configuration errors raised while parsing or registering route templates
//!
//! Every variant carries the offending template so that a host registering
//! dozens of routes can tell which one was rejected.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    /// Lexical problem: unbalanced braces, empty names, stray characters
    #[error("malformed route template `{template}`: {reason}")]
    Malformed { template: String, reason: String },

    /// A template mixes `*` and `{**name}`
    #[error("route template `{template}` cannot contain both a wildcard and a catch-all segment")]
    ConflictingGreedy { template: String },

    /// `*` or `{**name}` followed by another segment
    #[error("greedy segment `{segment}` must be the last segment of `{template}`")]
    GreedyNotLast { template: String, segment: String },

    /// A required segment appears after an optional or defaulted one
    #[error("segment `{segment}` of `{template}` is required but follows an optional segment")]
    OptionalBeforeRequired { template: String, segment: String },

    /// `{name?=value}` or `{name=value?}`
    #[error("parameter `{parameter}` of `{template}` cannot be both optional and have a default value")]
    OptionalWithDefault { template: String, parameter: String },

    /// Two captures share a name
    #[error("parameter `{parameter}` appears more than once in `{template}`")]
    DuplicateParameter { template: String, parameter: String },

    /// The template references a constraint no validator is registered for
    #[error("route template `{template}` uses unknown constraint `{constraint}`")]
    UnknownConstraint { template: String, constraint: String },

    /// A pattern-backed validator from a route table failed to compile
    #[error("validator `{name}` has an invalid pattern: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

impl RouteError {
    pub(crate) fn malformed(template: &str, reason: impl Into<String>) -> Self {
        RouteError::Malformed {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_template() {
        let err = RouteError::GreedyNotLast {
            template: "/a/*/b".to_string(),
            segment: "*".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "greedy segment `*` must be the last segment of `/a/*/b`"
        );

        let err = RouteError::malformed("/{id", "unclosed `{`");
        assert_eq!(
            err.to_string(),
            "malformed route template `/{id`: unclosed `{`"
        );
    }
}
