// File: src/config.rs
// Purpose: Route table parsing from routes.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constraint::builtin::compile_anchored;
use crate::{RouteError, Router};

/// Route table read by [`RouterConfig::load_default`]
pub const DEFAULT_ROUTE_TABLE: &str = "routes.toml";

/// A route table: routes, controllers and pattern validators
///
/// ```toml
/// controllers = ["products"]
///
/// [[validator]]
/// name = "slug"
/// priority = 50
/// pattern = "[a-z0-9-]+"
///
/// [[route]]
/// template = "/products/{id:int}"
/// handler = "products.show"
/// priority = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RouterConfig {
    /// Prefixes rewritten to `prefix/index`
    #[serde(default)]
    pub controllers: Vec<String>,

    #[serde(default, rename = "validator")]
    pub validators: Vec<ValidatorConfig>,

    #[serde(default, rename = "route")]
    pub routes: Vec<RouteConfig>,
}

/// One `[[route]]` entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteConfig {
    pub template: String,

    pub handler: String,

    #[serde(default)]
    pub priority: i32,
}

/// One `[[validator]]` entry, backed by an anchored case-insensitive regex
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidatorConfig {
    pub name: String,

    #[serde(default = "default_validator_priority")]
    pub priority: i32,

    pub pattern: String,
}

// Default values
fn default_validator_priority() -> i32 {
    100
}

impl RouterConfig {
    /// Load the route table from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return an empty table
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read route table: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse route table: {:?}", path))
    }

    /// Load the route table from default path (./routes.toml)
    pub fn load_default() -> Result<Self> {
        Self::load(DEFAULT_ROUTE_TABLE)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(content)?)
    }

    /// Builds a router: validators first, then routes in file order, then
    /// controllers
    pub fn build(&self) -> Result<Router<String>, RouteError> {
        let mut router = Router::new();

        for validator in &self.validators {
            let pattern = compile_anchored(&validator.pattern).map_err(|source| {
                RouteError::InvalidPattern {
                    name: validator.name.clone(),
                    source,
                }
            })?;
            router.add_validator(&validator.name, validator.priority, move |value, _| {
                pattern.is_match(value)
            });
        }

        for route in &self.routes {
            router.add_with_priority(&route.template, route.handler.clone(), route.priority)?;
        }

        for prefix in &self.controllers {
            router.add_controller(prefix);
        }

        Ok(router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TABLE: &str = r#"
        controllers = ["products"]

        [[validator]]
        name = "slug"
        priority = 50
        pattern = "[a-z0-9-]+"

        [[route]]
        template = "/products/index"
        handler = "products.index"

        [[route]]
        template = "/products/{id:int}"
        handler = "products.show"
        priority = 10

        [[route]]
        template = "/blog/{post:slug}"
        handler = "blog.show"
    "#;

    #[test]
    fn test_empty_config() {
        let config = RouterConfig::from_toml_str("  \n").unwrap();
        assert_eq!(config, RouterConfig::default());
        assert!(config.build().unwrap().is_empty());
    }

    #[test]
    fn test_parse_table() {
        let config = RouterConfig::from_toml_str(TABLE).unwrap();
        assert_eq!(config.controllers, vec!["products"]);
        assert_eq!(config.validators.len(), 1);
        assert_eq!(config.routes.len(), 3);
        assert_eq!(config.routes[0].priority, 0);
        assert_eq!(config.routes[1].priority, 10);
    }

    #[test]
    fn test_validator_priority_default() {
        let config = RouterConfig::from_toml_str(
            r#"
            [[validator]]
            name = "hex"
            pattern = "[0-9a-f]+"
            "#,
        )
        .unwrap();
        assert_eq!(config.validators[0].priority, 100);
    }

    #[test]
    fn test_build_router() {
        let router = RouterConfig::from_toml_str(TABLE).unwrap().build().unwrap();
        assert_eq!(router.len(), 3);
        assert_eq!(
            router.match_path("/products").handler().map(String::as_str),
            Some("products.index")
        );
        assert_eq!(
            router.match_path("/products/12").handler().map(String::as_str),
            Some("products.show")
        );
        assert_eq!(
            router.match_path("/blog/Hello-World").param("post"),
            Some("Hello-World")
        );
        assert!(!router.match_path("/blog/hello_world").is_match());
    }

    #[test]
    fn test_build_rejects_invalid_pattern() {
        let config = RouterConfig::from_toml_str(
            r#"
            [[validator]]
            name = "broken"
            pattern = "[a-"
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.build(),
            Err(RouteError::InvalidPattern { name, .. }) if name == "broken"
        ));
    }

    #[test]
    fn test_build_rejects_unknown_constraint() {
        let config = RouterConfig::from_toml_str(
            r#"
            [[route]]
            template = "/x/{id:nope}"
            handler = "x"
            "#,
        )
        .unwrap();
        assert!(matches!(config.build(), Err(RouteError::UnknownConstraint { .. })));
    }

    #[test]
    fn test_load_default_without_table() {
        // the crate directory carries no route table
        let config = RouterConfig::load_default().unwrap();
        assert_eq!(config, RouterConfig::default());
    }

    #[test]
    fn test_missing_file_is_empty_table() {
        let config = RouterConfig::load("does/not/exist/routes.toml").unwrap();
        assert_eq!(config, RouterConfig::default());
    }
}
