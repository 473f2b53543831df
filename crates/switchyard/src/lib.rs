//! # Switchyard
//!
//! A path-pattern router. Route templates map URL-like paths to opaque
//! handler tokens; [`Router::match_path`] resolves an incoming path to exactly
//! one handler plus its extracted parameters.
//!
//! ## Template syntax
//!
//! - Literal segments (`/about`), compared case-insensitively
//! - Dynamic parameters (`/users/{id}`), captured case-preserving
//! - Constraints (`/users/{id:int:min(1)}`), ANDed left to right
//! - Optional parameters (`/posts/{id?}`) and defaults (`/shop/{category=Books}`)
//! - Wildcard (`/docs/*`) and catch-all (`/blog/{**slug}`) tails
//!
//! ## Selection
//!
//! When several routes match, the winner is decided by the first differing
//! criterion of:
//!
//! 1. explicit priority, highest first
//! 2. structural specificity, highest first
//! 3. summed validator priority of the route's constraints, lowest first
//! 4. registration order
//!
//! ## Example
//!
//! ```
//! use switchyard::Router;
//!
//! let mut router = Router::new();
//! router.add("/docs/*", "docs.any").unwrap();
//! router.add("/docs/special", "docs.special").unwrap();
//! router.add("/users/{id:int}", "users.show").unwrap();
//!
//! let m = router.match_path("/DOCS/special");
//! assert_eq!(m.handler(), Some(&"docs.special"));
//!
//! let m = router.match_path("/users/42");
//! assert_eq!(m.param("id"), Some("42"));
//!
//! assert!(!router.match_path("/users/abc").is_match());
//! ```

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod bind;
pub mod config;
pub mod constraint;
pub mod error;
pub mod path;
pub mod route;
pub mod shared;

pub use config::RouterConfig;
pub use constraint::{Constraint, Validator, ValidatorRegistry};
pub use error::RouteError;
pub use route::{Parameter, Segment};
pub use shared::{ResolvedRoute, SharedRouter};

/// Validator weight of a route without any constraints
pub const NEUTRAL_VALIDATOR_WEIGHT: i64 = 1000;

/// Parameter map produced by a successful match
pub type Params = HashMap<String, String>;

// ============================================================================
// Core Types
// ============================================================================

/// Registration-order identity of a route
///
/// Ids are handed out by [`Router::add_route`] in increasing order and act as
/// the last tie-break when ranking candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteId(usize);

impl RouteId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A parsed template bound to a handler token
#[derive(Debug, Clone)]
pub struct Route<H> {
    template: String,
    segments: Vec<Segment>,
    handler: H,
    /// Higher wins
    priority: i32,
    /// Assigned on registration
    id: RouteId,
}

impl<H> Route<H> {
    /// Parses `template` into a route with priority 0
    ///
    /// # Examples
    ///
    /// ```
    /// use switchyard::Route;
    ///
    /// let route = Route::parse("/products/{id:int}", "products.show")
    ///     .unwrap()
    ///     .with_priority(10);
    /// assert_eq!(route.priority(), 10);
    /// assert_eq!(route.segments().len(), 2);
    ///
    /// assert!(Route::parse("/a/*/b", ()).is_err());
    /// ```
    pub fn parse(template: impl Into<String>, handler: H) -> Result<Self, RouteError> {
        let template = template.into();
        let segments = route::parse_template(&template)?;
        Ok(Self {
            template,
            segments,
            handler,
            priority: 0,
            id: RouteId::default(),
        })
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn specificity(&self) -> u32 {
        route::specificity(&self.segments)
    }

    /// Ends in `*` or `{**name}`
    pub fn is_greedy(&self) -> bool {
        self.segments.last().is_some_and(Segment::is_greedy)
    }

    /// Segments that must be present in the path
    pub fn required_len(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| !s.is_omittable() && !s.is_greedy())
            .count()
    }

    fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.segments.iter().flat_map(Segment::constraints)
    }

    /// Checks every segment against the path segments and builds the parameter map
    fn capture(&self, segments: &[&str], validators: &ValidatorRegistry) -> Option<Params> {
        let mut params = Params::new();

        for (idx, segment) in self.segments.iter().enumerate() {
            let value = segments.get(idx).copied();
            match segment {
                Segment::Literal(text) => {
                    if !path::eq_ignore_case(text, value?) {
                        return None;
                    }
                }
                Segment::Dynamic(param) => match value {
                    Some(value) => {
                        let valid = param
                            .constraints
                            .iter()
                            .all(|c| validators.validate(value, c));
                        if !valid {
                            return None;
                        }
                        params.insert(param.name.clone(), value.to_string());
                    }
                    None => match &param.default {
                        Some(default) => {
                            params.insert(param.name.clone(), default.clone());
                        }
                        None if param.optional => {}
                        None => return None,
                    },
                },
                Segment::Wildcard(name) => {
                    let rest = segments.get(idx..).filter(|rest| !rest.is_empty())?;
                    params.insert(name.clone(), format!("/{}/", rest.join("/")));
                    return Some(params);
                }
                Segment::CatchAll { name, constraints } => {
                    let rest = segments.get(idx..).filter(|rest| !rest.is_empty())?.join("/");
                    if !constraints.iter().all(|c| validators.validate(&rest, c)) {
                        return None;
                    }
                    params.insert(name.clone(), rest);
                    return Some(params);
                }
            }
        }

        // non-greedy routes cannot absorb extra path segments
        (segments.len() <= self.segments.len()).then_some(params)
    }
}

/// Outcome of [`Router::match_path`]
///
/// A failed match is a normal value, not an error.
#[derive(Debug)]
pub struct MatchResult<'r, H> {
    route: Option<&'r Route<H>>,
    params: Params,
}

impl<'r, H> MatchResult<'r, H> {
    fn none() -> Self {
        Self {
            route: None,
            params: Params::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        self.route.is_some()
    }

    /// The winning route
    pub fn route(&self) -> Option<&'r Route<H>> {
        self.route
    }

    pub fn handler(&self) -> Option<&'r H> {
        self.route.map(Route::handler)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn into_params(self) -> Params {
        self.params
    }
}

// ============================================================================
// Router
// ============================================================================

/// Ordered route registry with its own validator table
///
/// Registration takes `&mut self`; [`match_path`](Router::match_path) takes
/// `&self` and never mutates, so a fully built router can be shared freely
/// across threads. See [`SharedRouter`] for registration after startup.
#[derive(Debug, Clone)]
pub struct Router<H> {
    routes: Vec<Route<H>>,
    /// Normalized prefixes rewritten to `prefix/index`
    controllers: Vec<Vec<String>>,
    validators: ValidatorRegistry,
    next_id: usize,
}

impl<H> Router<H> {
    /// Creates an empty router using the built-in validators
    pub fn new() -> Self {
        Self::with_validators(ValidatorRegistry::new())
    }

    /// Creates an empty router that resolves constraints against `validators`
    pub fn with_validators(validators: ValidatorRegistry) -> Self {
        Self {
            routes: Vec::new(),
            controllers: Vec::new(),
            validators,
            next_id: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Registers a parsed route and assigns its id
    ///
    /// # Errors
    ///
    /// [`RouteError::UnknownConstraint`] when a constraint names a validator
    /// this router does not have.
    pub fn add_route(&mut self, mut route: Route<H>) -> Result<RouteId, RouteError> {
        if let Some(unknown) = route.constraints().find(|c| !self.validators.contains(c.name())) {
            tracing::warn!(
                "Rejected route {}: unknown constraint `{}`",
                route.template,
                unknown.name()
            );
            return Err(RouteError::UnknownConstraint {
                template: route.template.clone(),
                constraint: unknown.name().to_string(),
            });
        }

        let id = RouteId(self.next_id);
        self.next_id += 1;
        route.id = id;

        tracing::debug!(
            "Registered route {} {} (priority {}, specificity {})",
            id,
            route.template,
            route.priority,
            route.specificity()
        );
        self.routes.push(route);
        Ok(id)
    }

    /// Parses and registers `template` with priority 0
    pub fn add(&mut self, template: &str, handler: H) -> Result<RouteId, RouteError> {
        self.add_with_priority(template, handler, 0)
    }

    pub fn add_with_priority(
        &mut self,
        template: &str,
        handler: H,
        priority: i32,
    ) -> Result<RouteId, RouteError> {
        let route = Route::parse(template, handler)
            .map_err(|err| {
                tracing::warn!("Rejected route {}: {}", template, err);
                err
            })?
            .with_priority(priority);
        self.add_route(route)
    }

    /// Rewrites a path equal to `prefix` into `prefix/index` before matching
    ///
    /// # Examples
    ///
    /// ```
    /// use switchyard::Router;
    ///
    /// let mut router = Router::new();
    /// router.add("/products/index", "products.index").unwrap();
    /// router.add_controller("products");
    ///
    /// assert_eq!(router.match_path("/products").handler(), Some(&"products.index"));
    /// assert_eq!(router.match_path("/Products/").handler(), Some(&"products.index"));
    /// ```
    pub fn add_controller(&mut self, prefix: &str) {
        let segments: Vec<String> = path::split_path(prefix)
            .into_iter()
            .map(str::to_lowercase)
            .collect();

        if self.controllers.contains(&segments) {
            return;
        }
        tracing::debug!("Registered controller /{}", segments.join("/"));
        self.controllers.push(segments);
    }

    // ------------------------------------------------------------------------
    // Matching
    // ------------------------------------------------------------------------

    /// Resolves `path` to its best route
    pub fn match_path(&self, path: &str) -> MatchResult<'_, H> {
        let mut segments = path::split_path(path);
        if self.is_controller(&segments) {
            segments.push("index");
        }

        let best = self
            .routes
            .iter()
            .filter(|route| route.required_len() <= segments.len())
            .filter_map(|route| route.capture(&segments, &self.validators).map(|p| (route, p)))
            .min_by_key(|(route, _)| {
                (
                    Reverse(route.priority),
                    Reverse(route.specificity()),
                    self.validator_weight(route),
                    route.id,
                )
            });

        match best {
            Some((route, params)) => {
                tracing::trace!("Resolved {} to {} {}", path, route.id, route.template);
                MatchResult {
                    route: Some(route),
                    params,
                }
            }
            None => {
                tracing::trace!("No route for {}", path);
                MatchResult::none()
            }
        }
    }

    fn is_controller(&self, segments: &[&str]) -> bool {
        self.controllers.iter().any(|prefix| {
            prefix.len() == segments.len()
                && prefix
                    .iter()
                    .zip(segments)
                    .all(|(expected, actual)| path::eq_ignore_case(expected, actual))
        })
    }

    /// Summed priority of the validators behind a route's constraints
    fn validator_weight(&self, route: &Route<H>) -> i64 {
        let mut constraints = route.constraints().peekable();
        if constraints.peek().is_none() {
            return NEUTRAL_VALIDATOR_WEIGHT;
        }
        constraints
            .map(|c| {
                self.validators
                    .priority(c.name())
                    .map_or(NEUTRAL_VALIDATOR_WEIGHT, i64::from)
            })
            .sum()
    }

    // ------------------------------------------------------------------------
    // Validators
    // ------------------------------------------------------------------------

    pub fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    pub fn validators_mut(&mut self) -> &mut ValidatorRegistry {
        &mut self.validators
    }

    /// Registers or replaces a constraint validator
    pub fn add_validator<F>(&mut self, name: &str, priority: i32, predicate: F)
    where
        F: Fn(&str, &Constraint) -> bool + Send + Sync + 'static,
    {
        tracing::debug!("Registered validator {} (priority {})", name, priority);
        self.validators.add(name, priority, predicate);
    }

    /// Routes already using the validator stop matching once it is removed
    pub fn remove_validator(&mut self, name: &str) -> bool {
        self.validators.remove(name)
    }

    pub fn has_validator(&self, name: &str) -> bool {
        self.validators.contains(name)
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    /// Routes in registration order
    pub fn routes(&self) -> &[Route<H>] {
        &self.routes
    }

    pub fn route(&self, id: RouteId) -> Option<&Route<H>> {
        self.routes.iter().find(|route| route.id == id)
    }

    pub fn controllers(&self) -> impl Iterator<Item = String> + '_ {
        self.controllers.iter().map(|prefix| format!("/{}", prefix.join("/")))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}
