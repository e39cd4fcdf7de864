//! Error definitions for the routing engine.
//!
//! # Responsibilities
//! - Sentinel lookup errors carrying the offending path for context
//! - Structured substitution failures listing every unresolved placeholder
//! - Aggregate validation errors covering the whole expected route table
//!
//! # Design Decisions
//! - Every engine operation returns a `RouteResult`; nothing panics inside
//!   the engine. Panicking `must_*` variants live at call-site level only.
//! - The aggregate validation error reports all failures, not just the first.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Result type for all engine operations.
pub type RouteResult<T> = Result<T, RouteError>;

/// Errors that can occur while registering groups or building URLs.
#[derive(Debug, Clone, Error)]
pub enum RouteError {
    /// No group exists at the given dotted path.
    #[error("group not found: {0}")]
    GroupNotFound(String),

    /// The group exists but has no route with this name.
    #[error("route not found: {route} (group {group})")]
    RouteNotFound { group: String, route: String },

    /// A required `:name` placeholder was not supplied.
    #[error("missing required parameter :{param} (route template {template})")]
    MissingParam { template: String, param: String },

    /// `base_url` declared on a non-root group descriptor.
    #[error("base_url is only valid on root groups (group {0})")]
    NestedBaseUrl(String),

    /// A builder input could not be normalized to string parameters.
    #[error("unsupported parameter shape for {key}: {detail}")]
    UnsupportedParam { key: String, detail: String },

    /// One or more expected groups/routes are missing.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A URL template referenced variables nobody defined.
    #[error("{0}")]
    Substitution(#[from] SubstitutionError),
}

/// Aggregate result of [`RouteManager::validate`](crate::RouteManager::validate).
///
/// Collects every missing group and, per existing group, every missing route
/// name. Both collections are sorted so the rendered message is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted paths of expected groups that do not exist.
    pub missing_groups: Vec<String>,
    /// Group path -> sorted route names expected but absent.
    pub missing_routes: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    pub fn is_empty(&self) -> bool {
        self.missing_groups.is_empty() && self.missing_routes.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "route table validation failed:")?;
        for group in &self.missing_groups {
            write!(f, " [missing group {}]", group)?;
        }
        for (group, routes) in &self.missing_routes {
            write!(f, " [group {} missing routes: {}]", group, routes.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// A template-mode render found unresolved `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "unresolved template variables [{}] in {template:?} \
     (group {group}, route {route}, template owner {owner})",
    .missing.join(", ")
)]
pub struct SubstitutionError {
    /// FQN of the group the render was requested on.
    pub group: String,
    /// Name of the route being rendered.
    pub route: String,
    /// FQN of the group owning the URL template.
    pub owner: String,
    /// The offending template string.
    pub template: String,
    /// Sorted, deduplicated names of every unresolved placeholder.
    pub missing: Vec<String>,
}
