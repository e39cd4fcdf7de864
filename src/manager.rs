//! Root registry of named group trees.
//!
//! # Responsibilities
//! - Register root groups and resolve dot-separated group paths
//! - Idempotently grow hierarchies (`ensure_group`)
//! - Validate the whole tree against an expected route table
//! - Dump the hierarchy deterministically for diagnostics
//!
//! # Design Decisions
//! - The manager guards only the top-level name→root map; node state is
//!   guarded by per-node locks inside the arena
//! - Validation reports all failures, not just the first
//! - Panicking variants (`group`, `must_validate`) are call-site sugar over
//!   the fallible forms, never used internally

use std::sync::Arc;

use tracing::debug;

use crate::error::{RouteError, RouteResult, ValidationError};
use crate::group::{Group, GroupNode, Registry};

/// Registry of named root groups.
///
/// Cheap to clone; all clones share one tree. Safe for concurrent use.
#[derive(Clone)]
pub struct RouteManager {
    registry: Arc<Registry>,
}

impl Default for RouteManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteManager {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry::new()),
        }
    }

    /// Creates a root group, or merges `routes` into an existing one.
    ///
    /// Only the supplied routes are recompiled on merge. A non-empty
    /// `base_url` overwrites the stored one; an empty one leaves it alone.
    pub fn register_group<I, K, V>(&self, name: &str, base_url: &str, routes: I) -> Group
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let id = *self
            .registry
            .roots
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!(group = %name, base_url = %base_url, "registered root group");
                self.registry.alloc(GroupNode::root(name, base_url))
            });

        let group = Group::new(self.registry.clone(), id);
        if !base_url.is_empty() {
            let node = self.registry.node(id);
            node.write().base_url = base_url.to_string();
        }
        group.add_routes(routes);
        group
    }

    /// Resolves a dot-separated path, e.g. `frontend.en`.
    pub fn get_group(&self, dotted: &str) -> RouteResult<Group> {
        let mut segments = dotted.split('.');
        let root_name = segments.next().unwrap_or_default();

        let mut id = match self.registry.roots.get(root_name) {
            Some(entry) => *entry.value(),
            None => return Err(RouteError::GroupNotFound(dotted.to_string())),
        };

        for segment in segments {
            let child = {
                let node = self.registry.node(id);
                let guard = node.read();
                guard.children.get(segment).copied()
            };
            id = child.ok_or_else(|| RouteError::GroupNotFound(dotted.to_string()))?;
        }

        Ok(Group::new(self.registry.clone(), id))
    }

    /// Panicking variant of [`RouteManager::get_group`].
    pub fn group(&self, dotted: &str) -> Group {
        self.get_group(dotted).unwrap_or_else(|err| panic!("{}", err))
    }

    /// Idempotently creates every missing group along `dotted`.
    ///
    /// Non-root segments accept a custom mount with `name:/custom/path`
    /// syntax and default to `/name`. The root segment must already exist;
    /// a custom mount on it is ignored, since roots are addressed by base
    /// URL rather than mount path.
    pub fn ensure_group(&self, dotted: &str) -> RouteResult<Group> {
        let mut segments = dotted.split('.');
        let root_segment = segments.next().unwrap_or_default();
        let (root_name, _) = split_mount(root_segment);

        let mut group = self.get_group(root_name)?;
        for segment in segments {
            let (name, mount) = split_mount(segment);
            group = group.register_group::<_, String, String>(
                name,
                mount.unwrap_or(""),
                std::iter::empty(),
            );
        }
        Ok(group)
    }

    /// Locates a group and attaches/overwrites routes, recompiling them
    /// immediately.
    pub fn add_routes<I, K, V>(&self, dotted: &str, routes: I) -> RouteResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let group = self.get_group(dotted)?;
        group.add_routes(routes);
        Ok(())
    }

    /// Confirms that every expected group exists and carries every listed
    /// route name. All failures are aggregated into one error.
    pub fn validate(&self, expected: &[(&str, &[&str])]) -> RouteResult<()> {
        let mut error = ValidationError::default();

        for (path, routes) in expected {
            match self.get_group(path) {
                Err(_) => error.missing_groups.push(path.to_string()),
                Ok(group) => {
                    let missing = group.missing_route_names(routes);
                    if !missing.is_empty() {
                        error.missing_routes.insert(path.to_string(), missing);
                    }
                }
            }
        }

        error.missing_groups.sort();
        if error.is_empty() {
            Ok(())
        } else {
            Err(error.into())
        }
    }

    /// Panicking variant of [`RouteManager::validate`].
    pub fn must_validate(&self, expected: &[(&str, &[&str])]) {
        self.validate(expected)
            .unwrap_or_else(|err| panic!("{}", err));
    }

    /// Deterministic, alphabetically sorted dump of every tree.
    pub fn debug_tree(&self) -> String {
        let mut roots: Vec<(String, usize)> = self
            .registry
            .roots
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        roots.sort();

        let mut out = String::new();
        for (_, id) in roots {
            Group::new(self.registry.clone(), id).write_tree(&mut out, 0);
        }
        out
    }
}

/// Splits `name:/mount/path` into the name and optional custom mount.
fn split_mount(segment: &str) -> (&str, Option<&str>) {
    match segment.split_once(':') {
        Some((name, mount)) => (name, Some(mount)),
        None => (segment, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let manager = RouteManager::new();
        manager.register_group("api", "https://api.example.com", vec![("user", "/users/:id")]);

        assert!(manager.get_group("api").is_ok());
        assert!(matches!(
            manager.get_group("api.v2").unwrap_err(),
            RouteError::GroupNotFound(path) if path == "api.v2"
        ));
        assert!(matches!(
            manager.get_group("missing").unwrap_err(),
            RouteError::GroupNotFound(path) if path == "missing"
        ));
    }

    #[test]
    fn test_register_group_merges_routes() {
        let manager = RouteManager::new();
        manager.register_group("api", "https://api.example.com", vec![("user", "/users/:id")]);
        manager.register_group("api", "", vec![("login", "/login")]);

        let group = manager.group("api");
        assert_eq!(group.must_route("user"), "/users/:id");
        assert_eq!(group.must_route("login"), "/login");
        // Empty base_url on merge left the original in place.
        let url = group.builder("login").build().unwrap();
        assert_eq!(url, "https://api.example.com/login");
    }

    #[test]
    fn test_ensure_group_creates_intermediates() {
        let manager = RouteManager::new();
        manager.register_group::<_, String, String>("frontend", "", std::iter::empty());

        let leaf = manager.ensure_group("frontend.marketing:/mkt.landing").unwrap();
        assert_eq!(leaf.fqn(), "frontend.marketing.landing");

        let dump = manager.debug_tree();
        assert!(dump.contains("marketing [path=/mkt]"));
        assert!(dump.contains("landing [path=/landing]"));

        // Idempotent: a second call resolves the same groups.
        let again = manager.ensure_group("frontend.marketing.landing").unwrap();
        assert_eq!(again.fqn(), "frontend.marketing.landing");
    }

    #[test]
    fn test_ensure_group_requires_existing_root() {
        let manager = RouteManager::new();
        assert!(matches!(
            manager.ensure_group("ghost.child").unwrap_err(),
            RouteError::GroupNotFound(_)
        ));
    }

    #[test]
    fn test_add_routes_via_dotted_path() {
        let manager = RouteManager::new();
        manager.register_group::<_, String, String>("frontend", "https://example.com", std::iter::empty());
        manager.ensure_group("frontend.en").unwrap();

        manager.add_routes("frontend.en", vec![("about", "/about-us")]).unwrap();
        let url = manager.group("frontend.en").builder("about").build().unwrap();
        assert_eq!(url, "https://example.com/en/about-us");

        assert!(manager
            .add_routes("frontend.fr", vec![("about", "/a-propos")])
            .is_err());
    }

    #[test]
    fn test_validate_aggregates_all_failures() {
        let manager = RouteManager::new();
        manager.register_group("api", "", vec![("user", "/users/:id")]);

        manager.must_validate(&[("api", &["user"])]);

        let err = manager
            .validate(&[
                ("api", &["user", "login", "logout"]),
                ("admin", &["dashboard"]),
            ])
            .unwrap_err();

        match err {
            RouteError::Validation(v) => {
                assert_eq!(v.missing_groups, vec!["admin".to_string()]);
                assert_eq!(
                    v.missing_routes["api"],
                    vec!["login".to_string(), "logout".to_string()]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_debug_tree_roots_sorted() {
        let manager = RouteManager::new();
        manager.register_group::<_, String, String>("zebra", "", std::iter::empty());
        manager.register_group::<_, String, String>("alpha", "", std::iter::empty());

        let dump = manager.debug_tree();
        assert!(dump.find("alpha").unwrap() < dump.find("zebra").unwrap());
    }

    #[test]
    fn test_split_mount() {
        assert_eq!(split_mount("marketing:/mkt"), ("marketing", Some("/mkt")));
        assert_eq!(split_mount("landing"), ("landing", None));
    }
}
