//! Group hierarchy and URL rendering.
//!
//! # Responsibilities
//! - Own the arena of group nodes and the public `Group` handle
//! - Choose the render mode per call: path concatenation when no ancestor
//!   owns a URL template, template substitution otherwise
//! - Collect template variables root→leaf with nearest-wins override
//! - Project routes into read-only `NavigationNode`s
//!
//! # Design Decisions
//! - Parent links are integer handles into a push-only arena, not
//!   back-pointers; nodes live for the process lifetime
//! - One RwLock per node; chain walks snapshot a node, release its lock,
//!   then move on — two node locks are never held at once
//! - Render mode is decided per call, so templates can be set or cleared
//!   at any time without invalidating anything
//! - `route_path` and `base_url` are reserved variables injected after
//!   collection, so they always win over user-set values

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, trace};

use crate::builder::UrlBuilder;
use crate::error::{RouteError, RouteResult, SubstitutionError};
use crate::path::{join_url_path, PathTemplate};
use crate::template;

/// Reserved variable: the compiled (and suffixed) route path.
pub const VAR_ROUTE_PATH: &str = "route_path";
/// Reserved variable: the root group's base URL.
pub const VAR_BASE_URL: &str = "base_url";
/// Inheritable variable controlling the suffix appended to `route_path`.
pub const VAR_ROUTE_PATH_SUFFIX: &str = "route_path_suffix";

const DEFAULT_ROUTE_PATH_SUFFIX: &str = "/";

pub(crate) type GroupId = usize;

/// A named route: the raw placeholder template plus its compiled form.
#[derive(Debug, Clone)]
pub(crate) struct Route {
    pub(crate) raw: String,
    pub(crate) compiled: PathTemplate,
}

/// One node of the hierarchy. Only reachable through [`Group`] handles.
pub(crate) struct GroupNode {
    pub(crate) name: String,
    pub(crate) parent: Option<GroupId>,
    /// Local mount segment, e.g. `/en`. Roots mount at `/`.
    pub(crate) path: String,
    /// Meaningful on root nodes only.
    pub(crate) base_url: String,
    pub(crate) routes: HashMap<String, Route>,
    pub(crate) children: HashMap<String, GroupId>,
    /// Empty string means "no template": the group renders by concatenation.
    pub(crate) url_template: String,
    pub(crate) template_vars: HashMap<String, String>,
}

impl GroupNode {
    pub(crate) fn root(name: &str, base_url: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            path: "/".to_string(),
            base_url: base_url.to_string(),
            routes: HashMap::new(),
            children: HashMap::new(),
            url_template: String::new(),
            template_vars: HashMap::new(),
        }
    }

    fn child(name: &str, parent: GroupId, path: String) -> Self {
        Self {
            name: name.to_string(),
            parent: Some(parent),
            path,
            base_url: String::new(),
            routes: HashMap::new(),
            children: HashMap::new(),
            url_template: String::new(),
            template_vars: HashMap::new(),
        }
    }
}

/// Shared arena: root name map plus the node store.
///
/// The arena vector is push-only. Lock order is always node → arena; the
/// arena lock is never held while waiting on a node lock.
pub(crate) struct Registry {
    pub(crate) roots: DashMap<String, GroupId>,
    nodes: RwLock<Vec<Arc<RwLock<GroupNode>>>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            roots: DashMap::new(),
            nodes: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn alloc(&self, node: GroupNode) -> GroupId {
        let mut nodes = self.nodes.write();
        nodes.push(Arc::new(RwLock::new(node)));
        nodes.len() - 1
    }

    pub(crate) fn node(&self, id: GroupId) -> Arc<RwLock<GroupNode>> {
        self.nodes.read()[id].clone()
    }
}

/// Handle to one group of the hierarchy.
///
/// Cheap to clone and safe for concurrent use from many threads; all state
/// lives in the shared arena behind per-node locks.
#[derive(Clone)]
pub struct Group {
    pub(crate) registry: Arc<Registry>,
    pub(crate) id: GroupId,
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Read-only projection of one rendered route, e.g. for navigation menus.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationNode {
    /// FQN of the group the route lives in.
    pub group: String,
    /// Route name within the group.
    pub route: String,
    /// Fully qualified route name, `<group FQN>.<route>`.
    pub name: String,
    /// The raw placeholder template the route was registered with.
    pub template: String,
    /// The rendered URL.
    pub url: String,
    /// Snapshot of the parameters used to render it.
    pub params: HashMap<String, String>,
}

impl Group {
    pub(crate) fn new(registry: Arc<Registry>, id: GroupId) -> Self {
        Self { registry, id }
    }

    /// The group's own name (last FQN segment).
    pub fn name(&self) -> String {
        self.registry.node(self.id).read().name.clone()
    }

    /// Dot-joined path of group names from the root to this group.
    pub fn fqn(&self) -> String {
        let mut names = Vec::new();
        for id in self.chain() {
            names.push(self.registry.node(id).read().name.clone());
        }
        names.join(".")
    }

    /// Node ids from the root down to this group, self included.
    fn chain(&self) -> Vec<GroupId> {
        let mut ids = vec![self.id];
        let mut current = self.id;
        loop {
            let parent = {
                let node = self.registry.node(current);
                let guard = node.read();
                guard.parent
            };
            match parent {
                Some(id) => {
                    ids.push(id);
                    current = id;
                }
                None => break,
            }
        }
        ids.reverse();
        ids
    }

    /// Creates a child group, or merges `routes` into an existing one.
    ///
    /// An empty `mount_path` defaults to `/<name>`.
    pub fn register_group<I, K, V>(&self, name: &str, mount_path: &str, routes: I) -> Group
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let child_id = {
            let node = self.registry.node(self.id);
            let mut guard = node.write();
            match guard.children.get(name) {
                Some(&id) => id,
                None => {
                    let path = normalize_mount(name, mount_path);
                    let id = self
                        .registry
                        .alloc(GroupNode::child(name, self.id, path.clone()));
                    guard.children.insert(name.to_string(), id);
                    debug!(group = %name, mount = %path, "registered child group");
                    id
                }
            }
        };

        let child = Group::new(self.registry.clone(), child_id);
        child.add_routes(routes);
        child
    }

    /// Attaches routes, overwriting same-named ones. Templates are
    /// recompiled immediately, outside the node lock.
    pub fn add_routes<I, K, V>(&self, routes: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let compiled: Vec<(String, Route)> = routes
            .into_iter()
            .map(|(name, raw)| {
                let raw: String = raw.into();
                let route = Route {
                    compiled: PathTemplate::compile(&raw),
                    raw,
                };
                (name.into(), route)
            })
            .collect();
        if compiled.is_empty() {
            return;
        }

        let node = self.registry.node(self.id);
        let mut guard = node.write();
        for (name, route) in compiled {
            trace!(group = %guard.name, route = %name, template = %route.raw, "route attached");
            guard.routes.insert(name, route);
        }
    }

    /// Sets (or clears, with an empty string) this group's URL template.
    pub fn set_url_template(&self, template: impl Into<String>) {
        let template = template.into();
        let node = self.registry.node(self.id);
        let mut guard = node.write();
        debug!(group = %guard.name, template = %template, "url template set");
        guard.url_template = template;
    }

    /// Sets a local template variable.
    pub fn set_template_var(&self, key: impl Into<String>, value: impl Into<String>) {
        let node = self.registry.node(self.id);
        let mut guard = node.write();
        guard.template_vars.insert(key.into(), value.into());
    }

    /// Local-only variable lookup; no inheritance walk.
    pub fn template_var(&self, key: &str) -> Option<String> {
        self.registry
            .node(self.id)
            .read()
            .template_vars
            .get(key)
            .cloned()
    }

    /// Collects template variables from the root down to this group.
    /// The nearest group defining a key wins.
    pub fn collect_template_vars(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        for id in self.chain() {
            let node = self.registry.node(id);
            let guard = node.read();
            for (key, value) in &guard.template_vars {
                vars.insert(key.clone(), value.clone());
            }
        }
        vars
    }

    /// Nearest ancestor (self included) with a non-empty URL template.
    pub fn find_template_owner(&self) -> Option<Group> {
        let mut current = Some(self.id);
        while let Some(id) = current {
            let parent = {
                let node = self.registry.node(id);
                let guard = node.read();
                if !guard.url_template.is_empty() {
                    return Some(Group::new(self.registry.clone(), id));
                }
                guard.parent
            };
            current = parent;
        }
        None
    }

    /// Returns the raw placeholder template of a named route.
    pub fn route(&self, name: &str) -> RouteResult<String> {
        let raw = {
            let node = self.registry.node(self.id);
            let guard = node.read();
            guard.routes.get(name).map(|r| r.raw.clone())
        };
        raw.ok_or_else(|| RouteError::RouteNotFound {
            group: self.fqn(),
            route: name.to_string(),
        })
    }

    /// Panicking variant of [`Group::route`].
    pub fn must_route(&self, name: &str) -> String {
        self.route(name).unwrap_or_else(|err| panic!("{}", err))
    }

    /// Starts a fluent URL build for the named route.
    pub fn builder(&self, route: &str) -> UrlBuilder {
        UrlBuilder::new(self.clone(), route)
    }

    /// Renders a route against `params` and appends `queries`.
    ///
    /// The render mode is chosen per call: template substitution when an
    /// ancestor (self included) owns a URL template, path concatenation
    /// otherwise.
    pub fn render(
        &self,
        route_name: &str,
        params: &HashMap<String, String>,
        queries: &BTreeMap<String, Vec<String>>,
    ) -> RouteResult<String> {
        let compiled = {
            let node = self.registry.node(self.id);
            let guard = node.read();
            guard.routes.get(route_name).map(|r| r.compiled.clone())
        };
        let compiled = compiled.ok_or_else(|| RouteError::RouteNotFound {
            group: self.fqn(),
            route: route_name.to_string(),
        })?;

        let route_path = compiled.render(params)?;
        let url = match self.find_template_owner() {
            Some(owner) => self.render_with_template(&owner, route_name, route_path)?,
            None => self.render_concatenated(&route_path),
        };

        trace!(route = %route_name, url = %url, "rendered");
        Ok(append_queries(url, queries))
    }

    /// Path-concatenation mode: base URL + accumulated mounts + route path.
    fn render_concatenated(&self, route_path: &str) -> String {
        let mut base_url = String::new();
        let mut prefix = String::new();
        for (index, id) in self.chain().into_iter().enumerate() {
            let node = self.registry.node(id);
            let guard = node.read();
            if index == 0 {
                base_url = guard.base_url.clone();
            }
            push_mount(&mut prefix, &guard.path);
        }

        let path = join_url_path(&prefix, route_path);
        format!("{}{}", base_url.trim_end_matches('/'), path)
    }

    /// Template mode: collect variables, inject the reserved ones, refuse
    /// to render if any placeholder stays unresolved.
    fn render_with_template(
        &self,
        owner: &Group,
        route_name: &str,
        mut route_path: String,
    ) -> RouteResult<String> {
        let mut vars = self.collect_template_vars();

        let suffix = vars
            .get(VAR_ROUTE_PATH_SUFFIX)
            .cloned()
            .unwrap_or_else(|| DEFAULT_ROUTE_PATH_SUFFIX.to_string());
        if !suffix.is_empty() && !route_path.ends_with(&suffix) {
            route_path.push_str(&suffix);
        }

        let base_url = self.root_base_url();
        vars.insert(VAR_ROUTE_PATH.to_string(), route_path);
        vars.insert(VAR_BASE_URL.to_string(), base_url);

        let template = owner.registry.node(owner.id).read().url_template.clone();
        let missing = template::missing_vars(&template, &vars);
        if !missing.is_empty() {
            return Err(SubstitutionError {
                group: self.fqn(),
                route: route_name.to_string(),
                owner: owner.fqn(),
                template,
                missing,
            }
            .into());
        }

        Ok(template::substitute(&template, &vars))
    }

    fn root_base_url(&self) -> String {
        let root = self.chain()[0];
        self.registry.node(root).read().base_url.clone()
    }

    /// Batch-renders `route_names` into navigation projections, stopping at
    /// the first route that fails to build.
    pub fn navigation<F>(&self, route_names: &[&str], params_for: F) -> RouteResult<Vec<NavigationNode>>
    where
        F: Fn(&str) -> HashMap<String, String>,
    {
        let fqn = self.fqn();
        route_names
            .iter()
            .map(|route| {
                let params = params_for(route);
                let template = self.route(route)?;
                let url = self.render(route, &params, &BTreeMap::new())?;
                Ok(NavigationNode {
                    group: fqn.clone(),
                    route: route.to_string(),
                    name: format!("{}.{}", fqn, route),
                    template,
                    url,
                    params,
                })
            })
            .collect()
    }

    /// Sorted route names present here but expected by a validation call.
    pub(crate) fn missing_route_names(&self, expected: &[&str]) -> Vec<String> {
        let node = self.registry.node(self.id);
        let guard = node.read();
        let mut missing: Vec<String> = expected
            .iter()
            .filter(|name| !guard.routes.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        missing.sort();
        missing
    }

    /// Appends this group's subtree to a diagnostic dump. Children and
    /// routes are emitted alphabetically so output is deterministic.
    pub(crate) fn write_tree(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);

        let (header, routes, children) = {
            let node = self.registry.node(self.id);
            let guard = node.read();

            let mut header = format!("{}{} [path={}]", indent, guard.name, guard.path);
            if !guard.base_url.is_empty() {
                header.push_str(&format!(" [base_url={}]", guard.base_url));
            }
            if !guard.url_template.is_empty() {
                header.push_str(&format!(" [template={}]", guard.url_template));
            }

            let mut routes: Vec<(String, String)> = guard
                .routes
                .iter()
                .map(|(name, route)| (name.clone(), route.raw.clone()))
                .collect();
            routes.sort();

            let mut children: Vec<(String, GroupId)> = guard
                .children
                .iter()
                .map(|(name, id)| (name.clone(), *id))
                .collect();
            children.sort();

            (header, routes, children)
        };

        out.push_str(&header);
        out.push('\n');

        let effective: BTreeMap<String, String> = self.collect_template_vars().into_iter().collect();
        if !effective.is_empty() {
            out.push_str(&format!("{}  vars:", indent));
            for (key, value) in &effective {
                out.push_str(&format!(" {}={}", key, value));
            }
            out.push('\n');
        }

        for (name, raw) in &routes {
            out.push_str(&format!("{}  route {}: {}\n", indent, name, raw));
        }

        for (_, id) in children {
            Group::new(self.registry.clone(), id).write_tree(out, depth + 1);
        }
    }
}

/// Appends mount segments to an accumulated prefix, skipping root mounts.
fn push_mount(prefix: &mut String, mount: &str) {
    for seg in mount.split('/').filter(|s| !s.is_empty()) {
        prefix.push('/');
        prefix.push_str(seg);
    }
}

/// Default mount is `/<name>`; explicit mounts get a single leading slash.
fn normalize_mount(name: &str, mount_path: &str) -> String {
    let trimmed = mount_path.trim_matches('/');
    if mount_path.is_empty() {
        format!("/{}", name)
    } else if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Encodes merged query pairs onto a rendered URL.
fn append_queries(url: String, queries: &BTreeMap<String, Vec<String>>) -> String {
    if queries.is_empty() {
        return url;
    }
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, values) in queries {
        for value in values {
            serializer.append_pair(key, value);
        }
    }
    format!("{}?{}", url, serializer.finish())
}
