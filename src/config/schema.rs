//! Group descriptor shapes.
//!
//! All types derive Serde traits so callers can deserialize descriptors
//! from whatever format their loader speaks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One group descriptor, possibly nested.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GroupConfig {
    /// Group name; unique among siblings.
    pub name: String,

    /// Base URL. Only valid on root descriptors.
    pub base_url: Option<String>,

    /// Mount path segment. Defaults to `/<name>` on nested groups.
    pub path: Option<String>,

    /// Route name → placeholder template. `paths` is the legacy alias.
    #[serde(alias = "paths")]
    pub routes: HashMap<String, String>,

    /// Optional `{name}`-placeholder URL template.
    pub url_template: Option<String>,

    /// Local template variables.
    pub template_vars: HashMap<String, String>,

    /// Nested child groups.
    pub groups: Vec<GroupConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_descriptor() {
        let config: GroupConfig = serde_json::from_str(r#"{ "name": "api" }"#).unwrap();
        assert_eq!(config.name, "api");
        assert!(config.base_url.is_none());
        assert!(config.routes.is_empty());
        assert!(config.groups.is_empty());
    }

    #[test]
    fn test_full_descriptor() {
        let config: GroupConfig = serde_json::from_str(
            r#"{
                "name": "frontend",
                "base_url": "https://example.com",
                "url_template": "{protocol}://{host}{route_path}",
                "template_vars": { "protocol": "https" },
                "routes": { "home": "/" },
                "groups": [
                    { "name": "en", "path": "/en", "routes": { "about": "/about-us" } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.base_url.as_deref(), Some("https://example.com"));
        assert_eq!(config.groups.len(), 1);
        assert_eq!(config.groups[0].routes["about"], "/about-us");
    }

    #[test]
    fn test_legacy_paths_alias() {
        let config: GroupConfig = serde_json::from_str(
            r#"{ "name": "api", "paths": { "user": "/users/:id" } }"#,
        )
        .unwrap();
        assert_eq!(config.routes["user"], "/users/:id");
    }
}
