//! Descriptor application onto a [`RouteManager`].

use tracing::debug;

use crate::config::schema::GroupConfig;
use crate::error::{RouteError, RouteResult};
use crate::group::Group;
use crate::manager::RouteManager;

/// Validates `groups` and registers every descriptor on `manager`.
///
/// Semantic validation (only roots may declare `base_url`) runs over the
/// whole list before anything is registered, so a failing call leaves the
/// manager untouched.
pub fn load_groups(manager: &RouteManager, groups: &[GroupConfig]) -> RouteResult<()> {
    for root in groups {
        for child in &root.groups {
            check_no_nested_base_url(&root.name, child)?;
        }
    }

    for root in groups {
        let group = manager.register_group(
            &root.name,
            root.base_url.as_deref().unwrap_or(""),
            route_pairs(root),
        );
        apply_group(&group, root);
        debug!(group = %root.name, routes = root.routes.len(), "descriptor applied");
    }
    Ok(())
}

fn check_no_nested_base_url(parent_fqn: &str, config: &GroupConfig) -> RouteResult<()> {
    let fqn = format!("{}.{}", parent_fqn, config.name);
    if config.base_url.is_some() {
        return Err(RouteError::NestedBaseUrl(fqn));
    }
    for child in &config.groups {
        check_no_nested_base_url(&fqn, child)?;
    }
    Ok(())
}

fn apply_group(group: &Group, config: &GroupConfig) {
    if let Some(template) = &config.url_template {
        group.set_url_template(template.clone());
    }
    for (key, value) in &config.template_vars {
        group.set_template_var(key.clone(), value.clone());
    }
    for child in &config.groups {
        let registered = group.register_group(
            &child.name,
            child.path.as_deref().unwrap_or(""),
            route_pairs(child),
        );
        apply_group(&registered, child);
    }
}

fn route_pairs(config: &GroupConfig) -> Vec<(String, String)> {
    config
        .routes
        .iter()
        .map(|(name, template)| (name.clone(), template.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptors(json: &str) -> Vec<GroupConfig> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_load_registers_hierarchy() {
        let manager = RouteManager::new();
        load_groups(
            &manager,
            &descriptors(
                r#"[{
                    "name": "frontend",
                    "base_url": "https://example.com",
                    "template_vars": { "locale": "en" },
                    "groups": [
                        { "name": "en", "path": "/en", "routes": { "about": "/about-us" } }
                    ]
                }]"#,
            ),
        )
        .unwrap();

        let url = manager
            .group("frontend.en")
            .builder("about")
            .build()
            .unwrap();
        assert_eq!(url, "https://example.com/en/about-us");

        let vars = manager.group("frontend.en").collect_template_vars();
        assert_eq!(vars["locale"], "en");
    }

    #[test]
    fn test_nested_base_url_is_rejected_before_applying() {
        let manager = RouteManager::new();
        let err = load_groups(
            &manager,
            &descriptors(
                r#"[{
                    "name": "frontend",
                    "groups": [
                        { "name": "en", "base_url": "https://en.example.com" }
                    ]
                }]"#,
            ),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            RouteError::NestedBaseUrl(fqn) if fqn == "frontend.en"
        ));
        // Nothing was registered.
        assert!(manager.get_group("frontend").is_err());
    }

    #[test]
    fn test_url_template_from_descriptor() {
        let manager = RouteManager::new();
        load_groups(
            &manager,
            &descriptors(
                r#"[{
                    "name": "site",
                    "base_url": "https://example.com",
                    "url_template": "{base_url}/{locale}{route_path}",
                    "template_vars": { "locale": "en-US" },
                    "routes": { "about": "/about" }
                }]"#,
            ),
        )
        .unwrap();

        let url = manager.group("site").builder("about").build().unwrap();
        assert_eq!(url, "https://example.com/en-US/about/");
    }
}
