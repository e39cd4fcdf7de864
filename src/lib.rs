//! Hierarchical reverse routing: build URLs from named route templates.
//!
//! Routes live in a tree of named groups. Each group owns routes, child
//! groups, local template variables, and an optional `{name}`-placeholder
//! URL template. Rendering walks the tree: with no template in the
//! ancestry a URL is built by concatenating group mount paths with the
//! compiled route path; with one, by substituting variables into the
//! nearest ancestor's template.
//!
//! ```
//! use reverse_router::RouteManager;
//!
//! let manager = RouteManager::new();
//! manager.register_group("api", "https://api.example.com", vec![("user", "/users/:id")]);
//!
//! let url = manager
//!     .group("api")
//!     .builder("user")
//!     .with_param("id", "123")
//!     .build()
//!     .unwrap();
//! assert_eq!(url, "https://api.example.com/users/123");
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod group;
pub mod manager;
pub mod path;
pub mod template;

pub use builder::{QueryValue, UrlBuilder};
pub use config::{load_groups, GroupConfig};
pub use error::{RouteError, RouteResult, SubstitutionError, ValidationError};
pub use group::{Group, NavigationNode};
pub use manager::RouteManager;
