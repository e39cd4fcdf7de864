//! Group descriptor subsystem.
//!
//! # Data Flow
//! ```text
//! descriptor source (any serde format, parsed by the caller)
//!     → schema.rs (GroupConfig shapes, defaults, legacy aliases)
//!     → loader.rs (semantic checks: base_url on roots only)
//!     → RouteManager (groups registered, templates compiled)
//! ```
//!
//! # Design Decisions
//! - The engine owns the descriptor *shape*, not file parsing; callers
//!   deserialize with whatever serde format they use and hand the result
//!   to [`load_groups`](loader::load_groups)
//! - Semantic validation runs before any group is registered, so a bad
//!   descriptor list never leaves a half-applied tree

pub mod loader;
pub mod schema;

pub use loader::load_groups;
pub use schema::GroupConfig;
