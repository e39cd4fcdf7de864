//! Path construction subsystem.
//!
//! # Data Flow
//! ```text
//! raw route template ("/users/:id")
//!     → compiler.rs (parse into typed segments, once per registration)
//!     → PathTemplate::render (params → escaped concrete path)
//!     → join.rs (merge with the accumulated group prefix)
//!     → Group::render (prepend base URL or feed a URL template)
//! ```
//!
//! # Design Decisions
//! - Templates compile once at registration and render many times
//! - Rendering never emits an unescaped parameter value
//! - Joining collapses every duplicated boundary segment (one canonical policy)

pub mod compiler;
pub mod join;

pub use compiler::PathTemplate;
pub use join::join_url_path;
