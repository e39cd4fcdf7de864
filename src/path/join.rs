//! Boundary-aware path joining.
//!
//! # Responsibilities
//! - Merge an accumulated group prefix with a compiled route path
//! - Drop the boundary overlap when the route re-states part of its
//!   parent's mount path
//! - Emit exactly one leading slash
//!
//! # Design Decisions
//! - Canonical separator policy: duplicated separators are always
//!   collapsed, including the "prefix is `/` and route starts with `/`"
//!   boundary. Earlier revisions of this engine preserved that one double
//!   slash; this implementation does not.
//! - The route's trailing slash is preserved, the prefix's is not

/// Joins `prefix` and `route` into one canonical path.
///
/// The longest suffix of the prefix's segments that equals a prefix of the
/// route's segments is emitted only once:
///
/// ```
/// use reverse_router::path::join_url_path;
///
/// assert_eq!(join_url_path("/api/v1", "/v1/users"), "/api/v1/users");
/// assert_eq!(join_url_path("/en", "/about-us"), "/en/about-us");
/// assert_eq!(join_url_path("/", "/"), "/");
/// ```
pub fn join_url_path(prefix: &str, route: &str) -> String {
    let prefix_segs: Vec<&str> = prefix.split('/').filter(|s| !s.is_empty()).collect();
    let route_segs: Vec<&str> = route.split('/').filter(|s| !s.is_empty()).collect();
    let trailing_slash = route.len() > 1 && route.ends_with('/');

    let overlap = boundary_overlap(&prefix_segs, &route_segs);

    let mut out = String::with_capacity(prefix.len() + route.len());
    for seg in prefix_segs.iter().chain(route_segs[overlap..].iter()) {
        out.push('/');
        out.push_str(seg);
    }

    if out.is_empty() {
        out.push('/');
    } else if trailing_slash {
        out.push('/');
    }

    out
}

/// Length of the longest suffix of `prefix` equal to a prefix of `route`.
fn boundary_overlap(prefix: &[&str], route: &[&str]) -> usize {
    let max = prefix.len().min(route.len());
    for len in (1..=max).rev() {
        if prefix[prefix.len() - len..] == route[..len] {
            return len;
        }
    }
    0
}
