//! Route template compilation.
//!
//! # Responsibilities
//! - Parse `:name` (required) and `:name?` (optional) placeholder segments
//! - Render a compiled template against a parameter map
//! - URL-escape every substituted value
//!
//! # Design Decisions
//! - Compilation is infallible: any segment that is not a placeholder is
//!   treated as literal text
//! - A missing required parameter is an error; a missing optional segment
//!   is silently dropped from the rendered path
//! - The route's trailing slash survives rendering

use std::collections::HashMap;

use crate::error::{RouteError, RouteResult};

/// One parsed segment of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Static text, emitted verbatim.
    Literal(String),
    /// `:name` or `:name?` placeholder.
    Param { name: String, optional: bool },
}

/// A compiled route template.
///
/// Produced once when a route is registered, rendered on every build.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
    trailing_slash: bool,
}

impl PathTemplate {
    /// Compiles a raw template such as `/users/:id/posts/:page?`.
    pub fn compile(raw: &str) -> Self {
        let segments = raw
            .split('/')
            .filter(|s| !s.is_empty())
            .map(classify_segment)
            .collect();

        Self {
            raw: raw.to_string(),
            segments,
            trailing_slash: raw.len() > 1 && raw.ends_with('/'),
        }
    }

    /// The template string this was compiled from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Names of every placeholder, required and optional.
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param { name, .. } => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Renders the template against `params`, escaping substituted values.
    pub fn render(&self, params: &HashMap<String, String>) -> RouteResult<String> {
        let mut out = String::with_capacity(self.raw.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    out.push('/');
                    out.push_str(text);
                }
                Segment::Param { name, optional } => match params.get(name) {
                    Some(value) => {
                        out.push('/');
                        out.push_str(&urlencoding::encode(value));
                    }
                    None if *optional => {}
                    None => {
                        return Err(RouteError::MissingParam {
                            template: self.raw.clone(),
                            param: name.clone(),
                        });
                    }
                },
            }
        }

        if out.is_empty() {
            out.push('/');
        } else if self.trailing_slash {
            out.push('/');
        }

        Ok(out)
    }
}

/// Classifies one path segment into literal or placeholder.
fn classify_segment(segment: &str) -> Segment {
    match segment.strip_prefix(':') {
        Some(inner) if !inner.is_empty() => match inner.strip_suffix('?') {
            Some(name) if !name.is_empty() => Segment::Param {
                name: name.to_string(),
                optional: true,
            },
            _ => Segment::Param {
                name: inner.to_string(),
                optional: false,
            },
        },
        _ => Segment::Literal(segment.to_string()),
    }
}
