//! Path template matching.
//!
//! # Responsibilities
//! - Decide whether a template such as `/media/{id}/rate` matches a path
//! - Extract the placeholder values by name
//!
//! # Design Decisions
//! - Segment counts must be equal (no wildcard or optional segments)
//! - Placeholders match any non-empty segment, no regex or type constraints
//! - Literal segments compare ASCII case-insensitively
//! - Templates are split once at registration ([`PathPattern`])

use std::fmt;

/// Parameters extracted from a matched template.
///
/// Lookup by name ignores ASCII case. Empty for exact-route matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, replacing any existing value with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in template order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Returns the placeholder name if `segment` is written as `{name}`.
fn placeholder_name(segment: &str) -> Option<&str> {
    if segment.len() >= 2 && segment.starts_with('{') && segment.ends_with('}') {
        Some(&segment[1..segment.len() - 1])
    } else {
        None
    }
}

/// Returns true if `template` matches `path`.
///
/// Both inputs are expected to be normalized.
pub fn matches(template: &str, path: &str) -> bool {
    PathPattern::new(template).matches(path)
}

/// Extract placeholder values from `path` according to `template`.
///
/// Returns an empty set when the segment counts differ.
pub fn extract(template: &str, path: &str) -> Params {
    PathPattern::new(template).extract(path).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A template split into literal and placeholder segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    template: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a template. The template is used as given; callers normalize.
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let segments = template
            .split('/')
            .map(|s| match placeholder_name(s) {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();

        Self { template, segments }
    }

    /// The template text this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Number of placeholder segments.
    pub fn param_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Param(_)))
            .count()
    }

    pub fn matches(&self, path: &str) -> bool {
        let mut parts = path.split('/');
        for segment in &self.segments {
            let Some(part) = parts.next() else {
                return false;
            };
            let ok = match segment {
                Segment::Param(_) => !part.is_empty(),
                Segment::Literal(lit) => lit.eq_ignore_ascii_case(part),
            };
            if !ok {
                return false;
            }
        }
        parts.next().is_none()
    }

    /// Match and extract in one pass. `None` if the path does not match.
    pub fn extract(&self, path: &str) -> Option<Params> {
        if !self.matches(path) {
            return None;
        }

        let mut params = Params::new();
        for (segment, part) in self.segments.iter().zip(path.split('/')) {
            if let Segment::Param(name) = segment {
                params.insert(name.as_str(), part);
            }
        }
        Some(params)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}
