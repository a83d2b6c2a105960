//! Path normalization and mount-prefix stripping.
//!
//! # Design Decisions
//! - Canonical form: leading slash, no trailing slash (except root)
//! - Prefix comparison is ASCII case-insensitive
//! - Pure functions, no allocation when the input is already canonical

/// Canonicalize a URL path.
///
/// Empty input becomes `/`, a missing leading slash is inserted and trailing
/// slashes are stripped unless the path is exactly `/`.
pub fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }

    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Returns true if `path` starts with `prefix`, ignoring ASCII case.
pub fn starts_with_ignore_case(path: &str, prefix: &str) -> bool {
    path.len() >= prefix.len()
        && path.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Compute the path of `request_path` relative to the mount point `base_path`.
///
/// Returns `None` when the request does not live under the mount point.
pub fn relative(request_path: &str, base_path: &str) -> Option<String> {
    let request_path = normalize(request_path);
    let base_path = normalize(base_path);

    if base_path == "/" {
        return Some(request_path);
    }

    if !starts_with_ignore_case(&request_path, &base_path) {
        return None;
    }

    match request_path.get(base_path.len()..) {
        Some("") | Some("/") => Some("/".to_string()),
        Some(rest) => Some(normalize(rest)),
        None => None,
    }
}
