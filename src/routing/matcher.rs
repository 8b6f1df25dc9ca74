//! Path matching logic.
//!
//! # Responsibilities
//! - Match path prefix (case-sensitive)
//! - Combine prefixes with OR semantics
//! - Strip query strings before matching
//!
//! # Design Decisions
//! - Path matching is case-sensitive, no wildcards
//! - Matchers work on plain `&str` paths so they test without any I/O
//! - No regex to guarantee O(n) matching

/// Trait for matching request paths against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Drop everything from the first `?` on.
pub fn strip_query(path_and_query: &str) -> &str {
    path_and_query
        .split_once('?')
        .map_or(path_and_query, |(path, _)| path)
}

/// Matches the request path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Matches when any of its prefixes match.
#[derive(Debug, Clone)]
pub struct AnyPrefixMatcher {
    matchers: Vec<PathPrefixMatcher>,
}

impl AnyPrefixMatcher {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            matchers: prefixes.into_iter().map(PathPrefixMatcher::new).collect(),
        }
    }
}

impl Matcher for AnyPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("/api/v1/pods/pids?x=1"), "/api/v1/pods/pids");
        assert_eq!(strip_query("/api/v1/pods"), "/api/v1/pods");
        assert_eq!(strip_query("/a?b?c"), "/a");
        assert_eq!(strip_query("?only"), "");
    }

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/api");

        assert!(matcher.matches("/api/v1"));
        assert!(matcher.matches("/api"));
        assert!(!matcher.matches("/images"));
        assert!(!matcher.matches("/API/v1")); // Case sensitive
    }

    #[test]
    fn test_any_prefix_matcher() {
        let matcher = AnyPrefixMatcher::new(["/api/", "/health", "/version"]);

        assert!(matcher.matches("/api/v1/jobs"));
        assert!(matcher.matches("/health"));
        assert!(matcher.matches("/healthz"));
        assert!(matcher.matches("/version"));
        assert!(!matcher.matches("/api"));
        assert!(!matcher.matches("/index.html"));
        assert!(!matcher.matches("/"));
    }
}
