//! Text matchers for assertions on node text

use regex::Regex;

/// How an assertion compares a node's text
#[derive(Debug, Clone)]
pub enum TextMatch {
    Exact(String),
    StartsWith(String),
    Contains(String),
    Pattern(Regex),
}

impl TextMatch {
    pub fn exact(s: impl Into<String>) -> Self {
        TextMatch::Exact(s.into())
    }

    pub fn starts_with(s: impl Into<String>) -> Self {
        TextMatch::StartsWith(s.into())
    }

    pub fn contains(s: impl Into<String>) -> Self {
        TextMatch::Contains(s.into())
    }

    /// Panics on an invalid pattern; only used from tests
    pub fn pattern(pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(re) => TextMatch::Pattern(re),
            Err(e) => panic!("invalid text pattern {:?}: {}", pattern, e),
        }
    }

    pub fn matches(&self, actual: &str) -> bool {
        match self {
            TextMatch::Exact(expected) => actual == expected,
            TextMatch::StartsWith(prefix) => actual.starts_with(prefix.as_str()),
            TextMatch::Contains(needle) => actual.contains(needle.as_str()),
            TextMatch::Pattern(re) => re.is_match(actual),
        }
    }

    pub fn assert(&self, actual: &str, context: &str) {
        assert!(
            self.matches(actual),
            "{}: expected text {}, found {:?}",
            context,
            self.describe(),
            actual
        );
    }

    fn describe(&self) -> String {
        match self {
            TextMatch::Exact(s) => format!("{:?}", s),
            TextMatch::StartsWith(s) => format!("starting with {:?}", s),
            TextMatch::Contains(s) => format!("containing {:?}", s),
            TextMatch::Pattern(re) => format!("matching /{}/", re.as_str()),
        }
    }
}

impl From<&str> for TextMatch {
    fn from(s: &str) -> Self {
        TextMatch::exact(s)
    }
}
