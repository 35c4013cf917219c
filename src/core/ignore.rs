//! core::ignore
//!
//! Ignore rules for untracked-file reporting.
//!
//! The ignore file holds one pattern per line. Blank lines and lines
//! starting with `#` are skipped. A pattern starting with `*` matches any
//! path ending in the rest of the pattern (`*.log`). Any other pattern
//! matches a path equal to it or starting with it (`build/`, `target`).

use std::path::Path;

use crate::core::fsio;

/// One parsed ignore pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Pattern {
    Suffix(String),
    Prefix(String),
}

impl Pattern {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            return None;
        }
        if let Some(rest) = line.strip_prefix('*') {
            // A lone `*` or one with further wildcards is not supported
            if rest.is_empty() || rest.contains('*') {
                return None;
            }
            return Some(Pattern::Suffix(rest.to_string()));
        }
        if line.contains('*') {
            return None;
        }
        Some(Pattern::Prefix(line.to_string()))
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            Pattern::Suffix(suffix) => path.ends_with(suffix.as_str()),
            Pattern::Prefix(prefix) => path.starts_with(prefix.as_str()),
        }
    }
}

/// A set of ignore patterns.
///
/// # Example
///
/// ```
/// use strata::core::ignore::IgnoreRules;
///
/// let rules = IgnoreRules::parse("# build output\n*.log\ntarget\n");
/// assert!(rules.is_ignored("debug.log"));
/// assert!(rules.is_ignored("target/release/app"));
/// assert!(!rules.is_ignored("src/main.rs"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRules {
    patterns: Vec<Pattern>,
}

impl IgnoreRules {
    /// Parse ignore file contents.
    pub fn parse(text: &str) -> Self {
        Self {
            patterns: text.lines().filter_map(Pattern::parse).collect(),
        }
    }

    /// Load rules from a file. A missing file yields no rules.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        Ok(fsio::read_optional_string(path)?
            .map(|text| Self::parse(&text))
            .unwrap_or_default())
    }

    /// Check a repository-relative, `/`-separated path.
    pub fn is_ignored(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_blanks_skipped() {
        let rules = IgnoreRules::parse("# comment\n\n   \n");
        assert!(rules.is_empty());
        assert!(!rules.is_ignored("file"));
    }

    #[test]
    fn suffix_pattern() {
        let rules = IgnoreRules::parse("*.tmp\n");
        assert!(rules.is_ignored("a.tmp"));
        assert!(rules.is_ignored("dir/b.tmp"));
        assert!(!rules.is_ignored("a.tmpx"));
    }

    #[test]
    fn exact_and_prefix_pattern() {
        let rules = IgnoreRules::parse("notes.txt\nbuild\n");
        assert!(rules.is_ignored("notes.txt"));
        assert!(rules.is_ignored("build/out.o"));
        assert!(!rules.is_ignored("src/build.rs"));
    }

    #[test]
    fn unsupported_wildcards_ignored() {
        let rules = IgnoreRules::parse("*\na*b\n");
        assert!(rules.is_empty());
    }

    #[test]
    fn crlf_lines() {
        let rules = IgnoreRules::parse("*.log\r\n");
        assert!(rules.is_ignored("x.log"));
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let rules = IgnoreRules::load(&dir.path().join(".strataignore")).unwrap();
        assert!(rules.is_empty());
    }
}
