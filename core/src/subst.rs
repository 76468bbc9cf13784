//! Substitution table loading.
//!
//! A substitution resource is line-oriented text: each line of the form
//! `old=new` contributes one exact-match rewrite applied to the right-hand
//! table's raw text values before comparison. Lines without `=` are silently
//! skipped — malformed lines are not an error by design — and a repeated
//! `old` keeps the last occurrence.

use std::collections::HashMap;
use std::io;
use std::path::Path;

/// Exact-match value rewrites, immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubstitutionMap {
    entries: HashMap<String, String>,
}

impl SubstitutionMap {
    pub fn empty() -> SubstitutionMap {
        SubstitutionMap::default()
    }

    /// Parse substitution text. Never fails: unusable lines are skipped.
    pub fn parse(text: &str) -> SubstitutionMap {
        let mut entries = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if let Some((old, new)) = line.split_once('=') {
                entries.insert(old.to_string(), new.to_string());
            }
        }
        SubstitutionMap { entries }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<SubstitutionMap, io::Error> {
        let text = std::fs::read_to_string(path)?;
        Ok(SubstitutionMap::parse(&text))
    }

    /// Exact-match lookup; no wildcard or regex semantics.
    pub fn get(&self, raw: &str) -> Option<&str> {
        self.entries.get(raw).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for SubstitutionMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        SubstitutionMap {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_old_equals_new_lines() {
        let map = SubstitutionMap::parse("X=Y\nfoo=bar\n");
        assert_eq!(map.get("X"), Some("Y"));
        assert_eq!(map.get("foo"), Some("bar"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn lines_without_equals_are_skipped() {
        let map = SubstitutionMap::parse("no separator here\n\nX=Y\n");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("X"), Some("Y"));
    }

    #[test]
    fn repeated_old_value_keeps_the_last_entry() {
        let map = SubstitutionMap::parse("X=first\nX=second\n");
        assert_eq!(map.get("X"), Some("second"));
    }

    #[test]
    fn split_happens_at_the_first_equals() {
        let map = SubstitutionMap::parse("a=b=c\n");
        assert_eq!(map.get("a"), Some("b=c"));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed_per_line() {
        let map = SubstitutionMap::parse("  X=Y  \n");
        assert_eq!(map.get("X"), Some("Y"));
    }

    #[test]
    fn lookup_is_exact_match_only() {
        let map = SubstitutionMap::parse("X=Y\n");
        assert_eq!(map.get("x"), None);
        assert_eq!(map.get("X "), None);
    }
}
