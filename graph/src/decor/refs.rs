use std::collections::btree_map::{self, BTreeMap};

use crate::core::CommitId;

const TAG_MARKER: &str = "(tag:";

/// Kind of label attached to a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationKind {
    /// `(tag: v1.0)` and friends
    Tag,
    /// Branch, remote-tracking or HEAD reference
    Ref,
}

impl DecorationKind {
    pub fn of(label: &str) -> Self {
        if label.trim().starts_with(TAG_MARKER) {
            DecorationKind::Tag
        } else {
            DecorationKind::Ref
        }
    }
}

/// Commit id to decoration label, one label per commit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationMap {
    entries: BTreeMap<CommitId, String>,
}

impl DecorationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `label` (trimmed) to `commit`. A later label for the same
    /// commit replaces the earlier one, which is returned.
    pub fn insert(&mut self, commit: impl Into<CommitId>, label: &str) -> Option<String> {
        self.entries.insert(commit.into(), label.trim().to_string())
    }

    pub fn get(&self, commit: &str) -> Option<&str> {
        self.entries.get(commit).map(String::as_str)
    }

    pub fn contains(&self, commit: &str) -> bool {
        self.entries.contains_key(commit)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by commit id
    pub fn iter(&self) -> impl Iterator<Item = (&CommitId, &str)> {
        self.entries.iter().map(|(id, label)| (id, label.as_str()))
    }
}

impl<'a> IntoIterator for &'a DecorationMap {
    type Item = (&'a CommitId, &'a String);
    type IntoIter = btree_map::Iter<'a, CommitId, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_detection() {
        assert_eq!(DecorationKind::of(" (tag: v1.0, origin/master)"), DecorationKind::Tag);
        assert_eq!(DecorationKind::of("(HEAD -> feature/x, origin/feature/x)"), DecorationKind::Ref);
        assert_eq!(DecorationKind::of("(develop)"), DecorationKind::Ref);
        assert_eq!(DecorationKind::of("(tag"), DecorationKind::Ref);
    }

    #[test]
    fn test_last_label_wins() {
        let mut map = DecorationMap::new();
        assert_eq!(map.insert("a2", " (develop)"), None);
        assert_eq!(map.insert("a2", " (tag: v2)"), Some("(develop)".to_string()));

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a2"), Some("(tag: v2)"));
        assert!(map.contains("a2"));
        assert!(!map.contains("a3"));
    }

    #[test]
    fn test_iteration_is_ordered_by_commit() {
        let mut map = DecorationMap::new();
        map.insert("c3", "(master)");
        map.insert("a1", "(tag: v1)");

        let keys: Vec<&str> = map.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(keys, vec!["a1", "c3"]);
    }
}
