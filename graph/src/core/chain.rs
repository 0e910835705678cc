use serde::Serialize;

/// Abbreviated commit hash as printed by `git log --pretty=format:%h`
pub type CommitId = String;

/// Where a chain came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChainOrigin {
    /// First-parent history of a branch (or other non-tag ref)
    Ref { name: String },
    /// First-parent history of a merged-in parent, capped by the merge commit
    Merge { merge: CommitId, parent: CommitId },
}

impl std::fmt::Display for ChainOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainOrigin::Ref { name } => write!(f, "{name}"),
            ChainOrigin::Merge { merge, parent } => write!(f, "merge {merge} <- {parent}"),
        }
    }
}

/// One lineage segment, oldest commit first.
///
/// `commits` are the chain's own members. `fork` and `join` name commits
/// owned by other chains that this segment branches off from and runs into;
/// they contribute edges, never membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chain {
    pub origin: ChainOrigin,
    pub commits: Vec<CommitId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fork: Option<CommitId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join: Option<CommitId>,
}

impl Chain {
    pub fn new(origin: ChainOrigin, commits: Vec<CommitId>) -> Self {
        Self {
            origin,
            commits,
            fork: None,
            join: None,
        }
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Newest commit of the chain
    pub fn tip(&self) -> Option<&CommitId> {
        self.commits.last()
    }

    /// Every node the chain's edge sequence passes through, in order:
    /// fork, own commits, join
    pub fn path(&self) -> impl Iterator<Item = &CommitId> {
        self.fork
            .iter()
            .chain(self.commits.iter())
            .chain(self.join.iter())
    }

    /// Consecutive (older, newer) pairs along [`Chain::path`]
    pub fn edges(&self) -> Vec<(&CommitId, &CommitId)> {
        let path: Vec<&CommitId> = self.path().collect();
        path.windows(2).map(|pair| (pair[0], pair[1])).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<CommitId> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_chain_edges() {
        let chain = Chain::new(ChainOrigin::Ref { name: "refs/heads/master".into() }, ids(&["a1", "a2", "a3"]));

        assert_eq!(chain.len(), 3);
        assert_eq!(chain.tip().map(String::as_str), Some("a3"));
        let edges: Vec<(&str, &str)> = chain.edges().into_iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
        assert_eq!(edges, vec![("a1", "a2"), ("a2", "a3")]);
    }

    #[test]
    fn test_anchored_chain_path() {
        let mut chain = Chain::new(
            ChainOrigin::Merge { merge: "m1".into(), parent: "b2".into() },
            ids(&["b1", "b2"]),
        );
        chain.fork = Some("a1".into());
        chain.join = Some("m1".into());

        let path: Vec<&str> = chain.path().map(String::as_str).collect();
        assert_eq!(path, vec!["a1", "b1", "b2", "m1"]);
        assert_eq!(chain.edges().len(), 3);
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_single_commit_chain_has_no_edges() {
        let chain = Chain::new(ChainOrigin::Ref { name: "solo".into() }, ids(&["s1"]));
        assert!(chain.edges().is_empty());
        assert!(!chain.is_empty());
    }

    #[test]
    fn test_origin_display() {
        let origin = ChainOrigin::Merge { merge: "m1".into(), parent: "b2".into() };
        assert_eq!(origin.to_string(), "merge m1 <- b2");
    }
}
