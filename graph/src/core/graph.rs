use std::collections::HashSet;

use super::chain::{Chain, CommitId};
use crate::decor::DecorationMap;

/// Reduced chains plus the decorations that label them; the value handed
/// to the graph serializer
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub chains: Vec<Chain>,
    pub decorations: DecorationMap,
}

impl Graph {
    pub fn new(chains: Vec<Chain>, decorations: DecorationMap) -> Self {
        Self { chains, decorations }
    }

    /// Distinct commits in first-seen order
    pub fn commits(&self) -> Vec<&CommitId> {
        let mut seen = HashSet::new();
        self.chains
            .iter()
            .flat_map(|chain| chain.commits.iter())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.commits().len()
    }

    pub fn edge_count(&self) -> usize {
        self.chains.iter().map(|chain| chain.edges().len()).sum()
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            chains: self.chains.len(),
            commits: self.node_count(),
            edges: self.edge_count(),
            decorations: self.decorations.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    pub chains: usize,
    pub commits: usize,
    pub edges: usize,
    pub decorations: usize,
}
