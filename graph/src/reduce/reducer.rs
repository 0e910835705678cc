use std::collections::HashSet;

use tracing::{debug, info};

use crate::core::{Chain, CommitId};
use crate::decor::DecorationMap;

/// Removes duplicated commit membership across chains.
///
/// Chains are processed in order and each commit belongs to the first chain
/// that mentions it. A later chain keeps only the runs of commits nobody has
/// claimed yet; each run remembers the claimed commit it forks from and the
/// claimed commit it joins, so the graph stays connected. A chain with no
/// unclaimed commit disappears.
pub struct Reducer<'a> {
    decorations: &'a DecorationMap,
}

impl<'a> Reducer<'a> {
    pub fn new(decorations: &'a DecorationMap) -> Self {
        Self { decorations }
    }

    pub fn reduce(&self, chains: Vec<Chain>) -> Vec<Chain> {
        let input = chains.len();
        let mut claimed: HashSet<CommitId> = HashSet::new();
        let mut reduced = Vec::with_capacity(input);

        for chain in chains {
            let segments = split_unclaimed(&chain.commits, &mut claimed);
            if segments.is_empty() {
                self.trace_dropped(&chain);
                continue;
            }
            for segment in segments {
                let fork = match segment.start {
                    0 => chain.fork.clone(),
                    n => Some(chain.commits[n - 1].clone()),
                };
                let join = match segment.end {
                    n if n == chain.commits.len() => chain.join.clone(),
                    n => Some(chain.commits[n].clone()),
                };
                reduced.push(Chain {
                    origin: chain.origin.clone(),
                    commits: chain.commits[segment.start..segment.end].to_vec(),
                    fork,
                    join,
                });
            }
        }

        info!(input, output = reduced.len(), "reduced chains");
        reduced
    }

    fn trace_dropped(&self, chain: &Chain) {
        match chain.tip().and_then(|tip| self.decorations.get(tip)) {
            Some(label) => debug!(origin = %chain.origin, %label, "chain fully subsumed"),
            None => debug!(origin = %chain.origin, "chain fully subsumed"),
        }
    }
}

/// Shorthand for `Reducer::new(decorations).reduce(chains)`
pub fn reduce(chains: Vec<Chain>, decorations: &DecorationMap) -> Vec<Chain> {
    Reducer::new(decorations).reduce(chains)
}

/// Half-open index range of one unclaimed run
struct Segment {
    start: usize,
    end: usize,
}

/// Claim every unclaimed commit of `commits` and return the maximal runs of
/// commits claimed here
fn split_unclaimed(commits: &[CommitId], claimed: &mut HashSet<CommitId>) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut start = None;

    for (i, id) in commits.iter().enumerate() {
        if claimed.insert(id.clone()) {
            start.get_or_insert(i);
        } else if let Some(s) = start.take() {
            segments.push(Segment { start: s, end: i });
        }
    }
    if let Some(s) = start {
        segments.push(Segment {
            start: s,
            end: commits.len(),
        });
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ChainOrigin;
    use std::collections::{BTreeSet, HashMap};

    fn chain(commits: &[&str]) -> Chain {
        Chain::new(
            ChainOrigin::Ref { name: commits.join("-") },
            commits.iter().map(|c| c.to_string()).collect(),
        )
    }

    fn members(chains: &[Chain]) -> Vec<Vec<&str>> {
        chains
            .iter()
            .map(|c| c.commits.iter().map(String::as_str).collect())
            .collect()
    }

    fn union(chains: &[Chain]) -> BTreeSet<&str> {
        chains.iter().flat_map(|c| c.commits.iter().map(String::as_str)).collect()
    }

    fn assert_invariants(input: &[Chain], output: &[Chain]) {
        assert_eq!(union(input), union(output), "coverage");

        let mut owner: HashMap<&str, usize> = HashMap::new();
        for (i, c) in output.iter().enumerate() {
            for id in &c.commits {
                if let Some(prev) = owner.insert(id.as_str(), i) {
                    assert_eq!(prev, i, "{id} appears in chains {prev} and {i}");
                }
            }
        }
    }

    fn none() -> DecorationMap {
        DecorationMap::new()
    }

    #[test]
    fn test_single_chain_unchanged() {
        let input = vec![chain(&["a1", "a2", "a3"])];
        let output = reduce(input.clone(), &none());

        assert_eq!(output, input);
    }

    #[test]
    fn test_shared_prefix_dropped() {
        let input = vec![chain(&["a1", "a2"]), chain(&["a1", "a2", "b3"])];
        let output = reduce(input.clone(), &none());

        assert_eq!(members(&output), vec![vec!["a1", "a2"], vec!["b3"]]);
        assert_eq!(output[1].fork.as_deref(), Some("a2"));
        assert_eq!(output[1].join, None);
        assert_invariants(&input, &output);
    }

    #[test]
    fn test_fully_subsumed_chain_dropped() {
        let input = vec![chain(&["a1", "a2", "a3"]), chain(&["a1", "a2"])];
        let output = reduce(input.clone(), &none());

        assert_eq!(members(&output), vec![vec!["a1", "a2", "a3"]]);
        assert_invariants(&input, &output);
    }

    #[test]
    fn test_merge_chain_joins_claimed_merge_commit() {
        // master a1 a2 m1, feature b1 b2 merged into m1
        let input = vec![
            chain(&["a1", "a2", "m1"]),
            chain(&["a1", "b1", "b2"]),
            chain(&["a1", "b1", "b2", "m1"]),
        ];
        let output = reduce(input.clone(), &none());

        assert_eq!(members(&output), vec![vec!["a1", "a2", "m1"], vec!["b1", "b2"]]);
        assert_eq!(output[1].fork.as_deref(), Some("a1"));
        assert_eq!(output[1].join, None);
        assert_invariants(&input, &output);
    }

    #[test]
    fn test_merge_chain_before_its_branch() {
        let input = vec![chain(&["a1", "a2", "m1"]), chain(&["a1", "b1", "m1"])];
        let output = reduce(input.clone(), &none());

        assert_eq!(members(&output), vec![vec!["a1", "a2", "m1"], vec!["b1"]]);
        assert_eq!(output[1].fork.as_deref(), Some("a1"));
        assert_eq!(output[1].join.as_deref(), Some("m1"));
        let path: Vec<&str> = output[1].path().map(String::as_str).collect();
        assert_eq!(path, vec!["a1", "b1", "m1"]);
    }

    #[test]
    fn test_interior_claimed_commit_splits_chain() {
        let input = vec![chain(&["x2"]), chain(&["x1", "x2", "x3"])];
        let output = reduce(input.clone(), &none());

        assert_eq!(members(&output), vec![vec!["x2"], vec!["x1"], vec!["x3"]]);
        assert_eq!(output[1].join.as_deref(), Some("x2"));
        assert_eq!(output[2].fork.as_deref(), Some("x2"));
        assert_invariants(&input, &output);
    }

    #[test]
    fn test_repeated_commit_within_chain() {
        let input = vec![chain(&["a1", "a2", "a1"])];
        let output = reduce(input.clone(), &none());

        assert_eq!(members(&output), vec![vec!["a1", "a2"]]);
        assert_eq!(output[0].join.as_deref(), Some("a1"));
        assert_invariants(&input, &output);
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            chain(&["a1", "a2", "a3", "m1", "a4"]),
            chain(&["a1", "b1", "b2"]),
            chain(&["a1", "b1", "b2", "m1"]),
            chain(&["a2", "c1"]),
            chain(&["a1", "a2"]),
            chain(&["c1", "m1"]),
        ];
        let decorations = none();

        let once = reduce(input.clone(), &decorations);
        let twice = reduce(once.clone(), &decorations);

        assert_eq!(once, twice);
        assert_invariants(&input, &once);
    }

    #[test]
    fn test_deterministic() {
        let input = vec![chain(&["a1", "a2"]), chain(&["b1", "a2", "b2"]), chain(&["a1", "c1"])];

        assert_eq!(reduce(input.clone(), &none()), reduce(input, &none()));
    }

    #[test]
    fn test_empty_input() {
        assert!(reduce(Vec::new(), &none()).is_empty());
    }

    #[test]
    fn test_decorations_do_not_change_result() {
        let input = vec![chain(&["a1", "a2"]), chain(&["a1", "a2"])];
        let mut decorations = DecorationMap::new();
        decorations.insert("a2", "(tag: v1.0)");

        assert_eq!(reduce(input.clone(), &decorations), reduce(input, &none()));
    }

    #[test]
    fn test_invariants_on_generated_histories() {
        // pseudo-random chains over a small id space, fixed seed
        let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
        let mut next = move |bound: u64| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state % bound
        };

        for _ in 0..200 {
            let count = next(6) as usize + 1;
            let input: Vec<Chain> = (0..count)
                .map(|_| {
                    let len = next(7) as usize + 1;
                    let ids: Vec<String> = (0..len).map(|_| format!("c{}", next(12))).collect();
                    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
                    chain(&refs)
                })
                .collect();

            let once = reduce(input.clone(), &none());
            assert_invariants(&input, &once);
            assert_eq!(reduce(once.clone(), &none()), once);
        }
    }
}
