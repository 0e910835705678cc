use std::collections::HashMap;
use std::io;

use gitvtree_core::{HistorySource, RunLog};
use graph::{build_graph, DotGraphBuilder};

/// A small repository: master with a release tag, a feature branch merged
/// back, and a hotfix still open
struct SampleHistory {
    chains: HashMap<&'static str, &'static str>,
}

impl SampleHistory {
    fn new() -> Self {
        let chains = HashMap::from([
            ("e5f6a7b", "1a2b3c4\n2b3c4d5\n3c4d5e6\ne5f6a7b"),
            ("f6a7b8c", "1a2b3c4\n2b3c4d5\n4d5e6f7\nf6a7b8c"),
            ("a7b8c9d", "1a2b3c4\n2b3c4d5\n3c4d5e6\na7b8c9d"),
            ("4d5e6f7", "1a2b3c4\n2b3c4d5\n4d5e6f7"),
        ]);
        Self { chains }
    }
}

impl HistorySource for SampleHistory {
    fn decorated_log(&self) -> String {
        [
            "a7b8c9d|3c4d5e6| (hotfix/login)",
            "e5f6a7b|3c4d5e6 4d5e6f7| (HEAD -> master, origin/master)",
            "f6a7b8c|4d5e6f7| (feature/search)",
            "4d5e6f7|2b3c4d5|",
            "3c4d5e6|2b3c4d5| (tag: v1.0)",
            "2b3c4d5|1a2b3c4|",
            "1a2b3c4||",
        ]
        .join("\n")
    }

    fn refs(&self) -> String {
        [
            "e5f6a7b|refs/heads/master",
            "f6a7b8c|refs/heads/feature/search",
            "a7b8c9d|refs/heads/hotfix/login",
            "3c4d5e6|refs/tags/v1.0",
        ]
        .join("\n")
    }

    fn merges(&self) -> String {
        "e5f6a7b|3c4d5e6 4d5e6f7".to_string()
    }

    fn first_parent_chain(&self, rev: &str) -> String {
        self.chains.get(rev).map(|s| s.to_string()).unwrap_or_default()
    }
}

fn main() {
    println!("gitvtree demo");
    println!("=============\n");

    let mut status = |message: &str| eprintln!("  {message}");
    let reduced = match build_graph(&SampleHistory::new(), &mut RunLog::new(io::sink()), &mut status) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error building graph: {}", e);
            return;
        }
    };

    let stats = reduced.stats();
    println!("Graph statistics:");
    println!("  Chains: {}", stats.chains);
    println!("  Commits: {}", stats.commits);
    println!("  Edges: {}", stats.edges);
    println!("  Decorations: {}", stats.decorations);
    println!();

    print!("{}", DotGraphBuilder::from_graph("demo", &reduced).build());
}
