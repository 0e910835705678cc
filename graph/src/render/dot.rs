use std::collections::HashSet;

use crate::core::{Chain, Graph};
use crate::decor::{DecorationKind, DecorationMap};

const TAG_FILL: &str = "#ffffdd";
const REF_FILL: &str = "#ddddff";

/// Serializes reduced chains and decorations as a graphviz `strict digraph`
pub struct DotGraphBuilder<'a> {
    name: &'a str,
    chains: &'a [Chain],
    decorations: &'a DecorationMap,
}

impl<'a> DotGraphBuilder<'a> {
    pub fn new(name: &'a str, chains: &'a [Chain], decorations: &'a DecorationMap) -> Self {
        Self {
            name,
            chains,
            decorations,
        }
    }

    pub fn from_graph(name: &'a str, graph: &'a Graph) -> Self {
        Self::new(name, &graph.chains, &graph.decorations)
    }

    pub fn build(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("strict digraph {} {{\n", quote(self.name)));
        self.write_nodes(&mut out);
        self.write_chains(&mut out);
        self.write_decorations(&mut out);
        out.push_str("}\n");
        out
    }

    /// One declaration per distinct commit, before any edge
    fn write_nodes(&self, out: &mut String) {
        let mut declared = HashSet::new();
        for id in self.chains.iter().flat_map(|chain| chain.commits.iter()) {
            if declared.insert(id.as_str()) {
                out.push_str(&format!("  {} [label={}];\n", node_id(id), quote(id)));
            }
        }
    }

    fn write_chains(&self, out: &mut String) {
        for (i, chain) in self.chains.iter().enumerate() {
            out.push_str(&format!("  node[group=\"{}\"];\n", i + 1));
            let path: Vec<String> = chain.path().map(|id| node_id(id)).collect();
            out.push_str(&format!("  {};\n", path.join(" -> ")));
        }
    }

    fn write_decorations(&self, out: &mut String) {
        for (i, (commit, label)) in self.decorations.iter().enumerate() {
            let fill = match DecorationKind::of(label) {
                DecorationKind::Tag => TAG_FILL,
                DecorationKind::Ref => REF_FILL,
            };
            let label = quote(label);

            out.push_str(&format!("  subgraph Decorate{}\n", i + 1));
            out.push_str("  {\n");
            out.push_str("    rank=\"same\";\n");
            out.push_str(&format!(
                "    {label} [shape=\"box\", style=\"filled\", fillcolor=\"{fill}\"];\n"
            ));
            out.push_str(&format!(
                "    {label} -> {} [weight=0, dir=\"none\", arrowhead=\"none\", style=\"dotted\"];\n",
                node_id(commit)
            ));
            out.push_str("  }\n");
        }
    }
}

/// `n<hash>`, quoted unless it is a plain identifier
pub fn node_id(commit: &str) -> String {
    if commit.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        format!("n{commit}")
    } else {
        quote(&format!("n{commit}"))
    }
}

/// Double-quoted string with `\` and `"` escaped
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ChainOrigin;
    use pretty_assertions::assert_eq;

    fn chain(commits: &[&str]) -> Chain {
        Chain::new(
            ChainOrigin::Ref { name: "refs/heads/master".into() },
            commits.iter().map(|c| c.to_string()).collect(),
        )
    }

    fn balanced(text: &str) -> bool {
        let mut depth = 0i32;
        for c in text.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return false;
            }
        }
        depth == 0
    }

    #[test]
    fn test_single_chain() {
        let chains = vec![chain(&["a1", "a2", "a3"])];
        let decorations = DecorationMap::new();

        let dot = DotGraphBuilder::new("widget", &chains, &decorations).build();
        assert_eq!(
            dot,
            "strict digraph \"widget\" {\n\
             \x20 na1 [label=\"a1\"];\n\
             \x20 na2 [label=\"a2\"];\n\
             \x20 na3 [label=\"a3\"];\n\
             \x20 node[group=\"1\"];\n\
             \x20 na1 -> na2 -> na3;\n\
             }\n"
        );
    }

    #[test]
    fn test_tag_decoration() {
        let chains = vec![chain(&["a1", "a2"])];
        let mut decorations = DecorationMap::new();
        decorations.insert("a2", " (tag: v1.0)");

        let dot = DotGraphBuilder::new("widget", &chains, &decorations).build();
        assert!(dot.contains(
            "  subgraph Decorate1\n  {\n    rank=\"same\";\n    \"(tag: v1.0)\" [shape=\"box\", style=\"filled\", fillcolor=\"#ffffdd\"];\n"
        ));
        assert!(dot.contains("    \"(tag: v1.0)\" -> na2 [weight=0"));
        assert!(balanced(&dot));
    }

    #[test]
    fn test_branch_decoration_color() {
        let mut decorations = DecorationMap::new();
        decorations.insert("a1", "(HEAD -> master, origin/master)");

        let dot = DotGraphBuilder::new("widget", &[], &decorations).build();
        assert!(dot.contains("fillcolor=\"#ddddff\""));
        assert!(!dot.contains(TAG_FILL));
    }

    #[test]
    fn test_every_decoration_once() {
        let chains = vec![chain(&["a1", "a2", "a3"])];
        let mut decorations = DecorationMap::new();
        decorations.insert("a1", "(tag: v0.9)");
        decorations.insert("a3", "(master)");
        decorations.insert("zz", "(orphan)");

        let dot = DotGraphBuilder::new("widget", &chains, &decorations).build();
        assert_eq!(dot.matches("subgraph Decorate").count(), 3);
        for (commit, _) in decorations.iter() {
            let edge = format!("-> n{commit} [weight=0");
            assert_eq!(dot.matches(&edge).count(), 1, "{commit}");
        }
    }

    #[test]
    fn test_empty_graph() {
        let dot = DotGraphBuilder::new("empty", &[], &DecorationMap::new()).build();
        assert_eq!(dot, "strict digraph \"empty\" {\n}\n");
        assert!(balanced(&dot));
    }

    #[test]
    fn test_anchored_chain_edges() {
        let mut tail = chain(&["b3"]);
        tail.fork = Some("a2".into());
        let mut merged = chain(&["c1"]);
        merged.join = Some("a2".into());
        let chains = vec![chain(&["a1", "a2"]), tail, merged];

        let dot = DotGraphBuilder::new("widget", &chains, &DecorationMap::new()).build();
        assert!(dot.contains("  node[group=\"2\"];\n  na2 -> nb3;\n"));
        assert!(dot.contains("  node[group=\"3\"];\n  nc1 -> na2;\n"));
        assert_eq!(dot.matches("[label=").count(), 4);
    }

    #[test]
    fn test_lone_commit_chain() {
        let chains = vec![chain(&["s1"])];
        let dot = DotGraphBuilder::new("widget", &chains, &DecorationMap::new()).build();
        assert!(dot.contains("  node[group=\"1\"];\n  ns1;\n"));
    }

    #[test]
    fn test_nodes_declared_once_before_edges() {
        let chains = vec![chain(&["a1", "a2"]), chain(&["a2", "b1"])];
        let dot = DotGraphBuilder::new("widget", &chains, &DecorationMap::new()).build();

        assert_eq!(dot.matches("na2 [label=").count(), 1);
        let last_decl = dot.rfind("[label=").unwrap();
        let first_edge = dot.find("->").unwrap();
        assert!(last_decl < first_edge);
    }

    #[test]
    fn test_escaping() {
        assert_eq!(quote(r#"my "repo"\x"#), r#""my \"repo\"\\x""#);
        assert_eq!(node_id("abc123"), "nabc123");
        assert_eq!(node_id("ab-c"), "\"nab-c\"");

        let dot = DotGraphBuilder::new("a\"b", &[], &DecorationMap::new()).build();
        assert!(dot.starts_with("strict digraph \"a\\\"b\" {\n"));
    }
}
