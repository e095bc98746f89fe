//! Resolution graph construction and traversal.

use std::collections::{HashMap, HashSet};
use std::fmt;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::resolved::ResolvedPackage;
use crate::resolver::Resolver;

/// A package in the resolution graph.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct GraphNode {
    pub name: String,
    pub version: String,
    /// False for dependants that were never resolved themselves, such as a
    /// local package whose dependencies were resolved.
    pub resolved: bool,
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// Edge label: the range the dependant declared.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub range: Option<String>,
}

/// The finished resolution as a directed graph, dependant -> dependency.
pub struct ResolutionGraph {
    graph: DiGraph<GraphNode, GraphEdge>,
    index: HashMap<String, NodeIndex>,
}

impl ResolutionGraph {
    pub fn from_resolver(resolver: &Resolver<'_>) -> Self {
        Self::from_packages(resolver.resolved())
    }

    pub fn from_packages<'a>(packages: impl IntoIterator<Item = &'a ResolvedPackage>) -> Self {
        let mut g = Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        };
        let packages: Vec<&ResolvedPackage> = packages.into_iter().collect();
        for package in &packages {
            g.add_node(package.name(), package.version(), true);
        }
        for package in &packages {
            let to = g.index[package.name()];
            for edge in package.required_by() {
                let from = g.add_node(&edge.from, &edge.from_version, false);
                g.graph.add_edge(
                    from,
                    to,
                    GraphEdge {
                        range: edge.range.clone(),
                    },
                );
            }
        }
        g
    }

    fn add_node(&mut self, name: &str, version: &str, resolved: bool) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(GraphNode {
            name: name.to_string(),
            version: version.to_string(),
            resolved,
        });
        self.index.insert(name.to_string(), idx);
        idx
    }

    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &GraphNode {
        &self.graph[idx]
    }

    /// Direct dependencies of a node, ordered by name.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<(NodeIndex, &GraphEdge)> {
        self.neighbors(idx, Direction::Outgoing)
    }

    /// Reverse dependencies (who depends on this node), ordered by name.
    pub fn dependants_of(&self, idx: NodeIndex) -> Vec<(NodeIndex, &GraphEdge)> {
        self.neighbors(idx, Direction::Incoming)
    }

    fn neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<(NodeIndex, &GraphEdge)> {
        let mut edges: Vec<(NodeIndex, &GraphEdge)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| match direction {
                Direction::Outgoing => (e.target(), e.weight()),
                Direction::Incoming => (e.source(), e.weight()),
            })
            .collect();
        edges.sort_by(|a, b| self.graph[a.0].name.cmp(&self.graph[b.0].name));
        edges
    }

    /// Nodes nothing depends on, ordered by name.
    pub fn roots(&self) -> Vec<&GraphNode> {
        let mut roots: Vec<&GraphNode> = self
            .graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .edges_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| &self.graph[idx])
            .collect();
        roots.sort_by(|a, b| a.name.cmp(&b.name));
        roots
    }

    /// Groups of packages that depend on each other, each group and the
    /// list sorted by name.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut names: Vec<String> =
                    scc.iter().map(|&idx| self.graph[idx].name.clone()).collect();
                names.sort();
                names
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Print the dependency tree below `root` to a string.
    ///
    /// A package that reappears on its own path is printed once more with a
    /// `(*)` marker and not expanded.
    pub fn print_tree(&self, root: &str, max_depth: Option<usize>) -> String {
        let mut output = String::new();
        let Some(idx) = self.find(root) else {
            return output;
        };
        output.push_str(&format!("{}\n", self.graph[idx]));

        let mut visited = HashSet::new();
        visited.insert(idx);
        let deps = self.dependencies_of(idx);
        let count = deps.len();
        for (i, (child, edge)) in deps.iter().enumerate() {
            let ctx = TreeContext {
                prefix: "",
                is_last: i == count - 1,
                depth: 1,
                max_depth,
                direction: Direction::Outgoing,
            };
            self.print_subtree(&mut output, *child, edge, &ctx, &mut visited);
        }
        output
    }

    /// Print who depends on `name`, transitively, up to the roots.
    pub fn print_inverted_tree(&self, name: &str) -> String {
        let mut output = String::new();
        let Some(idx) = self.find(name) else {
            return output;
        };
        output.push_str(&format!("{}\n", self.graph[idx]));

        let mut visited = HashSet::new();
        visited.insert(idx);
        let dependants = self.dependants_of(idx);
        let count = dependants.len();
        for (i, (dependant, edge)) in dependants.iter().enumerate() {
            let ctx = TreeContext {
                prefix: "",
                is_last: i == count - 1,
                depth: 1,
                max_depth: None,
                direction: Direction::Incoming,
            };
            self.print_subtree(&mut output, *dependant, edge, &ctx, &mut visited);
        }
        output
    }

    fn print_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        edge: &GraphEdge,
        ctx: &TreeContext<'_>,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if ctx.is_last { "└── " } else { "├── " };
        let node = &self.graph[idx];
        let range = edge.range.as_deref().unwrap_or("latest");
        let seen = visited.contains(&idx);
        output.push_str(&format!(
            "{}{connector}{node} ({range}){}\n",
            ctx.prefix,
            if seen { " (*)" } else { "" }
        ));

        if seen || ctx.max_depth.is_some_and(|max| ctx.depth >= max) {
            return;
        }
        visited.insert(idx);

        let child_prefix = format!("{}{}", ctx.prefix, if ctx.is_last { "    " } else { "│   " });
        let children = self.neighbors(idx, ctx.direction);
        let count = children.len();
        for (i, (child, child_edge)) in children.iter().enumerate() {
            let child_ctx = TreeContext {
                prefix: &child_prefix,
                is_last: i == count - 1,
                depth: ctx.depth + 1,
                max_depth: ctx.max_depth,
                direction: ctx.direction,
            };
            self.print_subtree(output, *child, child_edge, &child_ctx, visited);
        }

        visited.remove(&idx);
    }

    /// Find the dependency chain leading from `from` to `to`.
    pub fn find_path(&self, from: &str, to: &str) -> Option<Vec<&GraphNode>> {
        let start = self.find(from)?;
        let target = self.find(to)?;
        let mut path = Vec::new();
        let mut visited = HashSet::new();
        if self.dfs_path(start, target, &mut path, &mut visited) {
            Some(path.iter().map(|&idx| &self.graph[idx]).collect())
        } else {
            None
        }
    }

    fn dfs_path(
        &self,
        current: NodeIndex,
        target: NodeIndex,
        path: &mut Vec<NodeIndex>,
        visited: &mut HashSet<NodeIndex>,
    ) -> bool {
        path.push(current);
        if current == target {
            return true;
        }
        if !visited.insert(current) {
            path.pop();
            return false;
        }
        for (child, _) in self.dependencies_of(current) {
            if self.dfs_path(child, target, path, visited) {
                return true;
            }
        }
        path.pop();
        false
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

struct TreeContext<'a> {
    prefix: &'a str,
    is_last: bool,
    depth: usize,
    max_depth: Option<usize>,
    direction: Direction,
}
