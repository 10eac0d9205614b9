//! An undirected graph over transcript ids, used by the locus classes
//! to group transcripts by an intersection predicate.
//!
//! Communities are connected components; cliques are maximal cliques
//! (Bron-Kerbosch with pivoting). All enumeration orders are stable:
//! nodes live in ordered sets keyed by tid.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::models::Transcript;

#[derive(Clone, Debug, Default)]
pub struct TranscriptGraph {
    adjacency: BTreeMap<String, BTreeSet<String>>,
}

impl TranscriptGraph {
    /// Builds the graph over `transcripts`: one node per tid, an edge
    /// wherever the predicate holds.
    pub fn define<F>(transcripts: &BTreeMap<String, Transcript>, predicate: F) -> TranscriptGraph
    where
        F: Fn(&Transcript, &Transcript) -> bool,
    {
        let mut adjacency: BTreeMap<String, BTreeSet<String>> = transcripts
            .keys()
            .map(|tid| (tid.clone(), BTreeSet::new()))
            .collect();
        let tids: Vec<&String> = transcripts.keys().collect();
        for (idx, first) in tids.iter().enumerate() {
            for second in tids.iter().skip(idx + 1) {
                if predicate(&transcripts[*first], &transcripts[*second]) {
                    adjacency
                        .get_mut(*first)
                        .unwrap()
                        .insert((*second).clone());
                    adjacency
                        .get_mut(*second)
                        .unwrap()
                        .insert((*first).clone());
                }
            }
        }
        TranscriptGraph { adjacency }
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &String> {
        self.adjacency.keys()
    }

    pub fn neighbors(&self, node: &str) -> Option<&BTreeSet<String>> {
        self.adjacency.get(node)
    }

    /// Removes the given nodes and every edge touching them.
    pub fn remove_nodes(&mut self, nodes: &BTreeSet<String>) {
        for node in nodes {
            self.adjacency.remove(node);
        }
        for neighbors in self.adjacency.values_mut() {
            for node in nodes {
                neighbors.remove(node);
            }
        }
    }

    /// Connected components, each as an ordered tid set. The
    /// components are returned ordered by their smallest member.
    pub fn connected_components(&self) -> Vec<BTreeSet<String>> {
        let mut components = vec![];
        let mut seen: BTreeSet<&String> = BTreeSet::new();
        for start in self.adjacency.keys() {
            if seen.contains(start) {
                continue;
            }
            let mut component = BTreeSet::new();
            let mut queue = VecDeque::from([start]);
            while let Some(node) = queue.pop_front() {
                if !seen.insert(node) {
                    continue;
                }
                component.insert(node.clone());
                for neighbor in &self.adjacency[node] {
                    if !seen.contains(neighbor) {
                        queue.push_back(neighbor);
                    }
                }
            }
            components.push(component);
        }
        components
    }

    /// All maximal cliques (Bron-Kerbosch with pivoting).
    pub fn maximal_cliques(&self) -> Vec<BTreeSet<String>> {
        let mut cliques = vec![];
        let p: BTreeSet<String> = self.adjacency.keys().cloned().collect();
        self.bron_kerbosch(BTreeSet::new(), p, BTreeSet::new(), &mut cliques);
        cliques.sort();
        cliques
    }

    fn bron_kerbosch(
        &self,
        r: BTreeSet<String>,
        mut p: BTreeSet<String>,
        mut x: BTreeSet<String>,
        cliques: &mut Vec<BTreeSet<String>>,
    ) {
        if p.is_empty() && x.is_empty() {
            cliques.push(r);
            return;
        }
        // pivot: the candidate with the most neighbors inside P;
        // ties resolve to the lexicographically smallest tid
        let pivot = p
            .union(&x)
            .max_by_key(|node| {
                (
                    self.adjacency[*node].intersection(&p).count(),
                    std::cmp::Reverse((*node).clone()),
                )
            })
            .cloned()
            .unwrap();
        let candidates: Vec<String> = p.difference(&self.adjacency[&pivot]).cloned().collect();
        for node in candidates {
            let neighbors = &self.adjacency[&node];
            let mut r_next = r.clone();
            r_next.insert(node.clone());
            let p_next = p.intersection(neighbors).cloned().collect();
            let x_next = x.intersection(neighbors).cloned().collect();
            self.bron_kerbosch(r_next, p_next, x_next, cliques);
            p.remove(&node);
            x.insert(node);
        }
    }
}

/// Returns `(cliques, communities)` for the graph, as used by the
/// monosublocus holder to pick winners per community and discard the
/// cliques containing them.
pub fn find_communities(
    graph: &TranscriptGraph,
) -> (Vec<BTreeSet<String>>, Vec<BTreeSet<String>>) {
    (graph.maximal_cliques(), graph.connected_components())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_from_edges(nodes: &[&str], edges: &[(&str, &str)]) -> TranscriptGraph {
        let mut adjacency: BTreeMap<String, BTreeSet<String>> = nodes
            .iter()
            .map(|n| (n.to_string(), BTreeSet::new()))
            .collect();
        for (a, b) in edges {
            adjacency.get_mut(*a).unwrap().insert(b.to_string());
            adjacency.get_mut(*b).unwrap().insert(a.to_string());
        }
        TranscriptGraph { adjacency }
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_connected_components() {
        let graph = graph_from_edges(
            &["a", "b", "c", "d", "e"],
            &[("a", "b"), ("b", "c"), ("d", "e")],
        );
        let components = graph.connected_components();
        assert_eq!(components, vec![set(&["a", "b", "c"]), set(&["d", "e"])]);
    }

    #[test]
    fn test_singleton_components() {
        let graph = graph_from_edges(&["a", "b"], &[]);
        let components = graph.connected_components();
        assert_eq!(components, vec![set(&["a"]), set(&["b"])]);
    }

    #[test]
    fn test_maximal_cliques_triangle_plus_tail() {
        let graph = graph_from_edges(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("a", "c"), ("c", "d")],
        );
        let cliques = graph.maximal_cliques();
        assert_eq!(cliques, vec![set(&["a", "b", "c"]), set(&["c", "d"])]);
    }

    #[test]
    fn test_maximal_cliques_of_edgeless_graph() {
        let graph = graph_from_edges(&["a", "b"], &[]);
        let cliques = graph.maximal_cliques();
        assert_eq!(cliques, vec![set(&["a"]), set(&["b"])]);
    }

    #[test]
    fn test_remove_nodes() {
        let mut graph = graph_from_edges(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "d")],
        );
        graph.remove_nodes(&set(&["b"]));
        assert_eq!(graph.node_count(), 3);
        let components = graph.connected_components();
        assert_eq!(components, vec![set(&["a"]), set(&["c", "d"])]);
    }

    #[test]
    fn test_two_overlapping_cliques() {
        // a-b-c and b-c-d form two triangles sharing the b-c edge
        let graph = graph_from_edges(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("b", "c"), ("b", "d"), ("c", "d")],
        );
        let cliques = graph.maximal_cliques();
        assert_eq!(cliques, vec![set(&["a", "b", "c"]), set(&["b", "c", "d"])]);
    }
}
