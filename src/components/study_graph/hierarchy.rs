//! Forest structure derived from the link set.
//!
//! Links are validated as they are inserted: a link whose endpoints are
//! unknown, that would give a child a second parent, or that would close a
//! cycle is dropped. Everything that survives forms a forest indexed by the
//! same positions as the Position Store.

use std::collections::VecDeque;

use super::types::{GraphLink, GraphNode, NodeCategory};

/// Parent/child relations over store indices.
#[derive(Clone, Debug, Default)]
pub struct Hierarchy {
	parent: Vec<Option<usize>>,
	children: Vec<Vec<usize>>,
	roots: Vec<usize>,
	root_of: Vec<usize>,
	links: Vec<(usize, usize)>,
	dropped: usize,
}

impl Hierarchy {
	/// Build a forest over `len` nodes, resolving ids with `index_of`.
	pub fn build<'a>(
		len: usize,
		links: impl IntoIterator<Item = &'a GraphLink>,
		index_of: impl Fn(&str) -> Option<usize>,
	) -> Self {
		let mut parent: Vec<Option<usize>> = vec![None; len];
		let mut children = vec![Vec::new(); len];
		let mut kept = Vec::new();
		let mut dropped = 0;

		for link in links {
			let (Some(p), Some(c)) = (index_of(&link.source), index_of(&link.target)) else {
				dropped += 1;
				continue;
			};
			if parent[c].is_some() || is_ancestor_or_self(&parent, c, p) {
				dropped += 1;
				continue;
			}
			parent[c] = Some(p);
			children[p].push(c);
			kept.push((p, c));
		}

		let roots: Vec<usize> = (0..len).filter(|&i| parent[i].is_none()).collect();
		let mut root_of: Vec<usize> = (0..len).collect();
		for &root in &roots {
			let mut queue = VecDeque::from([root]);
			while let Some(i) = queue.pop_front() {
				root_of[i] = root;
				queue.extend(children[i].iter().copied());
			}
		}

		Self {
			parent,
			children,
			roots,
			root_of,
			links: kept,
			dropped,
		}
	}

	/// Number of nodes covered.
	pub fn len(&self) -> usize {
		self.parent.len()
	}

	/// Whether the forest has no nodes.
	pub fn is_empty(&self) -> bool {
		self.parent.is_empty()
	}

	/// Valid `(parent, child)` links in input order.
	pub fn links(&self) -> &[(usize, usize)] {
		&self.links
	}

	/// How many input links were rejected.
	pub fn dropped(&self) -> usize {
		self.dropped
	}

	/// Nodes without a parent, in input order.
	pub fn roots(&self) -> &[usize] {
		&self.roots
	}

	/// Root of the tree containing `i`.
	pub fn root_of(&self, i: usize) -> usize {
		self.root_of[i]
	}

	/// Parent of node `i`, if it has one.
	pub fn parent(&self, i: usize) -> Option<usize> {
		self.parent[i]
	}

	/// Children of node `i` in link order.
	pub fn children(&self, i: usize) -> &[usize] {
		&self.children[i]
	}

	/// Direct parent and children of `i`.
	pub fn neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
		self.parent[i]
			.into_iter()
			.chain(self.children[i].iter().copied())
	}

	/// Leaves below `start`, breadth-first. `start` itself is included when it is a leaf.
	pub fn descendant_leaves(&self, start: usize, nodes: &[GraphNode]) -> Vec<usize> {
		let mut leaves = Vec::new();
		let mut queue = VecDeque::from([start]);
		while let Some(i) = queue.pop_front() {
			if nodes[i].category == NodeCategory::Leaf {
				leaves.push(i);
			}
			queue.extend(self.children[i].iter().copied());
		}
		leaves
	}

	/// Weight per node, clamped to `0..=100`. Groups without an explicit
	/// weight take the mean of their descendant leaves.
	pub fn effective_weights(&self, nodes: &[GraphNode]) -> Vec<f64> {
		(0..nodes.len())
			.map(|i| match (nodes[i].category, nodes[i].weight) {
				(_, Some(w)) => w.clamp(0.0, 100.0),
				(NodeCategory::Leaf, None) => 0.0,
				(NodeCategory::Group, None) => {
					let leaves = self.descendant_leaves(i, nodes);
					if leaves.is_empty() {
						return 0.0;
					}
					let total: f64 = leaves
						.iter()
						.map(|&l| nodes[l].weight.unwrap_or(0.0).clamp(0.0, 100.0))
						.sum();
					total / leaves.len() as f64
				}
			})
			.collect()
	}
}

fn is_ancestor_or_self(parent: &[Option<usize>], candidate: usize, mut node: usize) -> bool {
	loop {
		if node == candidate {
			return true;
		}
		match parent[node] {
			Some(p) => node = p,
			None => return false,
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;

	fn build(nodes: &[GraphNode], links: &[GraphLink]) -> Hierarchy {
		let index: HashMap<&str, usize> = nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.as_str(), i))
			.collect();
		Hierarchy::build(nodes.len(), links, |id| index.get(id).copied())
	}

	fn sample() -> (Vec<GraphNode>, Vec<GraphLink>) {
		let nodes = vec![
			GraphNode::group("bio", "Biology"),
			GraphNode::group("cells", "Cells"),
			GraphNode::leaf("q1", "Q1", 80.0),
			GraphNode::leaf("q2", "Q2", 20.0),
			GraphNode::group("chem", "Chemistry"),
			GraphNode::leaf("q3", "Q3", 50.0),
		];
		let links = vec![
			GraphLink::new("bio", "cells"),
			GraphLink::new("cells", "q1"),
			GraphLink::new("cells", "q2"),
			GraphLink::new("chem", "q3"),
		];
		(nodes, links)
	}

	#[test]
	fn builds_forest_with_roots() {
		let (nodes, links) = sample();
		let h = build(&nodes, &links);
		assert_eq!(h.roots(), &[0, 4]);
		assert_eq!(h.root_of(3), 0);
		assert_eq!(h.root_of(5), 4);
		assert_eq!(h.parent(2), Some(1));
		assert_eq!(h.links().len(), 4);
		assert_eq!(h.dropped(), 0);
	}

	#[test]
	fn drops_invalid_links() {
		let (nodes, mut links) = sample();
		links.push(GraphLink::new("ghost", "q1"));
		links.push(GraphLink::new("chem", "q1"));
		links.push(GraphLink::new("q2", "bio"));
		links.push(GraphLink::new("q3", "q3"));
		let h = build(&nodes, &links);
		assert_eq!(h.links().len(), 4);
		assert_eq!(h.dropped(), 4);
		assert_eq!(h.parent(2), Some(1));
		assert_eq!(h.parent(0), None);
	}

	#[test]
	fn descendant_leaves_are_breadth_first() {
		let (nodes, links) = sample();
		let h = build(&nodes, &links);
		assert_eq!(h.descendant_leaves(0, &nodes), vec![2, 3]);
		assert!(h.descendant_leaves(4, &nodes).contains(&5));
	}

	#[test]
	fn groups_aggregate_leaf_weights() {
		let (nodes, links) = sample();
		let h = build(&nodes, &links);
		let weights = h.effective_weights(&nodes);
		assert_eq!(weights[0], 50.0);
		assert_eq!(weights[1], 50.0);
		assert_eq!(weights[4], 50.0);
		assert_eq!(weights[2], 80.0);
	}

	#[test]
	fn neighbors_cover_parent_and_children() {
		let (nodes, links) = sample();
		let h = build(&nodes, &links);
		let mut n: Vec<usize> = h.neighbors(1).collect();
		n.sort();
		assert_eq!(n, vec![0, 2, 3]);
	}
}
