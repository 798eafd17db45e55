//! Focus path: the leaves of one group, lined up weakest first.

use std::cmp::Ordering;

use super::config::SimulationConfig;
use super::hierarchy::Hierarchy;
use super::types::GraphNode;

/// Linearized subtree of a focus group.
#[derive(Clone, Debug, Default)]
pub struct FocusPath {
	target: usize,
	order: Vec<usize>,
	member: Vec<bool>,
	links: Vec<(usize, usize)>,
}

impl FocusPath {
	/// Collect every leaf below `target` and sort by ascending weight; equal
	/// weights keep their input order.
	pub fn compute(
		target: usize,
		hierarchy: &Hierarchy,
		nodes: &[GraphNode],
		weights: &[f64],
	) -> Self {
		let mut order = hierarchy.descendant_leaves(target, nodes);
		order.sort_by(|&a, &b| {
			weights[a]
				.partial_cmp(&weights[b])
				.unwrap_or(Ordering::Equal)
				.then(a.cmp(&b))
		});

		let mut member = vec![false; nodes.len()];
		for &i in &order {
			member[i] = true;
		}
		let links = order.windows(2).map(|w| (w[0], w[1])).collect();

		Self {
			target,
			order,
			member,
			links,
		}
	}

	/// The focused group.
	pub fn target(&self) -> usize {
		self.target
	}

	/// Leaves in visiting order.
	pub fn order(&self) -> &[usize] {
		&self.order
	}

	/// Synthetic links between consecutive leaves.
	pub fn links(&self) -> &[(usize, usize)] {
		&self.links
	}

	/// Whether node `i` is on the path.
	pub fn contains(&self, i: usize) -> bool {
		self.member.get(i).copied().unwrap_or(false)
	}

	/// True when the target has no leaves to lay out.
	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	/// Serpentine grid slot for every path member, centered on `center`.
	///
	/// Columns are as many `focus_spacing` cells as fit across `viewport_width`
	/// minus the margins; odd rows run right to left so consecutive leaves stay
	/// adjacent.
	pub fn grid_targets(
		&self,
		viewport_width: f64,
		center: (f64, f64),
		config: &SimulationConfig,
	) -> Vec<(usize, (f64, f64))> {
		let n = self.order.len();
		if n == 0 {
			return Vec::new();
		}
		let usable = (viewport_width - 2.0 * config.focus_margin).max(0.0);
		let row_width = ((usable / config.focus_spacing).floor() as usize).max(1);
		let cols = n.min(row_width);
		let rows = n.div_ceil(row_width);

		let x0 = center.0 - (cols as f64 - 1.0) * config.focus_spacing / 2.0;
		let y0 = center.1 - (rows as f64 - 1.0) * config.focus_spacing / 2.0;

		self.order
			.iter()
			.enumerate()
			.map(|(slot, &i)| {
				let row = slot / row_width;
				let mut col = slot % row_width;
				if row % 2 == 1 {
					col = row_width - 1 - col;
				}
				let x = x0 + col as f64 * config.focus_spacing;
				let y = y0 + row as f64 * config.focus_spacing;
				(i, (x, y))
			})
			.collect()
	}
}
