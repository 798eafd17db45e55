//! Layout simulation advancing the Position Store once per tick.
//!
//! Three mutually exclusive behaviors share one dispatcher:
//! - **Force**: pairwise inverse-square repulsion, link springs and a weak
//!   pull to the viewport center, with damping. Settles (stops integrating)
//!   once mean kinetic energy drops under the threshold.
//! - **Orbit**: each node seeks a fixed slot whose angle comes from its root
//!   group's sector and whose radius shrinks as its weight grows.
//! - **Focus path**: path leaves seek serpentine grid cells; every other node
//!   holds still.

use std::f64::consts::TAU;

use log::debug;

use super::config::SimulationConfig;
use super::focus::FocusPath;
use super::hierarchy::Hierarchy;
use super::store::{PositionStore, pseudo_random};
use super::types::LayoutMode;

/// Read-only layout inputs for one tick.
#[derive(Clone, Copy)]
pub struct LayoutInputs<'a> {
	/// Validated forest over the current nodes.
	pub hierarchy: &'a Hierarchy,
	/// Effective weight per node.
	pub weights: &'a [f64],
	/// Current focus path, when focus mode resolved its target.
	pub focus: Option<&'a FocusPath>,
	/// Viewport `(width, height)`; the layout center is its midpoint.
	pub viewport: (f64, f64),
}

impl LayoutInputs<'_> {
	fn center(&self) -> (f64, f64) {
		(self.viewport.0 / 2.0, self.viewport.1 / 2.0)
	}
}

/// What a tick produced.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepOutcome {
	/// Any node moved.
	pub moved: bool,
	/// The one-shot centering condition fired; the camera should refit.
	pub refit: bool,
}

/// Layout engine state carried between ticks.
#[derive(Clone, Debug)]
pub struct Simulation {
	config: SimulationConfig,
	settled: bool,
	energy: f64,
	centering: bool,
	forces: Vec<(f64, f64)>,
}

impl Simulation {
	/// Unsettled simulation with `config` tuning.
	pub fn new(config: SimulationConfig) -> Self {
		Self {
			config,
			settled: false,
			energy: 0.0,
			centering: false,
			forces: Vec::new(),
		}
	}

	/// Tuning in use.
	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	/// Whether force mode has come to rest.
	pub fn is_settled(&self) -> bool {
		self.settled
	}

	/// Mean per-node kinetic energy after the last force tick.
	pub fn energy(&self) -> f64 {
		self.energy
	}

	/// Wake a settled simulation (node-set change, mode switch, drag).
	pub fn perturb(&mut self) {
		self.settled = false;
	}

	/// Arm the one-shot refit that fires once seek motion calms down.
	pub fn request_centering(&mut self) {
		self.centering = true;
	}

	/// Whether the one-shot centering refit is still armed.
	pub fn centering_pending(&self) -> bool {
		self.centering
	}

	/// Advance one tick under `mode`. An empty store is a no-op.
	pub fn step(
		&mut self,
		mode: &LayoutMode,
		store: &mut PositionStore,
		inputs: LayoutInputs<'_>,
	) -> StepOutcome {
		if store.is_empty() {
			return StepOutcome::default();
		}
		match mode {
			LayoutMode::Force => self.step_force(store, inputs),
			LayoutMode::Orbit => {
				let targets = orbit_targets(inputs.hierarchy, inputs.weights, inputs.viewport, &self.config);
				let slots: Vec<(usize, (f64, f64))> = targets.into_iter().enumerate().collect();
				self.seek(store, &slots)
			}
			LayoutMode::FocusPath(_) => {
				let slots = match inputs.focus {
					Some(path) => path.grid_targets(inputs.viewport.0, inputs.center(), &self.config),
					None => Vec::new(),
				};
				// Nodes off the path hold their place.
				store.halt();
				self.seek(store, &slots)
			}
		}
	}

	fn step_force(&mut self, store: &mut PositionStore, inputs: LayoutInputs<'_>) -> StepOutcome {
		if self.settled {
			return StepOutcome::default();
		}
		let cfg = &self.config;
		let n = store.len();
		self.forces.clear();
		self.forces.resize(n, (0.0, 0.0));

		let states = store.states();
		for i in 0..n {
			for j in (i + 1)..n {
				let (dx, dy) = (states[i].x - states[j].x, states[i].y - states[j].y);
				let raw = (dx * dx + dy * dy).sqrt();
				let (ux, uy) = if raw > 0.0 {
					(dx / raw, dy / raw)
				} else {
					// Coincident: push apart along an arbitrary but stable axis.
					let a = (i + j) as f64;
					(a.cos(), a.sin())
				};
				let dist = raw.max(1.0);
				let f = cfg.repulsion / (dist * dist);
				self.forces[i].0 += f * ux;
				self.forces[i].1 += f * uy;
				self.forces[j].0 -= f * ux;
				self.forces[j].1 -= f * uy;
			}
		}

		for &(p, c) in inputs.hierarchy.links() {
			let (dx, dy) = (states[c].x - states[p].x, states[c].y - states[p].y);
			let raw = (dx * dx + dy * dy).sqrt();
			if raw <= 0.0 {
				continue;
			}
			let f = cfg.spring_stiffness * (raw - cfg.rest_length);
			let (fx, fy) = (f * dx / raw, f * dy / raw);
			self.forces[p].0 += fx;
			self.forces[p].1 += fy;
			self.forces[c].0 -= fx;
			self.forces[c].1 -= fy;
		}

		let (cx, cy) = inputs.center();
		let mut energy = 0.0;
		let mut any_pinned = false;
		for (s, &(fx, fy)) in store.states_mut().iter_mut().zip(&self.forces) {
			if s.pinned {
				s.vx = 0.0;
				s.vy = 0.0;
				any_pinned = true;
				continue;
			}
			let fx = fx + cfg.center_pull * (cx - s.x);
			let fy = fy + cfg.center_pull * (cy - s.y);
			s.vx = (s.vx + fx) * cfg.damping;
			s.vy = (s.vy + fy) * cfg.damping;
			let speed = s.speed_sq().sqrt();
			if speed > cfg.max_velocity {
				s.vx *= cfg.max_velocity / speed;
				s.vy *= cfg.max_velocity / speed;
			}
			s.x += s.vx;
			s.y += s.vy;
			energy += 0.5 * s.speed_sq();
		}
		self.energy = energy / n as f64;

		if !any_pinned && self.energy < cfg.settle_threshold {
			self.settled = true;
			debug!("study-graph: force layout settled (energy {:.5})", self.energy);
		}

		StepOutcome {
			moved: true,
			refit: false,
		}
	}

	/// Move each slotted node a fixed fraction of the way to its target.
	fn seek(&mut self, store: &mut PositionStore, slots: &[(usize, (f64, f64))]) -> StepOutcome {
		let fraction = self.config.seek_fraction;
		let mut motion = 0.0;
		for &(i, (tx, ty)) in slots {
			let s = store.get_mut(i);
			if s.pinned {
				s.vx = 0.0;
				s.vy = 0.0;
				continue;
			}
			s.vx = (tx - s.x) * fraction;
			s.vy = (ty - s.y) * fraction;
			s.x += s.vx;
			s.y += s.vy;
			motion += s.speed_sq().sqrt();
		}
		let mean_motion = if slots.is_empty() {
			0.0
		} else {
			motion / slots.len() as f64
		};

		let refit = self.centering && mean_motion < self.config.centering_threshold;
		if refit {
			self.centering = false;
			debug!("study-graph: seek layout calmed, requesting refit");
		}
		StepOutcome {
			moved: motion > 0.0,
			refit,
		}
	}
}

/// Radial distance of a node in orbit mode. Monotonically decreasing in weight.
pub fn orbit_radius(weight: f64, viewport: (f64, f64), config: &SimulationConfig) -> f64 {
	let extent = viewport.0.min(viewport.1) * config.orbit_extent;
	let factor = 1.0 - weight.clamp(0.0, 100.0) / (100.0 + config.orbit_margin);
	extent * factor
}

/// Orbit slot for every node.
///
/// Sectors split the circle evenly among roots (in input order). Within a
/// sector, members of that tree spread over `sector_fill` of the arc in input
/// order, each nudged by a small deterministic jitter.
pub fn orbit_targets(
	hierarchy: &Hierarchy,
	weights: &[f64],
	viewport: (f64, f64),
	config: &SimulationConfig,
) -> Vec<(f64, f64)> {
	let n = hierarchy.len();
	let roots = hierarchy.roots();
	if n == 0 || roots.is_empty() {
		return Vec::new();
	}
	let center = (viewport.0 / 2.0, viewport.1 / 2.0);
	let sector = TAU / roots.len() as f64;

	let mut members: Vec<Vec<usize>> = vec![Vec::new(); roots.len()];
	let mut sector_of = vec![0usize; n];
	for (s, &r) in roots.iter().enumerate() {
		sector_of[r] = s;
	}
	for i in 0..n {
		let s = sector_of[hierarchy.root_of(i)];
		members[s].push(i);
	}

	let mut targets = vec![center; n];
	for (s, group) in members.iter().enumerate() {
		let slot = sector * config.sector_fill / group.len() as f64;
		let start = sector * s as f64 + sector * (1.0 - config.sector_fill) / 2.0;
		for (rank, &i) in group.iter().enumerate() {
			let jitter = (pseudo_random(i as f64 + 0.5) - 0.5) * slot * 0.3;
			let angle = start + slot * (rank as f64 + 0.5) + jitter;
			let r = orbit_radius(weights[i], viewport, config);
			targets[i] = (center.0 + r * angle.cos(), center.1 + r * angle.sin());
		}
	}
	targets
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;
	use crate::components::study_graph::types::{GraphLink, GraphNode};

	fn hierarchy(nodes: &[GraphNode], links: &[GraphLink]) -> Hierarchy {
		let index: HashMap<&str, usize> = nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.as_str(), i))
			.collect();
		Hierarchy::build(nodes.len(), links, |id| index.get(id).copied())
	}

	fn store_for(nodes: &[GraphNode], center: (f64, f64), radius: f64) -> PositionStore {
		let mut store = PositionStore::new();
		store.reconcile(nodes.iter().map(|n| n.id.as_str()), center, radius);
		store
	}

	#[test]
	fn empty_store_is_noop() {
		let mut sim = Simulation::new(SimulationConfig::default());
		let mut store = PositionStore::new();
		let h = Hierarchy::default();
		let outcome = sim.step(
			&LayoutMode::Force,
			&mut store,
			LayoutInputs {
				hierarchy: &h,
				weights: &[],
				focus: None,
				viewport: (800.0, 600.0),
			},
		);
		assert_eq!(outcome, StepOutcome::default());
	}

	#[test]
	fn coincident_nodes_separate() {
		let nodes = vec![GraphNode::leaf("a", "A", 0.0), GraphNode::leaf("b", "B", 0.0)];
		let h = hierarchy(&nodes, &[]);
		let mut store = store_for(&nodes, (400.0, 300.0), 0.0);
		let mut sim = Simulation::new(SimulationConfig::default());
		let weights = h.effective_weights(&nodes);
		sim.step(
			&LayoutMode::Force,
			&mut store,
			LayoutInputs {
				hierarchy: &h,
				weights: &weights,
				focus: None,
				viewport: (800.0, 600.0),
			},
		);
		let (a, b) = (store.get(0), store.get(1));
		assert!(a.x.is_finite() && b.y.is_finite());
		assert!((a.x - b.x).abs() + (a.y - b.y).abs() > 0.0);
	}

	#[test]
	fn spring_pulls_linked_nodes_toward_rest_length() {
		let nodes = vec![GraphNode::group("g", "G"), GraphNode::leaf("a", "A", 0.0)];
		let links = vec![GraphLink::new("g", "a")];
		let h = hierarchy(&nodes, &links);
		let weights = h.effective_weights(&nodes);
		let mut store = store_for(&nodes, (0.0, 0.0), 0.0);
		store.place(0, 0.0, 0.0);
		store.place(1, 500.0, 0.0);
		let config = SimulationConfig {
			repulsion: 0.0,
			center_pull: 0.0,
			..SimulationConfig::default()
		};
		let mut sim = Simulation::new(config);
		sim.step(
			&LayoutMode::Force,
			&mut store,
			LayoutInputs {
				hierarchy: &h,
				weights: &weights,
				focus: None,
				viewport: (0.0, 0.0),
			},
		);
		assert!(store.get(0).x > 0.0);
		assert!(store.get(1).x < 500.0);
	}

	#[test]
	fn pinned_node_holds_position() {
		let nodes = vec![GraphNode::leaf("a", "A", 0.0), GraphNode::leaf("b", "B", 0.0)];
		let h = hierarchy(&nodes, &[]);
		let weights = h.effective_weights(&nodes);
		let mut store = store_for(&nodes, (400.0, 300.0), 20.0);
		store.place(0, 10.0, 10.0);
		store.get_mut(0).pinned = true;
		let mut sim = Simulation::new(SimulationConfig::default());
		for _ in 0..50 {
			sim.step(
				&LayoutMode::Force,
				&mut store,
				LayoutInputs {
					hierarchy: &h,
					weights: &weights,
					focus: None,
					viewport: (800.0, 600.0),
				},
			);
		}
		assert_eq!((store.get(0).x, store.get(0).y), (10.0, 10.0));
		assert!(!sim.is_settled());
	}

	#[test]
	fn orbit_radius_shrinks_with_weight() {
		let config = SimulationConfig::default();
		let vp = (800.0, 600.0);
		assert!(orbit_radius(0.0, vp, &config) > orbit_radius(50.0, vp, &config));
		assert!(orbit_radius(50.0, vp, &config) > orbit_radius(100.0, vp, &config));
		assert!(orbit_radius(100.0, vp, &config) > 0.0);
	}

	#[test]
	fn roots_get_distinct_sectors() {
		let nodes = vec![
			GraphNode::group("a", "A"),
			GraphNode::leaf("a1", "A1", 0.0),
			GraphNode::group("b", "B"),
			GraphNode::leaf("b1", "B1", 0.0),
		];
		let links = vec![GraphLink::new("a", "a1"), GraphLink::new("b", "b1")];
		let h = hierarchy(&nodes, &links);
		let weights = h.effective_weights(&nodes);
		let config = SimulationConfig::default();
		let targets = orbit_targets(&h, &weights, (800.0, 800.0), &config);
		let angle = |i: usize| {
			let (x, y) = targets[i];
			(y - 400.0).atan2(x - 400.0).rem_euclid(TAU)
		};
		// Two roots: sector A spans [0, π), sector B spans [π, 2π).
		assert!(angle(0) < std::f64::consts::PI && angle(1) < std::f64::consts::PI);
		assert!(angle(2) > std::f64::consts::PI && angle(3) > std::f64::consts::PI);
	}

	#[test]
	fn orbit_centering_fires_once() {
		let nodes = vec![GraphNode::leaf("a", "A", 30.0), GraphNode::leaf("b", "B", 90.0)];
		let h = hierarchy(&nodes, &[]);
		let weights = h.effective_weights(&nodes);
		let mut store = store_for(&nodes, (400.0, 300.0), 10.0);
		let mut sim = Simulation::new(SimulationConfig::default());
		sim.request_centering();
		let mut refits = 0;
		for _ in 0..300 {
			let outcome = sim.step(
				&LayoutMode::Orbit,
				&mut store,
				LayoutInputs {
					hierarchy: &h,
					weights: &weights,
					focus: None,
					viewport: (800.0, 600.0),
				},
			);
			refits += outcome.refit as usize;
		}
		assert_eq!(refits, 1);
		assert!(!sim.centering_pending());
	}
}
