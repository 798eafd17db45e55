//! Engine state combining layout, camera, pointer handling and highlights.
//!
//! [`GraphViewState`] owns everything the renderer reads. The host drives it
//! with a thin loop: feed pointer events as they arrive, then call
//! [`GraphViewState::step`] once per frame before rendering. Nothing in here
//! touches the DOM, so the whole engine runs in native tests.

use std::collections::HashSet;

use log::{info, warn};

use super::camera::Camera;
use super::config::ViewConfig;
use super::focus::FocusPath;
use super::hierarchy::Hierarchy;
use super::highlight::HighlightState;
use super::interaction::{Intent, Interaction};
use super::simulation::{LayoutInputs, Simulation, StepOutcome};
use super::store::PositionStore;
use super::types::{GraphData, GraphNode, LayoutMode};

/// Notifications for the host UI.
#[derive(Clone, Debug)]
pub enum GraphEvent {
	/// A node (or empty space, `None`) was clicked.
	NodeClick(Option<GraphNode>),
	/// The reported hover target changed, filtered by the hover policy.
	NodeHover(Option<GraphNode>),
}

/// Core graph state, created once per canvas and mutated every frame.
pub struct GraphViewState {
	config: ViewConfig,
	nodes: Vec<GraphNode>,
	hierarchy: Hierarchy,
	weights: Vec<f64>,
	store: PositionStore,
	simulation: Simulation,
	camera: Camera,
	interaction: Interaction,
	highlight: HighlightState,
	mode: LayoutMode,
	focus: Option<FocusPath>,
	reported_hover: Option<usize>,
	width: f64,
	height: f64,
	time: f64,
}

impl GraphViewState {
	/// Empty view over a `width` by `height` viewport.
	pub fn new(config: ViewConfig, width: f64, height: f64) -> Self {
		Self {
			simulation: Simulation::new(config.simulation.clone()),
			camera: Camera::new(config.camera.clone(), width, height),
			interaction: Interaction::new(config.interaction.clone()),
			config,
			nodes: Vec::new(),
			hierarchy: Hierarchy::default(),
			weights: Vec::new(),
			store: PositionStore::new(),
			highlight: HighlightState::default(),
			mode: LayoutMode::default(),
			focus: None,
			reported_hover: None,
			width,
			height,
			time: 0.0,
		}
	}

	/// Merge a freshly built node/link set. Kinetic state survives for every
	/// id still present; links that do not form a valid forest are dropped.
	pub fn set_data(&mut self, data: &GraphData) {
		let mut seen = HashSet::with_capacity(data.nodes.len());
		let mut nodes = Vec::with_capacity(data.nodes.len());
		for node in &data.nodes {
			if seen.insert(node.id.as_str()) {
				nodes.push(node.clone());
			} else {
				warn!("study-graph: duplicate node id {:?} ignored", node.id);
			}
		}

		let center = (self.width / 2.0, self.height / 2.0);
		let spawn_radius = self.simulation.config().spawn_radius;
		let reconciled = self
			.store
			.reconcile(nodes.iter().map(|n| n.id.as_str()), center, spawn_radius);

		let store = &self.store;
		let hierarchy = Hierarchy::build(nodes.len(), &data.links, |id| store.index_of(id));
		if hierarchy.dropped() > 0 {
			warn!("study-graph: dropped {} invalid link(s)", hierarchy.dropped());
		}
		let weights = hierarchy.effective_weights(&nodes);
		// With unchanged ids the indices line up, so the builds compare directly.
		let rebuilt = reconciled.changed()
			|| hierarchy.links() != self.hierarchy.links()
			|| weights != self.weights;
		self.hierarchy = hierarchy;
		self.weights = weights;
		self.nodes = nodes;

		self.highlight.remap(&reconciled.old_to_new);
		self.interaction.remap(&reconciled.old_to_new);
		self.reported_hover = self
			.reported_hover
			.and_then(|i| reconciled.old_to_new.get(i).copied().flatten());

		if rebuilt {
			self.simulation.perturb();
		}
		self.refresh_focus();

		info!(
			"study-graph: {} nodes, {} links (+{} / -{})",
			self.nodes.len(),
			self.hierarchy.links().len(),
			reconciled.added,
			reconciled.removed
		);
	}

	/// Switch layout behavior. Nodes keep their positions and move from there.
	pub fn set_mode(&mut self, mode: LayoutMode) {
		if mode == self.mode {
			return;
		}
		info!("study-graph: layout mode {:?}", mode);
		self.mode = mode;
		self.store.halt();
		self.simulation.perturb();
		match self.mode {
			LayoutMode::Force => {}
			LayoutMode::Orbit | LayoutMode::FocusPath(_) => self.simulation.request_centering(),
		}
		self.refresh_focus();
	}

	fn refresh_focus(&mut self) {
		self.focus = match self.mode.focus_target() {
			None => None,
			Some(id) => match self.store.index_of(id) {
				Some(target) => Some(FocusPath::compute(
					target,
					&self.hierarchy,
					&self.nodes,
					&self.weights,
				)),
				None => {
					if !self.nodes.is_empty() {
						warn!("study-graph: focus target {:?} is not in the graph", id);
					}
					None
				}
			},
		};
	}

	/// Update the viewport. Camera state is kept; a refit happens only when no
	/// camera animation is already pending.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.camera.resize(width, height);
		if !self.camera.has_target() {
			self.reset_view();
		}
	}

	/// One frame: pin any dragged node, advance the layout, ease the camera,
	/// fade highlights.
	pub fn step(&mut self, dt: f64) -> StepOutcome {
		self.time += dt;
		self.interaction.apply_drag(&mut self.store);

		let outcome = self.simulation.step(
			&self.mode,
			&mut self.store,
			LayoutInputs {
				hierarchy: &self.hierarchy,
				weights: &self.weights,
				focus: self.focus.as_ref(),
				viewport: (self.width, self.height),
			},
		);
		if outcome.refit {
			self.reset_view();
		}
		self.camera.tick();
		self.highlight.tick(dt);
		outcome
	}

	/// Mouse press at screen point (`sx`, `sy`).
	pub fn pointer_down(&mut self, sx: f64, sy: f64) -> Option<GraphEvent> {
		let intent =
			self.interaction
				.pointer_down(sx, sy, &mut self.store, &self.nodes, &self.camera);
		self.dispatch(intent)
	}

	/// Mouse move at screen point (`sx`, `sy`).
	pub fn pointer_move(&mut self, sx: f64, sy: f64) -> Option<GraphEvent> {
		let intent =
			self.interaction
				.pointer_move(sx, sy, &self.store, &self.nodes, &mut self.camera);
		self.dispatch(intent)
	}

	/// Mouse release at screen point (`sx`, `sy`).
	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> Option<GraphEvent> {
		let intent = self
			.interaction
			.pointer_up(sx, sy, &mut self.store, &self.camera);
		self.dispatch(intent)
	}

	/// Pointer left the canvas; ends any gesture and clears hover.
	pub fn pointer_leave(&mut self) -> Option<GraphEvent> {
		let intent = self.interaction.pointer_leave(&mut self.store);
		self.dispatch(intent)
	}

	/// Wheel zoom anchored at the pointer; positive `delta_y` zooms out.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		if delta_y == 0.0 {
			return;
		}
		let step = self.config.camera.zoom_step;
		let factor = if delta_y > 0.0 { 1.0 / step } else { step };
		self.camera.zoom_at(sx, sy, factor);
	}

	fn dispatch(&mut self, intent: Option<Intent>) -> Option<GraphEvent> {
		match intent? {
			Intent::Click(node) => Some(GraphEvent::NodeClick(
				node.map(|i| self.nodes[i].clone()),
			)),
			Intent::Hover(node) => {
				let neighbors: Vec<usize> = node
					.map(|i| self.hierarchy.neighbors(i).collect())
					.unwrap_or_default();
				self.highlight.set_hover(node, neighbors);

				let policy = self.config.interaction.hover_policy;
				let report = node.filter(|&i| policy.admits(self.nodes[i].category));
				if report == self.reported_hover {
					return None;
				}
				self.reported_hover = report;
				Some(GraphEvent::NodeHover(report.map(|i| self.nodes[i].clone())))
			}
			Intent::Grab(_) | Intent::Release(_) => {
				self.simulation.perturb();
				None
			}
		}
	}

	/// Animated zoom in about the viewport centre.
	pub fn zoom_in(&mut self) {
		self.camera.zoom_in();
	}

	/// Animated zoom out about the viewport centre.
	pub fn zoom_out(&mut self) {
		self.camera.zoom_out();
	}

	/// Fit the nodes relevant to the current mode: the focus path when one is
	/// active, otherwise everything.
	pub fn reset_view(&mut self) {
		let store = &self.store;
		let nodes = &self.nodes;
		let disc = |i: usize| {
			let s = store.get(i);
			(s.x, s.y, nodes[i].radius)
		};
		let focus = self.focus.as_ref().filter(|p| !p.is_empty());
		let fitted = match focus {
			Some(path) => self.camera.fit_to_bounds(path.order().iter().map(|&i| disc(i))),
			None => self.camera.fit_to_bounds((0..store.len()).map(disc)),
		};
		if fitted {
			log::debug!("study-graph: refit camera");
		}
	}

	/// Focus path that currently shapes the view, if any.
	pub fn active_focus(&self) -> Option<&FocusPath> {
		self.focus.as_ref().filter(|p| !p.is_empty())
	}

	/// Whether node `i` sits outside an active focus path.
	pub fn is_context_node(&self, i: usize) -> bool {
		self.active_focus().is_some_and(|p| !p.contains(i))
	}

	/// Nodes in store order.
	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	/// Validated forest over [`Self::nodes`].
	pub fn hierarchy(&self) -> &Hierarchy {
		&self.hierarchy
	}

	/// Effective weight of node `i`.
	pub fn weight(&self, i: usize) -> f64 {
		self.weights[i]
	}

	/// Kinetic state per node.
	pub fn store(&self) -> &PositionStore {
		&self.store
	}

	/// Camera.
	pub fn camera(&self) -> &Camera {
		&self.camera
	}

	/// Hover highlight intensities.
	pub fn highlight(&self) -> &HighlightState {
		&self.highlight
	}

	/// Pointer gesture state.
	pub fn interaction(&self) -> &Interaction {
		&self.interaction
	}

	/// Layout simulation.
	pub fn simulation(&self) -> &Simulation {
		&self.simulation
	}

	/// Configuration in use.
	pub fn config(&self) -> &ViewConfig {
		&self.config
	}

	/// Active layout mode.
	pub fn mode(&self) -> &LayoutMode {
		&self.mode
	}

	/// Node under the pointer, regardless of hover policy.
	pub fn hovered(&self) -> Option<usize> {
		self.interaction.hovered()
	}

	/// Hovered node as last reported to the host, after the hover policy.
	pub fn reported_hover(&self) -> Option<usize> {
		self.reported_hover
	}

	/// Viewport size in pixels.
	pub fn viewport(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// Seconds of animation time elapsed.
	pub fn time(&self) -> f64 {
		self.time
	}

	/// World position of a node by id.
	pub fn position(&self, id: &str) -> Option<(f64, f64)> {
		self.store.by_id(id).map(|s| (s.x, s.y))
	}
}
