//! Pointer interpretation: hit-testing, drag, pan, hover and click.
//!
//! ```text
//! Idle --down on node--> DraggingNode --up--> Idle
//! Idle --down on empty--> Panning --up--> Idle
//! ```
//!
//! Travel beyond `click_threshold` screen pixels turns a press into a drag or
//! pan and suppresses the click. Handlers only record intent; the dragged
//! node is pinned to the pointer when the next tick runs.

use super::camera::{Camera, Transform};
use super::config::InteractionConfig;
use super::store::PositionStore;
use super::types::GraphNode;

/// Topmost node whose radius plus `margin_px` (screen pixels) covers the
/// screen point. Later nodes are drawn above earlier ones and win ties.
pub fn hit_test(
	store: &PositionStore,
	nodes: &[GraphNode],
	transform: &Transform,
	sx: f64,
	sy: f64,
	margin_px: f64,
) -> Option<usize> {
	let (wx, wy) = transform.screen_to_world(sx, sy);
	let margin = margin_px / transform.k;
	(0..store.len().min(nodes.len())).rev().find(|&i| {
		let s = store.get(i);
		let (dx, dy) = (s.x - wx, s.y - wy);
		let reach = nodes[i].radius + margin;
		dx * dx + dy * dy <= reach * reach
	})
}

/// Pointer gesture in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
	/// No button held.
	#[default]
	Idle,
	/// Moving a node with the pointer.
	DraggingNode {
		/// Node being dragged.
		node: usize,
		/// Pointer position at press, in screen space.
		origin: (f64, f64),
		/// Latest pointer position in world space.
		pointer: (f64, f64),
		/// Whether travel passed the click threshold.
		moved: bool,
	},
	/// Dragging the background.
	Panning {
		/// Pointer position at press, in screen space.
		origin: (f64, f64),
		/// Previous pointer position, in screen space.
		last: (f64, f64),
		/// Whether travel passed the click threshold.
		moved: bool,
	},
}

/// What a pointer event means for the rest of the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intent {
	/// Press and release without travel; `None` for empty space.
	Click(Option<usize>),
	/// The node under the pointer changed.
	Hover(Option<usize>),
	/// A node was grabbed.
	Grab(usize),
	/// A dragged node was let go.
	Release(usize),
}

/// Pointer state machine.
#[derive(Clone, Debug, Default)]
pub struct Interaction {
	config: InteractionConfig,
	gesture: Gesture,
	hovered: Option<usize>,
}

impl Interaction {
	/// Idle interaction with `config` thresholds.
	pub fn new(config: InteractionConfig) -> Self {
		Self {
			config,
			..Self::default()
		}
	}

	/// Thresholds in use.
	pub fn config(&self) -> &InteractionConfig {
		&self.config
	}

	/// Gesture in progress.
	pub fn gesture(&self) -> &Gesture {
		&self.gesture
	}

	/// Node under the pointer while idle.
	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	/// True when no button is held.
	pub fn is_idle(&self) -> bool {
		self.gesture == Gesture::Idle
	}

	/// Node being dragged, once the pointer has travelled past the click threshold.
	pub fn drag_target(&self) -> Option<(usize, (f64, f64))> {
		match self.gesture {
			Gesture::DraggingNode {
				node,
				pointer,
				moved: true,
				..
			} => Some((node, pointer)),
			_ => None,
		}
	}

	fn past_threshold(&self, origin: (f64, f64), sx: f64, sy: f64) -> bool {
		let (dx, dy) = (sx - origin.0, sy - origin.1);
		dx * dx + dy * dy > self.config.click_threshold * self.config.click_threshold
	}

	/// Start a drag on the node under the pointer, or a pan on empty space.
	pub fn pointer_down(
		&mut self,
		sx: f64,
		sy: f64,
		store: &mut PositionStore,
		nodes: &[GraphNode],
		camera: &Camera,
	) -> Option<Intent> {
		if !self.is_idle() {
			return None;
		}
		let transform = camera.transform();
		match hit_test(store, nodes, transform, sx, sy, self.config.hit_margin) {
			Some(node) => {
				let s = store.get_mut(node);
				s.pinned = true;
				s.vx = 0.0;
				s.vy = 0.0;
				self.gesture = Gesture::DraggingNode {
					node,
					origin: (sx, sy),
					pointer: transform.screen_to_world(sx, sy),
					moved: false,
				};
				Some(Intent::Grab(node))
			}
			None => {
				self.gesture = Gesture::Panning {
					origin: (sx, sy),
					last: (sx, sy),
					moved: false,
				};
				None
			}
		}
	}

	/// Advance the current gesture, or update hover when idle.
	pub fn pointer_move(
		&mut self,
		sx: f64,
		sy: f64,
		store: &PositionStore,
		nodes: &[GraphNode],
		camera: &mut Camera,
	) -> Option<Intent> {
		let past = match self.gesture {
			Gesture::DraggingNode { origin, .. } | Gesture::Panning { origin, .. } => {
				self.past_threshold(origin, sx, sy)
			}
			Gesture::Idle => false,
		};
		match &mut self.gesture {
			Gesture::Idle => {
				let hit = hit_test(store, nodes, camera.transform(), sx, sy, self.config.hit_margin);
				if hit == self.hovered {
					return None;
				}
				self.hovered = hit;
				Some(Intent::Hover(hit))
			}
			Gesture::DraggingNode { pointer, moved, .. } => {
				*moved |= past;
				*pointer = camera.transform().screen_to_world(sx, sy);
				None
			}
			Gesture::Panning { last, moved, .. } => {
				*moved |= past;
				camera.pan_by(sx - last.0, sy - last.1);
				*last = (sx, sy);
				None
			}
		}
	}

	/// Finish the gesture. A dragged node is left exactly under the pointer.
	pub fn pointer_up(
		&mut self,
		sx: f64,
		sy: f64,
		store: &mut PositionStore,
		camera: &Camera,
	) -> Option<Intent> {
		let gesture = std::mem::take(&mut self.gesture);
		match gesture {
			Gesture::Idle => None,
			Gesture::DraggingNode {
				node, origin, moved, ..
			} => {
				store.get_mut(node).pinned = false;
				if moved || self.past_threshold(origin, sx, sy) {
					let (wx, wy) = camera.transform().screen_to_world(sx, sy);
					store.place(node, wx, wy);
					Some(Intent::Release(node))
				} else {
					Some(Intent::Click(Some(node)))
				}
			}
			Gesture::Panning { origin, moved, .. } => {
				if moved || self.past_threshold(origin, sx, sy) {
					None
				} else {
					Some(Intent::Click(None))
				}
			}
		}
	}

	/// Pointer left the surface: abandon the gesture and clear hover.
	pub fn pointer_leave(&mut self, store: &mut PositionStore) -> Option<Intent> {
		if let Gesture::DraggingNode { node, .. } = std::mem::take(&mut self.gesture) {
			store.get_mut(node).pinned = false;
		}
		self.hovered.take().map(|_| Intent::Hover(None))
	}

	/// Pin the dragged node to the pointer with zero velocity.
	pub fn apply_drag(&self, store: &mut PositionStore) {
		if let Some((node, (x, y))) = self.drag_target() {
			store.place(node, x, y);
		}
	}

	/// Follow a node-set rebuild. A gesture on a vanished node is dropped.
	pub fn remap(&mut self, old_to_new: &[Option<usize>]) {
		let map = |i: usize| old_to_new.get(i).copied().flatten();
		self.hovered = self.hovered.and_then(map);
		if let Gesture::DraggingNode { node, .. } = &mut self.gesture {
			match map(*node) {
				Some(n) => *node = n,
				None => self.gesture = Gesture::Idle,
			}
		}
	}
}
