//! Per-node kinetic state keyed by stable node id.
//!
//! Records live in a contiguous `Vec` whose order matches the current node
//! list; an id → index map resolves lookups. Reconciling against a new node
//! set carries surviving records over untouched, spawns fresh ones near the
//! viewport center and prunes the rest.

use std::collections::HashMap;
use std::f64::consts::TAU;

/// Position and velocity of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KineticState {
	/// World x.
	pub x: f64,
	/// World y.
	pub y: f64,
	/// Velocity along x, world units per tick.
	pub vx: f64,
	/// Velocity along y, world units per tick.
	pub vy: f64,
	/// Held in place by a drag; physics skips it.
	pub pinned: bool,
}

impl KineticState {
	/// Squared speed.
	pub fn speed_sq(&self) -> f64 {
		self.vx * self.vx + self.vy * self.vy
	}
}

/// Outcome of [`PositionStore::reconcile`].
#[derive(Clone, Debug, Default)]
pub struct Reconciled {
	/// New index for each previous index (`None` when pruned).
	pub old_to_new: Vec<Option<usize>>,
	/// Ids new in this build.
	pub added: usize,
	/// Ids pruned by this build.
	pub removed: usize,
}

impl Reconciled {
	/// Whether the node set changed at all (ids added, removed or reordered).
	pub fn changed(&self) -> bool {
		self.added > 0
			|| self.removed > 0
			|| self
				.old_to_new
				.iter()
				.enumerate()
				.any(|(old, new)| *new != Some(old))
	}
}

/// Id-keyed kinetic records over a contiguous array.
#[derive(Clone, Debug, Default)]
pub struct PositionStore {
	states: Vec<KineticState>,
	ids: Vec<String>,
	index: HashMap<String, usize>,
	spawn_counter: u64,
}

impl PositionStore {
	/// Empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Match the store to `ids` (in order). Existing records are preserved,
	/// unknown ids spawn within `spawn_radius` of `center`, missing ids are pruned.
	/// Duplicate ids must already have been removed by the caller.
	pub fn reconcile<'a>(
		&mut self,
		ids: impl IntoIterator<Item = &'a str>,
		center: (f64, f64),
		spawn_radius: f64,
	) -> Reconciled {
		let mut old_to_new = vec![None; self.states.len()];
		let mut states = Vec::with_capacity(self.states.len());
		let mut new_ids = Vec::with_capacity(self.ids.len());
		let mut index = HashMap::with_capacity(self.index.len());
		let mut added = 0;

		for id in ids {
			let new_idx = states.len();
			let state = match self.index.get(id) {
				Some(&old) => {
					old_to_new[old] = Some(new_idx);
					self.states[old]
				}
				None => {
					added += 1;
					self.spawn(center, spawn_radius)
				}
			};
			states.push(state);
			new_ids.push(id.to_string());
			index.insert(id.to_string(), new_idx);
		}

		let removed = old_to_new.iter().filter(|m| m.is_none()).count();
		self.states = states;
		self.ids = new_ids;
		self.index = index;

		Reconciled {
			old_to_new,
			added,
			removed,
		}
	}

	/// Deterministic pseudo-random spawn point in a disc around `center`.
	fn spawn(&mut self, center: (f64, f64), radius: f64) -> KineticState {
		let seed = self.spawn_counter as f64;
		self.spawn_counter += 1;
		let angle = pseudo_random(seed * 1.7 + 0.3) * TAU;
		let dist = pseudo_random(seed * 2.9 + 1.1) * radius;
		KineticState {
			x: center.0 + dist * angle.cos(),
			y: center.1 + dist * angle.sin(),
			..KineticState::default()
		}
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	/// True when no nodes are stored.
	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Index of node `id`.
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Id of node `i`.
	pub fn id(&self, i: usize) -> &str {
		&self.ids[i]
	}

	/// State of node `i`.
	pub fn get(&self, i: usize) -> &KineticState {
		&self.states[i]
	}

	/// Mutable state of node `i`.
	pub fn get_mut(&mut self, i: usize) -> &mut KineticState {
		&mut self.states[i]
	}

	/// Look up by id.
	pub fn by_id(&self, id: &str) -> Option<&KineticState> {
		self.index_of(id).map(|i| &self.states[i])
	}

	/// All states in index order.
	pub fn states(&self) -> &[KineticState] {
		&self.states
	}

	/// All states, mutable, in index order.
	pub fn states_mut(&mut self) -> &mut [KineticState] {
		&mut self.states
	}

	/// Zero every velocity.
	pub fn halt(&mut self) {
		for s in &mut self.states {
			s.vx = 0.0;
			s.vy = 0.0;
		}
	}

	/// Move a node to `(x, y)` and clear its velocity.
	pub fn place(&mut self, i: usize, x: f64, y: f64) {
		let s = &mut self.states[i];
		s.x = x;
		s.y = y;
		s.vx = 0.0;
		s.vy = 0.0;
	}
}

/// Hash-style pseudo-random value in `[0, 1)`.
pub(super) fn pseudo_random(seed: f64) -> f64 {
	let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
	x - x.floor()
}
