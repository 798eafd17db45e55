//! Smoothed hover highlighting.
//!
//! Every node carries an intensity in `0.0..=1.0` that eases toward 1 while
//! the node is hovered or adjacent to the hovered node, and back toward 0
//! afterwards. A short hold keeps a highlight from flickering when the
//! pointer grazes a node's edge.

use std::collections::{HashMap, HashSet};

/// Seconds a highlight is held before it may fade.
const MIN_HOLD_TIME: f64 = 0.12;

/// Per-second easing rates.
const FADE_IN_SPEED: f64 = 6.0;
const FADE_OUT_SPEED: f64 = 4.0;

/// Intensities under this are dropped.
const VISIBLE_FLOOR: f64 = 0.005;

/// Hover highlight state keyed by store index.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	hovered: Option<usize>,
	target_set: HashSet<usize>,
	intensity: HashMap<usize, f64>,
	ring: HashMap<usize, f64>,
	hold: HashMap<usize, f64>,
	max: f64,
}

impl HighlightState {
	/// Node currently driving the highlight.
	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	/// Hover `node`, highlighting it together with `neighbors`.
	pub fn set_hover(&mut self, node: Option<usize>, neighbors: impl IntoIterator<Item = usize>) {
		if self.hovered == node {
			return;
		}
		self.hovered = node;
		self.target_set.clear();
		if let Some(idx) = node {
			self.target_set.insert(idx);
			self.target_set.extend(neighbors);
			for &i in &self.target_set {
				self.hold.insert(i, MIN_HOLD_TIME);
			}
		}
	}

	/// Ease intensities by `dt` seconds: `v += (target - v) * (1 - e^(-speed * dt))`.
	pub fn tick(&mut self, dt: f64) {
		let fade_in = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out = (-FADE_OUT_SPEED * dt).exp();

		for &i in &self.target_set {
			let v = self.intensity.entry(i).or_insert(0.0);
			*v += (1.0 - *v) * fade_in;
		}
		if let Some(i) = self.hovered {
			let v = self.ring.entry(i).or_insert(0.0);
			*v += (1.0 - *v) * fade_in;
		}

		let target_set = &self.target_set;
		self.hold.retain(|i, t| {
			if target_set.contains(i) {
				return true;
			}
			*t -= dt;
			*t > 0.0
		});

		let hold = &self.hold;
		let mut max: f64 = 0.0;
		self.intensity.retain(|i, v| {
			if !target_set.contains(i) && !hold.contains_key(i) {
				*v *= fade_out;
			}
			max = max.max(*v);
			*v > VISIBLE_FLOOR
		});
		let hovered = self.hovered;
		self.ring.retain(|i, v| {
			if hovered != Some(*i) && !hold.contains_key(i) {
				*v *= fade_out;
			}
			*v > VISIBLE_FLOOR
		});
		self.max = max;
	}

	/// Smoothed highlight of node `i` in `0..=1`.
	pub fn node_intensity(&self, i: usize) -> f64 {
		self.intensity.get(&i).copied().unwrap_or(0.0)
	}

	/// Smoothed hover ring strength of node `i` in `0..=1`.
	pub fn ring_intensity(&self, i: usize) -> f64 {
		self.ring.get(&i).copied().unwrap_or(0.0)
	}

	/// Geometric mean of both endpoint intensities.
	pub fn link_intensity(&self, a: usize, b: usize) -> f64 {
		(self.node_intensity(a) * self.node_intensity(b)).sqrt()
	}

	/// Strongest node intensity; drives dimming of everything else.
	pub fn max_intensity(&self) -> f64 {
		self.max
	}

	/// Carry state across a node-set rebuild; indices without a new slot are dropped.
	pub fn remap(&mut self, old_to_new: &[Option<usize>]) {
		let map = |i: usize| old_to_new.get(i).copied().flatten();
		self.hovered = self.hovered.and_then(map);
		self.target_set = self.target_set.iter().filter_map(|&i| map(i)).collect();
		self.intensity = self
			.intensity
			.iter()
			.filter_map(|(&i, &v)| map(i).map(|n| (n, v)))
			.collect();
		self.ring = self
			.ring
			.iter()
			.filter_map(|(&i, &v)| map(i).map(|n| (n, v)))
			.collect();
		self.hold = self
			.hold
			.iter()
			.filter_map(|(&i, &v)| map(i).map(|n| (n, v)))
			.collect();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hover_fades_in_then_out() {
		let mut h = HighlightState::default();
		h.set_hover(Some(1), [0, 2]);
		for _ in 0..60 {
			h.tick(1.0 / 60.0);
		}
		assert!(h.node_intensity(1) > 0.95);
		assert!(h.node_intensity(2) > 0.95);
		assert!(h.ring_intensity(1) > 0.95);
		assert_eq!(h.ring_intensity(2), 0.0);
		assert_eq!(h.node_intensity(3), 0.0);

		h.set_hover(None, []);
		h.tick(0.05);
		// Still held.
		assert!(h.node_intensity(1) > 0.95);
		for _ in 0..240 {
			h.tick(1.0 / 60.0);
		}
		assert_eq!(h.node_intensity(1), 0.0);
		assert_eq!(h.max_intensity(), 0.0);
	}

	#[test]
	fn remap_follows_new_indices() {
		let mut h = HighlightState::default();
		h.set_hover(Some(0), [1]);
		h.tick(0.5);
		h.remap(&[Some(3), None]);
		assert_eq!(h.hovered(), Some(3));
		assert!(h.node_intensity(3) > 0.0);
		assert_eq!(h.node_intensity(1), 0.0);
	}
}
