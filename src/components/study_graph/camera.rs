//! Pan/zoom transform with eased transitions to a target view.
//!
//! Screen coordinates relate to world coordinates by
//! `screen = world * k + (x, y)`. Manual pans and zooms apply immediately and
//! cancel any pending animation; fits and the zoom buttons set a target that
//! [`Camera::tick`] approaches exponentially.

use super::config::CameraConfig;

/// Pan and zoom applied to the whole graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
	/// Horizontal screen offset of the world origin.
	pub x: f64,
	/// Vertical screen offset of the world origin.
	pub y: f64,
	/// Zoom factor, always within the configured bounds.
	pub k: f64,
}

impl Default for Transform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl Transform {
	/// Map a screen point into world space.
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Map a world point onto the screen.
	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.k + self.x, wy * self.k + self.y)
	}
}

/// Camera controller owning the current transform and an optional target.
#[derive(Clone, Debug)]
pub struct Camera {
	current: Transform,
	target: Option<Transform>,
	viewport: (f64, f64),
	config: CameraConfig,
}

impl Camera {
	/// Identity camera over a `width` by `height` viewport.
	pub fn new(config: CameraConfig, width: f64, height: f64) -> Self {
		Self {
			current: Transform {
				k: 1.0_f64.clamp(config.k_min, config.k_max),
				..Transform::default()
			},
			target: None,
			viewport: (width, height),
			config,
		}
	}

	/// Transform applied this frame.
	pub fn transform(&self) -> &Transform {
		&self.current
	}

	/// Transform the camera is easing towards, if any.
	pub fn target(&self) -> Option<&Transform> {
		self.target.as_ref()
	}

	/// Whether an animated move is still pending.
	pub fn has_target(&self) -> bool {
		self.target.is_some()
	}

	/// Viewport size in pixels.
	pub fn viewport(&self) -> (f64, f64) {
		self.viewport
	}

	/// Update the viewport. The transform and any pending target survive.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport = (width, height);
	}

	fn clamp_k(&self, k: f64) -> f64 {
		k.clamp(self.config.k_min, self.config.k_max)
	}

	/// Target a view that fits every `(x, y, radius)` disc with margin.
	/// Zoom is capped at `fit_max_zoom` so sparse graphs are not over-magnified.
	/// Returns false (and leaves the camera alone) for an empty set.
	pub fn fit_to_bounds(&mut self, discs: impl IntoIterator<Item = (f64, f64, f64)>) -> bool {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		for (x, y, r) in discs {
			let (x0, y0, x1, y1) = bounds.unwrap_or((x - r, y - r, x + r, y + r));
			bounds = Some((x0.min(x - r), y0.min(y - r), x1.max(x + r), y1.max(y + r)));
		}
		let Some((x0, y0, x1, y1)) = bounds else {
			return false;
		};

		let (vw, vh) = self.viewport;
		let margin = self.config.fit_margin;
		let (bw, bh) = ((x1 - x0).max(1.0), (y1 - y0).max(1.0));
		let k_fit = ((vw - 2.0 * margin).max(1.0) / bw).min((vh - 2.0 * margin).max(1.0) / bh);
		let k = self.clamp_k(k_fit.min(self.config.fit_max_zoom));
		let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);

		self.target = Some(Transform {
			x: vw / 2.0 - cx * k,
			y: vh / 2.0 - cy * k,
			k,
		});
		true
	}

	/// Translate by a screen-space delta immediately.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.target = None;
		self.current.x += dx;
		self.current.y += dy;
	}

	/// Zoom by `factor` about a screen point immediately, keeping the world
	/// point under it fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		self.target = None;
		self.current = self.zoomed(self.current, sx, sy, factor);
	}

	fn zoomed(&self, from: Transform, sx: f64, sy: f64, factor: f64) -> Transform {
		let k = self.clamp_k(from.k * factor);
		let ratio = k / from.k;
		Transform {
			x: sx - (sx - from.x) * ratio,
			y: sy - (sy - from.y) * ratio,
			k,
		}
	}

	/// Animated zoom about the viewport center, compounding with a pending target.
	pub fn animate_zoom(&mut self, factor: f64) {
		let from = self.target.unwrap_or(self.current);
		let (cx, cy) = (self.viewport.0 / 2.0, self.viewport.1 / 2.0);
		self.target = Some(self.zoomed(from, cx, cy, factor));
	}

	/// Animate one zoom step in about the viewport centre.
	pub fn zoom_in(&mut self) {
		self.animate_zoom(self.config.zoom_step);
	}

	/// Animate one zoom step out about the viewport centre.
	pub fn zoom_out(&mut self) {
		self.animate_zoom(1.0 / self.config.zoom_step);
	}

	/// Ease toward the pending target. Returns true while animating.
	pub fn tick(&mut self) -> bool {
		let Some(target) = self.target else {
			return false;
		};
		let t = self.config.blend;
		let cur = &mut self.current;
		cur.x += (target.x - cur.x) * t;
		cur.y += (target.y - cur.y) * t;
		cur.k += (target.k - cur.k) * t;

		let eps = self.config.epsilon_translate;
		if (target.x - cur.x).abs() < eps
			&& (target.y - cur.y).abs() < eps
			&& (target.k - cur.k).abs() < self.config.epsilon_scale
		{
			self.current = target;
			self.target = None;
		}
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn camera() -> Camera {
		Camera::new(CameraConfig::default(), 800.0, 600.0)
	}

	#[test]
	fn zoom_at_keeps_world_point_under_cursor() {
		let mut cam = camera();
		cam.pan_by(37.0, -12.5);
		for &(sx, sy, f) in &[(100.0, 200.0, 1.1), (640.5, 33.3, 0.9), (0.0, 0.0, 3.7)] {
			let before = cam.transform().screen_to_world(sx, sy);
			cam.zoom_at(sx, sy, f);
			let after = cam.transform().screen_to_world(sx, sy);
			assert!((before.0 - after.0).abs() < 1e-9);
			assert!((before.1 - after.1).abs() < 1e-9);
		}
	}

	#[test]
	fn zoom_is_clamped() {
		let mut cam = camera();
		for _ in 0..100 {
			cam.zoom_at(400.0, 300.0, 2.0);
		}
		assert_eq!(cam.transform().k, CameraConfig::default().k_max);
		for _ in 0..100 {
			cam.zoom_at(400.0, 300.0, 0.5);
		}
		assert_eq!(cam.transform().k, CameraConfig::default().k_min);
	}

	#[test]
	fn fit_centers_bounds_and_caps_zoom() {
		let mut cam = camera();
		assert!(cam.fit_to_bounds([(0.0, 0.0, 1.0)]));
		let t = *cam.target().unwrap();
		assert_eq!(t.k, CameraConfig::default().fit_max_zoom);
		let (sx, sy) = t.world_to_screen(0.0, 0.0);
		assert!((sx - 400.0).abs() < 1e-9 && (sy - 300.0).abs() < 1e-9);

		assert!(cam.fit_to_bounds([(-1000.0, 0.0, 0.0), (1000.0, 0.0, 0.0)]));
		let t = *cam.target().unwrap();
		assert!(t.k < 1.0);
		let (left, _) = t.world_to_screen(-1000.0, 0.0);
		assert!(left >= CameraConfig::default().fit_margin - 1e-9);
	}

	#[test]
	fn empty_fit_is_ignored() {
		let mut cam = camera();
		assert!(!cam.fit_to_bounds(std::iter::empty()));
		assert!(!cam.has_target());
	}

	#[test]
	fn tick_converges_monotonically_without_overshoot() {
		let mut cam = camera();
		cam.fit_to_bounds([(-100.0, -50.0, 0.0), (300.0, 250.0, 0.0)]);
		let target = *cam.target().unwrap();
		let mut last_gap = f64::INFINITY;
		let mut ticks = 0;
		while cam.tick() {
			let cur = cam.transform();
			let gap = (target.x - cur.x).abs() + (target.y - cur.y).abs() + (target.k - cur.k).abs();
			assert!(gap <= last_gap);
			last_gap = gap;
			ticks += 1;
			assert!(ticks < 1000);
		}
		assert_eq!(*cam.transform(), target);
	}

	#[test]
	fn manual_input_cancels_animation() {
		let mut cam = camera();
		cam.zoom_in();
		assert!(cam.has_target());
		cam.pan_by(1.0, 1.0);
		assert!(!cam.has_target());
		cam.zoom_out();
		cam.zoom_at(10.0, 10.0, 1.1);
		assert!(!cam.has_target());
	}

	#[test]
	fn zoom_buttons_compound() {
		let mut cam = camera();
		cam.zoom_in();
		cam.zoom_in();
		let k = cam.target().unwrap().k;
		assert!((k - 1.44).abs() < 1e-9);
	}

	#[test]
	fn resize_keeps_transform_and_target() {
		let mut cam = camera();
		cam.pan_by(10.0, 20.0);
		cam.zoom_in();
		cam.resize(1024.0, 768.0);
		assert_eq!(cam.transform().x, 10.0);
		assert!(cam.has_target());
	}
}
