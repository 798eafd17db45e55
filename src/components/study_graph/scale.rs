//! Zoom-dependent sizing for strokes and decorations.
//!
//! Everything the renderer draws after applying the camera transform lives in
//! world space. Some sizes should track the zoom (node bodies), others should
//! stay a constant number of pixels (stroke widths, hover rings). A
//! [`ScaleBehavior`] states which, and [`ScaledValues`] resolves all of them
//! once per frame.

/// How a size reacts to zoom level `k`.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world size; grows on screen when zooming in.
	World,
	/// Constant screen size in pixels.
	Screen,
	/// World size, but never smaller than `min_screen` nor larger than `max_screen` pixels.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value to draw with, given a base value and zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Base sizes for every zoom-sensitive element.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Node bodies; clamped so tiny nodes stay clickable-looking when zoomed out.
	pub node_radius: ScaleBehavior,
	/// Link stroke width in pixels.
	pub link_width: f64,
	/// Dash `(on, off)` for focus-path links, world units.
	pub dash_pattern: (f64, f64),
	/// Dash travel speed, world units per second.
	pub flow_speed: f64,
	/// Node border ring width in pixels.
	pub border_width: f64,
	/// Hover ring stroke width in pixels.
	pub ring_width: f64,
	/// Gap between a node and its hover ring in pixels.
	pub ring_offset: f64,
	/// Glow radius as a multiple of the node radius.
	pub glow_radius: f64,
	/// Orbit tier ring stroke width in pixels.
	pub tier_ring_width: f64,
	/// Orbit tier label size in pixels.
	pub tier_label_size: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node_radius: ScaleBehavior::Clamped {
				min_screen: 2.5,
				max_screen: f64::INFINITY,
			},
			link_width: 1.25,
			dash_pattern: (6.0, 4.0),
			flow_speed: 18.0,
			border_width: 1.5,
			ring_width: 1.5,
			ring_offset: 3.0,
			glow_radius: 2.4,
			tier_ring_width: 1.0,
			tier_label_size: 11.0,
		}
	}
}

/// Sizes resolved for one zoom level, all in world space.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Zoom factor these values were resolved for.
	pub k: f64,
	/// Hierarchy link stroke width.
	pub link_width: f64,
	/// Focus-path dash and gap lengths.
	pub dash_pattern: (f64, f64),
	/// Node border width.
	pub border_width: f64,
	/// Hover ring stroke width.
	pub ring_width: f64,
	/// Gap between node edge and hover ring.
	pub ring_offset: f64,
	/// Orbit tier ring stroke width.
	pub tier_ring_width: f64,
	/// CSS font for tier labels.
	pub tier_label_font: String,
	node_radius: ScaleBehavior,
	glow_radius: f64,
}

impl ScaledValues {
	/// Resolve `config` for zoom factor `k`.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		Self {
			k,
			link_width: config.link_width / k,
			dash_pattern: config.dash_pattern,
			border_width: config.border_width / k,
			ring_width: config.ring_width / k,
			ring_offset: config.ring_offset / k,
			tier_ring_width: config.tier_ring_width / k,
			tier_label_font: format!("{}px sans-serif", config.tier_label_size / k),
			node_radius: config.node_radius.clone(),
			glow_radius: config.glow_radius,
		}
	}

	/// Drawn radius for a node of world radius `base`.
	pub fn node_radius(&self, base: f64) -> f64 {
		self.node_radius.apply(base, self.k)
	}

	/// Outer radius of a node's glow.
	pub fn glow_radius(&self, base: f64) -> f64 {
		self.node_radius(base) * self.glow_radius
	}

	/// Dash offset at `time` seconds; negative so dashes travel source → target.
	pub fn dash_offset(time: f64, flow_speed: f64) -> f64 {
		-time * flow_speed
	}
}
