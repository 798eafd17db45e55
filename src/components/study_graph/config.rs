//! Tuning for simulation, camera and pointer handling.
//!
//! A [`ViewConfig`] is built once and handed to the engine at construction.
//! Every field has a default so a host can override only what it needs:
//!
//! ```json
//! { "simulation": { "repulsion": 2000.0 }, "interaction": { "hover_policy": "all" } }
//! ```

use serde::Deserialize;

use super::error::GraphError;
use super::types::NodeCategory;

/// Force, orbit and focus-path tuning constants.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Pairwise repulsion constant; force = `repulsion / distance²`.
	pub repulsion: f64,
	/// Link spring stiffness.
	pub spring_stiffness: f64,
	/// Link spring rest length in world units.
	pub rest_length: f64,
	/// Linear pull toward the viewport center.
	pub center_pull: f64,
	/// Per-tick velocity multiplier, strictly below 1.
	pub damping: f64,
	/// Per-tick speed cap; keeps freshly spawned, overlapping nodes from exploding apart.
	pub max_velocity: f64,
	/// Mean per-node kinetic energy below which force mode settles.
	pub settle_threshold: f64,
	/// New nodes spawn within this distance of the viewport center.
	pub spawn_radius: f64,
	/// Outer orbit radius as a fraction of the smaller viewport side.
	pub orbit_extent: f64,
	/// Margin in `1 - weight / (100 + margin)`; keeps weight 100 off the exact center.
	pub orbit_margin: f64,
	/// Fraction of the remaining distance covered per tick when seeking a target.
	pub seek_fraction: f64,
	/// Mean per-node displacement under which an orbit refit fires.
	pub centering_threshold: f64,
	/// Share of each root sector's arc that its nodes spread over.
	pub sector_fill: f64,
	/// Grid cell size for the focus path.
	pub focus_spacing: f64,
	/// Horizontal margin kept free on either side of the focus grid.
	pub focus_margin: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			repulsion: 1500.0,
			spring_stiffness: 0.04,
			rest_length: 50.0,
			center_pull: 0.01,
			damping: 0.82,
			max_velocity: 30.0,
			settle_threshold: 0.01,
			spawn_radius: 40.0,
			orbit_extent: 0.42,
			orbit_margin: 10.0,
			seek_fraction: 0.1,
			centering_threshold: 0.5,
			sector_fill: 0.8,
			focus_spacing: 64.0,
			focus_margin: 48.0,
		}
	}
}

/// Pan/zoom limits and animation tuning.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
	/// Minimum zoom factor.
	pub k_min: f64,
	/// Maximum zoom factor.
	pub k_max: f64,
	/// Screen-space padding kept around fitted content.
	pub fit_margin: f64,
	/// Ceiling for the zoom chosen by a fit, so sparse graphs are not blown up.
	pub fit_max_zoom: f64,
	/// Share of the remaining distance covered per frame while animating.
	pub blend: f64,
	/// Translation tolerance at which an animation snaps to its target.
	pub epsilon_translate: f64,
	/// Scale tolerance at which an animation snaps to its target.
	pub epsilon_scale: f64,
	/// Multiplier applied per zoom-in step (and divided per zoom-out step).
	pub zoom_step: f64,
}

impl Default for CameraConfig {
	fn default() -> Self {
		Self {
			k_min: 0.1,
			k_max: 10.0,
			fit_margin: 48.0,
			fit_max_zoom: 2.0,
			blend: 0.15,
			epsilon_translate: 0.5,
			epsilon_scale: 0.001,
			zoom_step: 1.2,
		}
	}
}

/// Which hovered nodes are reported to the host's hover callback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverPolicy {
	/// Only group nodes; hovering a leaf reports `None`.
	#[default]
	GroupsOnly,
	/// Every node.
	All,
	/// Never report hovers.
	None,
}

impl HoverPolicy {
	/// Whether a hovered node of this category is reported.
	pub fn admits(self, category: NodeCategory) -> bool {
		match self {
			HoverPolicy::GroupsOnly => category == NodeCategory::Group,
			HoverPolicy::All => true,
			HoverPolicy::None => false,
		}
	}
}

/// Pointer interpretation tuning.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
	/// Screen pixels added to a node's radius for hit-testing.
	pub hit_margin: f64,
	/// Screen pixels of pointer travel that turn a click into a drag or pan.
	pub click_threshold: f64,
	/// Hover reporting policy.
	pub hover_policy: HoverPolicy,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			hit_margin: 4.0,
			click_threshold: 4.0,
			hover_policy: HoverPolicy::default(),
		}
	}
}

/// Complete engine configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
	/// Layout physics and seek tuning.
	pub simulation: SimulationConfig,
	/// Zoom bounds and easing.
	pub camera: CameraConfig,
	/// Pointer thresholds and hover policy.
	pub interaction: InteractionConfig,
}

impl ViewConfig {
	/// Parse and validate a JSON configuration.
	pub fn from_json(json: &str) -> Result<Self, GraphError> {
		let config: ViewConfig = serde_json::from_str(json).map_err(GraphError::ConfigParse)?;
		config.validate()?;
		Ok(config)
	}

	/// Reject values the engine cannot run with.
	pub fn validate(&self) -> Result<(), GraphError> {
		let sim = &self.simulation;
		let cam = &self.camera;
		if !(sim.damping > 0.0 && sim.damping < 1.0) {
			return Err(GraphError::InvalidConfig(format!(
				"damping must be in (0, 1), got {}",
				sim.damping
			)));
		}
		if !(sim.seek_fraction > 0.0 && sim.seek_fraction <= 1.0) {
			return Err(GraphError::InvalidConfig(format!(
				"seek_fraction must be in (0, 1], got {}",
				sim.seek_fraction
			)));
		}
		if sim.max_velocity <= 0.0 || sim.focus_spacing <= 0.0 {
			return Err(GraphError::InvalidConfig(
				"max_velocity and focus_spacing must be positive".into(),
			));
		}
		if !(cam.k_min > 0.0 && cam.k_min <= cam.k_max) {
			return Err(GraphError::InvalidConfig(format!(
				"zoom bounds must satisfy 0 < k_min <= k_max, got {}..{}",
				cam.k_min, cam.k_max
			)));
		}
		if !(cam.blend > 0.0 && cam.blend <= 1.0) {
			return Err(GraphError::InvalidConfig(format!(
				"blend must be in (0, 1], got {}",
				cam.blend
			)));
		}
		if cam.zoom_step <= 1.0 {
			return Err(GraphError::InvalidConfig(format!(
				"zoom_step must exceed 1, got {}",
				cam.zoom_step
			)));
		}
		Ok(())
	}
}
