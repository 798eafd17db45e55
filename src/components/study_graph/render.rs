//! Canvas rendering for the study graph.
//!
//! Passes, back to front:
//! 1. Background (screen space)
//! 2. Orbit tier rings, hierarchy links, focus-path links (world space)
//! 3. Node glows, bodies, borders and hover rings (world space)
//! 4. Tooltip for the node under the pointer (screen space)
//!
//! Canvas calls that return a `Result` are best-effort: a failing primitive
//! is logged at debug level, skipped, and the frame carries on.

use std::f64::consts::PI;

use log::debug;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::config::SimulationConfig;
use super::scale::{ScaleConfig, ScaledValues};
use super::simulation::orbit_radius;
use super::state::GraphViewState;
use super::theme::{Color, Theme};
use super::types::{LayoutMode, NodeCategory};

/// Weight thresholds where each orbit tier begins, weakest first.
pub const TIER_WEIGHTS: [f64; 3] = [0.0, 50.0, 80.0];

/// Used when a node color fails to parse.
const FALLBACK_NODE_COLOR: Color = Color::rgb(94, 129, 172);

/// Log a failed canvas primitive; the frame continues without it.
fn skipped(result: Result<(), JsValue>, primitive: &str) {
	if let Err(err) = result {
		debug!("study-graph: skipped {primitive}: {err:?}");
	}
}

fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Renders one frame.
pub fn render(
	state: &GraphViewState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let transform = *state.camera().transform();
	let scale = ScaledValues::new(config, transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	skipped(ctx.translate(transform.x, transform.y), "translate");
	skipped(ctx.scale(transform.k, transform.k), "scale");

	if *state.mode() == LayoutMode::Orbit {
		draw_tier_rings(state, ctx, &scale, theme);
	}
	draw_links(state, ctx, &scale, theme);
	draw_path_links(state, ctx, config, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();

	if let Some(i) = tooltip_target(state) {
		draw_tooltip(state, ctx, theme, i);
	}
}

fn draw_background(state: &GraphViewState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (width, height) = state.viewport();
	let gradient = if theme.background.use_gradient {
		ctx.create_radial_gradient(
			width / 2.0,
			height / 2.0,
			0.0,
			width / 2.0,
			height / 2.0,
			width.max(height) * 0.8,
		)
		.inspect_err(|_| debug!("study-graph: background gradient unavailable"))
		.ok()
	} else {
		None
	};

	match gradient {
		Some(gradient) => {
			let secondary = theme.background.color_secondary.to_css();
			skipped(gradient.add_color_stop(0.0, &secondary), "add_color_stop");
			let primary = theme.background.color.to_css();
			skipped(gradient.add_color_stop(1.0, &primary), "add_color_stop");
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}
	ctx.fill_rect(0.0, 0.0, width, height);
}

/// Ring radius for each tier threshold in [`TIER_WEIGHTS`].
pub fn tier_ring_radii(viewport: (f64, f64), config: &SimulationConfig) -> [f64; 3] {
	TIER_WEIGHTS.map(|w| orbit_radius(w, viewport, config))
}

/// Tier index for a weight, matching [`TIER_WEIGHTS`].
pub fn tier_of(weight: f64) -> usize {
	TIER_WEIGHTS.iter().rposition(|&t| weight >= t).unwrap_or(0)
}

fn draw_tier_rings(
	state: &GraphViewState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let viewport = state.viewport();
	let (cx, cy) = (viewport.0 / 2.0, viewport.1 / 2.0);
	let radii = tier_ring_radii(viewport, &state.config().simulation);

	ctx.set_line_width(scale.tier_ring_width);
	ctx.set_font(&scale.tier_label_font);
	ctx.set_text_align("center");
	for (tier, &radius) in radii.iter().enumerate() {
		ctx.begin_path();
		skipped(ctx.arc(cx, cy, radius, 0.0, 2.0 * PI), "arc");
		ctx.set_stroke_style_str(&theme.tiers.colors[tier].to_css());
		ctx.stroke();

		ctx.set_fill_style_str(&theme.tiers.label_color.to_css());
		let label_y = cy - radius - 4.0 / scale.k;
		skipped(ctx.fill_text(theme.tiers.labels[tier], cx, label_y), "fill_text");
	}
	ctx.set_text_align("start");
}

/// Opacity multiplier from an active focus path.
pub fn context_alpha(state: &GraphViewState, theme: &Theme, i: usize) -> f64 {
	if state.is_context_node(i) {
		theme.focus_context_alpha
	} else {
		1.0
	}
}

/// Opacity multiplier from hover dimming: elements with no highlight of
/// their own fade toward `dimmed_alpha` as the strongest highlight rises.
pub fn hover_alpha(own: f64, max: f64, dimmed_alpha: f64) -> f64 {
	let own = smooth_step(own.clamp(0.0, 1.0));
	let max = smooth_step(max.clamp(0.0, 1.0));
	let dimmed = 1.0 - (1.0 - dimmed_alpha) * max;
	dimmed + (1.0 - dimmed) * own
}

fn draw_links(
	state: &GraphViewState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let store = state.store();
	let highlight = state.highlight();
	let max_t = highlight.max_intensity();

	ctx.set_line_width(scale.link_width);
	skipped(ctx.set_line_dash(&js_sys::Array::new()), "set_line_dash");
	for &(a, b) in state.hierarchy().links() {
		let (pa, pb) = (store.get(a), store.get(b));
		let own = highlight.node_intensity(a).max(highlight.node_intensity(b));
		let alpha = hover_alpha(own, max_t, theme.link.dimmed_alpha)
			* context_alpha(state, theme, a).min(context_alpha(state, theme, b));
		if alpha < 0.005 {
			continue;
		}

		ctx.set_stroke_style_str(&theme.link.color.fade(alpha).to_css());
		ctx.begin_path();
		ctx.move_to(pa.x, pa.y);
		ctx.line_to(pb.x, pb.y);
		ctx.stroke();
	}
}

fn draw_path_links(
	state: &GraphViewState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let Some(path) = state.active_focus() else {
		return;
	};
	let store = state.store();

	ctx.set_stroke_style_str(&theme.link.path_color.to_css());
	ctx.set_line_width(scale.link_width * 1.5);
	let pattern = js_sys::Array::of2(
		&JsValue::from_f64(scale.dash_pattern.0),
		&JsValue::from_f64(scale.dash_pattern.1),
	);
	skipped(ctx.set_line_dash(&pattern), "set_line_dash");
	ctx.set_line_dash_offset(ScaledValues::dash_offset(state.time(), config.flow_speed));

	for &(a, b) in path.links() {
		let (pa, pb) = (store.get(a), store.get(b));
		ctx.begin_path();
		ctx.move_to(pa.x, pa.y);
		ctx.line_to(pb.x, pb.y);
		ctx.stroke();
	}
	skipped(ctx.set_line_dash(&js_sys::Array::new()), "set_line_dash");
}

fn draw_nodes(
	state: &GraphViewState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let store = state.store();
	let highlight = state.highlight();
	let max_t = highlight.max_intensity();
	let pulse = (state.time() * theme.node.pulse_speed).sin() * theme.node.pulse_amount;

	for (i, node) in state.nodes().iter().enumerate() {
		let s = store.get(i);
		let node_t = highlight.node_intensity(i);
		let alpha = hover_alpha(node_t, max_t, theme.node.dimmed_alpha) * context_alpha(state, theme, i);
		if alpha < 0.005 {
			continue;
		}
		let color = Color::parse(&node.color).unwrap_or(FALLBACK_NODE_COLOR);
		let radius = scale.node_radius(node.radius);

		if theme.node.glow_intensity > 0.0 {
			let glow = theme.node.glow_intensity * alpha * (1.0 + smooth_step(node_t));
			draw_node_glow(ctx, s.x, s.y, radius, scale.glow_radius(node.radius) * (1.0 + pulse), color, glow);
		}

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		skipped(ctx.arc(s.x, s.y, radius, 0.0, 2.0 * PI), "arc");
		ctx.set_fill_style_str(&color.to_css());
		ctx.fill();

		if let Some(border) = node.border_color.as_deref() {
			match Color::parse(border) {
				Some(border) => {
					ctx.set_stroke_style_str(&border.to_css());
					ctx.set_line_width(scale.border_width);
					ctx.stroke();
				}
				None => debug!("study-graph: unparsable border color {:?}", border),
			}
		}
		ctx.set_global_alpha(1.0);

		let ring_t = smooth_step(highlight.ring_intensity(i));
		if ring_t > 0.01 {
			ctx.begin_path();
			skipped(ctx.arc(s.x, s.y, radius + scale.ring_offset, 0.0, 2.0 * PI), "arc");
			ctx.set_stroke_style_str(&theme.node.ring_color.fade(0.8 * ring_t).to_css());
			ctx.set_line_width(scale.ring_width);
			ctx.stroke();
		}
	}
}

fn draw_node_glow(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	radius: f64,
	glow_radius: f64,
	color: Color,
	alpha: f64,
) {
	if alpha < 0.01 || glow_radius <= radius {
		return;
	}
	let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.5, x, y, glow_radius) else {
		debug!("study-graph: skipped glow gradient");
		return;
	};
	let stops = [
		(0.0, color.lighten(0.3).with_alpha(alpha).to_css()),
		(0.5, color.with_alpha(alpha * 0.4).to_css()),
		(1.0, "rgba(0, 0, 0, 0)".to_string()),
	];
	for (offset, css) in &stops {
		skipped(gradient.add_color_stop(*offset, css), "add_color_stop");
	}

	ctx.begin_path();
	skipped(ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI), "arc");
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}

/// Node whose tooltip is drawn: the raw hover, so any hovered node shows its
/// details even when the hover policy keeps it from the host callback.
pub fn tooltip_target(state: &GraphViewState) -> Option<usize> {
	state.hovered()
}

/// Title and detail lines for node `i`.
pub fn tooltip_lines(state: &GraphViewState, theme: &Theme, i: usize) -> (String, Vec<String>) {
	let node = &state.nodes()[i];
	let title = if node.label.is_empty() {
		node.id.clone()
	} else {
		node.label.clone()
	};
	let weight = state.weight(i);
	let tier = theme.tiers.labels[tier_of(weight)];

	let lines = match node.category {
		NodeCategory::Group => {
			let leaves = state.hierarchy().descendant_leaves(i, state.nodes()).len();
			let noun = if leaves == 1 { "item" } else { "items" };
			vec![
				format!("Group · {leaves} {noun}"),
				format!("Weight {weight:.0} · {tier}"),
			]
		}
		NodeCategory::Leaf => vec![
			"Leaf".to_string(),
			format!("Weight {weight:.0} · {tier}"),
		],
	};
	(title, lines)
}

/// Top-left corner for a `size` box beside a screen `anchor`. The box sits
/// to the right, flips left when it would overflow, and is kept on screen.
pub fn tooltip_origin(
	anchor: (f64, f64),
	anchor_radius: f64,
	size: (f64, f64),
	viewport: (f64, f64),
	offset: f64,
) -> (f64, f64) {
	let gap = anchor_radius + offset;
	let mut x = anchor.0 + gap;
	if x + size.0 > viewport.0 {
		x = anchor.0 - gap - size.0;
	}
	let y = anchor.1 - size.1 / 2.0;
	(
		x.min(viewport.0 - size.0).max(0.0),
		y.min(viewport.1 - size.1).max(0.0),
	)
}

fn draw_tooltip(state: &GraphViewState, ctx: &CanvasRenderingContext2d, theme: &Theme, i: usize) {
	let style = &theme.tooltip;
	let s = state.store().get(i);
	let transform = state.camera().transform();
	let anchor = transform.world_to_screen(s.x, s.y);
	let anchor_radius = state.nodes()[i].radius * transform.k;
	let (title, lines) = tooltip_lines(state, theme, i);

	let title_font = format!("bold {}px sans-serif", style.font_size);
	let body_font = format!("{}px sans-serif", style.font_size);
	let measure = |font: &str, text: &str| {
		ctx.set_font(font);
		ctx.measure_text(text)
			.map(|m| m.width())
			.unwrap_or_else(|_| text.chars().count() as f64 * style.font_size * 0.6)
	};
	let text_width = lines
		.iter()
		.map(|l| measure(&body_font, l))
		.fold(measure(&title_font, &title), f64::max);
	let size = (
		text_width + style.padding * 2.0,
		style.line_height * (lines.len() + 1) as f64 + style.padding * 2.0,
	);
	let (x, y) = tooltip_origin(anchor, anchor_radius, size, state.viewport(), style.offset);

	ctx.set_fill_style_str(&style.background.to_css());
	ctx.fill_rect(x, y, size.0, size.1);
	ctx.set_stroke_style_str(&style.border.to_css());
	ctx.set_line_width(1.0);
	ctx.stroke_rect(x, y, size.0, size.1);

	ctx.set_text_baseline("top");
	let text_x = x + style.padding;
	let mut text_y = y + style.padding;
	ctx.set_font(&title_font);
	ctx.set_fill_style_str(&style.title.to_css());
	skipped(ctx.fill_text(&title, text_x, text_y), "fill_text");
	ctx.set_font(&body_font);
	ctx.set_fill_style_str(&style.text.to_css());
	for line in &lines {
		text_y += style.line_height;
		skipped(ctx.fill_text(line, text_x, text_y), "fill_text");
	}
	ctx.set_text_baseline("alphabetic");
}
