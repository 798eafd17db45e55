//! Colors and visual style presets.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `0..=1`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with alpha `a`.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with alpha replaced by `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Multiply the alpha channel.
	pub fn fade(self, factor: f64) -> Self {
		Self {
			a: self.a * factor.clamp(0.0, 1.0),
			..self
		}
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		let up = |c: u8| (c as f64 + (255.0 - c as f64) * f) as u8;
		Self {
			r: up(self.r),
			g: up(self.g),
			b: up(self.b),
			a: self.a,
		}
	}

	/// CSS `rgba(...)` string.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parse `#RRGGBB`, `#RGB`, `rgb(...)` or `rgba(...)`. Anything else is `None`.
	pub fn parse(css: &str) -> Option<Self> {
		let css = css.trim();
		if let Some(hex) = css.strip_prefix('#') {
			if !hex.is_ascii() {
				return None;
			}
			let channel = |s: &str| u8::from_str_radix(s, 16).ok();
			return match hex.len() {
				6 => Some(Color::rgb(
					channel(&hex[0..2])?,
					channel(&hex[2..4])?,
					channel(&hex[4..6])?,
				)),
				3 => {
					let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
					Some(Color::rgb(short(0)?, short(1)?, short(2)?))
				}
				_ => None,
			};
		}
		let inner = css
			.strip_prefix("rgba(")
			.or_else(|| css.strip_prefix("rgb("))?
			.strip_suffix(')')?;
		let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
		if parts.len() < 3 {
			return None;
		}
		let a = match parts.get(3) {
			Some(a) => a.parse().ok()?,
			None => 1.0,
		};
		Some(Color::rgba(
			parts[0].parse().ok()?,
			parts[1].parse().ok()?,
			parts[2].parse().ok()?,
			a,
		))
	}
}

/// Background fill.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Edge color of the gradient, or the flat fill.
	pub color: Color,
	/// Center color of the radial gradient.
	pub color_secondary: Color,
	/// Radial gradient instead of a flat fill.
	pub use_gradient: bool,
}

/// Link strokes.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	/// Hierarchy link color.
	pub color: Color,
	/// Dashed focus-path links.
	pub path_color: Color,
	/// Alpha multiplier for links with no highlighted endpoint while hovering.
	pub dimmed_alpha: f64,
}

/// Node bodies and effects.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Peak glow alpha.
	pub glow_intensity: f64,
	/// Pulse frequency in radians per second.
	pub pulse_speed: f64,
	/// Glow radius swing as a fraction.
	pub pulse_amount: f64,
	/// Hover ring color.
	pub ring_color: Color,
	/// Alpha multiplier for nodes dimmed by another node's hover.
	pub dimmed_alpha: f64,
}

/// Orbit-mode tier rings.
#[derive(Clone, Debug)]
pub struct TierStyle {
	/// One color per tier, weakest (outermost) first.
	pub colors: [Color; 3],
	/// Tier names, weakest first.
	pub labels: [&'static str; 3],
	/// Tier label text color.
	pub label_color: Color,
}

/// Hover tooltip box.
#[derive(Clone, Debug)]
pub struct TooltipStyle {
	/// Box fill.
	pub background: Color,
	/// Box outline.
	pub border: Color,
	/// Detail line color.
	pub text: Color,
	/// Title color.
	pub title: Color,
	/// Pixel size of the font.
	pub font_size: f64,
	/// Distance between text baselines.
	pub line_height: f64,
	/// Inner padding of the box.
	pub padding: f64,
	/// Gap between node and box.
	pub offset: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Preset name.
	pub name: &'static str,
	/// Background fill.
	pub background: BackgroundStyle,
	/// Link strokes.
	pub link: LinkStyle,
	/// Node bodies and effects.
	pub node: NodeStyle,
	/// Orbit tier rings.
	pub tiers: TierStyle,
	/// Tooltip box.
	pub tooltip: TooltipStyle,
	/// Opacity for nodes and links outside an active focus path.
	pub focus_context_alpha: f64,
}

impl Theme {
	/// Dark theme (default).
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
			},
			link: LinkStyle {
				color: Color::rgba(140, 160, 180, 0.5),
				path_color: Color::rgba(235, 203, 139, 0.9),
				dimmed_alpha: 0.2,
			},
			node: NodeStyle {
				glow_intensity: 0.35,
				pulse_speed: 2.2,
				pulse_amount: 0.12,
				ring_color: Color::rgb(255, 255, 255),
				dimmed_alpha: 0.35,
			},
			tiers: TierStyle {
				colors: [
					Color::rgba(191, 97, 106, 0.35),
					Color::rgba(235, 203, 139, 0.35),
					Color::rgba(163, 190, 140, 0.35),
				],
				labels: ["Needs work", "Improving", "Mastered"],
				label_color: Color::rgba(216, 222, 233, 0.55),
			},
			tooltip: TooltipStyle {
				background: Color::rgba(15, 18, 24, 0.92),
				border: Color::rgba(140, 160, 180, 0.6),
				text: Color::rgb(216, 222, 233),
				title: Color::rgb(255, 255, 255),
				font_size: 12.0,
				line_height: 16.0,
				padding: 8.0,
				offset: 10.0,
			},
			focus_context_alpha: 0.06,
		}
	}

	/// Light theme for printed-page look.
	pub fn paper() -> Self {
		Self {
			name: "paper",
			background: BackgroundStyle {
				color: Color::rgb(250, 249, 246),
				color_secondary: Color::rgb(250, 249, 246),
				use_gradient: false,
			},
			link: LinkStyle {
				color: Color::rgba(90, 100, 115, 0.45),
				path_color: Color::rgba(196, 120, 30, 0.9),
				dimmed_alpha: 0.25,
			},
			node: NodeStyle {
				glow_intensity: 0.2,
				pulse_speed: 2.2,
				pulse_amount: 0.08,
				ring_color: Color::rgb(40, 44, 52),
				dimmed_alpha: 0.4,
			},
			tiers: TierStyle {
				colors: [
					Color::rgba(191, 97, 106, 0.3),
					Color::rgba(208, 160, 60, 0.3),
					Color::rgba(110, 150, 90, 0.3),
				],
				labels: ["Needs work", "Improving", "Mastered"],
				label_color: Color::rgba(60, 66, 78, 0.6),
			},
			tooltip: TooltipStyle {
				background: Color::rgba(255, 255, 255, 0.96),
				border: Color::rgba(90, 100, 115, 0.5),
				text: Color::rgb(60, 66, 78),
				title: Color::rgb(20, 22, 28),
				font_size: 12.0,
				line_height: 16.0,
				padding: 8.0,
				offset: 10.0,
			},
			focus_context_alpha: 0.08,
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_css_colors() {
		assert_eq!(Color::parse("#1976d2"), Some(Color::rgb(0x19, 0x76, 0xd2)));
		assert_eq!(Color::parse("#fff"), Some(Color::rgb(255, 255, 255)));
		assert_eq!(Color::parse("rgb(1, 2, 3)"), Some(Color::rgb(1, 2, 3)));
		assert_eq!(
			Color::parse("rgba(1,2,3,0.5)"),
			Some(Color::rgba(1, 2, 3, 0.5))
		);
		assert_eq!(Color::parse("teal"), None);
		assert_eq!(Color::parse("#12345"), None);
	}

	#[test]
	fn css_round_trips_opaque_hex() {
		assert_eq!(Color::rgb(25, 118, 210).to_css(), "#1976d2");
		assert_eq!(Color::rgba(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.500)");
	}

	#[test]
	fn presets_keep_context_faint() {
		for theme in [Theme::default_theme(), Theme::paper()] {
			assert!(theme.focus_context_alpha > 0.0 && theme.focus_context_alpha < 0.2);
			assert!(theme.link.dimmed_alpha < 1.0);
			assert_eq!(theme.tiers.labels.len(), theme.tiers.colors.len());
		}
		assert_ne!(Theme::default().name, Theme::paper().name);
	}
}
