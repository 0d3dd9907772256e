//! Visual theming for the canvas host.
//!
//! A [`Theme`] holds the colors the canvas surface paints with; [`ThemeStyles`]
//! turns it into the theme layer of item style resolution, so palette colors
//! can still be overridden by defaults, models and states.

use serde_json::{Value, json};

use crate::graph::{ItemKind, ItemModel, Style, StyleProvider};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color, different alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
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

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		let down = |c: u8| (c as f64 * f) as u8;
		Self {
			r: down(self.r),
			g: down(self.g),
			b: down(self.b),
			a: self.a,
		}
	}

	/// CSS color string: `#rrggbb` when opaque, `rgba(...)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parse `#RRGGBB`, `#RGB`, `rgb()` or `rgba()`. Anything else is `None`.
	pub fn parse(s: &str) -> Option<Color> {
		let s = s.trim();
		if let Some(hex) = s.strip_prefix('#') {
			let channel = |i: usize, len: usize| u8::from_str_radix(hex.get(i..i + len)?, 16).ok();
			return match hex.len() {
				6 => Some(Color::rgb(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
				3 => {
					let short = |i| channel(i, 1).map(|v| v * 17);
					Some(Color::rgb(short(0)?, short(1)?, short(2)?))
				}
				_ => None,
			};
		}
		let inner = s
			.strip_prefix("rgba(")
			.or_else(|| s.strip_prefix("rgb("))?
			.strip_suffix(')')?;
		let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
		let channel = |i: usize| parts.get(i)?.parse::<u8>().ok();
		let alpha = match parts.get(3) {
			Some(a) => a.parse().ok()?,
			None => 1.0,
		};
		Some(Color::rgba(channel(0)?, channel(1)?, channel(2)?, alpha))
	}
}

/// A curated color palette for nodes.
#[derive(Clone, Debug)]
pub struct NodePalette {
	/// Palette entries, picked by index modulo length.
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Muted slate blues and teals (default)
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),  // Steel blue
				Color::rgb(129, 161, 193), // Light steel
				Color::rgb(100, 148, 160), // Teal gray
				Color::rgb(136, 160, 175), // Cadet blue
				Color::rgb(108, 142, 173), // Air force blue
				Color::rgb(119, 158, 165), // Desaturated cyan
				Color::rgb(143, 163, 180), // Cool gray
				Color::rgb(122, 153, 168), // Dusty blue
			],
		}
	}

	/// Color at `index`, wrapping around.
	pub fn get(&self, index: usize) -> Color {
		if self.colors.is_empty() {
			return Color::rgb(128, 128, 128);
		}
		self.colors[index % self.colors.len()]
	}

	/// Stable color for a key, so the same cluster always gets the same color.
	pub fn for_key(&self, key: &str) -> Color {
		// FNV-1a
		let hash = key
			.bytes()
			.fold(0xcbf2_9ce4_8422_2325_u64, |h, b| (h ^ b as u64).wrapping_mul(0x100_0000_01b3));
		self.get((hash % self.colors.len().max(1) as u64) as usize)
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Edge color of the radial gradient, or the flat fill.
	pub color: Color,
	/// Centre color of the radial gradient
	pub color_secondary: Color,
	/// Paint a radial gradient instead of a flat fill.
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Theme identifier.
	pub name: &'static str,
	/// Canvas background.
	pub background: BackgroundStyle,
	/// Default edge stroke.
	pub edge_color: Color,
	/// Node label fill.
	pub label_color: Color,
	/// Group container fill.
	pub group_color: Color,
	/// Shade nodes with a radial highlight.
	pub node_gradient: bool,
	/// Node fills.
	pub palette: NodePalette,
}

impl Theme {
	/// Clean modern theme with subtle effects (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
				vignette: 0.15,
			},
			edge_color: Color::rgba(140, 160, 180, 0.5),
			label_color: Color::rgba(255, 255, 255, 0.85),
			group_color: Color::rgba(140, 160, 180, 0.12),
			node_gradient: true,
			palette: NodePalette::slate(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

/// Style provider backed by a [`Theme`].
///
/// Nodes are filled from the palette, keyed by their `cluster` field, then
/// their group, then their id.
#[derive(Clone, Debug, Default)]
pub struct ThemeStyles {
	theme: Theme,
}

impl ThemeStyles {
	/// Style provider for `theme`.
	pub fn new(theme: Theme) -> Self {
		Self { theme }
	}
}

fn style(v: Value) -> Style {
	match v {
		Value::Object(map) => map,
		_ => Style::new(),
	}
}

impl StyleProvider for ThemeStyles {
	fn base_style(&self, kind: ItemKind, model: &ItemModel) -> Style {
		let theme = &self.theme;
		match kind {
			ItemKind::Node => {
				let key = model
					.extra
					.get("cluster")
					.and_then(Value::as_str)
					.or(model.group_id.as_deref())
					.unwrap_or(&model.id);
				style(json!({
					"fill": theme.palette.for_key(key).to_css(),
					"labelColor": theme.label_color.to_css(),
				}))
			}
			ItemKind::Edge => style(json!({
				"stroke": theme.edge_color.to_css(),
				"lineWidth": 1.0,
			})),
			ItemKind::Group => style(json!({
				"fill": theme.group_color.to_css(),
				"stroke": theme.edge_color.with_alpha(0.3).to_css(),
				"lineWidth": 1.0,
				"lineDash": [4.0, 4.0],
			})),
		}
	}
}
