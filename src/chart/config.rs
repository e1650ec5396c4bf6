//! Tunables for the chart. Every field has a default so partial documents
//! deserialize cleanly.

use serde::{Deserialize, Serialize};

use super::model::{PersonId, RootTieBreak};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
/// All chart settings. Missing fields take their defaults.
pub struct ChartConfig {
	/// Where the family document is fetched from.
	pub data_url: String,
	/// Person focused at startup and on reset.
	pub default_focus: PersonId,
	/// Which founder roots the hierarchy.
	pub root_tie_break: RootTieBreak,
	/// Tree layout spacing.
	pub tree: TreeSpacing,
	/// Radial layout spacing.
	pub radial: RadialSpacing,
	/// Force simulation tuning.
	pub force: ForceParams,
	/// Zoom limits and button steps.
	pub zoom: ZoomExtent,
	/// Tooltip size and placement.
	pub tooltip: TooltipConfig,
	/// Transition and fade timings.
	pub animation: AnimationConfig,
	/// Below this viewport width the side panel closes after a search pick.
	pub narrow_viewport: f64,
}

impl Default for ChartConfig {
	fn default() -> Self {
		Self {
			data_url: "./data/main.json".into(),
			default_focus: 1,
			root_tie_break: RootTieBreak::default(),
			tree: TreeSpacing::default(),
			radial: RadialSpacing::default(),
			force: ForceParams::default(),
			zoom: ZoomExtent::default(),
			tooltip: TooltipConfig::default(),
			animation: AnimationConfig::default(),
			narrow_viewport: 768.0,
		}
	}
}

impl ChartConfig {
	/// Parse a partial or complete JSON config.
	pub fn from_json(text: &str) -> super::Result<Self> {
		Ok(serde_json::from_str(text)?)
	}
}

/// Horizontal tree spacing. Breadth runs down the screen, depth runs across.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TreeSpacing {
	/// Cell size across generations' siblings, in pixels.
	pub cell_breadth: f64,
	/// Cell size between generations, in pixels.
	pub cell_depth: f64,
	/// Applied to siblings and cousins alike.
	pub separation: f64,
	/// Layout width added per generation.
	pub width_per_generation: f64,
	/// Layout width added once.
	pub width_padding: f64,
	/// Shift applied to every x.
	pub margin_left: f64,
	/// Shift applied to every y.
	pub margin_top: f64,
	/// Node radius.
	pub node_radius: f64,
}

impl Default for TreeSpacing {
	fn default() -> Self {
		Self {
			cell_breadth: 50.0,
			cell_depth: 150.0,
			separation: 1.4,
			width_per_generation: 200.0,
			width_padding: 400.0,
			margin_left: 200.0,
			margin_top: 50.0,
			node_radius: 25.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
/// Radial spacing. Depth maps to radius, breadth to angle.
pub struct RadialSpacing {
	/// Subtracted from half the short viewport side to get the outer radius.
	pub margin: f64,
	/// Gap between siblings.
	pub sibling_separation: f64,
	/// Gap between cousins.
	pub cousin_separation: f64,
	/// Node radius.
	pub node_radius: f64,
}

impl Default for RadialSpacing {
	fn default() -> Self {
		Self {
			margin: 100.0,
			sibling_separation: 1.0,
			cousin_separation: 2.0,
			node_radius: 20.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
/// Force simulation tuning, named after d3's forces.
pub struct ForceParams {
	/// Target length of every link.
	pub link_distance: f64,
	/// Negative values repel.
	pub charge_strength: f64,
	/// Minimum centre distance kept between nodes.
	pub collide_radius: f64,
	/// The simulation stops below this alpha.
	pub alpha_min: f64,
	/// Fraction alpha loses per tick.
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha the simulation is reheated towards while a node is dragged.
	pub drag_alpha_target: f64,
	/// Node radius.
	pub node_radius: f64,
}

impl Default for ForceParams {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			link_distance: 100.0,
			charge_strength: -300.0,
			collide_radius: 30.0,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
			node_radius: 25.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
/// Zoom limits and button steps.
pub struct ZoomExtent {
	/// Smallest allowed scale.
	pub min_scale: f64,
	/// Largest allowed scale.
	pub max_scale: f64,
	/// Factor applied by the zoom-in button.
	pub zoom_in_factor: f64,
	/// Factor applied by the zoom-out button.
	pub zoom_out_factor: f64,
}

impl Default for ZoomExtent {
	fn default() -> Self {
		Self {
			min_scale: 0.1,
			max_scale: 4.0,
			zoom_in_factor: 1.3,
			zoom_out_factor: 0.7,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
/// Tooltip size and offsets, in pixels.
pub struct TooltipConfig {
	/// Card width.
	pub width: f64,
	/// Card height.
	pub height: f64,
	/// Horizontal gap between node edge and tooltip, scaled by zoom.
	pub gap: f64,
	/// How far above the node's top edge the tooltip starts, scaled by zoom.
	pub lift: f64,
	/// Minimum distance kept from every viewport edge.
	pub margin: f64,
}

impl Default for TooltipConfig {
	fn default() -> Self {
		Self {
			width: 220.0,
			height: 120.0,
			gap: 10.0,
			lift: 20.0,
			margin: 10.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
/// Transition and fade timings, in milliseconds.
pub struct AnimationConfig {
	/// Camera glide onto a focused member.
	pub focus_ms: f64,
	/// Zoom button transition.
	pub zoom_ms: f64,
	/// Fade-in length of one element.
	pub fade_ms: f64,
	/// Delay between consecutive elements fading in.
	pub stagger_ms: f64,
	/// Resting opacity of links.
	pub link_opacity: f64,
}

impl Default for AnimationConfig {
	fn default() -> Self {
		Self {
			focus_ms: 550.0,
			zoom_ms: 250.0,
			fade_ms: 800.0,
			stagger_ms: 50.0,
			link_opacity: 0.6,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_documents_keep_defaults() {
		let config = ChartConfig::from_json(
			r#"{"default_focus": 12, "root_tie_break": "lowest-id", "zoom": {"max_scale": 8}}"#,
		)
		.unwrap();
		assert_eq!(config.default_focus, 12);
		assert_eq!(config.root_tie_break, RootTieBreak::LowestId);
		assert_eq!(config.zoom.max_scale, 8.0);
		assert_eq!(config.zoom.min_scale, 0.1);
		assert_eq!(config.tree, TreeSpacing::default());
	}

	#[test]
	fn saved_configs_load_back_unchanged() {
		let mut config = ChartConfig::default();
		config.root_tie_break = RootTieBreak::LowestId;
		config.force.link_distance = 140.0;
		let text = serde_json::to_string(&config).unwrap();
		assert!(text.contains("\"lowest-id\""));
		assert_eq!(ChartConfig::from_json(&text).unwrap(), config);
	}

	#[test]
	fn alpha_decay_cools_in_three_hundred_ticks() {
		let params = ForceParams::default();
		let alpha = (1.0 - params.alpha_decay).powi(300);
		assert!((alpha - params.alpha_min).abs() < 1e-9);
	}
}
