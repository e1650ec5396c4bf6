//! One render pass worth of drawables, in world coordinates.
//!
//! Rendering is a pure function of the layout, the view state and the fade
//! clock. The canvas code only walks the result.

use super::config::AnimationConfig;
use super::geometry::{LinkPath, Point};
use super::layout::{ChartLayout, LayoutMode};
use super::model::{Dataset, Gender, Person, PersonId, RelationKind};
use super::view::ViewState;

/// Fill of the selected node.
pub const SELECTED_FILL: &str = "#FF9800";
/// Fill of male nodes.
pub const MALE_FILL: &str = "#4CAF50";
/// Fill of female nodes.
pub const FEMALE_FILL: &str = "#E91E63";
/// Outline around every node.
pub const NODE_STROKE: &str = "#fff";
/// Parent-child edges in the tree and radial layouts.
pub const LINK_STROKE: &str = "#999";
/// Parent-child edges in the force layout.
pub const FORCE_LINK_STROKE: &str = "#ccc";
/// Spouse edges.
pub const SPOUSE_STROKE: &str = "#E91E63";
/// Edges touching the selected member.
pub const HIGHLIGHT_STROKE: &str = "#FF9800";
/// Occupation caption.
pub const CAPTION_FILL: &str = "#666";
/// Name label.
pub const TEXT_FILL: &str = "#333";

/// Fill for `person` given the current selection.
pub fn node_fill(person: &Person, selected: Option<PersonId>) -> &'static str {
	if selected == Some(person.id) {
		return SELECTED_FILL;
	}
	match person.gender {
		Gender::Male => MALE_FILL,
		Gender::Female => FEMALE_FILL,
	}
}

#[derive(Clone, Debug, PartialEq)]
/// A line of text drawn relative to a node.
pub struct TextSprite {
	/// What to draw.
	pub text: String,
	/// Offset below the node center.
	pub dy: f64,
	/// Canvas font shorthand.
	pub font: &'static str,
	/// Fill colour.
	pub color: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
/// One node ready to draw.
pub struct NodeSprite {
	/// Member drawn here.
	pub id: PersonId,
	/// Centre in world space.
	pub position: Point,
	/// Radius in world units.
	pub radius: f64,
	/// Fill colour.
	pub fill: &'static str,
	/// Glyph inside the node, when images are on.
	pub avatar: Option<TextSprite>,
	/// Name and caption lines, when labels are on.
	pub labels: Vec<TextSprite>,
	/// 0 to 1, below 1 while fading in.
	pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// One edge ready to draw.
pub struct LinkSprite {
	/// Parent or first partner.
	pub source: PersonId,
	/// Child or second partner.
	pub target: PersonId,
	/// Kind of connection.
	pub kind: RelationKind,
	/// Geometry in world space.
	pub path: LinkPath,
	/// Stroke colour.
	pub color: &'static str,
	/// Stroke width in world units.
	pub width: f64,
	/// Touches the selected member. Drawn dashed.
	pub highlighted: bool,
	/// 0 to 1.
	pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// Everything one frame draws, links below nodes.
pub struct Scene {
	/// Render pass that produced this scene.
	pub epoch: u64,
	/// Layout the scene was built from.
	pub mode: LayoutMode,
	/// Edges, drawn first.
	pub links: Vec<LinkSprite>,
	/// Nodes, drawn over the edges.
	pub nodes: Vec<NodeSprite>,
}

/// Fade-in clock for an animated render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fade<'a> {
	/// Time since the render started.
	pub elapsed_ms: f64,
	/// Fade length and stagger.
	pub timing: &'a AnimationConfig,
}

impl Fade<'_> {
	/// Opacity of the `index`th element, easing from 0 to `target`.
	pub fn opacity(&self, index: usize, target: f64) -> f64 {
		let start = index as f64 * self.timing.stagger_ms;
		let t = ((self.elapsed_ms - start) / self.timing.fade_ms).clamp(0.0, 1.0);
		t * target
	}

	/// Whether every element of a scene with `count` elements is fully in.
	pub fn is_done(&self, count: usize) -> bool {
		let last = count.saturating_sub(1) as f64 * self.timing.stagger_ms;
		self.elapsed_ms >= last + self.timing.fade_ms
	}
}

struct Typography {
	avatar_font: &'static str,
	name_dy: f64,
	name_font: &'static str,
	caption_dy: Option<f64>,
}

fn typography(mode: LayoutMode) -> Typography {
	match mode {
		LayoutMode::Tree => Typography {
			avatar_font: "20px sans-serif",
			name_dy: 40.0,
			name_font: "bold 12px sans-serif",
			caption_dy: Some(55.0),
		},
		LayoutMode::Radial => Typography {
			avatar_font: "16px sans-serif",
			name_dy: 35.0,
			name_font: "10px sans-serif",
			caption_dy: None,
		},
		LayoutMode::Force => Typography {
			avatar_font: "20px sans-serif",
			name_dy: 40.0,
			name_font: "12px sans-serif",
			caption_dy: None,
		},
	}
}

impl Scene {
	/// Drawables for `layout` under `view`. `fade_elapsed` is the time since a
	/// fading render started, or `None` when nothing is fading.
	pub fn build(
		epoch: u64,
		dataset: &Dataset,
		layout: &ChartLayout,
		view: &ViewState,
		animation: &AnimationConfig,
		fade_elapsed: Option<f64>,
	) -> Self {
		let selected = view.selected;
		let display = view.display;
		let typo = typography(layout.mode);
		let link_target = animation.link_opacity;
		let fade = fade_elapsed.map(|elapsed_ms| Fade {
			elapsed_ms,
			timing: animation,
		});

		let links = layout
			.links
			.iter()
			.enumerate()
			.map(|(i, link)| {
				let highlighted = selected.is_some_and(|id| link.touches(id));
				let (color, width) = match (highlighted, layout.mode, link.kind) {
					(true, _, _) => (HIGHLIGHT_STROKE, 3.0),
					(false, _, RelationKind::Spouse) => (SPOUSE_STROKE, 3.0),
					(false, LayoutMode::Force, _) => (FORCE_LINK_STROKE, 2.0),
					(false, _, _) => (LINK_STROKE, 2.0),
				};
				LinkSprite {
					source: link.source,
					target: link.target,
					kind: link.kind,
					path: link.path,
					color,
					width,
					highlighted,
					opacity: fade.map_or(link_target, |f| f.opacity(i, link_target)),
				}
			})
			.collect();

		let nodes = layout
			.nodes
			.iter()
			.enumerate()
			.filter_map(|(i, placed)| {
				let person = dataset.person(placed.id)?;
				let avatar = (display.show_images && !person.avatar.is_empty()).then(|| TextSprite {
					text: person.avatar.clone(),
					dy: 0.0,
					font: typo.avatar_font,
					color: TEXT_FILL,
				});
				let mut labels = Vec::new();
				if display.show_labels {
					labels.push(TextSprite {
						text: person.name.clone(),
						dy: typo.name_dy,
						font: typo.name_font,
						color: TEXT_FILL,
					});
					if let (Some(dy), Some(occupation)) = (typo.caption_dy, &person.occupation) {
						labels.push(TextSprite {
							text: occupation.clone(),
							dy,
							font: "10px sans-serif",
							color: CAPTION_FILL,
						});
					}
				}
				Some(NodeSprite {
					id: placed.id,
					position: placed.position,
					radius: placed.radius,
					fill: node_fill(person, selected),
					avatar,
					labels,
					opacity: fade.map_or(1.0, |f| f.opacity(i, 1.0)),
				})
			})
			.collect();

		Self {
			epoch,
			mode: layout.mode,
			links,
			nodes,
		}
	}

	/// Edges touching the selected member.
	pub fn highlighted_links(&self) -> impl Iterator<Item = &LinkSprite> {
		self.links.iter().filter(|l| l.highlighted)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chart::camera::Camera;
	use crate::chart::config::{ChartConfig, ZoomExtent};
	use crate::chart::geometry::Viewport;
	use crate::chart::layout::{LayoutEngine, engine_for};
	use crate::chart::model::tests::person;

	fn data() -> Dataset {
		let mut kid = person(3, "kid", 2, &[1]);
		kid.occupation = Some("画家".into());
		Dataset::new(vec![person(1, "dad", 1, &[]), person(2, "mum", 2, &[1]), kid], vec![])
			.unwrap()
	}

	fn view() -> ViewState {
		ViewState::new(Camera::new(ZoomExtent::default(), Viewport::default()))
	}

	fn tree(dataset: &Dataset) -> ChartLayout {
		engine_for(LayoutMode::Tree, &ChartConfig::default())
			.layout(dataset, Viewport::default())
			.unwrap()
	}

	#[test]
	fn colours_follow_gender_and_selection() {
		let data = data();
		let layout = tree(&data);
		let mut view = view();
		view.selected = Some(2);
		let scene = Scene::build(1, &data, &layout, &view, &AnimationConfig::default(), None);
		let fill = |id| scene.nodes.iter().find(|n| n.id == id).unwrap().fill;
		assert_eq!(fill(1), MALE_FILL);
		assert_eq!(fill(2), SELECTED_FILL);
		assert_eq!(fill(3), MALE_FILL);
	}

	#[test]
	fn only_links_touching_the_selection_light_up() {
		let data = data();
		let layout = tree(&data);
		let timing = AnimationConfig::default();
		let mut view = view();
		let scene = Scene::build(1, &data, &layout, &view, &timing, None);
		assert_eq!(scene.highlighted_links().count(), 0);

		view.selected = Some(3);
		let scene = Scene::build(2, &data, &layout, &view, &timing, None);
		let lit: Vec<_> = scene.highlighted_links().map(|l| (l.source, l.target)).collect();
		assert_eq!(lit, vec![(1, 3)]);
	}

	#[test]
	fn toggles_drop_text() {
		let data = data();
		let layout = tree(&data);
		let mut view = view();
		let scene = Scene::build(1, &data, &layout, &view, &AnimationConfig::default(), None);
		let kid = scene.nodes.iter().find(|n| n.id == 3).unwrap();
		assert_eq!(kid.labels.len(), 2);
		assert_eq!(kid.labels[1].text, "画家");
		assert!(kid.avatar.is_some());

		view.display.show_labels = false;
		view.display.show_images = false;
		let scene = Scene::build(2, &data, &layout, &view, &AnimationConfig::default(), None);
		assert!(scene.nodes.iter().all(|n| n.labels.is_empty() && n.avatar.is_none()));
	}

	#[test]
	fn fade_staggers_elements() {
		let timing = AnimationConfig::default();
		let fade = Fade {
			elapsed_ms: 400.0,
			timing: &timing,
		};
		assert_eq!(fade.opacity(0, 1.0), 0.5);
		assert_eq!(fade.opacity(8, 1.0), 0.0);
		assert_eq!(fade.opacity(0, 0.6), 0.3);
		assert!(!fade.is_done(3));
		let done = Fade {
			elapsed_ms: 900.0,
			timing: &timing,
		};
		assert!(done.is_done(3));
	}
}
