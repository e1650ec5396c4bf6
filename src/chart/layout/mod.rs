//! Layout engines: dataset + viewport → positioned nodes and link paths.

mod force;
mod radial;
mod tree;

use std::fmt;
use std::str::FromStr;

pub use force::ForceLayout;
pub use radial::RadialLayout;
pub use tree::TreeLayout;

use super::config::ChartConfig;
use super::error::Result;
use super::geometry::{LinkPath, Point, Viewport};
use super::model::{Dataset, PersonId, RelationKind};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
/// Which engine places the nodes.
pub enum LayoutMode {
	#[default]
	/// Horizontal tidy tree.
	Tree,
	/// Tidy tree bent around the centre.
	Radial,
	/// Force-directed simulation.
	Force,
}

impl LayoutMode {
	/// Every mode, in selector order.
	pub const ALL: [LayoutMode; 3] = [LayoutMode::Tree, LayoutMode::Radial, LayoutMode::Force];

	/// Selector value: `tree`, `radial` or `force`.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Tree => "tree",
			Self::Radial => "radial",
			Self::Force => "force",
		}
	}

	/// Whether the layout can center the camera on a member.
	pub fn supports_focus(&self) -> bool {
		!matches!(self, Self::Force)
	}
}

impl fmt::Display for LayoutMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LayoutMode {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"tree" => Ok(Self::Tree),
			"radial" => Ok(Self::Radial),
			"force" => Ok(Self::Force),
			other => Err(format!("unknown layout mode {other:?}")),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
/// A member at a position. A member may be placed more than once.
pub struct PlacedNode {
	/// Member drawn here.
	pub id: PersonId,
	/// Centre in world space.
	pub position: Point,
	/// Radius in world units.
	pub radius: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// An edge between two placed members.
pub struct PlacedLink {
	/// Parent or first partner.
	pub source: PersonId,
	/// Child or second partner.
	pub target: PersonId,
	/// Kind of connection.
	pub kind: RelationKind,
	/// Geometry in world space.
	pub path: LinkPath,
}

impl PlacedLink {
	/// Whether either end is `id`.
	pub fn touches(&self, id: PersonId) -> bool {
		self.source == id || self.target == id
	}
}

/// One layout pass. Tree and radial passes may list a person more than once.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartLayout {
	/// Engine that produced the pass.
	pub mode: LayoutMode,
	/// Placed members in drawing order.
	pub nodes: Vec<PlacedNode>,
	/// Edges in drawing order.
	pub links: Vec<PlacedLink>,
}

impl ChartLayout {
	/// First placement of `id` in drawing order.
	pub fn position_of(&self, id: PersonId) -> Option<Point> {
		self.nodes.iter().find(|n| n.id == id).map(|n| n.position)
	}

	/// First placement of `id`.
	pub fn node(&self, id: PersonId) -> Option<&PlacedNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Topmost node under a world point. Later nodes draw over earlier ones.
	pub fn node_at(&self, world: Point) -> Option<&PlacedNode> {
		self.placement_at(world).map(|i| &self.nodes[i])
	}

	/// Index into `nodes` of the topmost node under a world point. Tells
	/// apart the copies of a member placed more than once.
	pub fn placement_at(&self, world: Point) -> Option<usize> {
		self.nodes
			.iter()
			.rposition(|n| n.position.distance(world) <= n.radius)
	}
}

/// A placement policy. Tree and radial are one-shot; force keeps ticking.
pub trait LayoutEngine {
	/// Mode this engine implements.
	fn mode(&self) -> LayoutMode;

	/// Discard any previous state and lay the dataset out from scratch.
	fn layout(&mut self, dataset: &Dataset, viewport: Viewport) -> Result<ChartLayout>;

	/// Advance an iterative layout. Returns the new snapshot, or `None` when
	/// there is nothing left to animate.
	fn step(&mut self, _dt: f64) -> Option<ChartLayout> {
		None
	}

	/// Pin `id` at a world position while it is dragged.
	fn drag(&mut self, _id: PersonId, _to: Point) -> bool {
		false
	}

	/// Release a dragged node.
	fn release(&mut self, _id: PersonId) {}
}

/// Engine for `mode`, configured from `config`.
pub fn engine_for(mode: LayoutMode, config: &ChartConfig) -> Box<dyn LayoutEngine> {
	match mode {
		LayoutMode::Tree => Box::new(TreeLayout::new(config.tree.clone(), config.root_tie_break)),
		LayoutMode::Radial => {
			Box::new(RadialLayout::new(config.radial.clone(), config.root_tie_break))
		}
		LayoutMode::Force => Box::new(ForceLayout::new(config.force.clone())),
	}
}
