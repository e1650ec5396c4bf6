use log::debug;

use super::{ChartLayout, LayoutEngine, LayoutMode, PlacedLink, PlacedNode};
use crate::chart::config::TreeSpacing;
use crate::chart::error::Result;
use crate::chart::geometry::{LinkPath, Point, Viewport};
use crate::chart::hierarchy::build_hierarchy;
use crate::chart::model::{Dataset, RelationKind, RootTieBreak};
use crate::chart::tidy::{TidySizing, TidyTree};

/// Generations run left to right, siblings stack top to bottom.
#[derive(Clone, Debug)]
pub struct TreeLayout {
	spacing: TreeSpacing,
	tie_break: RootTieBreak,
}

impl TreeLayout {
	/// Engine using `spacing`, rooted per `tie_break`.
	pub fn new(spacing: TreeSpacing, tie_break: RootTieBreak) -> Self {
		Self { spacing, tie_break }
	}

	/// Width reserved for the tree; deeper genealogies get more canvas.
	pub fn layout_width(&self, dataset: &Dataset) -> f64 {
		dataset.generation_count() as f64 * self.spacing.width_per_generation
			+ self.spacing.width_padding
	}
}

impl LayoutEngine for TreeLayout {
	fn mode(&self) -> LayoutMode {
		LayoutMode::Tree
	}

	fn layout(&mut self, dataset: &Dataset, viewport: Viewport) -> Result<ChartLayout> {
		let root = build_hierarchy(dataset, self.tie_break)?;
		let tidy = TidyTree::from_hierarchy(&root);
		let separation = self.spacing.separation;
		let cells = tidy.layout(
			|_, _| separation,
			TidySizing::NodeSize {
				breadth: self.spacing.cell_breadth,
				depth: self.spacing.cell_depth,
			},
		);

		// Center the nominal layout box on the world origin, which the camera
		// starts out pinning to the viewport center.
		let dx = -self.layout_width(dataset) / 2.0 + self.spacing.margin_left;
		let dy = -viewport.height / 2.0 + self.spacing.margin_top;
		let positions: Vec<Point> = cells
			.iter()
			.map(|cell| Point::new(cell.y + dx, cell.x + dy))
			.collect();

		let members = root.descendants();
		let nodes = members
			.iter()
			.zip(&positions)
			.map(|(member, &position)| PlacedNode {
				id: member.id(),
				position,
				radius: self.spacing.node_radius,
			})
			.collect();
		let links = (1..members.len())
			.filter_map(|slot| {
				let parent = tidy.parent(slot)?;
				Some(PlacedLink {
					source: members[parent].id(),
					target: members[slot].id(),
					kind: RelationKind::ParentChild,
					path: LinkPath::horizontal(positions[parent], positions[slot]),
				})
			})
			.collect();

		debug!("tree layout placed {} nodes", members.len());
		Ok(ChartLayout {
			mode: LayoutMode::Tree,
			nodes,
			links,
		})
	}
}
