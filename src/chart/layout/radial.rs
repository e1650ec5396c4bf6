use std::f64::consts::TAU;

use log::debug;

use super::{ChartLayout, LayoutEngine, LayoutMode, PlacedLink, PlacedNode};
use crate::chart::config::RadialSpacing;
use crate::chart::error::Result;
use crate::chart::geometry::{LinkPath, Point, Viewport};
use crate::chart::hierarchy::build_hierarchy;
use crate::chart::model::{Dataset, RelationKind, RootTieBreak};
use crate::chart::tidy::{TidySizing, TidyTree};

/// The hierarchy wrapped around the root: breadth → angle, depth → radius.
#[derive(Clone, Debug)]
pub struct RadialLayout {
	spacing: RadialSpacing,
	tie_break: RootTieBreak,
}

impl RadialLayout {
	/// Engine using `spacing`, rooted per `tie_break`.
	pub fn new(spacing: RadialSpacing, tie_break: RootTieBreak) -> Self {
		Self { spacing, tie_break }
	}

	/// Radius of the outermost generation for `viewport`.
	pub fn outer_radius(&self, viewport: Viewport) -> f64 {
		(viewport.width.min(viewport.height) / 2.0 - self.spacing.margin).max(0.0)
	}
}

impl LayoutEngine for RadialLayout {
	fn mode(&self) -> LayoutMode {
		LayoutMode::Radial
	}

	fn layout(&mut self, dataset: &Dataset, viewport: Viewport) -> Result<ChartLayout> {
		let root = build_hierarchy(dataset, self.tie_break)?;
		let tidy = TidyTree::from_hierarchy(&root);
		let (sibling, cousin) = (self.spacing.sibling_separation, self.spacing.cousin_separation);
		// Rings get more circumference as they grow, so deep gaps shrink.
		let polar = tidy.layout(
			|a, b| {
				let base = if a.is_sibling_of(&b) { sibling } else { cousin };
				base / a.depth.max(1) as f64
			},
			TidySizing::Fit {
				breadth: TAU,
				depth: self.outer_radius(viewport),
			},
		);

		let members = root.descendants();
		let nodes = members
			.iter()
			.zip(&polar)
			.map(|(member, p)| PlacedNode {
				id: member.id(),
				position: Point::radial(p.x, p.y),
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
					path: LinkPath::radial(
						(polar[parent].x, polar[parent].y),
						(polar[slot].x, polar[slot].y),
					),
				})
			})
			.collect();

		debug!("radial layout placed {} nodes", members.len());
		Ok(ChartLayout {
			mode: LayoutMode::Radial,
			nodes,
			links,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chart::model::tests::person;

	#[test]
	fn rings_follow_depth() {
		let data = Dataset::new(
			vec![
				person(1, "root", 1, &[]),
				person(2, "a", 2, &[1]),
				person(3, "b", 2, &[1]),
				person(4, "c", 2, &[1]),
				person(5, "d", 3, &[2]),
			],
			vec![],
		)
		.unwrap();
		let viewport = Viewport::new(900.0, 700.0);
		let mut engine = RadialLayout::new(RadialSpacing::default(), RootTieBreak::DatasetOrder);
		assert_eq!(engine.outer_radius(viewport), 250.0);

		let layout = engine.layout(&data, viewport).unwrap();
		let ring = |id| layout.position_of(id).unwrap().distance(Point::ORIGIN);
		assert!(ring(1) < 1e-9);
		for id in [2, 3, 4] {
			assert!((ring(id) - 125.0).abs() < 1e-9);
		}
		assert!((ring(5) - 250.0).abs() < 1e-9);
	}

	#[test]
	fn tiny_viewports_collapse_to_the_center() {
		let engine = RadialLayout::new(RadialSpacing::default(), RootTieBreak::DatasetOrder);
		assert_eq!(engine.outer_radius(Viewport::new(150.0, 900.0)), 0.0);
	}
}
