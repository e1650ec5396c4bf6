use log::debug;

use super::{ChartLayout, LayoutEngine, LayoutMode, PlacedLink, PlacedNode};
use crate::chart::config::ForceParams;
use crate::chart::error::Result;
use crate::chart::geometry::{LinkPath, Point, Viewport};
use crate::chart::model::{Dataset, PersonId, Relationship};
use crate::chart::simulation::ForceSimulation;

/// Every person once, pulled together by parent and spouse links.
#[derive(Clone, Debug)]
pub struct ForceLayout {
	params: ForceParams,
	sim: Option<ForceSimulation>,
	links: Vec<Relationship>,
}

impl ForceLayout {
	/// Engine with no simulation until the first `layout`.
	pub fn new(params: ForceParams) -> Self {
		Self {
			params,
			sim: None,
			links: Vec::new(),
		}
	}

	/// Run the current simulation until it cools and return the final state.
	pub fn settle(&mut self) -> Option<ChartLayout> {
		let sim = self.sim.as_mut()?;
		let ticks = sim.settle();
		debug!("force layout settled after {ticks} ticks");
		Some(self.snapshot())
	}

	fn snapshot(&self) -> ChartLayout {
		let Some(sim) = &self.sim else {
			return ChartLayout {
				mode: LayoutMode::Force,
				nodes: Vec::new(),
				links: Vec::new(),
			};
		};
		let nodes = sim
			.bodies()
			.iter()
			.map(|body| PlacedNode {
				id: body.id,
				position: body.position(),
				radius: self.params.node_radius,
			})
			.collect();
		let links = self
			.links
			.iter()
			.filter_map(|link| {
				Some(PlacedLink {
					source: link.source,
					target: link.target,
					kind: link.kind,
					path: LinkPath::Line {
						from: sim.position(link.source)?,
						to: sim.position(link.target)?,
					},
				})
			})
			.collect();
		ChartLayout {
			mode: LayoutMode::Force,
			nodes,
			links,
		}
	}
}

impl LayoutEngine for ForceLayout {
	fn mode(&self) -> LayoutMode {
		LayoutMode::Force
	}

	fn layout(&mut self, dataset: &Dataset, _viewport: Viewport) -> Result<ChartLayout> {
		let ids: Vec<PersonId> = dataset.people().iter().map(|p| p.id).collect();
		self.links = dataset.relationships();
		self.sim = Some(ForceSimulation::new(&ids, &self.links, self.params.clone()));
		debug!(
			"force layout started with {} bodies and {} links",
			ids.len(),
			self.links.len()
		);
		Ok(self.snapshot())
	}

	fn step(&mut self, _dt: f64) -> Option<ChartLayout> {
		let sim = self.sim.as_mut()?;
		if !sim.is_active() {
			return None;
		}
		sim.tick();
		Some(self.snapshot())
	}

	fn drag(&mut self, id: PersonId, to: Point) -> bool {
		self.sim.as_mut().is_some_and(|sim| sim.pin(id, to))
	}

	fn release(&mut self, id: PersonId) {
		if let Some(sim) = self.sim.as_mut() {
			sim.release(id);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chart::model::tests::person;
	use crate::chart::model::RelationKind;

	fn couple_with_child() -> Dataset {
		Dataset::new(
			vec![
				person(1, "dad", 1, &[]),
				person(2, "mum", 1, &[]),
				person(3, "kid", 2, &[1, 2]),
			],
			vec![Relationship {
				source: 1,
				target: 2,
				kind: RelationKind::Spouse,
			}],
		)
		.unwrap()
	}

	#[test]
	fn each_person_is_placed_once() {
		let data = couple_with_child();
		let mut engine = ForceLayout::new(ForceParams::default());
		let layout = engine.layout(&data, Viewport::default()).unwrap();
		assert_eq!(layout.nodes.len(), 3);
		assert_eq!(layout.links.len(), 3);
		assert!(layout.links.iter().all(|l| matches!(l.path, LinkPath::Line { .. })));
		assert_eq!(
			layout
				.links
				.iter()
				.filter(|l| l.kind == RelationKind::Spouse)
				.count(),
			1
		);
	}

	#[test]
	fn steps_until_cool_then_stops() {
		let data = couple_with_child();
		let mut engine = ForceLayout::new(ForceParams::default());
		engine.layout(&data, Viewport::default()).unwrap();
		let mut frames = 0;
		while engine.step(16.0).is_some() {
			frames += 1;
			assert!(frames < 1_000);
		}
		assert!(frames > 100);
		assert!(engine.step(16.0).is_none());
	}

	#[test]
	fn dragging_pins_and_reheats() {
		let data = couple_with_child();
		let mut engine = ForceLayout::new(ForceParams::default());
		engine.layout(&data, Viewport::default()).unwrap();
		engine.settle();

		let spot = Point::new(250.0, 40.0);
		assert!(engine.drag(3, spot));
		let frame = engine.step(16.0).unwrap();
		assert_eq!(frame.position_of(3), Some(spot));
		assert!(!engine.drag(42, spot));

		engine.release(3);
		assert!(engine.settle().is_some());
	}
}
