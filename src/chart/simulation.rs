//! Velocity-Verlet force simulation with link, many-body, centering and
//! collision forces, cooled by an exponentially decaying alpha.
//!
//! Bodies start on a phyllotaxis spiral around the origin and every random
//! nudge comes from a fixed-seed LCG, so two simulations built from the same
//! input walk through identical states.

use std::collections::HashMap;
use std::f64::consts::PI;

use super::config::ForceParams;
use super::geometry::Point;
use super::model::{PersonId, Relationship};

const INITIAL_RADIUS: f64 = 10.0;
const DISTANCE_MIN_SQ: f64 = 1.0;
/// Upper bound on ticks spent settling, in case alpha is held up.
const MAX_SETTLE_TICKS: usize = 10_000;

#[derive(Clone, Debug, PartialEq)]
pub struct Body {
	pub id: PersonId,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Fixed position while dragged.
	pub pinned: Option<Point>,
}

impl Body {
	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}
}

#[derive(Clone, Debug)]
struct Spring {
	source: usize,
	target: usize,
	strength: f64,
	/// Share of the correction applied to the target.
	bias: f64,
}

/// Deterministic LCG, same constants as Numerical Recipes.
#[derive(Clone, Debug)]
struct Lcg(u64);

impl Lcg {
	fn next(&mut self) -> f64 {
		self.0 = (1_664_525 * self.0 + 1_013_904_223) % 4_294_967_296;
		self.0 as f64 / 4_294_967_296.0
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

#[derive(Clone, Debug)]
pub struct ForceSimulation {
	bodies: Vec<Body>,
	index: HashMap<PersonId, usize>,
	springs: Vec<Spring>,
	params: ForceParams,
	alpha: f64,
	alpha_target: f64,
	rng: Lcg,
}

impl ForceSimulation {
	pub fn new(ids: &[PersonId], links: &[Relationship], params: ForceParams) -> Self {
		let initial_angle = PI * (3.0 - 5f64.sqrt());
		let mut index = HashMap::with_capacity(ids.len());
		let bodies: Vec<Body> = ids
			.iter()
			.enumerate()
			.map(|(i, &id)| {
				index.entry(id).or_insert(i);
				let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
				let angle = i as f64 * initial_angle;
				Body {
					id,
					x: radius * angle.cos(),
					y: radius * angle.sin(),
					vx: 0.0,
					vy: 0.0,
					pinned: None,
				}
			})
			.collect();

		let pairs: Vec<(usize, usize)> = links
			.iter()
			.filter_map(|link| {
				let s = *index.get(&link.source)?;
				let t = *index.get(&link.target)?;
				(s != t).then_some((s, t))
			})
			.collect();
		let mut degree = vec![0usize; bodies.len()];
		for &(s, t) in &pairs {
			degree[s] += 1;
			degree[t] += 1;
		}
		let springs = pairs
			.into_iter()
			.map(|(source, target)| {
				let (ds, dt) = (degree[source] as f64, degree[target] as f64);
				Spring {
					source,
					target,
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		Self {
			bodies,
			index,
			springs,
			params,
			alpha: 1.0,
			alpha_target: 0.0,
			rng: Lcg(1),
		}
	}

	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	pub fn position(&self, id: PersonId) -> Option<Point> {
		self.index.get(&id).map(|&i| self.bodies[i].position())
	}

	/// Still moving enough to be worth another tick, or being reheated.
	pub fn is_active(&self) -> bool {
		self.alpha.max(self.alpha_target) >= self.params.alpha_min
	}

	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;
		let alpha = self.alpha;

		self.apply_links(alpha);
		self.apply_charge(alpha);
		self.apply_centering();
		self.apply_collisions();

		let keep = 1.0 - self.params.velocity_decay;
		for body in &mut self.bodies {
			match body.pinned {
				Some(p) => {
					body.x = p.x;
					body.y = p.y;
					body.vx = 0.0;
					body.vy = 0.0;
				}
				None => {
					body.vx *= keep;
					body.vy *= keep;
					body.x += body.vx;
					body.y += body.vy;
				}
			}
		}
	}

	/// Tick until cool. Returns the number of ticks taken.
	pub fn settle(&mut self) -> usize {
		let mut ticks = 0;
		while self.is_active() && ticks < MAX_SETTLE_TICKS {
			self.tick();
			ticks += 1;
		}
		ticks
	}

	/// Hold `id` at `at` and reheat so neighbours make room.
	pub fn pin(&mut self, id: PersonId, at: Point) -> bool {
		let Some(&i) = self.index.get(&id) else {
			return false;
		};
		let body = &mut self.bodies[i];
		body.pinned = Some(at);
		body.x = at.x;
		body.y = at.y;
		self.alpha_target = self.params.drag_alpha_target;
		true
	}

	/// Let a dragged body go and let the simulation cool again.
	pub fn release(&mut self, id: PersonId) {
		if let Some(&i) = self.index.get(&id) {
			self.bodies[i].pinned = None;
		}
		if self.bodies.iter().all(|b| b.pinned.is_none()) {
			self.alpha_target = 0.0;
		}
	}

	fn nonzero_or_jiggle(&mut self, v: f64) -> f64 {
		if v == 0.0 { self.rng.jiggle() } else { v }
	}

	fn apply_links(&mut self, alpha: f64) {
		let distance = self.params.link_distance;
		for k in 0..self.springs.len() {
			let Spring {
				source,
				target,
				strength,
				bias,
			} = self.springs[k];
			let (s, t) = (&self.bodies[source], &self.bodies[target]);
			let raw_x = t.x + t.vx - s.x - s.vx;
			let raw_y = t.y + t.vy - s.y - s.vy;
			let x = self.nonzero_or_jiggle(raw_x);
			let y = self.nonzero_or_jiggle(raw_y);
			let len = x.hypot(y);
			let l = (len - distance) / len * alpha * strength;
			let (x, y) = (x * l, y * l);

			let t = &mut self.bodies[target];
			t.vx -= x * bias;
			t.vy -= y * bias;
			let s = &mut self.bodies[source];
			s.vx += x * (1.0 - bias);
			s.vy += y * (1.0 - bias);
		}
	}

	fn apply_charge(&mut self, alpha: f64) {
		let strength = self.params.charge_strength;
		let n = self.bodies.len();
		for i in 0..n {
			let (mut ax, mut ay) = (0.0, 0.0);
			for j in 0..n {
				if i == j {
					continue;
				}
				let mut x = self.bodies[j].x - self.bodies[i].x;
				let mut y = self.bodies[j].y - self.bodies[i].y;
				let mut l = x * x + y * y;
				if x == 0.0 {
					x = self.rng.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.rng.jiggle();
					l += y * y;
				}
				if l < DISTANCE_MIN_SQ {
					l = (DISTANCE_MIN_SQ * l).sqrt();
				}
				ax += x * strength * alpha / l;
				ay += y * strength * alpha / l;
			}
			self.bodies[i].vx += ax;
			self.bodies[i].vy += ay;
		}
	}

	fn apply_centering(&mut self) {
		if self.bodies.is_empty() {
			return;
		}
		let n = self.bodies.len() as f64;
		let sx = self.bodies.iter().map(|b| b.x).sum::<f64>() / n;
		let sy = self.bodies.iter().map(|b| b.y).sum::<f64>() / n;
		for body in &mut self.bodies {
			body.x -= sx;
			body.y -= sy;
		}
	}

	fn apply_collisions(&mut self) {
		let r = self.params.collide_radius;
		let reach = r + r;
		// Equal radii split every correction evenly.
		let share = (r * r) / (r * r + r * r);
		let n = self.bodies.len();
		for i in 0..n {
			let xi = self.bodies[i].x + self.bodies[i].vx;
			let yi = self.bodies[i].y + self.bodies[i].vy;
			for j in (i + 1)..n {
				let other = &self.bodies[j];
				let mut x = xi - other.x - other.vx;
				let mut y = yi - other.y - other.vy;
				let mut l = x * x + y * y;
				if l >= reach * reach {
					continue;
				}
				if x == 0.0 {
					x = self.rng.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.rng.jiggle();
					l += y * y;
				}
				let dist = l.sqrt();
				let push = (reach - dist) / dist;
				let (x, y) = (x * push, y * push);
				self.bodies[i].vx += x * share;
				self.bodies[i].vy += y * share;
				self.bodies[j].vx -= x * (1.0 - share);
				self.bodies[j].vy -= y * (1.0 - share);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chart::model::RelationKind;

	fn spouse(source: PersonId, target: PersonId) -> Relationship {
		Relationship {
			source,
			target,
			kind: RelationKind::Spouse,
		}
	}

	#[test]
	fn linked_pair_settles_near_link_distance() {
		let mut sim = ForceSimulation::new(&[1, 2], &[spouse(1, 2)], ForceParams::default());
		let ticks = sim.settle();
		assert!(!sim.is_active());
		assert!((290..=310).contains(&ticks), "ticks {ticks}");

		let d = sim.position(1).unwrap().distance(sim.position(2).unwrap());
		// Link pull balances the charge a little beyond the target distance.
		assert!((90.0..125.0).contains(&d), "distance {d}");
	}

	#[test]
	fn centroid_stays_at_origin() {
		let ids: Vec<PersonId> = (1..=12).collect();
		// Equal-degree pairs pull symmetrically.
		let links: Vec<_> = (1..=6).map(|i| spouse(2 * i - 1, 2 * i)).collect();
		let mut sim = ForceSimulation::new(&ids, &links, ForceParams::default());
		for _ in 0..50 {
			sim.tick();
		}
		let n = sim.bodies().len() as f64;
		let cx = sim.bodies().iter().map(|b| b.x).sum::<f64>() / n;
		let cy = sim.bodies().iter().map(|b| b.y).sum::<f64>() / n;
		assert!(cx.abs() < 1.0 && cy.abs() < 1.0, "centroid {cx}, {cy}");
	}

	#[test]
	fn unlinked_bodies_do_not_overlap_once_settled() {
		let ids: Vec<PersonId> = (1..=8).collect();
		let mut sim = ForceSimulation::new(&ids, &[], ForceParams::default());
		sim.settle();
		for (i, a) in sim.bodies().iter().enumerate() {
			for b in &sim.bodies()[i + 1..] {
				let d = a.position().distance(b.position());
				assert!(d > 50.0, "{} and {} only {d} apart", a.id, b.id);
			}
		}
	}

	#[test]
	fn pinned_bodies_stay_put_until_released() {
		let mut sim = ForceSimulation::new(&[1, 2, 3], &[spouse(1, 2)], ForceParams::default());
		sim.settle();
		assert!(!sim.is_active());

		let spot = Point::new(400.0, -120.0);
		assert!(sim.pin(2, spot));
		for _ in 0..20 {
			sim.tick();
		}
		assert!(sim.is_active());
		assert_eq!(sim.position(2), Some(spot));

		sim.release(2);
		sim.settle();
		assert!(!sim.is_active());
		assert!(!sim.pin(99, spot));
	}

	#[test]
	fn identical_inputs_give_identical_runs() {
		let ids: Vec<PersonId> = (1..=6).collect();
		let links = [spouse(1, 2), spouse(3, 4), spouse(2, 5)];
		let mut a = ForceSimulation::new(&ids, &links, ForceParams::default());
		let mut b = ForceSimulation::new(&ids, &links, ForceParams::default());
		for _ in 0..120 {
			a.tick();
			b.tick();
		}
		assert_eq!(a.bodies(), b.bodies());
	}
}
