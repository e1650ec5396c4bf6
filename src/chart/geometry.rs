//! Points, viewport sizes and edge shapes in world space.

use std::f64::consts::FRAC_PI_2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
/// A 2-D point or offset.
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate, growing downwards.
	pub y: f64,
}

impl Point {
	/// The world origin.
	pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Polar → cartesian with angle 0 pointing up and increasing clockwise.
	pub fn radial(angle: f64, radius: f64) -> Self {
		let a = angle - FRAC_PI_2;
		Self::new(radius * a.cos(), radius * a.sin())
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Point) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}
}

/// Drawing surface size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Width in pixels.
	pub width: f64,
	/// Height in pixels.
	pub height: f64,
}

impl Viewport {
	/// Viewport of the given size.
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Middle of the viewport.
	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}
}

impl Default for Viewport {
	fn default() -> Self {
		Self::new(800.0, 600.0)
	}
}

/// Shape of an edge in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LinkPath {
	/// Straight segment.
	Line {
		/// Start.
		from: Point,
		/// End.
		to: Point,
	},
	/// Cubic Bézier.
	Cubic {
		/// Start.
		from: Point,
		/// Control point near the start.
		c1: Point,
		/// Control point near the end.
		c2: Point,
		/// End.
		to: Point,
	},
}

impl LinkPath {
	/// Horizontal bump: control points share x at the midpoint.
	pub fn horizontal(from: Point, to: Point) -> Self {
		let mid = (from.x + to.x) / 2.0;
		Self::Cubic {
			from,
			c1: Point::new(mid, from.y),
			c2: Point::new(mid, to.y),
			to,
		}
	}

	/// Radial bump between two (angle, radius) pairs.
	pub fn radial(from: (f64, f64), to: (f64, f64)) -> Self {
		let mid = (from.1 + to.1) / 2.0;
		Self::Cubic {
			from: Point::radial(from.0, from.1),
			c1: Point::radial(from.0, mid),
			c2: Point::radial(to.0, mid),
			to: Point::radial(to.0, to.1),
		}
	}

	/// Start and end points.
	pub fn endpoints(&self) -> (Point, Point) {
		match *self {
			Self::Line { from, to } | Self::Cubic { from, to, .. } => (from, to),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: Point, b: Point) -> bool {
		a.distance(b) < 1e-9
	}

	#[test]
	fn radial_zero_angle_points_up() {
		assert!(close(Point::radial(0.0, 10.0), Point::new(0.0, -10.0)));
		assert!(close(
			Point::radial(std::f64::consts::FRAC_PI_2, 10.0),
			Point::new(10.0, 0.0)
		));
	}

	#[test]
	fn horizontal_link_bends_at_midpoint() {
		let LinkPath::Cubic { c1, c2, .. } =
			LinkPath::horizontal(Point::new(0.0, 0.0), Point::new(100.0, 40.0))
		else {
			panic!("expected a cubic path");
		};
		assert_eq!(c1, Point::new(50.0, 0.0));
		assert_eq!(c2, Point::new(50.0, 40.0));
	}
}
