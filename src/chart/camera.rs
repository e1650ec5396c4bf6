//! Pan/zoom transform between world and screen space, with eased
//! transitions for programmatic moves.
//!
//! `screen = world * k + (x, y)`. User gestures (drag-pan, wheel) apply at
//! once; buttons and focus changes animate towards a target. Starting a new
//! transition replaces the old target from wherever the camera is now.

use super::config::ZoomExtent;
use super::geometry::{Point, Viewport};

#[derive(Clone, Copy, Debug, PartialEq)]
/// Maps world to screen as `screen = world * k + (x, y)`.
pub struct ViewTransform {
	/// Horizontal offset in pixels.
	pub x: f64,
	/// Vertical offset in pixels.
	pub y: f64,
	/// Scale factor.
	pub k: f64,
}

impl ViewTransform {
	/// No offset, scale 1.
	pub const IDENTITY: ViewTransform = ViewTransform {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	/// World origin at the viewport center, unscaled.
	pub fn centered(viewport: Viewport) -> Self {
		Self {
			x: viewport.width / 2.0,
			y: viewport.height / 2.0,
			k: 1.0,
		}
	}

	/// World point to screen.
	pub fn apply(&self, world: Point) -> Point {
		Point::new(world.x * self.k + self.x, world.y * self.k + self.y)
	}

	/// Screen point to world.
	pub fn invert(&self, screen: Point) -> Point {
		Point::new((screen.x - self.x) / self.k, (screen.y - self.y) / self.k)
	}

	/// Rescale to `k` while keeping the screen point `anchor` over the same
	/// world point.
	fn scaled_about(&self, k: f64, anchor: Point) -> Self {
		let world = self.invert(anchor);
		Self {
			x: anchor.x - world.x * k,
			y: anchor.y - world.y * k,
			k,
		}
	}

	fn lerp(&self, to: &Self, t: f64) -> Self {
		Self {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::centered(Viewport::default())
	}
}

fn ease_cubic_in_out(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

#[derive(Clone, Debug, PartialEq)]
struct Transition {
	from: ViewTransform,
	to: ViewTransform,
	elapsed_ms: f64,
	duration_ms: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// Current transform plus any transition in flight.
pub struct Camera {
	current: ViewTransform,
	transition: Option<Transition>,
	extent: ZoomExtent,
}

impl Camera {
	/// Camera centred on the world origin in `viewport`.
	pub fn new(extent: ZoomExtent, viewport: Viewport) -> Self {
		Self {
			current: ViewTransform::centered(viewport),
			transition: None,
			extent,
		}
	}

	/// Transform to draw with this frame.
	pub fn transform(&self) -> ViewTransform {
		self.current
	}

	/// Where the camera is heading, or where it is when idle.
	pub fn target(&self) -> ViewTransform {
		self.transition.as_ref().map_or(self.current, |t| t.to)
	}

	/// Current scale.
	pub fn scale(&self) -> f64 {
		self.current.k
	}

	/// Whether a transition is still running.
	pub fn is_animating(&self) -> bool {
		self.transition.is_some()
	}

	/// Screen point to world, under the current transform.
	pub fn screen_to_world(&self, screen: Point) -> Point {
		self.current.invert(screen)
	}

	/// World point to screen, under the current transform.
	pub fn world_to_screen(&self, world: Point) -> Point {
		self.current.apply(world)
	}

	/// On-screen anchor for a world point together with the current scale.
	pub fn screen_position(&self, world: Point) -> (Point, f64) {
		(self.current.apply(world), self.current.k)
	}

	fn clamp_scale(&self, k: f64) -> f64 {
		k.clamp(self.extent.min_scale, self.extent.max_scale)
	}

	/// Jump without animating. The scale is clamped to the zoom extent.
	pub fn set_transform(&mut self, transform: ViewTransform) {
		self.transition = None;
		self.current = ViewTransform {
			k: self.clamp_scale(transform.k),
			..transform
		};
	}

	/// Animate to `to` over `duration_ms`; zero or negative jumps.
	pub fn animate_to(&mut self, to: ViewTransform, duration_ms: f64) {
		let to = ViewTransform {
			k: self.clamp_scale(to.k),
			..to
		};
		if duration_ms <= 0.0 {
			self.set_transform(to);
			return;
		}
		self.transition = Some(Transition {
			from: self.current,
			to,
			elapsed_ms: 0.0,
			duration_ms,
		});
	}

	/// Multiply the target scale by `factor`, keeping the viewport center
	/// fixed.
	pub fn zoom_by(&mut self, factor: f64, viewport: Viewport, duration_ms: f64) {
		let base = self.target();
		let k = self.clamp_scale(base.k * factor);
		self.animate_to(base.scaled_about(k, viewport.center()), duration_ms);
	}

	/// Immediate zoom about a screen point, as for the mouse wheel.
	pub fn zoom_at(&mut self, factor: f64, anchor: Point) {
		let k = self.clamp_scale(self.current.k * factor);
		let next = self.current.scaled_about(k, anchor);
		self.set_transform(next);
	}

	/// Shift by a screen-space delta. Interrupts any running transition.
	pub fn pan(&mut self, dx: f64, dy: f64) {
		let next = ViewTransform {
			x: self.current.x + dx,
			y: self.current.y + dy,
			k: self.current.k,
		};
		self.set_transform(next);
	}

	/// Transform that puts `world` at the viewport center at scale 1.
	pub fn focus_transform(world: Point, viewport: Viewport) -> ViewTransform {
		ViewTransform {
			x: viewport.width / 2.0 - world.x,
			y: viewport.height / 2.0 - world.y,
			k: 1.0,
		}
	}

	/// Glide so `world` lands in the viewport centre at scale 1.
	pub fn focus_on(&mut self, world: Point, viewport: Viewport, duration_ms: f64) {
		self.animate_to(Self::focus_transform(world, viewport), duration_ms);
	}

	/// Advance the running transition. Returns whether the camera moved.
	pub fn tick(&mut self, dt_ms: f64) -> bool {
		let Some(transition) = self.transition.as_mut() else {
			return false;
		};
		transition.elapsed_ms += dt_ms;
		let t = (transition.elapsed_ms / transition.duration_ms).min(1.0);
		self.current = transition.from.lerp(&transition.to, ease_cubic_in_out(t));
		if t >= 1.0 {
			self.current = transition.to;
			self.transition = None;
		}
		true
	}

	/// Skip to the end of any running transition.
	pub fn finish(&mut self) {
		if let Some(transition) = self.transition.take() {
			self.current = transition.to;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn camera() -> Camera {
		Camera::new(ZoomExtent::default(), Viewport::new(800.0, 600.0))
	}

	#[test]
	fn starts_with_origin_at_viewport_center() {
		let cam = camera();
		assert_eq!(cam.world_to_screen(Point::ORIGIN), Point::new(400.0, 300.0));
		assert_eq!(cam.screen_to_world(Point::new(400.0, 300.0)), Point::ORIGIN);
	}

	#[test]
	fn button_zoom_keeps_the_center_fixed() {
		let viewport = Viewport::new(800.0, 600.0);
		let mut cam = camera();
		cam.pan(-120.0, 35.0);
		let before = cam.screen_to_world(viewport.center());
		cam.zoom_by(1.3, viewport, 250.0);
		assert!(cam.is_animating());
		cam.tick(100.0);
		assert!(cam.is_animating());
		cam.tick(200.0);
		assert!(!cam.is_animating());

		assert!((cam.scale() - 1.3).abs() < 1e-12);
		let after = cam.screen_to_world(viewport.center());
		assert!(before.distance(after) < 1e-9);
	}

	#[test]
	fn repeated_presses_compound_on_the_target() {
		let viewport = Viewport::new(800.0, 600.0);
		let mut cam = camera();
		cam.zoom_by(1.3, viewport, 250.0);
		cam.zoom_by(1.3, viewport, 250.0);
		cam.finish();
		assert!((cam.scale() - 1.69).abs() < 1e-12);
	}

	#[test]
	fn scale_is_clamped() {
		let viewport = Viewport::default();
		let mut cam = camera();
		for _ in 0..40 {
			cam.zoom_by(1.3, viewport, 0.0);
		}
		assert_eq!(cam.scale(), 4.0);
		for _ in 0..40 {
			cam.zoom_at(0.7, Point::new(10.0, 10.0));
		}
		assert_eq!(cam.scale(), 0.1);
	}

	#[test]
	fn wheel_zoom_keeps_the_cursor_over_the_same_world_point() {
		let mut cam = camera();
		let cursor = Point::new(612.0, 140.0);
		let world = cam.screen_to_world(cursor);
		cam.zoom_at(1.1, cursor);
		assert!(cam.world_to_screen(world).distance(cursor) < 1e-9);
	}

	#[test]
	fn focus_centers_the_point_at_unit_scale() {
		let viewport = Viewport::new(1000.0, 700.0);
		let mut cam = camera();
		cam.zoom_at(2.5, Point::ORIGIN);
		let member = Point::new(-200.0, 80.0);
		cam.focus_on(member, viewport, 550.0);
		cam.tick(275.0);
		let midway = cam.transform();
		assert!(midway.k < 2.5 && midway.k > 1.0);
		cam.tick(275.0);
		assert_eq!(cam.transform(), ViewTransform { x: 700.0, y: 270.0, k: 1.0 });
		assert_eq!(cam.world_to_screen(member), viewport.center());
	}

	#[test]
	fn new_transition_overrides_the_previous_target() {
		let viewport = Viewport::new(800.0, 600.0);
		let mut cam = camera();
		cam.focus_on(Point::new(100.0, 0.0), viewport, 500.0);
		cam.tick(100.0);
		cam.focus_on(Point::new(-50.0, 20.0), viewport, 500.0);
		cam.finish();
		assert_eq!(cam.world_to_screen(Point::new(-50.0, 20.0)), viewport.center());
	}

	#[test]
	fn easing_hits_both_ends() {
		assert_eq!(ease_cubic_in_out(0.0), 0.0);
		assert_eq!(ease_cubic_in_out(1.0), 1.0);
		assert!((ease_cubic_in_out(0.5) - 0.5).abs() < 1e-12);
	}
}
