//! Owns the dataset, the view state and the active layout engine, and turns
//! user intents into state transitions followed by a re-render.

use std::rc::Rc;

use log::{debug, info, warn};

use super::camera::Camera;
use super::config::ChartConfig;
use super::error::{ChartError, Result};
use super::geometry::{Point, Viewport};
use super::layout::{ChartLayout, LayoutEngine, LayoutMode, engine_for};
use super::model::{Dataset, DatasetStats, PersonId};
use super::scene::{Fade, Scene};
use super::search::SearchResults;
use super::tooltip::{Tooltip, TooltipContent, place_tooltip};
use super::view::ViewState;

/// Pointer travel, in screen pixels, below which a press counts as a click.
const CLICK_SLOP: f64 = 3.0;
const WHEEL_ZOOM_IN: f64 = 1.1;
const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Intents raised by the side panel and toolbar.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
	/// Update the search box text.
	Search(String),
	/// A row of the search results was picked.
	PickSearchResult(PersonId),
	/// Zoom in by the configured step.
	ZoomIn,
	/// Zoom out by the configured step.
	ZoomOut,
	/// Clear search and tooltip, focus the default member.
	Reset,
	/// Switch engines.
	SetLayout(LayoutMode),
	/// Toggle name labels.
	ShowLabels(bool),
	/// Toggle avatars.
	ShowImages(bool),
	/// Toggle the fade-in on renders.
	Animate(bool),
	/// Open or close the side panel.
	TogglePanel,
	/// Hide the results list but keep the query, as on a click elsewhere.
	CloseSearchResults,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Gesture {
	#[default]
	Idle,
	Pan {
		start: Point,
		last: Point,
	},
	/// Pressed on a node. Once it moves this drags the node in force mode
	/// and pans everywhere else.
	Press {
		id: PersonId,
		placement: usize,
		start: Point,
		moved: bool,
	},
}

/// The member whose tooltip is up. `placement` picks one copy of a member
/// drawn more than once; without it the first copy is used.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Hover {
	id: PersonId,
	placement: Option<usize>,
}

impl Hover {
	fn first(id: PersonId) -> Self {
		Self {
			id,
			placement: None,
		}
	}
}

/// Owns everything the canvas shows and applies user intents to it.
pub struct ChartController {
	dataset: Rc<Dataset>,
	config: ChartConfig,
	view: ViewState,
	viewport: Viewport,
	engine: Box<dyn LayoutEngine>,
	layout: Option<ChartLayout>,
	query: String,
	results_open: bool,
	hovered: Option<Hover>,
	/// Tooltip to show once the running camera transition lands.
	pending_tooltip: Option<PersonId>,
	render_epoch: u64,
	last_error: Option<ChartError>,
	gesture: Gesture,
	panel_open: bool,
	fade_elapsed: Option<f64>,
}

impl ChartController {
	/// Lay the dataset out and focus the configured default member.
	pub fn new(dataset: Rc<Dataset>, config: ChartConfig, viewport: Viewport) -> Self {
		let view = ViewState::new(Camera::new(config.zoom.clone(), viewport));
		let engine = engine_for(view.layout, &config);
		let mut controller = Self {
			panel_open: viewport.width >= config.narrow_viewport,
			dataset,
			config,
			view,
			viewport,
			engine,
			layout: None,
			query: String::new(),
			results_open: false,
			hovered: None,
			pending_tooltip: None,
			render_epoch: 0,
			last_error: None,
			gesture: Gesture::Idle,
			fade_elapsed: None,
		};
		controller.render();
		let focus = controller.config.default_focus;
		if let Err(err) = controller.select_and_focus(focus) {
			warn!("default focus unavailable: {err}");
		}
		info!(
			"chart ready: {} members, {} layout",
			controller.dataset.len(),
			controller.view.layout
		);
		controller
	}

	/// The loaded family.
	pub fn dataset(&self) -> &Rc<Dataset> {
		&self.dataset
	}

	/// Settings in effect.
	pub fn config(&self) -> &ChartConfig {
		&self.config
	}

	/// Selection, layout, toggles and camera.
	pub fn view(&self) -> &ViewState {
		&self.view
	}

	/// Canvas size in pixels.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// Most recent successful layout pass.
	pub fn layout(&self) -> Option<&ChartLayout> {
		self.layout.as_ref()
	}

	/// Number of successful renders so far.
	pub fn render_epoch(&self) -> u64 {
		self.render_epoch
	}

	/// Failure of the most recent layout pass, cleared by the next success.
	pub fn last_error(&self) -> Option<&ChartError> {
		self.last_error.as_ref()
	}

	/// Current search box text.
	pub fn query(&self) -> &str {
		&self.query
	}

	/// Whether the results list under the search box is showing.
	pub fn results_open(&self) -> bool {
		self.results_open && !self.query.is_empty()
	}

	/// Whether the side panel is showing.
	pub fn panel_open(&self) -> bool {
		self.panel_open
	}

	/// Figures for the stats panel.
	pub fn stats(&self) -> DatasetStats {
		self.dataset.stats()
	}

	/// Full layout pass for the current mode. On failure the previous
	/// layout stays on screen.
	fn render(&mut self) -> bool {
		match self.engine.layout(&self.dataset, self.viewport) {
			Ok(layout) => {
				self.render_epoch += 1;
				debug!(
					"render #{}: {} layout with {} nodes",
					self.render_epoch,
					layout.mode,
					layout.nodes.len()
				);
				self.layout = Some(layout);
				self.last_error = None;
				self.fade_elapsed = self.view.display.animate.then_some(0.0);
				true
			}
			Err(err) => {
				warn!("{} layout failed: {err}", self.view.layout);
				self.last_error = Some(err);
				false
			}
		}
	}

	/// Apply a side panel command.
	pub fn apply(&mut self, command: Command) -> Result<()> {
		match command {
			Command::Search(query) => self.search(&query),
			Command::PickSearchResult(id) => return self.pick_search_result(id),
			Command::ZoomIn => self.zoom_in(),
			Command::ZoomOut => self.zoom_out(),
			Command::Reset => return self.reset(),
			Command::SetLayout(mode) => self.set_layout(mode),
			Command::ShowLabels(on) => self.set_show_labels(on),
			Command::ShowImages(on) => self.set_show_images(on),
			Command::Animate(on) => self.set_animate(on),
			Command::TogglePanel => self.toggle_panel(),
			Command::CloseSearchResults => self.close_search_results(),
		}
		Ok(())
	}

	/// Set the search text and show the results list.
	pub fn search(&mut self, query: &str) {
		self.query = query.to_string();
		self.results_open = true;
	}

	/// Hide the results list. The query stays.
	pub fn close_search_results(&mut self) {
		self.results_open = false;
	}

	/// Matches for the current query.
	pub fn search_results(&self) -> SearchResults<'_> {
		SearchResults::new(&self.dataset, &self.query)
	}

	/// Select `id`, re-render and glide the camera onto it at scale 1.
	///
	/// Force layouts have no stable position to aim at, so there the
	/// selection is applied without moving the camera.
	pub fn select_and_focus(&mut self, id: PersonId) -> Result<()> {
		if !self.dataset.contains(id) {
			return Err(ChartError::NodeNotFound(id));
		}
		self.view.selected = Some(id);
		self.render();
		if !self.view.layout.supports_focus() {
			debug!("{} layout cannot focus, selection only", self.view.layout);
			return Ok(());
		}
		match self.layout.as_ref().and_then(|l| l.position_of(id)) {
			Some(target) => {
				self.view
					.camera
					.focus_on(target, self.viewport, self.config.animation.focus_ms);
			}
			None => debug!("member {id} is not placed in the current layout"),
		}
		Ok(())
	}

	fn pick_search_result(&mut self, id: PersonId) -> Result<()> {
		self.select_and_focus(id)?;
		self.hovered = None;
		self.pending_tooltip = Some(id);
		if self.viewport.width < self.config.narrow_viewport {
			self.panel_open = false;
		}
		Ok(())
	}

	/// Select without moving the camera, as when a node is clicked.
	pub fn click(&mut self, id: PersonId) -> Result<()> {
		if !self.dataset.contains(id) {
			return Err(ChartError::NodeNotFound(id));
		}
		self.view.selected = Some(id);
		self.render();
		self.query.clear();
		self.pending_tooltip = None;
		self.hovered = Some(Hover::first(id));
		Ok(())
	}

	/// Zoom in about the viewport centre.
	pub fn zoom_in(&mut self) {
		let factor = self.config.zoom.zoom_in_factor;
		self.zoom_by(factor);
	}

	/// Zoom out about the viewport centre.
	pub fn zoom_out(&mut self) {
		let factor = self.config.zoom.zoom_out_factor;
		self.zoom_by(factor);
	}

	/// Eased zoom about the viewport centre, compounding on a running zoom.
	pub fn zoom_by(&mut self, factor: f64) {
		self.view
			.camera
			.zoom_by(factor, self.viewport, self.config.animation.zoom_ms);
	}

	/// Wheel zoom about the cursor. Positive `delta_y` zooms out.
	pub fn wheel(&mut self, at: Point, delta_y: f64) {
		let factor = if delta_y > 0.0 {
			WHEEL_ZOOM_OUT
		} else {
			WHEEL_ZOOM_IN
		};
		self.view.camera.zoom_at(factor, at);
	}

	/// Move the view by a screen-space offset.
	pub fn pan(&mut self, dx: f64, dy: f64) {
		self.view.camera.pan(dx, dy);
	}

	/// Clear search and tooltip, then focus the default member again.
	pub fn reset(&mut self) -> Result<()> {
		self.leave();
		self.pending_tooltip = None;
		self.query.clear();
		self.select_and_focus(self.config.default_focus)
	}

	/// Switch to `mode` and lay the dataset out again.
	pub fn set_layout(&mut self, mode: LayoutMode) {
		self.end_gesture();
		self.view.layout = mode;
		self.engine = engine_for(mode, &self.config);
		self.hovered = None;
		self.pending_tooltip = None;
		self.render();
	}

	/// Show or hide name labels.
	pub fn set_show_labels(&mut self, on: bool) {
		self.view.display.show_labels = on;
		self.render();
	}

	/// Show or hide avatars.
	pub fn set_show_images(&mut self, on: bool) {
		self.view.display.show_images = on;
		self.render();
	}

	/// Turn the fade-in on renders on or off.
	pub fn set_animate(&mut self, on: bool) {
		self.view.display.animate = on;
		self.render();
	}

	/// Open or close the side panel.
	pub fn toggle_panel(&mut self) {
		self.panel_open = !self.panel_open;
	}

	/// New canvas size. Re-renders when the size changed.
	pub fn resize(&mut self, viewport: Viewport) {
		if viewport == self.viewport {
			return;
		}
		self.viewport = viewport;
		self.render();
	}

	/// Show the tooltip for `id` at its first placement.
	pub fn hover(&mut self, id: PersonId) {
		if self.dataset.contains(id) {
			self.hovered = Some(Hover::first(id));
			self.pending_tooltip = None;
		}
	}

	fn hover_placement(&mut self, placement: usize) {
		let Some(id) = self
			.layout
			.as_ref()
			.and_then(|l| l.nodes.get(placement))
			.map(|n| n.id)
		else {
			return;
		};
		let hover = Hover {
			id,
			placement: Some(placement),
		};
		if self.hovered != Some(hover) {
			self.hovered = Some(hover);
			self.pending_tooltip = None;
		}
	}

	/// Hide the tooltip.
	pub fn leave(&mut self) {
		self.hovered = None;
	}

	/// Tooltip for the hovered member, anchored to the copy under the
	/// pointer where it is drawn now.
	pub fn tooltip(&self) -> Option<Tooltip> {
		let hover = self.hovered?;
		let person = self.dataset.person(hover.id)?;
		let layout = self.layout.as_ref()?;
		let node = hover
			.placement
			.and_then(|i| layout.nodes.get(i))
			.filter(|n| n.id == hover.id)
			.or_else(|| layout.node(hover.id))?;
		let (anchor, k) = self.view.camera.screen_position(node.position);
		Some(Tooltip {
			content: TooltipContent::for_person(person),
			position: place_tooltip(anchor, node.radius, k, self.viewport, &self.config.tooltip),
		})
	}

	/// Topmost member drawn under a screen point.
	pub fn node_at(&self, screen: Point) -> Option<PersonId> {
		let world = self.view.camera.screen_to_world(screen);
		self.layout.as_ref()?.node_at(world).map(|n| n.id)
	}

	fn placement_at(&self, screen: Point) -> Option<(usize, PersonId)> {
		let world = self.view.camera.screen_to_world(screen);
		let layout = self.layout.as_ref()?;
		let i = layout.placement_at(world)?;
		Some((i, layout.nodes[i].id))
	}

	/// Mouse button pressed at a screen point.
	pub fn pointer_down(&mut self, at: Point) {
		self.gesture = match self.placement_at(at) {
			Some((placement, id)) => Gesture::Press {
				id,
				placement,
				start: at,
				moved: false,
			},
			None => Gesture::Pan {
				start: at,
				last: at,
			},
		};
	}

	/// Pointer moved: hover, pan or drag depending on the gesture.
	pub fn pointer_move(&mut self, at: Point) {
		match self.gesture {
			Gesture::Idle => match self.placement_at(at) {
				Some((placement, _)) => self.hover_placement(placement),
				None => self.leave(),
			},
			Gesture::Pan { start, last } => {
				self.pan(at.x - last.x, at.y - last.y);
				self.gesture = Gesture::Pan { start, last: at };
			}
			Gesture::Press {
				id,
				placement,
				start,
				moved,
			} => {
				let moved = moved || start.distance(at) > CLICK_SLOP;
				if !moved {
					return;
				}
				if self.view.layout == LayoutMode::Force {
					let world = self.view.camera.screen_to_world(at);
					self.engine.drag(id, world);
					self.gesture = Gesture::Press {
						id,
						placement,
						start,
						moved,
					};
				} else {
					self.pan(at.x - start.x, at.y - start.y);
					self.gesture = Gesture::Pan { start, last: at };
				}
			}
		}
	}

	/// Mouse button released. A press that barely moved clicks the node.
	pub fn pointer_up(&mut self, at: Point) {
		let gesture = std::mem::take(&mut self.gesture);
		if let Gesture::Press {
			id,
			placement,
			start,
			moved,
		} = gesture
		{
			self.engine.release(id);
			if !moved && start.distance(at) <= CLICK_SLOP {
				match self.click(id) {
					Ok(()) => {
						self.hovered = Some(Hover {
							id,
							placement: Some(placement),
						})
					}
					Err(err) => debug!("click ignored: {err}"),
				}
			}
		}
	}

	/// Pointer left the canvas: drop any gesture and hide the tooltip.
	pub fn pointer_leave(&mut self) {
		self.end_gesture();
		self.leave();
	}

	fn end_gesture(&mut self) {
		if let Gesture::Press { id, .. } = std::mem::take(&mut self.gesture) {
			self.engine.release(id);
		}
	}

	/// Advance camera transitions, fades and the force simulation.
	/// Returns whether anything changed on screen.
	pub fn tick(&mut self, dt_ms: f64) -> bool {
		let mut dirty = self.view.camera.tick(dt_ms);

		if let Some(layout) = self.engine.step(dt_ms) {
			self.layout = Some(layout);
			dirty = true;
		}

		if let Some(elapsed) = self.fade_elapsed.as_mut() {
			*elapsed += dt_ms;
			let count = self
				.layout
				.as_ref()
				.map_or(0, |l| l.nodes.len().max(l.links.len()));
			let fade = Fade {
				elapsed_ms: *elapsed,
				timing: &self.config.animation,
			};
			if fade.is_done(count) {
				self.fade_elapsed = None;
			}
			dirty = true;
		}

		if self.pending_tooltip.is_some() && !self.view.camera.is_animating() {
			self.hovered = self.pending_tooltip.take().map(Hover::first);
			dirty = true;
		}
		dirty
	}

	/// Drawables for the current state, or `None` before the first
	/// successful layout.
	pub fn scene(&self) -> Option<Scene> {
		let layout = self.layout.as_ref()?;
		Some(Scene::build(
			self.render_epoch,
			&self.dataset,
			layout,
			&self.view,
			&self.config.animation,
			self.fade_elapsed,
		))
	}
}
