//! Selection and display state the chart is drawn with.

use super::camera::Camera;
use super::layout::LayoutMode;
use super::model::PersonId;

/// Drawing toggles exposed as checkboxes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayOptions {
	/// Draw the name under each node.
	pub show_labels: bool,
	/// Draw the avatar glyph inside each node.
	pub show_images: bool,
	/// Fade fresh renders in instead of drawing them at once.
	pub animate: bool,
}

impl Default for DisplayOptions {
	fn default() -> Self {
		Self {
			show_labels: true,
			show_images: true,
			animate: false,
		}
	}
}

/// Everything about the chart that changes while the dataset does not.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
	/// Member whose node and edges are highlighted.
	pub selected: Option<PersonId>,
	/// Active layout mode.
	pub layout: LayoutMode,
	/// Drawing toggles.
	pub display: DisplayOptions,
	/// Pan/zoom state.
	pub camera: Camera,
}

impl ViewState {
	/// Fresh state: nothing selected, tree layout, default toggles.
	pub fn new(camera: Camera) -> Self {
		Self {
			selected: None,
			layout: LayoutMode::default(),
			display: DisplayOptions::default(),
			camera,
		}
	}

	/// Whether `id` is the selected member.
	pub fn is_selected(&self, id: PersonId) -> bool {
		self.selected == Some(id)
	}
}
