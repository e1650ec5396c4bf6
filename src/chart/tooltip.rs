//! Hover card content and placement.

use super::config::TooltipConfig;
use super::geometry::{Point, Viewport};
use super::model::Person;

const UNKNOWN: &str = "未知";

#[derive(Clone, Debug, PartialEq)]
/// Text shown in the hover card.
pub struct TooltipContent {
	/// The member's name.
	pub title: String,
	/// Label/value rows in display order.
	pub rows: Vec<(String, String)>,
}

impl TooltipContent {
	/// Rows for `person`, with missing years and occupation shown as unknown.
	pub fn for_person(person: &Person) -> Self {
		let mut rows = vec![(
			"出生年份".to_string(),
			person
				.birth
				.map_or_else(|| UNKNOWN.to_string(), |y| y.to_string()),
		)];
		if let Some(death) = person.death {
			rows.push(("逝世年份".into(), death.to_string()));
		}
		rows.push((
			"职业".into(),
			person
				.occupation
				.as_deref()
				.filter(|o| !o.is_empty())
				.unwrap_or(UNKNOWN)
				.to_string(),
		));
		rows.push(("世代".into(), format!("第{}代", person.generation)));
		Self {
			title: person.name.clone(),
			rows,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
/// A placed hover card.
pub struct Tooltip {
	/// What the card says.
	pub content: TooltipContent,
	/// Top-left corner in viewport pixels.
	pub position: Point,
}

/// Top-left corner for a tooltip next to a node drawn at `anchor` (screen
/// space) with world radius `radius`, at zoom `k`.
///
/// Prefers the right of the node, slightly raised; flips left or up when it
/// would overflow. The result is then kept inside the viewport with the
/// configured margin on every edge. When the viewport is too small for the
/// card, the left and top edges win.
pub fn place_tooltip(
	anchor: Point,
	radius: f64,
	k: f64,
	viewport: Viewport,
	config: &TooltipConfig,
) -> Point {
	let r = radius * k;
	let mut x = anchor.x + r + config.gap * k;
	let mut y = anchor.y - r - config.lift * k;

	if x + config.width > viewport.width {
		x = anchor.x - r - config.width - config.gap;
	}
	if y + config.height > viewport.height {
		y = anchor.y - config.height - config.gap;
	}

	let right = viewport.width - config.width - config.margin;
	let bottom = viewport.height - config.height - config.margin;
	Point::new(
		x.min(right).max(config.margin),
		y.min(bottom).max(config.margin),
	)
}
