use leptos::prelude::*;

use crate::chart::Tooltip;

/// Hover card positioned over the canvas.
#[component]
pub fn TooltipCard(tooltip: ReadSignal<Option<Tooltip>>) -> impl IntoView {
	move || {
		tooltip.get().map(|card| {
			let style = format!("left: {}px; top: {}px;", card.position.x, card.position.y);
			let rows = card
				.content
				.rows
				.into_iter()
				.map(|(label, value)| view! { <div>{format!("{label}: {value}")}</div> })
				.collect_view();
			view! {
				<div class="tooltip show" style=style>
					<div class="tooltip-title">{card.content.title}</div>
					<div class="tooltip-info">{rows}</div>
				</div>
			}
		})
	}
}
