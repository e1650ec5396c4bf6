use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::chart::{Command, DatasetStats, LayoutMode};
use crate::components::family_chart::ChartStatus;

fn layout_label(mode: LayoutMode) -> &'static str {
	match mode {
		LayoutMode::Tree => "树形布局",
		LayoutMode::Radial => "径向布局",
		LayoutMode::Force => "力导向布局",
	}
}

/// Search, layout and display controls plus the dataset stats.
#[component]
pub fn SidePanel(
	stats: DatasetStats,
	status: ReadSignal<ChartStatus>,
	send: WriteSignal<Option<Command>>,
) -> impl IntoView {
	let emit = move |cmd: Command| send.set(Some(cmd));
	let search_box = NodeRef::<leptos::html::Div>::new();

	// A click anywhere outside the search box hides the results.
	let outside_click = window_event_listener(ev::click, move |ev| {
		if !status.with_untracked(|s| s.results.is_some()) {
			return;
		}
		let target = ev.target().and_then(|t| t.dyn_into::<web_sys::Node>().ok());
		let inside = match (search_box.get_untracked(), target) {
			(Some(container), Some(node)) => container.contains(Some(&node)),
			_ => false,
		};
		if !inside {
			emit(Command::CloseSearchResults);
		}
	});
	on_cleanup(move || outside_click.remove());

	let results = move || {
		let hits = status.with(|s| s.results.clone())?;
		let body = if hits.is_empty() {
			view! { <div class="search-result-item">"没有找到匹配的成员"</div> }.into_any()
		} else {
			hits.into_iter()
				.map(|hit| {
					let id = hit.id;
					view! {
						<div
							class="search-result-item"
							on:click=move |_| emit(Command::PickSearchResult(id))
						>
							<span class="avatar">{hit.avatar}</span>
							<div>
								<div class="name">{hit.name}</div>
								<small>{hit.detail}</small>
							</div>
						</div>
					}
				})
				.collect_view()
				.into_any()
		};
		Some(view! { <div class="search-results active">{body}</div> })
	};

	let layout_buttons = LayoutMode::ALL
		.into_iter()
		.map(|mode| {
			view! {
				<button
					class="layout-btn"
					class:active=move || status.with(|s| s.layout == mode)
					data-layout=mode.as_str()
					on:click=move |_| emit(Command::SetLayout(mode))
				>
					{layout_label(mode)}
				</button>
			}
		})
		.collect_view();

	view! {
		<aside class="sidebar" class:open=move || status.with(|s| s.panel_open)>
			<h2>"家族图谱"</h2>

			<div class="search-container" node_ref=search_box>
				<input
					type="text"
					placeholder="搜索成员..."
					prop:value=move || status.with(|s| s.query.clone())
					on:input=move |ev| emit(Command::Search(event_target_value(&ev)))
					on:focus=move |ev| emit(Command::Search(event_target_value(&ev)))
				/>
				{results}
			</div>

			<div class="controls">
				<button on:click=move |_| emit(Command::ZoomIn)>"放大"</button>
				<button on:click=move |_| emit(Command::ZoomOut)>"缩小"</button>
				<button on:click=move |_| emit(Command::Reset)>"重置"</button>
			</div>

			<div class="layouts">{layout_buttons}</div>

			<div class="display-options">
				<button
					class:active=move || status.with(|s| s.display.show_labels)
					on:click=move |_| {
						emit(Command::ShowLabels(!status.with_untracked(|s| s.display.show_labels)))
					}
				>
					"显示标签"
				</button>
				<button
					class:active=move || status.with(|s| s.display.show_images)
					on:click=move |_| {
						emit(Command::ShowImages(!status.with_untracked(|s| s.display.show_images)))
					}
				>
					"显示头像"
				</button>
				<button
					class:active=move || status.with(|s| s.display.animate)
					on:click=move |_| {
						emit(Command::Animate(!status.with_untracked(|s| s.display.animate)))
					}
				>
					"动画效果"
				</button>
			</div>

			<div class="stats">
				<div class="stat">
					<span class="stat-value">{stats.total_members}</span>
					<span class="stat-label">"成员总数"</span>
				</div>
				<div class="stat">
					<span class="stat-value">{stats.generations}</span>
					<span class="stat-label">"世代数"</span>
				</div>
				<div class="stat">
					<span class="stat-value">{stats.families}</span>
					<span class="stat-label">"家庭数"</span>
				</div>
			</div>
		</aside>
	}
}
