use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use crate::chart::{
	ChartConfig, ChartController, Command, Dataset, DisplayOptions, LayoutMode, Person, PersonId,
	Point, Tooltip, Viewport,
};
use crate::components::side_panel::SidePanel;
use crate::components::tooltip::TooltipCard;

/// One row of the search results list.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchHit {
	pub id: PersonId,
	pub name: String,
	pub avatar: String,
	/// Occupation and generation, e.g. `学者 · 第1代`.
	pub detail: String,
}

impl SearchHit {
	fn of(person: &Person) -> Self {
		Self {
			id: person.id,
			name: person.name.clone(),
			avatar: person.avatar.clone(),
			detail: format!(
				"{} · 第{}代",
				person.occupation.as_deref().unwrap_or("未知"),
				person.generation
			),
		}
	}
}

/// What the DOM around the canvas needs to know about the controller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartStatus {
	pub query: String,
	/// Rows under the search box, `None` while the list is hidden.
	pub results: Option<Vec<SearchHit>>,
	pub panel_open: bool,
	pub layout: LayoutMode,
	pub display: DisplayOptions,
	pub selected: Option<PersonId>,
	pub error: Option<String>,
}

impl ChartStatus {
	fn of(chart: &ChartController) -> Self {
		Self {
			query: chart.query().to_string(),
			results: chart
				.results_open()
				.then(|| chart.search_results().map(SearchHit::of).collect()),
			panel_open: chart.panel_open(),
			layout: chart.view().layout,
			display: chart.view().display,
			selected: chart.view().selected,
			error: chart.last_error().map(ToString::to_string),
		}
	}
}

type Shared<T> = Rc<RefCell<Option<T>>>;

fn publish(
	chart: &ChartController,
	status: RwSignal<ChartStatus>,
	tooltip: RwSignal<Option<Tooltip>>,
) {
	let next = ChartStatus::of(chart);
	if status.with_untracked(|s| s != &next) {
		status.set(next);
	}
	let card = chart.tooltip();
	if tooltip.with_untracked(|t| t != &card) {
		tooltip.set(card);
	}
}

fn container_size(canvas: &HtmlCanvasElement) -> Viewport {
	let fallback = Viewport::default();
	canvas
		.parent_element()
		.map(|p| Viewport::new(p.client_width() as f64, p.client_height() as f64))
		.filter(|v| v.width > 0.0 && v.height > 0.0)
		.unwrap_or(fallback)
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some(Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
pub fn FamilyChart(dataset: Rc<Dataset>, config: ChartConfig) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let chart: Shared<ChartController> = Rc::new(RefCell::new(None));
	let animate: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let resize_cb: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let status = RwSignal::new(ChartStatus::default());
	let tooltip = RwSignal::new(None::<Tooltip>);
	let (command, send_command) = signal(None::<Command>);

	let (chart_init, animate_init, resize_cb_init) =
		(chart.clone(), animate.clone(), resize_cb.clone());
	let stats = dataset.stats();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::error!("canvas 2d context unavailable");
			return;
		};

		let viewport = container_size(&canvas);
		canvas.set_width(viewport.width as u32);
		canvas.set_height(viewport.height as u32);
		let controller = ChartController::new(dataset.clone(), config.clone(), viewport);
		publish(&controller, status, tooltip);
		*chart_init.borrow_mut() = Some(controller);

		let (chart_resize, canvas_resize) = (chart_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let viewport = container_size(&canvas_resize);
			canvas_resize.set_width(viewport.width as u32);
			canvas_resize.set_height(viewport.height as u32);
			if let Some(ref mut c) = *chart_resize.borrow_mut() {
				c.resize(viewport);
				publish(c, status, tooltip);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (chart_anim, animate_inner) = (chart_init.clone(), animate_init.clone());
		let mut last_frame = js_sys::Date::now();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let now = js_sys::Date::now();
			let dt = (now - last_frame).min(100.0);
			last_frame = now;
			if let Some(ref mut c) = *chart_anim.borrow_mut() {
				if c.tick(dt) {
					publish(c, status, tooltip);
				}
				render::render(
					c.scene().as_ref(),
					c.view().camera.transform(),
					c.viewport(),
					&ctx,
				);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let chart_cmd = chart.clone();
	Effect::new(move |_| {
		let Some(cmd) = command.get() else {
			return;
		};
		if let Some(ref mut c) = *chart_cmd.borrow_mut() {
			if let Err(err) = c.apply(cmd) {
				debug!("command ignored: {err}");
			}
			publish(c, status, tooltip);
		}
	});

	let chart_md = chart.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(at) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *chart_md.borrow_mut() {
			c.pointer_down(at);
		}
	};

	let chart_mm = chart.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(at) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *chart_mm.borrow_mut() {
			c.pointer_move(at);
			publish(c, status, tooltip);
		}
	};

	let chart_mu = chart.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some(at) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *chart_mu.borrow_mut() {
			c.pointer_up(at);
			publish(c, status, tooltip);
		}
	};

	let chart_ml = chart.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *chart_ml.borrow_mut() {
			c.pointer_leave();
			publish(c, status, tooltip);
		}
	};

	let chart_wh = chart.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(at) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *chart_wh.borrow_mut() {
			c.wheel(at, ev.delta_y());
			publish(c, status, tooltip);
		}
	};

	let cursor = move || match status.with(|s| s.layout) {
		LayoutMode::Force => "display: block; cursor: grab;",
		_ => "display: block; cursor: default;",
	};

	view! {
		<div class="family-chart">
			<SidePanel stats=stats status=status.read_only() send=send_command />
			<div class="main-content">
				<button
					class="panel-toggle"
					on:click=move |_| send_command.set(Some(Command::TogglePanel))
				>
					"☰"
				</button>
				<canvas
					node_ref=canvas_ref
					class="family-chart-canvas"
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouseup
					on:mouseleave=on_mouseleave
					on:wheel=on_wheel
					style=cursor
				/>
				<TooltipCard tooltip=tooltip.read_only() />
				{move || {
					status
						.with(|s| s.error.clone())
						.map(|msg| view! { <div class="chart-error">{msg}</div> })
				}}
			</div>
		</div>
	}
}
