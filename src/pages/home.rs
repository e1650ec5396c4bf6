use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;

use crate::chart::{ChartConfig, Dataset};
use crate::components::family_chart::FamilyChart;
use crate::loader::fetch_dataset;

#[derive(Clone, Debug)]
enum LoadState {
	Loading,
	Ready(Rc<Dataset>),
	Failed(String),
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = ChartConfig::default();
	let state = RwSignal::new_local(LoadState::Loading);

	let url = config.data_url.clone();
	spawn_local(async move {
		match fetch_dataset(&url).await {
			Ok(dataset) => state.set(LoadState::Ready(Rc::new(dataset))),
			Err(err) => {
				error!("{err}");
				state.set(LoadState::Failed(err.to_string()));
			}
		}
	});

	view! {
		<div class="fullscreen-chart">
			{move || match state.get() {
				LoadState::Loading => view! { <div class="status">"加载中..."</div> }.into_any(),
				LoadState::Failed(msg) => {
					view! {
						<div class="status error">
							<h1>"无法加载家族数据"</h1>
							<p>{msg}</p>
						</div>
					}
						.into_any()
				}
				LoadState::Ready(dataset) => {
					view! { <FamilyChart dataset=dataset config=config.clone() /> }.into_any()
				}
			}}
		</div>
	}
}
