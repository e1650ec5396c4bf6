//! End-to-end scenarios driven through the public chart API.

use std::rc::Rc;

use family_tree_canvas::chart::config::AnimationConfig;
use family_tree_canvas::chart::{
	Camera, ChartConfig, ChartController, ChartError, Command, Dataset, DatasetStats, LayoutMode,
	Scene, ViewState, Viewport, search,
};

const FAMILY: &str = r#"{
	"nodes": [
		{"id": 1, "name": "颜之推", "gender": "male", "generation": 1, "birth": 531, "death": 591,
		 "occupation": "学者", "avatar": "👴", "parents": []},
		{"id": 2, "name": "殷氏", "gender": "female", "generation": 1, "avatar": "👵", "parents": []},
		{"id": 3, "name": "颜思鲁", "gender": "male", "generation": 2, "birth": "560",
		 "occupation": "官员", "avatar": "👨", "parents": [1, 2]},
		{"id": 4, "name": "颜愍楚", "gender": "male", "generation": 2, "avatar": "👨", "parents": [1]},
		{"id": 5, "name": "Zhu Lan", "gender": "female", "generation": 2, "avatar": "👩", "parents": []},
		{"id": 6, "name": "颜师古", "gender": "male", "generation": 3, "birth": 581, "death": 645,
		 "occupation": "经学家", "avatar": "🧑", "parents": [3, 5]}
	],
	"links": [
		{"source": 1, "target": 2, "type": "spouse"},
		{"source": 3, "target": 5, "type": "spouse"}
	]
}"#;

fn family() -> Rc<Dataset> {
	Rc::new(Dataset::from_json(FAMILY).unwrap())
}

fn controller() -> ChartController {
	ChartController::new(family(), ChartConfig::default(), Viewport::new(1200.0, 800.0))
}

#[test]
fn three_person_family() {
	let data = Dataset::from_json(
		r#"{"nodes": [
			{"id": 1, "name": "root", "gender": "male", "generation": 1},
			{"id": 2, "name": "a", "gender": "female", "generation": 2, "parents": [1]},
			{"id": 3, "name": "b", "gender": "male", "generation": 2, "parents": [1]}
		]}"#,
	)
	.unwrap();
	assert_eq!(
		data.stats(),
		DatasetStats {
			total_members: 3,
			generations: 2,
			families: 0,
		}
	);

	let chart = ChartController::new(Rc::new(data), ChartConfig::default(), Viewport::default());
	let layout = chart.layout().unwrap();
	assert_eq!(layout.mode, LayoutMode::Tree);
	assert_eq!(layout.nodes.len(), 3);
	assert_eq!(layout.links.len(), 2);
	assert!(layout.links.iter().all(|l| l.source == 1));
}

#[test]
fn search_is_case_insensitive() {
	let data = family();
	let hits: Vec<_> = search(&data, "zh").map(|p| p.id).collect();
	assert_eq!(hits, vec![5]);
	assert_eq!(search(&data, "颜").count(), 4);
	assert_eq!(search(&data, "").count(), 0);
	assert_eq!(search(&data, "nobody").count(), 0);
}

#[test]
fn stats_count_members_generations_and_marriages() {
	assert_eq!(
		family().stats(),
		DatasetStats {
			total_members: 6,
			generations: 3,
			families: 2,
		}
	);
}

#[test]
fn multi_parent_children_appear_under_each_parent() {
	let chart = controller();
	let layout = chart.layout().unwrap();
	// 6 is listed under 3 only, since 5 is not a founder and is not reachable.
	let placements = |id| layout.nodes.iter().filter(|n| n.id == id).count();
	assert_eq!(placements(1), 1);
	assert_eq!(placements(3), 1);
	assert_eq!(placements(6), 1);
	assert_eq!(placements(2), 0);
	assert_eq!(placements(5), 0);
}

#[test]
fn switching_layouts_and_back_reproduces_positions() {
	let mut chart = controller();
	for mode in LayoutMode::ALL {
		chart.set_layout(mode);
		let first = chart.layout().unwrap().clone();
		chart.set_layout(LayoutMode::Tree);
		chart.set_layout(mode);
		assert_eq!(chart.layout().unwrap(), &first, "{mode} layout drifted");
	}
}

#[test]
fn force_layout_places_everyone_once_with_all_relationships() {
	let mut chart = controller();
	chart.set_layout(LayoutMode::Force);
	while chart.tick(16.0) {}
	let layout = chart.layout().unwrap();
	assert_eq!(layout.nodes.len(), 6);
	// 5 parent links plus 2 spouse links.
	assert_eq!(layout.links.len(), 7);
	let scene = chart.scene().unwrap();
	let spouse = scene
		.links
		.iter()
		.find(|l| (l.source, l.target) == (3, 5))
		.unwrap();
	assert_eq!(spouse.width, 3.0);
}

#[test]
fn selection_highlights_exactly_the_touching_edges() {
	let chart = controller();
	let data = chart.dataset().clone();
	let mut view = ViewState::new(Camera::new(Default::default(), chart.viewport()));
	let timing = AnimationConfig::default();

	for mode in LayoutMode::ALL {
		let mut chart = controller();
		chart.set_layout(mode);
		let layout = chart.layout().unwrap();

		view.selected = None;
		let scene = Scene::build(1, &data, layout, &view, &timing, None);
		assert_eq!(scene.highlighted_links().count(), 0);

		for person in data.people() {
			view.selected = Some(person.id);
			let scene = Scene::build(1, &data, layout, &view, &timing, None);
			for link in &scene.links {
				assert_eq!(
					link.highlighted,
					link.source == person.id || link.target == person.id,
					"{mode}: {} -> {} with {} selected",
					link.source,
					link.target,
					person.id
				);
			}
		}
	}
}

#[test]
fn search_pick_focuses_the_member() {
	let mut chart = controller();
	chart.apply(Command::Search("师古".into())).unwrap();
	let id = chart.search_results().next().unwrap().id;
	chart.apply(Command::PickSearchResult(id)).unwrap();
	chart.tick(2_000.0);

	let at = chart.layout().unwrap().position_of(id).unwrap();
	let on_screen = chart.view().camera.world_to_screen(at);
	assert!(on_screen.distance(Viewport::new(1200.0, 800.0).center()) < 1e-6);
	assert_eq!(chart.view().camera.scale(), 1.0);
	assert_eq!(chart.tooltip().unwrap().content.title, "颜师古");
}

#[test]
fn unknown_ids_are_rejected() {
	let mut chart = controller();
	assert_eq!(
		chart.apply(Command::PickSearchResult(404)),
		Err(ChartError::NodeNotFound(404))
	);
}

#[test]
fn empty_documents_are_fatal() {
	let err = Dataset::from_json(r#"{"nodes": [], "links": []}"#).unwrap_err();
	assert_eq!(err, ChartError::EmptyDataset);
	assert!(err.is_fatal());
	assert!(!ChartError::NoRootFound.is_fatal());
}
