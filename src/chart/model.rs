//! People, relationships and the immutable dataset they live in.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};

use super::error::{ChartError, Result};

/// Identifier of a person in the dataset.
pub type PersonId = u32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
/// Drives the node fill colour.
pub enum Gender {
	/// Drawn in green.
	Male,
	#[default]
	/// Drawn in pink. Also the fallback for unknown labels.
	Female,
}

impl Gender {
	/// Anything that is not recognisably male is drawn with the female palette.
	fn from_label(label: &str) -> Self {
		match label.trim().to_lowercase().as_str() {
			"male" | "m" | "男" => Self::Male,
			_ => Self::Female,
		}
	}
}

impl<'de> Deserialize<'de> for Gender {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		let label = Option::<String>::deserialize(deserializer)?;
		Ok(label.as_deref().map(Gender::from_label).unwrap_or_default())
	}
}

/// One individual in the genealogy.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Person {
	/// Unique id; links and `parents` refer to it.
	pub id: PersonId,
	/// Display name, also what search matches against.
	pub name: String,
	#[serde(default)]
	/// Missing or unrecognised values read as female.
	pub gender: Gender,
	/// 1 for the founders, counting up towards the present.
	pub generation: u32,
	#[serde(default, deserialize_with = "lenient_year")]
	/// Birth year.
	pub birth: Option<i32>,
	#[serde(default, deserialize_with = "lenient_year")]
	/// Death year, absent while alive or unknown.
	pub death: Option<i32>,
	#[serde(default)]
	/// Occupation shown in the tooltip and the tree caption.
	pub occupation: Option<String>,
	#[serde(default)]
	/// Glyph drawn inside the node.
	pub avatar: String,
	#[serde(default)]
	/// Ids of the listed parents. Unknown ids are ignored.
	pub parents: Vec<PersonId>,
}

impl Person {
	/// Generation-1 members can root the hierarchy.
	pub fn is_founder(&self) -> bool {
		self.generation == 1
	}

	/// Whether `parent` is listed among this person's parents.
	pub fn has_parent(&self, parent: PersonId) -> bool {
		self.parents.contains(&parent)
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawYear {
	Int(i64),
	Float(f64),
	Text(String),
}

/// Years show up as numbers, numeric strings or blanks depending on who typed
/// the data in. Anything unparseable becomes `None`.
fn lenient_year<'de, D: Deserializer<'de>>(
	deserializer: D,
) -> std::result::Result<Option<i32>, D::Error> {
	let raw = Option::<RawYear>::deserialize(deserializer)?;
	Ok(raw.and_then(|year| match year {
		RawYear::Int(n) => i32::try_from(n).ok(),
		RawYear::Float(f) if f.is_finite() => Some(f.trunc() as i32),
		RawYear::Float(_) => None,
		RawYear::Text(s) => s.trim().parse().ok(),
	}))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// What a relationship means.
pub enum RelationKind {
	/// Parent to child, derived from `parents`.
	ParentChild,
	/// Marriage, listed explicitly in the document.
	Spouse,
}

impl RelationKind {
	fn from_label(label: &str) -> Option<Self> {
		match label.trim().to_lowercase().as_str() {
			"spouse" | "marriage" => Some(Self::Spouse),
			"parent-child" | "parent" | "child" => Some(Self::ParentChild),
			_ => None,
		}
	}
}

/// A connection between two people. Parent-child links point parent → child.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Relationship {
	/// Parent for parent-child links; either partner for spouses.
	pub source: PersonId,
	/// Child for parent-child links; the other partner for spouses.
	pub target: PersonId,
	/// Kind of connection.
	pub kind: RelationKind,
}

impl Relationship {
	/// Whether either end is `id`.
	pub fn touches(&self, id: PersonId) -> bool {
		self.source == id || self.target == id
	}
}

#[derive(Deserialize)]
struct RawLink {
	source: PersonId,
	target: PersonId,
	#[serde(rename = "type", default)]
	kind: Option<String>,
}

#[derive(Deserialize)]
struct RawDocument {
	#[serde(default)]
	nodes: Vec<Person>,
	#[serde(default)]
	links: Vec<RawLink>,
}

/// How to pick the hierarchy root when several founders exist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootTieBreak {
	/// First founder in dataset order.
	#[default]
	DatasetOrder,
	/// Founder with the smallest id.
	LowestId,
}

/// Figures shown in the stats panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DatasetStats {
	/// Number of people.
	pub total_members: usize,
	/// Number of distinct generations.
	pub generations: usize,
	/// Number of spouse links.
	pub families: usize,
}

/// The loaded genealogy. Immutable once built.
#[derive(Clone, Debug)]
pub struct Dataset {
	people: Vec<Person>,
	links: Vec<Relationship>,
	index: HashMap<PersonId, usize>,
}

impl Dataset {
	/// Build a dataset from already-parsed records.
	///
	/// Duplicate ids keep their first occurrence for lookups. Explicit links
	/// naming unknown people are dropped.
	pub fn new(people: Vec<Person>, links: Vec<Relationship>) -> Result<Self> {
		if people.is_empty() {
			return Err(ChartError::EmptyDataset);
		}

		let mut index = HashMap::with_capacity(people.len());
		for (pos, person) in people.iter().enumerate() {
			match index.entry(person.id) {
				Entry::Occupied(_) => {
					warn!("duplicate member id {}, keeping the first record", person.id)
				}
				Entry::Vacant(slot) => {
					slot.insert(pos);
				}
			}
		}

		let links = links
			.into_iter()
			.filter(|link| {
				let known = index.contains_key(&link.source) && index.contains_key(&link.target);
				if !known {
					warn!("dropping link {} -> {}: unknown member", link.source, link.target);
				}
				known
			})
			.collect();

		Ok(Self {
			people,
			links,
			index,
		})
	}

	/// Parse the `{ "nodes": [...], "links": [...] }` document.
	pub fn from_json(text: &str) -> Result<Self> {
		let doc: RawDocument = serde_json::from_str(text)?;
		let links = doc
			.links
			.into_iter()
			.filter_map(|raw| {
				let label = raw.kind.as_deref().unwrap_or("spouse");
				match RelationKind::from_label(label) {
					Some(kind) => Some(Relationship {
						source: raw.source,
						target: raw.target,
						kind,
					}),
					None => {
						warn!("ignoring link with unknown type {label:?}");
						None
					}
				}
			})
			.collect();
		let dataset = Self::new(doc.nodes, links)?;
		debug!(
			"parsed {} members and {} explicit links",
			dataset.people.len(),
			dataset.links.len()
		);
		Ok(dataset)
	}

	/// Everyone, in document order.
	pub fn people(&self) -> &[Person] {
		&self.people
	}

	/// Number of people.
	pub fn len(&self) -> usize {
		self.people.len()
	}

	/// Always false for a constructed dataset.
	pub fn is_empty(&self) -> bool {
		self.people.is_empty()
	}

	/// Look a person up by id.
	pub fn person(&self, id: PersonId) -> Option<&Person> {
		self.index.get(&id).map(|&pos| &self.people[pos])
	}

	/// Whether `id` names a person.
	pub fn contains(&self, id: PersonId) -> bool {
		self.index.contains_key(&id)
	}

	/// People listing `id` among their parents, in dataset order.
	pub fn children_of(&self, id: PersonId) -> impl Iterator<Item = &Person> {
		self.people.iter().filter(move |p| p.has_parent(id))
	}

	/// Every generation-1 person, in dataset order.
	pub fn founders(&self) -> impl Iterator<Item = &Person> {
		self.people.iter().filter(|p| p.is_founder())
	}

	/// The founder the hierarchy is rooted at.
	pub fn root(&self, tie_break: RootTieBreak) -> Result<&Person> {
		let root = match tie_break {
			RootTieBreak::DatasetOrder => self.founders().next(),
			RootTieBreak::LowestId => self.founders().min_by_key(|p| p.id),
		};
		root.ok_or(ChartError::NoRootFound)
	}

	/// Number of distinct generation values present.
	pub fn generation_count(&self) -> usize {
		self.people
			.iter()
			.map(|p| p.generation)
			.collect::<BTreeSet<_>>()
			.len()
	}

	/// Explicit links from the source document.
	pub fn explicit_links(&self) -> &[Relationship] {
		&self.links
	}

	/// Derived parent → child links followed by the explicit links.
	pub fn relationships(&self) -> Vec<Relationship> {
		let mut out: Vec<Relationship> = self
			.people
			.iter()
			.flat_map(move |child| {
				child
					.parents
					.iter()
					.filter(move |parent| self.contains(**parent))
					.map(move |&parent| Relationship {
						source: parent,
						target: child.id,
						kind: RelationKind::ParentChild,
					})
			})
			.collect();
		out.extend(self.links.iter().copied());
		out
	}

	/// Figures for the stats panel.
	pub fn stats(&self) -> DatasetStats {
		DatasetStats {
			total_members: self.people.len(),
			generations: self.generation_count(),
			families: self
				.links
				.iter()
				.filter(|l| l.kind == RelationKind::Spouse)
				.count(),
		}
	}
}
