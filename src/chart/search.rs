//! Name search over the dataset.

use super::model::{Dataset, Person};

/// Lazy iterator over people whose name contains a query, ignoring case.
///
/// Cheap to clone, so a result list can be walked again from the start.
#[derive(Clone, Debug)]
pub struct SearchResults<'a> {
	people: std::slice::Iter<'a, Person>,
	needle: String,
}

impl<'a> SearchResults<'a> {
	/// Matches of `query` in `dataset`, in dataset order.
	pub fn new(dataset: &'a Dataset, query: &str) -> Self {
		let needle = query.to_lowercase();
		// An empty needle matches nothing rather than everyone.
		let people: &'a [Person] = if needle.is_empty() {
			&[]
		} else {
			dataset.people()
		};
		Self {
			people: people.iter(),
			needle,
		}
	}

	/// Whether a results panel should be shown at all.
	pub fn is_active(&self) -> bool {
		!self.needle.is_empty()
	}

	/// The lowercased needle.
	pub fn query(&self) -> &str {
		&self.needle
	}
}

impl<'a> Iterator for SearchResults<'a> {
	type Item = &'a Person;

	fn next(&mut self) -> Option<Self::Item> {
		let needle = &self.needle;
		self.people
			.by_ref()
			.find(|p| p.name.to_lowercase().contains(needle.as_str()))
	}
}

impl std::iter::FusedIterator for SearchResults<'_> {}

/// People whose name contains `query`, ignoring case. An empty query matches nobody.
pub fn search<'a>(dataset: &'a Dataset, query: &str) -> SearchResults<'a> {
	SearchResults::new(dataset, query)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chart::model::tests::person;

	fn data() -> Dataset {
		Dataset::new(
			vec![
				person(1, "Zhang Wei", 1, &[]),
				person(2, "Li Na", 2, &[1]),
				person(3, "ZHAO Lei", 2, &[1]),
				person(4, "颜之推", 3, &[2]),
			],
			vec![],
		)
		.unwrap()
	}

	#[test]
	fn matches_case_insensitively_in_dataset_order() {
		let data = data();
		let ids: Vec<_> = search(&data, "zh").map(|p| p.id).collect();
		assert_eq!(ids, vec![1, 3]);
		assert_eq!(search(&data, "之").map(|p| p.id).collect::<Vec<_>>(), vec![4]);
	}

	#[test]
	fn empty_query_yields_nothing() {
		let data = data();
		let results = search(&data, "");
		assert!(!results.is_active());
		assert_eq!(results.count(), 0);
	}

	#[test]
	fn results_can_be_walked_twice() {
		let data = data();
		let results = search(&data, "l");
		let first: Vec<_> = results.clone().map(|p| p.id).collect();
		let second: Vec<_> = results.map(|p| p.id).collect();
		assert_eq!(first, second);
		assert_eq!(first, vec![2, 3]);
	}
}
