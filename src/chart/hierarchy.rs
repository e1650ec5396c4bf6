//! Rooted tree view of the dataset for the tree and radial layouts.
//!
//! A child listing several parents is repeated under each of them. The
//! result is a tree, not a DAG, so a two-parent child shows up twice.

use log::{debug, warn};

use super::error::Result;
use super::model::{Dataset, Person, PersonId, RootTieBreak};

#[derive(Clone, Debug)]
/// A member placed in the single-rooted tree.
pub struct HierarchyNode<'a> {
	/// The member's record.
	pub person: &'a Person,
	/// Distance from the root, which sits at 0.
	pub depth: usize,
	/// Dataset order, not birth order.
	pub children: Vec<HierarchyNode<'a>>,
}

impl<'a> HierarchyNode<'a> {
	/// Id of the member at this node.
	pub fn id(&self) -> PersonId {
		self.person.id
	}

	/// Pre-order walk, the order placement and drawing use.
	pub fn descendants(&self) -> Vec<&HierarchyNode<'a>> {
		let mut out = Vec::new();
		let mut stack = vec![self];
		while let Some(node) = stack.pop() {
			out.push(node);
			stack.extend(node.children.iter().rev());
		}
		out
	}

	/// Parent → child id pairs in pre-order.
	pub fn links(&self) -> Vec<(PersonId, PersonId)> {
		self.descendants()
			.into_iter()
			.flat_map(|n| n.children.iter().map(move |c| (n.id(), c.id())))
			.collect()
	}

	/// Nodes in this subtree, counting duplicated members once per copy.
	pub fn node_count(&self) -> usize {
		1 + self.children.iter().map(HierarchyNode::node_count).sum::<usize>()
	}

	/// Depth of the deepest node below (and including) this one.
	pub fn height(&self) -> usize {
		self.children
			.iter()
			.map(|c| c.height() + 1)
			.max()
			.unwrap_or(0)
	}

	/// First node for `id` in pre-order.
	pub fn find(&self, id: PersonId) -> Option<&HierarchyNode<'a>> {
		self.descendants().into_iter().find(|n| n.id() == id)
	}
}

/// Build the hierarchy rooted at the chosen founder.
pub fn build_hierarchy(dataset: &Dataset, tie_break: RootTieBreak) -> Result<HierarchyNode<'_>> {
	let root = dataset.root(tie_break)?;
	let mut path = vec![root.id];
	let tree = HierarchyNode {
		person: root,
		depth: 0,
		children: build_children(dataset, root.id, 1, &mut path),
	};
	debug!(
		"hierarchy rooted at {} ({} nodes, height {})",
		root.id,
		tree.node_count(),
		tree.height()
	);
	Ok(tree)
}

fn build_children<'a>(
	dataset: &'a Dataset,
	parent: PersonId,
	depth: usize,
	path: &mut Vec<PersonId>,
) -> Vec<HierarchyNode<'a>> {
	let mut children = Vec::new();
	for child in dataset.children_of(parent) {
		// A member that is its own ancestor would recurse forever.
		if path.contains(&child.id) {
			warn!("member {} is its own ancestor, cutting the cycle", child.id);
			continue;
		}
		path.push(child.id);
		let grandchildren = build_children(dataset, child.id, depth + 1, path);
		path.pop();
		children.push(HierarchyNode {
			person: child,
			depth,
			children: grandchildren,
		});
	}
	children
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chart::error::ChartError;
	use crate::chart::model::tests::person;

	#[test]
	fn three_person_family_has_one_root_and_two_children() {
		let data = Dataset::new(
			vec![
				person(1, "root", 1, &[]),
				person(2, "a", 2, &[1]),
				person(3, "b", 2, &[1]),
			],
			vec![],
		)
		.unwrap();
		let tree = build_hierarchy(&data, RootTieBreak::DatasetOrder).unwrap();
		assert_eq!(tree.id(), 1);
		assert_eq!(
			tree.children.iter().map(HierarchyNode::id).collect::<Vec<_>>(),
			vec![2, 3]
		);
		assert_eq!(tree.node_count(), 3);
		assert_eq!(tree.height(), 1);
		assert_eq!(tree.links(), vec![(1, 2), (1, 3)]);
	}

	#[test]
	fn multi_parent_children_are_duplicated() {
		// 1 → 2, 1 → 3, and 4 lists both 2 and 3 as parents.
		let data = Dataset::new(
			vec![
				person(1, "root", 1, &[]),
				person(2, "a", 2, &[1]),
				person(3, "b", 2, &[1]),
				person(4, "c", 3, &[2, 3]),
				person(5, "d", 4, &[4]),
			],
			vec![],
		)
		.unwrap();
		let tree = build_hierarchy(&data, RootTieBreak::DatasetOrder).unwrap();
		assert_eq!(tree.node_count(), 7);
		let ids: Vec<_> = tree.descendants().iter().map(|n| n.id()).collect();
		assert_eq!(ids, vec![1, 2, 4, 5, 3, 4, 5]);
		assert_eq!(tree.find(4).unwrap().depth, 2);
	}

	#[test]
	fn parent_cycles_are_cut() {
		let data = Dataset::new(
			vec![
				person(1, "root", 1, &[]),
				person(2, "a", 2, &[1, 3]),
				person(3, "b", 3, &[2]),
			],
			vec![],
		)
		.unwrap();
		let tree = build_hierarchy(&data, RootTieBreak::DatasetOrder).unwrap();
		let ids: Vec<_> = tree.descendants().iter().map(|n| n.id()).collect();
		assert_eq!(ids, vec![1, 2, 3]);
	}

	#[test]
	fn missing_founder_fails() {
		let data = Dataset::new(vec![person(2, "a", 2, &[1])], vec![]).unwrap();
		assert_eq!(
			build_hierarchy(&data, RootTieBreak::DatasetOrder).unwrap_err(),
			ChartError::NoRootFound
		);
	}

	#[test]
	fn unrelated_people_are_left_out() {
		let data = Dataset::new(
			vec![
				person(1, "root", 1, &[]),
				person(2, "a", 2, &[1]),
				person(8, "stray", 3, &[]),
				person(9, "other founder", 1, &[]),
			],
			vec![],
		)
		.unwrap();
		let tree = build_hierarchy(&data, RootTieBreak::DatasetOrder).unwrap();
		assert_eq!(tree.node_count(), 2);
	}
}
