//! Tidy tree placement (Buchheim, Jünger & Leipert's linear-time Walker).
//!
//! Works on an arena in hierarchy pre-order: slot 0 is the root and every
//! node's descendants occupy higher slots. Produces a breadth coordinate
//! (`x`) and a depth coordinate (`y`) per slot. The caller decides what
//! breadth and depth mean on screen.

use super::geometry::Point;
use super::hierarchy::HierarchyNode;

/// What the separation callback gets to see about a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotInfo {
	pub parent: Option<usize>,
	pub depth: usize,
}

impl SlotInfo {
	pub fn is_sibling_of(&self, other: &SlotInfo) -> bool {
		self.parent.is_some() && self.parent == other.parent
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TidySizing {
	/// Fixed cell per node; the root lands on breadth 0.
	NodeSize { breadth: f64, depth: f64 },
	/// Stretch the whole tree over `[0, breadth] × [0, depth]`.
	Fit { breadth: f64, depth: f64 },
}

#[derive(Clone, Debug)]
pub struct TidyTree {
	parent: Vec<Option<usize>>,
	children: Vec<Vec<usize>>,
	depth: Vec<usize>,
	/// Index among siblings.
	number: Vec<usize>,
}

/// Per-slot working values of one placement run.
struct Walk {
	prelim: Vec<f64>,
	modifier: Vec<f64>,
	change: Vec<f64>,
	shift: Vec<f64>,
	thread: Vec<Option<usize>>,
	ancestor: Vec<usize>,
	/// Default ancestor per parent slot, carried between sibling passes.
	default_ancestor: Vec<Option<usize>>,
}

impl TidyTree {
	pub fn from_hierarchy(root: &HierarchyNode<'_>) -> Self {
		let mut tree = Self {
			parent: Vec::new(),
			children: Vec::new(),
			depth: Vec::new(),
			number: Vec::new(),
		};
		tree.push(root, None, 0, 0);
		tree
	}

	fn push(&mut self, node: &HierarchyNode<'_>, parent: Option<usize>, depth: usize, number: usize) {
		let slot = self.parent.len();
		self.parent.push(parent);
		self.children.push(Vec::with_capacity(node.children.len()));
		self.depth.push(depth);
		self.number.push(number);
		if let Some(p) = parent {
			self.children[p].push(slot);
		}
		for (i, child) in node.children.iter().enumerate() {
			self.push(child, Some(slot), depth + 1, i);
		}
	}

	pub fn len(&self) -> usize {
		self.parent.len()
	}

	pub fn info(&self, slot: usize) -> SlotInfo {
		SlotInfo {
			parent: self.parent[slot],
			depth: self.depth[slot],
		}
	}

	pub fn parent(&self, slot: usize) -> Option<usize> {
		self.parent[slot]
	}

	/// Place every slot. `separation(a, b)` gives the gap between adjacent
	/// nodes in cell units.
	pub fn layout<F>(&self, separation: F, sizing: TidySizing) -> Vec<Point>
	where
		F: Fn(SlotInfo, SlotInfo) -> f64,
	{
		let n = self.len();
		if n == 0 {
			return Vec::new();
		}

		let mut walk = Walk {
			prelim: vec![0.0; n],
			modifier: vec![0.0; n],
			change: vec![0.0; n],
			shift: vec![0.0; n],
			thread: vec![None; n],
			ancestor: (0..n).collect(),
			default_ancestor: vec![None; n],
		};

		for v in self.post_order() {
			self.first_walk(v, &mut walk, &separation);
		}

		// Second walk, pre-order. The root's virtual parent carries -prelim so
		// the root lands on breadth 0.
		let mut breadth = vec![0.0; n];
		for v in 0..n {
			let parent_mod = match self.parent[v] {
				Some(p) => walk.modifier[p],
				None => -walk.prelim[v],
			};
			breadth[v] = walk.prelim[v] + parent_mod;
			walk.modifier[v] += parent_mod;
		}

		match sizing {
			TidySizing::NodeSize { breadth: dx, depth: dy } => (0..n)
				.map(|v| Point::new(breadth[v] * dx, self.depth[v] as f64 * dy))
				.collect(),
			TidySizing::Fit { breadth: dx, depth: dy } => {
				let (mut left, mut right, mut bottom) = (0, 0, 0);
				for v in 0..n {
					if breadth[v] < breadth[left] {
						left = v;
					}
					if breadth[v] > breadth[right] {
						right = v;
					}
					if self.depth[v] > self.depth[bottom] {
						bottom = v;
					}
				}
				let s = if left == right {
					1.0
				} else {
					separation(self.info(left), self.info(right)) / 2.0
				};
				let tx = s - breadth[left];
				let kx = dx / (breadth[right] + s + tx);
				let ky = dy / self.depth[bottom].max(1) as f64;
				(0..n)
					.map(|v| Point::new((breadth[v] + tx) * kx, self.depth[v] as f64 * ky))
					.collect()
			}
		}
	}

	fn post_order(&self) -> Vec<usize> {
		let mut out = Vec::with_capacity(self.len());
		let mut stack = vec![(0usize, false)];
		while let Some((v, expanded)) = stack.pop() {
			if expanded {
				out.push(v);
			} else {
				stack.push((v, true));
				stack.extend(self.children[v].iter().rev().map(|&c| (c, false)));
			}
		}
		out
	}

	fn siblings(&self, v: usize) -> &[usize] {
		match self.parent[v] {
			Some(p) => &self.children[p],
			None => std::slice::from_ref(&0),
		}
	}

	fn next_left(&self, v: usize, walk: &Walk) -> Option<usize> {
		self.children[v].first().copied().or(walk.thread[v])
	}

	fn next_right(&self, v: usize, walk: &Walk) -> Option<usize> {
		self.children[v].last().copied().or(walk.thread[v])
	}

	fn first_walk<F>(&self, v: usize, walk: &mut Walk, separation: &F)
	where
		F: Fn(SlotInfo, SlotInfo) -> f64,
	{
		let siblings = self.siblings(v);
		let left_sibling = (self.number[v] > 0).then(|| siblings[self.number[v] - 1]);

		if let (Some(&first), Some(&last)) = (self.children[v].first(), self.children[v].last()) {
			self.execute_shifts(v, walk);
			let midpoint = (walk.prelim[first] + walk.prelim[last]) / 2.0;
			match left_sibling {
				Some(w) => {
					walk.prelim[v] = walk.prelim[w] + separation(self.info(v), self.info(w));
					walk.modifier[v] = walk.prelim[v] - midpoint;
				}
				None => walk.prelim[v] = midpoint,
			}
		} else if let Some(w) = left_sibling {
			walk.prelim[v] = walk.prelim[w] + separation(self.info(v), self.info(w));
		}

		if let Some(p) = self.parent[v] {
			let default = walk.default_ancestor[p].unwrap_or(siblings[0]);
			walk.default_ancestor[p] = Some(self.apportion(v, left_sibling, default, walk, separation));
		}
	}

	fn apportion<F>(
		&self,
		v: usize,
		left_sibling: Option<usize>,
		mut default_ancestor: usize,
		walk: &mut Walk,
		separation: &F,
	) -> usize
	where
		F: Fn(SlotInfo, SlotInfo) -> f64,
	{
		let Some(w) = left_sibling else {
			return default_ancestor;
		};

		// i = inside, o = outside; p = right subtree (v), m = left forest.
		let (mut vip, mut vop, mut vim) = (v, v, w);
		let mut vom = self.siblings(v)[0];
		let (mut sip, mut sop, mut sim, mut som) = (
			walk.modifier[vip],
			walk.modifier[vop],
			walk.modifier[vim],
			walk.modifier[vom],
		);

		let (next_im, next_ip) = loop {
			let next_im = self.next_right(vim, walk);
			let next_ip = self.next_left(vip, walk);
			let (Some(im), Some(ip)) = (next_im, next_ip) else {
				break (next_im, next_ip);
			};
			let (Some(om), Some(op)) = (self.next_left(vom, walk), self.next_right(vop, walk)) else {
				break (None, None);
			};
			vim = im;
			vip = ip;
			vom = om;
			vop = op;
			walk.ancestor[vop] = v;

			let shift = walk.prelim[vim] + sim - walk.prelim[vip] - sip
				+ separation(self.info(vim), self.info(vip));
			if shift > 0.0 {
				let wl = self.next_ancestor(vim, v, default_ancestor, walk);
				self.move_subtree(wl, v, shift, walk);
				sip += shift;
				sop += shift;
			}
			sim += walk.modifier[vim];
			sip += walk.modifier[vip];
			som += walk.modifier[vom];
			sop += walk.modifier[vop];
		};

		if let Some(im) = next_im {
			if self.next_right(vop, walk).is_none() {
				walk.thread[vop] = Some(im);
				walk.modifier[vop] += sim - sop;
			}
		}
		if let Some(ip) = next_ip {
			if self.next_left(vom, walk).is_none() {
				walk.thread[vom] = Some(ip);
				walk.modifier[vom] += sip - som;
				default_ancestor = v;
			}
		}
		default_ancestor
	}

	fn next_ancestor(&self, vim: usize, v: usize, default_ancestor: usize, walk: &Walk) -> usize {
		let candidate = walk.ancestor[vim];
		if self.parent[candidate] == self.parent[v] {
			candidate
		} else {
			default_ancestor
		}
	}

	fn move_subtree(&self, wl: usize, wr: usize, shift: f64, walk: &mut Walk) {
		let subtrees = (self.number[wr] as f64 - self.number[wl] as f64).max(1.0);
		let change = shift / subtrees;
		walk.change[wr] -= change;
		walk.shift[wr] += shift;
		walk.change[wl] += change;
		walk.prelim[wr] += shift;
		walk.modifier[wr] += shift;
	}

	fn execute_shifts(&self, v: usize, walk: &mut Walk) {
		let (mut shift, mut change) = (0.0, 0.0);
		for &w in self.children[v].iter().rev() {
			walk.prelim[w] += shift;
			walk.modifier[w] += shift;
			change += walk.change[w];
			shift += walk.shift[w] + change;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chart::hierarchy::build_hierarchy;
	use crate::chart::model::tests::person;
	use crate::chart::model::{Dataset, RootTieBreak};

	fn unit(_: SlotInfo, _: SlotInfo) -> f64 {
		1.0
	}

	fn dataset(rows: &[(u32, u32, &[u32])]) -> Dataset {
		Dataset::new(
			rows.iter()
				.map(|&(id, generation, parents)| person(id, "p", generation, parents))
				.collect(),
			vec![],
		)
		.unwrap()
	}

	#[test]
	fn parent_is_centered_over_children() {
		let data = dataset(&[(1, 1, &[]), (2, 2, &[1]), (3, 2, &[1]), (4, 2, &[1])]);
		let root = build_hierarchy(&data, RootTieBreak::DatasetOrder).unwrap();
		let tree = TidyTree::from_hierarchy(&root);
		let pts = tree.layout(unit, TidySizing::NodeSize { breadth: 10.0, depth: 100.0 });

		assert_eq!(pts[0], Point::new(0.0, 0.0));
		assert_eq!(pts[1], Point::new(-10.0, 100.0));
		assert_eq!(pts[2], Point::new(0.0, 100.0));
		assert_eq!(pts[3], Point::new(10.0, 100.0));
	}

	#[test]
	fn cousins_never_overlap() {
		// Two subtrees of uneven width side by side.
		let data = dataset(&[
			(1, 1, &[]),
			(2, 2, &[1]),
			(3, 2, &[1]),
			(4, 3, &[2]),
			(5, 3, &[2]),
			(6, 3, &[2]),
			(7, 3, &[3]),
			(8, 3, &[3]),
		]);
		let root = build_hierarchy(&data, RootTieBreak::DatasetOrder).unwrap();
		let tree = TidyTree::from_hierarchy(&root);
		let pts = tree.layout(
			|a, b| if a.is_sibling_of(&b) { 1.0 } else { 2.0 },
			TidySizing::NodeSize { breadth: 1.0, depth: 1.0 },
		);

		let mut row: Vec<f64> = (0..tree.len())
			.filter(|&s| tree.info(s).depth == 2)
			.map(|s| pts[s].x)
			.collect();
		assert_eq!(row.len(), 5);
		row.sort_by(|a, b| a.partial_cmp(b).unwrap());
		for pair in row.windows(2) {
			assert!(pair[1] - pair[0] >= 1.0 - 1e-9, "{row:?}");
		}
		// Slots are pre-order: 1, 2, 4, 5, 6, 3, 7, 8.
		assert!((pts[4].x - pts[3].x - 1.0).abs() < 1e-9);
		let cousin_gap = pts[6].x - pts[4].x;
		assert!(cousin_gap >= 2.0 - 1e-9, "gap {cousin_gap}");
	}

	#[test]
	fn fit_sizing_spans_the_box() {
		let data = dataset(&[(1, 1, &[]), (2, 2, &[1]), (3, 2, &[1]), (4, 3, &[3])]);
		let root = build_hierarchy(&data, RootTieBreak::DatasetOrder).unwrap();
		let tree = TidyTree::from_hierarchy(&root);
		let pts = tree.layout(unit, TidySizing::Fit { breadth: 100.0, depth: 50.0 });

		let min = pts.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
		let max = pts.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
		assert!(min > 0.0 && max < 100.0);
		assert_eq!(pts[0].y, 0.0);
		assert_eq!(pts[3].y, 50.0);
	}

	#[test]
	fn single_node_sits_at_origin() {
		let data = dataset(&[(1, 1, &[])]);
		let root = build_hierarchy(&data, RootTieBreak::DatasetOrder).unwrap();
		let tree = TidyTree::from_hierarchy(&root);
		let pts = tree.layout(unit, TidySizing::NodeSize { breadth: 50.0, depth: 150.0 });
		assert_eq!(pts, vec![Point::ORIGIN]);
	}
}
