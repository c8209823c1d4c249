//! Two-pass recursive tree layout over the structural `children` edges.
//!
//! 1. **Width pass (bottom-up):** every node gets a subtree width in
//!    dimensionless units. Leaves and collapsed nodes count as one unit and
//!    their descendants are not visited. Otherwise the width is the sum of the
//!    children's widths, floored at one.
//! 2. **Position pass (top-down):** `y = depth * vertical_spacing`. Leaves and
//!    collapsed nodes sit in the middle of their slot; an expanded parent lays
//!    its children out left to right, advancing a cursor by each child's width
//!    times `horizontal_spacing`, then centers itself on the plain mean of its
//!    children's x.
//!
//! Nodes outside the visited region (descendants of a collapsed node, people
//! the root cannot reach) keep whatever position they last had.
//!
//! Both passes recurse and assume an acyclic `children` graph; run the
//! validator first.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tree::{FamilyTree, LayoutState, Person, PersonIdx};

/// Configuration for the tree layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeLayoutConfig {
    /// Horizontal space allotted to one width unit.
    pub horizontal_spacing: f64,
    /// Vertical distance between generations.
    pub vertical_spacing: f64,
}

impl Default for TreeLayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_spacing: 2.0,
            vertical_spacing: 2.5,
        }
    }
}

/// The primary tree layout engine.
#[derive(Debug, Clone, Default)]
pub struct TreeLayoutEngine {
    config: TreeLayoutConfig,
}

impl TreeLayoutEngine {
    /// Create a tree layout with the given configuration.
    pub fn new(config: TreeLayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TreeLayoutConfig {
        &self.config
    }

    /// Lay out the tree from its root, writing x, y and subtree widths.
    pub fn layout(&self, tree: &mut FamilyTree) {
        let root = tree.root();
        let (people, state) = tree.parts_mut();

        let units = Self::compute_width(root, people, state);
        self.assign_positions(root, 0.0, 0, people, state);

        debug!(units, root_x = state.x(root), "tree layout done");
    }

    /// Width pass. Returns the subtree width of `node` in layout units.
    fn compute_width(node: PersonIdx, people: &[Person], state: &mut LayoutState) -> u32 {
        let children = &people[node.slot()].children;

        if children.is_empty() || !state.is_expanded(node) {
            state.set_subtree_width(node, 1);
            return 1;
        }

        let mut width = 0;
        for &child in children {
            width += Self::compute_width(child, people, state);
        }

        let width = width.max(1);
        state.set_subtree_width(node, width);
        width
    }

    /// Position pass for the subtree at `node`, whose slot starts at `x_offset`.
    fn assign_positions(
        &self,
        node: PersonIdx,
        x_offset: f64,
        depth: u32,
        people: &[Person],
        state: &mut LayoutState,
    ) {
        state.set_y(node, f64::from(depth) * self.config.vertical_spacing);

        let children = &people[node.slot()].children;
        if children.is_empty() || !state.is_expanded(node) {
            state.set_x(node, x_offset + self.config.horizontal_spacing / 2.0);
            return;
        }

        let mut cursor = x_offset;
        let mut center_sum = 0.0;

        for &child in children {
            let child_width = f64::from(state.subtree_width(child)) * self.config.horizontal_spacing;
            self.assign_positions(child, cursor, depth + 1, people, state);
            center_sum += state.x(child);
            cursor += child_width;
        }

        state.set_x(node, center_sum / children.len() as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn add(tree: &mut FamilyTree, parent: PersonIdx, id: &str) -> PersonIdx {
        let child = tree.add_person(Person::new(id, id)).unwrap();
        tree.add_child(parent, child, Some(parent), None);
        child
    }

    #[test]
    fn test_two_leaf_children() {
        let mut tree = FamilyTree::new(Person::new("R", "R"));
        let root = tree.root();
        let a = add(&mut tree, root, "A");
        let b = add(&mut tree, root, "B");

        TreeLayoutEngine::new(TreeLayoutConfig {
            horizontal_spacing: 2.0,
            vertical_spacing: 2.5,
        })
        .layout(&mut tree);

        let state = tree.layout();
        assert_close(state.x(a), 1.0);
        assert_close(state.y(a), 2.5);
        assert_close(state.x(b), 3.0);
        assert_close(state.y(b), 2.5);
        assert_close(state.x(root), 2.0);
        assert_close(state.y(root), 0.0);
        assert_eq!(state.subtree_width(root), 2);
    }

    #[test]
    fn test_parent_uses_unweighted_mean() {
        // R has children A (with two leaves) and B (a leaf).
        let mut tree = FamilyTree::new(Person::new("R", "R"));
        let root = tree.root();
        let a = add(&mut tree, root, "A");
        let b = add(&mut tree, root, "B");
        let a1 = add(&mut tree, a, "A1");
        let a2 = add(&mut tree, a, "A2");

        TreeLayoutEngine::default().layout(&mut tree);

        let state = tree.layout();
        assert_eq!(state.subtree_width(root), 3);
        assert_eq!(state.subtree_width(a), 2);
        assert_close(state.x(a1), 1.0);
        assert_close(state.x(a2), 3.0);
        assert_close(state.x(a), 2.0);
        assert_close(state.x(b), 5.0);
        // Mean of child centers, not width-weighted.
        assert_close(state.x(root), 3.5);
        assert_close(state.y(a1), 5.0);
    }

    #[test]
    fn test_widths_are_at_least_one() {
        let mut tree = FamilyTree::new(Person::new("R", "R"));
        let root = tree.root();
        let mut parent = root;
        for i in 0..5 {
            parent = add(&mut tree, parent, &format!("n{i}"));
        }

        TreeLayoutEngine::default().layout(&mut tree);

        for idx in tree.indices() {
            assert_eq!(tree.layout().subtree_width(idx), 1);
        }
    }

    #[test]
    fn test_collapsed_node_counts_as_one_unit() {
        let mut tree = FamilyTree::new(Person::new("R", "R"));
        let root = tree.root();
        let a = add(&mut tree, root, "A");
        for i in 0..4 {
            add(&mut tree, a, &format!("a{i}"));
        }
        let b = add(&mut tree, root, "B");

        tree.set_expanded(a, false);
        TreeLayoutEngine::default().layout(&mut tree);

        let state = tree.layout();
        assert_eq!(state.subtree_width(a), 1);
        assert_eq!(state.subtree_width(root), 2);
        assert_close(state.x(a), 1.0);
        assert_close(state.x(b), 3.0);
    }

    #[test]
    fn test_collapse_freezes_descendants() {
        let mut tree = FamilyTree::new(Person::new("R", "R"));
        let root = tree.root();
        let a = add(&mut tree, root, "A");
        let a1 = add(&mut tree, a, "A1");
        let a2 = add(&mut tree, a, "A2");
        let grandchild = add(&mut tree, a2, "G");
        add(&mut tree, root, "B");

        let engine = TreeLayoutEngine::default();
        engine.layout(&mut tree);
        let before: Vec<_> = [a1, a2, grandchild]
            .iter()
            .map(|&i| tree.layout().position(i))
            .collect();

        tree.set_expanded(a, false);
        engine.layout(&mut tree);
        engine.layout(&mut tree);

        let after: Vec<_> = [a1, a2, grandchild]
            .iter()
            .map(|&i| tree.layout().position(i))
            .collect();
        assert_eq!(before, after);
        // The collapsed node itself moved into a single-unit slot.
        assert_close(tree.layout().x(a), 1.0);
    }

    #[test]
    fn test_unreachable_person_keeps_position() {
        let mut tree = FamilyTree::new(Person::new("R", "R"));
        let root = tree.root();
        add(&mut tree, root, "A");
        let loner = tree.add_person(Person::new("L", "L")).unwrap();
        tree.layout_mut()
            .set_position(loner, crate::geometry::Point::new(-4.0, 9.0));

        TreeLayoutEngine::default().layout(&mut tree);

        assert_close(tree.layout().x(loner), -4.0);
        assert_close(tree.layout().y(loner), 9.0);
    }
}
