//! Search and focus helpers over the expand/collapse state.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::tree::{FamilyTree, PersonIdx};

/// Viewport size in layout units, used to center the view on a person.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 15.0,
        }
    }
}

/// Translation a renderer applies to bring a point to the viewport center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewOffset {
    pub dx: f64,
    pub dy: f64,
}

impl ViewOffset {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Offset that centers `at` in `viewport`.
    pub fn centered_on(at: Point, viewport: Viewport) -> Self {
        Self {
            dx: viewport.width / 2.0 - at.x,
            dy: viewport.height / 2.0 - at.y,
        }
    }
}

/// Narrows the expanded region of a tree down to one person.
pub struct SearchController<'a> {
    tree: &'a mut FamilyTree,
}

impl<'a> SearchController<'a> {
    pub fn new(tree: &'a mut FamilyTree) -> Self {
        Self { tree }
    }

    /// Collapse everything, then expand `person`'s recorded ancestry, `person`
    /// itself and its immediate children.
    ///
    /// The layout pipeline has to be rerun for the change to show.
    pub fn focus_on(&mut self, person: PersonIdx) {
        self.tree.collapse_all();

        let path = self.tree.get_path_to_root(person);
        self.tree.expand_path(&path);

        self.tree.set_expanded(person, true);
        let children = self.tree.person(person).children.clone();
        self.tree.expand_path(&children);
    }

    /// Focus on the first person, in index order, whose name matches `query`.
    ///
    /// Returns `None` and leaves the tree untouched when nobody matches.
    pub fn search_and_focus(&mut self, query: &str) -> Option<PersonIdx> {
        let target = self.tree.search_by_name(query).first().copied()?;
        self.focus_on(target);
        Some(target)
    }
}
