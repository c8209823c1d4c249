//! Per-generation overlap correction.
//!
//! People are grouped by their exact `y` (one group per generation, in order
//! of first appearance in the index). Each group is sorted by `x` and swept
//! once from left to right: whenever a node's footprint plus `min_gap` reaches
//! past its right neighbor's footprint, that neighbor is pushed right by the
//! overlap, together with its whole structural subtree and the partners
//! recorded in its spouse placements.
//!
//! The sweep is a single forward pass. A shift can push a node into one that
//! was already processed; such overlaps are left as they are.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::tree::{FamilyTree, LayoutState, Person, PersonIdx};

/// Configuration for collision resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Minimum free space between neighboring footprints on a row.
    pub min_gap: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self { min_gap: 0.5 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CollisionEngine {
    config: CollisionConfig,
}

impl CollisionEngine {
    pub fn new(config: CollisionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Resolve collisions level by level. Returns the number of shifts applied.
    pub fn resolve(&self, tree: &mut FamilyTree) -> usize {
        let levels = Self::group_by_level(tree.layout());
        let (people, state) = tree.parts_mut();

        let mut shifts = 0;
        for mut level in levels {
            shifts += self.resolve_level(&mut level, people, state);
        }

        debug!(shifts, "collisions resolved");
        shifts
    }

    /// Group every slot by exact `y`, keeping first-appearance order.
    fn group_by_level(state: &LayoutState) -> Vec<Vec<PersonIdx>> {
        let mut levels: Vec<Vec<PersonIdx>> = Vec::new();
        let mut by_y: HashMap<u64, usize> = HashMap::new();

        for (slot, &y) in state.positions_y().iter().enumerate() {
            // Adding 0.0 folds -0.0 into 0.0 so both share a level
            let key = (y + 0.0).to_bits();
            let level = *by_y.entry(key).or_insert_with(|| {
                levels.push(Vec::new());
                levels.len() - 1
            });
            levels[level].push(PersonIdx(slot as u32));
        }

        levels
    }

    fn resolve_level(
        &self,
        nodes: &mut [PersonIdx],
        people: &[Person],
        state: &mut LayoutState,
    ) -> usize {
        // Stable sort, so equal x keeps index order
        nodes.sort_by(|&a, &b| state.x(a).total_cmp(&state.x(b)));

        let mut shifts = 0;
        for pair in nodes.windows(2) {
            let (left, right) = (pair[0], pair[1]);

            let overlap = (state.x(left) + state.footprint(left).width / 2.0 + self.config.min_gap)
                - (state.x(right) - state.footprint(right).width / 2.0);

            if overlap > 0.0 {
                trace!(%left, %right, overlap, "shifting subtree");
                Self::shift_subtree(right, overlap, people, state);
                shifts += 1;
            }
        }

        shifts
    }

    /// Move `node`, its structural descendants and its recorded spouse
    /// partners right by `dx`.
    fn shift_subtree(node: PersonIdx, dx: f64, people: &[Person], state: &mut LayoutState) {
        state.shift_x(node, dx);

        for &child in &people[node.slot()].children {
            Self::shift_subtree(child, dx, people, state);
        }

        let partners: Vec<PersonIdx> = state
            .spouse_positions(node)
            .iter()
            .map(|placement| placement.partner)
            .collect();
        for partner in partners {
            state.shift_x(partner, dx);
        }
    }
}
