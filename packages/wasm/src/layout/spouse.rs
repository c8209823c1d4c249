//! Spouse placement beside already laid out anchors.
//!
//! A single pass over the tree in index order. The first unvisited person with
//! spouses becomes an anchor at its current position, and each of its
//! unvisited spouses is placed on the anchor's row, alternating right and left
//! at growing multiples of `spouse_spacing`:
//!
//! ```text
//!   spouse #:   4     2     A     1     3
//!   offset:   -2s   -1s     0   +1s   +2s
//! ```
//!
//! Requires [`TreeLayoutEngine`](super::TreeLayoutEngine) to have run. Anchors
//! are never moved; only the spouses placed next to them are.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::geometry::Point;
use crate::tree::{FamilyTree, PersonIdx, SpousePlacement};

/// Configuration for spouse placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpouseLayoutConfig {
    /// Horizontal distance between an anchor and its nearest spouses.
    pub spouse_spacing: f64,
}

impl Default for SpouseLayoutConfig {
    fn default() -> Self {
        Self {
            spouse_spacing: 1.2,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpouseLayoutEngine {
    config: SpouseLayoutConfig,
}

impl SpouseLayoutEngine {
    pub fn new(config: SpouseLayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SpouseLayoutConfig {
        &self.config
    }

    /// Place spouses and record each placement on both endpoints.
    pub fn layout(&self, tree: &mut FamilyTree) {
        let (people, state) = tree.parts_mut();
        state.clear_spouse_positions();

        let mut visited = HashSet::new();
        let mut placed = 0usize;

        for (slot, person) in people.iter().enumerate() {
            let anchor = PersonIdx(slot as u32);
            if visited.contains(&anchor) || person.spouses.is_empty() {
                continue;
            }

            let base = state.position(anchor);
            let mut offset_index: i32 = 1;
            let mut direction: i32 = 1;

            for &spouse in &person.spouses {
                if visited.contains(&spouse) {
                    continue;
                }

                let at = Point::new(
                    base.x + f64::from(direction * offset_index) * self.config.spouse_spacing,
                    base.y,
                );
                state.set_position(spouse, at);

                state.push_spouse_position(anchor, SpousePlacement { partner: spouse, at });
                state.push_spouse_position(spouse, SpousePlacement { partner: anchor, at: base });

                visited.insert(spouse);
                placed += 1;

                direction = -direction;
                if direction > 0 {
                    offset_index += 1;
                }
            }

            visited.insert(anchor);
        }

        debug!(placed, "spouse layout done");
    }
}
