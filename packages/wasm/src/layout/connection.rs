//! Marriage and parent-child edge geometry.
//!
//! Edges are straight segments derived from the current positions. Every
//! build starts from empty line lists, so building twice yields the same
//! edges as building once.

use std::collections::HashSet;
use tracing::debug;

use crate::geometry::Segment;
use crate::tree::{FamilyTree, PersonIdx};

/// Builds `marriage_lines` and `child_lines` from positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionEngine;

impl ConnectionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Rebuild every person's edge lists.
    pub fn build(&self, tree: &mut FamilyTree) {
        tree.layout_mut().clear_lines();

        let marriages = Self::build_marriages(tree);
        let children = Self::build_children(tree);

        debug!(marriages, children, "connections built");
    }

    /// One segment per unordered spouse pair, stored on both endpoints.
    fn build_marriages(tree: &mut FamilyTree) -> usize {
        let (people, state) = tree.parts_mut();
        let mut seen: HashSet<(PersonIdx, PersonIdx)> = HashSet::new();

        for (slot, person) in people.iter().enumerate() {
            let idx = PersonIdx(slot as u32);
            for &spouse in &person.spouses {
                if !seen.insert((idx.min(spouse), idx.max(spouse))) {
                    continue;
                }

                let line = Segment::new(state.position(idx), state.position(spouse));
                state.push_marriage_line(idx, line);
                state.push_marriage_line(spouse, line);
            }
        }

        seen.len()
    }

    /// One segment per structural child of every expanded parent.
    ///
    /// When the child's recorded father and mother are mutual spouses, the segment
    /// starts halfway between them on the father's row and is stored on both;
    /// otherwise it starts at the structural parent and is stored there.
    fn build_children(tree: &mut FamilyTree) -> usize {
        let (people, state) = tree.parts_mut();
        let mut count = 0;

        for (slot, person) in people.iter().enumerate() {
            let parent = PersonIdx(slot as u32);
            if !state.is_expanded(parent) {
                continue;
            }

            for &child in &person.children {
                let record = &people[child.slot()];
                let target = state.position(child);

                match (record.father, record.mother) {
                    (Some(father), Some(mother))
                        if people[father.slot()].spouses.contains(&mother)
                            && people[mother.slot()].spouses.contains(&father) =>
                    {
                        let origin = state
                            .position(father)
                            .horizontal_midpoint(state.position(mother));
                        let line = Segment::new(origin, target);
                        state.push_child_line(father, line);
                        state.push_child_line(mother, line);
                    }
                    _ => {
                        let origin = state.position(parent);
                        state.push_child_line(parent, Segment::new(origin, target));
                    }
                }
                count += 1;
            }
        }

        count
    }
}
