//! Serializable view of a laid out tree.
//!
//! This is the data an exporter or renderer reads after the pipeline has run:
//! identity fields with relations as ids, computed positions, and the edge
//! geometry. Marriage edges are deduplicated by their endpoint pair; child
//! edges are listed as built. Timestamps are left to the exporter.

use serde::Serialize;
use std::collections::HashSet;

use crate::geometry::{Point, Segment};
use crate::search::ViewOffset;
use crate::tree::{FamilyTree, PersonIdx};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotMeta {
    /// External id of the root.
    pub root: String,
    pub view: ViewOffset,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotNode {
    pub id: String,
    pub name: String,
    pub house: Option<String>,
    pub synthetic: bool,
    pub x: f64,
    pub y: f64,
    pub expanded: bool,
    pub father: Option<String>,
    pub mother: Option<String>,
    pub children: Vec<String>,
    pub spouses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotEdges {
    pub marriages: Vec<Segment>,
    pub children: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeSnapshot {
    pub meta: SnapshotMeta,
    pub nodes: Vec<SnapshotNode>,
    pub edges: SnapshotEdges,
}

impl TreeSnapshot {
    /// Capture the current state of `tree`.
    pub fn capture(tree: &FamilyTree, view: ViewOffset) -> Self {
        let id_of = |idx: PersonIdx| tree.person(idx).person_id.clone();
        let state = tree.layout();

        let nodes = tree
            .iter()
            .map(|(idx, p)| SnapshotNode {
                id: p.person_id.clone(),
                name: p.name.clone(),
                house: p.house.as_ref().map(|h| h.as_str().to_string()),
                synthetic: p.synthetic,
                x: state.x(idx),
                y: state.y(idx),
                expanded: state.is_expanded(idx),
                father: p.father.map(id_of),
                mother: p.mother.map(id_of),
                children: p.children.iter().copied().map(id_of).collect(),
                spouses: p.spouses.iter().copied().map(id_of).collect(),
            })
            .collect();

        let mut edges = SnapshotEdges::default();
        let mut seen_marriages = HashSet::new();
        for idx in tree.indices() {
            for &line in state.marriage_lines(idx) {
                if seen_marriages.insert(endpoint_key(line)) {
                    edges.marriages.push(line);
                }
            }
            edges.children.extend_from_slice(state.child_lines(idx));
        }

        Self {
            meta: SnapshotMeta {
                root: id_of(tree.root()),
                view,
            },
            nodes,
            edges,
        }
    }
}

/// Order-independent key for a segment's endpoints.
fn endpoint_key(line: Segment) -> [(u64, u64); 2] {
    // Adding 0.0 folds -0.0 into 0.0
    let bits = |p: Point| ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits());
    let (a, b) = (bits(line.from), bits(line.to));
    if a <= b { [a, b] } else { [b, a] }
}
