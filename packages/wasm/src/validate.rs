//! Read-only structural checks over a [`FamilyTree`].
//!
//! Validation never fails. It collects two ordered lists of findings:
//! errors, which make layout ill-defined (cycles in the `children` graph),
//! and warnings, which are advisory. Callers must not run the layout stages
//! while errors are present.

use petgraph::visit::{Dfs, DfsEvent, depth_first_search};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::tree::{FamilyTree, PersonIdx};

/// Category of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// A `children` edge leads back into the current traversal stack.
    Cycle,
    /// A child's father and mother both differ from its structural parent.
    ParentLinkMissing,
    /// A spouse link that is not mirrored on the other side.
    OneWaySpouse,
    /// A real, unmarried person the root cannot reach.
    Orphan,
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    /// The person the finding is about.
    pub subject: PersonIdx,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of a validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl ValidationReport {
    /// True when no errors were found. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn clear(&mut self) {
        self.errors.clear();
        self.warnings.clear();
    }
}

/// Structural validator for a family tree.
pub struct FamilyTreeValidator<'a> {
    tree: &'a FamilyTree,
    report: ValidationReport,
}

impl<'a> FamilyTreeValidator<'a> {
    pub fn new(tree: &'a FamilyTree) -> Self {
        Self {
            tree,
            report: ValidationReport::default(),
        }
    }

    /// Run every check, replacing the findings of any previous run.
    pub fn validate(&mut self) -> &ValidationReport {
        self.report.clear();

        self.check_cycles();
        self.check_parent_child_consistency();
        self.check_spouse_consistency();
        self.check_orphans();

        &self.report
    }

    /// Findings of the last run.
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Consume the validator, keeping its findings.
    pub fn into_report(self) -> ValidationReport {
        self.report
    }

    /// Depth-first walk of the `children` graph from the root. Every edge into
    /// a node still on the stack is reported at that node, and that branch is
    /// pruned; nodes already finished are skipped silently.
    fn check_cycles(&mut self) {
        let tree = self.tree;
        let graph = tree.structure_graph();
        let errors = &mut self.report.errors;

        depth_first_search(&graph, Some(tree.root()), |event| {
            if let DfsEvent::BackEdge(_, at) = event {
                errors.push(Finding {
                    kind: FindingKind::Cycle,
                    subject: at,
                    message: format!("Cycle detected at {}", tree.person(at).name),
                });
            }
        });
    }

    fn check_parent_child_consistency(&mut self) {
        for (parent_idx, parent) in self.tree.iter() {
            if parent.synthetic {
                continue;
            }
            for &child_idx in &parent.children {
                let child = self.tree.person(child_idx);
                if child.father != Some(parent_idx) && child.mother != Some(parent_idx) {
                    self.report.warnings.push(Finding {
                        kind: FindingKind::ParentLinkMissing,
                        subject: child_idx,
                        message: format!(
                            "{} listed under {} but parent link not set",
                            child.name, parent.name
                        ),
                    });
                }
            }
        }
    }

    fn check_spouse_consistency(&mut self) {
        for (idx, person) in self.tree.iter() {
            for &spouse_idx in &person.spouses {
                if !self.tree.is_spouse_of(spouse_idx, idx) {
                    self.report.warnings.push(Finding {
                        kind: FindingKind::OneWaySpouse,
                        subject: idx,
                        message: format!(
                            "One-way spouse link: {} -> {}",
                            person.name,
                            self.tree.person(spouse_idx).name
                        ),
                    });
                }
            }
        }
    }

    fn check_orphans(&mut self) {
        let graph = self.tree.structure_graph();
        let mut reachable = HashSet::with_capacity(self.tree.len());
        let mut dfs = Dfs::new(&graph, self.tree.root());
        while let Some(idx) = dfs.next(&graph) {
            reachable.insert(idx);
        }

        for (idx, person) in self.tree.iter() {
            // Spouse-only attachment counts as connected
            if person.synthetic || reachable.contains(&idx) || !person.spouses.is_empty() {
                continue;
            }
            self.report.warnings.push(Finding {
                kind: FindingKind::Orphan,
                subject: idx,
                message: format!("Orphan node: {} (not reachable from root)", person.name),
            });
        }
    }
}

/// Validate a tree in one call.
pub fn validate(tree: &FamilyTree) -> ValidationReport {
    let mut validator = FamilyTreeValidator::new(tree);
    validator.validate();
    validator.into_report()
}
