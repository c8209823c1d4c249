//! The fixed batch pipeline: validate, lay out, place spouses, build edges,
//! resolve collisions.
//!
//! Stage order is a contract. Spouse placement needs the tree layout's
//! anchors, edges need both, and collision resolution moves `x` once more
//! after edges are built. By default the edges therefore describe the
//! pre-collision positions; set
//! [`PipelineConfig::rebuild_connections_after_collision`] to rebuild them
//! from the final positions instead.

use petgraph::algo::is_cyclic_directed;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, error, warn};

use super::{
    CollisionConfig, CollisionEngine, ConnectionEngine, SpouseLayoutConfig, SpouseLayoutEngine,
    TreeLayoutConfig, TreeLayoutEngine,
};
use crate::error::PipelineError;
use crate::tree::FamilyTree;
use crate::validate::{ValidationReport, validate};

/// Tunables for every pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub layout: TreeLayoutConfig,
    pub spouse: SpouseLayoutConfig,
    pub collision: CollisionConfig,
    /// Run the connection stage a second time after collision resolution.
    pub rebuild_connections_after_collision: bool,
}

/// Runs every stage over a whole tree.
#[derive(Debug, Clone, Default)]
pub struct LayoutPipeline {
    config: PipelineConfig,
    tree_layout: TreeLayoutEngine,
    spouse_layout: SpouseLayoutEngine,
    connections: ConnectionEngine,
    collisions: CollisionEngine,
}

impl LayoutPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            tree_layout: TreeLayoutEngine::new(config.layout),
            spouse_layout: SpouseLayoutEngine::new(config.spouse),
            connections: ConnectionEngine::new(),
            collisions: CollisionEngine::new(config.collision),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Validate `tree` and, when it has no errors, run every layout stage.
    ///
    /// # Errors
    /// Returns [`PipelineError::InvalidTree`] if validation reports errors, and
    /// [`PipelineError::DetachedCycle`] if the `children` graph is cyclic where
    /// validation does not look. The layout state is left untouched in both cases.
    pub fn run(&self, tree: &mut FamilyTree) -> Result<ValidationReport, PipelineError> {
        let _span = debug_span!("layout_pipeline", people = tree.len()).entered();

        let report = validate(tree);
        for warning in &report.warnings {
            warn!(subject = %warning.subject, "{}", warning.message);
        }
        if !report.is_valid() {
            error!(errors = report.errors.len(), "refusing to lay out an invalid tree");
            return Err(PipelineError::InvalidTree(report));
        }
        // Collision shifts walk `children` from every slot, not only the root's.
        if is_cyclic_directed(&tree.structure_graph()) {
            error!("refusing to lay out a tree with a detached children cycle");
            return Err(PipelineError::DetachedCycle);
        }

        self.tree_layout.layout(tree);
        self.spouse_layout.layout(tree);
        self.connections.build(tree);
        self.collisions.resolve(tree);

        if self.config.rebuild_connections_after_collision {
            debug!("rebuilding connections from post-collision positions");
            self.connections.build(tree);
        }

        Ok(report)
    }
}
