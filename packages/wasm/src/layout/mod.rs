//! Layout stages for family trees.
//!
//! Each stage reads the tree's person records and writes into its layout side
//! table. The stages are meant to run in a fixed order, which
//! [`LayoutPipeline`] enforces: tree layout, spouse placement, connections,
//! collision resolution.

pub mod collision;
pub mod connection;
pub mod pipeline;
pub mod spouse;
pub mod tree_layout;

pub use collision::{CollisionConfig, CollisionEngine};
pub use connection::ConnectionEngine;
pub use pipeline::{LayoutPipeline, PipelineConfig};
pub use spouse::{SpouseLayoutConfig, SpouseLayoutEngine};
pub use tree_layout::{TreeLayoutConfig, TreeLayoutEngine};
