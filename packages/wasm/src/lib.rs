//! Lineage - WASM Module
//!
//! This module provides the genealogical tree layout and connection
//! resolution pipeline for the Lineage viewer. It is compiled to WebAssembly
//! and exposes a JavaScript-friendly API via wasm-bindgen.
//!
//! # Architecture
//!
//! - `tree`: Person arena, registry and the per-run layout side table
//! - `validate`: Read-only structural checks (cycles, parent links, spouses, orphans)
//! - `layout`: Tree layout, spouse placement, edge geometry, collision correction
//! - `search`: Focus helpers over the expand/collapse state
//! - `snapshot`: Serializable view of a laid out tree for exporters and renderers

use js_sys::Float64Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::console;

pub mod error;
pub mod geometry;
pub mod layout;
pub mod search;
pub mod snapshot;
pub mod tree;
pub mod validate;

pub use error::{PipelineError, TreeError};
pub use layout::{LayoutPipeline, PipelineConfig};
pub use tree::{FamilyTree, House, Person, PersonIdx};
pub use validate::{FamilyTreeValidator, ValidationReport};

use geometry::Size;
use search::{SearchController, ViewOffset, Viewport};
use snapshot::TreeSnapshot;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Main entry point for the family tree.
///
/// This struct wraps a [`FamilyTree`] and its [`LayoutPipeline`] and provides
/// the public API exposed to JavaScript. People are addressed by their
/// external `person_id` strings.
#[wasm_bindgen]
pub struct LineageWasm {
    tree: FamilyTree,
    pipeline: LayoutPipeline,
}

#[wasm_bindgen]
impl LineageWasm {
    /// Create a tree containing only its root.
    #[wasm_bindgen(constructor)]
    pub fn new(root_id: &str, root_name: &str, synthetic: bool) -> Self {
        let root = if synthetic {
            Person::synthetic(root_id, root_name)
        } else {
            Person::new(root_id, root_name)
        };
        Self {
            tree: FamilyTree::new(root),
            pipeline: LayoutPipeline::default(),
        }
    }

    // =========================================================================
    // Tree Assembly
    // =========================================================================

    /// Register a person.
    ///
    /// Returns the person's slot in index order. Fails on a duplicate id.
    #[wasm_bindgen(js_name = addPerson)]
    pub fn add_person(
        &mut self,
        person_id: &str,
        name: &str,
        house: Option<String>,
    ) -> Result<u32, JsError> {
        let mut person = Person::new(person_id, name);
        person.house = house.as_deref().map(House::from);
        Ok(self.tree.add_person(person)?.raw())
    }

    /// Attach `child` under `parent`, optionally recording father and mother.
    #[wasm_bindgen(js_name = addChild)]
    pub fn add_child(
        &mut self,
        parent: &str,
        child: &str,
        father: Option<String>,
        mother: Option<String>,
    ) -> Result<(), JsError> {
        let parent = self.tree.require(parent)?;
        let child = self.tree.require(child)?;
        let father = father.map(|id| self.tree.require(&id)).transpose()?;
        let mother = mother.map(|id| self.tree.require(&id)).transpose()?;
        self.tree.add_child(parent, child, father, mother);
        Ok(())
    }

    /// Link two people as spouses.
    #[wasm_bindgen(js_name = addSpouse)]
    pub fn add_spouse(&mut self, a: &str, b: &str) -> Result<(), JsError> {
        let a = self.tree.require(a)?;
        let b = self.tree.require(b)?;
        self.tree.add_spouse(a, b);
        Ok(())
    }

    /// Get the number of people in the tree.
    #[wasm_bindgen(js_name = personCount)]
    pub fn person_count(&self) -> u32 {
        self.tree.len() as u32
    }

    /// Ids of everyone whose name contains `query`, in index order.
    #[wasm_bindgen(js_name = searchByName)]
    pub fn search_by_name(&self, query: &str) -> Vec<String> {
        self.tree
            .search_by_name(query)
            .into_iter()
            .map(|idx| self.tree.person(idx).person_id.clone())
            .collect()
    }

    // =========================================================================
    // Display State
    // =========================================================================

    /// Expand or collapse a person. Rerun the pipeline afterwards.
    #[wasm_bindgen(js_name = setExpanded)]
    pub fn set_expanded(&mut self, person_id: &str, expanded: bool) -> Result<(), JsError> {
        let idx = self.tree.require(person_id)?;
        self.tree.set_expanded(idx, expanded);
        Ok(())
    }

    /// Flip a person's expanded flag and return the new value.
    #[wasm_bindgen(js_name = toggleExpanded)]
    pub fn toggle_expanded(&mut self, person_id: &str) -> Result<bool, JsError> {
        let idx = self.tree.require(person_id)?;
        Ok(self.tree.toggle_expanded(idx))
    }

    /// Set the footprint collision resolution reserves for a person.
    #[wasm_bindgen(js_name = setFootprint)]
    pub fn set_footprint(&mut self, person_id: &str, width: f64, height: f64) -> Result<(), JsError> {
        let idx = self.tree.require(person_id)?;
        self.tree.layout_mut().set_footprint(idx, Size { width, height });
        Ok(())
    }

    /// Expand everyone.
    #[wasm_bindgen(js_name = expandAll)]
    pub fn expand_all(&mut self) {
        self.tree.expand_all();
    }

    /// Focus the first name match; returns its id, or undefined.
    #[wasm_bindgen(js_name = searchAndFocus)]
    pub fn search_and_focus(&mut self, query: &str) -> Option<String> {
        let found = SearchController::new(&mut self.tree).search_and_focus(query)?;
        Some(self.tree.person(found).person_id.clone())
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    /// Replace the pipeline configuration.
    ///
    /// Accepts a partial object; missing fields keep their defaults.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsError> {
        let config: PipelineConfig = serde_wasm_bindgen::from_value(config)?;
        self.pipeline = LayoutPipeline::new(config);
        Ok(())
    }

    /// Validate without touching the layout. Returns `{ errors, warnings }`.
    pub fn validate(&self) -> Result<JsValue, JsError> {
        to_js(&validate::validate(&self.tree))
    }

    /// Run the whole layout pipeline.
    ///
    /// Returns the validation report. Fails, without changing any position,
    /// when the tree has structural errors.
    #[wasm_bindgen(js_name = runPipeline)]
    pub fn run_pipeline(&mut self) -> Result<JsValue, JsError> {
        match self.pipeline.run(&mut self.tree) {
            Ok(report) => to_js(&report),
            Err(err) => {
                console::error_1(&JsValue::from_str(&err.to_string()));
                Err(err.into())
            }
        }
    }

    // =========================================================================
    // Layout Access
    // =========================================================================

    /// Positions as [x0, y0, x1, y1, ...] in index order.
    #[wasm_bindgen(js_name = getPositions)]
    pub fn get_positions(&self) -> Float64Array {
        Float64Array::from(&interleave_positions(&self.tree)[..])
    }

    /// View offset [dx, dy] that centers a person in a 20 x 15 viewport.
    #[wasm_bindgen(js_name = viewOffsetFor)]
    pub fn view_offset_for(&self, person_id: &str) -> Result<Vec<f64>, JsError> {
        let idx = self.tree.require(person_id)?;
        let offset = ViewOffset::centered_on(self.tree.layout().position(idx), Viewport::default());
        Ok(vec![offset.dx, offset.dy])
    }

    /// Nodes and edges of the current layout, for exporters and renderers.
    pub fn snapshot(&self, view_dx: f64, view_dy: f64) -> Result<JsValue, JsError> {
        to_js(&TreeSnapshot::capture(&self.tree, ViewOffset::new(view_dx, view_dy)))
    }
}

/// Serialize to a plain JS object, with `None` as `null`.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

/// Interleave x and y into [x0, y0, x1, y1, ...].
fn interleave_positions(tree: &FamilyTree) -> Vec<f64> {
    let state = tree.layout();
    let mut positions = Vec::with_capacity(state.len() * 2);
    for (x, y) in state.positions_x().iter().zip(state.positions_y()) {
        positions.push(*x);
        positions.push(*y);
    }
    positions
}
