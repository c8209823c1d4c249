//! Per-run layout side table.
//!
//! The layout pipeline never writes to [`Person`](super::Person) records. All
//! computed view state lives here, in Structure of Arrays layout indexed by
//! arena slot. Positions survive between runs so that descendants of a
//! collapsed node keep their last coordinates; edge geometry and spouse
//! placements are rebuilt by the stage that owns them.

use crate::geometry::{Point, Segment, Size};

use super::PersonIdx;

/// A spouse placed next to an anchor, as seen from one endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpousePlacement {
    /// The other person of the couple.
    pub partner: PersonIdx,
    /// Where the partner was placed (or anchored) during spouse layout.
    pub at: Point,
}

/// Computed layout state for every person of a tree.
#[derive(Debug, Clone, Default)]
pub struct LayoutState {
    /// X positions (SoA layout)
    pos_x: Vec<f64>,

    /// Y positions (SoA layout)
    pos_y: Vec<f64>,

    /// Subtree width in layout units, from the last width pass
    subtree_width: Vec<u32>,

    /// Display state: whether descendants take part in layout
    expanded: Vec<bool>,

    /// Visual footprint used for collision checks
    footprint: Vec<Size>,

    /// Spouse placements recorded on both endpoints
    spouse_positions: Vec<Vec<SpousePlacement>>,

    /// Marriage segments touching each person
    marriage_lines: Vec<Vec<Segment>>,

    /// Parent-to-child segments owned by each person
    child_lines: Vec<Vec<Segment>>,
}

impl LayoutState {
    /// Reserve a default slot for a newly inserted person.
    pub(crate) fn push_default(&mut self) {
        self.pos_x.push(0.0);
        self.pos_y.push(0.0);
        self.subtree_width.push(0);
        self.expanded.push(true);
        self.footprint.push(Size::default());
        self.spouse_positions.push(Vec::new());
        self.marriage_lines.push(Vec::new());
        self.child_lines.push(Vec::new());
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.pos_x.len()
    }

    /// Whether the table has no slots.
    pub fn is_empty(&self) -> bool {
        self.pos_x.is_empty()
    }

    // =========================================================================
    // Positions
    // =========================================================================

    #[inline]
    pub fn x(&self, idx: PersonIdx) -> f64 {
        self.pos_x[idx.slot()]
    }

    #[inline]
    pub fn y(&self, idx: PersonIdx) -> f64 {
        self.pos_y[idx.slot()]
    }

    /// Current position of a person.
    #[inline]
    pub fn position(&self, idx: PersonIdx) -> Point {
        Point::new(self.pos_x[idx.slot()], self.pos_y[idx.slot()])
    }

    #[inline]
    pub fn set_x(&mut self, idx: PersonIdx, x: f64) {
        self.pos_x[idx.slot()] = x;
    }

    #[inline]
    pub fn set_y(&mut self, idx: PersonIdx, y: f64) {
        self.pos_y[idx.slot()] = y;
    }

    #[inline]
    pub fn set_position(&mut self, idx: PersonIdx, at: Point) {
        self.pos_x[idx.slot()] = at.x;
        self.pos_y[idx.slot()] = at.y;
    }

    /// Move a person horizontally by `dx`.
    #[inline]
    pub fn shift_x(&mut self, idx: PersonIdx, dx: f64) {
        self.pos_x[idx.slot()] += dx;
    }

    /// Get X positions slice.
    pub fn positions_x(&self) -> &[f64] {
        &self.pos_x
    }

    /// Get Y positions slice.
    pub fn positions_y(&self) -> &[f64] {
        &self.pos_y
    }

    // =========================================================================
    // Width units and display state
    // =========================================================================

    /// Subtree width in layout units from the last width pass.
    #[inline]
    pub fn subtree_width(&self, idx: PersonIdx) -> u32 {
        self.subtree_width[idx.slot()]
    }

    #[inline]
    pub(crate) fn set_subtree_width(&mut self, idx: PersonIdx, units: u32) {
        self.subtree_width[idx.slot()] = units;
    }

    #[inline]
    pub fn is_expanded(&self, idx: PersonIdx) -> bool {
        self.expanded[idx.slot()]
    }

    #[inline]
    pub fn set_expanded(&mut self, idx: PersonIdx, expanded: bool) {
        self.expanded[idx.slot()] = expanded;
    }

    /// Collapse every slot.
    pub fn collapse_all(&mut self) {
        self.expanded.fill(false);
    }

    /// Expand every slot.
    pub fn expand_all(&mut self) {
        self.expanded.fill(true);
    }

    #[inline]
    pub fn footprint(&self, idx: PersonIdx) -> Size {
        self.footprint[idx.slot()]
    }

    #[inline]
    pub fn set_footprint(&mut self, idx: PersonIdx, size: Size) {
        self.footprint[idx.slot()] = size;
    }

    // =========================================================================
    // Spouse placements and edge geometry
    // =========================================================================

    pub fn spouse_positions(&self, idx: PersonIdx) -> &[SpousePlacement] {
        &self.spouse_positions[idx.slot()]
    }

    pub(crate) fn push_spouse_position(&mut self, idx: PersonIdx, placement: SpousePlacement) {
        self.spouse_positions[idx.slot()].push(placement);
    }

    pub(crate) fn clear_spouse_positions(&mut self) {
        self.spouse_positions.iter_mut().for_each(Vec::clear);
    }

    pub fn marriage_lines(&self, idx: PersonIdx) -> &[Segment] {
        &self.marriage_lines[idx.slot()]
    }

    pub fn child_lines(&self, idx: PersonIdx) -> &[Segment] {
        &self.child_lines[idx.slot()]
    }

    pub(crate) fn push_marriage_line(&mut self, idx: PersonIdx, line: Segment) {
        self.marriage_lines[idx.slot()].push(line);
    }

    pub(crate) fn push_child_line(&mut self, idx: PersonIdx, line: Segment) {
        self.child_lines[idx.slot()].push(line);
    }

    pub(crate) fn clear_lines(&mut self) {
        self.marriage_lines.iter_mut().for_each(Vec::clear);
        self.child_lines.iter_mut().for_each(Vec::clear);
    }
}
