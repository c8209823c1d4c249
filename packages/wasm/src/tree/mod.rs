//! Family tree data model.
//!
//! This module provides the person arena and registry ([`FamilyTree`]), the
//! identity records ([`Person`]) and the per-run layout side table
//! ([`LayoutState`]) that the pipeline stages write into.

mod family;
mod person;
mod state;

pub use family::FamilyTree;
pub use person::{House, Person, PersonIdx, house_color};
pub use state::{LayoutState, SpousePlacement};
