//! Person record and related identity types.
//!
//! A person carries identity data and relation edges only. Every relation is
//! a [`PersonIdx`] resolved through the owning [`FamilyTree`](super::FamilyTree);
//! computed coordinates live in the tree's layout side table instead.

use serde::Serialize;
use std::fmt;

/// Stable arena handle for a person.
///
/// Handles are assigned in insertion order and never reused, so the raw value
/// doubles as the person's position in index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PersonIdx(pub u32);

impl PersonIdx {
    /// Create a new PersonIdx from a raw u32.
    #[inline]
    pub fn new(idx: u32) -> Self {
        Self(idx)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Arena slot as a usize.
    #[inline]
    pub fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PersonIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Person({})", self.0)
    }
}

impl From<u32> for PersonIdx {
    #[inline]
    fn from(idx: u32) -> Self {
        Self(idx)
    }
}

impl From<PersonIdx> for u32 {
    #[inline]
    fn from(idx: PersonIdx) -> Self {
        idx.0
    }
}

/// Great house a person belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum House {
    Stark,
    Targaryen,
    Lannister,
    Baratheon,
    Tully,
    /// Any house without a dedicated variant.
    Other(String),
}

impl House {
    /// Display name of the house.
    pub fn as_str(&self) -> &str {
        match self {
            House::Stark => "Stark",
            House::Targaryen => "Targaryen",
            House::Lannister => "Lannister",
            House::Baratheon => "Baratheon",
            House::Tully => "Tully",
            House::Other(name) => name,
        }
    }

    /// Palette color used for the house's nodes.
    pub fn color(&self) -> &'static str {
        match self {
            House::Stark => "#9bb0c1",
            House::Targaryen => "#c0392b",
            House::Lannister => "#f1c40f",
            House::Baratheon => "#f39c12",
            House::Tully => "#3498db",
            House::Other(_) => "#888",
        }
    }
}

impl From<&str> for House {
    fn from(name: &str) -> Self {
        match name {
            "Stark" => House::Stark,
            "Targaryen" => House::Targaryen,
            "Lannister" => House::Lannister,
            "Baratheon" => House::Baratheon,
            "Tully" => House::Tully,
            other => House::Other(other.to_string()),
        }
    }
}

impl fmt::Display for House {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Palette color for an optional house. People without a house get a neutral grey.
pub fn house_color(house: Option<&House>) -> &'static str {
    house.map_or("#666", House::color)
}

/// A member of the family tree.
#[derive(Debug, Clone)]
pub struct Person {
    /// External identifier, unique within a tree.
    pub person_id: String,
    pub name: String,
    pub house: Option<House>,
    /// Marks anchor nodes that are not real people (e.g. a world root).
    pub synthetic: bool,

    /// Recorded father. Lookup only, may differ from the structural parent.
    pub father: Option<PersonIdx>,
    /// Recorded mother. Lookup only, may differ from the structural parent.
    pub mother: Option<PersonIdx>,
    /// Structural descendants, in layout order.
    pub children: Vec<PersonIdx>,
    /// Spouses. Intended to be symmetric, not enforced.
    pub spouses: Vec<PersonIdx>,
}

impl Person {
    /// Create a person with no relations.
    pub fn new(person_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            person_id: person_id.into(),
            name: name.into(),
            house: None,
            synthetic: false,
            father: None,
            mother: None,
            children: Vec::new(),
            spouses: Vec::new(),
        }
    }

    /// Create a synthetic anchor node.
    pub fn synthetic(person_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            synthetic: true,
            ..Self::new(person_id, name)
        }
    }

    /// Builder-style house assignment.
    pub fn with_house(mut self, house: impl Into<House>) -> Self {
        self.house = Some(house.into());
        self
    }

    /// Recorded parent used when walking ancestry (father preferred).
    #[inline]
    pub fn lineage_parent(&self) -> Option<PersonIdx> {
        self.father.or(self.mother)
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.house {
            Some(house) => write!(f, "{} ({})", self.name, house),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_idx() {
        let idx = PersonIdx::new(42);
        assert_eq!(idx.raw(), 42);
        assert_eq!(idx.slot(), 42);
        assert_eq!(format!("{}", idx), "Person(42)");
    }

    #[test]
    fn test_person_idx_conversion() {
        let idx: PersonIdx = 7.into();
        let raw: u32 = idx.into();
        assert_eq!(raw, 7);
    }

    #[test]
    fn test_house_from_name() {
        assert_eq!(House::from("Stark"), House::Stark);
        assert_eq!(House::from("Tyrell"), House::Other("Tyrell".to_string()));
        assert_eq!(House::from("Tyrell").as_str(), "Tyrell");
    }

    #[test]
    fn test_house_colors() {
        assert_eq!(house_color(Some(&House::Targaryen)), "#c0392b");
        assert_eq!(house_color(Some(&House::from("Martell"))), "#888");
        assert_eq!(house_color(None), "#666");
    }

    #[test]
    fn test_lineage_parent_prefers_father() {
        let mut p = Person::new("c", "Child");
        p.mother = Some(PersonIdx(2));
        assert_eq!(p.lineage_parent(), Some(PersonIdx(2)));
        p.father = Some(PersonIdx(1));
        assert_eq!(p.lineage_parent(), Some(PersonIdx(1)));
    }

    #[test]
    fn test_display() {
        let p = Person::new("s2", "Jon Snow").with_house("Stark");
        assert_eq!(p.to_string(), "Jon Snow (Stark)");
        assert_eq!(Person::synthetic("world", "Westeros").to_string(), "Westeros");
    }
}
