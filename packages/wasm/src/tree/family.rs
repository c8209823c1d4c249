//! FamilyTree - identity-indexed person registry.
//!
//! The tree owns every [`Person`] in an arena ordered by insertion. Relations
//! between people are [`PersonIdx`] handles into that arena, and the external
//! `person_id` is resolved through a hash index. Insertion order is the index
//! order every pipeline stage iterates in.

use petgraph::graphmap::DiGraphMap;
use std::collections::{HashMap, HashSet};

use super::person::{House, Person, PersonIdx};
use super::state::LayoutState;
use crate::error::TreeError;

/// A genealogical tree: a designated root plus the person arena.
#[derive(Debug, Clone)]
pub struct FamilyTree {
    /// The designated root (always slot 0).
    root: PersonIdx,

    /// Person arena, in insertion order.
    people: Vec<Person>,

    /// Map from external person_id to arena slot
    id_to_idx: HashMap<String, PersonIdx>,

    /// Computed view state, refreshed by the layout pipeline
    layout: LayoutState,
}

impl FamilyTree {
    /// Create a tree containing only its root.
    pub fn new(root: Person) -> Self {
        Self::with_capacity(root, 1)
    }

    /// Create a tree with pre-allocated capacity.
    pub fn with_capacity(root: Person, capacity: usize) -> Self {
        let mut tree = Self {
            root: PersonIdx(0),
            people: Vec::with_capacity(capacity),
            id_to_idx: HashMap::with_capacity(capacity),
            layout: LayoutState::default(),
        };
        tree.insert(root);
        tree
    }

    fn insert(&mut self, person: Person) -> PersonIdx {
        let idx = PersonIdx(self.people.len() as u32);
        self.id_to_idx.insert(person.person_id.clone(), idx);
        self.people.push(person);
        self.layout.push_default();
        idx
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Register a person.
    ///
    /// # Errors
    /// Returns [`TreeError::DuplicateId`] if the `person_id` is already taken.
    pub fn add_person(&mut self, person: Person) -> Result<PersonIdx, TreeError> {
        if self.id_to_idx.contains_key(&person.person_id) {
            return Err(TreeError::DuplicateId(person.person_id));
        }
        Ok(self.insert(person))
    }

    /// Return the person registered under `person_id`, registering a new one
    /// when the id is unknown.
    pub fn get_or_insert_person(
        &mut self,
        person_id: &str,
        name: &str,
        house: Option<House>,
    ) -> PersonIdx {
        if let Some(&idx) = self.id_to_idx.get(person_id) {
            return idx;
        }
        let mut person = Person::new(person_id, name);
        person.house = house;
        self.insert(person)
    }

    /// Look up a person by external id.
    pub fn get(&self, person_id: &str) -> Option<&Person> {
        self.lookup(person_id).map(|idx| &self.people[idx.slot()])
    }

    /// Resolve an external id to its arena handle.
    pub fn lookup(&self, person_id: &str) -> Option<PersonIdx> {
        self.id_to_idx.get(person_id).copied()
    }

    /// Resolve an external id, failing with [`TreeError::UnknownPerson`].
    pub fn require(&self, person_id: &str) -> Result<PersonIdx, TreeError> {
        self.lookup(person_id)
            .ok_or_else(|| TreeError::UnknownPerson(person_id.to_string()))
    }

    /// The designated root.
    #[inline]
    pub fn root(&self) -> PersonIdx {
        self.root
    }

    /// Get a person by handle.
    #[inline]
    pub fn person(&self, idx: PersonIdx) -> &Person {
        &self.people[idx.slot()]
    }

    /// Mutable access to a person's record, for tree assembly.
    #[inline]
    pub fn person_mut(&mut self, idx: PersonIdx) -> &mut Person {
        &mut self.people[idx.slot()]
    }

    /// Number of registered people.
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Always false: a tree contains at least its root.
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// People in index order.
    pub fn iter(&self) -> impl Iterator<Item = (PersonIdx, &Person)> {
        self.people
            .iter()
            .enumerate()
            .map(|(i, p)| (PersonIdx(i as u32), p))
    }

    /// Handles in index order.
    pub fn indices(&self) -> impl Iterator<Item = PersonIdx> + use<> {
        (0..self.people.len() as u32).map(PersonIdx)
    }

    /// All person records, in index order.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    // =========================================================================
    // Relations
    // =========================================================================

    /// Attach `child` under `parent` and record its father and mother.
    ///
    /// The structural edge and the parent annotations are independent writes:
    /// the child is appended only if not already listed, while `father` and
    /// `mother` are overwritten whenever supplied.
    pub fn add_child(
        &mut self,
        parent: PersonIdx,
        child: PersonIdx,
        father: Option<PersonIdx>,
        mother: Option<PersonIdx>,
    ) {
        let children = &mut self.people[parent.slot()].children;
        if !children.contains(&child) {
            children.push(child);
        }

        let record = &mut self.people[child.slot()];
        if father.is_some() {
            record.father = father;
        }
        if mother.is_some() {
            record.mother = mother;
        }
    }

    /// Link two people as spouses, on both sides. Idempotent.
    pub fn add_spouse(&mut self, a: PersonIdx, b: PersonIdx) {
        if !self.people[a.slot()].spouses.contains(&b) {
            self.people[a.slot()].spouses.push(b);
        }
        if !self.people[b.slot()].spouses.contains(&a) {
            self.people[b.slot()].spouses.push(a);
        }
    }

    /// Whether `b` is listed among `a`'s spouses.
    #[inline]
    pub fn is_spouse_of(&self, a: PersonIdx, b: PersonIdx) -> bool {
        self.people[a.slot()].spouses.contains(&b)
    }

    /// Directed graph of the structural `children` edges, over every person.
    ///
    /// Outgoing neighbors keep the `children` order.
    pub fn structure_graph(&self) -> DiGraphMap<PersonIdx, ()> {
        let mut graph = DiGraphMap::with_capacity(self.people.len(), self.people.len());
        for idx in self.indices() {
            graph.add_node(idx);
        }
        for (idx, person) in self.iter() {
            for &child in &person.children {
                graph.add_edge(idx, child, ());
            }
        }
        graph
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// All people whose name contains `query`, case-insensitively, in index order.
    pub fn search_by_name(&self, query: &str) -> Vec<PersonIdx> {
        let query = query.to_lowercase();
        self.iter()
            .filter(|(_, p)| p.name.to_lowercase().contains(&query))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Recorded ancestry of `person`, from the furthest ancestor down to `person`.
    ///
    /// Follows the father, or the mother when no father is recorded. Stops at
    /// the first person seen twice.
    pub fn get_path_to_root(&self, person: PersonIdx) -> Vec<PersonIdx> {
        let mut path = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(person);

        while let Some(idx) = current {
            if !visited.insert(idx) {
                break;
            }
            path.push(idx);
            current = self.people[idx.slot()].lineage_parent();
        }

        path.reverse();
        path
    }

    // =========================================================================
    // Layout state
    // =========================================================================

    /// Computed layout state.
    pub fn layout(&self) -> &LayoutState {
        &self.layout
    }

    /// Mutable layout state.
    pub fn layout_mut(&mut self) -> &mut LayoutState {
        &mut self.layout
    }

    /// Split borrow: read-only records alongside the mutable layout table.
    pub fn parts_mut(&mut self) -> (&[Person], &mut LayoutState) {
        (&self.people, &mut self.layout)
    }

    pub fn set_expanded(&mut self, idx: PersonIdx, expanded: bool) {
        self.layout.set_expanded(idx, expanded);
    }

    /// Flip a person's expanded flag, returning the new value.
    pub fn toggle_expanded(&mut self, idx: PersonIdx) -> bool {
        let expanded = !self.layout.is_expanded(idx);
        self.layout.set_expanded(idx, expanded);
        expanded
    }

    pub fn collapse_all(&mut self) {
        self.layout.collapse_all();
    }

    pub fn expand_all(&mut self) {
        self.layout.expand_all();
    }

    /// Expand every person on `path`.
    pub fn expand_path(&mut self, path: &[PersonIdx]) {
        for &idx in path {
            self.layout.set_expanded(idx, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> FamilyTree {
        FamilyTree::new(Person::synthetic("world", "Westeros"))
    }

    #[test]
    fn test_root_is_indexed() {
        let tree = world();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), PersonIdx(0));
        assert!(tree.get("world").is_some_and(|p| p.synthetic));
        assert_eq!(tree.layout().len(), 1);
    }

    #[test]
    fn test_add_person_rejects_duplicate() {
        let mut tree = world();
        tree.add_person(Person::new("s1", "Lyanna Stark")).unwrap();

        let err = tree.add_person(Person::new("s1", "Someone Else")).unwrap_err();
        assert_eq!(err, TreeError::DuplicateId("s1".to_string()));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get("s1").map(|p| p.name.as_str()), Some("Lyanna Stark"));
    }

    #[test]
    fn test_get_or_insert_person_returns_existing() {
        let mut tree = world();
        let a = tree.get_or_insert_person("t1", "Aegon I", Some(House::Targaryen));
        let b = tree.get_or_insert_person("t1", "Ignored", None);
        assert_eq!(a, b);
        assert_eq!(tree.person(a).name, "Aegon I");
        assert_eq!(tree.person(a).house, Some(House::Targaryen));
    }

    #[test]
    fn test_require_unknown() {
        let tree = world();
        assert_eq!(
            tree.require("nobody"),
            Err(TreeError::UnknownPerson("nobody".to_string()))
        );
    }

    #[test]
    fn test_add_child_is_idempotent_on_edges() {
        let mut tree = world();
        let parent = tree.add_person(Person::new("p", "Parent")).unwrap();
        let child = tree.add_person(Person::new("c", "Child")).unwrap();

        tree.add_child(parent, child, Some(parent), None);
        tree.add_child(parent, child, None, None);

        assert_eq!(tree.person(parent).children, vec![child]);
        assert_eq!(tree.person(child).father, Some(parent));
        assert_eq!(tree.person(child).mother, None);
    }

    #[test]
    fn test_add_child_annotation_may_differ_from_structure() {
        let mut tree = world();
        let cersei = tree.add_person(Person::new("l4", "Cersei")).unwrap();
        let jaime = tree.add_person(Person::new("l3", "Jaime")).unwrap();
        let joffrey = tree.add_person(Person::new("l6", "Joffrey")).unwrap();

        tree.add_child(cersei, joffrey, Some(jaime), Some(cersei));

        assert_eq!(tree.person(cersei).children, vec![joffrey]);
        assert!(tree.person(jaime).children.is_empty());
        assert_eq!(tree.person(joffrey).father, Some(jaime));
    }

    #[test]
    fn test_add_spouse_symmetric_and_idempotent() {
        let mut tree = world();
        let a = tree.add_person(Person::new("a", "A")).unwrap();
        let b = tree.add_person(Person::new("b", "B")).unwrap();

        tree.add_spouse(a, b);
        tree.add_spouse(b, a);

        assert_eq!(tree.person(a).spouses, vec![b]);
        assert_eq!(tree.person(b).spouses, vec![a]);
        assert!(tree.is_spouse_of(a, b) && tree.is_spouse_of(b, a));
    }

    #[test]
    fn test_search_by_name_in_index_order() {
        let mut tree = world();
        let robb = tree.add_person(Person::new("s6", "Robb Stark")).unwrap();
        tree.add_person(Person::new("l5", "Tyrion Lannister")).unwrap();
        let sansa = tree.add_person(Person::new("s7", "Sansa Stark")).unwrap();

        assert_eq!(tree.search_by_name("stark"), vec![robb, sansa]);
        assert_eq!(tree.search_by_name("TYRION").len(), 1);
        assert!(tree.search_by_name("Hodor").is_empty());
    }

    #[test]
    fn test_path_to_root_prefers_father() {
        let mut tree = world();
        let rickard = tree.add_person(Person::new("s3", "Rickard")).unwrap();
        let lyanna = tree.add_person(Person::new("s1", "Lyanna")).unwrap();
        let rhaegar = tree.add_person(Person::new("t6", "Rhaegar")).unwrap();
        let jon = tree.add_person(Person::new("s2", "Jon")).unwrap();

        tree.add_child(rickard, lyanna, Some(rickard), None);
        tree.add_child(rhaegar, jon, Some(rhaegar), Some(lyanna));

        assert_eq!(tree.get_path_to_root(jon), vec![rhaegar, jon]);

        // Without a father the walk falls back to the mother.
        tree.person_mut(jon).father = None;
        assert_eq!(tree.get_path_to_root(jon), vec![rickard, lyanna, jon]);
    }

    #[test]
    fn test_path_to_root_stops_on_cycle() {
        let mut tree = world();
        let a = tree.add_person(Person::new("a", "A")).unwrap();
        let b = tree.add_person(Person::new("b", "B")).unwrap();
        tree.person_mut(a).father = Some(b);
        tree.person_mut(b).father = Some(a);

        assert_eq!(tree.get_path_to_root(a), vec![b, a]);
    }

    #[test]
    fn test_structure_graph_preserves_child_order() {
        let mut tree = world();
        let root = tree.root();
        let a = tree.add_person(Person::new("a", "A")).unwrap();
        let b = tree.add_person(Person::new("b", "B")).unwrap();
        tree.add_child(root, b, None, None);
        tree.add_child(root, a, None, None);

        let graph = tree.structure_graph();
        assert_eq!(graph.node_count(), 3);
        let order: Vec<_> = graph.neighbors(root).collect();
        assert_eq!(order, vec![b, a]);
    }

    #[test]
    fn test_toggle_expanded() {
        let mut tree = world();
        let root = tree.root();
        assert!(!tree.toggle_expanded(root));
        assert!(!tree.layout().is_expanded(root));
        assert!(tree.toggle_expanded(root));
    }
}
