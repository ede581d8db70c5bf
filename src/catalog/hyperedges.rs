//! Design-level hyperedges of the catalog (spec.md §3): Struct and Set.

use serde::{Deserialize, Serialize};

use super::AtomId;

/// `Struct(name, elements, anchor)` — a typed record (spec.md §3: "two
/// disjoint sets of atoms"). `elements` holds the record's non-anchor body
/// atoms; `anchor` holds the distinguished atoms that identify it. A
/// Struct's full membership is `elements ∪ anchor` — the two fields are
/// stored separately and never overlap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructEdge {
    pub name: String,
    pub elements: Vec<AtomId>,
    pub anchor: Vec<AtomId>,
}

impl StructEdge {
    pub fn is_anchor(&self, atom: AtomId) -> bool {
        self.anchor.contains(&atom)
    }

    /// The non-anchor elements — since `elements` and `anchor` are stored
    /// disjoint, this is just `elements` itself; kept as a named accessor so
    /// call sites read as "the body, as opposed to the anchor."
    pub fn non_anchor_elements(&self) -> impl Iterator<Item = &AtomId> {
        self.elements.iter()
    }

    /// Every atom the Struct names, anchor and body together.
    pub fn all_atoms(&self) -> impl Iterator<Item = &AtomId> {
        self.elements.iter().chain(self.anchor.iter())
    }
}

/// A Set's contents: either a list of Structs sharing that Set (siblings of
/// a generalization, per spec.md §3 "must differ by at least one class
/// related via generalization"), or a single bare Class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SetContents {
    Structs(Vec<super::EdgeId>),
    Class(AtomId),
}

/// `Set(name, contents)` — an ordered collection (table, array, nested
/// collection).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetEdge {
    pub name: String,
    pub contents: SetContents,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Hyperedge {
    Struct(StructEdge),
    Set(SetEdge),
}

impl Hyperedge {
    pub fn name(&self) -> &str {
        match self {
            Hyperedge::Struct(s) => &s.name,
            Hyperedge::Set(s) => &s.name,
        }
    }

    pub fn as_struct(&self) -> Option<&StructEdge> {
        match self {
            Hyperedge::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&SetEdge> {
        match self {
            Hyperedge::Set(s) => Some(s),
            _ => None,
        }
    }
}
