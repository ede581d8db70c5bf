//! Domain-level nodes of the catalog hypergraph (spec.md §3).

use serde::{Deserialize, Serialize};

use super::AtomId;

/// The scalar type and size of an attribute's column, matching the
/// `data-type, size` pair from the domain file (spec.md §6).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Float,
    Boolean,
    Date,
    Timestamp,
    /// Character data with a maximum length carried on `AttributeAtom::size`.
    Varchar,
    /// Schema-generator-only: a JSON document column (JSON_NESTED paradigm).
    /// Never produced by the Loader, since no domain file names it directly.
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multiplicity {
    pub min: u32,
    pub max: Option<u32>,
}

impl Multiplicity {
    pub fn is_mandatory(&self) -> bool {
        self.min >= 1
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassAtom {
    pub name: String,
    pub instance_count: u64,
    pub attributes: Vec<AtomId>,
    pub superclass: Option<AtomId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeAtom {
    pub name: String,
    pub owning_class: AtomId,
    pub data_type: DataType,
    pub size: u32,
    pub distinct_values: u64,
    pub is_identifier: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssociationEndAtom {
    pub name: String,
    pub referenced_class: AtomId,
    pub role_name: String,
    pub multiplicity: Multiplicity,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssociationAtom {
    pub name: String,
    pub ends: [AtomId; 2],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneralizationAtom {
    pub name: String,
    pub superclass: AtomId,
    /// (subclass, constraint-predicate) pairs, per spec.md §3.
    pub subclasses: Vec<(AtomId, String)>,
    pub disjoint: bool,
    pub complete: bool,
}

/// Closed sum type over every domain atom kind (Design Notes §9: "tagged
/// variants rather than inheritance").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Atom {
    Class(ClassAtom),
    Attribute(AttributeAtom),
    AssociationEnd(AssociationEndAtom),
    Association(AssociationAtom),
    Generalization(GeneralizationAtom),
}

impl Atom {
    pub fn name(&self) -> &str {
        match self {
            Atom::Class(a) => &a.name,
            Atom::Attribute(a) => &a.name,
            Atom::AssociationEnd(a) => &a.name,
            Atom::Association(a) => &a.name,
            Atom::Generalization(a) => &a.name,
        }
    }

    pub fn as_class(&self) -> Option<&ClassAtom> {
        match self {
            Atom::Class(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&AttributeAtom> {
        match self {
            Atom::Attribute(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_association_end(&self) -> Option<&AssociationEndAtom> {
        match self {
            Atom::AssociationEnd(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_association(&self) -> Option<&AssociationAtom> {
        match self {
            Atom::Association(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_generalization(&self) -> Option<&GeneralizationAtom> {
        match self {
            Atom::Generalization(a) => Some(a),
            _ => None,
        }
    }
}
