//! The catalog kernel's typed hypergraph (spec.md §3, §4.1).
//!
//! Atoms and hyperedges live in dense arenas addressed by a stable integer
//! index rather than through owning references (Design Notes §9), which
//! keeps the inherently cyclic domain graph (associations, generalizations)
//! straightforward to represent and serialize.

pub mod atoms;
pub mod catalog;
pub mod hyperedges;
pub mod traversal;

pub use atoms::{
    Atom, AssociationAtom, AssociationEndAtom, AttributeAtom, ClassAtom, DataType,
    GeneralizationAtom, Multiplicity,
};
pub use catalog::{Catalog, CatalogBuilder, CatalogError};
pub use hyperedges::{Hyperedge, SetContents, SetEdge, StructEdge};
pub use traversal::{DomainPath, PathHop};

use serde::{Deserialize, Serialize};

/// Stable arena index for an atom (Design Notes §9).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtomId(pub u32);

/// Stable arena index for a hyperedge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u32);
