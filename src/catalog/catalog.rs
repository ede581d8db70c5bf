use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::atoms::Atom;
use super::hyperedges::Hyperedge;
use super::{AtomId, EdgeId};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown atom name: {0}")]
    UnknownAtom(String),
    #[error("unknown hyperedge name: {0}")]
    UnknownEdge(String),
    #[error("duplicate name in catalog: {0}")]
    DuplicateName(String),
    #[error("catalog (de)serialization failed: {0}")]
    Serialization(String),
}

/// The typed hypergraph `G = (N, H)` (spec.md §3).
///
/// Atoms and hyperedges live in dense arenas addressed by stable integer
/// index (Design Notes §9); name lookups go through a side index. The
/// Catalog is built once by the Loader and is read-only afterwards — every
/// compiler borrows it immutably, so no interior mutability is needed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    atoms: Vec<Atom>,
    edges: Vec<Hyperedge>,
    atom_names: HashMap<String, AtomId>,
    edge_names: HashMap<String, EdgeId>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn atom(&self, id: AtomId) -> &Atom {
        &self.atoms[id.0 as usize]
    }

    pub fn edge(&self, id: EdgeId) -> &Hyperedge {
        &self.edges[id.0 as usize]
    }

    pub fn atoms(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms
            .iter()
            .enumerate()
            .map(|(i, a)| (AtomId(i as u32), a))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Hyperedge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId(i as u32), e))
    }

    pub fn atoms_by_name(&self, name: &str) -> Result<AtomId, CatalogError> {
        self.atom_names
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::UnknownAtom(name.to_string()))
    }

    pub fn edges_by_name(&self, name: &str) -> Result<EdgeId, CatalogError> {
        self.edge_names
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::UnknownEdge(name.to_string()))
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Serializes the catalog to a self-contained blob (spec.md §3
    /// "Persistence is by value").
    pub fn to_blob(&self) -> Result<Vec<u8>, CatalogError> {
        bincode::serialize(self).map_err(|e| CatalogError::Serialization(e.to_string()))
    }

    /// Inverse of [`Catalog::to_blob`]; the round-trip produces a
    /// structurally equal catalog (spec.md §8, "Round-trip" property).
    pub fn from_blob(bytes: &[u8]) -> Result<Catalog, CatalogError> {
        bincode::deserialize(bytes).map_err(|e| CatalogError::Serialization(e.to_string()))
    }
}

/// Append-only constructor used by the Loader. Performs no semantic
/// validation — that is the Checker's job (spec.md §2).
#[derive(Default)]
pub struct CatalogBuilder {
    atoms: Vec<Atom>,
    edges: Vec<Hyperedge>,
    atom_names: HashMap<String, AtomId>,
    edge_names: HashMap<String, EdgeId>,
}

impl CatalogBuilder {
    pub fn add_atom(&mut self, atom: Atom) -> Result<AtomId, CatalogError> {
        let name = atom.name().to_string();
        if self.atom_names.contains_key(&name) {
            return Err(CatalogError::DuplicateName(name));
        }
        let id = AtomId(self.atoms.len() as u32);
        self.atoms.push(atom);
        self.atom_names.insert(name, id);
        Ok(id)
    }

    pub fn add_edge(&mut self, edge: Hyperedge) -> Result<EdgeId, CatalogError> {
        let name = edge.name().to_string();
        if self.edge_names.contains_key(&name) {
            return Err(CatalogError::DuplicateName(name));
        }
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(edge);
        self.edge_names.insert(name, id);
        Ok(id)
    }

    /// Mutable access to an already-inserted atom, used by the Loader to
    /// back-patch denormalized fields (a class's attribute list, a
    /// subclass's superclass ref) once the atoms they point at exist.
    pub fn atom_mut(&mut self, id: AtomId) -> &mut Atom {
        &mut self.atoms[id.0 as usize]
    }

    pub fn atoms(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms
            .iter()
            .enumerate()
            .map(|(i, a)| (AtomId(i as u32), a))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Hyperedge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId(i as u32), e))
    }

    pub fn atom_id(&self, name: &str) -> Result<AtomId, CatalogError> {
        self.atom_names
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::UnknownAtom(name.to_string()))
    }

    pub fn edge_id(&self, name: &str) -> Result<EdgeId, CatalogError> {
        self.edge_names
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::UnknownEdge(name.to_string()))
    }

    pub fn build(self) -> Catalog {
        Catalog {
            atoms: self.atoms,
            edges: self.edges,
            atom_names: self.atom_names,
            edge_names: self.edge_names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::atoms::{Atom, ClassAtom};

    #[test]
    fn rejects_duplicate_atom_names() {
        let mut builder = Catalog::builder();
        let class = |n: &str| {
            Atom::Class(ClassAtom {
                name: n.to_string(),
                instance_count: 1,
                attributes: vec![],
                superclass: None,
            })
        };
        builder.add_atom(class("Book")).unwrap();
        let err = builder.add_atom(class("Book")).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName(_)));
    }

    #[test]
    fn blob_round_trip_is_structurally_equal() {
        let mut builder = Catalog::builder();
        builder
            .add_atom(Atom::Class(ClassAtom {
                name: "Book".to_string(),
                instance_count: 10,
                attributes: vec![],
                superclass: None,
            }))
            .unwrap();
        let catalog = builder.build();

        let blob = catalog.to_blob().unwrap();
        let restored = Catalog::from_blob(&blob).unwrap();
        assert_eq!(catalog, restored);
    }

    #[test]
    fn unknown_name_lookup_fails() {
        let catalog = Catalog::builder().build();
        assert!(matches!(
            catalog.atoms_by_name("Nope"),
            Err(CatalogError::UnknownAtom(_))
        ));
    }
}
