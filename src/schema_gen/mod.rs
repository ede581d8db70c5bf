//! The Schema Generator (spec.md §4.3): turns a checked Catalog into
//! create-table statements, parameterized by `config::Paradigm`.

mod flat;
mod json_nested;
pub mod render;
pub mod statement;

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::catalog::{Atom, AtomId, Catalog, EdgeId, Hyperedge, SetContents, SetEdge};
use crate::config::Paradigm;
use crate::termination::CancellationToken;

pub use statement::Statement;

#[derive(Debug, Error)]
pub enum SchemaGenError {
    #[error("class '{0}' is never anchored by any set, so it has no referenceable identifier")]
    UnanchoredClass(String),
    #[error("set '{0}' nests a set beneath a set — the checker should have rejected this design")]
    UnexpectedNesting(String),
    #[error("cancelled before statement {at_statement}")]
    Cancelled { at_statement: usize },
}

/// Generates create-table statements for `catalog` under `paradigm`. Callers
/// are expected to have run [`crate::checker::check`] first; this function
/// does not re-validate invariants. `token` is polled between emitted
/// statements, never mid-statement (spec.md §5).
pub fn generate(
    catalog: &Catalog,
    paradigm: Paradigm,
    token: &CancellationToken,
) -> Result<Vec<Statement>, SchemaGenError> {
    match paradigm {
        Paradigm::Flat => flat::generate(catalog, token),
        Paradigm::JsonNested => json_nested::generate(catalog, token),
    }
}

fn owning_set_of_class(catalog: &Catalog) -> HashMap<AtomId, EdgeId> {
    let mut map = HashMap::new();
    for (id, edge) in catalog.edges() {
        let Hyperedge::Set(set) = edge else { continue };
        match &set.contents {
            SetContents::Class(c) => {
                map.insert(*c, id);
            }
            SetContents::Structs(ids) => {
                for sid in ids {
                    let Hyperedge::Struct(s) = catalog.edge(*sid) else { continue };
                    for &a in &s.anchor {
                        if catalog.atom(a).as_class().is_some() {
                            map.insert(a, id);
                        }
                    }
                }
            }
        }
    }
    map
}

fn dependencies_of(
    catalog: &Catalog,
    set_id: EdgeId,
    set: &SetEdge,
    owning: &HashMap<AtomId, EdgeId>,
) -> HashSet<EdgeId> {
    let mut deps = HashSet::new();
    if let SetContents::Structs(ids) = &set.contents {
        for sid in ids {
            let Hyperedge::Struct(s) = catalog.edge(*sid) else { continue };
            for &el in s.elements.iter().chain(s.anchor.iter()) {
                if let Atom::AssociationEnd(end) = catalog.atom(el) {
                    let embedded = s.elements.contains(&end.referenced_class)
                        || s.anchor.contains(&end.referenced_class);
                    if embedded {
                        continue;
                    }
                    if let Some(&target) = owning.get(&end.referenced_class) {
                        if target != set_id {
                            deps.insert(target);
                        }
                    }
                }
            }
        }
    }
    deps
}

/// Orders Sets so a loose-end's target precedes its referrer (spec.md §4.3,
/// §4.5 "anchors before referrers"). Ties broken lexicographically by name
/// for determinism (spec.md §8 "Determinism").
fn topo_sort_sets<'a>(
    catalog: &Catalog,
    sets: &[(EdgeId, &'a SetEdge)],
) -> Result<Vec<(EdgeId, &'a SetEdge)>, SchemaGenError> {
    let owning = owning_set_of_class(catalog);
    let mut deps: HashMap<EdgeId, HashSet<EdgeId>> = HashMap::new();
    for (id, set) in sets {
        deps.insert(*id, dependencies_of(catalog, *id, set, &owning));
    }

    let mut remaining: Vec<(EdgeId, &SetEdge)> = sets.to_vec();
    let mut ordered = Vec::with_capacity(sets.len());
    let mut placed: HashSet<EdgeId> = HashSet::new();

    while !remaining.is_empty() {
        remaining.sort_by(|a, b| a.1.name.cmp(&b.1.name));
        let ready_idx = remaining
            .iter()
            .position(|(id, _)| deps[id].iter().all(|d| placed.contains(d)));
        let Some(idx) = ready_idx else {
            // A dependency cycle among Sets; place remaining in name order
            // rather than fail — the checker does not model this case, so
            // this is a deliberately permissive fallback, not a silent fix.
            remaining.sort_by(|a, b| a.1.name.cmp(&b.1.name));
            ordered.extend(remaining);
            break;
        };
        let (id, set) = remaining.remove(idx);
        placed.insert(id);
        ordered.push((id, set));
    }

    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Atom, ClassAtom};

    #[test]
    fn topo_sort_is_stable_for_independent_sets() {
        let mut b = Catalog::builder();
        let a = b
            .add_atom(Atom::Class(ClassAtom {
                name: "A".into(),
                instance_count: 1,
                attributes: vec![],
                superclass: None,
            }))
            .unwrap();
        let c = b
            .add_atom(Atom::Class(ClassAtom {
                name: "C".into(),
                instance_count: 1,
                attributes: vec![],
                superclass: None,
            }))
            .unwrap();
        b.add_edge(Hyperedge::Set(SetEdge {
            name: "SetB".into(),
            contents: SetContents::Class(c),
        }))
        .unwrap();
        b.add_edge(Hyperedge::Set(SetEdge {
            name: "SetA".into(),
            contents: SetContents::Class(a),
        }))
        .unwrap();
        let catalog = b.build();
        let sets: Vec<_> = catalog.edges().filter_map(|(id, e)| e.as_set().map(|s| (id, s))).collect();
        let ordered = topo_sort_sets(&catalog, &sets).unwrap();
        assert_eq!(ordered[0].1.name, "SetA");
        assert_eq!(ordered[1].1.name, "SetB");
    }
}
