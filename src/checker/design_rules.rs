//! Design invariants from spec.md §3 ("Design." paragraph) — rules over the
//! Struct and Set hyperedges layered on top of the domain.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::catalog::{Atom, AtomId, Catalog, EdgeId, Hyperedge, SetContents, StructEdge};

use super::diagnostics::{Diagnostic, DiagnosticCode};

fn diag(code: DiagnosticCode, message: impl Into<String>, names: Vec<String>) -> Diagnostic {
    Diagnostic {
        code,
        message: message.into(),
        offending_names: names,
    }
}

/// Every Class, Attribute and AssociationEnd atom must be covered by at
/// least one Struct, and every Struct by at least one Set — otherwise the
/// design can't possibly produce a schema or answer queries over it.
pub fn every_atom_in_some_struct(catalog: &Catalog) -> Vec<Diagnostic> {
    let mut covered: HashSet<AtomId> = HashSet::new();
    for (_, edge) in catalog.edges() {
        if let Hyperedge::Struct(s) = edge {
            covered.extend(s.elements.iter().copied());
            covered.extend(s.anchor.iter().copied());
        }
    }
    catalog
        .atoms()
        .filter(|(_, a)| {
            matches!(a, Atom::Class(_) | Atom::Attribute(_) | Atom::AssociationEnd(_))
        })
        .filter(|(id, _)| !covered.contains(id))
        .map(|(_, a)| {
            diag(
                DiagnosticCode::EveryAtomInSomeSetAndStruct,
                format!("atom '{}' is not covered by any struct", a.name()),
                vec![a.name().to_string()],
            )
        })
        .collect()
}

pub fn every_struct_in_some_set(catalog: &Catalog) -> Vec<Diagnostic> {
    let mut covered: HashSet<crate::catalog::EdgeId> = HashSet::new();
    for (_, edge) in catalog.edges() {
        if let Hyperedge::Set(s) = edge {
            if let SetContents::Structs(ids) = &s.contents {
                covered.extend(ids.iter().copied());
            }
        }
    }
    catalog
        .edges()
        .filter_map(|(id, e)| e.as_struct().map(|s| (id, s)))
        .filter(|(id, _)| !covered.contains(id))
        .map(|(_, s)| {
            diag(
                DiagnosticCode::EveryAtomInSomeSetAndStruct,
                format!("struct '{}' is not contained in any set", s.name),
                vec![s.name.clone()],
            )
        })
        .collect()
}

/// A Set's contents must name only Structs (or, for the bare-class form, a
/// single Class) — never another Set. Catches arbitrary nesting depth since
/// every nested chain bottoms out in at least one direct Set-inside-Set
/// occurrence.
pub fn set_contains_only_structs_or_class(catalog: &Catalog) -> Vec<Diagnostic> {
    catalog
        .edges()
        .filter_map(|(_, e)| e.as_set())
        .flat_map(|set| {
            let SetContents::Structs(ids) = &set.contents else {
                return Vec::new();
            };
            ids.iter()
                .filter(|id| catalog.edge(**id).as_set().is_some())
                .map(|id| {
                    diag(
                        DiagnosticCode::SetContainsOnlyStructsOrClass,
                        format!(
                            "set '{}' contains another set '{}' — sets may only contain structs or a bare class",
                            set.name,
                            catalog.edge(*id).name()
                        ),
                        vec![set.name.clone()],
                    )
                })
                .collect()
        })
        .collect()
}

fn sibling_structs_in(catalog: &Catalog, set: &crate::catalog::SetEdge) -> Vec<&StructEdge> {
    match &set.contents {
        SetContents::Structs(ids) if ids.len() > 1 => ids
            .iter()
            .filter_map(|id| catalog.edge(*id).as_struct())
            .collect(),
        _ => Vec::new(),
    }
}

/// When a Set holds more than one Struct (the generalization-union case,
/// spec.md §3), every Struct in it must share the same anchor — they are
/// rows of the same logical table, merely with different attribute sets.
pub fn sibling_structs_share_anchor(catalog: &Catalog) -> Vec<Diagnostic> {
    catalog
        .edges()
        .filter_map(|(_, e)| e.as_set())
        .filter_map(|set| {
            let siblings = sibling_structs_in(catalog, set);
            if siblings.len() < 2 {
                return None;
            }
            let mut first_anchor: Vec<AtomId> = siblings[0].anchor.clone();
            first_anchor.sort_by_key(|a| a.0);
            let mismatched = siblings.iter().skip(1).any(|s| {
                let mut anchor = s.anchor.clone();
                anchor.sort_by_key(|a| a.0);
                anchor != first_anchor
            });
            mismatched.then(|| {
                diag(
                    DiagnosticCode::SiblingStructsShareAnchor,
                    format!("structs in set '{}' do not share a common anchor", set.name),
                    vec![set.name.clone()],
                )
            })
        })
        .collect()
}

/// Sibling structs sharing a Set must carry a discriminator — an element
/// (typically the subclass identity) that lets a reader decide, per row,
/// which sibling struct it belongs to. Approximated here as: every element
/// beyond the shared anchor must differ from at least one other sibling's
/// non-anchor elements, i.e. the structs are not byte-for-byte identical.
pub fn sibling_discriminator_required(catalog: &Catalog) -> Vec<Diagnostic> {
    catalog
        .edges()
        .filter_map(|(_, e)| e.as_set())
        .filter_map(|set| {
            let siblings = sibling_structs_in(catalog, set);
            if siblings.len() < 2 {
                return None;
            }
            let signature = |s: &StructEdge| -> Vec<AtomId> {
                let mut elems: Vec<AtomId> = s.non_anchor_elements().copied().collect();
                elems.sort_by_key(|a| a.0);
                elems
            };
            let first = signature(siblings[0]);
            let indistinct = siblings.iter().skip(1).all(|s| signature(s) == first);
            indistinct.then(|| {
                diag(
                    DiagnosticCode::SiblingDiscriminatorRequired,
                    format!(
                        "set '{}' unions structs with identical non-anchor elements and no discriminator",
                        set.name
                    ),
                    vec![set.name.clone()],
                )
            })
        })
        .collect()
}

/// "discriminant attributes are mandatory whenever the containing Struct
/// carries a class that has subclasses or has siblings in its Set"
/// (spec.md §3). There is no dedicated "is a discriminator" flag on
/// `AttributeAtom`, so presence is approximated as: the struct's elements
/// include at least one attribute owned directly by its own anchor class —
/// a struct with none of its own class's attributes has nothing in the row
/// to show a reader which branch of the generalization it belongs to.
pub fn discriminator_mandatory_for_subclasses_or_siblings(catalog: &Catalog) -> Vec<Diagnostic> {
    let mut superclasses_with_subclasses: HashSet<AtomId> = HashSet::new();
    for (_, atom) in catalog.atoms() {
        if let Atom::Generalization(gen) = atom {
            superclasses_with_subclasses.insert(gen.superclass);
        }
    }

    let mut set_of_struct: HashMap<EdgeId, EdgeId> = HashMap::new();
    for (set_id, edge) in catalog.edges() {
        if let Hyperedge::Set(set) = edge {
            if let SetContents::Structs(ids) = &set.contents {
                for &sid in ids {
                    set_of_struct.insert(sid, set_id);
                }
            }
        }
    }

    catalog
        .edges()
        .filter_map(|(id, e)| e.as_struct().map(|s| (id, s)))
        .filter_map(|(id, s)| {
            let anchor_class = s
                .anchor
                .iter()
                .copied()
                .find(|a| catalog.atom(*a).as_class().is_some())?;
            let has_subclasses = superclasses_with_subclasses.contains(&anchor_class);
            let has_siblings = set_of_struct
                .get(&id)
                .and_then(|set_id| catalog.edge(*set_id).as_set())
                .map(|set| matches!(&set.contents, SetContents::Structs(ids) if ids.len() > 1))
                .unwrap_or(false);
            if !(has_subclasses || has_siblings) {
                return None;
            }
            let has_own_attribute = s.elements.iter().any(|eid| {
                catalog
                    .atom(*eid)
                    .as_attribute()
                    .map(|a| a.owning_class == anchor_class)
                    .unwrap_or(false)
            });
            (!has_own_attribute).then(|| {
                diag(
                    DiagnosticCode::DiscriminatorMandatoryForSubclassesOrSiblings,
                    format!(
                        "struct '{}' carries a class with subclasses or siblings in its set but has no discriminating attribute of its own",
                        s.name
                    ),
                    vec![s.name.clone()],
                )
            })
        })
        .collect()
}

pub fn struct_anchor_non_empty(catalog: &Catalog) -> Vec<Diagnostic> {
    catalog
        .edges()
        .filter_map(|(_, e)| e.as_struct())
        .filter(|s| s.anchor.is_empty())
        .map(|s| {
            diag(
                DiagnosticCode::StructAnchorNonEmpty,
                format!("struct '{}' has an empty anchor", s.name),
                vec![s.name.clone()],
            )
        })
        .collect()
}

/// Every anchor atom in a Struct must be the Struct's root Class or one of
/// that class's identifier attributes — an anchor built from a plain,
/// non-key attribute couldn't function as a row identity.
pub fn struct_anchor_is_identifying(catalog: &Catalog) -> Vec<Diagnostic> {
    catalog
        .edges()
        .filter_map(|(_, e)| e.as_struct())
        .flat_map(|s| {
            s.anchor
                .iter()
                .filter(|id| {
                    match catalog.atom(**id) {
                        Atom::Class(_) => false,
                        Atom::Attribute(a) => !a.is_identifier,
                        _ => true,
                    }
                })
                .map(|id| {
                    diag(
                        DiagnosticCode::StructAnchorIsIdentifying,
                        format!(
                            "struct '{}' anchors on non-identifying atom '{}'",
                            s.name,
                            catalog.atom(*id).name()
                        ),
                        vec![s.name.clone()],
                    )
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// A Struct's `anchor` and `elements` must be disjoint sets of atoms
/// (spec.md §3: the anchor identifies the row, the elements are the rest of
/// its attribute surface) — an atom cannot be both.
pub fn struct_anchor_disjoint_from_elements(catalog: &Catalog) -> Vec<Diagnostic> {
    catalog
        .edges()
        .filter_map(|(_, e)| e.as_struct())
        .filter_map(|s| {
            let anchor: HashSet<AtomId> = s.anchor.iter().copied().collect();
            let shared: Vec<String> = s
                .elements
                .iter()
                .filter(|id| anchor.contains(id))
                .map(|id| catalog.atom(*id).name().to_string())
                .collect();
            (!shared.is_empty()).then(|| {
                diag(
                    DiagnosticCode::StructAnchorDisjointFromElements,
                    format!(
                        "struct '{}' names {} in both its anchor and its elements",
                        s.name,
                        shared.join(", ")
                    ),
                    vec![s.name.clone()],
                )
            })
        })
        .collect()
}

/// Every element of a Struct must reach the anchor (spec.md §4.1: a Struct
/// is exactly the set of atoms reachable from its anchor without crossing
/// generalization).
pub fn struct_connected(catalog: &Catalog) -> Vec<Diagnostic> {
    catalog
        .edges()
        .filter_map(|(_, e)| e.as_struct())
        .flat_map(|s| {
            s.elements
                .iter()
                .filter(|id| catalog.struct_path(s, **id).is_none())
                .map(|id| {
                    diag(
                        DiagnosticCode::StructConnected,
                        format!(
                            "element '{}' of struct '{}' cannot reach the anchor",
                            catalog.atom(*id).name(),
                            s.name
                        ),
                        vec![s.name.clone()],
                    )
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// When a Struct's anchor spans more than one atom, those atoms must be
/// mutually reachable within the struct (otherwise "anchor" names two
/// disconnected identities rather than one composite key).
pub fn anchor_connected(catalog: &Catalog) -> Vec<Diagnostic> {
    catalog
        .edges()
        .filter_map(|(_, e)| e.as_struct())
        .filter(|s| s.anchor.len() > 1)
        .filter_map(|s| {
            let first = s.anchor[0];
            let disconnected = s.anchor[1..]
                .iter()
                .any(|a| catalog.domain_paths(first, *a, false).is_empty());
            disconnected.then(|| {
                diag(
                    DiagnosticCode::AnchorConnected,
                    format!("struct '{}' has a disconnected composite anchor", s.name),
                    vec![s.name.clone()],
                )
            })
        })
        .collect()
}

/// No two classes in the same Struct may sit on the same generalization
/// chain — a subclass already carries its superclass's attributes via
/// `generalization_closure`, so naming both in one Struct is redundant and
/// ambiguous about which attribute set is meant.
pub fn no_shared_generalization_chain_in_struct(catalog: &Catalog) -> Vec<Diagnostic> {
    catalog
        .edges()
        .filter_map(|(_, e)| e.as_struct())
        .filter_map(|s| {
            let classes: Vec<AtomId> = s
                .elements
                .iter()
                .chain(s.anchor.iter())
                .copied()
                .filter(|id| catalog.atom(*id).as_class().is_some())
                .collect();
            for &a in &classes {
                let closure_a: HashSet<AtomId> = catalog.generalization_closure(a).into_iter().collect();
                for &b in &classes {
                    if a != b && closure_a.contains(&b) {
                        return Some(diag(
                            DiagnosticCode::NoSharedGeneralizationChainInStruct,
                            format!(
                                "struct '{}' names both '{}' and its ancestor/descendant '{}'",
                                s.name,
                                catalog.atom(a).name(),
                                catalog.atom(b).name()
                            ),
                            vec![s.name.clone()],
                        ));
                    }
                }
            }
            None
        })
        .collect()
}

/// The path from every element to the anchor, restricted to the struct's
/// own atoms, must be unique (spec.md §4.1). Detected by a BFS that tracks
/// whether more than one predecessor reaches a node at the same minimal
/// depth — `Catalog::struct_path` only ever returns one such path, so
/// ambiguity must be checked independently here.
pub fn exactly_one_path_to_anchor(catalog: &Catalog) -> Vec<Diagnostic> {
    catalog
        .edges()
        .filter_map(|(_, e)| e.as_struct())
        .flat_map(|s| struct_ambiguous_elements(catalog, s))
        .map(|(s, id)| {
            diag(
                DiagnosticCode::ExactlyOnePathToAnchor,
                format!(
                    "element '{}' of struct '{}' has more than one path to the anchor",
                    catalog.atom(id).name(),
                    s.name
                ),
                vec![s.name.clone()],
            )
        })
        .collect()
}

fn struct_ambiguous_elements<'a>(
    catalog: &Catalog,
    s: &'a StructEdge,
) -> Vec<(&'a StructEdge, AtomId)> {
    let allowed: HashSet<AtomId> = s.elements.iter().chain(s.anchor.iter()).copied().collect();
    let anchor: HashSet<AtomId> = s.anchor.iter().copied().collect();

    let mut path_count: HashMap<AtomId, u64> = HashMap::new();
    let mut depth: HashMap<AtomId, usize> = HashMap::new();
    let mut ambiguous: HashSet<AtomId> = HashSet::new();

    for &start in &s.anchor {
        depth.insert(start, 0);
        path_count.insert(start, 1);
    }
    let mut queue: VecDeque<AtomId> = s.anchor.iter().copied().collect();
    let mut visited_order = Vec::new();

    while let Some(node) = queue.pop_front() {
        visited_order.push(node);
        for (neighbor, _, _) in catalog_domain_neighbors_via_paths(catalog, node) {
            if !allowed.contains(&neighbor) || anchor.contains(&neighbor) {
                continue;
            }
            let next_depth = depth[&node] + 1;
            match depth.get(&neighbor) {
                None => {
                    depth.insert(neighbor, next_depth);
                    path_count.insert(neighbor, path_count[&node]);
                    queue.push_back(neighbor);
                }
                Some(&d) if d == next_depth => {
                    *path_count.get_mut(&neighbor).unwrap() += path_count[&node];
                    ambiguous.insert(neighbor);
                }
                _ => {}
            }
        }
    }

    s.elements
        .iter()
        .filter(|id| !anchor.contains(id))
        .filter(|id| path_count.get(id).copied().unwrap_or(0) > 1)
        .map(|&id| (s, id))
        .collect()
}

/// One-hop undirected neighbours reused from [`Catalog::domain_paths`] via a
/// length-1/2 probe — kept local since `domain_neighbors` itself is private
/// to the traversal module.
fn catalog_domain_neighbors_via_paths(
    catalog: &Catalog,
    node: AtomId,
) -> Vec<(AtomId, AtomId, String)> {
    catalog
        .atoms()
        .filter(|(id, _)| *id != node)
        .filter_map(|(id, _)| {
            let paths = catalog.domain_paths(node, id, false);
            let path = paths.first()?;
            if path.len() == 1 {
                Some((id, path[0].via, path[0].via_name.clone()))
            } else {
                None
            }
        })
        .collect()
}

/// Every class reachable from a struct's anchor must be connected to it via
/// an unbroken chain of mandatory (min ≥ 1) association ends — an optional
/// hop would mean some anchor instances have no corresponding row for this
/// element, silently losing data under the FLAT paradigm's inner joins.
pub fn every_class_linked_via_mandatory_chain(catalog: &Catalog) -> Vec<Diagnostic> {
    catalog
        .edges()
        .filter_map(|(_, e)| e.as_struct())
        .flat_map(|s| {
            s.elements
                .iter()
                .filter(|id| catalog.atom(**id).as_class().is_some())
                .filter_map(|&id| {
                    let path = catalog.struct_path(s, id)?;
                    let has_optional_hop = path.iter().any(|hop| {
                        catalog
                            .atom(hop.via)
                            .as_association_end()
                            .map(|end| !end.multiplicity.is_mandatory())
                            .unwrap_or(false)
                    });
                    has_optional_hop.then(|| {
                        diag(
                            DiagnosticCode::EveryClassLinkedToAnchorViaMandatoryChain,
                            format!(
                                "class '{}' in struct '{}' reaches the anchor only through an optional association end",
                                catalog.atom(id).name(),
                                s.name
                            ),
                            vec![s.name.clone()],
                        )
                    })
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub const RULES: &[fn(&Catalog) -> Vec<Diagnostic>] = &[
    every_atom_in_some_struct,
    every_struct_in_some_set,
    set_contains_only_structs_or_class,
    sibling_structs_share_anchor,
    sibling_discriminator_required,
    discriminator_mandatory_for_subclasses_or_siblings,
    struct_anchor_non_empty,
    struct_anchor_is_identifying,
    struct_anchor_disjoint_from_elements,
    struct_connected,
    anchor_connected,
    no_shared_generalization_chain_in_struct,
    exactly_one_path_to_anchor,
    every_class_linked_via_mandatory_chain,
];
