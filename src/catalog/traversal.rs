//! Traversal primitives shared by all three compilers (spec.md §4.1).

use std::collections::{HashMap, HashSet, VecDeque};

use super::atoms::Atom;
use super::hyperedges::{Hyperedge, SetContents, StructEdge};
use super::{AtomId, Catalog, EdgeId};

/// One hop of a domain path: `from` is implicit (the previous hop's `to`,
/// or the path's start atom for the first hop); `via` names the domain atom
/// (an Association or a Generalization) that licenses the hop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathHop {
    pub via: AtomId,
    pub via_name: String,
    pub to: AtomId,
}

pub type DomainPath = Vec<PathHop>;

impl Catalog {
    /// Ancestors of `class` plus `class` itself, root-most last, used to
    /// resolve "subclasses see superclass attributes" (spec.md §4.1).
    pub fn generalization_closure(&self, class: AtomId) -> Vec<AtomId> {
        let mut closure = vec![class];
        let mut current = class;
        while let Some(parent) = self.atom(current).as_class().and_then(|c| c.superclass) {
            closure.push(parent);
            current = parent;
        }
        closure
    }

    /// Classes sharing a generalization with `class` (same superclass),
    /// excluding `class` itself.
    pub fn siblings(&self, class: AtomId) -> Vec<AtomId> {
        let Some(target_super) = self.atom(class).as_class().and_then(|c| c.superclass) else {
            return Vec::new();
        };
        self.atoms()
            .filter_map(|(id, atom)| atom.as_class().map(|c| (id, c)))
            .filter(|(id, c)| *id != class && c.superclass == Some(target_super))
            .map(|(id, _)| id)
            .collect()
    }

    /// Every minimal-length path between `a` and `b` in the atom graph.
    /// Generalization hops are only traversable when `allow_generalization`
    /// is set, per spec.md §4.1. Ties are broken lexicographically over the
    /// sequence of hop names (normative for the first hop per spec.md §4.1;
    /// extended here to later hops too, a deliberate resolution of open
    /// question (b) in spec.md §9, recorded in DESIGN.md).
    pub fn domain_paths(&self, a: AtomId, b: AtomId, allow_generalization: bool) -> Vec<DomainPath> {
        if a == b {
            return vec![Vec::new()];
        }

        let mut depth: HashMap<AtomId, usize> = HashMap::new();
        let mut paths: HashMap<AtomId, Vec<DomainPath>> = HashMap::new();
        depth.insert(a, 0);
        paths.insert(a, vec![Vec::new()]);

        let mut frontier = vec![a];
        let mut level = 0usize;
        let mut found_at: Option<usize> = None;

        while !frontier.is_empty() {
            if let Some(found_level) = found_at {
                if level > found_level {
                    break;
                }
            }
            let mut next_frontier = Vec::new();
            for node in &frontier {
                for (neighbor, via, via_name) in self.domain_neighbors(*node, allow_generalization) {
                    let next_depth = level + 1;
                    let entry = depth.entry(neighbor).or_insert(next_depth);
                    if *entry != next_depth {
                        continue; // already reached at a shorter depth
                    }
                    if !paths.contains_key(&neighbor) {
                        paths.insert(neighbor, Vec::new());
                        next_frontier.push(neighbor);
                    }
                    let extended: Vec<DomainPath> = paths[node]
                        .iter()
                        .map(|p| {
                            let mut np = p.clone();
                            np.push(PathHop {
                                via,
                                via_name: via_name.clone(),
                                to: neighbor,
                            });
                            np
                        })
                        .collect();
                    paths.get_mut(&neighbor).unwrap().extend(extended);
                    if neighbor == b && found_at.is_none() {
                        found_at = Some(next_depth);
                    }
                }
            }
            frontier = next_frontier;
            level += 1;
        }

        let mut result = paths.remove(&b).unwrap_or_default();
        result.sort_by(|x, y| {
            let xs: Vec<&str> = x.iter().map(|h| h.via_name.as_str()).collect();
            let ys: Vec<&str> = y.iter().map(|h| h.via_name.as_str()).collect();
            xs.cmp(&ys)
        });
        result
    }

    /// The unique path from `x` to the anchor of `strct` (spec.md §4.1,
    /// "uniqueness is an invariant; more than one is a checker violation").
    /// Restricted to the struct's own elements/anchor, never crossing
    /// generalization (two atoms in a Struct are never on the same chain).
    pub fn struct_path(&self, strct: &StructEdge, x: AtomId) -> Option<DomainPath> {
        if strct.is_anchor(x) {
            return Some(Vec::new());
        }
        let allowed: HashSet<AtomId> = strct.elements.iter().copied().collect();
        let anchor: HashSet<AtomId> = strct.anchor.iter().copied().collect();

        let mut depth: HashMap<AtomId, usize> = HashMap::new();
        let mut prev_node: HashMap<AtomId, AtomId> = HashMap::new();
        let mut prev_hop: HashMap<AtomId, PathHop> = HashMap::new();
        depth.insert(x, 0);
        let mut frontier = vec![x];
        let mut level = 0usize;

        while !frontier.is_empty() {
            let mut next_frontier = Vec::new();
            for node in &frontier {
                for (neighbor, via, via_name) in self.domain_neighbors(*node, false) {
                    if !allowed.contains(&neighbor) && !anchor.contains(&neighbor) {
                        continue;
                    }
                    if depth.contains_key(&neighbor) {
                        continue;
                    }
                    depth.insert(neighbor, level + 1);
                    prev_node.insert(neighbor, *node);
                    prev_hop.insert(
                        neighbor,
                        PathHop {
                            via,
                            via_name,
                            to: neighbor,
                        },
                    );
                    next_frontier.push(neighbor);
                }
            }
            frontier = next_frontier;
            level += 1;
        }

        let reached_anchor: Vec<AtomId> = anchor
            .iter()
            .copied()
            .filter(|a| depth.contains_key(a))
            .collect();
        let &target = reached_anchor.iter().min_by_key(|a| depth[a])?;

        let mut path = Vec::new();
        let mut cur = target;
        while cur != x {
            path.push(prev_hop.get(&cur)?.clone());
            cur = *prev_node.get(&cur)?;
        }
        path.reverse();
        Some(path)
    }

    /// All Sets whose Structs (or bare Class) transitively contain `atom`.
    pub fn sets_containing(&self, atom: AtomId) -> Vec<EdgeId> {
        let owning_class = self.atom(atom).as_attribute().map(|a| a.owning_class);

        self.edges()
            .filter_map(|(id, edge)| match edge {
                Hyperedge::Set(set) => Some((id, set)),
                Hyperedge::Struct(_) => None,
            })
            .filter(|(_, set)| match &set.contents {
                SetContents::Class(c) => *c == atom || owning_class == Some(*c),
                SetContents::Structs(struct_ids) => struct_ids.iter().any(|sid| {
                    let Hyperedge::Struct(s) = self.edge(*sid) else {
                        return false;
                    };
                    s.elements.contains(&atom)
                        || s.anchor.contains(&atom)
                        || owning_class
                            .map(|oc| s.elements.contains(&oc) || s.anchor.contains(&oc))
                            .unwrap_or(false)
                }),
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Undirected adjacency of the domain atom graph: attributes connect to
    /// their owning class, association ends connect to their association
    /// and to their referenced class, and (when allowed) a generalization
    /// connects its superclass to each subclass.
    fn domain_neighbors(
        &self,
        node: AtomId,
        allow_generalization: bool,
    ) -> Vec<(AtomId, AtomId, String)> {
        let mut out = Vec::new();
        match self.atom(node) {
            Atom::Attribute(attr) => {
                out.push((attr.owning_class, node, attr.name.clone()));
            }
            Atom::Class(_) => {
                for (id, atom) in self.atoms() {
                    if let Atom::Attribute(attr) = atom {
                        if attr.owning_class == node {
                            out.push((id, id, attr.name.clone()));
                        }
                    }
                    if let Atom::AssociationEnd(end) = atom {
                        if end.referenced_class == node {
                            out.push((id, id, end.name.clone()));
                        }
                    }
                    if allow_generalization {
                        if let Atom::Generalization(g) = atom {
                            if g.superclass == node {
                                for (sub, _) in &g.subclasses {
                                    out.push((*sub, id, g.name.clone()));
                                }
                            }
                            if let Some((_, _)) =
                                g.subclasses.iter().find(|(sub, _)| *sub == node)
                            {
                                out.push((g.superclass, id, g.name.clone()));
                            }
                        }
                    }
                }
            }
            Atom::AssociationEnd(end) => {
                out.push((end.referenced_class, node, end.name.clone()));
                for (id, atom) in self.atoms() {
                    if let Atom::Association(assoc) = atom {
                        if assoc.ends.contains(&node) {
                            for other in assoc.ends {
                                if other != node {
                                    out.push((other, id, assoc.name.clone()));
                                }
                            }
                        }
                    }
                }
            }
            Atom::Association(assoc) => {
                for end in assoc.ends {
                    out.push((end, node, assoc.name.clone()));
                }
            }
            Atom::Generalization(g) => {
                if allow_generalization {
                    out.push((g.superclass, node, g.name.clone()));
                    for (sub, _) in &g.subclasses {
                        out.push((*sub, node, g.name.clone()));
                    }
                }
            }
        }
        out
    }
}
