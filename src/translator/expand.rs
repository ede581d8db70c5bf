//! Step 1, generalization expansion (spec.md §4.4): replace each pattern
//! class that has subclasses with the disjunction of its leaf subclasses.

use crate::catalog::{Atom, AtomId, Catalog};

use super::TranslatorError;

fn leaf_subclasses(catalog: &Catalog, class_id: AtomId) -> Vec<AtomId> {
    let children: Vec<AtomId> = catalog
        .atoms()
        .filter_map(|(_, a)| a.as_generalization())
        .filter(|g| g.superclass == class_id)
        .flat_map(|g| g.subclasses.iter().map(|(c, _)| *c))
        .collect();
    if children.is_empty() {
        vec![class_id]
    } else {
        children
            .into_iter()
            .flat_map(|c| leaf_subclasses(catalog, c))
            .collect()
    }
}

/// Resolves `pattern` names and checks the "no two pattern atoms on the
/// same generalization chain" rule (spec.md §4.4, enforced by the
/// translator rather than the checker since it's a query-shape rule, not a
/// catalog invariant).
pub fn resolve_pattern(catalog: &Catalog, pattern: &[String]) -> Result<Vec<AtomId>, TranslatorError> {
    let ids: Vec<AtomId> = pattern
        .iter()
        .map(|n| catalog.atoms_by_name(n).map_err(|_| TranslatorError::UnknownName(n.clone())))
        .collect::<Result<_, _>>()?;

    let classes: Vec<AtomId> = ids
        .iter()
        .copied()
        .filter(|id| catalog.atom(*id).as_class().is_some())
        .collect();
    for &a in &classes {
        let closure: Vec<AtomId> = catalog.generalization_closure(a);
        for &b in &classes {
            if a != b && closure.contains(&b) {
                return Err(TranslatorError::Disconnected(format!(
                    "pattern names both '{}' and its generalization relative '{}'",
                    catalog.atom(a).name(),
                    catalog.atom(b).name()
                )));
            }
        }
    }
    Ok(ids)
}

/// Produces every concrete branch of `pattern` (cartesian product over each
/// class-with-subclasses' leaf options). A branch with no surviving
/// subclass is dropped; if every branch is dropped, `EmptyExpansion`.
pub fn expand(catalog: &Catalog, pattern: &[AtomId]) -> Result<Vec<Vec<AtomId>>, TranslatorError> {
    let mut branches: Vec<Vec<AtomId>> = vec![pattern.to_vec()];

    for (idx, &id) in pattern.iter().enumerate() {
        if !matches!(catalog.atom(id), Atom::Class(_)) {
            continue;
        }
        let options = leaf_subclasses(catalog, id);
        if options.len() == 1 && options[0] == id {
            continue;
        }
        let mut next = Vec::new();
        for branch in &branches {
            for &opt in &options {
                let mut b = branch.clone();
                b[idx] = opt;
                next.push(b);
            }
        }
        branches = next;
    }

    if branches.is_empty() {
        return Err(TranslatorError::EmptyExpansion);
    }
    Ok(branches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ClassAtom;

    #[test]
    fn single_class_with_no_subclasses_is_one_branch() {
        let mut b = Catalog::builder();
        let book = b
            .add_atom(Atom::Class(ClassAtom {
                name: "Book".into(),
                instance_count: 1,
                attributes: vec![],
                superclass: None,
            }))
            .unwrap();
        let catalog = b.build();
        let branches = expand(&catalog, &[book]).unwrap();
        assert_eq!(branches, vec![vec![book]]);
    }

    #[test]
    fn generalization_expands_to_leaf_subclasses() {
        use crate::catalog::GeneralizationAtom;
        let mut b = Catalog::builder();
        let person = b
            .add_atom(Atom::Class(ClassAtom {
                name: "Person".into(),
                instance_count: 10,
                attributes: vec![],
                superclass: None,
            }))
            .unwrap();
        let student = b
            .add_atom(Atom::Class(ClassAtom {
                name: "Student".into(),
                instance_count: 6,
                attributes: vec![],
                superclass: Some(person),
            }))
            .unwrap();
        let worker = b
            .add_atom(Atom::Class(ClassAtom {
                name: "Worker".into(),
                instance_count: 4,
                attributes: vec![],
                superclass: Some(person),
            }))
            .unwrap();
        b.add_atom(Atom::Generalization(GeneralizationAtom {
            name: "PersonKind".into(),
            superclass: person,
            subclasses: vec![(student, String::new()), (worker, String::new())],
            disjoint: false,
            complete: true,
        }))
        .unwrap();
        let catalog = b.build();
        let branches = expand(&catalog, &[person]).unwrap();
        assert_eq!(branches.len(), 2);
        assert!(branches.contains(&vec![student]));
        assert!(branches.contains(&vec![worker]));
    }
}
