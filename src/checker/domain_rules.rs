//! Domain invariants from spec.md §3 ("Domain." paragraph).

use crate::catalog::{Atom, Catalog};

use super::diagnostics::{Diagnostic, DiagnosticCode};

fn diag(code: DiagnosticCode, message: impl Into<String>, names: Vec<String>) -> Diagnostic {
    Diagnostic {
        code,
        message: message.into(),
        offending_names: names,
    }
}

pub fn domain_non_empty(catalog: &Catalog) -> Vec<Diagnostic> {
    let has_class = catalog.atoms().any(|(_, a)| a.as_class().is_some());
    if has_class {
        vec![]
    } else {
        vec![diag(
            DiagnosticCode::DomainNonEmpty,
            "domain has no classes",
            vec![],
        )]
    }
}

/// "underlying atom graph connected" (spec.md §3).
pub fn domain_graph_connected(catalog: &Catalog) -> Vec<Diagnostic> {
    let atoms: Vec<_> = catalog.atoms().map(|(id, _)| id).collect();
    let Some(&first) = atoms.first() else {
        return vec![];
    };
    let unreachable: Vec<String> = atoms
        .iter()
        .skip(1)
        .filter(|&&id| catalog.domain_paths(first, id, true).is_empty())
        .map(|&id| catalog.atom(id).name().to_string())
        .collect();
    if unreachable.is_empty() {
        vec![]
    } else {
        vec![diag(
            DiagnosticCode::DomainGraphConnected,
            "domain atom graph is disconnected",
            unreachable,
        )]
    }
}

/// "Every non-generalization-rooted class has exactly one identifier
/// attribute; the top of every generalization has an identifier; no
/// non-top class carries an identifier." (spec.md §3).
pub fn identifier_placement(catalog: &Catalog) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    for (id, atom) in catalog.atoms() {
        let Some(class) = atom.as_class() else {
            continue;
        };
        let identifier_count = class
            .attributes
            .iter()
            .filter(|attr_id| {
                catalog
                    .atom(**attr_id)
                    .as_attribute()
                    .map(|a| a.is_identifier)
                    .unwrap_or(false)
            })
            .count();

        let is_root = class.superclass.is_none();
        if is_root {
            if identifier_count != 1 {
                diags.push(diag(
                    DiagnosticCode::ExactlyOneIdentifier,
                    format!(
                        "class '{}' must carry exactly one identifier attribute, found {}",
                        class.name, identifier_count
                    ),
                    vec![class.name.clone()],
                ));
            }
        } else if identifier_count != 0 {
            diags.push(diag(
                DiagnosticCode::NonRootClassHasNoIdentifier,
                format!("non-root class '{}' must not carry an identifier", class.name),
                vec![class.name.clone()],
            ));
        }
        let _ = id;
    }
    diags
}

/// "the two ends have distinct role-names" (spec.md §3).
pub fn association_ends_distinct_role_names(catalog: &Catalog) -> Vec<Diagnostic> {
    catalog
        .atoms()
        .filter_map(|(_, a)| a.as_association())
        .filter_map(|assoc| {
            let [a, b] = assoc.ends;
            let role_a = &catalog.atom(a).as_association_end()?.role_name;
            let role_b = &catalog.atom(b).as_association_end()?.role_name;
            if role_a == role_b {
                Some(diag(
                    DiagnosticCode::DistinctRoleNames,
                    format!("association '{}' has two ends named '{}'", assoc.name, role_a),
                    vec![assoc.name.clone()],
                ))
            } else {
                None
            }
        })
        .collect()
}

/// "Generalizations are acyclic; each class has ≤ 1 superclass" (spec.md §3).
pub fn generalization_acyclic(catalog: &Catalog) -> Vec<Diagnostic> {
    catalog
        .atoms()
        .filter_map(|(id, a)| a.as_class().map(|_| id))
        .filter_map(|id| {
            let mut seen = std::collections::HashSet::new();
            let mut current = id;
            loop {
                if !seen.insert(current) {
                    return Some(diag(
                        DiagnosticCode::GeneralizationAcyclic,
                        format!(
                            "generalization chain rooted at '{}' is cyclic",
                            catalog.atom(id).name()
                        ),
                        vec![catalog.atom(id).name().to_string()],
                    ));
                }
                match catalog.atom(current).as_class().and_then(|c| c.superclass) {
                    Some(parent) => current = parent,
                    None => return None,
                }
            }
        })
        .collect()
}

/// "distinct-values ≤ owning-class cardinality; for identifiers, equality."
pub fn attribute_distinct_values_bound(catalog: &Catalog) -> Vec<Diagnostic> {
    catalog
        .atoms()
        .filter_map(|(_, a)| a.as_attribute())
        .filter_map(|attr| {
            let Atom::Class(owner) = catalog.atom(attr.owning_class) else {
                return None;
            };
            let violated = if attr.is_identifier {
                attr.distinct_values != owner.instance_count
            } else {
                attr.distinct_values > owner.instance_count
            };
            violated.then(|| {
                diag(
                    DiagnosticCode::DistinctValuesBound,
                    format!(
                        "attribute '{}' has {} distinct values against class '{}' cardinality {}",
                        attr.name, attr.distinct_values, owner.name, owner.instance_count
                    ),
                    vec![attr.name.clone()],
                )
            })
        })
        .collect()
}

/// "every atom and hyperedge name is unique across the whole catalog"
/// (spec.md §3) — names double as the identifiers the Loader, Checker
/// diagnostics, and Translator pattern matching all key off of, so a
/// collision between e.g. a Class and a Set would make lookups ambiguous.
pub fn names_globally_unique(catalog: &Catalog) -> Vec<Diagnostic> {
    let mut seen: std::collections::HashMap<&str, u32> = std::collections::HashMap::new();
    for (_, atom) in catalog.atoms() {
        *seen.entry(atom.name()).or_insert(0) += 1;
    }
    for (_, edge) in catalog.edges() {
        *seen.entry(edge.name()).or_insert(0) += 1;
    }
    seen.into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| {
            diag(
                DiagnosticCode::NamesGloballyUnique,
                format!("name '{name}' is used by more than one atom or hyperedge"),
                vec![name.to_string()],
            )
        })
        .collect()
}

/// "each class has at most one superclass" (spec.md §3). `ClassAtom`
/// structurally stores a single `superclass` slot, but that slot is filled
/// by the last `GeneralizationAtom` processed at load time (`loader::build`)
/// — a class named as a subclass in two different generalizations silently
/// loses the first. Detected here by scanning the generalizations directly.
pub fn single_superclass(catalog: &Catalog) -> Vec<Diagnostic> {
    let mut superclass_count: std::collections::HashMap<crate::catalog::AtomId, u32> =
        std::collections::HashMap::new();
    for (_, atom) in catalog.atoms() {
        let Some(gen) = atom.as_generalization() else {
            continue;
        };
        for (sub_id, _) in &gen.subclasses {
            *superclass_count.entry(*sub_id).or_insert(0) += 1;
        }
    }
    superclass_count
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(sub_id, _)| {
            diag(
                DiagnosticCode::SingleSuperclass,
                format!(
                    "class '{}' is named as a subclass in more than one generalization",
                    catalog.atom(sub_id).name()
                ),
                vec![catalog.atom(sub_id).name().to_string()],
            )
        })
        .collect()
}

/// "the top of every generalization has an identifier" (spec.md §3) — a
/// generalization's superclass is the root of its chain and must carry an
/// identifier attribute even though `identifier_placement` only inspects
/// the class's own `superclass` slot, which is `None` for every root.
pub fn generalization_root_has_identifier(catalog: &Catalog) -> Vec<Diagnostic> {
    catalog
        .atoms()
        .filter_map(|(_, a)| a.as_generalization())
        .filter_map(|gen| {
            let Atom::Class(root) = catalog.atom(gen.superclass) else {
                return None;
            };
            let has_identifier = root.attributes.iter().any(|attr_id| {
                catalog
                    .atom(*attr_id)
                    .as_attribute()
                    .map(|a| a.is_identifier)
                    .unwrap_or(false)
            });
            (!has_identifier).then(|| {
                diag(
                    DiagnosticCode::GeneralizationRootHasIdentifier,
                    format!("generalization root '{}' has no identifier attribute", root.name),
                    vec![root.name.clone()],
                )
            })
        })
        .collect()
}

pub const RULES: &[fn(&Catalog) -> Vec<Diagnostic>] = &[
    domain_non_empty,
    domain_graph_connected,
    identifier_placement,
    association_ends_distinct_role_names,
    generalization_acyclic,
    attribute_distinct_values_bound,
    names_globally_unique,
    single_superclass,
    generalization_root_has_identifier,
];
