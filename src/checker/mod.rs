//! The Checker (spec.md §4.2): a pure fold over named rule functions, each
//! `fn(&Catalog) -> Vec<Diagnostic>`. Every rule runs; every violation is
//! collected. Nothing short-circuits, so a single `check()` call reports the
//! whole set of problems with a catalog in one pass (Design Notes §9,
//! "checker as a fold").

mod design_rules;
mod diagnostics;
mod domain_rules;

pub use diagnostics::{CheckReport, Diagnostic, DiagnosticCode};

use crate::catalog::Catalog;

/// Runs every domain and design rule against `catalog`, returning a report
/// that never short-circuits. All diagnostics are currently reported as
/// errors; spec.md does not distinguish warning-level rules, so
/// `CheckReport::warnings` stays empty pending a future rule that earns it.
pub fn check(catalog: &Catalog) -> CheckReport {
    let mut errors = Vec::new();
    for rule in domain_rules::RULES {
        errors.extend(rule(catalog));
    }
    for rule in design_rules::RULES {
        errors.extend(rule(catalog));
    }
    CheckReport {
        errors,
        warnings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        Atom, AttributeAtom, ClassAtom, DataType, Hyperedge, SetContents, SetEdge, StructEdge,
    };

    #[test]
    fn clean_catalog_has_no_diagnostics() {
        let mut b = Catalog::builder();
        let book = b
            .add_atom(Atom::Class(ClassAtom {
                name: "Book".into(),
                instance_count: 10,
                attributes: vec![],
                superclass: None,
            }))
            .unwrap();
        let id_attr = b
            .add_atom(Atom::Attribute(AttributeAtom {
                name: "id".into(),
                owning_class: book,
                data_type: DataType::Integer,
                size: 8,
                distinct_values: 10,
                is_identifier: true,
            }))
            .unwrap();
        if let Atom::Class(c) = b.atom_mut(book) {
            c.attributes = vec![id_attr];
        }
        b.add_edge(Hyperedge::Struct(StructEdge {
            name: "BookStruct".into(),
            elements: vec![id_attr],
            anchor: vec![book],
        }))
        .unwrap();
        b.add_edge(Hyperedge::Set(SetEdge {
            name: "Books".into(),
            contents: SetContents::Structs(vec![crate::catalog::EdgeId(0)]),
        }))
        .unwrap();
        let catalog = b.build();
        let report = check(&catalog);
        assert!(report.is_ok(), "unexpected diagnostics: {:?}", report.errors);
    }

    #[test]
    fn missing_struct_coverage_is_reported() {
        let mut b = Catalog::builder();
        b.add_atom(Atom::Class(ClassAtom {
            name: "Orphan".into(),
            instance_count: 1,
            attributes: vec![],
            superclass: None,
        }))
        .unwrap();
        let catalog = b.build();
        let report = check(&catalog);
        assert!(!report.is_ok());
        assert!(report
            .errors
            .iter()
            .any(|d| d.code == DiagnosticCode::EveryAtomInSomeSetAndStruct));
    }
}
