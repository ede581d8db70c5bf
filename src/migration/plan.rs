//! Migration planning (spec.md §4.5): given a source and target design over
//! the same domain, synthesize the read queries and insert statements that
//! drain the source into a freshly generated target schema.

use thiserror::Error;

use crate::catalog::{Atom, Catalog, Hyperedge, SetContents};
use crate::config::Paradigm;
use crate::schema_gen::{self, Statement};
use crate::termination::CancellationToken;
use crate::translator::{self, Query};

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("source schema is not annotated as containing data; migration refuses to run")]
    NoData,
    #[error(transparent)]
    SchemaGen(#[from] schema_gen::SchemaGenError),
    #[error(transparent)]
    Translator(#[from] translator::TranslatorError),
    #[error("cancelled before step {at_step}")]
    Cancelled { at_step: usize },
}

/// One step of a migration plan. `CreateTarget` statements run first (in
/// `MigrationPlan::create_steps`), then one `CopyInto` per target Set in
/// anchor-before-referrer order, then a trailing statistics refresh.
#[derive(Clone, Debug)]
pub enum MigrationStep {
    CreateTarget(Statement),
    CopyInto {
        target_table: String,
        select_sql: String,
    },
    RefreshStatistics,
}

#[derive(Clone, Debug)]
pub struct MigrationPlan {
    pub steps: Vec<MigrationStep>,
}

/// Plans a migration from `(source_catalog, source_paradigm)` to
/// `(target_catalog, target_paradigm)`. `source_has_data` mirrors the
/// `has_data` annotation on the persisted source schema (spec.md §6); when
/// false the planner refuses outright (spec.md §4.5). `token` is polled
/// between emitted steps, never mid-step (spec.md §5).
pub fn plan(
    source_catalog: &Catalog,
    source_paradigm: Paradigm,
    target_catalog: &Catalog,
    target_paradigm: Paradigm,
    source_has_data: bool,
    token: &CancellationToken,
) -> Result<MigrationPlan, MigrationError> {
    if !source_has_data {
        return Err(MigrationError::NoData);
    }

    let target_statements = schema_gen::generate(target_catalog, target_paradigm, token)?;
    let mut steps: Vec<MigrationStep> = Vec::with_capacity(target_statements.len() * 2 + 1);
    for statement in &target_statements {
        if token.is_cancelled() {
            return Err(MigrationError::Cancelled { at_step: steps.len() });
        }
        steps.push(MigrationStep::CreateTarget(statement.clone()));
    }

    for statement in &target_statements {
        if token.is_cancelled() {
            return Err(MigrationError::Cancelled { at_step: steps.len() });
        }
        let table = statement.table_name();
        let query = read_query_for_set(target_catalog, table);
        let result = translator::translate(source_catalog, &query, source_paradigm)?;
        for warning in &result.warnings {
            log::warn!("migration read query for '{table}': {warning}");
        }
        steps.push(MigrationStep::CopyInto {
            target_table: table.to_string(),
            select_sql: result.sql,
        });
    }

    if token.is_cancelled() {
        return Err(MigrationError::Cancelled { at_step: steps.len() });
    }
    steps.push(MigrationStep::RefreshStatistics);
    Ok(MigrationPlan { steps })
}

/// Builds `project = all attributes of the target Set` and `pattern` from
/// every class the Set's Struct(s) touch (spec.md §4.5, "using 4.4 as a
/// subroutine").
fn read_query_for_set(catalog: &Catalog, set_name: &str) -> Query {
    let set_id = catalog
        .edges_by_name(set_name)
        .expect("target statement name always names a target Set");
    let Hyperedge::Set(set) = catalog.edge(set_id) else {
        unreachable!("schema generator only emits statements for Sets")
    };

    let mut project = Vec::new();
    let mut pattern = Vec::new();

    let mut add_class = |catalog: &Catalog, class_id: crate::catalog::AtomId, project: &mut Vec<String>, pattern: &mut Vec<String>| {
        let Atom::Class(class) = catalog.atom(class_id) else {
            return;
        };
        let name = class.name.clone();
        if !pattern.contains(&name) {
            pattern.push(name);
        }
        for attr_id in &class.attributes {
            if let Atom::Attribute(attr) = catalog.atom(*attr_id) {
                if !project.contains(&attr.name) {
                    project.push(attr.name.clone());
                }
            }
        }
    };

    match &set.contents {
        SetContents::Class(class_id) => add_class(catalog, *class_id, &mut project, &mut pattern),
        SetContents::Structs(ids) => {
            for sid in ids {
                let Hyperedge::Struct(s) = catalog.edge(*sid) else { continue };
                for &el in s.elements.iter().chain(s.anchor.iter()) {
                    if catalog.atom(el).as_class().is_some() {
                        add_class(catalog, el, &mut project, &mut pattern);
                    }
                }
            }
        }
    }

    Query {
        project,
        pattern,
        filter: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AttributeAtom, ClassAtom, DataType, SetEdge, StructEdge};

    fn single_class_catalog(set_name: &str) -> Catalog {
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
            elements: vec![],
            anchor: vec![book, id_attr],
        }))
        .unwrap();
        let struct_id = b.edge_id("BookStruct").unwrap();
        b.add_edge(Hyperedge::Set(SetEdge {
            name: set_name.to_string(),
            contents: SetContents::Structs(vec![struct_id]),
        }))
        .unwrap();
        b.build()
    }

    #[test]
    fn refuses_without_has_data_annotation() {
        let source = single_class_catalog("Books");
        let target = single_class_catalog("Books");
        let err = plan(
            &source,
            Paradigm::Flat,
            &target,
            Paradigm::JsonNested,
            false,
            &CancellationToken::new(),
        )
        .unwrap_err();
        assert!(matches!(err, MigrationError::NoData));
    }

    #[test]
    fn plans_create_then_copy_then_refresh() {
        let source = single_class_catalog("Books");
        let target = single_class_catalog("Books");
        let plan = plan(
            &source,
            Paradigm::Flat,
            &target,
            Paradigm::Flat,
            true,
            &CancellationToken::new(),
        )
        .unwrap();
        assert!(matches!(plan.steps[0], MigrationStep::CreateTarget(_)));
        assert!(matches!(plan.steps[1], MigrationStep::CopyInto { .. }));
        assert!(matches!(plan.steps.last().unwrap(), MigrationStep::RefreshStatistics));
    }

    #[test]
    fn cancellation_is_observed_before_schema_generation_completes() {
        let source = single_class_catalog("Books");
        let target = single_class_catalog("Books");
        let token = CancellationToken::new();
        token.cancel();
        let err = plan(&source, Paradigm::Flat, &target, Paradigm::Flat, true, &token).unwrap_err();
        assert!(matches!(
            err,
            MigrationError::SchemaGen(schema_gen::SchemaGenError::Cancelled { .. })
        ));
    }
}
