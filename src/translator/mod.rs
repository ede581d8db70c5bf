//! The Query Translator (spec.md §4.4): compiles a domain-level `Query`
//! against the installed design into one executable statement, following
//! the six-step pipeline from Design Notes §9 ("model each branch as a
//! value, build the set of branches as a semantic container").

mod expand;
mod filter;
mod inherited;
mod join;
mod json_render;
mod mapping;
mod project;
pub mod query;

use thiserror::Error;

use crate::catalog::{AtomId, Catalog, EdgeId};
use crate::config::Paradigm;

pub use query::Query;

#[derive(Debug, Error)]
pub enum TranslatorError {
    #[error("pattern atoms are not connected: {0}")]
    Disconnected(String),
    #[error("ambiguous path with no tie-break resolution: {0}")]
    AmbiguousPath(String),
    #[error("unknown name: {0}")]
    UnknownName(String),
    #[error("generalization expansion produced no surviving branch")]
    EmptyExpansion,
    #[error("predicate references an attribute outside the pattern: {0}")]
    DanglingPredicate(String),
}

/// A compiled query (spec.md §4.4 output). `sql` is already a `UNION ALL`
/// over every surviving concrete branch; `warnings` carries
/// non-fatal `AmbiguousPath`/table-mapping-ambiguity notices;
/// `deduplicated_tables` records whether a branch needed the same table
/// twice in its FROM clause (spec.md §9, open question (a) — the
/// duplication is preserved and surfaced, not silently fixed).
#[derive(Clone, Debug)]
pub struct TranslationResult {
    pub sql: String,
    pub warnings: Vec<String>,
    pub deduplicated_tables: bool,
}

pub fn translate(catalog: &Catalog, query: &Query, paradigm: Paradigm) -> Result<TranslationResult, TranslatorError> {
    if query.project.is_empty() || query.pattern.is_empty() {
        return Err(TranslatorError::EmptyExpansion);
    }

    let pattern_ids = expand::resolve_pattern(catalog, &query.pattern)?;
    let branches = expand::expand(catalog, &pattern_ids)?;
    let predicates = query
        .filter
        .as_deref()
        .map(query::split_filter)
        .unwrap_or_default();

    let mut branch_sqls: Vec<String> = Vec::new();
    let mut warnings = Vec::new();
    let mut deduplicated_tables = false;

    for branch in &branches {
        let table_mapping = mapping::map_branch(catalog, branch)?;
        if table_mapping.ambiguous {
            warnings.push(format!(
                "branch [{}] admitted more than one table mapping; minimal-Set-count choice applied",
                branch_names(catalog, branch)
            ));
        }

        let (mut joins, ambiguous_path) = join::synthesize(catalog, branch, &table_mapping.tables)?;
        if ambiguous_path {
            warnings.push(format!(
                "branch [{}] admitted more than one minimal join path",
                branch_names(catalog, branch)
            ));
        }

        let (projections, project_joins) =
            project::synthesize(catalog, branch, &table_mapping.tables, &query.project)?;
        let (physical_predicates, filter_joins) =
            filter::translate(catalog, branch, &table_mapping.tables, &predicates)?;

        // Inherited-attribute resolution (spec.md §4.1) may contribute its
        // own join back to the table that actually anchors a superclass,
        // on top of the joins `join::synthesize` derives from the pattern.
        for extra in project_joins.into_iter().chain(filter_joins) {
            if !joins.contains(&extra) {
                joins.push(extra);
            }
        }

        // The open FROM-clause-dedup question (spec.md §9 (a)) only bites
        // when the same table is the join *target* more than once — a
        // plain multi-class Struct sharing one table needs no join at all
        // and is not this case.
        let mut join_targets = std::collections::HashSet::new();
        let branch_dedup = joins.iter().any(|j| !join_targets.insert(j.right_table.clone()));
        if branch_dedup {
            deduplicated_tables = true;
            warnings.push(format!(
                "branch [{}] references the same table from more than one join; FROM-clause occurrence kept singular (spec.md §9, open question (a))",
                branch_names(catalog, branch)
            ));
        }

        let (sql, _) = render_branch(
            catalog,
            branch,
            &table_mapping.tables,
            &projections,
            &joins,
            &physical_predicates,
            paradigm,
        );
        if !branch_sqls.contains(&sql) {
            branch_sqls.push(sql);
        }
    }

    if branch_sqls.is_empty() {
        return Err(TranslatorError::EmptyExpansion);
    }

    Ok(TranslationResult {
        sql: branch_sqls.join("\nUNION ALL\n"),
        warnings,
        deduplicated_tables,
    })
}

fn branch_names(catalog: &Catalog, branch: &[AtomId]) -> String {
    branch
        .iter()
        .map(|id| catalog.atom(*id).name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_branch(
    catalog: &Catalog,
    branch: &[AtomId],
    tables: &[EdgeId],
    projections: &[project::Projection],
    joins: &[join::JoinPredicate],
    predicates: &[filter::PhysicalPredicate],
    paradigm: Paradigm,
) -> (String, bool) {
    let mut seen_tables: Vec<String> = Vec::new();
    let mut deduplicated = false;
    // Only Class positions denote an actual FROM-clause table; Association
    // and AssociationEnd pattern atoms are connectors resolved to a
    // placeholder table in `mapping::map_branch` and contribute nothing
    // here.
    for (&atom, &t) in branch.iter().zip(tables.iter()) {
        if catalog.atom(atom).as_class().is_none() {
            continue;
        }
        let name = catalog.edge(t).name().to_string();
        if seen_tables.contains(&name) {
            deduplicated = true;
        } else {
            seen_tables.push(name);
        }
    }
    // An inherited-attribute join (spec.md §4.1) may reference a table that
    // no pattern atom maps to directly (the superclass's own table).
    for j in joins {
        if !seen_tables.contains(&j.left_table) {
            seen_tables.push(j.left_table.clone());
        }
        if !seen_tables.contains(&j.right_table) {
            seen_tables.push(j.right_table.clone());
        }
    }

    let from_clause = seen_tables.join(", ");

    match paradigm {
        Paradigm::Flat => {
            let select_clause = projections
                .iter()
                .map(|p| format!("{}.{} AS {}", p.table, p.column, p.alias))
                .collect::<Vec<_>>()
                .join(", ");

            let mut conditions: Vec<String> = joins
                .iter()
                .map(|j| format!("{}.{} = {}.{}", j.left_table, j.left_column, j.right_table, j.right_column))
                .collect();
            conditions.extend(
                predicates
                    .iter()
                    .map(|p| format!("{}.{} {} {}", p.table, p.column, p.operator, p.value)),
            );

            let where_clause = if conditions.is_empty() {
                String::new()
            } else {
                format!(" WHERE {}", conditions.join(" AND "))
            };

            (format!("SELECT {select_clause} FROM {from_clause}{where_clause}"), deduplicated)
        }
        Paradigm::JsonNested => {
            let select_clause = projections
                .iter()
                .map(|p| {
                    let table_id = catalog.edges_by_name(&p.table).ok();
                    let segments = table_id
                        .map(|t| json_render::path_segments(catalog, t, &p.column))
                        .unwrap_or_else(|| vec![p.column.clone()]);
                    let expr = json_render::json_path_expr(&p.table, &segments, false);
                    format!("{expr} AS {}", p.alias)
                })
                .collect::<Vec<_>>()
                .join(", ");

            let mut conditions: Vec<String> = joins
                .iter()
                .map(|j| json_render::json_join_condition(&j.left_table, &j.left_column, &j.right_table))
                .collect();
            conditions.extend(predicates.iter().map(|p| {
                let table_id = catalog.edges_by_name(&p.table).ok();
                let segments = table_id
                    .map(|t| json_render::path_segments(catalog, t, &p.column))
                    .unwrap_or_else(|| vec![p.column.clone()]);
                let as_numeric = matches!(p.operator.as_str(), "<" | ">" | "<=" | ">=");
                let expr = json_render::json_path_expr(&p.table, &segments, as_numeric);
                format!("{expr} {} {}", p.operator, p.value)
            }));

            let where_clause = if conditions.is_empty() {
                String::new()
            } else {
                format!(" WHERE {}", conditions.join(" AND "))
            };

            (format!("SELECT {select_clause} FROM {from_clause}{where_clause}"), deduplicated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        Atom, AssociationAtom, AssociationEndAtom, AttributeAtom, ClassAtom, DataType, Hyperedge,
        Multiplicity, SetContents, SetEdge, StructEdge,
    };

    fn books_authors_catalog() -> Catalog {
        let mut b = Catalog::builder();
        let book = b
            .add_atom(Atom::Class(ClassAtom {
                name: "Book".into(),
                instance_count: 1000,
                attributes: vec![],
                superclass: None,
            }))
            .unwrap();
        let book_id = b
            .add_atom(Atom::Attribute(AttributeAtom {
                name: "id".into(),
                owning_class: book,
                data_type: DataType::Integer,
                size: 8,
                distinct_values: 1000,
                is_identifier: true,
            }))
            .unwrap();
        let title = b
            .add_atom(Atom::Attribute(AttributeAtom {
                name: "title".into(),
                owning_class: book,
                data_type: DataType::Varchar,
                size: 200,
                distinct_values: 1000,
                is_identifier: false,
            }))
            .unwrap();
        if let Atom::Class(c) = b.atom_mut(book) {
            c.attributes = vec![book_id, title];
        }
        let author = b
            .add_atom(Atom::Class(ClassAtom {
                name: "Author".into(),
                instance_count: 500,
                attributes: vec![],
                superclass: None,
            }))
            .unwrap();
        let author_id = b
            .add_atom(Atom::Attribute(AttributeAtom {
                name: "author_id".into(),
                owning_class: author,
                data_type: DataType::Integer,
                size: 8,
                distinct_values: 500,
                is_identifier: true,
            }))
            .unwrap();
        let name = b
            .add_atom(Atom::Attribute(AttributeAtom {
                name: "name".into(),
                owning_class: author,
                data_type: DataType::Varchar,
                size: 100,
                distinct_values: 500,
                is_identifier: false,
            }))
            .unwrap();
        let age = b
            .add_atom(Atom::Attribute(AttributeAtom {
                name: "age".into(),
                owning_class: author,
                data_type: DataType::Integer,
                size: 4,
                distinct_values: 80,
                is_identifier: false,
            }))
            .unwrap();
        if let Atom::Class(c) = b.atom_mut(author) {
            c.attributes = vec![author_id, name, age];
        }
        let book_end = b
            .add_atom(Atom::AssociationEnd(AssociationEndAtom {
                name: "writes.book".into(),
                referenced_class: book,
                role_name: "book".into(),
                multiplicity: Multiplicity { min: 1, max: Some(1) },
            }))
            .unwrap();
        let author_end = b
            .add_atom(Atom::AssociationEnd(AssociationEndAtom {
                name: "writes.author".into(),
                referenced_class: author,
                role_name: "author".into(),
                multiplicity: Multiplicity { min: 0, max: None },
            }))
            .unwrap();
        b.add_atom(Atom::Association(AssociationAtom {
            name: "writes".into(),
            ends: [book_end, author_end],
        }))
        .unwrap();

        b.add_edge(Hyperedge::Struct(StructEdge {
            name: "BookWithAuthor".into(),
            elements: vec![title, author, author_end, author_id, name, age],
            anchor: vec![book, book_id],
        }))
        .unwrap();
        let struct_id = b.edge_id("BookWithAuthor").unwrap();
        b.add_edge(Hyperedge::Set(SetEdge {
            name: "Books".into(),
            contents: SetContents::Structs(vec![struct_id]),
        }))
        .unwrap();

        b.build()
    }

    #[test]
    fn books_authors_query_is_single_table_select() {
        let catalog = books_authors_catalog();
        let query = Query {
            project: vec!["title".into(), "name".into()],
            pattern: vec!["Book".into(), "writes".into(), "Author".into()],
            filter: Some("age>100".into()),
        };
        let result = translate(&catalog, &query, Paradigm::Flat).unwrap();
        assert!(result.sql.contains("FROM Books"));
        assert!(!result.sql.contains("JOIN"));
        assert!(result.sql.contains("age > 100"));
        assert!(!result.sql.contains("UNION ALL"));
    }

    #[test]
    fn json_nested_query_extracts_json_paths_instead_of_columns() {
        let catalog = books_authors_catalog();
        let query = Query {
            project: vec!["title".into(), "name".into()],
            pattern: vec!["Book".into(), "writes".into(), "Author".into()],
            filter: Some("age>100".into()),
        };
        let result = translate(&catalog, &query, Paradigm::JsonNested).unwrap();
        assert!(result.sql.contains("Books.value->>'title'"));
        assert!(result.sql.contains("Books.value->'author'->>'name'"));
        assert!(result.sql.contains("(Books.value->'author'->'age')::numeric > 100"));
        assert!(!result.sql.contains("Books.title"));
        assert!(!result.sql.contains("UNION ALL"));
    }

    #[test]
    fn unknown_project_name_is_rejected() {
        let catalog = books_authors_catalog();
        let query = Query {
            project: vec!["nonexistent".into()],
            pattern: vec!["Book".into()],
            filter: None,
        };
        assert!(matches!(
            translate(&catalog, &query, Paradigm::Flat),
            Err(TranslatorError::UnknownName(_))
        ));
    }
}
