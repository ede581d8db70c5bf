//! FLAT paradigm generator (spec.md §4.3): one table per Set, columns drawn
//! from the attributes of the Set's Struct(s) plus foreign keys for loose
//! association ends.

use std::collections::{HashMap, HashSet};

use crate::catalog::{Atom, AtomId, Catalog, EdgeId, Hyperedge, SetContents, StructEdge};
use crate::termination::CancellationToken;

use super::statement::{ColumnDef, ForeignKey, Statement};
use super::SchemaGenError;

/// Maps each anchor class to the table that owns it and that table's
/// identifier columns, so loose association ends elsewhere can reference
/// them without re-deriving the anchor chain. A second pass fills in classes
/// whose own Struct anchors on the Class atom alone (a subclass under a
/// table-per-subclass generalization, spec.md §4.3) by inheriting the
/// identifier column name from the nearest ancestor that has one — the
/// subclass table carries that same-named column so it can be joined back.
fn anchor_index(catalog: &Catalog) -> HashMap<AtomId, (String, Vec<String>)> {
    let mut index = HashMap::new();
    for (_, edge) in catalog.edges() {
        let Hyperedge::Set(set) = edge else { continue };
        let table = set.name.clone();
        match &set.contents {
            SetContents::Class(class_id) => {
                let ids = identifier_column_names(catalog, *class_id);
                index.insert(*class_id, (table, ids));
            }
            SetContents::Structs(struct_ids) => {
                for sid in struct_ids {
                    let Hyperedge::Struct(s) = catalog.edge(*sid) else { continue };
                    for &a in &s.anchor {
                        if let Atom::Class(_) = catalog.atom(a) {
                            let ids: Vec<String> = s
                                .anchor
                                .iter()
                                .filter_map(|id| catalog.atom(*id).as_attribute())
                                .map(|attr| attr.name.clone())
                                .collect();
                            index.insert(a, (table.clone(), ids));
                        }
                    }
                }
            }
        }
    }

    let inherited: Vec<(AtomId, Vec<String>)> = index
        .iter()
        .filter(|(_, (_, ids))| ids.is_empty())
        .filter_map(|(&class_id, _)| {
            let ids = inherited_identifier_names(catalog, class_id)?;
            Some((class_id, ids))
        })
        .collect();
    for (class_id, ids) in inherited {
        if let Some(entry) = index.get_mut(&class_id) {
            entry.1 = ids;
        }
    }

    index
}

/// The identifier column name(s) a subclass's own table would share with its
/// nearest ancestor that carries an identifier (spec.md §3, "no non-top
/// class carries an identifier" — a subclass table under a table-per-
/// subclass design reuses the root's identifier name for its own row
/// identity column, see [`inherited_identifier_columns`]).
fn inherited_identifier_names(catalog: &Catalog, class_id: AtomId) -> Option<Vec<String>> {
    for &ancestor in catalog.generalization_closure(class_id).iter().skip(1) {
        let ids = identifier_column_names(catalog, ancestor);
        if !ids.is_empty() {
            return Some(ids);
        }
    }
    None
}

fn identifier_column_names(catalog: &Catalog, class_id: AtomId) -> Vec<String> {
    let Atom::Class(class) = catalog.atom(class_id) else {
        return Vec::new();
    };
    class
        .attributes
        .iter()
        .filter_map(|id| catalog.atom(*id).as_attribute())
        .filter(|a| a.is_identifier)
        .map(|a| a.name.clone())
        .collect()
}

/// Whether `class_id` is directly embedded (its own Class atom present) in
/// `strct` — if so an association end targeting it is a path marker, not a
/// column-producing loose end. Checked across both `elements` and `anchor`
/// since the two are disjoint halves of the same membership.
fn class_embedded(catalog: &Catalog, strct: &StructEdge, class_id: AtomId) -> bool {
    strct
        .all_atoms()
        .any(|id| *id == class_id && catalog.atom(*id).as_class().is_some())
}

/// The nearest proper ancestor of `class_id` that owns its own identifier
/// attribute(s), closest first. A subclass under table-per-subclass (spec.md
/// §4.3) carries no identifier of its own — every non-root class borrows its
/// row identity from this ancestor.
fn nearest_identified_ancestor(catalog: &Catalog, class_id: AtomId) -> Option<AtomId> {
    catalog
        .generalization_closure(class_id)
        .iter()
        .skip(1)
        .find(|&&ancestor| !identifier_column_names(catalog, ancestor).is_empty())
        .copied()
}

/// Columns and foreign key a subclass-anchored table gains from its nearest
/// identified ancestor, so two structs for the same generalization chain
/// (e.g. `Student`/`Worker` over `Person`) can be joined back to the
/// ancestor's table by a shared, identically-named identifier column.
fn inherited_identifier_columns(
    catalog: &Catalog,
    class_id: AtomId,
    anchors: &HashMap<AtomId, (String, Vec<String>)>,
) -> Option<(Vec<ColumnDef>, ForeignKey)> {
    if !identifier_column_names(catalog, class_id).is_empty() {
        return None;
    }
    let ancestor = nearest_identified_ancestor(catalog, class_id)?;
    let Atom::Class(ancestor_class) = catalog.atom(ancestor) else {
        return None;
    };
    let columns: Vec<ColumnDef> = ancestor_class
        .attributes
        .iter()
        .filter_map(|id| catalog.atom(*id).as_attribute())
        .filter(|a| a.is_identifier)
        .map(|a| ColumnDef {
            name: a.name.clone(),
            data_type: a.data_type.clone(),
            size: a.size,
            nullable: false,
        })
        .collect();
    if columns.is_empty() {
        return None;
    }
    let (target_table, target_columns) = anchors.get(&ancestor)?;
    let column_names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
    Some((
        columns,
        ForeignKey {
            columns: column_names,
            references_table: target_table.clone(),
            references_columns: target_columns.clone(),
        },
    ))
}

struct StructColumns {
    anchor_columns: Vec<ColumnDef>,
    body_columns: Vec<ColumnDef>,
    foreign_keys: Vec<ForeignKey>,
}

fn columns_for_struct(
    catalog: &Catalog,
    strct: &StructEdge,
    anchors: &HashMap<AtomId, (String, Vec<String>)>,
) -> Result<StructColumns, SchemaGenError> {
    let mut anchor_columns = Vec::new();
    let mut foreign_keys = Vec::new();
    for &id in &strct.anchor {
        match catalog.atom(id) {
            Atom::Attribute(attr) => anchor_columns.push(ColumnDef {
                name: attr.name.clone(),
                data_type: attr.data_type.clone(),
                size: attr.size,
                nullable: false,
            }),
            Atom::Class(_) if anchor_columns.is_empty() => {
                if let Some((cols, fk)) = inherited_identifier_columns(catalog, id, anchors) {
                    anchor_columns.extend(cols);
                    foreign_keys.push(fk);
                }
            }
            _ => {}
        }
    }

    let mut body_columns = Vec::new();
    for &id in &strct.elements {
        match catalog.atom(id) {
            Atom::Attribute(attr) => body_columns.push(ColumnDef {
                name: attr.name.clone(),
                data_type: attr.data_type.clone(),
                size: attr.size,
                nullable: false,
            }),
            Atom::Class(_) => {}
            Atom::AssociationEnd(end) => {
                if class_embedded(catalog, strct, end.referenced_class) {
                    continue;
                }
                let (target_table, target_columns) = anchors.get(&end.referenced_class).ok_or_else(|| {
                    SchemaGenError::UnanchoredClass(catalog.atom(end.referenced_class).name().to_string())
                })?;
                let fk_column = format!("{}_id", end.role_name);
                body_columns.push(ColumnDef {
                    name: fk_column.clone(),
                    data_type: crate::catalog::DataType::Integer,
                    size: 8,
                    nullable: !end.multiplicity.is_mandatory(),
                });
                foreign_keys.push(ForeignKey {
                    columns: vec![fk_column],
                    references_table: target_table.clone(),
                    references_columns: target_columns.clone(),
                });
            }
            Atom::Association(_) | Atom::Generalization(_) => {}
        }
    }

    Ok(StructColumns {
        anchor_columns,
        body_columns,
        foreign_keys,
    })
}

fn merge_columns(existing: &mut Vec<ColumnDef>, incoming: Vec<ColumnDef>) {
    let names: HashSet<String> = existing.iter().map(|c| c.name.clone()).collect();
    for mut col in incoming {
        if names.contains(&col.name) {
            continue;
        }
        col.nullable = true;
        existing.push(col);
    }
}

pub fn generate(catalog: &Catalog, token: &CancellationToken) -> Result<Vec<Statement>, SchemaGenError> {
    let anchors = anchor_index(catalog);
    let sets: Vec<(EdgeId, &crate::catalog::SetEdge)> =
        catalog.edges().filter_map(|(id, e)| e.as_set().map(|s| (id, s))).collect();

    let mut statements = Vec::with_capacity(sets.len());
    for (_, set) in super::topo_sort_sets(catalog, &sets)? {
        if token.is_cancelled() {
            return Err(SchemaGenError::Cancelled { at_statement: statements.len() });
        }
        let structs: Vec<&StructEdge> = match &set.contents {
            SetContents::Class(class_id) => {
                let Atom::Class(class) = catalog.atom(*class_id) else {
                    return Err(SchemaGenError::UnanchoredClass(
                        catalog.atom(*class_id).name().to_string(),
                    ));
                };
                let ids = identifier_column_names(catalog, *class_id);
                let mut columns: Vec<ColumnDef> = class
                    .attributes
                    .iter()
                    .filter_map(|id| catalog.atom(*id).as_attribute())
                    .map(|attr| ColumnDef {
                        name: attr.name.clone(),
                        data_type: attr.data_type.clone(),
                        size: attr.size,
                        nullable: false,
                    })
                    .collect();
                columns.sort_by_key(|c| !ids.contains(&c.name));
                statements.push(Statement::CreateTable {
                    name: set.name.clone(),
                    columns,
                    primary_key: ids,
                    foreign_keys: vec![],
                });
                continue;
            }
            SetContents::Structs(ids) => ids
                .iter()
                .filter_map(|id| catalog.edge(*id).as_struct())
                .collect(),
        };

        let mut anchor_columns: Vec<ColumnDef> = Vec::new();
        let mut body_columns: Vec<ColumnDef> = Vec::new();
        let mut foreign_keys: Vec<ForeignKey> = Vec::new();
        for strct in &structs {
            let cols = columns_for_struct(catalog, strct, &anchors)?;
            if anchor_columns.is_empty() {
                anchor_columns = cols.anchor_columns;
            } else {
                merge_columns(&mut anchor_columns, cols.anchor_columns);
            }
            merge_columns(&mut body_columns, cols.body_columns);
            for fk in cols.foreign_keys {
                if !foreign_keys.iter().any(|existing: &ForeignKey| existing.columns == fk.columns) {
                    foreign_keys.push(fk);
                }
            }
        }

        if structs.len() > 1 {
            body_columns.push(ColumnDef {
                name: "struct_kind".to_string(),
                data_type: crate::catalog::DataType::Varchar,
                size: 64,
                nullable: false,
            });
        }

        let mut primary_key: Vec<String> = anchor_columns.iter().map(|c| c.name.clone()).collect();
        for fk in &foreign_keys {
            for col in &fk.columns {
                if !primary_key.contains(col) {
                    primary_key.push(col.clone());
                }
            }
        }

        let mut columns = anchor_columns;
        columns.extend(body_columns);

        statements.push(Statement::CreateTable {
            name: set.name.clone(),
            columns,
            primary_key,
            foreign_keys,
        });
    }

    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        AssociationAtom, AssociationEndAtom, AttributeAtom, ClassAtom, DataType, Multiplicity,
        SetEdge,
    };

    #[test]
    fn books_authors_flat_produces_single_table() {
        let mut b = Catalog::builder();
        let book = b
            .add_atom(Atom::Class(ClassAtom {
                name: "Book".into(),
                instance_count: 10,
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
                distinct_values: 10,
                is_identifier: true,
            }))
            .unwrap();
        let title = b
            .add_atom(Atom::Attribute(AttributeAtom {
                name: "title".into(),
                owning_class: book,
                data_type: DataType::Varchar,
                size: 200,
                distinct_values: 10,
                is_identifier: false,
            }))
            .unwrap();
        if let Atom::Class(c) = b.atom_mut(book) {
            c.attributes = vec![book_id, title];
        }
        let author = b
            .add_atom(Atom::Class(ClassAtom {
                name: "Author".into(),
                instance_count: 5,
                attributes: vec![],
                superclass: None,
            }))
            .unwrap();
        let name = b
            .add_atom(Atom::Attribute(AttributeAtom {
                name: "name".into(),
                owning_class: author,
                data_type: DataType::Varchar,
                size: 100,
                distinct_values: 5,
                is_identifier: false,
            }))
            .unwrap();
        if let Atom::Class(c) = b.atom_mut(author) {
            c.attributes = vec![name];
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
            elements: vec![title, author, author_end, name],
            anchor: vec![book, book_id],
        }))
        .unwrap();
        let struct_id = b.edge_id("BookWithAuthor").unwrap();
        b.add_edge(Hyperedge::Set(SetEdge {
            name: "Books".into(),
            contents: SetContents::Structs(vec![struct_id]),
        }))
        .unwrap();

        let catalog = b.build();
        let statements = generate(&catalog, &CancellationToken::new()).unwrap();
        assert_eq!(statements.len(), 1);
        let Statement::CreateTable { name, columns, primary_key, .. } = &statements[0];
        assert_eq!(name, "Books");
        assert_eq!(primary_key, &vec!["id".to_string()]);
        assert!(columns.iter().any(|c| c.name == "title"));
        assert!(columns.iter().any(|c| c.name == "name"));
    }
}
