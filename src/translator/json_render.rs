//! JSON_NESTED physical rendering (spec.md §4.4 steps 3 and 5): the schema
//! generator gives every JSON_NESTED table only a surrogate `key` and a
//! document `value` column (`schema_gen::json_nested`), so a logical column
//! reference has to become a JSON path extraction against `value` rather
//! than a column name, and a join becomes a containment check against the
//! target table's `key` instead of an equi-join on a shared column.

use crate::catalog::{Atom, Catalog, EdgeId, SetContents};

/// The path segments locating `column` inside `table`'s JSON document:
/// top-level if `column` belongs to the table's own anchor class (or is a
/// loose-end foreign key, which the FLAT schema also keeps at the top
/// level — see `schema_gen::flat::columns_for_struct`); nested one level
/// under the embedding association end's role name when `column` belongs to
/// a class embedded inside the struct (spec.md §4.3, one level of nesting).
pub fn path_segments(catalog: &Catalog, table: EdgeId, column: &str) -> Vec<String> {
    let Some(set) = catalog.edge(table).as_set() else {
        return vec![column.to_string()];
    };
    if let SetContents::Structs(struct_ids) = &set.contents {
        for sid in struct_ids {
            let Some(strct) = catalog.edge(*sid).as_struct() else {
                continue;
            };
            for &el in &strct.elements {
                let Atom::AssociationEnd(end) = catalog.atom(el) else {
                    continue;
                };
                if format!("{}_id", end.role_name) == column {
                    continue; // loose-end foreign keys stay top-level
                }
                let embedded = strct.elements.contains(&end.referenced_class)
                    || strct.anchor.contains(&end.referenced_class);
                if !embedded {
                    continue;
                }
                let Atom::Class(class) = catalog.atom(end.referenced_class) else {
                    continue;
                };
                let owns_column = class
                    .attributes
                    .iter()
                    .filter_map(|id| catalog.atom(*id).as_attribute())
                    .any(|a| a.name == column);
                if owns_column {
                    return vec![end.role_name.clone(), column.to_string()];
                }
            }
        }
    }
    vec![column.to_string()]
}

/// Renders a Postgres JSONB `->`/`->>` extraction chain against
/// `table.value`. The final hop uses `->>` (text) unless `as_numeric`, in
/// which case it uses `->` and the whole expression is cast `::numeric` so
/// numeric comparisons compare as numbers rather than lexicographically.
pub fn json_path_expr(table: &str, segments: &[String], as_numeric: bool) -> String {
    let (last, init) = segments.split_last().expect("path always has a final segment");
    let mut expr = format!("{table}.value");
    for seg in init {
        expr.push_str(&format!("->'{seg}'"));
    }
    if as_numeric {
        format!("({expr}->'{last}')::numeric")
    } else {
        format!("{expr}->>'{last}'")
    }
}

/// A document-key containment join: the left document's `left_column`
/// field (a logical foreign key, same name FLAT would give it) must equal
/// the right table's surrogate `key` (spec.md §4.4 step 3).
pub fn json_join_condition(left_table: &str, left_column: &str, right_table: &str) -> String {
    format!("({left_table}.value->>'{left_column}')::integer = {right_table}.key")
}
