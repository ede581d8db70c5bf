//! JSON_NESTED paradigm generator (spec.md §4.3): one table per first-level
//! Set with a surrogate `key` and a document `value` column; nested
//! structure is expressed inside the document rather than as columns, so
//! render-time detail (field names, arrays) is left to `render`.

use crate::catalog::{Catalog, DataType, SetContents};
use crate::termination::CancellationToken;

use super::statement::{ColumnDef, Statement};
use super::SchemaGenError;

pub fn generate(catalog: &Catalog, token: &CancellationToken) -> Result<Vec<Statement>, SchemaGenError> {
    let sets: Vec<(crate::catalog::EdgeId, &crate::catalog::SetEdge)> =
        catalog.edges().filter_map(|(id, e)| e.as_set().map(|s| (id, s))).collect();

    let mut statements = Vec::with_capacity(sets.len());
    for (_, set) in super::topo_sort_sets(catalog, &sets)? {
        if token.is_cancelled() {
            return Err(SchemaGenError::Cancelled { at_statement: statements.len() });
        }
        // Depth is checked by the Checker (scenario 6, spec.md §8); a Set
        // surviving to schema generation nests at most one level deep.
        if let SetContents::Structs(ids) = &set.contents {
            for sid in ids {
                if catalog.edge(*sid).as_struct().is_none() {
                    return Err(SchemaGenError::UnexpectedNesting(set.name.clone()));
                }
            }
        }

        statements.push(Statement::CreateTable {
            name: set.name.clone(),
            columns: vec![
                ColumnDef {
                    name: "key".to_string(),
                    data_type: DataType::Integer,
                    size: 8,
                    nullable: false,
                },
                ColumnDef {
                    name: "value".to_string(),
                    data_type: DataType::Json,
                    size: 0,
                    nullable: false,
                },
            ],
            primary_key: vec!["key".to_string()],
            foreign_keys: vec![],
        });
    }
    Ok(statements)
}
