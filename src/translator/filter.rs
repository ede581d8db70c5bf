//! Step 5, filter translation (spec.md §4.4): each atomic predicate is
//! rewritten against its physical column; predicates naming an attribute of
//! a pattern-absent class fail with `DanglingPredicate`. A predicate over a
//! superclass-owned attribute resolves to the table that actually anchors
//! the owning class, with an extra join back to it (see `project::synthesize`).

use crate::catalog::{AtomId, Catalog, EdgeId};

use super::inherited::{identifier_column_name, owning_table};
use super::join::JoinPredicate;
use super::query::AtomicPredicate;
use super::TranslatorError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhysicalPredicate {
    pub table: String,
    pub column: String,
    pub operator: String,
    pub value: String,
}

pub fn translate(
    catalog: &Catalog,
    branch: &[AtomId],
    tables: &[EdgeId],
    predicates: &[AtomicPredicate],
) -> Result<(Vec<PhysicalPredicate>, Vec<JoinPredicate>), TranslatorError> {
    let mut physical = Vec::with_capacity(predicates.len());
    let mut extra_joins = Vec::new();

    for p in predicates {
        let id = catalog
            .atoms_by_name(&p.attribute_name)
            .map_err(|_| TranslatorError::UnknownName(p.attribute_name.clone()))?;
        let attr = catalog
            .atom(id)
            .as_attribute()
            .ok_or_else(|| TranslatorError::DanglingPredicate(p.attribute_name.clone()))?;

        // See `project::synthesize`: a subclass branch sees its
        // superclass's attributes via generalization closure, but the
        // attribute physically lives in whichever table anchors the owning
        // class, not necessarily the branch's own table.
        if let Some(pos) = branch.iter().position(|&b| b == attr.owning_class) {
            physical.push(PhysicalPredicate {
                table: catalog.edge(tables[pos]).name().to_string(),
                column: attr.name.clone(),
                operator: p.operator.clone(),
                value: p.value.clone(),
            });
            continue;
        }

        let pos = branch
            .iter()
            .position(|&b| catalog.generalization_closure(b).contains(&attr.owning_class))
            .ok_or_else(|| TranslatorError::DanglingPredicate(p.attribute_name.clone()))?;
        let branch_table = catalog.edge(tables[pos]).name().to_string();
        let owner_table_id = owning_table(catalog, attr.owning_class)
            .ok_or_else(|| TranslatorError::DanglingPredicate(p.attribute_name.clone()))?;
        let owner_table = catalog.edge(owner_table_id).name().to_string();

        if owner_table != branch_table {
            let join_column = identifier_column_name(catalog, branch[pos])
                .ok_or_else(|| TranslatorError::DanglingPredicate(p.attribute_name.clone()))?;
            let predicate = JoinPredicate {
                left_table: branch_table,
                left_column: join_column.clone(),
                right_table: owner_table.clone(),
                right_column: join_column,
            };
            if !extra_joins.contains(&predicate) {
                extra_joins.push(predicate);
            }
        }

        physical.push(PhysicalPredicate {
            table: owner_table,
            column: attr.name.clone(),
            operator: p.operator.clone(),
            value: p.value.clone(),
        });
    }

    Ok((physical, extra_joins))
}
