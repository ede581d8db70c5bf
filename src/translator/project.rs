//! Step 4, projection synthesis (spec.md §4.4). Attributes of pattern
//! classes project directly; identifiers of classes absent from the
//! pattern but reachable via a pattern association end project from that
//! end's role name, so loose ends can surface an identifier without
//! dragging the whole class into the pattern. An attribute owned by a
//! superclass outside the branch's own table (spec.md §4.1, "subclasses see
//! superclass attributes") resolves to the table that actually anchors the
//! owning class, with an extra join back to it.

use crate::catalog::{AtomId, Catalog, EdgeId};

use super::inherited::{identifier_column_name, owning_table};
use super::join::JoinPredicate;
use super::TranslatorError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projection {
    pub table: String,
    pub column: String,
    pub alias: String,
}

pub fn synthesize(
    catalog: &Catalog,
    branch: &[AtomId],
    tables: &[EdgeId],
    project: &[String],
) -> Result<(Vec<Projection>, Vec<JoinPredicate>), TranslatorError> {
    let mut projections = Vec::with_capacity(project.len());
    let mut extra_joins = Vec::new();

    for name in project {
        let id = catalog
            .atoms_by_name(name)
            .map_err(|_| TranslatorError::UnknownName(name.clone()))?;
        match catalog.atom(id).as_attribute() {
            Some(attr) => {
                if let Some(pos) = branch.iter().position(|&b| b == attr.owning_class) {
                    projections.push(Projection {
                        table: catalog.edge(tables[pos]).name().to_string(),
                        column: attr.name.clone(),
                        alias: attr.name.clone(),
                    });
                    continue;
                }

                let pos = branch
                    .iter()
                    .position(|&b| catalog.generalization_closure(b).contains(&attr.owning_class))
                    .ok_or_else(|| TranslatorError::DanglingPredicate(name.clone()))?;
                let branch_table = catalog.edge(tables[pos]).name().to_string();
                let owner_table_id = owning_table(catalog, attr.owning_class)
                    .ok_or_else(|| TranslatorError::DanglingPredicate(name.clone()))?;
                let owner_table = catalog.edge(owner_table_id).name().to_string();

                if owner_table != branch_table {
                    let join_column = identifier_column_name(catalog, branch[pos])
                        .ok_or_else(|| TranslatorError::DanglingPredicate(name.clone()))?;
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

                projections.push(Projection {
                    table: owner_table,
                    column: attr.name.clone(),
                    alias: attr.name.clone(),
                });
            }
            None => match catalog.atom(id).as_association_end() {
                Some(end) => {
                    let owner_pos = branch
                        .iter()
                        .position(|&b| {
                            catalog
                                .atom(b)
                                .as_class()
                                .map(|_| catalog.domain_paths(b, id, false).iter().any(|p| p.len() == 1))
                                .unwrap_or(false)
                        })
                        .ok_or_else(|| TranslatorError::DanglingPredicate(name.clone()))?;
                    projections.push(Projection {
                        table: catalog.edge(tables[owner_pos]).name().to_string(),
                        column: format!("{}_id", end.role_name),
                        alias: end.role_name.clone(),
                    });
                }
                None => return Err(TranslatorError::DanglingPredicate(name.clone())),
            },
        }
    }

    Ok((projections, extra_joins))
}
