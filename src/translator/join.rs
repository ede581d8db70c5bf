//! Step 3, join synthesis (spec.md §4.4). Pattern atoms mapped to the same
//! table need no join; atoms in different tables are connected through the
//! `domain_paths` hop that crosses a loose association end, matching the
//! `{role}_id` foreign-key convention the Schema Generator emits for the
//! same loose end (see `schema_gen::flat`).

use crate::catalog::{AtomId, Catalog, EdgeId};

use super::TranslatorError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinPredicate {
    pub left_table: String,
    pub left_column: String,
    pub right_table: String,
    pub right_column: String,
}

fn identifier_column(catalog: &Catalog, class_id: AtomId) -> Option<String> {
    catalog
        .atom(class_id)
        .as_class()?
        .attributes
        .iter()
        .filter_map(|id| catalog.atom(*id).as_attribute())
        .find(|a| a.is_identifier)
        .map(|a| a.name.clone())
}

/// Returns the join predicates for `branch` plus whether any pair admitted
/// more than one minimal path (spec.md §4.4 `AmbiguousPath` warning).
pub fn synthesize(
    catalog: &Catalog,
    branch: &[AtomId],
    tables: &[EdgeId],
) -> Result<(Vec<JoinPredicate>, bool), TranslatorError> {
    let mut joins = Vec::new();
    let mut ambiguous = false;

    for i in 0..branch.len() {
        if catalog.atom(branch[i]).as_class().is_none() {
            continue;
        }
        for j in 0..branch.len() {
            if i == j || tables[i] == tables[j] {
                continue;
            }
            if catalog.atom(branch[j]).as_class().is_none() {
                continue;
            }

            let paths = catalog.domain_paths(branch[i], branch[j], false);
            let Some(path) = paths.first() else {
                return Err(TranslatorError::Disconnected(format!(
                    "'{}' and '{}' are not connected in the domain",
                    catalog.atom(branch[i]).name(),
                    catalog.atom(branch[j]).name()
                )));
            };
            if paths.len() > 1 {
                ambiguous = true;
            }

            let hop = path
                .iter()
                .find(|h| {
                    catalog
                        .atom(h.to)
                        .as_association_end()
                        .map(|e| e.referenced_class == branch[j])
                        .unwrap_or(false)
                });
            let Some(hop) = hop else { continue };
            let end = catalog.atom(hop.to).as_association_end().unwrap();
            let Some(right_column) = identifier_column(catalog, branch[j]) else {
                continue;
            };

            let predicate = JoinPredicate {
                left_table: catalog.edge(tables[i]).name().to_string(),
                left_column: format!("{}_id", end.role_name),
                right_table: catalog.edge(tables[j]).name().to_string(),
                right_column,
            };
            if !joins.contains(&predicate) {
                joins.push(predicate);
            }
        }
    }

    Ok((joins, ambiguous))
}
