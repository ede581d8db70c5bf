//! Resolution for superclass-owned attributes seen through a subclass
//! branch (spec.md §4.1 "subclasses see superclass attributes", §4.4 step
//! 3). A subclass's own table never stores an inherited attribute — it has
//! to be read from whichever table actually anchors the owning ancestor
//! class, joined back by the identifier column the subclass table borrows
//! from it (see `schema_gen::flat::inherited_identifier_columns`).

use crate::catalog::{Atom, AtomId, Catalog, EdgeId};

/// The identifier column name `class_id`'s own table carries: its own
/// identifier attribute if it has one, else the nearest ancestor's
/// identifier name, which schema generation copies onto a subclass table
/// verbatim so the two tables can be joined on it.
pub fn identifier_column_name(catalog: &Catalog, class_id: AtomId) -> Option<String> {
    for candidate in catalog.generalization_closure(class_id) {
        if let Atom::Class(class) = catalog.atom(candidate) {
            let found = class
                .attributes
                .iter()
                .filter_map(|id| catalog.atom(*id).as_attribute())
                .find(|a| a.is_identifier)
                .map(|a| a.name.clone());
            if found.is_some() {
                return found;
            }
        }
    }
    None
}

/// The Set that physically anchors `class_id` — as opposed to a branch
/// table that merely sees it through generalization. Ties broken
/// lexicographically by table name for determinism.
pub fn owning_table(catalog: &Catalog, class_id: AtomId) -> Option<EdgeId> {
    let mut candidates = catalog.sets_containing(class_id);
    candidates.sort_by_key(|id| catalog.edge(*id).name().to_string());
    candidates.into_iter().next()
}
