/// Physical realization style a design is compiled against (spec.md §4.3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config-files", derive(serde::Serialize, serde::Deserialize))]
pub enum Paradigm {
    /// One table per Set, one column per attribute/foreign key/discriminator.
    Flat,
    /// One table per first-level Set, with a `key`/`value` document column.
    JsonNested,
}

/// Tie-break policy for multi-path traversals (spec.md §4.1).
///
/// Only `LexicographicEdgeName` is normative today (the source documentation
/// leaves anything beyond it informal — spec.md §9 open question (b)); the
/// enum exists so a future policy can be added without breaking callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "config-files", derive(serde::Serialize, serde::Deserialize))]
pub enum TieBreakPolicy {
    LexicographicEdgeName,
}

impl Default for TieBreakPolicy {
    fn default() -> Self {
        TieBreakPolicy::LexicographicEdgeName
    }
}
