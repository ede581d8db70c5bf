use serde::{Deserialize, Serialize};

/// Identifies which invariant of spec.md §3 a diagnostic came from. Not
/// exhaustive of every named bullet — `Other` carries anything not worth a
/// dedicated variant — but every rule group the checker runs maps to one of
/// these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    DomainNonEmpty,
    NamesGloballyUnique,
    DomainGraphConnected,
    ExactlyOneIdentifier,
    GeneralizationRootHasIdentifier,
    NonRootClassHasNoIdentifier,
    DistinctRoleNames,
    GeneralizationAcyclic,
    SingleSuperclass,
    DistinctValuesBound,
    EveryAtomInSomeSetAndStruct,
    SetContainsOnlyStructsOrClass,
    SiblingStructsShareAnchor,
    SiblingDiscriminatorRequired,
    StructAnchorNonEmpty,
    StructAnchorIsIdentifying,
    StructAnchorDisjointFromElements,
    StructConnected,
    AnchorConnected,
    NoSharedGeneralizationChainInStruct,
    ExactlyOnePathToAnchor,
    DiscriminatorMandatoryForSubclassesOrSiblings,
    EveryClassLinkedToAnchorViaMandatoryChain,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
    pub offending_names: Vec<String>,
}

/// Output of the Checker (spec.md §4.2): every rule runs, every violation
/// is collected, nothing short-circuits.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CheckReport {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
