use thiserror::Error;

use crate::checker::DiagnosticCode;
use crate::loader::LoaderError;
use crate::migration::MigrationError;
use crate::schema_gen::SchemaGenError;
use crate::sink::SinkError;
use crate::translator::TranslatorError;

/// Root error type for the catalog kernel.
///
/// Every subsystem owns a leaf `thiserror` enum; this type only wraps them
/// so callers crossing the Loader/Catalog/Checker/compiler boundary can
/// propagate with a single `?`.
#[derive(Debug, Error)]
pub enum DormError {
    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error("unknown name: {0}")]
    UnknownName(String),

    #[error("domain invariant violated ({rule_id:?}): {message}")]
    DomainInvariantViolation {
        rule_id: DiagnosticCode,
        message: String,
    },

    #[error("design invariant violated ({rule_id:?}): {message}")]
    DesignInvariantViolation {
        rule_id: DiagnosticCode,
        message: String,
    },

    #[error(transparent)]
    Translator(#[from] TranslatorError),

    #[error(transparent)]
    SchemaGen(#[from] SchemaGenError),

    #[error(transparent)]
    Migration(#[from] MigrationError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("internal assertion failed: {0}")]
    InternalAssertion(String),
}

// Note: no blanket `From<DormError> for Box<dyn Error>` — the standard
// library already provides a conflicting implementation for all StdError
// types. Leave conversions explicit where needed.
