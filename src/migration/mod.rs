//! The Migration Planner (spec.md §4.5), built atop the Query Translator.

mod plan;

pub use plan::{plan, MigrationError, MigrationPlan, MigrationStep};
