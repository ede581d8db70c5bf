//! The typed statement AST emitted by the Schema Generator (spec.md §4.3).
//! Kept as data rather than raw SQL text so the render step — and, later, a
//! non-SQL sink — stays a pure function over structure.

use serde::{Deserialize, Serialize};

use crate::catalog::DataType;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    pub size: u32,
    pub nullable: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub columns: Vec<String>,
    pub references_table: String,
    pub references_columns: Vec<String>,
}

/// One DDL statement. Only `CreateTable` is needed by spec.md §4.3; the
/// Migration Planner (§4.5) reuses this module's render step for its own
/// `InsertInto` statements via `crate::translator`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    CreateTable {
        name: String,
        columns: Vec<ColumnDef>,
        primary_key: Vec<String>,
        foreign_keys: Vec<ForeignKey>,
    },
}

impl Statement {
    pub fn table_name(&self) -> &str {
        match self {
            Statement::CreateTable { name, .. } => name,
        }
    }
}
