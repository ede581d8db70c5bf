//! The abstract domain-level query (spec.md §4.4).

use serde::{Deserialize, Serialize};

/// `Q = (project, pattern, filter)`. Every field is name-based — the
/// translator resolves names against the Catalog at the start of
/// `translate`, per spec.md §5 ("weak, name-based references").
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Query {
    /// Attribute or association-end role names to project.
    pub project: Vec<String>,
    /// Class or association names forming the query's pattern. No
    /// generalizations; no two pattern atoms on the same generalization
    /// chain.
    pub pattern: Vec<String>,
    /// A flat conjunction of atomic comparisons, e.g. `"age>100 AND x=1"`.
    /// `None` means no filter. Arbitrary predicate algebra is a Non-goal
    /// (spec.md §1); this is deliberately not a general expression AST.
    pub filter: Option<String>,
}

/// One resolved `AND`-joined atomic comparison from `Query::filter`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtomicPredicate {
    pub attribute_name: String,
    pub operator: String,
    pub value: String,
}

pub fn split_filter(filter: &str) -> Vec<AtomicPredicate> {
    filter
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .split(" AND ")
        .filter(|s| !s.trim().is_empty())
        .map(parse_atomic)
        .collect()
}

fn parse_atomic(clause: &str) -> AtomicPredicate {
    const OPERATORS: &[&str] = &[">=", "<=", "!=", "=", ">", "<"];
    for op in OPERATORS {
        if let Some(pos) = clause.find(op) {
            return AtomicPredicate {
                attribute_name: clause[..pos].trim().to_string(),
                operator: op.to_string(),
                value: clause[pos + op.len()..].trim().to_string(),
            };
        }
    }
    AtomicPredicate {
        attribute_name: clause.trim().to_string(),
        operator: String::new(),
        value: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_conjunction() {
        let preds = split_filter("age>100 AND country=US");
        assert_eq!(preds.len(), 2);
        assert_eq!(preds[0].attribute_name, "age");
        assert_eq!(preds[0].operator, ">");
        assert_eq!(preds[0].value, "100");
    }
}
