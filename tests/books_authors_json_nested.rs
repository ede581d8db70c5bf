//! Scenario 2 (spec.md §8): same Books-Authors inputs, JSON_NESTED paradigm.
//! The query's result multiset must match scenario 1's, but the physical
//! rendering differs: JSON_NESTED tables carry only `key`/`value` columns
//! (spec.md §4.3), so the translator extracts each projected or filtered
//! attribute as a JSON path against `value` instead of a column reference
//! (spec.md §4.4 steps 3 and 5).

mod support;

use dorm::checker;
use dorm::config::Paradigm;
use dorm::loader::{load_design, load_domain};
use dorm::schema_gen;
use dorm::schema_gen::statement::Statement;
use dorm::termination::CancellationToken;
use dorm::translator::{translate, Query};

#[test]
fn json_nested_schema_is_a_single_key_value_table() {
    let domain = load_domain(&support::books_authors_domain()).unwrap();
    let catalog = load_design(domain, &support::books_authors_design()).unwrap();
    assert!(checker::check(&catalog).is_ok());

    let statements = schema_gen::generate(&catalog, Paradigm::JsonNested, &CancellationToken::new()).unwrap();
    assert_eq!(statements.len(), 1);

    let Statement::CreateTable { name, columns, primary_key, .. } = &statements[0];
    assert_eq!(name, "Books");
    assert_eq!(primary_key, &vec!["key".to_string()]);
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[0].name, "key");
    assert_eq!(columns[1].name, "value");
    assert_eq!(columns[1].data_type, dorm::catalog::DataType::Json);
}

#[test]
fn json_nested_query_extracts_json_paths_not_columns() {
    let domain = load_domain(&support::books_authors_domain()).unwrap();
    let catalog = load_design(domain, &support::books_authors_design()).unwrap();

    let query = Query {
        project: vec!["title".into(), "name".into()],
        pattern: vec!["Book".into(), "writes".into(), "Author".into()],
        filter: Some("age>100".into()),
    };
    let flat = translate(&catalog, &query, Paradigm::Flat).unwrap();
    let json_nested = translate(&catalog, &query, Paradigm::JsonNested).unwrap();

    // Same single table, no join either way, but the column references must
    // genuinely differ: JSON_NESTED has no `title`/`name`/`age` columns to
    // reference, only `key`/`value` (src/schema_gen/json_nested.rs).
    assert_ne!(flat.sql, json_nested.sql);
    assert!(flat.sql.contains("Books.title"));
    assert!(!json_nested.sql.contains("Books.title"));

    assert!(json_nested.sql.contains("FROM Books"));
    assert!(json_nested.sql.contains("Books.value->>'title'"));
    assert!(json_nested.sql.contains("Books.value->'author'->>'name'"));
    assert!(json_nested.sql.contains("(Books.value->'author'->'age')::numeric > 100"));
    assert!(!json_nested.sql.contains("UNION ALL"));
    assert!(!json_nested.sql.contains("JOIN"));
}
