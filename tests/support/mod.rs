//! Shared fixtures for the scenario integration tests (spec.md §8).
#![allow(dead_code)]

use dorm::loader::model::{
    AssociationDoc, AssociationEndDoc, AttributeDoc, ClassDoc, DesignDoc, DomainDoc, HyperedgeDoc,
};
use dorm::sink::{Sink, SinkError};

/// Books/Authors domain used by scenarios 1 and 2 (spec.md §8).
pub fn books_authors_domain() -> DomainDoc {
    DomainDoc {
        classes: vec![
            ClassDoc {
                name: "Book".into(),
                instance_count: 1000,
                attributes: vec![
                    AttributeDoc {
                        name: "id".into(),
                        data_type: "integer".into(),
                        size: 8,
                        distinct_values: 1000,
                        is_identifier: true,
                    },
                    AttributeDoc {
                        name: "title".into(),
                        data_type: "varchar".into(),
                        size: 200,
                        distinct_values: 1000,
                        is_identifier: false,
                    },
                    AttributeDoc {
                        name: "pub".into(),
                        data_type: "varchar".into(),
                        size: 100,
                        distinct_values: 50,
                        is_identifier: false,
                    },
                ],
            },
            ClassDoc {
                name: "Author".into(),
                instance_count: 500,
                attributes: vec![
                    AttributeDoc {
                        name: "author_id".into(),
                        data_type: "integer".into(),
                        size: 8,
                        distinct_values: 500,
                        is_identifier: true,
                    },
                    AttributeDoc {
                        name: "name".into(),
                        data_type: "varchar".into(),
                        size: 100,
                        distinct_values: 500,
                        is_identifier: false,
                    },
                    AttributeDoc {
                        name: "age".into(),
                        data_type: "integer".into(),
                        size: 4,
                        distinct_values: 80,
                        is_identifier: false,
                    },
                    AttributeDoc {
                        name: "gender".into(),
                        data_type: "varchar".into(),
                        size: 10,
                        distinct_values: 2,
                        is_identifier: false,
                    },
                    AttributeDoc {
                        name: "country".into(),
                        data_type: "varchar".into(),
                        size: 60,
                        distinct_values: 40,
                        is_identifier: false,
                    },
                ],
            },
        ],
        associations: vec![AssociationDoc {
            name: "writes".into(),
            ends: [
                AssociationEndDoc {
                    class: "Book".into(),
                    role_name: "book".into(),
                    min: 1,
                    max: Some(1),
                },
                AssociationEndDoc {
                    class: "Author".into(),
                    role_name: "author".into(),
                    min: 0,
                    max: None,
                },
            ],
        }],
        generalizations: vec![],
    }
}

/// One Set containing a single Struct anchored on Book, pulling in Author
/// through the `writes` association end (spec.md §8 scenario 1).
pub fn books_authors_design() -> DesignDoc {
    DesignDoc {
        domain: "books_authors".into(),
        hyperedges: vec![
            HyperedgeDoc::Struct {
                name: "BookWithAuthor".into(),
                elements: vec![
                    "Book".into(),
                    "id".into(),
                    "title".into(),
                    "pub".into(),
                    "Author".into(),
                    "writes.author".into(),
                    "author_id".into(),
                    "name".into(),
                    "age".into(),
                    "gender".into(),
                    "country".into(),
                ],
                anchor: vec!["Book".into(), "id".into()],
            },
            HyperedgeDoc::Set {
                name: "Books".into(),
                contents: vec!["BookWithAuthor".into()],
            },
        ],
    }
}

/// A `Sink` that records every statement it is handed, for asserting on
/// execution order without a real database driver.
pub struct RecordingSink {
    pub executed: Vec<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        RecordingSink { executed: Vec::new() }
    }
}

impl Sink for RecordingSink {
    fn execute(&mut self, statement: &str) -> Result<(), SinkError> {
        self.executed.push(statement.to_string());
        Ok(())
    }
}
