//! Parses domain and design documents into a Catalog (spec.md §2, §6).
//! No semantic checks are performed here — that is the Checker's job.

mod build;
pub mod model;

pub use build::{load_design, load_domain, LoaderError};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::model::*;

    fn books_authors_domain() -> DomainDoc {
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

    #[test]
    fn loads_classes_attributes_and_associations() {
        let catalog = load_domain(&books_authors_domain()).unwrap();
        let book = catalog.atoms_by_name("Book").unwrap();
        let author = catalog.atoms_by_name("Author").unwrap();
        assert_ne!(book, author);

        let writes = catalog.atoms_by_name("writes").unwrap();
        let assoc = catalog.atom(writes).as_association().unwrap();
        assert_eq!(assoc.ends.len(), 2);

        let title = catalog.atoms_by_name("title").unwrap();
        let title_attr = catalog.atom(title).as_attribute().unwrap();
        assert_eq!(title_attr.owning_class, book);
    }

    #[test]
    fn unknown_data_type_is_rejected() {
        let mut doc = books_authors_domain();
        doc.classes[0].attributes[0].data_type = "blob".into();
        let err = load_domain(&doc).unwrap_err();
        assert!(matches!(err, LoaderError::UnknownDataType(_)));
    }

    #[test]
    fn design_resolves_struct_then_set() {
        let domain = load_domain(&books_authors_domain()).unwrap();
        let design = DesignDoc {
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
        };
        let catalog = load_design(domain, &design).unwrap();
        let set_id = catalog.edges_by_name("Books").unwrap();
        assert!(catalog.edge(set_id).as_set().is_some());
    }
}
