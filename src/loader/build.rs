use std::collections::HashMap;

use thiserror::Error;

use crate::catalog::{
    Atom, AssociationAtom, AssociationEndAtom, AttributeAtom, Catalog, CatalogBuilder, ClassAtom,
    DataType, GeneralizationAtom, Hyperedge, Multiplicity, SetContents, SetEdge, StructEdge,
};

use super::model::{DesignDoc, DomainDoc, HyperedgeDoc};

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unknown data type: {0}")]
    UnknownDataType(String),
    #[error("reference to unknown atom or hyperedge: {0}")]
    UnknownReference(String),
    #[error("{0}")]
    Catalog(#[from] crate::catalog::CatalogError),
}

fn parse_data_type(raw: &str) -> Result<DataType, LoaderError> {
    match raw.to_ascii_lowercase().as_str() {
        "integer" | "int" => Ok(DataType::Integer),
        "float" | "double" | "real" => Ok(DataType::Float),
        "boolean" | "bool" => Ok(DataType::Boolean),
        "date" => Ok(DataType::Date),
        "timestamp" | "datetime" => Ok(DataType::Timestamp),
        "varchar" | "string" | "text" => Ok(DataType::Varchar),
        other => Err(LoaderError::UnknownDataType(other.to_string())),
    }
}

/// Parses a domain document into a fresh Catalog. Performs no semantic
/// validation (spec.md §2, "Loader — ... no semantic checks"); class
/// attribute order, association end order, and generalization subclass
/// order are preserved verbatim from the document for deterministic output.
pub fn load_domain(doc: &DomainDoc) -> Result<Catalog, LoaderError> {
    let mut builder = Catalog::builder();
    let mut class_ids = HashMap::new();

    for class in &doc.classes {
        let id = builder.add_atom(Atom::Class(ClassAtom {
            name: class.name.clone(),
            instance_count: class.instance_count,
            attributes: vec![],
            superclass: None,
        }))?;
        class_ids.insert(class.name.clone(), id);
    }

    for class in &doc.classes {
        let class_id = class_ids[&class.name];
        let mut attribute_ids = Vec::with_capacity(class.attributes.len());
        for attr in &class.attributes {
            let data_type = parse_data_type(&attr.data_type)?;
            let id = builder.add_atom(Atom::Attribute(AttributeAtom {
                name: attr.name.clone(),
                owning_class: class_id,
                data_type,
                size: attr.size,
                distinct_values: attr.distinct_values,
                is_identifier: attr.is_identifier,
            }))?;
            attribute_ids.push(id);
        }
        // Attribute refs are recorded on the class after the fact since the
        // class atom must exist before its attributes can reference it.
        if let Atom::Class(c) = builder.atom_mut(class_id) {
            c.attributes = attribute_ids;
        }
    }

    for assoc in &doc.associations {
        let mut end_ids = Vec::with_capacity(2);
        for end in &assoc.ends {
            let referenced_class = *class_ids
                .get(&end.class)
                .ok_or_else(|| LoaderError::UnknownReference(end.class.clone()))?;
            let end_name = format!("{}.{}", assoc.name, end.role_name);
            let id = builder.add_atom(Atom::AssociationEnd(AssociationEndAtom {
                name: end_name,
                referenced_class,
                role_name: end.role_name.clone(),
                multiplicity: Multiplicity {
                    min: end.min,
                    max: end.max,
                },
            }))?;
            end_ids.push(id);
        }
        builder.add_atom(Atom::Association(AssociationAtom {
            name: assoc.name.clone(),
            ends: [end_ids[0], end_ids[1]],
        }))?;
    }

    for gen in &doc.generalizations {
        let superclass = *class_ids
            .get(&gen.superclass)
            .ok_or_else(|| LoaderError::UnknownReference(gen.superclass.clone()))?;
        let mut subclasses = Vec::with_capacity(gen.subclasses.len());
        for sub in &gen.subclasses {
            let sub_id = *class_ids
                .get(&sub.class)
                .ok_or_else(|| LoaderError::UnknownReference(sub.class.clone()))?;
            subclasses.push((sub_id, sub.constraint.clone()));
        }
        builder.add_atom(Atom::Generalization(GeneralizationAtom {
            name: gen.name.clone(),
            superclass,
            subclasses: subclasses.clone(),
            disjoint: gen.disjoint,
            complete: gen.complete,
        }))?;
        for (sub_id, _) in subclasses {
            if let Atom::Class(c) = builder.atom_mut(sub_id) {
                c.superclass = Some(superclass);
            }
        }
    }

    Ok(builder.build())
}

/// Resolves a design document's hyperedges against an already-loaded
/// Catalog, appending Struct and Set atoms to it. Structs are resolved
/// before Sets, since a Set's contents name Struct or Class atoms.
pub fn load_design(domain_catalog: Catalog, doc: &DesignDoc) -> Result<Catalog, LoaderError> {
    let mut builder = reopen(domain_catalog);

    for edge in &doc.hyperedges {
        if let HyperedgeDoc::Struct {
            name,
            elements,
            anchor,
        } = edge
        {
            let anchor_ids = resolve_atom_names(&builder, anchor)?;
            // `elements` and `anchor` are stored disjoint (spec.md §3); a
            // design document is free to list an anchor atom under `elements`
            // too (as a reminder it's part of the record), so normalize here
            // rather than push the duplication downstream.
            let element_ids = resolve_atom_names(&builder, elements)?
                .into_iter()
                .filter(|id| !anchor_ids.contains(id))
                .collect();
            builder.add_edge(Hyperedge::Struct(StructEdge {
                name: name.clone(),
                elements: element_ids,
                anchor: anchor_ids,
            }))?;
        }
    }

    for edge in &doc.hyperedges {
        if let HyperedgeDoc::Set { name, contents } = edge {
            let set_contents = if contents.len() == 1 && builder.atom_id(&contents[0]).is_ok() {
                SetContents::Class(builder.atom_id(&contents[0])?)
            } else {
                let mut struct_ids = Vec::with_capacity(contents.len());
                for c in contents {
                    struct_ids.push(builder.edge_id(c)?);
                }
                SetContents::Structs(struct_ids)
            };
            builder.add_edge(Hyperedge::Set(SetEdge {
                name: name.clone(),
                contents: set_contents,
            }))?;
        }
    }

    Ok(builder.build())
}

fn resolve_atom_names(
    builder: &CatalogBuilder,
    names: &[String],
) -> Result<Vec<crate::catalog::AtomId>, LoaderError> {
    names.iter().map(|n| Ok(builder.atom_id(n)?)).collect()
}

/// Reopens a built Catalog for further mutation. The Catalog is append-only
/// during construction (spec.md §3 "Lifecycle"); the Loader is the only
/// caller allowed to do this, after which the Catalog is handed to the
/// Checker and never mutated again.
fn reopen(catalog: Catalog) -> CatalogBuilder {
    let mut builder = Catalog::builder();
    for (_, atom) in catalog.atoms() {
        builder.add_atom(atom.clone()).expect("catalog atoms are already unique");
    }
    for (_, edge) in catalog.edges() {
        builder.add_edge(edge.clone()).expect("catalog edges are already unique");
    }
    builder
}

