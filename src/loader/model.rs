//! Input document shapes (spec.md §6): domain file, design file, query file.
//! Plain `serde` structs — the Loader parses these with no semantic checks;
//! that is the Checker's job.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DomainDoc {
    pub classes: Vec<ClassDoc>,
    #[serde(default)]
    pub associations: Vec<AssociationDoc>,
    #[serde(default)]
    pub generalizations: Vec<GeneralizationDoc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassDoc {
    pub name: String,
    pub instance_count: u64,
    pub attributes: Vec<AttributeDoc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttributeDoc {
    pub name: String,
    pub data_type: String,
    pub size: u32,
    pub distinct_values: u64,
    pub is_identifier: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssociationDoc {
    pub name: String,
    pub ends: [AssociationEndDoc; 2],
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssociationEndDoc {
    pub class: String,
    pub role_name: String,
    pub min: u32,
    pub max: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneralizationDoc {
    pub name: String,
    pub superclass: String,
    #[serde(default)]
    pub disjoint: bool,
    #[serde(default)]
    pub complete: bool,
    pub subclasses: Vec<SubclassDoc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubclassDoc {
    pub class: String,
    #[serde(default)]
    pub constraint: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DesignDoc {
    pub domain: String,
    pub hyperedges: Vec<HyperedgeDoc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum HyperedgeDoc {
    Set { name: String, contents: Vec<String> },
    Struct {
        name: String,
        elements: Vec<String>,
        anchor: Vec<String>,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryDoc {
    pub project: Vec<String>,
    pub pattern: Vec<String>,
    pub filter: String,
}
