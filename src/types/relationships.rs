//! Protocol relationship graph types

use serde::{Deserialize, Serialize};

/// A protocol record from the protocols endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default)]
    pub chains: Vec<String>,
    #[serde(default)]
    pub tvl: Option<f64>,
    #[serde(default)]
    pub parent_protocol: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    ParentChild,
    YieldSource,
    SameEcosystem,
    Integration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolRelationship {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    pub weight: f64,
    pub chain: Option<String>,
    pub evidence: String,
}
