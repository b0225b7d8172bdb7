//! Derives ownership, integration and ecosystem edges between protocols.

use std::collections::{BTreeMap, HashMap};
use crate::{
    config::ReferenceData,
    types::{ProtocolRecord, ProtocolRelationship, RelationshipType},
    utils::{finite_or_zero, slugify},
};

pub const ECOSYSTEM_MIN_TVL_USD: f64 = 10_000_000.0;
pub const ECOSYSTEM_TOP_N: usize = 5;
const PARENT_PREFIX: &str = "parent#";

fn protocol_slug(record: &ProtocolRecord) -> String {
    if record.slug.trim().is_empty() {
        slugify(&record.name)
    } else {
        record.slug.trim().to_lowercase()
    }
}

fn parent_child_edges(protocols: &[ProtocolRecord]) -> Vec<ProtocolRelationship> {
    protocols
        .iter()
        .filter_map(|record| {
            let parent = record.parent_protocol.as_deref()?.trim();
            let parent = parent.strip_prefix(PARENT_PREFIX).unwrap_or(parent);
            if parent.is_empty() {
                return None;
            }
            Some(ProtocolRelationship {
                source: parent.to_lowercase(),
                target: protocol_slug(record),
                relationship_type: RelationshipType::ParentChild,
                weight: finite_or_zero(record.tvl),
                chain: None,
                evidence: format!("{} is listed under parent protocol {}", record.name, parent),
            })
        })
        .collect()
}

fn integration_edges(tvl_by_slug: &HashMap<String, f64>, reference: &ReferenceData) -> Vec<ProtocolRelationship> {
    reference
        .known_integrations
        .iter()
        .filter_map(|known| {
            let source_tvl = tvl_by_slug.get(&known.source)?;
            let target_tvl = tvl_by_slug.get(&known.target)?;
            Some(ProtocolRelationship {
                source: known.source.clone(),
                target: known.target.clone(),
                relationship_type: known.relationship_type,
                weight: source_tvl.min(*target_tvl),
                chain: None,
                evidence: known.evidence.clone(),
            })
        })
        .collect()
}

fn ecosystem_edges(protocols: &[ProtocolRecord]) -> Vec<ProtocolRelationship> {
    let mut groups: BTreeMap<(String, String), Vec<(String, f64)>> = BTreeMap::new();
    for record in protocols {
        let tvl = finite_or_zero(record.tvl);
        if tvl <= ECOSYSTEM_MIN_TVL_USD {
            continue;
        }
        let Some(category) = record.category.as_deref().filter(|c| !c.is_empty()) else {
            continue;
        };
        let chains: Vec<&str> = if record.chains.is_empty() {
            record.chain.as_deref().into_iter().collect()
        } else {
            record.chains.iter().map(String::as_str).collect()
        };
        for chain in chains {
            groups
                .entry((category.to_string(), chain.to_string()))
                .or_default()
                .push((protocol_slug(record), tvl));
        }
    }

    let mut edges = Vec::new();
    for ((category, chain), mut members) in groups {
        members.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        members.truncate(ECOSYSTEM_TOP_N);

        for (i, (source, source_tvl)) in members.iter().enumerate() {
            for (target, target_tvl) in &members[i + 1..] {
                edges.push(ProtocolRelationship {
                    source: source.clone(),
                    target: target.clone(),
                    relationship_type: RelationshipType::SameEcosystem,
                    weight: source_tvl.min(*target_tvl),
                    chain: Some(chain.clone()),
                    evidence: format!("Top {} {} protocols on {}", ECOSYSTEM_TOP_N, category, chain),
                });
            }
        }
    }
    edges
}

/// Merge edges keyed by `(source, target)`, keeping the heaviest.
pub fn dedupe_relationships(edges: Vec<ProtocolRelationship>) -> Vec<ProtocolRelationship> {
    let mut best: HashMap<(String, String), ProtocolRelationship> = HashMap::new();
    for edge in edges {
        let key = (edge.source.clone(), edge.target.clone());
        match best.get(&key) {
            Some(existing) if existing.weight >= edge.weight => {}
            _ => {
                best.insert(key, edge);
            }
        }
    }

    let mut merged: Vec<ProtocolRelationship> = best.into_values().collect();
    merged.sort_by(|a, b| {
        b.weight
            .total_cmp(&a.weight)
            .then_with(|| a.source.cmp(&b.source))
            .then_with(|| a.target.cmp(&b.target))
    });
    merged
}

pub fn build_relationships(protocols: &[ProtocolRecord], reference: &ReferenceData) -> Vec<ProtocolRelationship> {
    let tvl_by_slug: HashMap<String, f64> = protocols
        .iter()
        .map(|p| (protocol_slug(p), finite_or_zero(p.tvl)))
        .collect();

    let mut edges = parent_child_edges(protocols);
    edges.extend(integration_edges(&tvl_by_slug, reference));
    edges.extend(ecosystem_edges(protocols));
    dedupe_relationships(edges)
}
