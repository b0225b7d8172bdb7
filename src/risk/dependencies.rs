//! What a pool position depends on: protocol, assets, chain, oracle.

use crate::config::ReferenceData;
use crate::types::{Dependency, DependencyRisk, DependencyType, ProtocolArchetype};
use super::TVL_TIER_HUNDRED_MILLION;

const MAJOR_CHAINS: &[&str] = &[
    "ethereum", "arbitrum", "optimism", "base", "polygon", "bsc", "avalanche", "solana",
];

pub fn derive_dependencies(
    project_slug: &str,
    chain: &str,
    tvl_usd: f64,
    assets: &[String],
    archetype: ProtocolArchetype,
    reference: &ReferenceData,
) -> Vec<Dependency> {
    let mut deps = Vec::with_capacity(assets.len() + 3);

    let protocol_risk = if reference.is_established(project_slug) {
        DependencyRisk::Low
    } else if tvl_usd > TVL_TIER_HUNDRED_MILLION {
        DependencyRisk::Medium
    } else {
        DependencyRisk::High
    };
    deps.push(Dependency {
        dependency_type: DependencyType::Protocol,
        name: project_slug.to_string(),
        risk: protocol_risk,
    });

    for asset in assets {
        deps.push(Dependency {
            dependency_type: DependencyType::Asset,
            name: asset.clone(),
            risk: if reference.is_blue_chip(asset) {
                DependencyRisk::Low
            } else {
                DependencyRisk::High
            },
        });
    }

    if archetype == ProtocolArchetype::Lending {
        deps.push(Dependency {
            dependency_type: DependencyType::Oracle,
            name: format!("{}-price-oracle", project_slug),
            risk: DependencyRisk::Medium,
        });
    }

    let chain_lower = chain.to_lowercase();
    deps.push(Dependency {
        dependency_type: DependencyType::Chain,
        name: chain.to_string(),
        risk: if MAJOR_CHAINS.contains(&chain_lower.as_str()) {
            DependencyRisk::Low
        } else {
            DependencyRisk::Medium
        },
    });

    deps
}
