//! Ranking and filtering over a processed pool set

use crate::types::ProcessedPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoolSortKey {
    #[default]
    Tvl,
    Apy,
    RiskScore,
    StabilityScore,
}

#[derive(Debug, Clone, Default)]
pub struct PoolQuery {
    pub chain: Option<String>,
    pub project: Option<String>,
    pub min_tvl_usd: Option<f64>,
    pub max_risk_score: Option<u32>,
    pub stablecoin_only: bool,
    pub min_stability_score: Option<u32>,
    pub sort_by: PoolSortKey,
    pub limit: Option<usize>,
}

impl PoolQuery {
    pub fn matches(&self, pool: &ProcessedPool) -> bool {
        if let Some(chain) = &self.chain {
            if !pool.chain.eq_ignore_ascii_case(chain) {
                return false;
            }
        }
        if let Some(project) = &self.project {
            if !pool.project_slug.eq_ignore_ascii_case(project) {
                return false;
            }
        }
        if self.min_tvl_usd.is_some_and(|min| pool.tvl_usd < min) {
            return false;
        }
        if self.max_risk_score.is_some_and(|max| pool.risk_score > max) {
            return false;
        }
        if self.stablecoin_only && !pool.stablecoin {
            return false;
        }
        if let Some(min) = self.min_stability_score {
            match &pool.apy_stability {
                Some(stability) if stability.score >= min => {}
                _ => return false,
            }
        }
        true
    }

    /// Matching pools, best first: highest TVL / APY / stability, lowest risk.
    pub fn apply<'a>(&self, pools: &'a [ProcessedPool]) -> Vec<&'a ProcessedPool> {
        let mut selected: Vec<&ProcessedPool> = pools.iter().filter(|p| self.matches(p)).collect();

        match self.sort_by {
            PoolSortKey::Tvl => selected.sort_by(|a, b| b.tvl_usd.total_cmp(&a.tvl_usd)),
            PoolSortKey::Apy => selected.sort_by(|a, b| b.apy.total_cmp(&a.apy)),
            PoolSortKey::RiskScore => selected.sort_by_key(|p| p.risk_score),
            PoolSortKey::StabilityScore => selected.sort_by_key(|p| {
                std::cmp::Reverse(p.apy_stability.as_ref().map(|s| s.score))
            }),
        }

        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }
}
