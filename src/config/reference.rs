//! Reference allow-lists used by the scorers.
//!
//! Scoring code never reads these tables globally; a `ReferenceData` is
//! passed in so tests can swap in synthetic lists and deployments can ship
//! updated lists as JSON without a rebuild.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use crate::errors::{EngineError, EngineResult};
use crate::types::RelationshipType;

const STABLECOINS: &[&str] = &[
    "USDC", "USDT", "DAI", "FRAX", "LUSD", "TUSD", "USDP", "GUSD", "BUSD", "PYUSD", "USDE",
    "SUSDE", "USDS", "SUSDS", "CRVUSD", "GHO", "FDUSD", "MIM", "DOLA", "USDD", "EURC", "EURS",
    "USD0", "RLUSD", "USDX", "SDAI", "USDY", "USDM",
];

const BLUE_CHIP_ASSETS: &[&str] = &["ETH", "BTC", "SOL"];

const ESTABLISHED_PROTOCOLS: &[&str] = &[
    "aave-v2", "aave-v3", "compound-v2", "compound-v3", "lido", "rocket-pool", "makerdao",
    "sky-lending", "spark", "curve-dex", "convex-finance", "uniswap-v2", "uniswap-v3",
    "balancer-v2", "morpho-blue", "jito-liquid-staking", "marinade-liquid-staking",
    "binance-staked-eth", "coinbase-wrapped-staked-eth", "frax-ether", "ether.fi-stake",
    "pendle", "yearn-finance", "ethena-usde", "kamino-lend", "justlend", "venus-core-pool",
];

const LENDING_PROTOCOLS: &[&str] = &[
    "aave", "compound", "morpho", "spark", "radiant", "venus", "benqi", "euler", "fluid",
    "kamino-lend", "marginfi", "solend", "silo", "moonwell", "justlend", "sky-lending",
];

const LIQUID_STAKING_PROTOCOLS: &[&str] = &[
    "lido", "rocket-pool", "jito", "marinade", "frax-ether", "stakewise", "binance-staked",
    "coinbase-wrapped-staked", "mantle-staked", "ether.fi", "renzo", "kelp", "swell",
    "stader", "ankr", "jupiter-staked", "sanctum",
];

const SYMBOL_ALIASES: &[(&str, &str)] = &[
    ("WETH", "ETH"), ("STETH", "ETH"), ("WSTETH", "ETH"), ("RETH", "ETH"), ("CBETH", "ETH"),
    ("WEETH", "ETH"), ("EETH", "ETH"), ("EZETH", "ETH"), ("RSETH", "ETH"), ("METH", "ETH"),
    ("FRXETH", "ETH"), ("SFRXETH", "ETH"), ("SWETH", "ETH"), ("OSETH", "ETH"), ("ETHX", "ETH"),
    ("WBTC", "BTC"), ("CBBTC", "BTC"), ("TBTC", "BTC"), ("BTCB", "BTC"), ("LBTC", "BTC"),
    ("SOLVBTC", "BTC"), ("WSOL", "SOL"), ("MSOL", "SOL"), ("JITOSOL", "SOL"), ("BSOL", "SOL"),
    ("JUPSOL", "SOL"), ("INF", "SOL"), ("USDC.E", "USDC"), ("USDBC", "USDC"), ("AXLUSDC", "USDC"),
    ("USDT.E", "USDT"), ("USDT0", "USDT"), ("USD₮0", "USDT"), ("DAI.E", "DAI"),
    ("WMATIC", "MATIC"), ("WPOL", "POL"), ("WAVAX", "AVAX"), ("SAVAX", "AVAX"), ("WBNB", "BNB"),
    ("WFTM", "FTM"), ("WS", "S"),
];

const KNOWN_INTEGRATIONS: &[(&str, &str, RelationshipType, &str)] = &[
    ("convex-finance", "curve-dex", RelationshipType::YieldSource, "Convex boosts Curve LP rewards"),
    ("yearn-finance", "curve-dex", RelationshipType::YieldSource, "Yearn vaults farm Curve pools"),
    ("yearn-finance", "aave-v3", RelationshipType::YieldSource, "Yearn strategies lend on Aave"),
    ("pendle", "lido", RelationshipType::YieldSource, "Pendle tokenizes stETH yield"),
    ("pendle", "ethena-usde", RelationshipType::YieldSource, "Pendle tokenizes sUSDe yield"),
    ("morpho-blue", "aave-v3", RelationshipType::Integration, "Morpho optimizers route to Aave"),
    ("aura", "balancer-v2", RelationshipType::YieldSource, "Aura boosts Balancer LP rewards"),
    ("spark", "makerdao", RelationshipType::Integration, "Spark is funded by Maker D3M"),
    ("beefy", "aave-v3", RelationshipType::YieldSource, "Beefy vaults compound Aave supply"),
    ("eigenlayer", "lido", RelationshipType::Integration, "stETH is restakable on EigenLayer"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownIntegration {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    pub evidence: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferenceData {
    pub stablecoins: HashSet<String>,
    /// Non-stable majors; stablecoins are treated as blue-chip as well.
    pub blue_chip_assets: HashSet<String>,
    pub established_protocols: HashSet<String>,
    pub lending_protocols: Vec<String>,
    pub liquid_staking_protocols: Vec<String>,
    pub symbol_aliases: HashMap<String, String>,
    pub known_integrations: Vec<KnownIntegration>,
}

fn upper_set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_uppercase()).collect()
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self {
            stablecoins: upper_set(STABLECOINS),
            blue_chip_assets: upper_set(BLUE_CHIP_ASSETS),
            established_protocols: ESTABLISHED_PROTOCOLS.iter().map(|s| s.to_string()).collect(),
            lending_protocols: LENDING_PROTOCOLS.iter().map(|s| s.to_string()).collect(),
            liquid_staking_protocols: LIQUID_STAKING_PROTOCOLS.iter().map(|s| s.to_string()).collect(),
            symbol_aliases: SYMBOL_ALIASES
                .iter()
                .map(|(from, to)| (from.to_uppercase(), to.to_uppercase()))
                .collect(),
            known_integrations: KNOWN_INTEGRATIONS
                .iter()
                .map(|(source, target, relationship_type, evidence)| KnownIntegration {
                    source: source.to_string(),
                    target: target.to_string(),
                    relationship_type: *relationship_type,
                    evidence: evidence.to_string(),
                })
                .collect(),
        }
    }
}

impl ReferenceData {
    /// Load allow-lists from JSON. Missing keys fall back to the built-in tables.
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        let load = || -> anyhow::Result<Self> {
            let content = std::fs::read_to_string(path).context("Failed to read file")?;
            let mut data: Self = serde_json::from_str(&content).context("Invalid reference JSON")?;
            data.normalize_case();
            Ok(data)
        };
        load().map_err(|source| EngineError::ReferenceData {
            path: path.to_path_buf(),
            source,
        })
    }

    fn normalize_case(&mut self) {
        self.stablecoins = self.stablecoins.iter().map(|s| s.to_uppercase()).collect();
        self.blue_chip_assets = self.blue_chip_assets.iter().map(|s| s.to_uppercase()).collect();
        self.established_protocols = self.established_protocols.iter().map(|s| s.to_lowercase()).collect();
        self.lending_protocols.iter_mut().for_each(|s| *s = s.to_lowercase());
        self.liquid_staking_protocols.iter_mut().for_each(|s| *s = s.to_lowercase());
        self.symbol_aliases = self
            .symbol_aliases
            .iter()
            .map(|(k, v)| (k.to_uppercase(), v.to_uppercase()))
            .collect();
    }

    pub fn is_stablecoin(&self, asset: &str) -> bool {
        self.stablecoins.contains(asset)
    }

    pub fn is_blue_chip(&self, asset: &str) -> bool {
        self.blue_chip_assets.contains(asset) || self.is_stablecoin(asset)
    }

    pub fn is_established(&self, project_slug: &str) -> bool {
        self.established_protocols.contains(project_slug)
    }
}
