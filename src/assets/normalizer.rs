//! Collapses wrapped and staked token variants to their base asset.

use crate::config::ReferenceData;

const SYMBOL_SEPARATORS: &[char] = &['-', '/', '_', ' ', '+', ':'];

/// Canonical form of a single token symbol.
pub fn normalize_symbol(symbol: &str, reference: &ReferenceData) -> String {
    let upper = symbol.trim().to_uppercase();
    match reference.symbol_aliases.get(&upper) {
        Some(base) => base.clone(),
        None => upper,
    }
}

/// Fee tiers ("0.05%"), bare numbers and empty fragments are not tokens.
fn is_token_fragment(fragment: &str) -> bool {
    !fragment.is_empty()
        && !fragment.contains('%')
        && !fragment.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Split a raw pool symbol into canonical assets, deduplicated in order of
/// first appearance.
pub fn extract_assets(pool_symbol: &str, reference: &ReferenceData) -> Vec<String> {
    let mut assets: Vec<String> = Vec::new();
    for fragment in pool_symbol.split(SYMBOL_SEPARATORS) {
        let fragment = fragment.trim();
        if !is_token_fragment(fragment) {
            continue;
        }
        let canonical = normalize_symbol(fragment, reference);
        if !assets.contains(&canonical) {
            assets.push(canonical);
        }
    }
    assets
}

/// First canonical asset of a pool symbol, if any.
pub fn primary_asset(pool_symbol: &str, reference: &ReferenceData) -> Option<String> {
    pool_symbol
        .split(SYMBOL_SEPARATORS)
        .map(str::trim)
        .find(|f| is_token_fragment(f))
        .map(|f| normalize_symbol(f, reference))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_assets_strips_fee_tier_and_wrappers() {
        let reference = ReferenceData::default();
        assert_eq!(extract_assets("WETH-USDC-0.05%", &reference), vec!["ETH", "USDC"]);
        assert_eq!(extract_assets("wstETH/stETH", &reference), vec!["ETH"]);
        assert_eq!(extract_assets("BONK-SOL", &reference), vec!["BONK", "SOL"]);
    }

    #[test]
    fn test_extract_assets_keeps_first_appearance_order() {
        let reference = ReferenceData::default();
        assert_eq!(
            extract_assets("USDC-WBTC-USDC.e-cbBTC", &reference),
            vec!["USDC", "BTC"]
        );
    }

    #[test]
    fn test_primary_asset() {
        let reference = ReferenceData::default();
        assert_eq!(primary_asset("jitoSOL", &reference), Some("SOL".to_string()));
        assert_eq!(primary_asset("0.3%", &reference), None);
    }

    #[test]
    fn test_synthetic_alias_table() {
        let mut reference = ReferenceData::default();
        reference.symbol_aliases.clear();
        reference.symbol_aliases.insert("XFOO".to_string(), "FOO".to_string());
        assert_eq!(extract_assets("xfoo-WETH", &reference), vec!["FOO", "WETH"]);
    }
}
