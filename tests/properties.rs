use proptest::prelude::*;
use yield_risk_engine::history::HistoryFetchReport;
use yield_risk_engine::pools::{
    assess_liquidity_risk, estimate_slippage, process_pool, slippage_factor, DEFAULT_SLIPPAGE_FACTOR,
};
use yield_risk_engine::risk::{risk_level, score_pool, RiskInput};
use yield_risk_engine::spreads::{detect_spreads, SpreadFilters, MIN_NET_SPREAD};
use yield_risk_engine::volatility::StabilityAnalyzer;
use yield_risk_engine::{HistoryPoint, ProtocolArchetype, RawPool, ReferenceData};

const PROJECTS: &[&str] = &["aave-v3", "compound-v3", "morpho-blue", "spark", "tiny-lend", "fluid"];
const SYMBOLS: &[&str] = &["USDC", "USDT", "WETH", "DAI", "WSTETH"];

fn archetype() -> impl Strategy<Value = ProtocolArchetype> {
    prop_oneof![
        Just(ProtocolArchetype::Lending),
        Just(ProtocolArchetype::LiquidStaking),
        Just(ProtocolArchetype::Other),
    ]
}

fn raw_pool() -> impl Strategy<Value = RawPool> {
    (
        0..PROJECTS.len(),
        0..SYMBOLS.len(),
        1.0e6..5.0e9f64,
        0.01..60.0f64,
        0.0..1.0f64,
        any::<u32>(),
    )
        .prop_map(|(project, symbol, tvl, apy, reward_share, id)| RawPool {
            id: format!("pool-{}", id),
            chain: "Ethereum".into(),
            project: PROJECTS[project].into(),
            symbol: SYMBOLS[symbol].into(),
            tvl_usd: Some(tvl),
            apy: Some(apy),
            apy_base: Some(apy * (1.0 - reward_share)),
            apy_reward: Some(apy * reward_share),
            il_risk: Some("no".into()),
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn risk_breakdown_respects_caps(
        tvl in prop::option::of(-1.0e6..1.0e11f64),
        apy in prop::option::of(0.0..10_000.0f64),
        reward in prop::option::of(0.0..10_000.0f64),
        stable in prop::option::of(any::<bool>()),
        symbol in 0..SYMBOLS.len(),
    ) {
        let reference = ReferenceData::default();
        let assets = vec![SYMBOLS[symbol].to_string()];
        let input = RiskInput {
            tvl_usd: tvl,
            apy,
            apy_reward: reward,
            stablecoin: stable,
            underlying_assets: &assets,
            project_slug: "unknown-farm",
            ..Default::default()
        };
        let assessment = score_pool(&input, &reference);
        let b = assessment.breakdown;

        prop_assert!(b.tvl <= 30);
        prop_assert!(b.apy <= 30);
        prop_assert!(b.stablecoin <= 20);
        prop_assert!(b.il <= 15);
        prop_assert!(b.protocol <= 10);
        prop_assert_eq!(assessment.score, b.total());
        prop_assert!(assessment.score <= 105);
        prop_assert_eq!(assessment.level, risk_level(assessment.score));
    }

    #[test]
    fn slippage_grows_with_position(
        tvl in 1.0e3..1.0e10f64,
        small in 1.0..1.0e6f64,
        extra in 0.0..1.0e7f64,
    ) {
        let low = estimate_slippage(small, tvl, DEFAULT_SLIPPAGE_FACTOR);
        let high = estimate_slippage(small + extra, tvl, DEFAULT_SLIPPAGE_FACTOR);
        prop_assert!(low <= high);
        prop_assert!((0.0..=100.0).contains(&high));
    }

    #[test]
    fn liquidity_risk_is_bounded(tvl in -1.0e6..1.0e11f64, archetype in archetype()) {
        let risk = assess_liquidity_risk(tvl, archetype);
        prop_assert!(risk.score <= 100);
        prop_assert!(risk.max_safe_allocation >= 0.0);
        prop_assert!(risk
            .slippage_estimates
            .windows(2)
            .all(|w| w[0].slippage_pct <= w[1].slippage_pct));
    }

    #[test]
    fn deeper_pools_allow_more_and_slip_less(
        smaller in 0.0..1.0e11f64,
        gap in 0.0..1.0e11f64,
        position in 1.0..1.0e8f64,
        archetype in archetype(),
    ) {
        let larger = smaller + gap;
        let shallow = assess_liquidity_risk(smaller, archetype);
        let deep = assess_liquidity_risk(larger, archetype);
        prop_assert!(shallow.max_safe_allocation <= deep.max_safe_allocation);

        let factor = slippage_factor(archetype);
        prop_assert!(
            estimate_slippage(position, smaller, factor) >= estimate_slippage(position, larger, factor)
        );
    }

    #[test]
    fn stability_is_bounded_and_skips_nulls(
        series in prop::collection::vec(prop::option::of(0.0..200.0f64), 0..60),
    ) {
        let history: Vec<HistoryPoint> = series
            .iter()
            .map(|apy| HistoryPoint { apy: *apy, ..Default::default() })
            .collect();
        let valid = series.iter().rev().take(30).filter(|v| v.is_some()).count();

        match StabilityAnalyzer::default().analyze(&history) {
            Some(stability) => {
                prop_assert!(stability.score <= 100);
                prop_assert!(stability.min_apy <= stability.avg_apy);
                prop_assert!(stability.avg_apy <= stability.max_apy);
                prop_assert!(stability.volatility >= 0.0);
                prop_assert_eq!(stability.data_points, valid);
                prop_assert!(stability.data_points >= 7);
            }
            None => prop_assert!(valid < 7 || history.len() < 7),
        }
    }

    #[test]
    fn detected_spreads_pass_filters(
        raw in prop::collection::vec(raw_pool(), 0..24),
        min_spread in 0.0..5.0f64,
    ) {
        let reference = ReferenceData::default();
        let pools: Vec<_> = raw.iter().map(|p| process_pool(p, &reference)).collect();
        let filters = SpreadFilters { min_spread, ..Default::default() };

        let report = detect_spreads(&pools, &filters, &reference);
        for spread in &report.spreads {
            prop_assert!(spread.high_pool.protocol != spread.low_pool.protocol);
            prop_assert!(spread.apy_spread >= min_spread);
            prop_assert!(spread.net_spread >= MIN_NET_SPREAD);
            prop_assert!(spread.high_pool.apy >= spread.low_pool.apy);
        }
        prop_assert!(report.top.len() <= filters.top_n);

        let again = detect_spreads(&pools, &filters, &reference);
        let ids = |r: &yield_risk_engine::SpreadReport| -> Vec<(String, String)> {
            r.spreads
                .iter()
                .map(|s| (s.high_pool.pool_id.clone(), s.low_pool.pool_id.clone()))
                .collect()
        };
        prop_assert_eq!(ids(&report), ids(&again));
    }
}

#[test]
fn empty_history_report_is_zeroed() {
    let report = HistoryFetchReport::default();
    assert_eq!(report.attempted, 0);
    assert!(report.stabilities.is_empty());
}
