//! Integration tests for the analysis pipeline.
//!
//! Tests cover:
//! - Prices through returns, statistics, and portfolio metrics
//! - Random sampling driven by a scripted generator
//! - Optimal selection over sampled portfolios
//! - The full pipeline with a mock price port

mod common;

use approx::assert_relative_eq;
use common::*;
use rand::{RngCore, SeedableRng};
use rand::rngs::StdRng;
use samtool::domain::analysis::{AnalysisConfig, load_price_table, run_analysis};
use samtool::domain::error::SamToolError;
use samtool::domain::portfolio_metrics::{MetricsConfig, compute_portfolio_metrics};
use samtool::domain::returns::compute_daily_returns;
use samtool::domain::sampler::sample_random_portfolios;
use samtool::domain::selector::select_optimal;
use samtool::domain::statistics::AnnualizedStatistics;
use samtool::domain::weights::{RiskProfile, RiskProfileTable, WeightVector};
use std::path::PathBuf;

/// Replays a fixed list of `f64` draws through the `Standard` distribution.
struct ScriptedRng {
    words: Vec<u64>,
    next: usize,
}

impl ScriptedRng {
    fn new(draws: &[f64]) -> Self {
        // Standard maps a u64 to (u >> 11) * 2^-53
        let words = draws
            .iter()
            .map(|d| ((d * (1u64 << 53) as f64) as u64) << 11)
            .collect();
        Self { words, next: 0 }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        let word = self.words[self.next % self.words.len()];
        self.next += 1;
        word
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

mod prices_to_metrics {
    use super::*;

    #[test]
    fn two_asset_scenario() {
        let table = make_table(&[("A", &[100.0, 101.0, 102.0]), ("B", &[50.0, 49.0, 49.5])]);
        let returns = compute_daily_returns(&table).unwrap();

        assert_eq!(returns.row_count(), 2);
        assert_relative_eq!(returns.column(0)[0], 0.01, epsilon = 1e-12);
        assert_relative_eq!(returns.column(0)[1], 102.0 / 101.0 - 1.0, epsilon = 1e-12);
        assert_relative_eq!(returns.column(1)[0], -0.02, epsilon = 1e-12);
        assert_relative_eq!(returns.column(1)[1], 49.5 / 49.0 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn single_asset_weighting_matches_asset_statistics() {
        let table = make_table(&[
            ("A", &[100.0, 101.0, 102.0, 101.5]),
            ("B", &[50.0, 49.0, 49.5, 50.5]),
        ]);
        let returns = compute_daily_returns(&table).unwrap();
        let stats = AnnualizedStatistics::compute(&returns, 252.0).unwrap();
        let weights = WeightVector::normalize(vec![1.0, 0.0]).unwrap();

        let record =
            compute_portfolio_metrics(&returns, &weights, &MetricsConfig::default()).unwrap();

        assert_eq!(record.annualized_return(), stats.annual_return("A").unwrap());
        assert_relative_eq!(
            record.annualized_volatility(),
            stats.annual_volatility("A").unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn too_few_prices_is_insufficient_data() {
        let table = make_table(&[("A", &[100.0, 101.0])]);
        let returns = compute_daily_returns(&table).unwrap();
        let weights = WeightVector::normalize(vec![1.0]).unwrap();

        let result = compute_portfolio_metrics(&returns, &weights, &MetricsConfig::default());
        assert!(matches!(result, Err(SamToolError::InsufficientData { .. })));
    }
}

mod sampling {
    use super::*;

    fn returns() -> samtool::domain::returns::ReturnMatrix {
        let port = three_asset_port();
        let symbols: Vec<String> = vec!["SPY".into(), "AGG".into(), "BTC".into()];
        let table = load_price_table(&port, &symbols).unwrap();
        compute_daily_returns(&table).unwrap()
    }

    #[test]
    fn scripted_draws_give_known_weights() {
        let mut rng = ScriptedRng::new(&[0.5, 0.25, 0.25, 0.75, 0.0, 0.25]);
        let records =
            sample_random_portfolios(&returns(), 2, 3, &MetricsConfig::default(), &mut rng)
                .unwrap();

        assert_eq!(records[0].weights().as_slice(), &[0.5, 0.25, 0.25]);
        assert_eq!(records[1].weights().as_slice(), &[0.75, 0.0, 0.25]);
    }

    #[test]
    fn same_script_same_output() {
        let draws = [0.125, 0.5, 0.375, 0.625, 0.875, 0.25];
        let config = MetricsConfig::default();
        let first =
            sample_random_portfolios(&returns(), 6, 3, &config, &mut ScriptedRng::new(&draws))
                .unwrap();
        let second =
            sample_random_portfolios(&returns(), 6, 3, &config, &mut ScriptedRng::new(&draws))
                .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn zero_samples_is_an_error() {
        let result = sample_random_portfolios(
            &returns(),
            0,
            3,
            &MetricsConfig::default(),
            &mut StdRng::seed_from_u64(1),
        );
        assert!(matches!(result, Err(SamToolError::InvalidSampleCount)));
    }

    #[test]
    fn selection_over_samples() {
        let records = sample_random_portfolios(
            &returns(),
            200,
            3,
            &MetricsConfig::default(),
            &mut StdRng::seed_from_u64(42),
        )
        .unwrap();
        let optimal = select_optimal(&records).unwrap();

        let max_sharpe = records
            .iter()
            .map(|r| r.sharpe_ratio())
            .fold(f64::NEG_INFINITY, f64::max);
        let min_vol = records
            .iter()
            .map(|r| r.annualized_volatility())
            .fold(f64::INFINITY, f64::min);
        assert_eq!(optimal.best_sharpe.sharpe_ratio(), max_sharpe);
        assert_eq!(optimal.least_risk.annualized_volatility(), min_vol);
    }

    #[test]
    fn selecting_from_nothing_fails() {
        assert!(matches!(select_optimal(&[]), Err(SamToolError::EmptyInput)));
    }
}

mod full_pipeline {
    use super::*;

    fn config(seed: u64) -> AnalysisConfig {
        AnalysisConfig {
            symbols: vec!["SPY".into(), "AGG".into(), "BTC".into()],
            data_dir: PathBuf::from("."),
            metrics: MetricsConfig {
                annualization_factor: 252.0,
                risk_free_rate: 0.01,
            },
            sample_count: 50,
            seed: Some(seed),
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let port = three_asset_port();
        let cfg = config(9);
        let table = load_price_table(&port, &cfg.symbols).unwrap();
        let profiles = RiskProfileTable::standard();

        let a = run_analysis(
            &table,
            &cfg,
            RiskProfile::Moderate,
            &profiles,
            &mut StdRng::seed_from_u64(9),
        )
        .unwrap();
        let b = run_analysis(
            &table,
            &cfg,
            RiskProfile::Moderate,
            &profiles,
            &mut StdRng::seed_from_u64(9),
        )
        .unwrap();

        assert_eq!(a.samples, b.samples);
        assert_eq!(a.optimal.best_sharpe, b.optimal.best_sharpe);
        assert_eq!(a.profile_portfolio, b.profile_portfolio);
    }

    #[test]
    fn each_profile_uses_its_weighting() {
        let port = three_asset_port();
        let cfg = config(1);
        let table = load_price_table(&port, &cfg.symbols).unwrap();
        let profiles = RiskProfileTable::standard();

        for profile in RiskProfile::ALL {
            let result = run_analysis(
                &table,
                &cfg,
                profile,
                &profiles,
                &mut StdRng::seed_from_u64(1),
            )
            .unwrap();
            assert_eq!(result.profile, profile);
            assert_eq!(result.profile_portfolio.weights(), profiles.weights(profile));
        }
    }

    #[test]
    fn misaligned_dates_are_dropped() {
        let port = three_asset_port().with_series(make_series("ETH", &[10.0, 11.0, 12.0]));
        let symbols: Vec<String> = vec!["SPY".into(), "ETH".into()];
        let table = load_price_table(&port, &symbols).unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_by_symbol("SPY").unwrap(), &[100.0, 101.0, 100.5]);
    }

    #[test]
    fn failing_symbol_stops_the_load() {
        let port = three_asset_port().with_error("AGG", "disk on fire");
        let result = load_price_table(&port, &["SPY".to_string(), "AGG".to_string()]);
        match result {
            Err(SamToolError::PriceData { symbol, reason }) => {
                assert_eq!(symbol, "AGG");
                assert_eq!(reason, "disk on fire");
            }
            other => panic!("expected PriceData, got {other:?}"),
        }
    }
}
