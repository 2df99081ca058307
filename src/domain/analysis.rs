//! End-to-end analysis: prices in, profile metrics and optimal samples out.

use crate::domain::error::SamToolError;
use crate::domain::portfolio_metrics::{
    MetricsConfig, PortfolioMetricRecord, compute_portfolio_metrics,
};
use crate::domain::price_table::PriceTable;
use crate::domain::returns::compute_daily_returns;
use crate::domain::sampler::sample_random_portfolios;
use crate::domain::selector::{OptimalPortfolios, select_optimal};
use crate::domain::statistics::AnnualizedStatistics;
use crate::domain::weights::{RiskProfile, RiskProfileTable};
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use rand::Rng;
use std::path::PathBuf;

pub const DEFAULT_SAMPLE_COUNT: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub symbols: Vec<String>,
    pub data_dir: PathBuf,
    pub metrics: MetricsConfig,
    pub sample_count: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub symbols: Vec<String>,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub price_rows: usize,
    pub asset_statistics: AnnualizedStatistics,
    pub profile: RiskProfile,
    pub profile_portfolio: PortfolioMetricRecord,
    pub samples: Vec<PortfolioMetricRecord>,
    pub optimal: OptimalPortfolios,
}

/// Fetch and align every configured symbol into one price table.
pub fn load_price_table(
    price_port: &dyn PricePort,
    symbols: &[String],
) -> Result<PriceTable, SamToolError> {
    let series = symbols
        .iter()
        .map(|symbol| price_port.fetch_closes(symbol))
        .collect::<Result<Vec<_>, _>>()?;

    for s in &series {
        tracing::info!(symbol = %s.symbol, rows = s.len(), "loaded prices");
    }

    let table = PriceTable::align(&series)?;
    tracing::info!(rows = table.row_count(), assets = table.asset_count(), "aligned price table");
    Ok(table)
}

pub fn run_analysis<R: Rng + ?Sized>(
    prices: &PriceTable,
    config: &AnalysisConfig,
    profile: RiskProfile,
    profiles: &RiskProfileTable,
    rng: &mut R,
) -> Result<AnalysisResult, SamToolError> {
    let returns = compute_daily_returns(prices)?;
    let asset_statistics =
        AnnualizedStatistics::compute(&returns, config.metrics.annualization_factor)?;

    let profile_portfolio =
        compute_portfolio_metrics(&returns, profiles.weights(profile), &config.metrics)?;

    tracing::info!(samples = config.sample_count, "sampling random portfolios");
    let samples = sample_random_portfolios(
        &returns,
        config.sample_count,
        returns.asset_count(),
        &config.metrics,
        rng,
    )?;
    let optimal = select_optimal(&samples)?;

    // compute_daily_returns guarantees at least two price rows
    let dates = prices.dates();
    Ok(AnalysisResult {
        symbols: prices.symbols().to_vec(),
        first_date: dates[0],
        last_date: dates[dates.len() - 1],
        price_rows: prices.row_count(),
        asset_statistics,
        profile,
        profile_portfolio,
        samples,
        optimal,
    })
}
