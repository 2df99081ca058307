//! Optimal portfolio selection over sampled records.
//!
//! Two independent scans: greatest Sharpe ratio and least volatility. Ties go
//! to the earliest record. A NaN Sharpe ratio ranks below every number.

use crate::domain::error::SamToolError;
use crate::domain::portfolio_metrics::PortfolioMetricRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct OptimalPortfolios {
    pub best_sharpe: PortfolioMetricRecord,
    pub least_risk: PortfolioMetricRecord,
}

pub fn select_optimal(
    records: &[PortfolioMetricRecord],
) -> Result<OptimalPortfolios, SamToolError> {
    let first = records.first().ok_or(SamToolError::EmptyInput)?;

    let mut best_sharpe = first;
    let mut least_risk = first;
    for record in &records[1..] {
        if ranks_higher(record.sharpe_ratio(), best_sharpe.sharpe_ratio()) {
            best_sharpe = record;
        }
        if ranks_higher(
            -record.annualized_volatility(),
            -least_risk.annualized_volatility(),
        ) {
            least_risk = record;
        }
    }

    Ok(OptimalPortfolios {
        best_sharpe: best_sharpe.clone(),
        least_risk: least_risk.clone(),
    })
}

fn ranks_higher(candidate: f64, incumbent: f64) -> bool {
    !candidate.is_nan() && (incumbent.is_nan() || candidate > incumbent)
}
