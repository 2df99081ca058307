//! Per-asset annualized statistics and the sample covariance matrix.
//!
//! All dispersion measures use the sample (N-1) denominator, so at least two
//! return observations are required.

use crate::domain::error::SamToolError;
use crate::domain::returns::ReturnMatrix;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Minimum number of return rows for a sample variance.
pub const MIN_RETURN_ROWS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct AnnualizedStatistics {
    /// (symbol, mean daily return x factor), in price-table column order.
    pub returns: Vec<(String, f64)>,
    /// (symbol, sample stdev x sqrt(factor)), in price-table column order.
    pub volatility: Vec<(String, f64)>,
}

impl AnnualizedStatistics {
    pub fn compute(
        returns: &ReturnMatrix,
        annualization_factor: f64,
    ) -> Result<Self, SamToolError> {
        require_rows(returns)?;

        let mut annual_returns = Vec::with_capacity(returns.asset_count());
        let mut annual_volatility = Vec::with_capacity(returns.asset_count());

        for (symbol, column) in returns.symbols().iter().zip(returns.columns()) {
            annual_returns.push((symbol.clone(), mean(column) * annualization_factor));
            annual_volatility.push((
                symbol.clone(),
                sample_stddev(column) * annualization_factor.sqrt(),
            ));
        }

        Ok(Self {
            returns: annual_returns,
            volatility: annual_volatility,
        })
    }

    pub fn annual_return(&self, symbol: &str) -> Option<f64> {
        lookup(&self.returns, symbol)
    }

    pub fn annual_volatility(&self, symbol: &str) -> Option<f64> {
        lookup(&self.volatility, symbol)
    }

    /// Return over volatility per asset, with no risk-free adjustment.
    pub fn sharpe_ratios(&self) -> Vec<(String, f64)> {
        self.returns
            .iter()
            .zip(&self.volatility)
            .map(|((symbol, r), (_, v))| (symbol.clone(), r / v))
            .collect()
    }
}

fn lookup(values: &[(String, f64)], symbol: &str) -> Option<f64> {
    values.iter().find(|(s, _)| s == symbol).map(|(_, v)| *v)
}

pub(crate) fn require_rows(returns: &ReturnMatrix) -> Result<(), SamToolError> {
    if returns.row_count() < MIN_RETURN_ROWS {
        return Err(SamToolError::InsufficientData {
            rows: returns.row_count(),
            minimum: MIN_RETURN_ROWS,
        });
    }
    Ok(())
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn sample_covariance(a: &[f64], b: &[f64]) -> f64 {
    let mean_a = mean(a);
    let mean_b = mean(b);
    let sum: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum();
    sum / (a.len() as f64 - 1.0)
}

pub fn sample_stddev(values: &[f64]) -> f64 {
    sample_covariance(values, values).sqrt()
}

/// Sample covariance matrix of the return columns, scaled by `factor`.
pub fn covariance_matrix(
    returns: &ReturnMatrix,
    factor: f64,
) -> Result<Vec<Vec<f64>>, SamToolError> {
    require_rows(returns)?;

    let columns = returns.columns();
    let n = columns.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in i..n {
            let cov = sample_covariance(&columns[i], &columns[j]) * factor;
            matrix[i][j] = cov;
            matrix[j][i] = cov;
        }
    }
    Ok(matrix)
}
