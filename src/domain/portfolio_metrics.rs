//! Return, volatility, and Sharpe ratio of a weighted portfolio.
//!
//! return   = sum(mean_i * w_i) * factor
//! variance = w' (cov * factor) w
//! sharpe   = (return - risk_free_rate) / sqrt(variance)
//!
//! A zero-volatility portfolio gets an IEEE sentinel Sharpe ratio instead of
//! an error: +inf for positive excess return, -inf for negative, NaN for zero.

use crate::domain::error::SamToolError;
use crate::domain::returns::ReturnMatrix;
use crate::domain::statistics::{self, TRADING_DAYS_PER_YEAR};
use crate::domain::weights::WeightVector;

/// Negative variances no larger than this are rounding noise and clamp to 0.
pub const VARIANCE_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsConfig {
    pub annualization_factor: f64,
    pub risk_free_rate: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            annualization_factor: TRADING_DAYS_PER_YEAR,
            risk_free_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioMetricRecord {
    annualized_return: f64,
    annualized_volatility: f64,
    sharpe_ratio: f64,
    weights: WeightVector,
}

impl PortfolioMetricRecord {
    pub fn new(
        annualized_return: f64,
        annualized_volatility: f64,
        sharpe_ratio: f64,
        weights: WeightVector,
    ) -> Self {
        Self {
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            weights,
        }
    }

    pub fn annualized_return(&self) -> f64 {
        self.annualized_return
    }

    pub fn annualized_volatility(&self) -> f64 {
        self.annualized_volatility
    }

    pub fn sharpe_ratio(&self) -> f64 {
        self.sharpe_ratio
    }

    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }
}

/// Daily means and annualized covariance, computed once and reused across
/// many weightings of the same return matrix.
#[derive(Debug, Clone)]
pub(crate) struct ReturnMoments {
    means: Vec<f64>,
    covariance: Vec<Vec<f64>>,
    config: MetricsConfig,
}

impl ReturnMoments {
    pub(crate) fn new(returns: &ReturnMatrix, config: &MetricsConfig) -> Result<Self, SamToolError> {
        let covariance = statistics::covariance_matrix(returns, config.annualization_factor)?;
        let means = returns.columns().iter().map(|c| statistics::mean(c)).collect();
        Ok(Self {
            means,
            covariance,
            config: *config,
        })
    }

    pub(crate) fn asset_count(&self) -> usize {
        self.means.len()
    }

    pub(crate) fn evaluate(
        &self,
        weights: WeightVector,
    ) -> Result<PortfolioMetricRecord, SamToolError> {
        if weights.len() != self.asset_count() {
            return Err(SamToolError::DimensionMismatch {
                expected: self.asset_count(),
                actual: weights.len(),
            });
        }
        let w = weights.as_slice();

        let annualized_return = self
            .means
            .iter()
            .zip(w)
            .map(|(m, w)| m * w)
            .sum::<f64>()
            * self.config.annualization_factor;

        let variance: f64 = self
            .covariance
            .iter()
            .zip(w)
            .map(|(row, wi)| wi * row.iter().zip(w).map(|(c, wj)| c * wj).sum::<f64>())
            .sum();

        let variance = if variance < 0.0 {
            if variance < -VARIANCE_TOLERANCE {
                return Err(SamToolError::NegativeVariance { variance });
            }
            0.0
        } else {
            variance
        };
        let annualized_volatility = variance.sqrt();

        let sharpe_ratio =
            (annualized_return - self.config.risk_free_rate) / annualized_volatility;

        Ok(PortfolioMetricRecord {
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            weights,
        })
    }
}

pub fn compute_portfolio_metrics(
    returns: &ReturnMatrix,
    weights: &WeightVector,
    config: &MetricsConfig,
) -> Result<PortfolioMetricRecord, SamToolError> {
    if weights.len() != returns.asset_count() {
        return Err(SamToolError::DimensionMismatch {
            expected: returns.asset_count(),
            actual: weights.len(),
        });
    }
    let record = ReturnMoments::new(returns, config)?.evaluate(weights.clone())?;
    tracing::debug!(
        annualized_return = record.annualized_return,
        annualized_volatility = record.annualized_volatility,
        sharpe_ratio = record.sharpe_ratio,
        "computed portfolio metrics"
    );
    Ok(record)
}
