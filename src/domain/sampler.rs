//! Random portfolio sampling for an empirical efficient frontier.
//!
//! Each sample draws one uniform value in [0, 1) per asset from the injected
//! generator, normalizes the draws into a [`WeightVector`], and evaluates it.

use crate::domain::error::SamToolError;
use crate::domain::portfolio_metrics::{MetricsConfig, PortfolioMetricRecord, ReturnMoments};
use crate::domain::returns::ReturnMatrix;
use crate::domain::weights::WeightVector;
use rand::Rng;
use rand::distributions::Standard;

/// Draw `asset_count` uniforms and normalize them into weights.
pub fn random_weights<R: Rng + ?Sized>(
    asset_count: usize,
    rng: &mut R,
) -> Result<WeightVector, SamToolError> {
    let draws: Vec<f64> = (0..asset_count)
        .map(|_| rng.sample::<f64, _>(Standard))
        .collect();
    WeightVector::normalize(draws)
}

/// Evaluate `sample_count` random weightings, in generation order.
pub fn sample_random_portfolios<R: Rng + ?Sized>(
    returns: &ReturnMatrix,
    sample_count: usize,
    asset_count: usize,
    config: &MetricsConfig,
    rng: &mut R,
) -> Result<Vec<PortfolioMetricRecord>, SamToolError> {
    if sample_count == 0 {
        return Err(SamToolError::InvalidSampleCount);
    }
    if asset_count != returns.asset_count() {
        return Err(SamToolError::DimensionMismatch {
            expected: returns.asset_count(),
            actual: asset_count,
        });
    }

    let moments = ReturnMoments::new(returns, config)?;
    let records = (0..sample_count)
        .map(|_| moments.evaluate(random_weights(asset_count, &mut *rng)?))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(samples = records.len(), assets = asset_count, "sampled portfolios");
    Ok(records)
}
