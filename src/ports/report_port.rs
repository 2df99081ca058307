//! Frontier report port trait.

use crate::domain::error::SamToolError;
use crate::domain::portfolio_metrics::PortfolioMetricRecord;
use std::path::Path;

/// Port for exporting sampled portfolios.
pub trait ReportPort {
    fn write_frontier(
        &self,
        records: &[PortfolioMetricRecord],
        symbols: &[String],
        output_path: &Path,
    ) -> Result<(), SamToolError>;
}
