//! CSV export of sampled portfolios for external frontier plotting.
//!
//! Columns: `return,volatility,sharpe_ratio` followed by one weight column per
//! symbol.

use crate::domain::error::SamToolError;
use crate::domain::portfolio_metrics::PortfolioMetricRecord;
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub struct CsvFrontierReport;

fn csv_error(err: csv::Error) -> SamToolError {
    match err.into_kind() {
        csv::ErrorKind::Io(e) => SamToolError::Io(e),
        other => SamToolError::Io(std::io::Error::other(format!("{:?}", other))),
    }
}

impl ReportPort for CsvFrontierReport {
    fn write_frontier(
        &self,
        records: &[PortfolioMetricRecord],
        symbols: &[String],
        output_path: &Path,
    ) -> Result<(), SamToolError> {
        let mut writer = csv::Writer::from_path(output_path).map_err(csv_error)?;

        let mut header = vec![
            "return".to_string(),
            "volatility".to_string(),
            "sharpe_ratio".to_string(),
        ];
        header.extend(symbols.iter().cloned());
        writer.write_record(&header).map_err(csv_error)?;

        for record in records {
            let weights = record.weights().as_slice();
            if weights.len() != symbols.len() {
                return Err(SamToolError::DimensionMismatch {
                    expected: symbols.len(),
                    actual: weights.len(),
                });
            }
            let mut row = vec![
                record.annualized_return().to_string(),
                record.annualized_volatility().to_string(),
                record.sharpe_ratio().to_string(),
            ];
            row.extend(weights.iter().map(|w| w.to_string()));
            writer.write_record(&row).map_err(csv_error)?;
        }

        writer.flush()?;
        tracing::info!(
            path = %output_path.display(),
            portfolios = records.len(),
            "frontier written"
        );
        Ok(())
    }
}
