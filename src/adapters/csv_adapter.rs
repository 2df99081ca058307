//! CSV file price adapter.
//!
//! Reads `<base_path>/<SYMBOL>.csv`. The header must name a `date` column
//! (YYYY-MM-DD) and a `close` column; `adj close` is used when there is no
//! plain `close`. Header matching ignores case and surrounding whitespace.

use crate::domain::error::SamToolError;
use crate::domain::price_table::{PricePoint, PriceSeries};
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn data_error(symbol: &str, reason: impl Into<String>) -> SamToolError {
    SamToolError::PriceData {
        symbol: symbol.to_string(),
        reason: reason.into(),
    }
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    })
}

impl PricePort for CsvPriceAdapter {
    fn fetch_closes(&self, symbol: &str) -> Result<PriceSeries, SamToolError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| data_error(symbol, format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| data_error(symbol, format!("CSV header error: {}", e)))?
            .clone();
        let date_col =
            find_column(&headers, &["date"]).ok_or_else(|| data_error(symbol, "missing date column"))?;
        let close_col = find_column(&headers, &["close", "adj close"])
            .ok_or_else(|| data_error(symbol, "missing close column"))?;

        let mut points = Vec::new();
        let mut skipped = 0usize;

        for result in rdr.records() {
            let record =
                result.map_err(|e| data_error(symbol, format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(date_col)
                .ok_or_else(|| data_error(symbol, "missing date value"))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| data_error(symbol, format!("invalid date '{}': {}", date_str, e)))?;

            let close_str = record.get(close_col).unwrap_or("").trim();
            if close_str.is_empty() || close_str.eq_ignore_ascii_case("null") {
                skipped += 1;
                continue;
            }
            let close: f64 = close_str
                .parse()
                .map_err(|e| data_error(symbol, format!("invalid close value '{}': {}", close_str, e)))?;

            points.push(PricePoint { date, close });
        }

        if skipped > 0 {
            tracing::warn!(symbol, skipped, "skipped rows without a closing price");
        }

        points.sort_by_key(|p| p.date);
        let before = points.len();
        points.dedup_by_key(|p| p.date);
        let duplicates = before - points.len();
        if duplicates > 0 {
            tracing::warn!(symbol, duplicates, "dropped rows with a repeated date");
        }
        Ok(PriceSeries::new(symbol, points))
    }

    fn list_symbols(&self) -> Result<Vec<String>, SamToolError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SamToolError::PriceData {
            symbol: "*".into(),
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem() {
                    symbols.push(stem.to_string_lossy().into_owned());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
