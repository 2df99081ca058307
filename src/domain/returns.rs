//! Daily return matrix.
//!
//! return[i] = price[i] / price[i-1] - 1 for every row after the first.
//! The first price row has no predecessor and produces no return row.

use crate::domain::error::SamToolError;
use crate::domain::price_table::PriceTable;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnMatrix {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl ReturnMatrix {
    /// Build a matrix from precomputed return columns.
    pub fn new(
        dates: Vec<NaiveDate>,
        symbols: Vec<String>,
        columns: Vec<Vec<f64>>,
    ) -> Result<Self, SamToolError> {
        if symbols.len() != columns.len() {
            return Err(SamToolError::DimensionMismatch {
                expected: symbols.len(),
                actual: columns.len(),
            });
        }
        if let Some(column) = columns.iter().find(|c| c.len() != dates.len()) {
            return Err(SamToolError::DimensionMismatch {
                expected: dates.len(),
                actual: column.len(),
            });
        }
        Ok(Self {
            dates,
            symbols,
            columns,
        })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn asset_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn column(&self, index: usize) -> &[f64] {
        &self.columns[index]
    }

    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }
}

pub fn compute_daily_returns(prices: &PriceTable) -> Result<ReturnMatrix, SamToolError> {
    if prices.row_count() < 2 {
        return Err(SamToolError::InsufficientData {
            rows: prices.row_count(),
            minimum: 2,
        });
    }

    let columns: Vec<Vec<f64>> = prices
        .columns()
        .map(|(_, column)| column.windows(2).map(|w| w[1] / w[0] - 1.0).collect())
        .collect();

    tracing::debug!(
        rows = prices.row_count() - 1,
        assets = prices.asset_count(),
        "computed daily returns"
    );

    Ok(ReturnMatrix {
        dates: prices.dates()[1..].to_vec(),
        symbols: prices.symbols().to_vec(),
        columns,
    })
}
