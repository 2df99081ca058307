//! Closing-price series and the aligned price table.
//!
//! A [`PriceTable`] stores one column per asset over a shared date index.
//! Per-symbol series are aligned with inner-join semantics: a date survives
//! only if every series has a price for it.

use crate::domain::error::SamToolError;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Closing prices for a single symbol, as delivered by a price port.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl PriceTable {
    /// Build a table from already-aligned columns.
    ///
    /// Every column must have one price per date, and every price must be
    /// positive and finite.
    pub fn new(
        dates: Vec<NaiveDate>,
        symbols: Vec<String>,
        columns: Vec<Vec<f64>>,
    ) -> Result<Self, SamToolError> {
        if symbols.is_empty() {
            return Err(SamToolError::NoAssets);
        }
        if symbols.len() != columns.len() {
            return Err(SamToolError::DimensionMismatch {
                expected: symbols.len(),
                actual: columns.len(),
            });
        }

        let mut seen = HashSet::new();
        for symbol in &symbols {
            if !seen.insert(symbol.as_str()) {
                return Err(SamToolError::DuplicateSymbol(symbol.clone()));
            }
        }

        for (symbol, column) in symbols.iter().zip(&columns) {
            if column.len() != dates.len() {
                return Err(SamToolError::DimensionMismatch {
                    expected: dates.len(),
                    actual: column.len(),
                });
            }
            if let Some((row, &price)) = column
                .iter()
                .enumerate()
                .find(|(_, p)| !(p.is_finite() && **p > 0.0))
            {
                return Err(SamToolError::NonPositivePrice {
                    symbol: symbol.clone(),
                    row,
                    price,
                });
            }
        }

        Ok(Self {
            dates,
            symbols,
            columns,
        })
    }

    /// Inner-join per-symbol series on date. Column order follows `series`.
    pub fn align(series: &[PriceSeries]) -> Result<Self, SamToolError> {
        let lookups: Vec<HashMap<NaiveDate, f64>> = series
            .iter()
            .map(|s| s.points.iter().map(|p| (p.date, p.close)).collect())
            .collect();

        let shared: BTreeSet<NaiveDate> = match lookups.split_first() {
            Some((first, rest)) => first
                .keys()
                .copied()
                .filter(|date| rest.iter().all(|l| l.contains_key(date)))
                .collect(),
            None => BTreeSet::new(),
        };
        let dates: Vec<NaiveDate> = shared.into_iter().collect();

        for s in series {
            let dropped = s.len().saturating_sub(dates.len());
            if dropped > 0 {
                tracing::debug!(symbol = %s.symbol, dropped, "dates dropped by alignment");
            }
        }

        let columns = lookups
            .iter()
            .map(|lookup| dates.iter().map(|d| lookup[d]).collect())
            .collect();
        let symbols = series.iter().map(|s| s.symbol.clone()).collect();

        Self::new(dates, symbols, columns)
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

    pub fn column_by_symbol(&self, symbol: &str) -> Option<&[f64]> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|i| self.columns[i].as_slice())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.symbols
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }
}
