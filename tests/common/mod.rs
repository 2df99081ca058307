#![allow(dead_code)]

use chrono::NaiveDate;
use samtool::domain::error::SamToolError;
use samtool::domain::price_table::{PricePoint, PriceSeries, PriceTable};
use samtool::ports::price_port::PricePort;
use std::collections::HashMap;
use std::path::Path;

pub struct MockPricePort {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.data.insert(series.symbol.clone(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn fetch_closes(&self, symbol: &str) -> Result<PriceSeries, SamToolError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SamToolError::PriceData {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        self.data
            .get(symbol)
            .cloned()
            .ok_or_else(|| SamToolError::PriceData {
                symbol: symbol.to_string(),
                reason: "no data".to_string(),
            })
    }

    fn list_symbols(&self) -> Result<Vec<String>, SamToolError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Consecutive calendar days starting 2024-01-01.
pub fn dates(count: usize) -> Vec<NaiveDate> {
    let start = date("2024-01-01");
    (0..count)
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect()
}

pub fn make_series(symbol: &str, closes: &[f64]) -> PriceSeries {
    let points = dates(closes.len())
        .into_iter()
        .zip(closes)
        .map(|(date, &close)| PricePoint { date, close })
        .collect();
    PriceSeries::new(symbol, points)
}

pub fn make_table(columns: &[(&str, &[f64])]) -> PriceTable {
    let rows = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
    PriceTable::new(
        dates(rows),
        columns.iter().map(|(s, _)| s.to_string()).collect(),
        columns.iter().map(|(_, c)| c.to_vec()).collect(),
    )
    .unwrap()
}

/// A small three-asset universe with distinct risk levels.
pub fn three_asset_port() -> MockPricePort {
    MockPricePort::new()
        .with_series(make_series(
            "SPY",
            &[100.0, 101.0, 100.5, 102.0, 103.0, 102.5, 104.0, 105.0],
        ))
        .with_series(make_series(
            "AGG",
            &[50.0, 50.1, 50.2, 50.1, 50.3, 50.35, 50.3, 50.4],
        ))
        .with_series(make_series(
            "BTC",
            &[400.0, 420.0, 380.0, 410.0, 450.0, 430.0, 470.0, 460.0],
        ))
}

/// Write `<dir>/<symbol>.csv` in Date,Close layout.
pub fn write_price_csv(dir: &Path, symbol: &str, closes: &[f64]) {
    let mut content = String::from("Date,Open,Close\n");
    for (date, close) in dates(closes.len()).into_iter().zip(closes) {
        content.push_str(&format!("{},{},{}\n", date.format("%Y-%m-%d"), close, close));
    }
    std::fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}
