//! Historical price access port trait.

use crate::domain::error::SamToolError;
use crate::domain::price_table::PriceSeries;

pub trait PricePort {
    /// Closing prices for `symbol`, sorted by ascending date.
    fn fetch_closes(&self, symbol: &str) -> Result<PriceSeries, SamToolError>;

    fn list_symbols(&self) -> Result<Vec<String>, SamToolError>;
}
