//! Plain-text summaries printed at the end of an analysis.

use crate::domain::portfolio_metrics::PortfolioMetricRecord;
use crate::domain::selector::OptimalPortfolios;
use crate::domain::statistics::AnnualizedStatistics;

const HEAVY_RULE: &str = "=====================================================";
const LIGHT_RULE: &str = "-----------------------------------------------------";

fn weighting(record: &PortfolioMetricRecord, symbols: &[String]) -> String {
    let parts: Vec<String> = record
        .weights()
        .as_slice()
        .iter()
        .zip(symbols)
        .map(|(w, s)| format!("{w:.2} ({s})"))
        .collect();
    format!("[{}]", parts.join(", "))
}

/// One titled block: return, volatility, Sharpe ratio, and weighting.
pub fn portfolio_block(title: &str, record: &PortfolioMetricRecord, symbols: &[String]) -> String {
    let mut out = format!("{title}\n{HEAVY_RULE}\n");
    out.push_str(&format!("Return = {:.2}%\n", record.annualized_return() * 100.0));
    out.push_str(&format!(
        "Volatility = {:.2}%\n",
        record.annualized_volatility() * 100.0
    ));
    out.push_str(&format!("Sharpe Ratio = {:.2}\n", record.sharpe_ratio()));
    out.push_str(&format!("Weighting = {}\n", weighting(record, symbols)));
    out.push_str(LIGHT_RULE);
    out.push('\n');
    out
}

pub fn optimal_blocks(optimal: &OptimalPortfolios, symbols: &[String]) -> String {
    let mut out = portfolio_block(
        "Portfolio with Greatest Sharpe Ratio",
        &optimal.best_sharpe,
        symbols,
    );
    out.push('\n');
    out.push_str(&portfolio_block(
        "Portfolio with Least Risk",
        &optimal.least_risk,
        symbols,
    ));
    out
}

pub fn asset_table(stats: &AnnualizedStatistics) -> String {
    let mut out = format!("Asset Statistics (annualized)\n{HEAVY_RULE}\n");
    out.push_str(&format!(
        "{:<8} {:>10} {:>12} {:>8}\n",
        "Symbol", "Return", "Volatility", "Sharpe"
    ));
    for ((symbol, ret), (_, sharpe)) in stats.returns.iter().zip(stats.sharpe_ratios()) {
        let vol = stats.annual_volatility(symbol).unwrap_or(f64::NAN);
        out.push_str(&format!(
            "{:<8} {:>9.2}% {:>11.2}% {:>8.2}\n",
            symbol,
            ret * 100.0,
            vol * 100.0,
            sharpe
        ));
    }
    out.push_str(LIGHT_RULE);
    out.push('\n');
    out
}
