//! Configuration validation.
//!
//! Checks the `[analysis]` and `[profiles]` sections before any prices are
//! loaded.

use crate::domain::error::SamToolError;
use crate::domain::weights::{RiskProfile, RiskProfileTable, STANDARD_SYMBOLS};
use crate::ports::config_port::ConfigPort;
use std::collections::HashSet;
use std::str::FromStr;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), SamToolError> {
    let symbols = validate_symbols(config)?;
    validate_data_dir(config)?;
    validate_annualization_factor(config)?;
    validate_risk_free_rate(config)?;
    validate_sample_count(config)?;
    validate_seed(config)?;
    validate_default_profile(config)?;
    validate_profiles(config, &symbols)?;
    Ok(())
}

fn validate_default_profile(config: &dyn ConfigPort) -> Result<(), SamToolError> {
    match config.get_string("analysis", "profile") {
        Some(name) if name.parse::<RiskProfile>().is_err() => Err(invalid(
            "analysis",
            "profile",
            format!("unknown risk profile '{}'", name.trim()),
        )),
        _ => Ok(()),
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SamToolError {
    SamToolError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<Vec<String>, SamToolError> {
    let symbols = config
        .get_list("analysis", "symbols")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SamToolError::ConfigMissing {
            section: "analysis".to_string(),
            key: "symbols".to_string(),
        })?;

    let mut seen = HashSet::new();
    for symbol in &symbols {
        if !seen.insert(symbol.to_uppercase()) {
            return Err(invalid(
                "analysis",
                "symbols",
                format!("duplicate symbol {}", symbol),
            ));
        }
    }
    Ok(symbols)
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), SamToolError> {
    match config.get_string("analysis", "data_dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(SamToolError::ConfigMissing {
            section: "analysis".to_string(),
            key: "data_dir".to_string(),
        }),
    }
}

/// Parse `key` if present; a value that does not parse is an error rather
/// than a silent fallback to the default.
fn parse_optional<T: FromStr>(
    config: &dyn ConfigPort,
    key: &str,
    expected: &str,
) -> Result<Option<T>, SamToolError> {
    match config.get_string("analysis", key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            invalid(
                "analysis",
                key,
                format!("'{}' is not {}", raw.trim(), expected),
            )
        }),
    }
}

fn validate_annualization_factor(config: &dyn ConfigPort) -> Result<(), SamToolError> {
    let value = parse_optional::<f64>(config, "annualization_factor", "a number")?.unwrap_or(252.0);
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(
            "analysis",
            "annualization_factor",
            "annualization_factor must be positive",
        ));
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), SamToolError> {
    let value = parse_optional::<f64>(config, "risk_free_rate", "a number")?.unwrap_or(0.0);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "analysis",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_sample_count(config: &dyn ConfigPort) -> Result<(), SamToolError> {
    let value = parse_optional::<i64>(config, "sample_count", "an integer")?.unwrap_or(100);
    if value < 1 {
        return Err(invalid(
            "analysis",
            "sample_count",
            "sample_count must be at least 1",
        ));
    }
    Ok(())
}

fn validate_seed(config: &dyn ConfigPort) -> Result<(), SamToolError> {
    match config.get_string("analysis", "seed") {
        Some(s) if s.trim().parse::<u64>().is_err() => Err(invalid(
            "analysis",
            "seed",
            "seed must be a non-negative integer",
        )),
        _ => Ok(()),
    }
}

/// Without a `[profiles]` section the built-in allocation is used, which
/// only covers SPY, AGG and BTC.
pub fn default_profile_table(symbols: &[String]) -> Result<RiskProfileTable, SamToolError> {
    RiskProfileTable::standard_for(symbols).ok_or_else(|| {
        invalid(
            "analysis",
            "symbols",
            format!(
                "without a [profiles] section symbols must be {}",
                STANDARD_SYMBOLS.join(", ")
            ),
        )
    })
}

/// Each `[profiles]` entry must name a known profile and list one
/// non-negative weight per symbol.
pub fn validate_profiles(config: &dyn ConfigPort, symbols: &[String]) -> Result<(), SamToolError> {
    let keys = config.keys("profiles");
    if keys.is_empty() {
        return default_profile_table(symbols).map(|_| ());
    }

    for key in &keys {
        key.parse::<RiskProfile>()
            .map_err(|_| invalid("profiles", key, "unknown risk profile"))?;
        parse_weights(config, key, symbols.len())?;
    }

    for profile in RiskProfile::ALL {
        if !keys.iter().any(|k| k.parse::<RiskProfile>().ok() == Some(profile)) {
            return Err(SamToolError::ConfigMissing {
                section: "profiles".to_string(),
                key: profile.key().to_string(),
            });
        }
    }
    Ok(())
}

/// Parse one `[profiles]` entry into raw weights.
pub fn parse_weights(
    config: &dyn ConfigPort,
    key: &str,
    asset_count: usize,
) -> Result<Vec<f64>, SamToolError> {
    let items = config.get_list("profiles", key).unwrap_or_default();
    let weights = items
        .iter()
        .map(|item| {
            item.parse::<f64>()
                .ok()
                .filter(|w| w.is_finite() && *w >= 0.0)
                .ok_or_else(|| invalid("profiles", key, format!("invalid weight '{}'", item)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if weights.len() != asset_count {
        return Err(invalid(
            "profiles",
            key,
            format!("expected {} weights, found {}", asset_count, weights.len()),
        ));
    }
    if weights.iter().sum::<f64>() <= 0.0 {
        return Err(invalid("profiles", key, "weights sum to zero"));
    }
    Ok(weights)
}
