//! Portfolio weights, investor risk profiles, and the profile lookup table.

use crate::domain::error::SamToolError;
use std::fmt;
use std::str::FromStr;

/// Non-negative asset weights summing to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    /// Scale `raw` so its entries sum to 1.
    ///
    /// Fails on empty input, negative or non-finite entries, or a zero sum.
    pub fn normalize(raw: Vec<f64>) -> Result<Self, SamToolError> {
        if raw.is_empty() {
            return Err(SamToolError::InvalidWeights {
                reason: "no weights given".into(),
            });
        }
        if let Some(w) = raw.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(SamToolError::InvalidWeights {
                reason: format!("weight {w} is negative or not finite"),
            });
        }
        let total: f64 = raw.iter().sum();
        if total <= 0.0 {
            return Err(SamToolError::InvalidWeights {
                reason: "weights sum to zero".into(),
            });
        }
        Ok(Self(raw.into_iter().map(|w| w / total).collect()))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|w| format!("{w:.2}")).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskProfile {
    Conservative,
    ModeratelyConservative,
    Moderate,
    ModeratelyAggressive,
    Aggressive,
}

impl RiskProfile {
    pub const ALL: [RiskProfile; 5] = [
        RiskProfile::Conservative,
        RiskProfile::ModeratelyConservative,
        RiskProfile::Moderate,
        RiskProfile::ModeratelyAggressive,
        RiskProfile::Aggressive,
    ];

    /// Config and CLI key, e.g. `moderately-aggressive`.
    pub fn key(self) -> &'static str {
        match self {
            RiskProfile::Conservative => "conservative",
            RiskProfile::ModeratelyConservative => "moderately-conservative",
            RiskProfile::Moderate => "moderate",
            RiskProfile::ModeratelyAggressive => "moderately-aggressive",
            RiskProfile::Aggressive => "aggressive",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            RiskProfile::Conservative => "Conservative",
            RiskProfile::ModeratelyConservative => "Moderately Conservative",
            RiskProfile::Moderate => "Moderate",
            RiskProfile::ModeratelyAggressive => "Moderately Aggressive",
            RiskProfile::Aggressive => "Aggressive",
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RiskProfile {
    type Err = SamToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '_'], "-");
        RiskProfile::ALL
            .into_iter()
            .find(|p| p.key() == normalized)
            .ok_or_else(|| SamToolError::UnknownRiskProfile(s.to_string()))
    }
}

/// Columns of the built-in allocation.
pub const STANDARD_SYMBOLS: [&str; 3] = ["SPY", "AGG", "BTC"];

// each row sums to 1
const STANDARD_ALLOCATION: [(RiskProfile, [f64; 3]); 5] = [
    (RiskProfile::Conservative, [0.1, 0.9, 0.0]),
    (RiskProfile::ModeratelyConservative, [0.25, 0.7, 0.05]),
    (RiskProfile::Moderate, [0.6, 0.3, 0.1]),
    (RiskProfile::ModeratelyAggressive, [0.75, 0.2, 0.05]),
    (RiskProfile::Aggressive, [0.8, 0.0, 0.2]),
];

/// Canonical weights for each risk profile.
///
/// Passed explicitly to the analysis pipeline; every entry has the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskProfileTable {
    entries: Vec<(RiskProfile, WeightVector)>,
}

impl RiskProfileTable {
    /// Build a table with one entry per profile.
    pub fn new(entries: Vec<(RiskProfile, WeightVector)>) -> Result<Self, SamToolError> {
        for profile in RiskProfile::ALL {
            let count = entries.iter().filter(|(p, _)| *p == profile).count();
            if count != 1 {
                return Err(SamToolError::InvalidWeights {
                    reason: format!("expected one weighting for {profile}, found {count}"),
                });
            }
        }
        if let Some(((_, first), rest)) = entries.split_first() {
            if let Some((profile, w)) = rest.iter().find(|(_, w)| w.len() != first.len()) {
                return Err(SamToolError::InvalidWeights {
                    reason: format!(
                        "{profile} has {} weights, expected {}",
                        w.len(),
                        first.len()
                    ),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Allocation over [`STANDARD_SYMBOLS`], in that column order.
    pub fn standard() -> Self {
        let entries = STANDARD_ALLOCATION
            .into_iter()
            .map(|(profile, w)| (profile, WeightVector(w.to_vec())))
            .collect();
        Self { entries }
    }

    /// The standard allocation with its columns reordered to match `symbols`.
    ///
    /// `None` unless `symbols` is exactly SPY, AGG and BTC in some order
    /// (case-insensitive).
    pub fn standard_for(symbols: &[String]) -> Option<Self> {
        if symbols.len() != STANDARD_SYMBOLS.len() {
            return None;
        }
        let order = symbols
            .iter()
            .map(|symbol| {
                STANDARD_SYMBOLS
                    .iter()
                    .position(|s| s.eq_ignore_ascii_case(symbol.trim()))
            })
            .collect::<Option<Vec<usize>>>()?;
        let mut seen = order.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != STANDARD_SYMBOLS.len() {
            return None;
        }

        let entries = STANDARD_ALLOCATION
            .into_iter()
            .map(|(profile, w)| (profile, WeightVector(order.iter().map(|&i| w[i]).collect())))
            .collect();
        Some(Self { entries })
    }

    pub fn weights(&self, profile: RiskProfile) -> &WeightVector {
        self.entries
            .iter()
            .find(|(p, _)| *p == profile)
            .map(|(_, w)| w)
            .unwrap_or_else(|| unreachable!("table holds every profile"))
    }

    /// Number of assets each weighting covers.
    pub fn asset_count(&self) -> usize {
        self.entries.first().map(|(_, w)| w.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalize_scales_to_unit_sum() {
        let w = WeightVector::normalize(vec![1.0, 3.0]).unwrap();
        assert_eq!(w.as_slice(), &[0.25, 0.75]);
    }

    #[test]
    fn normalize_keeps_single_asset_weight_exact() {
        let w = WeightVector::normalize(vec![1.0, 0.0, 0.0]).unwrap();
        assert_eq!(w.as_slice(), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn normalize_rejects_bad_input() {
        assert!(WeightVector::normalize(vec![]).is_err());
        assert!(WeightVector::normalize(vec![0.0, 0.0]).is_err());
        assert!(WeightVector::normalize(vec![0.5, -0.1]).is_err());
        assert!(WeightVector::normalize(vec![f64::NAN, 1.0]).is_err());
        assert!(WeightVector::normalize(vec![f64::INFINITY, 1.0]).is_err());
    }

    #[test]
    fn display_rounds_to_two_places() {
        let w = WeightVector::normalize(vec![1.0, 2.0]).unwrap();
        assert_eq!(w.to_string(), "[0.33, 0.67]");
    }

    #[test]
    fn profile_parses_common_spellings() {
        assert_eq!(
            "moderately conservative".parse::<RiskProfile>().unwrap(),
            RiskProfile::ModeratelyConservative
        );
        assert_eq!(
            "Moderately_Aggressive".parse::<RiskProfile>().unwrap(),
            RiskProfile::ModeratelyAggressive
        );
        assert_eq!(" moderate ".parse::<RiskProfile>().unwrap(), RiskProfile::Moderate);
        assert!(matches!(
            "reckless".parse::<RiskProfile>(),
            Err(SamToolError::UnknownRiskProfile(_))
        ));
    }

    #[test]
    fn profile_key_round_trips() {
        for profile in RiskProfile::ALL {
            assert_eq!(profile.key().parse::<RiskProfile>().unwrap(), profile);
        }
    }

    #[test]
    fn standard_table_matches_allocation() {
        let table = RiskProfileTable::standard();
        assert_eq!(table.asset_count(), 3);

        let conservative = table.weights(RiskProfile::Conservative).as_slice();
        assert_relative_eq!(conservative[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(conservative[1], 0.9, epsilon = 1e-12);
        assert_eq!(conservative[2], 0.0);

        let aggressive = table.weights(RiskProfile::Aggressive).as_slice();
        assert_relative_eq!(aggressive[0], 0.8, epsilon = 1e-12);
        assert_relative_eq!(aggressive[2], 0.2, epsilon = 1e-12);

        for profile in RiskProfile::ALL {
            let sum: f64 = table.weights(profile).as_slice().iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn standard_table_keeps_literal_weights() {
        let table = RiskProfileTable::standard();
        assert_eq!(
            table.weights(RiskProfile::ModeratelyConservative).as_slice(),
            &[0.25, 0.7, 0.05]
        );
        assert_eq!(table.weights(RiskProfile::Conservative).as_slice(), &[0.1, 0.9, 0.0]);
    }

    #[test]
    fn standard_for_follows_symbol_order() {
        let symbols: Vec<String> = vec!["BTC".into(), "spy".into(), "AGG".into()];
        let table = RiskProfileTable::standard_for(&symbols).unwrap();
        assert_eq!(table.weights(RiskProfile::Conservative).as_slice(), &[0.0, 0.1, 0.9]);
        assert_eq!(table.weights(RiskProfile::Aggressive).as_slice(), &[0.2, 0.8, 0.0]);
    }

    #[test]
    fn standard_for_in_canonical_order_is_standard() {
        let symbols: Vec<String> = STANDARD_SYMBOLS.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            RiskProfileTable::standard_for(&symbols),
            Some(RiskProfileTable::standard())
        );
    }

    #[test]
    fn standard_for_rejects_other_universes() {
        let two: Vec<String> = vec!["SPY".into(), "AGG".into()];
        let other: Vec<String> = vec!["SPY".into(), "AGG".into(), "ETH".into()];
        let repeated: Vec<String> = vec!["SPY".into(), "SPY".into(), "AGG".into()];
        assert!(RiskProfileTable::standard_for(&two).is_none());
        assert!(RiskProfileTable::standard_for(&other).is_none());
        assert!(RiskProfileTable::standard_for(&repeated).is_none());
    }

    #[test]
    fn table_requires_every_profile_once() {
        let w = WeightVector::normalize(vec![1.0, 1.0]).unwrap();
        let result = RiskProfileTable::new(vec![(RiskProfile::Moderate, w)]);
        assert!(matches!(result, Err(SamToolError::InvalidWeights { .. })));
    }

    #[test]
    fn table_requires_consistent_lengths() {
        let mut entries: Vec<_> = RiskProfile::ALL
            .into_iter()
            .map(|p| (p, WeightVector::normalize(vec![1.0, 1.0]).unwrap()))
            .collect();
        entries[4].1 = WeightVector::normalize(vec![1.0, 1.0, 1.0]).unwrap();

        assert!(RiskProfileTable::new(entries).is_err());
    }
}
