//! Investor qualification and risk-profile scoring.
//!
//! Ability to take risk comes from the years left until 65; willingness comes
//! from the loss the investor can stomach. Each scores 1-3 and the average
//! selects one of the five profiles.

use crate::domain::error::SamToolError;
use crate::domain::weights::RiskProfile;
use std::fmt;
use std::str::FromStr;

pub const RETIREMENT_AGE: i64 = 65;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InvestorFacts {
    pub cash: f64,
    pub investments: f64,
    pub annual_income: f64,
    pub annual_spending: f64,
}

impl InvestorFacts {
    pub fn net_worth(&self) -> f64 {
        self.cash + self.investments + self.annual_income - self.annual_spending
    }
}

/// Returns the investable amount, or `InsufficientFunds` if it is not positive.
pub fn qualify(facts: &InvestorFacts) -> Result<f64, SamToolError> {
    let net_worth = facts.net_worth();
    if net_worth > 0.0 {
        Ok(net_worth)
    } else {
        Err(SamToolError::InsufficientFunds { net_worth })
    }
}

/// Comfort level with a drawdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossTolerance {
    /// Less than 10% loss.
    Low,
    /// 10% to 50% loss.
    Medium,
    /// More than 50% loss.
    High,
}

impl LossTolerance {
    fn score(self) -> u8 {
        match self {
            LossTolerance::Low => 1,
            LossTolerance::Medium => 2,
            LossTolerance::High => 3,
        }
    }
}

impl fmt::Display for LossTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LossTolerance::Low => "low",
            LossTolerance::Medium => "medium",
            LossTolerance::High => "high",
        })
    }
}

impl FromStr for LossTolerance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(LossTolerance::Low),
            "medium" => Ok(LossTolerance::Medium),
            "high" => Ok(LossTolerance::High),
            other => Err(format!(
                "unknown loss tolerance '{other}' (expected low, medium or high)"
            )),
        }
    }
}

fn horizon_score(age: f64) -> u8 {
    let horizon = RETIREMENT_AGE - age.trunc() as i64;
    if horizon <= 5 {
        1
    } else if horizon <= 10 {
        2
    } else {
        3
    }
}

pub fn assess_risk_profile(age: f64, tolerance: LossTolerance) -> RiskProfile {
    // score in 2..=6, i.e. twice the average of the two 1-3 scores
    match horizon_score(age) + tolerance.score() {
        2 => RiskProfile::Conservative,
        3 => RiskProfile::ModeratelyConservative,
        4 => RiskProfile::Moderate,
        5 => RiskProfile::ModeratelyAggressive,
        _ => RiskProfile::Aggressive,
    }
}
