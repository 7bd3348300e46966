use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// How much of the funding balance a run should distribute.
///
/// Parsed from the command line once; the core never sees the raw string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmountSpec {
    /// Everything the funding account holds, net of the fee reserve.
    Maximum,
    /// A fixed SOL quantity.
    Fixed(f64),
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseAmountError {
    #[error("amount must be \"max\" or a decimal SOL quantity, got {0:?}")]
    Unrecognized(String),
    #[error("amount must be a positive, finite SOL quantity, got {0}")]
    NotPositive(f64),
}

impl FromStr for AmountSpec {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.eq_ignore_ascii_case("max") {
            return Ok(AmountSpec::Maximum);
        }
        let sol: f64 = token
            .parse()
            .map_err(|_| ParseAmountError::Unrecognized(token.to_string()))?;
        if !sol.is_finite() || sol <= 0.0 {
            return Err(ParseAmountError::NotPositive(sol));
        }
        Ok(AmountSpec::Fixed(sol))
    }
}

impl fmt::Display for AmountSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountSpec::Maximum => write!(f, "max"),
            AmountSpec::Fixed(sol) => write!(f, "{} SOL", sol),
        }
    }
}
