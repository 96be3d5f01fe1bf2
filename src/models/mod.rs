pub mod black_scholes;
pub mod normal;

use crate::errors::{ensure_positive, EngineError, EngineResult};
use std::str::FromStr;

/// Calendar days per year, used for both time-to-expiry and per-day theta.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// All pricing models implement this trait.
/// greeks() must be a pure function: deterministic output from inputs only.
/// Send + Sync required for sharing across tokio tasks.
pub trait PricingModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Theoretical price and sensitivities for a validated contract.
    /// Never returns NaN or Infinity; degenerate inputs are a Domain error.
    fn greeks(&self, contract: &OptionContract) -> EngineResult<Greeks>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Call,
    Put,
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(Self::Call),
            "put" => Ok(Self::Put),
            other => Err(EngineError::Validation(format!("unknown option type: {other:?}"))),
        }
    }
}

/// European option inputs. Rates and volatility are annualized fractions,
/// time to expiry is in years. Only constructible through `new`, which
/// enforces S, K, T, sigma > 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionContract {
    spot: f64,
    strike: f64,
    time_to_expiry: f64,
    rate: f64,
    volatility: f64,
    kind: OptionKind,
}

impl OptionContract {
    pub fn new(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        rate: f64,
        volatility: f64,
        kind: OptionKind,
    ) -> EngineResult<Self> {
        ensure_positive("spot", spot)?;
        ensure_positive("strike", strike)?;
        ensure_positive("time_to_expiry", time_to_expiry)?;
        ensure_positive("volatility", volatility)?;
        if !rate.is_finite() {
            return Err(EngineError::Validation(format!("risk-free rate must be finite, got {rate}")));
        }
        Ok(Self { spot, strike, time_to_expiry, rate, volatility, kind })
    }

    /// Same contract with the other exercise side.
    pub fn with_kind(mut self, kind: OptionKind) -> Self {
        self.kind = kind;
        self
    }

    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    #[inline]
    pub fn time_to_expiry(&self) -> f64 {
        self.time_to_expiry
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    #[inline]
    pub fn kind(&self) -> OptionKind {
        self.kind
    }
}

/// Price and the five standard Greeks.
/// vega and rho are per 1 percentage point, theta is per calendar day.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Greeks {
    pub price: f64,
    pub delta: f64,
    pub gamma: f64,
    pub vega: f64,
    pub theta: f64,
    pub rho: f64,
}

impl Greeks {
    pub fn is_finite(&self) -> bool {
        [self.price, self.delta, self.gamma, self.vega, self.theta, self.rho]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Pricing request in quoting units: days, and percentages for vol and rate.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OptionQuote {
    pub spot: f64,
    pub strike: f64,
    pub days_to_expiry: f64,
    pub volatility_pct: f64,
    pub risk_free_rate_pct: f64,
    pub option_type: String,
}

impl OptionQuote {
    pub fn to_contract(&self) -> EngineResult<OptionContract> {
        let kind = self.option_type.parse::<OptionKind>()?;
        ensure_positive("days_to_expiry", self.days_to_expiry)?;
        ensure_positive("volatility_pct", self.volatility_pct)?;
        OptionContract::new(
            self.spot,
            self.strike,
            self.days_to_expiry / DAYS_PER_YEAR,
            self.risk_free_rate_pct / 100.0,
            self.volatility_pct / 100.0,
            kind,
        )
    }
}

/// Validate a quote and price it with the given model.
pub fn price_option(quote: &OptionQuote, model: &dyn PricingModel) -> EngineResult<Greeks> {
    let contract = quote.to_contract()?;
    let greeks = model.greeks(&contract)?;
    tracing::debug!(
        model = model.name(),
        kind = %contract.kind(),
        price = greeks.price,
        "option priced"
    );
    Ok(greeks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(option_type: &str) -> OptionQuote {
        OptionQuote {
            spot: 100.0,
            strike: 100.0,
            days_to_expiry: 30.0,
            volatility_pct: 25.0,
            risk_free_rate_pct: 5.0,
            option_type: option_type.to_string(),
        }
    }

    #[test]
    fn test_quote_units_convert() {
        let c = quote("call").to_contract().expect("valid quote");
        assert!((c.time_to_expiry() - 30.0 / 365.0).abs() < 1e-15);
        assert!((c.volatility() - 0.25).abs() < 1e-15);
        assert!((c.rate() - 0.05).abs() < 1e-15);
        assert_eq!(c.kind(), OptionKind::Call);
    }

    #[test]
    fn test_option_type_parsing() {
        assert_eq!("PUT".parse::<OptionKind>().ok(), Some(OptionKind::Put));
        assert_eq!(" call ".parse::<OptionKind>().ok(), Some(OptionKind::Call));
        assert!(matches!(quote("straddle").to_contract(), Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_non_positive_inputs_rejected() {
        for (spot, strike, t, vol) in [
            (0.0, 100.0, 0.1, 0.2),
            (100.0, -1.0, 0.1, 0.2),
            (100.0, 100.0, 0.0, 0.2),
            (100.0, 100.0, 0.1, 0.0),
        ] {
            let r = OptionContract::new(spot, strike, t, 0.05, vol, OptionKind::Call);
            assert!(matches!(r, Err(EngineError::Validation(_))), "expected rejection for {spot},{strike},{t},{vol}");
        }
    }

    #[test]
    fn test_negative_rate_allowed() {
        assert!(OptionContract::new(100.0, 100.0, 0.5, -0.01, 0.2, OptionKind::Put).is_ok());
    }
}
