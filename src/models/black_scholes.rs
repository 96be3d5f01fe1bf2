use crate::errors::{EngineError, EngineResult};
use crate::models::normal;
use crate::models::{Greeks, OptionContract, OptionKind, PricingModel, DAYS_PER_YEAR};

/// Default lower bound on time to expiry (years).
pub const DEFAULT_MIN_TIME_TO_EXPIRY: f64 = 1e-6;

/// Black-Scholes European option pricing.
///
/// d1 = (ln(S/K) + (r + sigma^2/2)*T) / (sigma * sqrt(T))
/// d2 = d1 - sigma * sqrt(T)
///
/// call = S*Phi(d1) - K*e^{-rT}*Phi(d2)
/// put  = K*e^{-rT}*Phi(-d2) - S*Phi(-d1)
///
/// Phi is the Zelen-Severo approximation from `models::normal`.
/// Gamma and vega are computed once and shared by both sides.
pub struct BlackScholes {
    /// Contracts with T at or below this are rejected as degenerate.
    min_time_to_expiry: f64,
}

impl BlackScholes {
    pub fn new(min_time_to_expiry: f64) -> Self {
        Self { min_time_to_expiry }
    }
}

impl Default for BlackScholes {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TIME_TO_EXPIRY)
    }
}

/// Intermediate terms shared by price and Greeks.
#[derive(Debug, Clone, Copy)]
struct Terms {
    d1: f64,
    d2: f64,
    sqrt_t: f64,
    /// K * e^{-rT}
    discounted_strike: f64,
}

impl Terms {
    #[inline]
    fn new(c: &OptionContract) -> Self {
        let t = c.time_to_expiry();
        let sigma = c.volatility();
        let sqrt_t = t.sqrt();
        let sigma_sqrt_t = sigma * sqrt_t;
        let d1 = ((c.spot() / c.strike()).ln() + (c.rate() + 0.5 * sigma * sigma) * t) / sigma_sqrt_t;
        Self {
            d1,
            d2: d1 - sigma_sqrt_t,
            sqrt_t,
            discounted_strike: c.strike() * (-c.rate() * t).exp(),
        }
    }
}

impl PricingModel for BlackScholes {
    #[inline]
    fn name(&self) -> &'static str {
        "Black-Scholes"
    }

    fn greeks(&self, c: &OptionContract) -> EngineResult<Greeks> {
        if c.time_to_expiry() <= self.min_time_to_expiry {
            return Err(EngineError::Domain(format!(
                "time to expiry {} years is below the pricing epsilon {}",
                c.time_to_expiry(),
                self.min_time_to_expiry
            )));
        }

        let s = c.spot();
        let t = c.time_to_expiry();
        let r = c.rate();
        let sigma = c.volatility();
        let Terms { d1, d2, sqrt_t, discounted_strike } = Terms::new(c);

        let pdf_d1 = normal::pdf(d1);
        let gamma = pdf_d1 / (s * sigma * sqrt_t);
        let vega = s * pdf_d1 * sqrt_t / 100.0;
        let time_decay = -s * pdf_d1 * sigma / (2.0 * sqrt_t);

        let greeks = match c.kind() {
            OptionKind::Call => {
                let nd1 = normal::cdf(d1);
                let nd2 = normal::cdf(d2);
                Greeks {
                    price: s * nd1 - discounted_strike * nd2,
                    delta: nd1,
                    gamma,
                    vega,
                    theta: (time_decay - r * discounted_strike * nd2) / DAYS_PER_YEAR,
                    rho: t * discounted_strike * nd2 / 100.0,
                }
            }
            OptionKind::Put => {
                let nd1 = normal::cdf(d1);
                let n_minus_d1 = normal::cdf(-d1);
                let n_minus_d2 = normal::cdf(-d2);
                Greeks {
                    price: discounted_strike * n_minus_d2 - s * n_minus_d1,
                    delta: nd1 - 1.0,
                    gamma,
                    vega,
                    theta: (time_decay + r * discounted_strike * n_minus_d2) / DAYS_PER_YEAR,
                    rho: -t * discounted_strike * n_minus_d2 / 100.0,
                }
            }
        };

        if !greeks.is_finite() {
            return Err(EngineError::Domain(format!(
                "non-finite result for S={s} K={} T={t} sigma={sigma}",
                c.strike()
            )));
        }

        Ok(greeks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract(spot: f64, strike: f64, t: f64, r: f64, sigma: f64) -> OptionContract {
        OptionContract::new(spot, strike, t, r, sigma, OptionKind::Call).expect("valid contract")
    }

    fn both(c: OptionContract) -> (Greeks, Greeks) {
        let model = BlackScholes::default();
        let call = model.greeks(&c.with_kind(OptionKind::Call)).expect("call priced");
        let put = model.greeks(&c.with_kind(OptionKind::Put)).expect("put priced");
        (call, put)
    }

    #[test]
    fn test_atm_30_day_scenario() {
        let (call, _) = both(contract(100.0, 100.0, 30.0 / 365.0, 0.05, 0.25));
        assert!((call.price - 3.1).abs() < 0.1, "call price={} should be near 3.1", call.price);
        assert!((call.delta - 0.535).abs() < 0.1, "call delta={} should be near 0.535", call.delta);
        assert!(call.theta < 0.0, "long call theta should be negative: {}", call.theta);
    }

    #[test]
    fn test_put_call_parity() {
        for &(s, k, t, r, sigma) in &[
            (100.0, 100.0, 30.0 / 365.0, 0.05, 0.25),
            (120.0, 100.0, 1.0, 0.03, 0.40),
            (80.0, 100.0, 0.25, 0.0, 0.15),
            (50.0, 55.0, 2.0, -0.01, 0.60),
        ] {
            let (call, put) = both(contract(s, k, t, r, sigma));
            let parity = s - k * (-r * t).exp();
            let diff = call.price - put.price;
            assert!((diff - parity).abs() < 1e-5, "parity broken: C-P={diff}, S-Ke^-rT={parity}");
        }
    }

    #[test]
    fn test_delta_gap_gamma_vega_shared() {
        let (call, put) = both(contract(105.0, 95.0, 0.5, 0.04, 0.3));
        assert!((call.delta - put.delta - 1.0).abs() < 1e-12, "delta_call - delta_put must be 1");
        assert_eq!(call.gamma, put.gamma);
        assert_eq!(call.vega, put.vega);
        assert!(call.gamma > 0.0 && call.vega > 0.0);
    }

    #[test]
    fn test_rho_signs() {
        let (call, put) = both(contract(100.0, 100.0, 1.0, 0.05, 0.2));
        assert!(call.rho > 0.0, "call rho={}", call.rho);
        assert!(put.rho < 0.0, "put rho={}", put.rho);
    }

    #[test]
    fn test_deep_itm_and_otm() {
        let (itm_call, itm_put) = both(contract(200.0, 100.0, 0.25, 0.05, 0.2));
        assert!(itm_call.delta > 0.99, "deep ITM call delta={}", itm_call.delta);
        assert!(itm_put.price < 0.01, "deep OTM put price={}", itm_put.price);
    }

    #[test]
    fn test_expiry_below_epsilon_is_domain_error() {
        let model = BlackScholes::new(1e-4);
        let c = contract(100.0, 100.0, 1e-5, 0.05, 0.2);
        assert!(matches!(model.greeks(&c), Err(EngineError::Domain(_))));
    }
}
