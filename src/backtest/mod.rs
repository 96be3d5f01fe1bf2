pub mod simulator;
pub mod strategy;

use crate::config::AppConfig;
use crate::errors::{ensure_positive, EngineError, EngineResult};
use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use simulator::simulate;
pub use strategy::{Strategy, StrategyParams};

/// One closed trade. Created in day order by the simulator, never mutated.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Trade {
    pub day: u32,
    /// Realized return on equity, percent.
    pub return_pct: f64,
    /// Signed profit in currency units.
    pub profit: f64,
    pub is_win: bool,
    /// Equity immediately after the trade was applied.
    pub equity: f64,
}

/// One simulated day on the equity curve.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EquityPoint {
    pub day: u32,
    pub date: NaiveDate,
    pub equity: f64,
    /// Percent below the running peak; 0 at a new high, never positive.
    pub drawdown: f64,
    pub benchmark: f64,
}

/// Horizon and environment of a single simulation.
#[derive(Debug, Clone, Copy)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Number of simulated trading days after day 0.
    pub days: u32,
    /// Calendar date of day 0.
    pub start_date: NaiveDate,
    /// Benchmark compounding rate per 252-day year (fraction).
    pub benchmark_annual_rate: f64,
}

impl BacktestConfig {
    pub fn new(initial_capital: f64, days: u32, app: &AppConfig) -> Self {
        Self {
            initial_capital,
            days,
            start_date: app.backtest_start_date,
            benchmark_annual_rate: app.benchmark_annual_rate,
        }
    }

    pub fn validate(&self, max_days: u32) -> EngineResult<()> {
        ensure_positive("initial_capital", self.initial_capital)?;
        if self.days == 0 {
            return Err(EngineError::Validation("days must be positive".into()));
        }
        if self.days > max_days {
            return Err(EngineError::Validation(format!(
                "days {} exceeds the maximum of {max_days}",
                self.days
            )));
        }
        if !self.benchmark_annual_rate.is_finite() || self.benchmark_annual_rate <= -1.0 {
            return Err(EngineError::Validation(format!(
                "benchmark rate out of range: {}",
                self.benchmark_annual_rate
            )));
        }
        Ok(())
    }
}

/// Complete output of one simulation. `equity_series` holds days + 1 points
/// (day 0 is the initial capital); `trades` is ordered by day.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BacktestResult {
    pub equity_series: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct BacktestRequest {
    pub initial_capital: f64,
    pub strategy_id: String,
    pub days: u32,
    pub rng_seed: u64,
}

/// Validate a request, look up the strategy profile and run a seeded
/// simulation. Identical requests produce identical results.
pub fn run_backtest(req: &BacktestRequest, app: &AppConfig) -> EngineResult<BacktestResult> {
    let strategy = req.strategy_id.parse::<Strategy>()?;
    let cfg = BacktestConfig::new(req.initial_capital, req.days, app);
    cfg.validate(app.max_backtest_days)?;

    let mut rng = ChaCha8Rng::seed_from_u64(req.rng_seed);
    let result = simulate(&strategy.params(), &cfg, &mut rng)?;

    tracing::debug!(
        strategy = %strategy,
        days = req.days,
        seed = req.rng_seed,
        trades = result.trades.len(),
        "backtest complete"
    );
    Ok(result)
}
