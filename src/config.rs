use crate::backtest::simulator::MAX_SIMULATION_DAYS;
use crate::errors::{EngineError, EngineResult};
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    /// Annual compounding rate of the benchmark curve (fraction, e.g. 0.08).
    pub benchmark_annual_rate: f64,
    /// Default sliding window (in daily returns) for rolling metrics.
    pub rolling_window: usize,
    pub max_backtest_days: u32,
    pub backtest_start_date: NaiveDate,
    /// Time-to-expiry (years) at or below which pricing is rejected.
    pub min_time_to_expiry: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 3001,
            benchmark_annual_rate: 0.08,
            rolling_window: 20,
            max_backtest_days: 5000,
            backtest_start_date: default_start_date(),
            min_time_to_expiry: 1e-6,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();

        let server_port = env_var_or("SERVER_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| EngineError::Config(format!("SERVER_PORT: {e}")))?;

        let benchmark_annual_rate = env_var_or("BENCHMARK_ANNUAL_RATE", "0.08")
            .parse::<f64>()
            .map_err(|e| EngineError::Config(format!("BENCHMARK_ANNUAL_RATE: {e}")))?;

        let rolling_window = env_var_or("ROLLING_WINDOW", "20")
            .parse::<usize>()
            .map_err(|e| EngineError::Config(format!("ROLLING_WINDOW: {e}")))?;

        let max_backtest_days = env_var_or("MAX_BACKTEST_DAYS", "5000")
            .parse::<u32>()
            .map_err(|e| EngineError::Config(format!("MAX_BACKTEST_DAYS: {e}")))?;

        let backtest_start_date =
            NaiveDate::parse_from_str(&env_var_or("BACKTEST_START_DATE", "2024-01-02"), "%Y-%m-%d")
                .map_err(|e| EngineError::Config(format!("BACKTEST_START_DATE: {e}")))?;

        let min_time_to_expiry = env_var_or("MIN_TIME_TO_EXPIRY", "1e-6")
            .parse::<f64>()
            .map_err(|e| EngineError::Config(format!("MIN_TIME_TO_EXPIRY: {e}")))?;

        let cfg = Self {
            server_port,
            benchmark_annual_rate,
            rolling_window,
            max_backtest_days,
            backtest_start_date,
            min_time_to_expiry,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> EngineResult<()> {
        if !self.benchmark_annual_rate.is_finite() || self.benchmark_annual_rate <= -1.0 {
            return Err(EngineError::Config(format!(
                "BENCHMARK_ANNUAL_RATE out of range: {}",
                self.benchmark_annual_rate
            )));
        }
        if self.rolling_window < 2 {
            return Err(EngineError::Config("ROLLING_WINDOW must be at least 2".into()));
        }
        if self.max_backtest_days == 0 || self.max_backtest_days > MAX_SIMULATION_DAYS {
            return Err(EngineError::Config(format!(
                "MAX_BACKTEST_DAYS must be in 1..={MAX_SIMULATION_DAYS}, got {}",
                self.max_backtest_days
            )));
        }
        if !self.min_time_to_expiry.is_finite() || self.min_time_to_expiry <= 0.0 {
            return Err(EngineError::Config("MIN_TIME_TO_EXPIRY must be positive".into()));
        }
        Ok(())
    }
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap_or(NaiveDate::MIN)
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
