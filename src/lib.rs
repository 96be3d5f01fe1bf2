//! Quantitative analytics engine: closed-form European option pricing, a
//! seeded strategy backtest simulator, and the performance metrics derived
//! from its equity curve and trade log.
//!
//! Every computation is a synchronous, pure function of its inputs. The only
//! randomness is the generator handed to [`backtest::simulate`], so a fixed
//! seed reproduces a run exactly and independent runs can share threads freely.

pub mod analytics;
pub mod backtest;
pub mod config;
pub mod errors;
pub mod models;
pub mod server;
pub mod state;

pub use analytics::{compute_metrics, PerformanceReport};
pub use backtest::{run_backtest, BacktestRequest, BacktestResult};
pub use errors::{EngineError, EngineResult};
pub use models::{price_option, Greeks, OptionQuote};
