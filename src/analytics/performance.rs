//! Scalar performance statistics over a completed equity curve and trade log.
//! All functions are pure -- they borrow inputs and return computed values.
//!
//! Ratios that would divide by a zero deviation or an empty loss book are
//! `None` ("not applicable") rather than NaN or Infinity.

use crate::backtest::{EquityPoint, Trade};
use crate::errors::{EngineError, EngineResult};
use statrs::statistics::Statistics;

/// Trading days per year used for annualization.
pub const TRADING_DAYS: f64 = 252.0;

/// Deviations below this are treated as zero.
const MIN_DEVIATION: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PerformanceSummary {
    pub initial_equity: f64,
    pub final_equity: f64,
    /// Percent.
    pub total_return: f64,
    /// Percent, compounded to a 252-day year. `None` when the compounded
    /// figure overflows, which short horizons with large moves can do.
    pub annual_return: Option<f64>,
    /// Percent, most negative drawdown on the curve.
    pub max_drawdown: f64,
    /// Annualized standard deviation of daily returns, percent.
    pub volatility: f64,
    pub sharpe_ratio: Option<f64>,
    pub sortino_ratio: Option<f64>,
    pub calmar_ratio: Option<f64>,
    /// Percent of trades that won.
    pub win_rate: f64,
    /// Mean return percent of winning trades.
    pub avg_win: f64,
    /// Mean return percent of losing trades (negative).
    pub avg_loss: f64,
    pub profit_factor: Option<f64>,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Percent gained by the benchmark curve over the same horizon.
    pub benchmark_return: f64,
    /// total_return - benchmark_return, percentage points.
    pub alpha: f64,
}

/// Simple daily returns r_n = (e_n - e_{n-1}) / e_{n-1}; one fewer than points.
pub fn daily_returns(equity: &[EquityPoint]) -> Vec<f64> {
    equity
        .windows(2)
        .map(|w| (w[1].equity - w[0].equity) / w[0].equity)
        .collect()
}

/// Sample standard deviation, or None with fewer than two observations.
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(values.iter().std_dev())
}

/// Annualized Sharpe ratio: mean*252 / (std*sqrt(252)).
pub fn sharpe_ratio(returns: &[f64]) -> Option<f64> {
    let std = sample_std(returns)?;
    if std.is_nan() || std <= MIN_DEVIATION {
        return None;
    }
    Some(returns.iter().mean() * TRADING_DAYS / (std * TRADING_DAYS.sqrt()))
}

/// Annualized Sortino ratio: same scaling as Sharpe, but the deviation is the
/// sample standard deviation of the negative daily returns only.
pub fn sortino_ratio(returns: &[f64]) -> Option<f64> {
    let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    let downside_std = sample_std(&downside)?;
    if downside_std.is_nan() || downside_std <= MIN_DEVIATION {
        return None;
    }
    Some(returns.iter().mean() * TRADING_DAYS / (downside_std * TRADING_DAYS.sqrt()))
}

/// Annualized volatility in percent; 0 with fewer than two returns.
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    sample_std(returns).map_or(0.0, |std| std * TRADING_DAYS.sqrt() * 100.0)
}

/// Win/loss breakdown of the trade log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeStats {
    pub total: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub profit_factor: Option<f64>,
}

pub fn trade_stats(trades: &[Trade]) -> TradeStats {
    let (mut wins, mut losses) = (0usize, 0usize);
    let (mut win_sum, mut loss_sum) = (0.0_f64, 0.0_f64);
    for t in trades {
        if t.is_win {
            wins += 1;
            win_sum += t.return_pct;
        } else {
            losses += 1;
            loss_sum += t.return_pct;
        }
    }

    let total = trades.len();
    let win_rate = if total == 0 { 0.0 } else { wins as f64 / total as f64 * 100.0 };
    let avg_win = if wins == 0 { 0.0 } else { win_sum / wins as f64 };
    let avg_loss = if losses == 0 { 0.0 } else { loss_sum / losses as f64 };

    let gross_loss = avg_loss * losses as f64;
    let profit_factor = if losses == 0 || gross_loss.abs() < MIN_DEVIATION {
        None
    } else {
        Some((avg_win * wins as f64 / gross_loss).abs())
    };

    TradeStats { total, wins, losses, win_rate, avg_win, avg_loss, profit_factor }
}

/// Reject curves and logs that cannot be summarized without NaN leaking out.
pub fn validate_inputs(equity: &[EquityPoint], trades: &[Trade]) -> EngineResult<()> {
    if equity.is_empty() {
        return Err(EngineError::Validation("equity series is empty".into()));
    }
    for p in equity {
        if !p.equity.is_finite() || p.equity <= 0.0 {
            return Err(EngineError::Validation(format!(
                "equity on day {} must be positive and finite, got {}",
                p.day, p.equity
            )));
        }
        if !p.drawdown.is_finite() || p.drawdown > 0.0 {
            return Err(EngineError::Validation(format!(
                "drawdown on day {} must be finite and <= 0, got {}",
                p.day, p.drawdown
            )));
        }
        if !p.benchmark.is_finite() || p.benchmark <= 0.0 {
            return Err(EngineError::Validation(format!(
                "benchmark on day {} must be positive and finite, got {}",
                p.day, p.benchmark
            )));
        }
    }
    if let Some(t) = trades.iter().find(|t| !t.return_pct.is_finite()) {
        return Err(EngineError::Validation(format!(
            "trade on day {} has a non-finite return",
            t.day
        )));
    }
    Ok(())
}

/// Summarize a validated equity curve and trade log.
pub fn summarize(equity: &[EquityPoint], trades: &[Trade]) -> EngineResult<PerformanceSummary> {
    validate_inputs(equity, trades)?;

    let (first, last) = match (equity.first(), equity.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Err(EngineError::Validation("equity series is empty".into())),
    };

    let total_return = (last.equity / first.equity - 1.0) * 100.0;
    let periods = (equity.len() - 1) as f64;
    let annual_return = if periods > 0.0 {
        Some(((last.equity / first.equity).powf(TRADING_DAYS / periods) - 1.0) * 100.0)
            .filter(|r| r.is_finite())
    } else {
        Some(0.0)
    };
    if annual_return.is_none() {
        tracing::warn!(periods, "annualized return not representable");
    }

    let max_drawdown = equity.iter().map(|p| p.drawdown).fold(0.0_f64, f64::min);

    let returns = daily_returns(equity);
    let sharpe = sharpe_ratio(&returns);
    let sortino = sortino_ratio(&returns);
    if sharpe.is_none() && returns.len() >= 2 {
        tracing::warn!(days = returns.len(), "zero return deviation, sharpe not applicable");
    }

    let calmar_ratio = annual_return
        .filter(|_| max_drawdown < -MIN_DEVIATION)
        .map(|r| r / max_drawdown.abs());

    let stats = trade_stats(trades);
    let benchmark_return = (last.benchmark / first.benchmark - 1.0) * 100.0;

    Ok(PerformanceSummary {
        initial_equity: first.equity,
        final_equity: last.equity,
        total_return,
        annual_return,
        max_drawdown,
        volatility: annualized_volatility(&returns),
        sharpe_ratio: sharpe,
        sortino_ratio: sortino,
        calmar_ratio,
        win_rate: stats.win_rate,
        avg_win: stats.avg_win,
        avg_loss: stats.avg_loss,
        profit_factor: stats.profit_factor,
        total_trades: stats.total,
        winning_trades: stats.wins,
        losing_trades: stats.losses,
        benchmark_return,
        alpha: total_return - benchmark_return,
    })
}
