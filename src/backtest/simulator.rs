use crate::backtest::{BacktestConfig, BacktestResult, EquityPoint, StrategyParams, Trade};
use crate::errors::{EngineError, EngineResult};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::Rng;

// ═══════════════════════════════════════════════════════════════════════════════
// SYNTHETIC STRATEGY SIMULATION
//
// Each day, strictly in order:
// 1. TRADE: with probability trade_frequency a trade closes today. It wins
//    with probability win_rate. The realized return is the profile mean scaled
//    by a uniform jitter in [0.5, 1.5), positive for wins, negative for losses,
//    and compounds into equity.
// 2. DRIFT: background market movement applied every day, a uniform
//    multiplicative step centred slightly above zero.
// 3. DRAWDOWN: measured against the running peak (including today).
// 4. BENCHMARK: deterministic compounding of a fixed annual rate.
//
// The only randomness comes from the injected generator, so a seeded
// generator reproduces the run exactly.
// ═══════════════════════════════════════════════════════════════════════════════

/// Lower edge of the return jitter multiplier; the upper edge is this + 1.
const JITTER_FLOOR: f64 = 0.5;
/// Uniform draws are centred here, so drift averages (0.5 - 0.48) * scale.
const DRIFT_CENTER: f64 = 0.48;
/// Width of the daily drift step: factor is 1 + (u - DRIFT_CENTER) * DRIFT_SCALE.
const DRIFT_SCALE: f64 = 0.01;
/// Trading days per year for benchmark compounding.
const TRADING_DAYS: f64 = 252.0;
/// Equity above this multiple of starting capital is reported as overflow.
const MAX_EQUITY_MULTIPLE: f64 = 1e12;

/// Hard cap on the horizon of any single run, whatever the caller's limit.
pub const MAX_SIMULATION_DAYS: u32 = 100_000;

/// Run one simulation with an injected random source.
///
/// Pure apart from the generator: same params, config and generator state
/// give the same result. Validation happens before any draw, and horizons
/// beyond [`MAX_SIMULATION_DAYS`] are rejected.
pub fn simulate<R: Rng + ?Sized>(
    params: &StrategyParams,
    cfg: &BacktestConfig,
    rng: &mut R,
) -> EngineResult<BacktestResult> {
    params.validate()?;
    cfg.validate(MAX_SIMULATION_DAYS)?;

    let initial = cfg.initial_capital;
    let ceiling = initial * MAX_EQUITY_MULTIPLE;

    let mut equity_series = Vec::with_capacity(cfg.days as usize + 1);
    let mut trades = Vec::new();

    let mut date = next_business_day(cfg.start_date);
    let mut equity = initial;
    let mut peak = initial;

    equity_series.push(EquityPoint {
        day: 0,
        date,
        equity,
        drawdown: 0.0,
        benchmark: initial,
    });

    for day in 1..=cfg.days {
        date = advance_business_day(date)?;

        // 1. Trade
        if rng.gen::<f64>() < params.trade_frequency {
            let is_win = rng.gen::<f64>() < params.win_rate;
            let jitter = JITTER_FLOOR + rng.gen::<f64>();
            let return_pct = if is_win {
                params.avg_win * jitter
            } else {
                -params.avg_loss * jitter
            };

            let profit = equity * return_pct / 100.0;
            equity += profit;
            check_equity(day, equity, ceiling)?;

            trades.push(Trade {
                day,
                return_pct,
                profit,
                is_win,
                equity,
            });
        }

        // 2. Drift
        equity *= 1.0 + (rng.gen::<f64>() - DRIFT_CENTER) * DRIFT_SCALE;
        check_equity(day, equity, ceiling)?;

        // 3. Drawdown from running peak
        if equity > peak {
            peak = equity;
        }
        let drawdown = (equity - peak) / peak * 100.0;

        // 4. Benchmark
        let benchmark = initial * (1.0 + cfg.benchmark_annual_rate).powf(day as f64 / TRADING_DAYS);

        equity_series.push(EquityPoint {
            day,
            date,
            equity,
            drawdown,
            benchmark,
        });
    }

    Ok(BacktestResult { equity_series, trades })
}

#[inline]
fn check_equity(day: u32, equity: f64, ceiling: f64) -> EngineResult<()> {
    if !equity.is_finite() || equity <= 0.0 || equity > ceiling {
        tracing::warn!(day, equity, "equity left the sane range");
        return Err(EngineError::Overflow { day, equity });
    }
    Ok(())
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The date itself if it is a weekday, otherwise the following Monday.
fn next_business_day(mut date: NaiveDate) -> NaiveDate {
    while is_weekend(date) {
        match date.checked_add_days(Days::new(1)) {
            Some(d) => date = d,
            None => break,
        }
    }
    date
}

fn advance_business_day(date: NaiveDate) -> EngineResult<NaiveDate> {
    let mut next = date;
    loop {
        next = next
            .checked_add_days(Days::new(1))
            .ok_or_else(|| EngineError::Validation("simulation calendar out of range".into()))?;
        if !is_weekend(next) {
            return Ok(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backtest::Strategy;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn cfg(days: u32) -> BacktestConfig {
        BacktestConfig {
            initial_capital: 100_000.0,
            days,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 2).expect("date"),
            benchmark_annual_rate: 0.08,
        }
    }

    #[test]
    fn test_zero_frequency_is_drift_only() {
        let params = StrategyParams { trade_frequency: 0.0, ..Strategy::Momentum.params() };
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let res = simulate(&params, &cfg(300), &mut rng).expect("drift-only run");

        assert!(res.trades.is_empty(), "no trades expected with zero frequency");
        assert_eq!(res.equity_series.len(), 301);

        // Replay the stream: one trade check, then one drift draw per day.
        let mut replay = ChaCha8Rng::seed_from_u64(11);
        let mut expected = 100_000.0;
        for p in &res.equity_series[1..] {
            let _trade_check: f64 = replay.gen();
            let u: f64 = replay.gen();
            expected *= 1.0 + (u - DRIFT_CENTER) * DRIFT_SCALE;
            assert_eq!(p.equity, expected, "day {}", p.day);
        }
    }

    #[test]
    fn test_horizon_is_capped() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let res = simulate(&Strategy::Momentum.params(), &cfg(MAX_SIMULATION_DAYS + 1), &mut rng);
        assert!(matches!(res, Err(EngineError::Validation(_))), "got {res:?}");

        let res = simulate(&Strategy::Momentum.params(), &cfg(u32::MAX), &mut rng);
        assert!(matches!(res, Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_drawdown_invariants() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let res = simulate(&Strategy::BollingerBreakout.params(), &cfg(500), &mut rng).expect("run");

        assert_eq!(res.equity_series[0].drawdown, 0.0);
        let mut peak = res.equity_series[0].equity;
        for p in &res.equity_series {
            peak = peak.max(p.equity);
            let expected = (p.equity - peak) / peak * 100.0;
            assert!(p.drawdown <= 0.0, "day {} drawdown {} positive", p.day, p.drawdown);
            assert!((p.drawdown - expected).abs() < 1e-9, "day {} drawdown mismatch", p.day);
        }
    }

    #[test]
    fn test_trade_records_consistent() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let params = Strategy::RsiMeanReversion.params();
        let res = simulate(&params, &cfg(400), &mut rng).expect("run");

        assert!(!res.trades.is_empty());
        for t in &res.trades {
            assert!(t.day >= 1 && t.day <= 400);
            assert_eq!(t.is_win, t.return_pct > 0.0);
            assert_eq!(t.is_win, t.profit > 0.0);
            let bound = (if t.is_win { params.avg_win } else { params.avg_loss }) * 1.5;
            assert!(t.return_pct.abs() <= bound, "return {} beyond jitter bound", t.return_pct);
        }
    }

    #[test]
    fn test_benchmark_is_deterministic_compounding() {
        let mut a = ChaCha8Rng::seed_from_u64(1);
        let mut b = ChaCha8Rng::seed_from_u64(2);
        let ra = simulate(&Strategy::TrendFollowing.params(), &cfg(252), &mut a).expect("a");
        let rb = simulate(&Strategy::Momentum.params(), &cfg(252), &mut b).expect("b");

        let bench_a: Vec<f64> = ra.equity_series.iter().map(|p| p.benchmark).collect();
        let bench_b: Vec<f64> = rb.equity_series.iter().map(|p| p.benchmark).collect();
        assert_eq!(bench_a, bench_b);
        let last = bench_a[252];
        assert!((last - 108_000.0).abs() < 1e-6, "one year at 8% should be 108000, got {last}");
    }

    #[test]
    fn test_dates_skip_weekends() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut c = cfg(30);
        c.start_date = NaiveDate::from_ymd_opt(2024, 1, 6).expect("date"); // Saturday
        let res = simulate(&Strategy::Momentum.params(), &c, &mut rng).expect("run");

        assert_eq!(res.equity_series[0].date, NaiveDate::from_ymd_opt(2024, 1, 8).expect("date"));
        assert!(res.equity_series.iter().all(|p| !is_weekend(p.date)));
        assert!(res.equity_series.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_ruinous_losses_are_reported() {
        let params = StrategyParams {
            win_rate: 0.0,
            avg_win: 1.0,
            avg_loss: 250.0,
            trade_frequency: 1.0,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let res = simulate(&params, &cfg(50), &mut rng);
        assert!(matches!(res, Err(EngineError::Overflow { day: 1, .. })), "got {res:?}");
    }
}
