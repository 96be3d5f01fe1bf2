pub mod distribution;
pub mod performance;
pub mod rolling;

use crate::backtest::{EquityPoint, Trade};
use crate::errors::EngineResult;
use smallvec::SmallVec;

pub use distribution::{DistributionBucket, MonthlyReturn};
pub use performance::PerformanceSummary;
pub use rolling::RollingMetric;

/// Default rolling window, in daily returns.
pub const DEFAULT_ROLLING_WINDOW: usize = 20;

/// Summary scalars plus the three derived series.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PerformanceReport {
    #[serde(flatten)]
    pub summary: PerformanceSummary,
    pub monthly_returns: SmallVec<[MonthlyReturn; distribution::MONTHS]>,
    pub rolling_metrics: Vec<RollingMetric>,
    pub trade_distribution: Vec<DistributionBucket>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct MetricsRequest {
    pub equity_series: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
    #[serde(default)]
    pub rolling_window: Option<usize>,
}

/// Compute every metric for a completed run. Inputs are borrowed, never mutated.
pub fn compute_metrics(
    equity: &[EquityPoint],
    trades: &[Trade],
    rolling_window: usize,
) -> EngineResult<PerformanceReport> {
    let summary = performance::summarize(equity, trades)?;

    let returns = performance::daily_returns(equity);
    let days: Vec<u32> = equity.iter().map(|p| p.day).collect();
    let rolling_metrics = rolling::rolling_metrics(&returns, &days, rolling_window)?;

    tracing::debug!(
        points = equity.len(),
        trades = trades.len(),
        window = rolling_window,
        "metrics computed"
    );

    Ok(PerformanceReport {
        summary,
        monthly_returns: distribution::monthly_returns(equity),
        rolling_metrics,
        trade_distribution: distribution::trade_distribution(trades),
    })
}
