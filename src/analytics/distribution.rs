//! Bucketed views of a run: index-based "monthly" returns and the
//! trade-return histogram.

use crate::backtest::{EquityPoint, Trade};
use smallvec::SmallVec;

/// Number of periods the equity curve is split into.
pub const MONTHS: usize = 12;

/// Histogram range and bin width, in return percent.
const BUCKET_MIN: f64 = -15.0;
const BUCKET_MAX: f64 = 25.0;
const BUCKET_WIDTH: f64 = 2.0;
const NUM_BUCKETS: usize = ((BUCKET_MAX - BUCKET_MIN) / BUCKET_WIDTH) as usize;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct MonthlyReturn {
    /// Period number, 1..=12.
    pub month: u8,
    pub start_day: u32,
    pub end_day: u32,
    /// Percent change from the period's first to last equity point.
    pub return_pct: f64,
}

/// Split the curve into 12 contiguous chunks by index (not by calendar month)
/// and report the percent change across each chunk.
///
/// Chunk i spans points [i*L/12, (i+1)*L/12] with L = len - 1, so adjacent
/// chunks share their boundary point and the chunks chain to the total
/// return. Always 12 entries; a curve with fewer than two points yields zeros.
pub fn monthly_returns(equity: &[EquityPoint]) -> SmallVec<[MonthlyReturn; MONTHS]> {
    let mut out = SmallVec::new();
    let Some(last_idx) = equity.len().checked_sub(1) else {
        for m in 0..MONTHS {
            out.push(MonthlyReturn { month: m as u8 + 1, start_day: 0, end_day: 0, return_pct: 0.0 });
        }
        return out;
    };

    for m in 0..MONTHS {
        let start = &equity[m * last_idx / MONTHS];
        let end = &equity[(m + 1) * last_idx / MONTHS];
        out.push(MonthlyReturn {
            month: m as u8 + 1,
            start_day: start.day,
            end_day: end.day,
            return_pct: (end.equity / start.equity - 1.0) * 100.0,
        });
    }
    out
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DistributionBucket {
    pub range: String,
    /// Inclusive lower edge, percent.
    pub lower: f64,
    /// Exclusive upper edge, percent.
    pub upper: f64,
    pub count: u32,
}

#[inline]
fn return_to_bucket(return_pct: f64) -> usize {
    let idx = ((return_pct - BUCKET_MIN) / BUCKET_WIDTH).floor();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(NUM_BUCKETS - 1)
    }
}

/// Count trades per 2-point return bin over [-15%, +25%). Returns outside the
/// range are clamped into the first or last bin. Every bin is reported.
pub fn trade_distribution(trades: &[Trade]) -> Vec<DistributionBucket> {
    let mut counts = [0u32; NUM_BUCKETS];
    for t in trades {
        counts[return_to_bucket(t.return_pct)] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let lower = BUCKET_MIN + i as f64 * BUCKET_WIDTH;
            let upper = lower + BUCKET_WIDTH;
            DistributionBucket {
                range: format!("{lower}% to {upper}%"),
                lower,
                upper,
                count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::performance::tests::{curve, trade};

    #[test]
    fn test_always_twelve_months() {
        for len in [0usize, 1, 2, 5, 13, 100, 253, 1000] {
            let values: Vec<f64> = (0..len).map(|i| 100.0 + i as f64).collect();
            let months = monthly_returns(&curve(&values));
            assert_eq!(months.len(), 12, "len {len}");
            assert_eq!(months[11].month, 12);
        }
    }

    #[test]
    fn test_year_of_days_splits_evenly() {
        let values: Vec<f64> = (0..253).map(|i| 100.0 * 1.001_f64.powi(i)).collect();
        let months = monthly_returns(&curve(&values));
        for m in &months {
            assert_eq!(m.end_day - m.start_day, 21);
        }
        let chained = months.iter().fold(1.0, |acc, m| acc * (1.0 + m.return_pct / 100.0));
        let total = values[252] / values[0];
        assert!((chained - total).abs() < 1e-9, "chunks should chain to total return");
    }

    #[test]
    fn test_short_curve_has_zero_months() {
        let months = monthly_returns(&curve(&[100.0]));
        assert!(months.iter().all(|m| m.return_pct == 0.0));
    }

    #[test]
    fn test_bucket_mapping() {
        assert_eq!(return_to_bucket(-15.0), 0);
        assert_eq!(return_to_bucket(-40.0), 0);
        assert_eq!(return_to_bucket(-13.5), 0);
        assert_eq!(return_to_bucket(-13.0), 1);
        assert_eq!(return_to_bucket(0.0), 7);
        assert_eq!(return_to_bucket(24.9), NUM_BUCKETS - 1);
        assert_eq!(return_to_bucket(80.0), NUM_BUCKETS - 1);
    }

    #[test]
    fn test_distribution_counts() {
        let trades = [trade(1, 2.5), trade(2, 3.9), trade(3, -1.0), trade(4, -30.0), trade(5, 50.0)];
        let dist = trade_distribution(&trades);
        assert_eq!(dist.len(), 20);
        assert_eq!(dist.iter().map(|b| b.count).sum::<u32>(), 5);
        assert_eq!(dist[0].count, 1);
        assert_eq!(dist[19].count, 1);
        // [1, 3) holds 2.5, [3, 5) holds 3.9
        assert_eq!(dist[8].count, 1);
        assert_eq!(dist[9].count, 1);
        assert_eq!(dist[0].range, "-15% to -13%");
    }
}
