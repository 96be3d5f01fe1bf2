use crate::analytics::performance::{annualized_volatility, sharpe_ratio};
use crate::errors::{EngineError, EngineResult};

/// Risk metrics over one window of daily returns.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct RollingMetric {
    /// Day of the equity point closing the window.
    pub day: u32,
    pub sharpe: Option<f64>,
    /// Annualized volatility of the window, percent.
    pub volatility: f64,
}

/// Slide a `window`-length slice over the daily returns and recompute Sharpe
/// and volatility for each position.
///
/// Window i covers returns[i - window .. i], which ends on equity point i.
/// The series runs up to the final return and skips the oldest full window,
/// so it has `returns.len() - window` entries (empty if the series is not
/// longer than the window). `days[i]` labels equity point i.
pub fn rolling_metrics(returns: &[f64], days: &[u32], window: usize) -> EngineResult<Vec<RollingMetric>> {
    if window < 2 {
        return Err(EngineError::Validation(format!(
            "rolling window must be at least 2, got {window}"
        )));
    }
    if days.len() != returns.len() + 1 {
        return Err(EngineError::Validation(format!(
            "{} day labels for {} returns",
            days.len(),
            returns.len()
        )));
    }

    Ok((window + 1..=returns.len())
        .map(|i| {
            let slice = &returns[i - window..i];
            RollingMetric {
                day: days[i],
                sharpe: sharpe_ratio(slice),
                volatility: annualized_volatility(slice),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<u32> {
        (0..=n as u32).collect()
    }

    #[test]
    fn test_length_is_n_minus_window() {
        let returns: Vec<f64> = (0..100).map(|i| ((i * 37 % 11) as f64 - 5.0) / 1000.0).collect();
        for window in [2, 5, 20, 60] {
            let out = rolling_metrics(&returns, &labels(100), window).expect("rolling");
            assert_eq!(out.len(), 100 - window, "window {window}");
        }
    }

    #[test]
    fn test_short_series_is_empty() {
        let returns = [0.01, -0.02, 0.005];
        assert!(rolling_metrics(&returns, &labels(3), 20).expect("rolling").is_empty());
        assert!(rolling_metrics(&returns, &labels(3), 3).expect("rolling").is_empty());
    }

    #[test]
    fn test_window_values_and_labels() {
        let returns = [0.01, -0.01, 0.02, 0.0, 0.01];
        let out = rolling_metrics(&returns, &labels(5), 3).expect("rolling");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].day, 4);
        assert_eq!(out[0].sharpe, sharpe_ratio(&returns[1..4]));
        assert_eq!(out[1].day, 5);
        assert_eq!(out[1].sharpe, sharpe_ratio(&returns[2..5]));
        assert_eq!(out[1].volatility, annualized_volatility(&returns[2..5]));
    }

    #[test]
    fn test_flat_window_sharpe_not_applicable() {
        let returns = [0.0; 10];
        let out = rolling_metrics(&returns, &labels(10), 4).expect("rolling");
        assert!(out.iter().all(|m| m.sharpe.is_none() && m.volatility == 0.0));
    }

    #[test]
    fn test_rejects_bad_window() {
        assert!(matches!(rolling_metrics(&[0.01; 5], &labels(5), 1), Err(EngineError::Validation(_))));
        assert!(matches!(rolling_metrics(&[0.01; 5], &labels(3), 2), Err(EngineError::Validation(_))));
    }
}
