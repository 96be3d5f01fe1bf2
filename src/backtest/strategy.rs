use crate::errors::{ensure_positive, EngineError, EngineResult};
use std::str::FromStr;

/// The closed set of simulated strategies. Each variant is bound to a fixed
/// parameter record through `params()`; the match keeps the table exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    MaCrossover,
    RsiMeanReversion,
    BollingerBreakout,
    Momentum,
    VolatilityMeanReversion,
    TrendFollowing,
}

/// Per-strategy constants driving the simulator.
/// Returns are in percent (2.5 = +2.5% on the position's equity).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct StrategyParams {
    /// Probability that a trade is a winner, in [0, 1].
    pub win_rate: f64,
    /// Mean winning trade return, percent.
    pub avg_win: f64,
    /// Mean losing trade magnitude, percent (positive).
    pub avg_loss: f64,
    /// Probability of trading on any given day, in [0, 1].
    pub trade_frequency: f64,
}

impl StrategyParams {
    /// Validates a parameter record. Zero trade frequency is allowed.
    pub fn validate(&self) -> EngineResult<()> {
        if !(0.0..=1.0).contains(&self.win_rate) {
            return Err(EngineError::Validation(format!(
                "win_rate must be in [0, 1], got {}",
                self.win_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.trade_frequency) {
            return Err(EngineError::Validation(format!(
                "trade_frequency must be in [0, 1], got {}",
                self.trade_frequency
            )));
        }
        ensure_positive("avg_win", self.avg_win)?;
        ensure_positive("avg_loss", self.avg_loss)?;
        Ok(())
    }
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::MaCrossover,
        Strategy::RsiMeanReversion,
        Strategy::BollingerBreakout,
        Strategy::Momentum,
        Strategy::VolatilityMeanReversion,
        Strategy::TrendFollowing,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::MaCrossover => "ma-crossover",
            Self::RsiMeanReversion => "rsi-mean-reversion",
            Self::BollingerBreakout => "bollinger-breakout",
            Self::Momentum => "momentum",
            Self::VolatilityMeanReversion => "volatility-mean-reversion",
            Self::TrendFollowing => "trend-following",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MaCrossover => "Moving Average Crossover",
            Self::RsiMeanReversion => "RSI Mean Reversion",
            Self::BollingerBreakout => "Bollinger Band Breakout",
            Self::Momentum => "Momentum",
            Self::VolatilityMeanReversion => "Volatility Mean Reversion",
            Self::TrendFollowing => "Trend Following",
        }
    }

    pub fn params(&self) -> StrategyParams {
        match self {
            Self::MaCrossover => StrategyParams {
                win_rate: 0.55,
                avg_win: 2.5,
                avg_loss: 1.8,
                trade_frequency: 0.15,
            },
            Self::RsiMeanReversion => StrategyParams {
                win_rate: 0.62,
                avg_win: 1.8,
                avg_loss: 1.5,
                trade_frequency: 0.20,
            },
            Self::BollingerBreakout => StrategyParams {
                win_rate: 0.48,
                avg_win: 3.2,
                avg_loss: 1.6,
                trade_frequency: 0.12,
            },
            Self::Momentum => StrategyParams {
                win_rate: 0.52,
                avg_win: 2.8,
                avg_loss: 2.0,
                trade_frequency: 0.18,
            },
            Self::VolatilityMeanReversion => StrategyParams {
                win_rate: 0.58,
                avg_win: 2.0,
                avg_loss: 1.7,
                trade_frequency: 0.10,
            },
            Self::TrendFollowing => StrategyParams {
                win_rate: 0.45,
                avg_win: 4.0,
                avg_loss: 1.5,
                trade_frequency: 0.08,
            },
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Strategy {
    type Err = EngineError;

    /// Accepts the kebab-case id, or the same with underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|st| st.id() == wanted)
            .ok_or_else(|| EngineError::Validation(format!("unknown strategy id: {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_params_valid() {
        for st in Strategy::ALL {
            let p = st.params();
            assert!(p.validate().is_ok(), "{st} params invalid: {p:?}");
            assert!(p.win_rate > 0.0 && p.win_rate < 1.0);
            assert!(p.trade_frequency > 0.0 && p.trade_frequency < 1.0);
        }
    }

    #[test]
    fn test_id_roundtrip_and_aliases() {
        for st in Strategy::ALL {
            assert_eq!(st.id().parse::<Strategy>().ok(), Some(st));
        }
        assert_eq!("RSI_MEAN_REVERSION".parse::<Strategy>().ok(), Some(Strategy::RsiMeanReversion));
        assert!(matches!("martingale".parse::<Strategy>(), Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_serde_id_matches() {
        let json = serde_json::to_string(&Strategy::VolatilityMeanReversion).expect("serialize");
        assert_eq!(json, "\"volatility-mean-reversion\"");
    }

    #[test]
    fn test_validate_rejects_bad_params() {
        let base = Strategy::Momentum.params();
        assert!(StrategyParams { win_rate: 1.2, ..base }.validate().is_err());
        assert!(StrategyParams { trade_frequency: -0.1, ..base }.validate().is_err());
        assert!(StrategyParams { avg_loss: 0.0, ..base }.validate().is_err());
        assert!(StrategyParams { trade_frequency: 0.0, ..base }.validate().is_ok());
    }
}
