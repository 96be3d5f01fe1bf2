use crate::analytics::{self, MetricsRequest, PerformanceReport};
use crate::backtest::{self, BacktestRequest, BacktestResult, Strategy, StrategyParams};
use crate::errors::{EngineError, EngineResult};
use crate::models::{self, Greeks, OptionQuote};
use crate::state::{AppState, CounterSnapshot, PerfCounters};
use axum::extract::State;
use axum::response::Json;
use std::sync::Arc;

#[derive(serde::Serialize)]
pub struct StrategyInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub params: StrategyParams,
}

#[derive(serde::Deserialize)]
pub struct ReportRequest {
    #[serde(flatten)]
    pub backtest: BacktestRequest,
    #[serde(default)]
    pub rolling_window: Option<usize>,
}

#[derive(serde::Serialize)]
pub struct ReportResponse {
    pub backtest: BacktestResult,
    pub metrics: PerformanceReport,
}

/// Count and log failures on their way out to the client.
fn track<T>(state: &AppState, route: &'static str, result: EngineResult<T>) -> EngineResult<T> {
    if let Err(e) = &result {
        PerfCounters::bump(&state.counters.errors);
        tracing::error!(route, kind = e.kind(), error = %e, "request failed");
    }
    result
}

/// Run CPU-bound work off the async executor.
async fn blocking<T, F>(f: F) -> EngineResult<T>
where
    F: FnOnce() -> EngineResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| EngineError::Internal(format!("worker task failed: {e}")))?
}

/// GET /api/health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/counters -- request counters (lock-free reads)
pub async fn get_counters(State(state): State<Arc<AppState>>) -> Json<CounterSnapshot> {
    Json(state.counters.snapshot())
}

/// GET /api/strategies -- the fixed strategy table
pub async fn list_strategies() -> Json<Vec<StrategyInfo>> {
    Json(
        Strategy::ALL
            .iter()
            .map(|s| StrategyInfo {
                id: s.id(),
                name: s.display_name(),
                params: s.params(),
            })
            .collect(),
    )
}

/// POST /api/options/price -- price + Greeks (inline, microseconds)
pub async fn price_option(
    State(state): State<Arc<AppState>>,
    Json(quote): Json<OptionQuote>,
) -> Result<Json<Greeks>, EngineError> {
    let result = models::price_option(&quote, &state.pricer);
    let greeks = track(&state, "price_option", result)?;
    PerfCounters::bump(&state.counters.options_priced);
    tracing::info!(
        option_type = %quote.option_type,
        spot = quote.spot,
        strike = quote.strike,
        price = greeks.price,
        "option priced"
    );
    Ok(Json(greeks))
}

/// POST /api/backtest -- seeded simulation
pub async fn run_backtest(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BacktestRequest>,
) -> Result<Json<BacktestResult>, EngineError> {
    tracing::info!(strategy = %req.strategy_id, days = req.days, seed = req.rng_seed, "backtest requested");
    let worker = state.clone();
    let result = blocking(move || backtest::run_backtest(&req, &worker.config)).await;
    let result = track(&state, "run_backtest", result)?;
    PerfCounters::bump(&state.counters.backtests_run);
    Ok(Json(result))
}

/// POST /api/metrics -- metrics over a caller-supplied curve and trade log
pub async fn compute_metrics(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MetricsRequest>,
) -> Result<Json<PerformanceReport>, EngineError> {
    let window = req.rolling_window.unwrap_or(state.config.rolling_window);
    let result = blocking(move || analytics::compute_metrics(&req.equity_series, &req.trades, window)).await;
    let report = track(&state, "compute_metrics", result)?;
    PerfCounters::bump(&state.counters.metrics_computed);
    Ok(Json(report))
}

/// POST /api/backtest/report -- simulation and metrics in one call
pub async fn run_report(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReportRequest>,
) -> Result<Json<ReportResponse>, EngineError> {
    let window = req.rolling_window.unwrap_or(state.config.rolling_window);
    let worker = state.clone();
    let result = blocking(move || {
        let backtest = backtest::run_backtest(&req.backtest, &worker.config)?;
        let metrics = analytics::compute_metrics(&backtest.equity_series, &backtest.trades, window)?;
        Ok(ReportResponse { backtest, metrics })
    })
    .await;
    let response = track(&state, "run_report", result)?;
    PerfCounters::bump(&state.counters.backtests_run);
    PerfCounters::bump(&state.counters.metrics_computed);
    Ok(Json(response))
}
