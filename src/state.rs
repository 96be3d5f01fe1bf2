use crate::config::AppConfig;
use crate::models::black_scholes::BlackScholes;
use portable_atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ── Performance Counters (lock-free) ──

pub struct PerfCounters {
    pub options_priced: AtomicU64,
    pub backtests_run: AtomicU64,
    pub metrics_computed: AtomicU64,
    pub errors: AtomicU64,
}

impl PerfCounters {
    pub fn new() -> Self {
        Self {
            options_priced: AtomicU64::new(0),
            backtests_run: AtomicU64::new(0),
            metrics_computed: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            options_priced: self.options_priced.load(Ordering::Relaxed),
            backtests_run: self.backtests_run.load(Ordering::Relaxed),
            metrics_computed: self.metrics_computed.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

impl Default for PerfCounters {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CounterSnapshot {
    pub options_priced: u64,
    pub backtests_run: u64,
    pub metrics_computed: u64,
    pub errors: u64,
}

// ── Application shared state ──
// Nothing here is mutated per request except the atomic counters; every
// computation owns its inputs and RNG.

pub struct AppState {
    pub config: AppConfig,
    pub pricer: BlackScholes,
    pub counters: PerfCounters,
}

impl AppState {
    pub fn new(config: AppConfig) -> Arc<Self> {
        let pricer = BlackScholes::new(config.min_time_to_expiry);
        Arc::new(Self {
            config,
            pricer,
            counters: PerfCounters::new(),
        })
    }
}
