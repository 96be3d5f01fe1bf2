/// Domain-specific error types for the analytics engine.
/// Every public operation is synchronous and pure, so errors are local to the
/// function that detects them. There is no retry path.
/// - Validation: bad input, raised before any computation begins
/// - Domain: numerically degenerate input that would otherwise yield NaN/Infinity
/// - Overflow: a synthetic equity path left the sane floating-point range
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("domain error: {0}")]
    Domain(String),

    #[error("equity overflow on day {day}: {equity}")]
    Overflow { day: u32, equity: f64 },

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Short machine-readable tag, used in HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Domain(_) => "domain",
            Self::Overflow { .. } => "overflow",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Validation(e.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Fails with a validation error unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &str, value: f64) -> EngineResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EngineError::Validation(format!(
            "{name} must be a positive finite number, got {value}"
        )));
    }
    Ok(())
}
