use thiserror::Error;

/// Why a macro or expression could not be resolved.
///
/// These never escape [`crate::eval::Evaluator::evaluate`]: the dispatcher turns
/// any of them into a verbatim copy of the unresolved macro payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Wrong expression shape or type for the handler.
    #[error("Malformed operand: {0}")]
    MalformedOperand(String),

    /// A sheet row, character or world is absent.
    #[error("Lookup miss: {0}")]
    LookupMiss(String),

    /// Main-thread-only state was read from another thread.
    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    /// A recognized sub-case that is deliberately not implemented.
    #[error("Unsupported variant: {0}")]
    UnsupportedVariant(String),
}

pub type EvalResult<T> = Result<T, EvalError>;

impl EvalError {
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        EvalError::MalformedOperand(message.into())
    }

    pub fn miss<S: Into<String>>(message: S) -> Self {
        EvalError::LookupMiss(message.into())
    }

    pub fn unsupported<S: Into<String>>(message: S) -> Self {
        EvalError::UnsupportedVariant(message.into())
    }
}

/// Errors of the crate's fallible outer surfaces (configuration, fixtures,
/// macro-string parsing).
#[derive(Error, Debug)]
pub enum Error {
    #[error("Macro string error: {message}")]
    MacroString { message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type InternalResult<T> = Result<T, Error>;
