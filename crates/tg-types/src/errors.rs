use thiserror::Error;

/// Main error type for the TrialGrid system
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised while loading or aligning tabular inputs
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data loading failed: {message}")]
    LoadingFailed { message: String },

    #[error("Data parsing error: {message}")]
    ParseError { message: String },

    #[error("Duplicate sample id: {sample_id}")]
    DuplicateSampleId { sample_id: String },

    #[error("Predicted sample {sample_id} has no ground-truth outcome")]
    UnknownSampleId { sample_id: String },

    #[error("No overlap between predictions and ground truth for {pipeline}")]
    EmptyOverlap { pipeline: String },

    #[error("No samples left after aligning features with outcomes")]
    EmptyJoin,

    #[error("Insufficient data: {message}")]
    InsufficientData { message: String },
}

/// Errors raised by the external cross-validation engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Engine spawn failed for '{command}': {message}")]
    SpawnFailed { command: String, message: String },

    #[error("Engine exited abnormally ({status}) on trial {trial}")]
    Failed { status: String, trial: usize },

    #[error("Engine produced no predictions for {pipeline}: expected {path}")]
    MissingPredictions { pipeline: String, path: String },

    #[error("Prediction file {path} is malformed: {message}")]
    MalformedPredictions { path: String, message: String },
}

/// Result type alias for TrialGrid operations
pub type SweepResult<T> = Result<T, SweepError>;

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        SweepError::Config(format!($($arg)*))
    };
}

/// Macro for creating internal errors
#[macro_export]
macro_rules! internal_error {
    ($($arg:tt)*) => {
        SweepError::Internal(format!($($arg)*))
    };
}
