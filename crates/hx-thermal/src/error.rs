use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThermalError {
    #[error("curve {0:?} has no samples")]
    EmptyCurve(String),

    #[error("curve {curve:?} has a non-finite sample at step {step}")]
    NonFinite { curve: String, step: usize },

    #[error("curve {curve:?} is missing step {step}")]
    MissingStep { curve: String, step: usize },

    #[error("curve {curve:?} step {step} is beyond one sample per second")]
    StepOutOfRange { curve: String, step: usize },

    #[error("curve {curve:?} lists step {step} twice")]
    DuplicateStep { curve: String, step: usize },

    #[error("curve {0:?} defined twice")]
    DuplicateCurve(String),

    #[error("unknown temperature curve {0:?}")]
    UnknownCurve(String),

    #[error("curve parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ThermalResult<T> = Result<T, ThermalError>;
