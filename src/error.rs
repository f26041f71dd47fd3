use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("{field} out of range ({value}): {reason}")]
    InputRange {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("singular projection: x component is zero")]
    SingularProjection,
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,
}

impl PipelineError {
    pub(crate) fn input_range(field: &'static str, value: f64, reason: &'static str) -> Self {
        PipelineError::InputRange {
            field,
            value,
            reason,
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
