use autoprov_ai::GenerateError;
use autoprov_core::FieldError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("no step {0}")]
    NoSuchStep(usize),

    #[error("a response is already being generated")]
    GenerationInFlight,

    #[error("{0}")]
    Generate(#[from] GenerateError),

    #[error("export blocked by {} unmet requirement(s)", .0.len())]
    ExportBlocked(Vec<String>),
}
