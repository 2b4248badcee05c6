use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForceError {
    /// A force-model constant failed validation.  Parameters are physical
    /// material constants; a non-finite or negative value is a configuration
    /// bug, caught before the first step.
    #[error("force parameter `{name}` must be {requirement}, got {value}")]
    InvalidParam {
        name:        &'static str,
        requirement: &'static str,
        value:       f64,
    },
}

pub type ForceResult<T> = Result<T, ForceError>;
