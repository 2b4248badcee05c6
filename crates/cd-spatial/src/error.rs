use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpatialError {
    /// Grid cell side must be a positive finite length; it bounds the
    /// interaction cutoff, so zero or negative values would silently drop
    /// interacting pairs.
    #[error("grid cell size must be positive and finite, got {0}")]
    InvalidCellSize(f64),

    #[error("positions length {positions} does not match active flags length {active}")]
    LengthMismatch { positions: usize, active: usize },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
