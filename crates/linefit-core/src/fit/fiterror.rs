#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("cannot evaluate cost on an empty dataset")]
    EmptyDataset,
    #[error("learning rate must be positive and finite, got {0}")]
    InvalidLearningRate(f64),
    #[error("x and y have different lengths: {len_x} vs {len_y}")]
    LengthMismatch { len_x: usize, len_y: usize },
    #[error("degenerate x: no variance in x")]
    DegenerateX,
}

pub type FitResult<T> = Result<T, FitError>;
