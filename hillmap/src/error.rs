use dem::DemError;
use misery::MiseryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HillmapError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("invalid distance limit {0}")]
    DistLimit(f64),

    #[error("line has {0} points, need at least 2")]
    Line(usize),

    #[error("invalid resolution {0}")]
    Resolution(f64),

    #[error("invalid blur radius {0}")]
    Blur(f64),

    #[error("{0}")]
    Dem(#[from] DemError),

    #[error("{0}")]
    Misery(#[from] MiseryError),
}
