use thiserror::Error;

#[derive(Error, Debug)]
pub enum MiseryError {
    #[error("invalid parameter '{0}'")]
    Param(&'static str),

    #[error("no equilibrium speed for slope {slope} with wind {wind} km/h")]
    NoEquilibrium { slope: f64, wind: f64 },

    #[error("empty misery table")]
    EmptyTable,

    #[error("misery table slopes must be increasing")]
    Unsorted,

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
