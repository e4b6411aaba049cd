use thiserror::Error;

/// Errors surfaced by the descent simulator and its helpers
#[derive(Error, Debug)]
pub enum PadsError {
    #[error("step called before the first reset")]
    NotReset,

    #[error("action {0} is outside [-1, 1]")]
    ActionOutOfRange(f64),

    #[error("invalid start state: rho={rho}, theta={theta}, z={z}")]
    InvalidStart { rho: f64, theta: f64, z: f64 },

    #[error("cannot build sampling distribution: {0}")]
    Sampling(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown target `{0}`")]
    UnknownTarget(String),

    #[error("unknown policy `{0}` (expected zero, homing or random)")]
    UnknownPolicy(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PadsError>;
