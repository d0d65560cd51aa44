use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid value for option `{name}`: {reason}")]
    InvalidOption { name: String, reason: String },

    #[error("unknown chart option: `{0}`")]
    UnknownOption(String),

    #[error("invalid scene: {0}")]
    InvalidScene(String),
}

impl ChartError {
    pub(crate) fn invalid_option(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}
