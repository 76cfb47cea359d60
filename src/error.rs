use thiserror::Error;

/// Errors that abort a run before any output is written.
#[derive(Error, Debug)]
pub enum RegroupError {
    #[error("{0} is not set")]
    MissingEnv(&'static str),

    #[error("Invalid CHANNEL_GROUPS format: {0}")]
    InvalidGroups(String),

    #[error("Invalid channel overrides: {0}")]
    InvalidOverrides(String),

    #[error("Invalid SOURCE_URL: {0}")]
    InvalidSourceUrl(#[from] url::ParseError),

    #[error("Error fetching playlist: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Error fetching playlist: {url} returned {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RegroupError {
    /// True for errors caused by missing or malformed configuration.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            RegroupError::MissingEnv(_)
                | RegroupError::InvalidGroups(_)
                | RegroupError::InvalidOverrides(_)
                | RegroupError::InvalidSourceUrl(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RegroupError>;
