use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeatscanError {
    #[error(
        "GitHub personal access token is missing. Set the GITHUB_PERSONAL_ACCESS_TOKEN environment variable."
    )]
    MissingCredential,

    #[error("Invalid GitHub personal access token: {0}")]
    InvalidCredential(String),

    #[error("Failed to validate GitHub personal access token: {0}")]
    CredentialCheckFailed(String),

    #[error("GitHub client error: {0}")]
    GitHub(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, SeatscanError>;
