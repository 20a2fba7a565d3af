use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("num_issues ({num_issues}) cannot be greater than num_events ({num_events})")]
    TooManyIssues {
        num_issues: usize,
        num_events: usize,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
