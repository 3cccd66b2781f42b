use thiserror::Error;

/// Reasons a server reply cannot become a [`Question`](crate::question::Question).
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum QuestionError {
    #[error("expected at least 2 options, got {0}")]
    TooFewOptions(usize),
    #[error("option '{0}' appears more than once")]
    DuplicateOption(String),
    #[error("correct answer '{0}' is not one of the options")]
    UnknownAnswer(String),
    #[error("sprite url is empty")]
    EmptySprite,
    #[error("option label is empty")]
    EmptyOption,
}

/// Everything that can go wrong while fetching the next question.
///
/// The user is never shown the distinction between these; they all end in
/// a retry or a page reload. The variant only ends up in the console log.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum FetchError {
    #[error("question service error: {0}")]
    Service(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("malformed reply: {0}")]
    Parse(String),
    #[error("invalid question: {0}")]
    Invalid(#[from] QuestionError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid quiz config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown log level '{0}'")]
    LogLevel(String),
}
