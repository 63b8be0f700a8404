/// Domain-specific error types for the payoff tool.
/// Malformed console input never reaches this type; the prompt loop
/// recovers from it locally. Everything here is fatal to the run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("input closed: {0}")]
    InputClosed(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
