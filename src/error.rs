use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// The backend could not be reached or the pool could not be built.
    Connection(sqlx::Error),
    /// An id does not fit the configured backend key representation.
    Conversion(String),
    /// Any other data-access failure, tagged with the operation that issued it.
    Repository {
        operation: &'static str,
        source: sqlx::Error,
    },
    InvalidInput(String),
    Configuration(String),
    Serialization(serde_json::Error),
}

impl AppError {
    /// Wrap a driver error raised while running `operation`.
    pub fn repository(operation: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
        move |source| AppError::Repository { operation, source }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Connection(e) => write!(f, "Connection error: {}", e),
            AppError::Conversion(e) => write!(f, "Id conversion error: {}", e),
            AppError::Repository { operation, source } => {
                write!(f, "Repository error during {}: {}", operation, source)
            }
            AppError::InvalidInput(e) => write!(f, "Invalid input: {}", e),
            AppError::Configuration(e) => write!(f, "Configuration error: {}", e),
            AppError::Serialization(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Connection(e) => Some(e),
            AppError::Repository { source, .. } => Some(source),
            AppError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err)
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Configuration(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
