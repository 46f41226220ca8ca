use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the lyric pipeline and the HTTP handlers around it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("File path is required")]
    MissingPath,
    #[error("Title or artist required for online search")]
    MissingSearchParams,
    #[error("Invalid path")]
    InvalidPath,
    #[error("insufficient search parameters")]
    InvalidQuery,
    #[error("Unable to parse form: {0}")]
    MalformedUpload(String),
    #[error("Error retrieving the file")]
    MissingUpload,
    #[error("File not found")]
    NotFound,
    #[error("lyrics service error: {0}")]
    Upstream(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Upstream(err.to_string())
    }
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::MissingPath
            | Error::MissingSearchParams
            | Error::InvalidPath
            | Error::InvalidQuery
            | Error::MalformedUpload(_)
            | Error::MissingUpload => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Upstream(_) => StatusCode::BAD_GATEWAY,
            Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }
        (status, self.to_string()).into_response()
    }
}
