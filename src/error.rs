use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type TokenReaderResult<T> = std::result::Result<T, TokenReaderError>;

/// Errors surfaced by the client.
///
/// Display strings are diagnostics for the embedding application to log or
/// translate; they are not stable across versions.
#[derive(Error, Debug)]
pub enum Error {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error("handshake failed: {0}")]
    Handshake(String),
    #[error("token acquisition failed: {0}")]
    TokenReader(#[from] TokenReaderError),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone)]
pub enum TokenReaderError {
    #[error("response has malformed format: not found {0} in {1}")]
    TokenKeyNotFound(&'static str, String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}
