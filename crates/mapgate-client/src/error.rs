use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("gateway responded {status}: {message}")]
    Gateway { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected payload: {0}")]
    Parse(String),

    #[error("map script failed to load: {0}")]
    ScriptLoad(String),

    #[error("invalid gateway URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}
