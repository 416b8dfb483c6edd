use tempo_core::error::CoreError;

/// Errors from the client runtime.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A reducer guard or other domain rule rejected the operation.
    #[error("{0}")]
    Core(#[from] CoreError),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("server error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The server's `error` message, or the raw body when unparseable.
        message: String,
    },

    /// Reading or writing the local state file failed.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl ClientError {
    /// Whether the error means the server was unreachable, as opposed to
    /// having rejected the request. Transport failures are the only case
    /// where a finish may fall back to the local reducer.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}
