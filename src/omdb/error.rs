//! Errors from the OMDb layer.
//!
//! OMDb reports "no results" and "invalid key" inside a 200 response
//! (`{"Response":"False","Error":"..."}`). Those are kept apart from
//! network and HTTP failures because the search view treats them
//! differently: an in-band error clears the result cache, a transport
//! error leaves it on screen.

/// Message shown for every transport-level failure
pub const GENERIC_FETCH_ERROR: &str = "Error fetching data";

/// Errors from a single OMDb request.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// OMDb returned a non-2xx status code.
    #[error("OMDb returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body was not the JSON shape we expected.
    #[error("Could not decode OMDb response: {0}")]
    Decode(#[from] serde_json::Error),

    /// OMDb answered with `Response: "False"`.
    #[error("{0}")]
    Api(String),
}

impl FetchError {
    /// True for every failure that is not an in-band API error
    pub fn is_transport(&self) -> bool {
        !matches!(self, FetchError::Api(_))
    }
}

/// Cloneable summary of a [`FetchError`], carried in UI messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Network, status or decode failure; the string is for logs only
    Transport(String),
    /// OMDb's own error text, shown verbatim
    Api(String),
}

impl Failure {
    /// Text to put in front of the user
    pub fn user_message(&self) -> &str {
        match self {
            Failure::Transport(_) => GENERIC_FETCH_ERROR,
            Failure::Api(message) => message,
        }
    }
}

impl From<FetchError> for Failure {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Api(message) => Failure::Api(message),
            other => Failure::Transport(other.to_string()),
        }
    }
}
