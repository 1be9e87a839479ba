/// Errors from the external lookup services.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Lookup API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The trailer search has no API key configured.
    #[error("No API key configured")]
    MissingApiKey,

    /// The service answered but had no record for the identifier.
    #[error("Not found: {0}")]
    NotFound(String),
}
