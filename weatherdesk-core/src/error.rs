use thiserror::Error;

/// Everything that can go wrong during a single lookup.
///
/// All variants are terminal for that search; the resolver never retries and
/// never panics past its boundary. The GUI collapses all of them into one
/// "Error" display state, so the variant mostly matters for the log.
///
/// `Clone` because the GUI carries the result inside its message enum.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Geocoding produced no usable candidate for the query.
    #[error("location not found: {0:?}")]
    LocationNotFound(String),

    /// The forecast endpoint answered, but not with a usable forecast.
    #[error("forecast unavailable: {0}")]
    ForecastUnavailable(String),

    /// The selected forecast entry is missing one of the required fields.
    #[error("forecast entry is missing required fields")]
    MalformedForecast,

    /// A request exceeded the configured timeout.
    #[error("request timed out")]
    NetworkTimeout,

    /// Transport-level failure: DNS, refused connection, broken stream.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ResolveError {
    /// Map a transport error from the HTTP client to the taxonomy.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ResolveError::NetworkTimeout
        } else {
            ResolveError::NetworkError(err.to_string())
        }
    }
}
