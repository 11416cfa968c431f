use thiserror::Error;

/// Result type for ghsearch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Seconds a rate-limited caller is told to wait when upstream sends no `retry-after`
pub const DEFAULT_RETRY_AFTER_SECONDS: u64 = 60;

/// Main error type for ghsearch operations
#[derive(Error, Debug)]
pub enum Error {
    /// Caller-supplied values out of range or shape
    #[error("Invalid search parameters: {}", .0.join("; "))]
    InvalidParameters(Vec<String>),

    /// The query was empty once normalized
    #[error("Search query is required")]
    EmptyQuery,

    /// Network-level failure before any response was obtained
    #[error("Transport unavailable: {0}")]
    TransportUnavailable(String),

    /// Upstream quota exhausted
    #[error("Rate limited: retry after {retry_after_seconds}s")]
    RateLimited {
        retry_after_seconds: u64,
        reset_at_epoch: Option<i64>,
    },

    /// Upstream answered with a non-success status
    #[error("Upstream rejected the request ({status_code}): {message}")]
    UpstreamRejected {
        status_code: u16,
        message: String,
        details: Vec<String>,
    },

    /// Upstream payload failed shape validation
    #[error("Malformed upstream response: {0}")]
    MalformedUpstreamResponse(String),

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any other error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an invalid parameters error from a single problem
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameters(vec![msg.into()])
    }

    /// Creates a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportUnavailable(msg.into())
    }

    /// Creates a malformed response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedUpstreamResponse(msg.into())
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// HTTP-style status code describing this failure
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidParameters(_) | Self::EmptyQuery => 400,
            Self::RateLimited { .. } => 429,
            Self::UpstreamRejected { status_code, .. } => *status_code,
            Self::TransportUnavailable(_) | Self::MalformedUpstreamResponse(_) => 502,
            _ => 500,
        }
    }

    /// Seconds to wait before retrying, when known
    pub fn retry_after_seconds(&self) -> Option<u64> {
        match self {
            Self::RateLimited {
                retry_after_seconds,
                ..
            } => Some(*retry_after_seconds),
            _ => None,
        }
    }

    /// Extra problem descriptions attached to the error
    pub fn details(&self) -> &[String] {
        match self {
            Self::InvalidParameters(details) => details,
            Self::UpstreamRejected { details, .. } => details,
            _ => &[],
        }
    }

    /// Human-readable message suitable for showing to an end user
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidParameters(_) => "Invalid search parameters".to_string(),
            Self::EmptyQuery => "Enter a search query to see repositories.".to_string(),
            Self::TransportUnavailable(_) => "Unable to reach GitHub right now.".to_string(),
            Self::RateLimited {
                retry_after_seconds,
                ..
            } => format!(
                "GitHub rate limit hit. Please retry in {retry_after_seconds}s. \
                 Authenticated requests get a higher allowance; set GITHUB_TOKEN to use one."
            ),
            Self::UpstreamRejected {
                status_code: 403, ..
            } => "GitHub rate limit reached. Try again shortly.".to_string(),
            Self::UpstreamRejected { message, .. } => message.clone(),
            Self::MalformedUpstreamResponse(_) => "Unexpected data from GitHub.".to_string(),
            Self::Io(_) | Self::Config(_) | Self::WithContext { .. } | Self::Other(_) => {
                "Something went wrong while searching.".to_string()
            }
        }
    }

    /// Whether a caller-side retry policy may retry this failure
    ///
    /// Rate limits, 403 rejections and anything caused by the request itself
    /// are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::TransportUnavailable(_) => true,
            Self::UpstreamRejected { status_code, .. } => *status_code != 403,
            _ => false,
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}
