//! Fetch error kinds and the composite error returned by fetches.
//!
//! Fetching is partial by nature: a single property failing to convert, or a single
//! paginated call being refused, must not discard the rest of the graph. Every failure is
//! therefore a [`FetchError`] collected into an [`Error`], which the caller inspects with
//! [`Error::any`] and iterates for display.
//!
//! Provider failures arrive as [`ProviderError`] (an error code plus message, as the AWS
//! SDKs report them) and are classified into internal kinds by [`categorize_provider_error`].

use std::fmt;

use thiserror::Error as ThisError;

/// Canonical text of the access-denied sentinel.
pub const ACCESS_DENIED_MESSAGE: &str = "access denied to cloud resource";

// ============================================================================
// Error kinds
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum FetchError {
    /// A single property failed to convert. Non-fatal.
    #[error("{kind}: property '{property}': {message}")]
    ResourceFetch {
        kind: String,
        property: String,
        message: String,
    },

    /// A provider call failed while paginating. Stops that fetch-func only.
    #[error("{kind}: pagination: {message}")]
    Pagination { kind: String, message: String },

    #[error("access denied to cloud resource")]
    AccessDenied,

    #[error("unknown resource type '{0}'")]
    UnknownResourceType(String),

    /// A cached value was not of the requested shape.
    #[error("cache entry '{key}' is not a {expected}")]
    TypeCast { key: String, expected: String },

    #[error("fetch cancelled")]
    Cancelled,

    #[error("provider: {0}")]
    Provider(String),

    #[error("no fetch func defined for resource type '{0}'")]
    NoFetchFunc(String),

    #[error("resource {kind}[{id}] not found")]
    NotFound { kind: String, id: String },

    /// Sentinel returned by tag extraction; the converter skips the property.
    #[error("tag not found")]
    TagNotFound,

    #[error("{0}")]
    Invalid(String),
}

impl FetchError {
    /// Errors that abort a fetch instead of being aggregated.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FetchError::UnknownResourceType(_) | FetchError::TypeCast { .. } | FetchError::Cancelled
        )
    }

    pub fn resource_fetch(
        kind: impl fmt::Display,
        property: impl Into<String>,
        message: impl fmt::Display,
    ) -> Self {
        FetchError::ResourceFetch {
            kind: kind.to_string(),
            property: property.into(),
            message: message.to_string(),
        }
    }

    pub fn type_cast(key: impl Into<String>, expected: impl Into<String>) -> Self {
        FetchError::TypeCast {
            key: key.into(),
            expected: expected.into(),
        }
    }
}

// ============================================================================
// Composite error
// ============================================================================

/// Aggregated errors of a fetch. Empty means success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Error {
    errors: Vec<FetchError>,
}

impl Error {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, err: impl Into<Error>) {
        self.errors.extend(err.into().errors);
    }

    /// True if at least one error was recorded.
    pub fn any(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FetchError> {
        self.errors.iter()
    }

    pub fn contains(&self, err: &FetchError) -> bool {
        self.errors.iter().any(|e| e == err)
    }

    pub fn first_fatal(&self) -> Option<&FetchError> {
        self.errors.iter().find(|e| e.is_fatal())
    }

    pub fn into_result(self) -> Result<(), Error> {
        if self.any() {
            Err(self)
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for Error {}

impl From<FetchError> for Error {
    fn from(err: FetchError) -> Self {
        Error { errors: vec![err] }
    }
}

impl From<ProviderError> for Error {
    fn from(err: ProviderError) -> Self {
        Error::from(FetchError::from(err))
    }
}

impl FromIterator<FetchError> for Error {
    fn from_iter<I: IntoIterator<Item = FetchError>>(iter: I) -> Self {
        Error {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Error {
    type Item = FetchError;
    type IntoIter = std::vec::IntoIter<FetchError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Error {
    type Item = &'a FetchError;
    type IntoIter = std::slice::Iter<'a, FetchError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

// ============================================================================
// Provider errors
// ============================================================================

/// Error returned by a provider call: the service error code and its message.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("{code}: {message}")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ProviderErrorCategory {
        categorize_provider_error(&self.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorCategory {
    AccessDenied,
    /// The resource vanished between a list call and a describe call.
    NotFound,
    Throttled,
    Other,
}

/// Classify a provider error from its text.
pub fn categorize_provider_error(error_str: &str) -> ProviderErrorCategory {
    if is_access_denied(error_str) {
        return ProviderErrorCategory::AccessDenied;
    }

    if error_str.contains("QueueDoesNotExist")
        || error_str.contains("NonExistentQueue")
        || error_str.contains("NoSuchEntity")
        || error_str.contains("NoSuchBucket")
        || error_str.contains("NotFoundException")
    {
        return ProviderErrorCategory::NotFound;
    }

    if error_str.contains("ThrottlingException")
        || error_str.contains("Throttling")
        || error_str.contains("TooManyRequestsException")
        || error_str.contains("RequestLimitExceeded")
        || error_str.contains("RateExceeded")
    {
        return ProviderErrorCategory::Throttled;
    }

    ProviderErrorCategory::Other
}

/// True when the provider refused the call for lack of permissions.
pub fn is_access_denied(error_str: &str) -> bool {
    lazy_static::lazy_static! {
        static ref FORBIDDEN_STATUS: regex::Regex =
            regex::Regex::new(r"(?i)\b(status code:?\s*403|403 forbidden)\b")
                .expect("valid forbidden status pattern");
    }

    error_str.contains("AccessDenied")
        || error_str.contains("Access Denied")
        || error_str.contains("UnauthorizedOperation")
        || error_str.contains("UnauthorizedAccess")
        || error_str.contains("AuthorizationError")
        || FORBIDDEN_STATUS.is_match(error_str)
}

impl From<ProviderError> for FetchError {
    fn from(err: ProviderError) -> Self {
        match err.category() {
            ProviderErrorCategory::AccessDenied => FetchError::AccessDenied,
            _ => FetchError::Provider(err.to_string()),
        }
    }
}
