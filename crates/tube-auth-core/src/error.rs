//! Errors raised while classifying a request target.

use thiserror::Error;

/// Failure to turn a matched request target into a [`crate::Route`].
#[derive(Error, Debug)]
pub enum RouteError {
    /// A captured path segment did not percent-decode to valid UTF-8.
    #[error("path segment '{segment}' is not valid percent-encoded UTF-8")]
    Decode {
        /// The raw segment as it appeared in the request target.
        segment: String,
        /// Underlying UTF-8 error.
        #[source]
        source: std::string::FromUtf8Error,
    },
    /// A `%` in a captured path segment was not followed by two hex digits.
    #[error("path segment '{segment}' contains a malformed percent escape")]
    MalformedEscape {
        /// The raw segment as it appeared in the request target.
        segment: String,
    },
}
