//! Result extension trait for logging errors with context.
//!
//! This module provides a `ResultExt` trait that adds a `log` method
//! to `Result` types for automatic error logging with context.

use std::fmt::Display;
use tracing::error;

/// Extension trait for logging errors with context.
///
/// This trait adds a `log` method to `Result` types that logs
/// errors with the provided context message and source location.
pub trait ResultExt<T, E> {
    /// Log the error with context if this is an `Err` variant.
    ///
    /// # Arguments
    ///
    /// * `context` - A context message to include in the log
    ///
    /// # Returns
    ///
    /// The original `Result` unchanged.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use medibuddy_server::result_ext::ResultExt;
    ///
    /// let pool = create_pool(&db_config).await.log("connecting to postgres")?;
    /// ```
    fn log<S: ToString>(self, context: S) -> Result<T, E>;
}

impl<T, E: Display> ResultExt<T, E> for Result<T, E> {
    #[track_caller]
    fn log<S: ToString>(self, context: S) -> Result<T, E> {
        if let Err(ref e) = self {
            let caller_location = std::panic::Location::caller();
            error!(
                target: "medibuddy_server",
                error = %e,
                file = %format!("{}:{}", caller_location.file(), caller_location.line()),
                context = %context.to_string(),
                "Operation failed"
            );
        }
        self
    }
}

/// Extension trait for logging errors with context, returning Option.
pub trait OptionResultExt<T> {
    /// Log if this is a `None` variant.
    ///
    /// # Arguments
    ///
    /// * `context` - A context message to include in the log
    ///
    /// # Returns
    ///
    /// The original `Option` unchanged.
    fn log_none<S: ToString>(self, context: S) -> Option<T>;
}

impl<T> OptionResultExt<T> for Option<T> {
    #[track_caller]
    fn log_none<S: ToString>(self, context: S) -> Option<T> {
        if self.is_none() {
            let caller_location = std::panic::Location::caller();
            tracing::warn!(
                target: "medibuddy_server",
                file = %format!("{}:{}", caller_location.file(), caller_location.line()),
                context = %context.to_string(),
                "Expected value was None"
            );
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_ext_passes_ok_through() {
        let result: Result<u16, &str> = Ok(8080);
        assert_eq!(result.log("binding listener").unwrap(), 8080);
    }

    #[test]
    fn test_result_ext_keeps_error() {
        let result: Result<u16, String> = Err("address in use".to_string());
        let logged = result.log("binding listener");
        assert_eq!(logged.unwrap_err(), "address in use");
    }

    #[test]
    fn test_option_ext_some() {
        let header: Option<&str> = Some("Bearer abc");
        assert_eq!(header.log_none("authorization header"), Some("Bearer abc"));
    }

    #[test]
    fn test_option_ext_none() {
        let header: Option<&str> = None;
        assert!(header.log_none("authorization header").is_none());
    }
}
