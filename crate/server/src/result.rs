use crate::error::TrlError;

pub type TrlResult<R> = Result<R, TrlError>;

/// A helper trait for `TrlResult` that provides additional methods for error handling.
pub trait TrlResultHelper<T> {
    /// Sets the context for the error.
    ///
    /// # Errors
    ///
    /// Returns a `TrlResult` with the specified context if the original result is an error.
    fn context(self, context: &str) -> TrlResult<T>;

    /// Sets the context for the error using a closure.
    ///
    /// # Errors
    ///
    /// Returns a `TrlResult` with the context returned by the closure if the original result is an error.
    fn with_context<O>(self, op: O) -> TrlResult<T>
    where
        O: FnOnce() -> String;
}

impl<T, E> TrlResultHelper<T> for Result<T, E>
where
    E: std::error::Error,
{
    fn context(self, context: &str) -> TrlResult<T> {
        self.map_err(|e| TrlError::ServerError(format!("{context}: {e}")))
    }

    fn with_context<O>(self, op: O) -> TrlResult<T>
    where
        O: FnOnce() -> String,
    {
        self.map_err(|e| TrlError::ServerError(format!("{}: {e}", op())))
    }
}

impl<T> TrlResultHelper<T> for Option<T> {
    fn context(self, context: &str) -> TrlResult<T> {
        self.ok_or_else(|| TrlError::ServerError(context.to_owned()))
    }

    fn with_context<O>(self, op: O) -> TrlResult<T>
    where
        O: FnOnce() -> String,
    {
        self.ok_or_else(|| TrlError::ServerError(op()))
    }
}
