use thiserror::Error;

// Each error type must have a corresponding HTTP status code (see `routes/mod.rs`)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrlError {
    // The configured key material source is absent, empty or unusable
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // Malformed PEM/ASN.1 material, or key material that is not RSA
    #[error("Key format error: {0}")]
    KeyFormatError(String),

    // A key version identifier with no matching key in the store
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    // Cryptographic failure while signing a token
    #[error("Signing error: {0}")]
    SigningError(String),

    // Any token validation failure; kept coarse towards clients
    #[error("Access denied: {0}")]
    Unauthorized(String),

    // Missing or malformed arguments in the request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // When a user requests an item which does not exist
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    // Any errors related to a bad behavior of the server but not related to the user input
    #[error("Unexpected server error: {0}")]
    ServerError(String),
}

impl TrlError {
    /// The message shown to clients. 4xx errors carry their inner message;
    /// 5xx errors are collapsed to a generic one so internals never leak.
    #[must_use]
    pub(crate) fn client_message(&self) -> String {
        match self {
            Self::Unauthorized(m) | Self::InvalidRequest(m) | Self::ItemNotFound(m) => m.clone(),
            Self::ConfigurationError(m) => format!("server configuration error: {m}"),
            Self::KeyFormatError(_)
            | Self::KeyNotFound(_)
            | Self::SigningError(_)
            | Self::ServerError(_) => "internal server error".to_owned(),
        }
    }
}

impl From<bcrypt::BcryptError> for TrlError {
    fn from(e: bcrypt::BcryptError) -> Self {
        Self::ServerError(e.to_string())
    }
}

impl From<serde_json::Error> for TrlError {
    fn from(e: serde_json::Error) -> Self {
        Self::ServerError(e.to_string())
    }
}

/// Return early with an error if a condition is not satisfied.
///
/// This macro is equivalent to `if !$cond { return Err(From::from($err)); }`.
#[macro_export]
macro_rules! trl_ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($crate::trl_error!($msg));
        }
    };
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return ::core::result::Result::Err($crate::trl_error!($fmt, $($arg)*));
        }
    };
}

/// Construct a server error from a string.
#[macro_export]
macro_rules! trl_error {
    ($msg:literal) => {
        $crate::error::TrlError::ServerError(::core::format_args!($msg).to_string())
    };
    ($err:expr $(,)?) => ({
        $crate::error::TrlError::ServerError($err.to_string())
    });
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::TrlError::ServerError(::core::format_args!($fmt, $($arg)*).to_string())
    };
}

/// Return early with an error if a condition is not satisfied.
#[macro_export]
macro_rules! trl_bail {
    ($msg:literal) => {
        return ::core::result::Result::Err($crate::trl_error!($msg))
    };
    ($err:expr $(,)?) => {
        return ::core::result::Result::Err($err)
    };
    ($fmt:expr, $($arg:tt)*) => {
        return ::core::result::Result::Err($crate::trl_error!($fmt, $($arg)*))
    };
}

#[allow(clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::TrlError;

    #[test]
    fn test_trl_error_interpolation() {
        let var = 42;
        let err = trl_error!("interpolate {var}");
        assert_eq!("Unexpected server error: interpolate 42", err.to_string());

        let err = bail();
        err.expect_err("Unexpected server error: interpolate 43");

        let err = ensure();
        err.expect_err("Unexpected server error: interpolate 44");
    }

    fn bail() -> Result<(), TrlError> {
        let var = 43;
        if true {
            trl_bail!("interpolate {var}");
        }
        Ok(())
    }

    fn ensure() -> Result<(), TrlError> {
        let var = 44;
        trl_ensure!(false, "interpolate {var}");
        Ok(())
    }

    #[test]
    fn test_client_message_hides_internals() {
        let err = TrlError::SigningError("RSA blinding failed".to_owned());
        assert_eq!(err.client_message(), "internal server error");

        let err = TrlError::Unauthorized("invalid credentials".to_owned());
        assert_eq!(err.client_message(), "invalid credentials");
    }
}
