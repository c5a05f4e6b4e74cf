use std::fmt;

/// Error kinds raised by the IBAN codec.
///
/// Generation failures are never retried: a [`IbanError::Generation`] points at
/// a broken specification table or assembler, not at a transient condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IbanError {
    /// No specification or assembler is registered for the country.
    CountryNotSupported {
        country: String,
    },

    /// Malformed input to a validation-sensitive function.
    Validation {
        message: String,
    },

    /// An internal invariant broke while assembling an IBAN.
    Generation {
        message: String,
        /// Country being generated, when known.
        country: Option<String>,
    },

    /// A caller passed an argument outside the accepted domain
    /// (e.g. an unknown character type).
    InvalidArgument {
        message: String,
    },

    /// The strong random source could not be used.
    EnvironmentUnsupported {
        detail: String,
    },

    /// A configuration document could not be read or is inconsistent.
    Config {
        detail: String,
    },

    /// Rendering an export document failed.
    Export {
        detail: String,
    },
}

impl IbanError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn generation(message: impl Into<String>, country: &str) -> Self {
        Self::Generation {
            message: message.into(),
            country: Some(country.to_string()),
        }
    }

    /// Stable machine-readable identifier of the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CountryNotSupported { .. } => "COUNTRY_NOT_SUPPORTED",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Generation { .. } => "GENERATION_ERROR",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::EnvironmentUnsupported { .. } => "ENVIRONMENT_UNSUPPORTED",
            Self::Config { .. } => "CONFIG_ERROR",
            Self::Export { .. } => "EXPORT_ERROR",
        }
    }
}

impl fmt::Display for IbanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CountryNotSupported { country } => {
                write!(f, "IBAN specification not found for country: {country}")
            }
            Self::Validation { message } => f.write_str(message),
            Self::Generation {
                message,
                country: Some(country),
            } => write!(f, "{message} for country {country}"),
            Self::Generation {
                message,
                country: None,
            } => f.write_str(message),
            Self::InvalidArgument { message } => write!(f, "invalid argument: {message}"),
            Self::EnvironmentUnsupported { detail } => write!(
                f,
                "secure random source unavailable: {detail}"
            ),
            Self::Config { detail } => write!(f, "configuration error: {detail}"),
            Self::Export { detail } => write!(f, "export failed: {detail}"),
        }
    }
}

impl std::error::Error for IbanError {}
