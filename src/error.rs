use thiserror::Error;

/// A utility or variant was registered under a name the candidate grammar can
/// never produce. Raised while the design system is built, never during
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error(
        "`{name}` is not a valid utility name; utilities start with a lowercase letter and contain only letters, digits, `/`, `%`, `.`, `_` and `-`"
    )]
    InvalidUtilityName { name: String },
    #[error(
        "`{name}` is not a valid variant name; variants start with a lowercase letter, a digit or `@` and contain only letters, digits, `_` and `-`"
    )]
    InvalidVariantName { name: String },
    #[error("`{prefix}` is not a valid prefix; prefixes contain only lowercase letters")]
    InvalidPrefix { prefix: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConfigError {
    pub message: String,
}

impl From<RegistrationError> for ConfigError {
    fn from(err: RegistrationError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}
