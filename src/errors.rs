//! Crate-level errors for loading, saving, and updating record books.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArbError {
    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("missing required element: {0}")]
    MissingElement(String),

    #[error("element '{element}' is missing required attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    #[error("element '{element}' has invalid attribute '{attribute}': {message}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        message: String,
    },

    #[error("document contains more than one configuration section")]
    DuplicateConfig,

    #[error("document contains no configuration section")]
    MissingConfig,

    #[error("unknown document version: {0}")]
    UnknownDocVersion(String),

    #[error("document version {0} is newer than this program supports")]
    FutureDocVersion(String),

    #[error("operation aborted")]
    Aborted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ArbResult<T> = Result<T, ArbError>;

impl ArbError {
    pub fn missing(element: &str, attribute: &str) -> Self {
        ArbError::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub fn invalid(element: &str, attribute: &str, message: impl Into<String>) -> Self {
        ArbError::InvalidAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
            message: message.into(),
        }
    }

    /// Invalid-attribute error with the "must be 'y' or 'n'" hint.
    pub fn invalid_bool(element: &str, attribute: &str) -> Self {
        Self::invalid(element, attribute, "must be 'y' or 'n'")
    }

    pub fn invalid_date(element: &str, attribute: &str, raw: &str) -> Self {
        Self::invalid(element, attribute, format!("invalid date: {raw}"))
    }
}
