use std::fmt;
use thiserror::Error;

/// The section of a WSDL document a dangling reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Message,
    PortTypeOperation,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to parse provided URL")]
    UrlParseError(#[from] url::ParseError),

    #[error("Unable to convert provided path")]
    PathConversionError(Option<std::io::Error>),

    #[error("Unable to read file")]
    FileReadError(#[from] std::io::Error),

    #[error("Unable to get file from server")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Unsupported URL scheme {0}")]
    UnsupportedScheme(String),

    #[error("Error parsing XML input")]
    XmlParseError(#[from] quick_xml::Error),

    #[error("XML input contains no root element")]
    EmptyDocument,

    #[error("No {kind} named {name:?} is declared")]
    MissingReference { kind: ReferenceKind, name: String },

    #[error("No prefix is declared for namespace {namespace:?} (needed by {name:?})")]
    UnresolvedPrefix { namespace: String, name: String },
}

impl Error {
    pub(crate) fn missing(kind: ReferenceKind, name: &str) -> Self {
        Self::MissingReference {
            kind,
            name: name.to_owned(),
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Message => f.write_str("message"),
            ReferenceKind::PortTypeOperation => f.write_str("port type operation"),
        }
    }
}
