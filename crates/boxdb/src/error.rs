use boxdb_core::error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    /// The builder, query or relation was used after release or before binding.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self.kind, ErrorKind::Closed)
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        let kind = match err.class {
            ErrorClass::InvalidState => ErrorKind::Closed,
            ErrorClass::InvalidArgument => ErrorKind::Query(QueryErrorKind::Invalid),
            ErrorClass::Unsupported => ErrorKind::Query(QueryErrorKind::Unsupported),
            ErrorClass::NotFound => ErrorKind::Query(QueryErrorKind::NotFound),
            ErrorClass::Conflict => ErrorKind::Query(QueryErrorKind::NotUnique),
            ErrorClass::Corruption => ErrorKind::Corrupt,
            ErrorClass::Internal => ErrorKind::Internal,
        };

        Self::new(kind, err.origin.into(), err.message)
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Resource already released or never bound; obtain a new one.
    Closed,

    Query(QueryErrorKind),

    /// Stored data could not be decoded.
    Corrupt,

    /// The caller cannot remediate this.
    Internal,
}

///
/// QueryErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum QueryErrorKind {
    /// Rejected argument (e.g. duplicate values in an `in` list).
    Invalid,

    /// The engine cannot evaluate this operator/operand/property combination.
    Unsupported,

    /// The engine has no entity registered under the requested name.
    NotFound,

    /// A single-result accessor matched more than one row.
    NotUnique,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Builder,
    Engine,
    Model,
    Query,
    Relation,
    Serialize,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Builder => Self::Builder,
            CoreErrorOrigin::Engine => Self::Engine,
            CoreErrorOrigin::Model => Self::Model,
            CoreErrorOrigin::Query => Self::Query,
            CoreErrorOrigin::Relation => Self::Relation,
            CoreErrorOrigin::Serialize => Self::Serialize,
        }
    }
}
