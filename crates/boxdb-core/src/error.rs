use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Every fallible boxdb-core call returns this type; the façade crate maps it
/// onto its public taxonomy.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// A condition builder was used after `build` or `close` released its handle.
    pub(crate) fn builder_closed(entity_name: &str) -> Self {
        Self::new(
            ErrorClass::InvalidState,
            ErrorOrigin::Builder,
            format!(
                "query builder for '{entity_name}' has already been closed; use a new instance"
            ),
        )
    }

    /// A compiled query was executed after `close` released its handle.
    pub(crate) fn query_closed(entity_name: &str) -> Self {
        Self::new(
            ErrorClass::InvalidState,
            ErrorOrigin::Query,
            format!("query for '{entity_name}' has already been closed"),
        )
    }

    /// A relation proxy was resolved before being bound to a store.
    pub(crate) fn relation_unbound(target: &str) -> Self {
        Self::new(
            ErrorClass::InvalidState,
            ErrorOrigin::Relation,
            format!("relation to '{target}' is not attached to a store"),
        )
    }

    /// A to-one relation was pointed at a target that has no primary key yet.
    pub(crate) fn relation_unsaved_target(target: &str) -> Self {
        Self::new(
            ErrorClass::InvalidArgument,
            ErrorOrigin::Relation,
            format!("cannot reference an unsaved '{target}'; put it first"),
        )
    }

    /// A single-result accessor matched more than one row.
    pub(crate) fn not_unique(entity_name: &str, matched: usize) -> Self {
        Self::new(
            ErrorClass::Conflict,
            ErrorOrigin::Query,
            format!("unique query for '{entity_name}' matched {matched} rows"),
        )
    }

    /// Construct a builder-origin argument error.
    pub(crate) fn builder_argument(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvalidArgument,
            ErrorOrigin::Builder,
            message.into(),
        )
    }

    /// Construct a model-origin invariant error.
    pub(crate) fn model_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Model, message.into())
    }

    /// Construct an engine-origin unsupported error.
    pub(crate) fn engine_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Engine, message.into())
    }

    /// Construct an engine-origin invalid-state error (stale or foreign handle).
    pub(crate) fn engine_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::NotFound, ErrorOrigin::Engine, message.into())
    }

    pub(crate) fn engine_invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvalidState, ErrorOrigin::Engine, message.into())
    }

    /// Construct an engine-origin internal error.
    pub(crate) fn engine_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Engine, message.into())
    }

    /// Construct a serialize-origin corruption error.
    pub(crate) fn serialize_corruption(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::Corruption,
            ErrorOrigin::Serialize,
            message.into(),
        )
    }

    /// Construct a serialize-origin internal error.
    pub(crate) fn serialize_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Serialize, message.into())
    }

    #[must_use]
    pub fn is_invalid_state(&self) -> bool {
        self.class == ErrorClass::InvalidState
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.class == ErrorClass::NotFound
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.class == ErrorClass::Conflict
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    InvalidState,
    InvalidArgument,
    NotFound,
    Conflict,
    Unsupported,
    Corruption,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidState => "invalid_state",
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Unsupported => "unsupported",
            Self::Corruption => "corruption",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Which layer raised the error.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Model,
    Builder,
    Query,
    Relation,
    Engine,
    Serialize,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Model => "model",
            Self::Builder => "builder",
            Self::Query => "query",
            Self::Relation => "relation",
            Self::Engine => "engine",
            Self::Serialize => "serialize",
        };
        write!(f, "{label}")
    }
}
