//! Error types for the row engine
//!
//! Every fallible operation returns [`Result`]. Variants map onto the
//! failure conditions callers branch on:
//!
//! | Kind | Raised when |
//! |------|-------------|
//! | InvalidArgument | empty identifier, bad bulk length, "no value" into a value-kind column |
//! | NotFound | column, table or relation does not belong to the container |
//! | VersionNotFound | a read targets a slot the row does not currently hold |
//! | IllegalStateTransition | lifecycle operation not valid in the row's state |
//! | ConstraintViolation | unique, not-null or referential rule broken |
//! | RelationMismatch | relation used with tables it does not connect |
//!
//! `DeletedRowInaccessible` is its own variant but reports the
//! IllegalStateTransition kind.

use crate::constraint::Violation;
use crate::row_state::{RowAction, RowState, RowVersion};
use thiserror::Error;

/// Result type alias for row engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Row engine error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Argument rejected before anything was mutated
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Column, table, row or relation not found in its container
    #[error("not found: {0}")]
    NotFound(String),

    /// The requested version slot is absent for this row
    #[error("there is no {version} data to access")]
    VersionNotFound {
        /// Version that was requested
        version: RowVersion,
    },

    /// Lifecycle action not valid in the row's current state
    #[error("illegal state transition: cannot {action} a row in state {from}")]
    IllegalStateTransition {
        /// State the row was in
        from: RowState,
        /// Action that was attempted
        action: RowAction,
    },

    /// Edit or delete attempted on a deleted row
    #[error("deleted row information cannot be accessed through the row")]
    DeletedRowInaccessible,

    /// One or more constraints failed
    #[error("constraint violation: {message}")]
    ConstraintViolation {
        /// Summary message
        message: String,
        /// Every violation found; offending rows are already annotated
        violations: Vec<Violation>,
    },

    /// Relation does not connect the tables it was used with
    #[error("relation mismatch: {0}")]
    RelationMismatch(String),
}

/// Coarse classification of [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::InvalidArgument`]
    InvalidArgument,
    /// See [`Error::NotFound`]
    NotFound,
    /// See [`Error::VersionNotFound`]
    VersionNotFound,
    /// See [`Error::IllegalStateTransition`] and [`Error::DeletedRowInaccessible`]
    IllegalStateTransition,
    /// See [`Error::ConstraintViolation`]
    ConstraintViolation,
    /// See [`Error::RelationMismatch`]
    RelationMismatch,
}

impl Error {
    /// Build a constraint violation error from collected violations
    ///
    /// A single violation reuses its own message; several are summarized.
    pub fn constraint(violations: Vec<Violation>) -> Self {
        let message = match violations.as_slice() {
            [only] => only.message.clone(),
            many => format!(
                "failed to enable constraints: {} row(s) contain null, non-unique or foreign-key violations",
                many.len()
            ),
        };
        Error::ConstraintViolation {
            message,
            violations,
        }
    }

    /// Classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::VersionNotFound { .. } => ErrorKind::VersionNotFound,
            Error::IllegalStateTransition { .. } | Error::DeletedRowInaccessible => {
                ErrorKind::IllegalStateTransition
            }
            Error::ConstraintViolation { .. } => ErrorKind::ConstraintViolation,
            Error::RelationMismatch(_) => ErrorKind::RelationMismatch,
        }
    }

    /// Check if this is an invalid-argument error
    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Check if this is a version-not-found error
    pub fn is_version_not_found(&self) -> bool {
        self.kind() == ErrorKind::VersionNotFound
    }

    /// Check if this is an illegal-state-transition error (deleted rows included)
    pub fn is_illegal_state_transition(&self) -> bool {
        self.kind() == ErrorKind::IllegalStateTransition
    }

    /// Check if this is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        self.kind() == ErrorKind::ConstraintViolation
    }

    /// Check if this is a relation mismatch
    pub fn is_relation_mismatch(&self) -> bool {
        self.kind() == ErrorKind::RelationMismatch
    }

    /// Violations carried by a constraint error, empty otherwise
    pub fn violations(&self) -> &[Violation] {
        match self {
            Error::ConstraintViolation { violations, .. } => violations,
            _ => &[],
        }
    }
}
