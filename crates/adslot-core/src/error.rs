use derive_more::Display;
use thiserror::Error as ThisError;

///
/// Error
///
/// Structured error returned by the public adslot API.
///
/// This error:
/// - never reaches the page shell as a crash; callers log it and render nothing
/// - is NOT stable across versions
/// - carries a class (which layer rejected the call) and an origin (which
///   collaborator or subsystem the failure came from)
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct Error {
    class: ErrorClass,
    origin: ErrorOrigin,
    message: String,
}

impl Error {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    pub fn domain(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Domain, origin, message)
    }

    pub fn invariant(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Invariant, origin, message)
    }

    pub fn infra(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Infra, origin, message)
    }

    pub fn ops(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Ops, origin, message)
    }

    pub fn workflow(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Workflow, origin, message)
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        self.class
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        self.origin
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn log_fields(&self) -> (ErrorClass, ErrorOrigin) {
        (self.class, self.origin)
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ErrorClass {
    Domain,
    Infra,
    Ops,
    Workflow,
    Invariant,
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ErrorOrigin {
    Cmp,
    Config,
    Domain,
    Host,
    Registry,
    Sdk,
    Workflow,
}
