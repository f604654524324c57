use reflect_types::error::HostError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Cannot convert {passed} to {expected}")]
    Unsupported { expected: String, passed: String },
    #[error("Element {index} is null but {expected} cannot hold null")]
    NullElement { index: usize, expected: String },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvocationError {
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),
    #[error("Instance member {0} requires a receiver")]
    NullReceiver(String),
    #[error("Member has no body: {0}")]
    MissingBody(String),
    #[error("Invocation target failed: {0}")]
    Target(String),
    #[error(transparent)]
    Host(#[from] HostError),
}
