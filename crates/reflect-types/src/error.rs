use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HostError {
    #[error("Type not found: {0}")]
    TypeNotFound(String),
    #[error("Invalid type descriptor: {0}")]
    InvalidType(String),
    #[error("Duplicate type definition: {0}")]
    DuplicateType(String),
    #[error("Invalid member: {0}")]
    InvalidMember(String),
}
