use reflect_types::{
    error::HostError,
    members::{MemberKind, Signature},
    TypeDescriptor, TypeName,
};
use reflect_value::{Argument, ConversionError, InvocationError, Value};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReflectError {
    #[error("No such {kind}: {}", render_request(.kind, .owner, .signature))]
    NoSuchMember {
        kind: MemberKind,
        owner: TypeName,
        signature: Signature,
    },
    #[error(
        "The passed arguments [{}] do not match the parameter types [{}]: {cause}",
        join(.arguments),
        join(.parameters)
    )]
    AmbiguousArguments {
        arguments: Vec<Argument>,
        parameters: Vec<TypeDescriptor>,
        cause: String,
    },
    #[error("Unsupported conversion of {passed} to {expected}")]
    UnsupportedConversion { expected: String, passed: String },
    #[error("Element {index} is null and cannot be unboxed to {expected}")]
    NullElementForPrimitive { index: usize, expected: String },
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Cannot cast value {value} of {member} to {expected}")]
    IncompatibleValue {
        member: String,
        expected: TypeDescriptor,
        value: Value,
    },
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    Invocation(#[from] InvocationError),
}

impl From<ConversionError> for ReflectError {
    fn from(value: ConversionError) -> Self {
        match value {
            ConversionError::Unsupported { expected, passed } => {
                ReflectError::UnsupportedConversion { expected, passed }
            }
            ConversionError::NullElement { index, expected } => {
                ReflectError::NullElementForPrimitive { index, expected }
            }
        }
    }
}

fn render_request(kind: &MemberKind, owner: &TypeName, signature: &Signature) -> String {
    signature.render(owner, *kind)
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
