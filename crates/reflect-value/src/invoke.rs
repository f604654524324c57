use crate::{error::InvocationError, Argument, Value};
use reflect_types::members::{ConstructorDescription, FieldDescription, MethodDescription};

/// Native invocation facility of a host runtime.
///
/// Arguments arrive already adapted to the member's declared parameter list.
/// Implementations reject arguments their parameters cannot accept with
/// [`InvocationError::IllegalArgument`].
pub trait HostInvoker: Send + Sync {
    fn construct(
        &self,
        constructor: &ConstructorDescription,
        args: &[Argument],
    ) -> Result<Value, InvocationError>;

    /// `receiver` is ignored for static fields.
    fn get_field(
        &self,
        field: &FieldDescription,
        receiver: Option<&Value>,
    ) -> Result<Value, InvocationError>;

    fn set_field(
        &self,
        field: &FieldDescription,
        receiver: Option<&Value>,
        value: Value,
    ) -> Result<(), InvocationError>;

    /// Void methods return [`Value::Null`].
    fn invoke(
        &self,
        method: &MethodDescription,
        receiver: Option<&Value>,
        args: &[Argument],
    ) -> Result<Value, InvocationError>;
}
