/*!
Type errors reported by the stack-effect checker

Every variant is detected statically, while an operation is applied or a
function is finished.
*/
use thiserror::Error;

use crate::ast::types::{StackType, Type};
use crate::typechecker::environment::FunctionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// An operation needs more values than the stack holds
    #[error("stack underflow in '{word}': requires {required} value(s), {available} available")]
    StackUnderflow {
        word: String,
        required: usize,
        available: usize,
    },

    #[error("type mismatch in {context}: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: Type,
        actual: Type,
        context: String,
    },

    /// A signature mentions a placeholder that nothing binds
    #[error("placeholder {name} is never bound in signature of '{context}'")]
    UnboundGeneric { name: String, context: String },

    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("function '{name}' is already defined")]
    DuplicateFunction { name: String },

    #[error("function '{function}' ends with stack {actual}, but declares {expected}")]
    ReturnTypeMismatch {
        function: String,
        expected: StackType,
        actual: StackType,
    },

    #[error("function '{function}' is already finished")]
    FunctionAlreadyFinished { function: String },

    /// A previous operation on this function failed
    #[error("function '{function}' was rejected by an earlier error")]
    FunctionRejected { function: String },

    #[error("no function with handle {id} in this program")]
    UnknownHandle { id: FunctionId },
}

pub type TypeResult<T> = Result<T, TypeError>;
