use std::error::Error;
use std::fmt::{self, Display};

use super::value::Value;
use crate::parser::types::Type;

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    DivisionByZero,
    UndefinedName {
        name: String,
    },
    NotCallable {
        name: String,
        typ: Type,
    },
    Arguments {
        name: String,
        expected: usize,
        actual: usize,
    },
    ArgumentType {
        function: String,
        parameter: String,
        expected: Type,
        actual: Type,
    },
    RecursionLimit,
    UninitializedConst {
        name: String,
    },
    NotNullable {
        name: String,
    },
    ConstRedeclaration {
        name: String,
    },
    ConstAssignment {
        name: String,
    },
    UnexpectedType {
        message: String,
    },
    ReturnTypeMismatch {
        function: String,
        expected: Type,
        actual: Type,
    },
    TypeMismatch {
        name: String,
        expected: Type,
        actual: Type,
    },
    AssignmentTypeMismatch {
        name: String,
        expected: Type,
        actual: Type,
    },
    ReturnOutsideOfFunction,
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::DivisionByZero => write!(f, "Division by 0 is not allowed!"),
            RuntimeError::UndefinedName { name } => write!(f, "{name} is not defined."),
            RuntimeError::NotCallable { name, typ } => {
                write!(f, "Variable {name} type {typ} is not callable.")
            }
            RuntimeError::Arguments {
                name,
                expected,
                actual,
            } => write!(
                f,
                "{name} takes {expected} arguments but {actual} were given."
            ),
            RuntimeError::ArgumentType {
                function,
                parameter,
                expected,
                actual,
            } => write!(
                f,
                "Parameter {parameter} of function {function} should be type {expected}. Got type {actual} instead."
            ),
            RuntimeError::RecursionLimit => write!(f, "Exceeded recursion limit."),
            RuntimeError::UninitializedConst { name } => write!(
                f,
                "Missing initializer in const declaration of variable {name}."
            ),
            RuntimeError::NotNullable { name } => write!(
                f,
                "Cannot assign null to variable {name} which is not nullable."
            ),
            RuntimeError::ConstRedeclaration { name } => write!(
                f,
                "Cannot redeclare variable {name} because there already exists one, which is a constant."
            ),
            RuntimeError::ConstAssignment { name } => {
                write!(f, "Cannot assign to {name} because it is a constant.")
            }
            RuntimeError::UnexpectedType { message } => f.write_str(message),
            RuntimeError::ReturnTypeMismatch {
                function,
                expected,
                actual,
            } => write!(
                f,
                "Function {function} returned type {actual} but expected type {expected}."
            ),
            RuntimeError::TypeMismatch {
                name,
                expected,
                actual,
            } => write!(
                f,
                "Variable {name} was declared with type {expected} but received type {actual}."
            ),
            RuntimeError::AssignmentTypeMismatch {
                name,
                expected,
                actual,
            } => write!(
                f,
                "Cannot assign type {actual} to variable {name} type {expected}."
            ),
            RuntimeError::ReturnOutsideOfFunction => {
                write!(f, "Return statement is not allowed outside of a function.")
            }
        }
    }
}

impl Error for RuntimeError {}

/// Non-local exit used while walking the tree. `Return` is ordinary control
/// flow caught by the nearest function frame; at the top level it turns into
/// [`RuntimeError::ReturnOutsideOfFunction`].
#[derive(Debug)]
pub enum Unwind {
    Return(Value),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}

pub(crate) type Exec<T> = Result<T, Unwind>;
