use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// The closed set of types known to the interpreter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Type {
    Integer,
    Float,
    Bool,
    String,
    Null,
    Void,
    Func(FuncType),
}

/// A first class function type. Only positional parameter types and the
/// return type take part in its identity; parameter nullability does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncType {
    pub params: Vec<Type>,
    pub return_type: Box<Type>,
}

impl FuncType {
    pub fn new(params: Vec<Type>, return_type: Type) -> Self {
        Self {
            params,
            return_type: Box::new(return_type),
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Func(left), Type::Func(right)) => left == right,
            // a function declared to return void may fill a nullable binding
            (Type::Null | Type::Void, Type::Null | Type::Void) => true,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Eq for Type {}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Integer => "Integer",
            Type::Float => "Float",
            Type::Bool => "Bool",
            Type::String => "String",
            Type::Null => "Null",
            Type::Void => "Void",
            Type::Func(_) => "Func",
        };

        f.write_str(name)
    }
}
