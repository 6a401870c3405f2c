use std::rc::Rc;

use super::builtins::Builtin;
use crate::parser::ast::{FunctionDefinition, LambdaExpression, Literal, LiteralValue};
use crate::parser::types::{FuncType, Type};

/// A runtime value. Function values reference their definition; everything
/// else is stored by value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Null,
    Function(FunctionObject),
}

impl Value {
    pub fn type_of(&self) -> Type {
        match self {
            Value::Int(_) => Type::Integer,
            Value::Float(_) => Type::Float,
            Value::Str(_) => Type::String,
            Value::Bool(_) => Type::Bool,
            Value::Null => Type::Null,
            Value::Function(object) => object.func_type(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Rendering used by `print` and the `String` builtin. Floats always
    /// keep their decimal point (`3.0`, not `3`).
    pub fn render(&self) -> String {
        match self {
            Value::Int(value) => value.to_string(),
            Value::Float(value) => format!("{value:?}"),
            Value::Str(value) => value.clone(),
            Value::Bool(true) => "true".into(),
            Value::Bool(false) => "false".into(),
            Value::Null => "null".into(),
            Value::Function(object) => format!("<function {}>", object.name()),
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match &literal.value {
            LiteralValue::Int(value) => Value::Int(*value),
            LiteralValue::Float(value) => Value::Float(*value),
            LiteralValue::Str(value) => Value::Str(value.clone()),
            LiteralValue::Bool(value) => Value::Bool(*value),
            LiteralValue::Null => Value::Null,
        }
    }
}

/// A callable stored in the function table or flowing around as a value.
#[derive(Debug, Clone)]
pub enum FunctionObject {
    Defined(Rc<FunctionDefinition>),
    Lambda(Rc<LambdaExpression>),
    Builtin(Builtin),
}

impl FunctionObject {
    pub fn name(&self) -> &str {
        match self {
            FunctionObject::Defined(def) => &def.name,
            FunctionObject::Lambda(_) => "<lambda>",
            FunctionObject::Builtin(builtin) => builtin.name(),
        }
    }

    pub fn func_type(&self) -> Type {
        match self {
            FunctionObject::Defined(def) => def.func_type(),
            FunctionObject::Lambda(lambda) => lambda.func_type(),
            FunctionObject::Builtin(builtin) => {
                Type::Func(FuncType::new(vec![], builtin.return_type()))
            }
        }
    }

    pub fn return_type(&self) -> Type {
        match self {
            FunctionObject::Defined(def) => def.return_type.clone(),
            FunctionObject::Lambda(lambda) => lambda.return_type.clone(),
            FunctionObject::Builtin(builtin) => builtin.return_type(),
        }
    }
}

impl PartialEq for FunctionObject {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FunctionObject::Defined(left), FunctionObject::Defined(right)) => {
                Rc::ptr_eq(left, right)
            }
            (FunctionObject::Lambda(left), FunctionObject::Lambda(right)) => Rc::ptr_eq(left, right),
            (FunctionObject::Builtin(left), FunctionObject::Builtin(right)) => left == right,
            _ => false,
        }
    }
}

/// A binding in a scope. Every reachable variable holds a value; explicitly
/// uninitialized nullable bindings hold null.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub typ: Type,
    pub nullable: bool,
    pub mutable: bool,
    pub value: Value,
}
