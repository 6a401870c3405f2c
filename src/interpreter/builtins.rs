use std::io::Write;

use super::error::RuntimeError;
use super::value::Value;
use crate::parser::types::Type;

/// The built-in functions registered in the global function table at
/// startup. They can be shadowed by user definitions of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Print,
    String,
    Integer,
    Float,
    Boolean,
}

impl Builtin {
    pub fn all() -> [Builtin; 5] {
        [
            Builtin::Print,
            Builtin::String,
            Builtin::Integer,
            Builtin::Float,
            Builtin::Boolean,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::String => "String",
            Builtin::Integer => "Integer",
            Builtin::Float => "Float",
            Builtin::Boolean => "Boolean",
        }
    }

    pub fn return_type(&self) -> Type {
        match self {
            Builtin::Print => Type::Void,
            Builtin::String => Type::String,
            Builtin::Integer => Type::Integer,
            Builtin::Float => Type::Float,
            Builtin::Boolean => Type::Bool,
        }
    }

    /// Expected argument count; `None` means variadic.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Builtin::Print => None,
            _ => Some(1),
        }
    }

    pub fn call(&self, arguments: &[Value], output: &mut dyn Write) -> Result<Value, RuntimeError> {
        match self {
            Builtin::Print => {
                for argument in arguments {
                    if matches!(argument.type_of(), Type::Func(_)) {
                        return Err(RuntimeError::UnexpectedType {
                            message: "Unsupported argument type Func for print.".into(),
                        });
                    }
                }

                let rendered = arguments
                    .iter()
                    .map(Value::render)
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = writeln!(output, "{rendered}");

                Ok(Value::Null)
            }
            Builtin::String => match &arguments[0] {
                Value::Function(_) => Err(self.argument_type_error(&arguments[0])),
                value => Ok(Value::Str(value.render())),
            },
            Builtin::Integer => match &arguments[0] {
                Value::Int(value) => Ok(Value::Int(*value)),
                Value::Float(value) => Ok(Value::Int(value.trunc() as i64)),
                value => Err(self.argument_type_error(value)),
            },
            Builtin::Float => match &arguments[0] {
                Value::Int(value) => Ok(Value::Float(*value as f64)),
                Value::Float(value) => Ok(Value::Float(*value)),
                value => Err(self.argument_type_error(value)),
            },
            Builtin::Boolean => match &arguments[0] {
                Value::Bool(value) => Ok(Value::Bool(*value)),
                Value::Null => Ok(Value::Bool(false)),
                value => Err(self.argument_type_error(value)),
            },
        }
    }

    fn argument_type_error(&self, value: &Value) -> RuntimeError {
        RuntimeError::ArgumentType {
            function: self.name().to_string(),
            parameter: "x".to_string(),
            expected: self.return_type(),
            actual: value.type_of(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(builtin: Builtin, arguments: &[Value]) -> Result<Value, RuntimeError> {
        let mut sink = Vec::new();
        builtin.call(arguments, &mut sink)
    }

    #[test]
    fn test_print_writes_space_separated_line() {
        let mut sink = Vec::new();
        let arguments = [
            Value::Int(1),
            Value::Str("Hello world".into()),
            Value::Bool(true),
            Value::Bool(false),
            Value::Null,
        ];

        let result = Builtin::Print.call(&arguments, &mut sink);

        assert_eq!(result, Ok(Value::Null));
        assert_eq!(
            String::from_utf8(sink).unwrap(),
            "1 Hello world true false null\n"
        );
    }

    #[test]
    fn test_print_without_arguments_prints_empty_line() {
        let mut sink = Vec::new();
        Builtin::Print.call(&[], &mut sink).unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), "\n");
    }

    #[test]
    fn test_string_conversions() {
        assert_eq!(call(Builtin::String, &[Value::Null]), Ok(Value::Str("null".into())));
        assert_eq!(
            call(Builtin::String, &[Value::Bool(true)]),
            Ok(Value::Str("true".into()))
        );
        assert_eq!(call(Builtin::String, &[Value::Int(1)]), Ok(Value::Str("1".into())));
        assert_eq!(
            call(Builtin::String, &[Value::Float(1.5)]),
            Ok(Value::Str("1.5".into()))
        );
        assert_eq!(
            call(Builtin::String, &[Value::Str("hello!".into())]),
            Ok(Value::Str("hello!".into()))
        );
    }

    #[test]
    fn test_integer_truncates_toward_zero() {
        assert_eq!(call(Builtin::Integer, &[Value::Int(1)]), Ok(Value::Int(1)));
        assert_eq!(call(Builtin::Integer, &[Value::Float(1.2)]), Ok(Value::Int(1)));
        assert_eq!(call(Builtin::Integer, &[Value::Float(2.0)]), Ok(Value::Int(2)));
        assert_eq!(call(Builtin::Integer, &[Value::Float(-1.7)]), Ok(Value::Int(-1)));
    }

    #[test]
    fn test_integer_rejects_other_types() {
        assert!(call(Builtin::Integer, &[Value::Bool(true)]).is_err());
        assert!(call(Builtin::Integer, &[Value::Str("1".into())]).is_err());
        assert!(call(Builtin::Integer, &[Value::Null]).is_err());
    }

    #[test]
    fn test_float_widens_integers() {
        assert_eq!(call(Builtin::Float, &[Value::Int(1)]), Ok(Value::Float(1.0)));
        assert_eq!(call(Builtin::Float, &[Value::Float(2.1)]), Ok(Value::Float(2.1)));
        assert!(call(Builtin::Float, &[Value::Str("2".into())]).is_err());
    }

    #[test]
    fn test_boolean_conversions() {
        assert_eq!(call(Builtin::Boolean, &[Value::Bool(true)]), Ok(Value::Bool(true)));
        assert_eq!(call(Builtin::Boolean, &[Value::Null]), Ok(Value::Bool(false)));
        // numeric and string input stays unsupported
        assert!(call(Builtin::Boolean, &[Value::Int(1)]).is_err());
        assert!(call(Builtin::Boolean, &[Value::Str("".into())]).is_err());
    }
}
