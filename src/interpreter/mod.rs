//! Tree-walking evaluator.
//!
//! The interpreter walks the parsed program with an exhaustive match per
//! node kind, mutating a single [`Environment`]. All type, mutability, and
//! nullability rules are enforced at runtime. `return` travels as
//! [`Unwind::Return`] through the ordinary `Result` plumbing and is caught
//! by the nearest enclosing function frame; everything else is a fatal
//! [`RuntimeError`].

mod builtins;
mod environment;
mod error;
mod value;

pub use builtins::*;
pub use environment::*;
pub use error::*;
pub use value::*;

use std::io::Write;
use std::rc::Rc;

use log::debug;

use crate::parser::ast::{
    AssignmentStatement, BinaryExpression, BinaryOperator, CompoundStatement, DeclarationStatement,
    Expression, FunctionCall, FunctionDefinition, Identifier, IfStatement, Parameter,
    PrefixExpression, PrefixOperator, Program, Statement, TopLevel, WhileLoopStatement,
};
use crate::parser::types::Type;

pub struct Interpreter<W: Write> {
    env: Environment,
    output: W,
}

impl<W: Write> Interpreter<W> {
    /// Creates an interpreter writing `print` output to the given sink.
    pub fn new(output: W) -> Self {
        Self {
            env: Environment::new(),
            output,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Executes every top level item in source order.
    pub fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
        for object in &program.objects {
            let result = match object {
                TopLevel::FunctionDefinition(func_def) => self.define_function(func_def),
                TopLevel::Statement(statement) => self.execute(statement),
            };

            match result {
                Ok(()) => {}
                Err(Unwind::Return(_)) => return Err(RuntimeError::ReturnOutsideOfFunction),
                Err(Unwind::Error(error)) => return Err(error),
            }
        }

        Ok(())
    }

    fn define_function(&mut self, func_def: &FunctionDefinition) -> Exec<()> {
        debug!("registering function definition `{}`", func_def.name);
        self.env
            .add_fun_def(FunctionObject::Defined(Rc::new(func_def.clone())));

        Ok(())
    }

    fn execute(&mut self, statement: &Statement) -> Exec<()> {
        match statement {
            Statement::Compound(compound) => self.execute_compound(compound),
            Statement::Empty => Ok(()),
            Statement::Declaration(declaration) => self.execute_declaration(declaration),
            Statement::Assignment(assignment) => self.execute_assignment(assignment),
            Statement::If(conditional) => self.execute_conditional(conditional),
            Statement::While(while_loop) => self.execute_while_loop(while_loop),
            Statement::Return(ret) => {
                let value = match &ret.expression {
                    Some(expression) => self.evaluate(expression)?,
                    None => Value::Null,
                };
                Err(Unwind::Return(value))
            }
            Statement::InlineReturn(expression) => {
                let value = self.evaluate(expression)?;
                Err(Unwind::Return(value))
            }
            Statement::FunctionCall(call) => {
                self.evaluate_function_call(call)?;
                Ok(())
            }
        }
    }

    /// A block opens a local scope for its duration; the scope is dropped on
    /// every exit path, including a propagating `return`.
    fn execute_compound(&mut self, compound: &CompoundStatement) -> Exec<()> {
        self.env.create_local_scope();

        let result = compound
            .statements
            .iter()
            .try_for_each(|statement| self.execute(statement));

        self.env.destroy_local_scope();

        result
    }

    fn execute_declaration(&mut self, declaration: &DeclarationStatement) -> Exec<()> {
        let DeclarationStatement {
            name,
            typ,
            nullable,
            mutable,
            value,
            ..
        } = declaration;

        let evaluated = match value {
            Some(expression) => Some(self.evaluate(expression)?),
            None => None,
        };

        let evaluated = match evaluated {
            Some(value) => value,
            None => {
                if !*mutable {
                    return Err(RuntimeError::UninitializedConst { name: name.clone() }.into());
                }
                if !*nullable {
                    return Err(RuntimeError::NotNullable { name: name.clone() }.into());
                }
                Value::Null
            }
        };

        if evaluated.is_null() && !*nullable {
            return Err(RuntimeError::NotNullable { name: name.clone() }.into());
        }

        if let Some(existing) = self.env.get_variable(name) {
            if !existing.mutable {
                return Err(RuntimeError::ConstRedeclaration { name: name.clone() }.into());
            }
        }

        let stored = if evaluated.is_null() {
            Value::Null
        } else {
            coerce_declared(name, typ, evaluated).map_err(Unwind::from)?
        };

        self.env.declare_variable(
            name,
            Variable {
                typ: typ.clone(),
                nullable: *nullable,
                mutable: *mutable,
                value: stored,
            },
        );

        Ok(())
    }

    fn execute_assignment(&mut self, assignment: &AssignmentStatement) -> Exec<()> {
        let name = &assignment.name;

        let Some(existing) = self.env.get_variable(name) else {
            return Err(RuntimeError::UndefinedName { name: name.clone() }.into());
        };

        if !existing.mutable {
            return Err(RuntimeError::ConstAssignment { name: name.clone() }.into());
        }

        let (typ, nullable, mutable) = (existing.typ.clone(), existing.nullable, existing.mutable);

        let value = self.evaluate(&assignment.value)?;

        if value.is_null() && !nullable {
            return Err(RuntimeError::NotNullable { name: name.clone() }.into());
        }

        let stored = if value.is_null() {
            Value::Null
        } else if value.type_of() == typ {
            value
        } else if let (Type::Float, Value::Int(v)) = (&typ, &value) {
            Value::Float(*v as f64)
        } else {
            return Err(RuntimeError::AssignmentTypeMismatch {
                name: name.clone(),
                expected: typ,
                actual: value.type_of(),
            }
            .into());
        };

        self.env.set_variable(
            name,
            Variable {
                typ,
                nullable,
                mutable,
                value: stored,
            },
        );

        Ok(())
    }

    fn execute_conditional(&mut self, conditional: &IfStatement) -> Exec<()> {
        if self.evaluate_condition(&conditional.condition)? {
            if let Some(statement) = &conditional.statement {
                self.execute(statement)?;
            }
            return Ok(());
        }

        for elif_statement in &conditional.elif_statements {
            if self.evaluate_condition(&elif_statement.condition)? {
                if let Some(statement) = &elif_statement.statement {
                    self.execute(statement)?;
                }
                return Ok(());
            }
        }

        if let Some(else_statement) = &conditional.else_statement {
            if let Some(statement) = &else_statement.statement {
                self.execute(statement)?;
            }
        }

        Ok(())
    }

    fn execute_while_loop(&mut self, while_loop: &WhileLoopStatement) -> Exec<()> {
        while self.evaluate_condition(&while_loop.condition)? {
            self.execute(&while_loop.body)?;
        }

        Ok(())
    }

    /// Conditions must be booleans; null counts as false.
    fn evaluate_condition(&mut self, condition: &Expression) -> Exec<bool> {
        match self.evaluate(condition)? {
            Value::Bool(value) => Ok(value),
            Value::Null => Ok(false),
            other => Err(RuntimeError::UnexpectedType {
                message: format!("Expected a boolean condition, got type {}.", other.type_of()),
            }
            .into()),
        }
    }

    fn evaluate(&mut self, expression: &Expression) -> Exec<Value> {
        match expression {
            Expression::Literal(literal) => Ok(Value::from(literal)),
            Expression::Identifier(identifier) => self.evaluate_identifier(identifier),
            Expression::FunctionCall(call) => self.evaluate_function_call(call),
            Expression::Lambda(lambda) => Ok(Value::Function(FunctionObject::Lambda(Rc::new(
                lambda.clone(),
            )))),
            Expression::Parens(inner) => self.evaluate(inner),
            Expression::Binary(binary) => self.evaluate_binary(binary),
            Expression::Prefix(prefix) => self.evaluate_prefix(prefix),
        }
    }

    fn evaluate_identifier(&mut self, identifier: &Identifier) -> Exec<Value> {
        match self.env.get_variable(&identifier.name) {
            Some(variable) => Ok(variable.value.clone()),
            None => Err(RuntimeError::UndefinedName {
                name: identifier.name.clone(),
            }
            .into()),
        }
    }

    /// Both operands are evaluated left to right before dispatching; none of
    /// the operators short-circuits.
    fn evaluate_binary(&mut self, binary: &BinaryExpression) -> Exec<Value> {
        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;

        apply_binary(binary.operator, left, right).map_err(Unwind::from)
    }

    fn evaluate_prefix(&mut self, prefix: &PrefixExpression) -> Exec<Value> {
        let value = self.evaluate(&prefix.expression)?;

        let result = match prefix.operator {
            PrefixOperator::Minus => match value {
                Value::Int(v) => Value::Int(-v),
                Value::Float(v) => Value::Float(-v),
                other => {
                    return Err(RuntimeError::UnexpectedType {
                        message: format!(
                            "Unsupported operand type {} for unary `-`.",
                            other.type_of()
                        ),
                    }
                    .into())
                }
            },
            PrefixOperator::Not => match value {
                Value::Bool(v) => Value::Bool(!v),
                other => {
                    return Err(RuntimeError::UnexpectedType {
                        message: format!("Unsupported operand type {} for `not`.", other.type_of()),
                    }
                    .into())
                }
            },
        };

        Ok(result)
    }

    /// Resolves the callee (function table first, then `func`-typed
    /// variables), applies the first argument list, then applies every
    /// further list to the returned value in turn.
    fn evaluate_function_call(&mut self, call: &FunctionCall) -> Exec<Value> {
        let object = self.resolve_callable(&call.name)?;

        let mut argument_lists = call.arguments.iter();
        let Some(first) = argument_lists.next() else {
            unreachable!("a function call always carries at least one argument list");
        };

        let arguments = self.evaluate_arguments(first)?;
        let mut result = self.invoke(&object, arguments, &call.name)?;

        for argument_list in argument_lists {
            let next = match result {
                Value::Function(object) => object,
                other => {
                    return Err(RuntimeError::NotCallable {
                        name: call.name.clone(),
                        typ: other.type_of(),
                    }
                    .into())
                }
            };

            let arguments = self.evaluate_arguments(argument_list)?;
            result = self.invoke(&next, arguments, &call.name)?;
        }

        Ok(result)
    }

    fn resolve_callable(&self, name: &str) -> Exec<FunctionObject> {
        if let Some(object) = self.env.get_fun_def(name) {
            return Ok(object.clone());
        }

        match self.env.get_variable(name) {
            Some(variable) => match &variable.value {
                Value::Function(object) => Ok(object.clone()),
                _ => Err(RuntimeError::NotCallable {
                    name: name.to_string(),
                    typ: variable.typ.clone(),
                }
                .into()),
            },
            None => Err(RuntimeError::UndefinedName {
                name: name.to_string(),
            }
            .into()),
        }
    }

    fn evaluate_arguments(&mut self, expressions: &[Expression]) -> Exec<Vec<Value>> {
        expressions
            .iter()
            .map(|expression| self.evaluate(expression))
            .collect()
    }

    /// Calls a single function object: arity and argument checks, a fresh
    /// function scope, body execution catching `return`, and return type
    /// validation.
    fn invoke(&mut self, object: &FunctionObject, arguments: Vec<Value>, name: &str) -> Exec<Value> {
        if let FunctionObject::Builtin(builtin) = object {
            if let Some(expected) = builtin.arity() {
                if arguments.len() != expected {
                    return Err(RuntimeError::Arguments {
                        name: builtin.name().to_string(),
                        expected,
                        actual: arguments.len(),
                    }
                    .into());
                }
            }

            return builtin
                .call(&arguments, &mut self.output)
                .map_err(Unwind::from);
        }

        let (parameters, return_type, body): (&[Parameter], &Type, &Statement) = match object {
            FunctionObject::Defined(def) => (&def.parameters, &def.return_type, &def.body),
            FunctionObject::Lambda(lambda) => (&lambda.parameters, &lambda.return_type, &lambda.body),
            FunctionObject::Builtin(_) => unreachable!(),
        };

        if arguments.len() != parameters.len() {
            return Err(RuntimeError::Arguments {
                name: name.to_string(),
                expected: parameters.len(),
                actual: arguments.len(),
            }
            .into());
        }

        let mut bindings = Vec::with_capacity(arguments.len());
        for (parameter, argument) in parameters.iter().zip(arguments) {
            let value = check_argument(name, parameter, argument).map_err(Unwind::from)?;
            bindings.push((
                parameter.name.clone(),
                Variable {
                    typ: parameter.typ.clone(),
                    nullable: parameter.nullable,
                    mutable: false,
                    value,
                },
            ));
        }

        if self.env.fun_call_nesting() >= RECURSION_LIMIT {
            return Err(RuntimeError::RecursionLimit.into());
        }

        self.env.create_function_scope(bindings);
        let result = self.execute(body);
        self.env.destroy_function_scope();

        let value = match result {
            Ok(()) => Value::Null,
            Err(Unwind::Return(value)) => value,
            Err(error) => return Err(error),
        };

        check_return_type(name, return_type, value).map_err(Unwind::from)
    }
}

fn coerce_declared(name: &str, declared: &Type, value: Value) -> Result<Value, RuntimeError> {
    if value.type_of() == *declared {
        return Ok(value);
    }

    if let (Type::Float, Value::Int(v)) = (declared, &value) {
        return Ok(Value::Float(*v as f64));
    }

    Err(RuntimeError::TypeMismatch {
        name: name.to_string(),
        expected: declared.clone(),
        actual: value.type_of(),
    })
}

fn check_argument(
    function: &str,
    parameter: &Parameter,
    argument: Value,
) -> Result<Value, RuntimeError> {
    if argument.is_null() {
        if parameter.nullable {
            return Ok(Value::Null);
        }

        return Err(RuntimeError::ArgumentType {
            function: function.to_string(),
            parameter: parameter.name.clone(),
            expected: parameter.typ.clone(),
            actual: Type::Null,
        });
    }

    let actual = argument.type_of();
    if actual == parameter.typ {
        return Ok(argument);
    }

    if let (Type::Float, Value::Int(v)) = (&parameter.typ, &argument) {
        return Ok(Value::Float(*v as f64));
    }

    Err(RuntimeError::ArgumentType {
        function: function.to_string(),
        parameter: parameter.name.clone(),
        expected: parameter.typ.clone(),
        actual,
    })
}

/// Validates a call result against the declared return type. Int and float
/// results are tolerated for each other; null satisfies a `void` (or null)
/// declaration through type equality.
fn check_return_type(function: &str, expected: &Type, value: Value) -> Result<Value, RuntimeError> {
    let actual = value.type_of();

    if actual == *expected {
        return Ok(value);
    }

    match (expected, &value) {
        (Type::Float, Value::Int(v)) => Ok(Value::Float(*v as f64)),
        (Type::Integer, Value::Float(_)) => Ok(value),
        _ => Err(RuntimeError::ReturnTypeMismatch {
            function: function.to_string(),
            expected: expected.clone(),
            actual,
        }),
    }
}

fn apply_binary(operator: BinaryOperator, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match operator {
        BinaryOperator::Plus => add(left, right),
        BinaryOperator::Minus => subtract(left, right),
        BinaryOperator::Times => multiply(left, right),
        BinaryOperator::Div => divide(left, right),
        BinaryOperator::Modulo => modulo(left, right),
        BinaryOperator::Less
        | BinaryOperator::LessOrEqual
        | BinaryOperator::Greater
        | BinaryOperator::GreaterOrEqual => relational(operator, left, right),
        BinaryOperator::Equal | BinaryOperator::NotEqual => equality(operator, left, right),
        BinaryOperator::And | BinaryOperator::Or => logic(operator, left, right),
        BinaryOperator::NullCoalesce => Ok(null_coalesce(left, right)),
    }
}

/// Sums numbers or concatenates strings.
fn add(left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => Ok(Value::Int(l + r)),
        (Value::Int(l), Value::Float(r)) => Ok(Value::Float(l as f64 + r)),
        (Value::Float(l), Value::Int(r)) => Ok(Value::Float(l + r as f64)),
        (Value::Float(l), Value::Float(r)) => Ok(Value::Float(l + r)),
        (Value::Str(l), Value::Str(r)) => Ok(Value::Str(format!("{l}{r}"))),
        (left, right) => Err(RuntimeError::UnexpectedType {
            message: format!(
                "Cannot add type {} to type {}.",
                left.type_of(),
                right.type_of()
            ),
        }),
    }
}

fn subtract(left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => Ok(Value::Int(l - r)),
        (Value::Int(l), Value::Float(r)) => Ok(Value::Float(l as f64 - r)),
        (Value::Float(l), Value::Int(r)) => Ok(Value::Float(l - r as f64)),
        (Value::Float(l), Value::Float(r)) => Ok(Value::Float(l - r)),
        (left, right) => Err(RuntimeError::UnexpectedType {
            message: format!(
                "Cannot subtract type {} from type {}.",
                right.type_of(),
                left.type_of()
            ),
        }),
    }
}

fn multiply(left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => Ok(Value::Int(l * r)),
        (Value::Int(l), Value::Float(r)) => Ok(Value::Float(l as f64 * r)),
        (Value::Float(l), Value::Int(r)) => Ok(Value::Float(l * r as f64)),
        (Value::Float(l), Value::Float(r)) => Ok(Value::Float(l * r)),
        (left, right) => Err(RuntimeError::UnexpectedType {
            message: format!(
                "Cannot multiply type {} with type {}.",
                left.type_of(),
                right.type_of()
            ),
        }),
    }
}

/// Integer division when both sides are integers, float division otherwise.
fn divide(left: Value, right: Value) -> Result<Value, RuntimeError> {
    if is_zero(&right) {
        return Err(RuntimeError::DivisionByZero);
    }

    match (left, right) {
        (Value::Int(l), Value::Int(r)) => Ok(Value::Int(l / r)),
        (Value::Int(l), Value::Float(r)) => Ok(Value::Float(l as f64 / r)),
        (Value::Float(l), Value::Int(r)) => Ok(Value::Float(l / r as f64)),
        (Value::Float(l), Value::Float(r)) => Ok(Value::Float(l / r)),
        (left, right) => Err(RuntimeError::UnexpectedType {
            message: format!(
                "Cannot divide type {} by type {}.",
                left.type_of(),
                right.type_of()
            ),
        }),
    }
}

/// Floored modulo: the result takes the sign of the divisor.
fn modulo(left: Value, right: Value) -> Result<Value, RuntimeError> {
    if is_zero(&right) {
        return Err(RuntimeError::DivisionByZero);
    }

    match (left, right) {
        (Value::Int(l), Value::Int(r)) => Ok(Value::Int(((l % r) + r) % r)),
        (Value::Int(l), Value::Float(r)) => Ok(Value::Float(floored_mod(l as f64, r))),
        (Value::Float(l), Value::Int(r)) => Ok(Value::Float(floored_mod(l, r as f64))),
        (Value::Float(l), Value::Float(r)) => Ok(Value::Float(floored_mod(l, r))),
        (left, right) => Err(RuntimeError::UnexpectedType {
            message: format!(
                "Cannot divide type {} by type {}.",
                left.type_of(),
                right.type_of()
            ),
        }),
    }
}

fn floored_mod(left: f64, right: f64) -> f64 {
    left - right * (left / right).floor()
}

fn is_zero(value: &Value) -> bool {
    match value {
        Value::Int(v) => *v == 0,
        Value::Float(v) => *v == 0.0,
        _ => false,
    }
}

fn relational(operator: BinaryOperator, left: Value, right: Value) -> Result<Value, RuntimeError> {
    let result = match (&left, &right) {
        (Value::Int(l), Value::Int(r)) => ordering_matches(operator, l.cmp(r)),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            match as_float(&left).partial_cmp(&as_float(&right)) {
                Some(ordering) => ordering_matches(operator, ordering),
                // comparisons against NaN are false
                None => false,
            }
        }
        _ => {
            return Err(RuntimeError::UnexpectedType {
                message: format!(
                    "Cannot compare type {} with type {} using `{}`.",
                    left.type_of(),
                    right.type_of(),
                    operator.symbol()
                ),
            })
        }
    };

    Ok(Value::Bool(result))
}

fn ordering_matches(operator: BinaryOperator, ordering: std::cmp::Ordering) -> bool {
    match operator {
        BinaryOperator::Less => ordering.is_lt(),
        BinaryOperator::LessOrEqual => ordering.is_le(),
        BinaryOperator::Greater => ordering.is_gt(),
        BinaryOperator::GreaterOrEqual => ordering.is_ge(),
        _ => unreachable!(),
    }
}

fn as_float(value: &Value) -> f64 {
    match value {
        Value::Int(v) => *v as f64,
        Value::Float(v) => *v,
        _ => unreachable!(),
    }
}

/// `==`/`!=` for everything but functions. A lone null compares unequal to
/// any non-null value; mismatched non-null types are an error.
fn equality(operator: BinaryOperator, left: Value, right: Value) -> Result<Value, RuntimeError> {
    if matches!(left, Value::Function(_)) || matches!(right, Value::Function(_)) {
        return Err(RuntimeError::UnexpectedType {
            message: "Unsupported operation for type Func.".into(),
        });
    }

    let equal = match (&left, &right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Int(l), Value::Int(r)) => l == r,
        (Value::Float(l), Value::Float(r)) => l == r,
        (Value::Int(l), Value::Float(r)) => *l as f64 == *r,
        (Value::Float(l), Value::Int(r)) => *l == *r as f64,
        (Value::Str(l), Value::Str(r)) => l == r,
        (Value::Bool(l), Value::Bool(r)) => l == r,
        _ => {
            return Err(RuntimeError::UnexpectedType {
                message: format!(
                    "Cannot compare type {} with type {}.",
                    left.type_of(),
                    right.type_of()
                ),
            })
        }
    };

    Ok(Value::Bool(match operator {
        BinaryOperator::Equal => equal,
        _ => !equal,
    }))
}

fn logic(operator: BinaryOperator, left: Value, right: Value) -> Result<Value, RuntimeError> {
    let (Value::Bool(l), Value::Bool(r)) = (&left, &right) else {
        return Err(RuntimeError::UnexpectedType {
            message: format!(
                "Expected boolean operands for `{}`, got {} and {}.",
                operator.symbol(),
                left.type_of(),
                right.type_of()
            ),
        });
    };

    Ok(Value::Bool(match operator {
        BinaryOperator::And => *l && *r,
        _ => *l || *r,
    }))
}

fn null_coalesce(left: Value, right: Value) -> Value {
    if left.is_null() {
        right
    } else {
        left
    }
}
