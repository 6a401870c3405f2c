use serde::{Deserialize, Serialize};

use crate::lexer::Position;
use crate::parser::ast::{Parameter, Statement};
use crate::parser::types::{FuncType, Type};

/// An anonymous function expression, e.g. `(a: int): int => a * a` or
/// `(): void => {}`. Evaluates to itself as a `func`-typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LambdaExpression {
    pub parameters: Vec<Parameter>,
    pub return_type: Type,
    pub body: Box<Statement>,
    pub position: Position,
}

impl LambdaExpression {
    pub fn func_type(&self) -> Type {
        Type::Func(FuncType::new(
            self.parameters.iter().map(|p| p.typ.clone()).collect(),
            self.return_type.clone(),
        ))
    }
}
