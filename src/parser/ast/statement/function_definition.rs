use serde::{Deserialize, Serialize};

use super::Statement;
use crate::lexer::Position;
use crate::parser::ast::Parameter;
use crate::parser::types::{FuncType, Type};

/// A named function: `def name(params): type => body`. The body is either a
/// block or an inline return expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Type,
    pub body: Statement,
    pub position: Position,
}

impl FunctionDefinition {
    /// The `func` type this definition evaluates to.
    pub fn func_type(&self) -> Type {
        Type::Func(FuncType::new(
            self.parameters.iter().map(|p| p.typ.clone()).collect(),
            self.return_type.clone(),
        ))
    }
}
