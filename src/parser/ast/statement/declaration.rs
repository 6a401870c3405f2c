use serde::{Deserialize, Serialize};

use super::Statement;
use crate::lexer::Position;
use crate::parser::ast::Expression;
use crate::parser::types::Type;

/// `let`/`const` variable declaration. `value` is absent only for the
/// `let name?: type;` form; every other uninitialized shape is rejected by
/// the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarationStatement {
    pub name: String,
    pub typ: Type,
    pub nullable: bool,
    pub mutable: bool,
    pub value: Option<Expression>,
    pub position: Position,
}

impl From<DeclarationStatement> for Statement {
    fn from(value: DeclarationStatement) -> Self {
        Statement::Declaration(value)
    }
}
