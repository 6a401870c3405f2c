use serde::{Deserialize, Serialize};

use super::Statement;
use crate::lexer::Position;
use crate::parser::ast::Expression;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentStatement {
    pub name: String,
    pub value: Expression,
    pub position: Position,
}

impl From<AssignmentStatement> for Statement {
    fn from(value: AssignmentStatement) -> Self {
        Statement::Assignment(value)
    }
}
