use serde::{Deserialize, Serialize};

use super::Statement;
use crate::parser::ast::Expression;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileLoopStatement {
    pub condition: Expression,
    pub body: Box<Statement>,
}

impl From<WhileLoopStatement> for Statement {
    fn from(value: WhileLoopStatement) -> Self {
        Statement::While(value)
    }
}
