use serde::{Deserialize, Serialize};

use super::Statement;
use crate::parser::ast::Expression;

/// `if` with any number of `elif` branches and an optional `else`. The
/// branch bodies are arbitrary statements, not necessarily blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub condition: Expression,
    pub statement: Option<Box<Statement>>,
    pub elif_statements: Vec<ElifStatement>,
    pub else_statement: Option<ElseStatement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElifStatement {
    pub condition: Expression,
    pub statement: Option<Box<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElseStatement {
    pub statement: Option<Box<Statement>>,
}

impl From<IfStatement> for Statement {
    fn from(value: IfStatement) -> Self {
        Statement::If(value)
    }
}
