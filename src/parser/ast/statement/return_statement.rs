use serde::{Deserialize, Serialize};

use super::Statement;
use crate::parser::ast::Expression;

/// `return expr;` or the bare `return;` which yields null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatement {
    pub expression: Option<Expression>,
}

impl From<ReturnStatement> for Statement {
    fn from(value: ReturnStatement) -> Self {
        Statement::Return(value)
    }
}
