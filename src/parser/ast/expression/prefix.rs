use serde::{Deserialize, Serialize};

use super::Expression;

/// Unary `-` (bound at factor level) or logical `not` (bound just above the
/// comparison level).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixExpression {
    pub operator: PrefixOperator,
    pub expression: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrefixOperator {
    Minus,
    Not,
}
