mod binary;
mod function_call;
mod identifier;
mod lambda;
mod literal;
mod prefix;

pub use self::binary::*;
pub use self::function_call::*;
pub use self::identifier::*;
pub use self::lambda::*;
pub use self::literal::*;
pub use self::prefix::*;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Literal(Literal),
    Identifier(Identifier),
    FunctionCall(FunctionCall),
    Lambda(LambdaExpression),
    Parens(Box<Expression>),
    Binary(Box<BinaryExpression>),
    Prefix(PrefixExpression),
}

impl From<FunctionCall> for Expression {
    fn from(value: FunctionCall) -> Self {
        Expression::FunctionCall(value)
    }
}

impl From<LambdaExpression> for Expression {
    fn from(value: LambdaExpression) -> Self {
        Expression::Lambda(value)
    }
}

impl From<BinaryExpression> for Expression {
    fn from(value: BinaryExpression) -> Self {
        Expression::Binary(Box::new(value))
    }
}

impl From<PrefixExpression> for Expression {
    fn from(value: PrefixExpression) -> Self {
        Expression::Prefix(value)
    }
}
