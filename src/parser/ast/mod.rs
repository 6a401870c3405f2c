pub mod expression;
mod parameter;
pub mod statement;

pub use self::expression::*;
pub use self::parameter::*;
pub use self::statement::*;

use serde::{Deserialize, Serialize};

/// The parsed form of a whole source file: an ordered list of top level
/// items, executed in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub objects: Vec<TopLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TopLevel {
    FunctionDefinition(FunctionDefinition),
    Statement(Statement),
}

impl From<FunctionDefinition> for TopLevel {
    fn from(value: FunctionDefinition) -> Self {
        TopLevel::FunctionDefinition(value)
    }
}

impl From<Statement> for TopLevel {
    fn from(value: Statement) -> Self {
        TopLevel::Statement(value)
    }
}
