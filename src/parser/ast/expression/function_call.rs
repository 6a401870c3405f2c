use serde::{Deserialize, Serialize};

use super::Expression;
use crate::lexer::Position;

/// A call by name, usable both as a statement and as an expression. The
/// outer list always holds at least one argument list; more than one encodes
/// a chained call `f(a)(b)(c)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: Vec<Vec<Expression>>,
    pub position: Position,
}
