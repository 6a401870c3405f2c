use serde::{Deserialize, Serialize};

use crate::lexer::Position;
use crate::parser::types::Type;

/// A single function or lambda parameter. Parameters are immutable bindings;
/// `nullable` corresponds to the `?:` type assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub typ: Type,
    pub nullable: bool,
    pub position: Position,
}
