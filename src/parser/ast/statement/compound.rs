use serde::{Deserialize, Serialize};

use super::Statement;

/// A block of statements in curly braces. Executing one opens a fresh local
/// scope for its duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundStatement {
    pub statements: Vec<Statement>,
}

impl From<CompoundStatement> for Statement {
    fn from(value: CompoundStatement) -> Self {
        Statement::Compound(value)
    }
}
