mod assignment;
mod compound;
mod conditional;
mod declaration;
mod function_definition;
mod return_statement;
mod while_loop;

pub use self::assignment::*;
pub use self::compound::*;
pub use self::conditional::*;
pub use self::declaration::*;
pub use self::function_definition::*;
pub use self::return_statement::*;
pub use self::while_loop::*;

use serde::{Deserialize, Serialize};

use super::expression::{Expression, FunctionCall};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Compound(CompoundStatement),
    /// An empty block `{}`.
    Empty,
    Declaration(DeclarationStatement),
    Assignment(AssignmentStatement),
    If(IfStatement),
    While(WhileLoopStatement),
    Return(ReturnStatement),
    /// A bare expression function body after `=>`; evaluates to the
    /// expression's value.
    InlineReturn(Expression),
    FunctionCall(FunctionCall),
}
