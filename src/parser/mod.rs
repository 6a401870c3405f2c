//! Recursive-descent parser over the token stream.
//!
//! Each precedence layer has its own function, from `??` (loosest) down to
//! factors; statements are tried in a fixed order, first match wins. The
//! only non-LL(1) spot is the ambiguity between a parenthesized expression
//! and a lambda: after `(`, a `)` directly followed by `:` commits to the
//! zero-parameter lambda, and an identifier followed by `:` inside parens
//! pivots to the rest of a lambda definition (which consumes the closing
//! parenthesis itself). Both cases need at most the current and the next
//! token.

pub mod ast;
pub mod types;

use std::error::Error;
use std::fmt::{self, Display};

use crate::lexer::{Lexer, LexerError, Position, Token, TokenKind};

use self::ast::{
    AssignmentStatement, BinaryExpression, BinaryOperator, CompoundStatement, DeclarationStatement,
    ElifStatement, ElseStatement, Expression, FunctionCall, FunctionDefinition, Identifier,
    IfStatement, LambdaExpression, Literal, LiteralValue, Parameter, PrefixExpression,
    PrefixOperator, Program, ReturnStatement, Statement, TopLevel, WhileLoopStatement,
};
use self::types::{FuncType, Type};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    UnexpectedToken { expected: String, actual: Token },
    UninitializedConst(Token),
    NotNullable(Position),
    InvalidType(Token),
    InvalidReturnType(Token),
    InvalidRightExpression(Token),
    MissingParameter(Token),
    MissingArgument(Token),
    MissingLambdaExpressionBody(Token),
    MissingFunctionBody(Token),
    WhileLoopMissingCondition(Token),
    WhileLoopMissingBody(Token),
    MissingTypeAssignment(Token),
    InvalidConditionalExpression(Token),
    Lexer(LexerError),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedToken { expected, actual } => write!(
                f,
                "Expected {expected}. Got {:?} instead. {}",
                actual.kind, actual.position
            ),
            ParseError::UninitializedConst(token) => write!(
                f,
                "Missing initializer in const declaration. {}",
                token.position
            ),
            ParseError::NotNullable(position) => write!(
                f,
                "Cannot assign null to variable which is not nullable. Use `?:` instead of `:` at {position}."
            ),
            ParseError::InvalidType(token) => {
                write!(f, "`{:?}` is not a valid type. {}", token.kind, token.position)
            }
            ParseError::InvalidReturnType(token) => write!(
                f,
                "`{:?}` is not a valid function return type. {}",
                token.kind, token.position
            ),
            ParseError::InvalidRightExpression(token) => write!(
                f,
                "Invalid right side of an expression. {}",
                token.position
            ),
            ParseError::MissingParameter(token) => write!(
                f,
                "Missing parameter in function definition. {}",
                token.position
            ),
            ParseError::MissingArgument(token) => {
                write!(f, "Missing argument in function call. {}", token.position)
            }
            ParseError::MissingLambdaExpressionBody(token) => write!(
                f,
                "Missing body definition in lambda expression. {}",
                token.position
            ),
            ParseError::MissingFunctionBody(token) => write!(
                f,
                "Missing body definition in function definition. {}",
                token.position
            ),
            ParseError::WhileLoopMissingCondition(token) => {
                write!(f, "Missing condition in while loop. {}", token.position)
            }
            ParseError::WhileLoopMissingBody(token) => {
                write!(f, "Missing body in while loop. {}", token.position)
            }
            ParseError::MissingTypeAssignment(token) => write!(
                f,
                "Missing type assignment. Expected `:` or `?:`. {}",
                token.position
            ),
            ParseError::InvalidConditionalExpression(token) => write!(
                f,
                "Missing or invalid condition in conditional statement. {}",
                token.position
            ),
            ParseError::Lexer(error) => error.fmt(f),
        }
    }
}

impl Error for ParseError {}

impl From<LexerError> for ParseError {
    fn from(error: LexerError) -> Self {
        ParseError::Lexer(error)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

pub struct Parser {
    lexer: Lexer,
    current: Token,
    peeked: Option<Token>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> ParseResult<Self> {
        let current = lexer.build_next_token()?;

        Ok(Self {
            lexer,
            current,
            peeked: None,
        })
    }

    /// Parses top level items until the stream is exhausted, then expects
    /// the end-of-text token.
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let mut objects = vec![];

        while let Some(object) = self.try_parse_program_statement()? {
            objects.push(object);
        }

        self.expect_and_consume(&TokenKind::Etx)?;

        Ok(Program { objects })
    }

    fn try_parse_program_statement(&mut self) -> ParseResult<Option<TopLevel>> {
        if let Some(func_def) = self.try_parse_func_def()? {
            return Ok(Some(func_def.into()));
        }

        if let Some(statement) = self.try_parse_statement()? {
            return Ok(Some(statement.into()));
        }

        Ok(None)
    }

    fn try_parse_func_def(&mut self) -> ParseResult<Option<FunctionDefinition>> {
        let Some(def_token) = self.check_and_consume(&TokenKind::Def)? else {
            return Ok(None);
        };

        let (name, _) = self.expect_id()?;
        self.expect_and_consume(&TokenKind::LParen)?;

        let parameters = self.try_parse_parameters()?;

        self.expect_and_consume(&TokenKind::RParen)?;
        self.expect_and_consume(&TokenKind::TypeAssign)?;

        let return_type = self.parse_return_type()?;

        self.expect_and_consume(&TokenKind::Arrow)?;

        let Some(body) = self.try_parse_func_body()? else {
            return Err(ParseError::MissingFunctionBody(self.current.clone()));
        };

        Ok(Some(FunctionDefinition {
            name,
            parameters,
            return_type,
            body,
            position: def_token.position,
        }))
    }

    fn parse_return_type(&mut self) -> ParseResult<Type> {
        if self.check_and_consume(&TokenKind::VoidType)?.is_some() {
            return Ok(Type::Void);
        }

        self.parse_var_type().map_err(|error| match error {
            ParseError::InvalidType(token) => ParseError::InvalidReturnType(token),
            other => other,
        })
    }

    fn parse_var_type(&mut self) -> ParseResult<Type> {
        if let Some(func_type) = self.try_parse_func_type()? {
            return Ok(func_type);
        }

        let Some(token) = self.check_one_of_many_and_consume(&[
            TokenKind::StrType,
            TokenKind::IntType,
            TokenKind::FloatType,
            TokenKind::BoolType,
        ])?
        else {
            return Err(ParseError::InvalidType(self.current.clone()));
        };

        Ok(match token.kind {
            TokenKind::StrType => Type::String,
            TokenKind::IntType => Type::Integer,
            TokenKind::FloatType => Type::Float,
            TokenKind::BoolType => Type::Bool,
            _ => unreachable!(),
        })
    }

    /// `func( (params) => return-type )`
    fn try_parse_func_type(&mut self) -> ParseResult<Option<Type>> {
        if self.check_and_consume(&TokenKind::FuncType)?.is_none() {
            return Ok(None);
        }

        self.expect_and_consume(&TokenKind::LParen)?;
        self.expect_and_consume(&TokenKind::LParen)?;

        let parameters = self.try_parse_parameters()?;

        self.expect_and_consume(&TokenKind::RParen)?;
        self.expect_and_consume(&TokenKind::Arrow)?;

        let return_type = self.parse_return_type()?;

        self.expect_and_consume(&TokenKind::RParen)?;

        Ok(Some(Type::Func(FuncType::new(
            parameters.into_iter().map(|p| p.typ).collect(),
            return_type,
        ))))
    }

    /// A function body is either a block or a single expression, which
    /// becomes an inline return.
    fn try_parse_func_body(&mut self) -> ParseResult<Option<Statement>> {
        if let Some(body) = self.try_parse_body()? {
            return Ok(Some(body));
        }

        if let Some(expression) = self.try_parse_expression()? {
            return Ok(Some(Statement::InlineReturn(expression)));
        }

        Ok(None)
    }

    fn try_parse_parameters(&mut self) -> ParseResult<Vec<Parameter>> {
        let Some(parameter) = self.try_parse_parameter()? else {
            return Ok(vec![]);
        };

        let mut parameters = vec![parameter];

        while self.check_and_consume(&TokenKind::Comma)?.is_some() {
            let Some(parameter) = self.try_parse_parameter()? else {
                return Err(ParseError::MissingParameter(self.current.clone()));
            };
            parameters.push(parameter);
        }

        Ok(parameters)
    }

    fn try_parse_parameter(&mut self) -> ParseResult<Option<Parameter>> {
        let TokenKind::Id(name) = &self.current.kind else {
            return Ok(None);
        };
        let name = name.clone();
        let position = self.current.position;
        self.advance()?;

        let Some(assign_token) = self.check_one_of_many_and_consume(&[
            TokenKind::TypeAssign,
            TokenKind::TypeAssignNullable,
        ])?
        else {
            return Err(ParseError::MissingTypeAssignment(self.current.clone()));
        };

        let typ = self.parse_var_type()?;

        Ok(Some(Parameter {
            name,
            typ,
            nullable: matches!(assign_token.kind, TokenKind::TypeAssignNullable),
            position,
        }))
    }

    /// Zero or more statements inside curly braces.
    fn try_parse_body(&mut self) -> ParseResult<Option<Statement>> {
        if self.check_and_consume(&TokenKind::LBrace)?.is_none() {
            return Ok(None);
        }

        if self.check_and_consume(&TokenKind::RBrace)?.is_some() {
            return Ok(Some(Statement::Empty));
        }

        let mut statements = vec![];
        while let Some(statement) = self.try_parse_statement()? {
            statements.push(statement);
        }

        self.expect_and_consume(&TokenKind::RBrace)?;

        Ok(Some(CompoundStatement { statements }.into()))
    }

    fn try_parse_statement(&mut self) -> ParseResult<Option<Statement>> {
        if let Some(statement) = self.try_parse_conditional()? {
            return Ok(Some(statement.into()));
        }

        if let Some(statement) = self.try_parse_while_loop()? {
            return Ok(Some(statement.into()));
        }

        if let Some(statement) = self.try_parse_body()? {
            return Ok(Some(statement));
        }

        if let Some(statement) = self.try_parse_declaration()? {
            return Ok(Some(statement.into()));
        }

        if let Some(statement) = self.try_parse_return()? {
            return Ok(Some(statement.into()));
        }

        if let Some(statement) = self.try_parse_id_operation()? {
            return Ok(Some(statement));
        }

        Ok(None)
    }

    /// Assignments and calls both start with an identifier, so they are
    /// resolved sequentially after consuming it.
    fn try_parse_id_operation(&mut self) -> ParseResult<Option<Statement>> {
        let TokenKind::Id(name) = &self.current.kind else {
            return Ok(None);
        };
        let name = name.clone();
        let position = self.current.position;
        self.advance()?;

        if let Some(assignment) = self.try_parse_assignment(name.clone(), position)? {
            self.expect_and_consume(&TokenKind::Semicolon)?;
            return Ok(Some(assignment.into()));
        }

        if let Some(func_call) = self.try_parse_func_call(name, position)? {
            self.expect_and_consume(&TokenKind::Semicolon)?;
            return Ok(Some(Statement::FunctionCall(func_call)));
        }

        Ok(None)
    }

    fn try_parse_assignment(
        &mut self,
        name: String,
        position: Position,
    ) -> ParseResult<Option<AssignmentStatement>> {
        if self.check_and_consume(&TokenKind::Assign)?.is_none() {
            return Ok(None);
        }

        let Some(value) = self.try_parse_expression()? else {
            return Err(ParseError::InvalidRightExpression(self.current.clone()));
        };

        Ok(Some(AssignmentStatement {
            name,
            value,
            position,
        }))
    }

    fn try_parse_declaration(&mut self) -> ParseResult<Option<DeclarationStatement>> {
        let Some(declare_token) =
            self.check_one_of_many_and_consume(&[TokenKind::Const, TokenKind::Let])?
        else {
            return Ok(None);
        };

        let (name, _) = self.expect_id()?;
        let assign_token = self.expect_one_of_many_and_consume(&[
            TokenKind::TypeAssign,
            TokenKind::TypeAssignNullable,
        ])?;

        let mutable = matches!(declare_token.kind, TokenKind::Let);
        let nullable = matches!(assign_token.kind, TokenKind::TypeAssignNullable);
        let typ = self.parse_var_type()?;

        if self.check_and_consume(&TokenKind::Assign)?.is_some() {
            let Some(value) = self.try_parse_expression()? else {
                return Err(ParseError::InvalidRightExpression(self.current.clone()));
            };
            self.expect_and_consume(&TokenKind::Semicolon)?;

            return Ok(Some(DeclarationStatement {
                name,
                typ,
                nullable,
                mutable,
                value: Some(value),
                position: declare_token.position,
            }));
        }

        // variables may stay uninitialized only when declared with `let`
        // and marked nullable with `?:`
        if !mutable {
            return Err(ParseError::UninitializedConst(self.current.clone()));
        }

        if !nullable {
            return Err(ParseError::NotNullable(assign_token.position));
        }

        self.expect_and_consume(&TokenKind::Semicolon)?;

        Ok(Some(DeclarationStatement {
            name,
            typ,
            nullable,
            mutable,
            value: None,
            position: declare_token.position,
        }))
    }

    fn try_parse_while_loop(&mut self) -> ParseResult<Option<WhileLoopStatement>> {
        if self.check_and_consume(&TokenKind::While)?.is_none() {
            return Ok(None);
        }

        self.expect_and_consume(&TokenKind::LParen)?;

        let Some(condition) = self.try_parse_expression()? else {
            return Err(ParseError::WhileLoopMissingCondition(self.current.clone()));
        };

        self.expect_and_consume(&TokenKind::RParen)?;

        let Some(body) = self.try_parse_body()? else {
            return Err(ParseError::WhileLoopMissingBody(self.current.clone()));
        };

        Ok(Some(WhileLoopStatement {
            condition,
            body: Box::new(body),
        }))
    }

    /// One or more `( ... )` argument lists after a callable name; extra
    /// lists encode chained calls.
    fn try_parse_func_call(
        &mut self,
        name: String,
        position: Position,
    ) -> ParseResult<Option<FunctionCall>> {
        if self.check_and_consume(&TokenKind::LParen)?.is_none() {
            return Ok(None);
        }

        let mut arguments = vec![self.try_parse_arguments()?];
        self.expect_and_consume(&TokenKind::RParen)?;

        while self.check_and_consume(&TokenKind::LParen)?.is_some() {
            arguments.push(self.try_parse_arguments()?);
            self.expect_and_consume(&TokenKind::RParen)?;
        }

        Ok(Some(FunctionCall {
            name,
            arguments,
            position,
        }))
    }

    fn try_parse_arguments(&mut self) -> ParseResult<Vec<Expression>> {
        let Some(expression) = self.try_parse_expression()? else {
            return Ok(vec![]);
        };

        let mut expressions = vec![expression];

        while self.check_and_consume(&TokenKind::Comma)?.is_some() {
            let Some(expression) = self.try_parse_expression()? else {
                return Err(ParseError::MissingArgument(self.current.clone()));
            };
            expressions.push(expression);
        }

        Ok(expressions)
    }

    fn try_parse_return(&mut self) -> ParseResult<Option<ReturnStatement>> {
        if self.check_and_consume(&TokenKind::Return)?.is_none() {
            return Ok(None);
        }

        let expression = self.try_parse_expression()?;
        self.expect_and_consume(&TokenKind::Semicolon)?;

        Ok(Some(ReturnStatement { expression }))
    }

    fn try_parse_conditional(&mut self) -> ParseResult<Option<IfStatement>> {
        if self.check_and_consume(&TokenKind::If)?.is_none() {
            return Ok(None);
        }

        self.expect_and_consume(&TokenKind::LParen)?;

        let Some(condition) = self.try_parse_expression()? else {
            return Err(ParseError::InvalidConditionalExpression(self.current.clone()));
        };

        self.expect_and_consume(&TokenKind::RParen)?;

        let statement = self.try_parse_statement()?.map(Box::new);

        let mut elif_statements = vec![];
        while let Some(elif_statement) = self.try_parse_elif_statement()? {
            elif_statements.push(elif_statement);
        }

        let else_statement = self.try_parse_else_statement()?;

        Ok(Some(IfStatement {
            condition,
            statement,
            elif_statements,
            else_statement,
        }))
    }

    fn try_parse_elif_statement(&mut self) -> ParseResult<Option<ElifStatement>> {
        if self.check_and_consume(&TokenKind::Elif)?.is_none() {
            return Ok(None);
        }

        self.expect_and_consume(&TokenKind::LParen)?;

        let Some(condition) = self.try_parse_expression()? else {
            return Err(ParseError::InvalidConditionalExpression(self.current.clone()));
        };

        self.expect_and_consume(&TokenKind::RParen)?;

        let statement = self.try_parse_statement()?.map(Box::new);

        Ok(Some(ElifStatement {
            condition,
            statement,
        }))
    }

    fn try_parse_else_statement(&mut self) -> ParseResult<Option<ElseStatement>> {
        if self.check_and_consume(&TokenKind::Else)?.is_none() {
            return Ok(None);
        }

        let statement = self.try_parse_statement()?.map(Box::new);

        Ok(Some(ElseStatement { statement }))
    }

    /// Loosest level: `??`.
    fn try_parse_expression(&mut self) -> ParseResult<Option<Expression>> {
        let Some(mut left) = self.try_parse_or_expression()? else {
            return Ok(None);
        };

        while self.check_and_consume(&TokenKind::NullCoalesce)?.is_some() {
            let Some(right) = self.try_parse_or_expression()? else {
                return Err(ParseError::InvalidRightExpression(self.current.clone()));
            };
            left = BinaryExpression {
                left,
                operator: BinaryOperator::NullCoalesce,
                right,
            }
            .into();
        }

        Ok(Some(left))
    }

    fn try_parse_or_expression(&mut self) -> ParseResult<Option<Expression>> {
        let Some(mut left) = self.try_parse_and_expression()? else {
            return Ok(None);
        };

        while self.check_and_consume(&TokenKind::Or)?.is_some() {
            let Some(right) = self.try_parse_and_expression()? else {
                return Err(ParseError::InvalidRightExpression(self.current.clone()));
            };
            left = BinaryExpression {
                left,
                operator: BinaryOperator::Or,
                right,
            }
            .into();
        }

        Ok(Some(left))
    }

    fn try_parse_and_expression(&mut self) -> ParseResult<Option<Expression>> {
        let Some(mut left) = self.try_parse_equality_expression()? else {
            return Ok(None);
        };

        while self.check_and_consume(&TokenKind::And)?.is_some() {
            let Some(right) = self.try_parse_equality_expression()? else {
                return Err(ParseError::InvalidRightExpression(self.current.clone()));
            };
            left = BinaryExpression {
                left,
                operator: BinaryOperator::And,
                right,
            }
            .into();
        }

        Ok(Some(left))
    }

    fn try_parse_equality_expression(&mut self) -> ParseResult<Option<Expression>> {
        let Some(mut left) = self.try_parse_relational_expression()? else {
            return Ok(None);
        };

        while let Some(operator) =
            self.check_one_of_many_and_consume(&[TokenKind::Equal, TokenKind::NotEqual])?
        {
            let Some(right) = self.try_parse_relational_expression()? else {
                return Err(ParseError::InvalidRightExpression(self.current.clone()));
            };
            left = BinaryExpression {
                left,
                operator: match operator.kind {
                    TokenKind::Equal => BinaryOperator::Equal,
                    _ => BinaryOperator::NotEqual,
                },
                right,
            }
            .into();
        }

        Ok(Some(left))
    }

    fn try_parse_relational_expression(&mut self) -> ParseResult<Option<Expression>> {
        let Some(mut left) = self.try_parse_comp_factor()? else {
            return Ok(None);
        };

        while let Some(operator) = self.check_one_of_many_and_consume(&[
            TokenKind::GreaterThan,
            TokenKind::GreaterOrEqual,
            TokenKind::LessThan,
            TokenKind::LessOrEqual,
        ])? {
            let Some(right) = self.try_parse_comp_factor()? else {
                return Err(ParseError::InvalidRightExpression(self.current.clone()));
            };
            left = BinaryExpression {
                left,
                operator: match operator.kind {
                    TokenKind::GreaterThan => BinaryOperator::Greater,
                    TokenKind::GreaterOrEqual => BinaryOperator::GreaterOrEqual,
                    TokenKind::LessThan => BinaryOperator::Less,
                    _ => BinaryOperator::LessOrEqual,
                },
                right,
            }
            .into();
        }

        Ok(Some(left))
    }

    /// Optional logical `not` in front of an additive expression.
    fn try_parse_comp_factor(&mut self) -> ParseResult<Option<Expression>> {
        let not_token = self.check_and_consume(&TokenKind::Not)?;

        let Some(inner) = self.try_parse_additive_expression()? else {
            return Ok(None);
        };

        Ok(Some(match not_token {
            Some(_) => PrefixExpression {
                operator: PrefixOperator::Not,
                expression: Box::new(inner),
            }
            .into(),
            None => inner,
        }))
    }

    fn try_parse_additive_expression(&mut self) -> ParseResult<Option<Expression>> {
        let Some(mut left) = self.try_parse_multiplicative_expression()? else {
            return Ok(None);
        };

        while let Some(operator) =
            self.check_one_of_many_and_consume(&[TokenKind::Plus, TokenKind::Minus])?
        {
            let Some(right) = self.try_parse_multiplicative_expression()? else {
                return Err(ParseError::InvalidRightExpression(self.current.clone()));
            };
            left = BinaryExpression {
                left,
                operator: match operator.kind {
                    TokenKind::Plus => BinaryOperator::Plus,
                    _ => BinaryOperator::Minus,
                },
                right,
            }
            .into();
        }

        Ok(Some(left))
    }

    fn try_parse_multiplicative_expression(&mut self) -> ParseResult<Option<Expression>> {
        let Some(mut left) = self.try_parse_factor()? else {
            return Ok(None);
        };

        while let Some(operator) = self.check_one_of_many_and_consume(&[
            TokenKind::Times,
            TokenKind::Div,
            TokenKind::Modulo,
        ])? {
            let Some(right) = self.try_parse_factor()? else {
                return Err(ParseError::InvalidRightExpression(self.current.clone()));
            };
            left = BinaryExpression {
                left,
                operator: match operator.kind {
                    TokenKind::Times => BinaryOperator::Times,
                    TokenKind::Div => BinaryOperator::Div,
                    _ => BinaryOperator::Modulo,
                },
                right,
            }
            .into();
        }

        Ok(Some(left))
    }

    /// A factor is a literal, an identifier (possibly a call or the start of
    /// a lambda), or a parenthesized expression, optionally negated.
    fn try_parse_factor(&mut self) -> ParseResult<Option<Expression>> {
        let minus = self.check_and_consume(&TokenKind::Minus)?.is_some();

        if let Some(expression) = self.try_parse_literal()? {
            return Ok(Some(Self::negated(expression, minus)));
        }

        if let Some(expression) = self.try_parse_id_or_func_call_or_lambda()? {
            return Ok(Some(Self::negated(expression, minus)));
        }

        if let Some(expression) = self.try_parse_parenthesised_expression()? {
            return Ok(Some(Self::negated(expression, minus)));
        }

        Ok(None)
    }

    fn negated(expression: Expression, minus: bool) -> Expression {
        if minus {
            PrefixExpression {
                operator: PrefixOperator::Minus,
                expression: Box::new(expression),
            }
            .into()
        } else {
            expression
        }
    }

    fn try_parse_literal(&mut self) -> ParseResult<Option<Expression>> {
        let (typ, value) = match &self.current.kind {
            TokenKind::IntValue(value) => (Type::Integer, LiteralValue::Int(*value)),
            TokenKind::FloatValue(value) => (Type::Float, LiteralValue::Float(*value)),
            TokenKind::StrValue(value) => (Type::String, LiteralValue::Str(value.clone())),
            TokenKind::TrueValue => (Type::Bool, LiteralValue::Bool(true)),
            TokenKind::FalseValue => (Type::Bool, LiteralValue::Bool(false)),
            TokenKind::NullValue => (Type::Null, LiteralValue::Null),
            _ => return Ok(None),
        };

        let position = self.current.position;
        self.advance()?;

        Ok(Some(
            Literal {
                typ,
                value,
                position,
            }
            .into(),
        ))
    }

    fn try_parse_id_or_func_call_or_lambda(&mut self) -> ParseResult<Option<Expression>> {
        let TokenKind::Id(name) = &self.current.kind else {
            return Ok(None);
        };
        let name = name.clone();
        let position = self.current.position;
        self.advance()?;

        if let Some(func_call) = self.try_parse_func_call(name.clone(), position)? {
            return Ok(Some(func_call.into()));
        }

        // inside parens, `ID :` is the first parameter of a lambda
        if let Some(lambda) = self.try_parse_rest_of_lambda(name.clone(), position)? {
            return Ok(Some(lambda.into()));
        }

        Ok(Some(Identifier { name, position }.into()))
    }

    /// Continues a lambda whose opening parenthesis and first parameter name
    /// are already consumed. The closing parenthesis of the surrounding
    /// group belongs to the lambda's parameter list, so the caller must not
    /// expect it again.
    fn try_parse_rest_of_lambda(
        &mut self,
        first_parameter: String,
        position: Position,
    ) -> ParseResult<Option<LambdaExpression>> {
        if self.check_and_consume(&TokenKind::TypeAssign)?.is_none() {
            return Ok(None);
        }

        let typ = self.parse_var_type()?;

        let mut parameters = vec![Parameter {
            name: first_parameter,
            typ,
            nullable: false,
            position,
        }];

        while self.check_and_consume(&TokenKind::Comma)?.is_some() {
            let Some(parameter) = self.try_parse_parameter()? else {
                return Err(ParseError::MissingParameter(self.current.clone()));
            };
            parameters.push(parameter);
        }

        self.expect_and_consume(&TokenKind::RParen)?;
        self.expect_and_consume(&TokenKind::TypeAssign)?;

        let return_type = self.parse_return_type()?;

        self.expect_and_consume(&TokenKind::Arrow)?;

        let Some(body) = self.try_parse_func_body()? else {
            return Err(ParseError::MissingLambdaExpressionBody(self.current.clone()));
        };

        Ok(Some(LambdaExpression {
            parameters,
            return_type,
            body: Box::new(body),
            position,
        }))
    }

    fn try_parse_parenthesised_expression(&mut self) -> ParseResult<Option<Expression>> {
        let Some(lparen) = self.check_and_consume(&TokenKind::LParen)? else {
            return Ok(None);
        };

        // `) :` commits to a lambda without parameters
        if self.current.kind.loose_eq(&TokenKind::RParen)
            && self.next_is(&TokenKind::TypeAssign)?
        {
            self.advance()?;
            self.advance()?;

            let return_type = self.parse_return_type()?;
            self.expect_and_consume(&TokenKind::Arrow)?;

            let Some(body) = self.try_parse_func_body()? else {
                return Err(ParseError::MissingLambdaExpressionBody(self.current.clone()));
            };

            return Ok(Some(
                LambdaExpression {
                    parameters: vec![],
                    return_type,
                    body: Box::new(body),
                    position: lparen.position,
                }
                .into(),
            ));
        }

        let Some(expression) = self.try_parse_expression()? else {
            return Err(ParseError::InvalidRightExpression(self.current.clone()));
        };

        // a lambda that began as `( ID :` has consumed the closing
        // parenthesis already
        if matches!(expression, Expression::Lambda(_)) {
            return Ok(Some(expression));
        }

        self.expect_and_consume(&TokenKind::RParen)?;

        Ok(Some(Expression::Parens(Box::new(expression))))
    }

    fn advance(&mut self) -> ParseResult<()> {
        self.current = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.build_next_token()?,
        };

        Ok(())
    }

    /// Whether the token after the current one has the given kind.
    fn next_is(&mut self, kind: &TokenKind) -> ParseResult<bool> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.build_next_token()?);
        }

        Ok(matches!(&self.peeked, Some(token) if token.kind.loose_eq(kind)))
    }

    fn expect_id(&mut self) -> ParseResult<(String, Position)> {
        let TokenKind::Id(name) = &self.current.kind else {
            return Err(ParseError::UnexpectedToken {
                expected: "Id".into(),
                actual: self.current.clone(),
            });
        };
        let name = name.clone();
        let position = self.current.position;
        self.advance()?;

        Ok((name, position))
    }

    fn check_and_consume(&mut self, kind: &TokenKind) -> ParseResult<Option<Token>> {
        if !self.current.kind.loose_eq(kind) {
            return Ok(None);
        }

        let token = self.current.clone();
        self.advance()?;

        Ok(Some(token))
    }

    fn check_one_of_many_and_consume(&mut self, kinds: &[TokenKind]) -> ParseResult<Option<Token>> {
        if !kinds.iter().any(|kind| self.current.kind.loose_eq(kind)) {
            return Ok(None);
        }

        let token = self.current.clone();
        self.advance()?;

        Ok(Some(token))
    }

    fn expect_and_consume(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        match self.check_and_consume(kind)? {
            Some(token) => Ok(token),
            None => Err(ParseError::UnexpectedToken {
                expected: format!("{kind:?}"),
                actual: self.current.clone(),
            }),
        }
    }

    fn expect_one_of_many_and_consume(&mut self, kinds: &[TokenKind]) -> ParseResult<Token> {
        match self.check_one_of_many_and_consume(kinds)? {
            Some(token) => Ok(token),
            None => Err(ParseError::UnexpectedToken {
                expected: format!("{kinds:?}"),
                actual: self.current.clone(),
            }),
        }
    }
}
