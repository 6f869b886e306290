use thiserror::Error;

use crate::DotJsError;
use crate::analysis::{Diagnostic, DiagnosticCategory};
use crate::lexer::{LexError, Lexer, SpannedToken, Token};
use crate::parser::ast::*;

pub mod ast;

/// Deepest syntax tree the parser builds; anything deeper is a syntax error
pub const MAX_NESTING_DEPTH: usize = 100;

/// A syntax error, positioned in the source text
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
    pub code: u32,
}

impl ParseError {
    fn expected(what: &str, range: TextRange) -> Self {
        Self {
            message: format!("'{what}' expected."),
            range,
            code: 1005,
        }
    }

    fn identifier_expected(range: TextRange) -> Self {
        Self {
            message: "Identifier expected.".to_string(),
            range,
            code: 1003,
        }
    }

    fn expression_expected(range: TextRange) -> Self {
        Self {
            message: "Expression expected.".to_string(),
            range,
            code: 1109,
        }
    }

    fn type_expected(range: TextRange) -> Self {
        Self {
            message: "Type expected.".to_string(),
            range,
            code: 1110,
        }
    }

    fn nested_too_deeply(range: TextRange) -> Self {
        Self {
            message: format!("Nesting deeper than {MAX_NESTING_DEPTH} levels is not supported."),
            range,
            code: 1999,
        }
    }

    /// The error as a host diagnostic of `file_name`
    pub fn to_diagnostic(&self, file_name: &str) -> Diagnostic {
        Diagnostic {
            file_name: file_name.to_string(),
            start: self.range.start,
            length: self.range.len(),
            message: self.message.clone(),
            category: DiagnosticCategory::Error,
            source: None,
            code: self.code,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        let code = match &err {
            LexError::UnterminatedString { .. } => 1002,
            LexError::UnterminatedComment { .. } => 1010,
            LexError::UnexpectedCharacter { .. }
            | LexError::InvalidEscape { .. }
            | LexError::InvalidNumber { .. } => 1127,
        };
        Self {
            message: format!("{err}."),
            range: err.range(),
            code,
        }
    }
}

/// Parses a whole file, recovering from syntax errors.
///
/// A tree is always produced; statements that failed to parse are skipped
/// and reported in the returned error list.
pub fn parse_source_file(file_name: &str, text: &str) -> (SourceFile, Vec<ParseError>) {
    let mut parser = Parser::new(text);
    let statements = parser.parse_statement_list(&Token::EOF);
    let file = SourceFile {
        file_name: file_name.to_string(),
        text: text.to_string(),
        statements,
    };
    (file, parser.errors)
}

/// Like [`parse_source_file`] but fails on the first batch of syntax errors
pub fn parse(file_name: &str, text: &str) -> Result<SourceFile, DotJsError> {
    let (file, errors) = parse_source_file(file_name, text);
    if errors.is_empty() {
        Ok(file)
    } else {
        Err(DotJsError::Parse {
            file_name: file_name.to_string(),
            errors,
        })
    }
}

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: SpannedToken,
    previous_end: usize,
    errors: Vec<ParseError>,
    depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut parser = Parser {
            lexer: Lexer::new(source),
            current: SpannedToken {
                token: Token::EOF,
                range: TextRange::empty(0),
            },
            previous_end: 0,
            errors: Vec::new(),
            depth: 0,
        };
        parser.advance();
        parser
    }

    /// Moves to the next valid token, recording lexer errors on the way
    fn advance(&mut self) -> SpannedToken {
        loop {
            match self.lexer.next_token() {
                Ok(token) => {
                    let previous = std::mem::replace(&mut self.current, token);
                    self.previous_end = previous.range.end;
                    return previous;
                }
                Err(err) => self.errors.push(err.into()),
            }
        }
    }

    fn check(&self, token: &Token) -> bool {
        &self.current.token == token
    }

    fn at_eof(&self) -> bool {
        self.check(&Token::EOF)
    }

    fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, token: &Token, what: &str) -> Result<TextRange, ParseError> {
        if self.check(token) {
            Ok(self.advance().range)
        } else {
            Err(ParseError::expected(what, self.current.range))
        }
    }

    fn range_from(&self, start: usize) -> TextRange {
        TextRange::new(start, self.previous_end.max(start))
    }

    fn expect_identifier(&mut self) -> Result<Identifier, ParseError> {
        let text = match &self.current.token {
            Token::Identifier(name) => name.clone(),
            other => match other.keyword_identifier() {
                Some(keyword) => keyword.to_string(),
                None => return Err(ParseError::identifier_expected(self.current.range)),
            },
        };
        let range = self.advance().range;
        Ok(Identifier { text, range })
    }

    /// One level deeper into the tree
    fn descend(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::nested_too_deeply(self.current.range));
        }
        self.depth += 1;
        Ok(())
    }

    /// Runs `parse` one level deeper; levels entered inside it are released
    /// when it returns
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T, ParseError>) -> Result<T, ParseError> {
        let depth = self.depth;
        let result = match self.descend() {
            Ok(()) => parse(self),
            Err(err) => Err(err),
        };
        self.depth = depth;
        result
    }

    /// Skips tokens until a likely statement boundary
    fn synchronize(&mut self) {
        while !self.at_eof() {
            match self.current.token {
                Token::Semicolon => {
                    self.advance();
                    break;
                }
                Token::RightBrace
                | Token::Let
                | Token::Const
                | Token::Var
                | Token::Function
                | Token::Return
                | Token::If
                | Token::For
                | Token::While => break,
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn parse_statement_list(&mut self, terminator: &Token) -> Vec<Statement> {
        let mut statements = Vec::new();

        while !self.check(terminator) && !self.at_eof() {
            if self.match_token(&Token::Semicolon) {
                continue;
            }

            let start = self.current.range.start;
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    // always make progress, even on a token no statement can start with
                    if self.current.range.start == start && !self.at_eof() {
                        self.advance();
                    }
                    self.synchronize();
                }
            }
        }

        statements
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        self.nested(Self::parse_statement_at_depth)
    }

    fn parse_statement_at_depth(&mut self) -> Result<Statement, ParseError> {
        match &self.current.token {
            Token::Let | Token::Const | Token::Var => {
                let start = self.current.range.start;
                let list = self.parse_variable_declaration_list()?;
                self.match_token(&Token::Semicolon);
                Ok(Statement::Variable(VariableStatement {
                    list,
                    range: self.range_from(start),
                }))
            }
            Token::Function => self.parse_function_declaration().map(Statement::Function),
            Token::LeftBrace => self.parse_block().map(Statement::Block),
            Token::If => self.parse_if_statement(),
            Token::While => self.parse_while_statement(),
            Token::For => self.parse_for_statement(),
            Token::Return => self.parse_return_statement(),
            _ => {
                let start = self.current.range.start;
                let expression = self.parse_expression()?;
                self.match_token(&Token::Semicolon);
                Ok(Statement::Expression(ExpressionStatement {
                    expression,
                    range: self.range_from(start),
                }))
            }
        }
    }

    fn parse_variable_declaration_list(&mut self) -> Result<VariableDeclarationList, ParseError> {
        let keyword = self.advance();
        let kind = match keyword.token {
            Token::Let => DeclarationKind::Let,
            Token::Const => DeclarationKind::Const,
            _ => DeclarationKind::Var,
        };

        let mut declarations = vec![self.parse_variable_declaration(kind)?];
        while self.match_token(&Token::Comma) {
            declarations.push(self.parse_variable_declaration(kind)?);
        }

        Ok(VariableDeclarationList {
            kind,
            declarations,
            range: self.range_from(keyword.range.start),
        })
    }

    fn parse_variable_declaration(
        &mut self,
        kind: DeclarationKind,
    ) -> Result<VariableDeclaration, ParseError> {
        let name = self.expect_identifier()?;

        let type_annotation = if self.match_token(&Token::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let initializer = if self.match_token(&Token::Equal) {
            Some(self.parse_assignment()?)
        } else {
            None
        };

        Ok(VariableDeclaration {
            range: self.range_from(name.range.start),
            name,
            kind,
            type_annotation,
            initializer,
        })
    }

    fn parse_function_declaration(&mut self) -> Result<FunctionDeclaration, ParseError> {
        let start = self.advance().range.start; // 'function'
        let name = self.expect_identifier()?;

        self.consume(&Token::LeftParen, "(")?;
        let mut parameters = Vec::new();
        if !self.check(&Token::RightParen) {
            loop {
                parameters.push(self.parse_parameter()?);
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        self.consume(&Token::RightParen, ")")?;

        let return_type = if self.match_token(&Token::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let body = self.parse_block()?;

        Ok(FunctionDeclaration {
            name,
            parameters,
            return_type,
            body,
            range: self.range_from(start),
        })
    }

    fn parse_parameter(&mut self) -> Result<Parameter, ParseError> {
        let name = self.expect_identifier()?;
        let type_annotation = if self.match_token(&Token::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        Ok(Parameter {
            range: self.range_from(name.range.start),
            name,
            type_annotation,
        })
    }

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        let start = self.consume(&Token::LeftBrace, "{")?.start;
        let statements = self.parse_statement_list(&Token::RightBrace);
        self.consume(&Token::RightBrace, "}")?;

        Ok(Block {
            statements,
            range: self.range_from(start),
        })
    }

    fn parse_if_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.advance().range.start; // 'if'

        self.consume(&Token::LeftParen, "(")?;
        let condition = self.parse_expression()?;
        self.consume(&Token::RightParen, ")")?;

        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.match_token(&Token::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Statement::If(IfStatement {
            condition,
            then_branch,
            else_branch,
            range: self.range_from(start),
        }))
    }

    fn parse_while_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.advance().range.start; // 'while'

        self.consume(&Token::LeftParen, "(")?;
        let condition = self.parse_expression()?;
        self.consume(&Token::RightParen, ")")?;
        let body = Box::new(self.parse_statement()?);

        Ok(Statement::While(WhileStatement {
            condition,
            body,
            range: self.range_from(start),
        }))
    }

    fn parse_for_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.advance().range.start; // 'for'
        self.consume(&Token::LeftParen, "(")?;

        let initializer = match self.current.token {
            Token::Semicolon => None,
            Token::Let | Token::Const | Token::Var => Some(ForInitializer::Variables(
                self.parse_variable_declaration_list()?,
            )),
            _ => Some(ForInitializer::Expression(self.parse_expression()?)),
        };
        self.consume(&Token::Semicolon, ";")?;

        let condition = if self.check(&Token::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume(&Token::Semicolon, ";")?;

        let update = if self.check(&Token::RightParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume(&Token::RightParen, ")")?;

        let body = Box::new(self.parse_statement()?);

        Ok(Statement::For(ForStatement {
            initializer,
            condition,
            update,
            body,
            range: self.range_from(start),
        }))
    }

    fn parse_return_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.advance().range.start; // 'return'

        let value = match self.current.token {
            Token::Semicolon | Token::RightBrace | Token::EOF => None,
            _ => Some(self.parse_expression()?),
        };
        self.match_token(&Token::Semicolon);

        Ok(Statement::Return(ReturnStatement {
            value,
            range: self.range_from(start),
        }))
    }

    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expression, ParseError> {
        self.nested(Self::parse_assignment_at_depth)
    }

    fn parse_assignment_at_depth(&mut self) -> Result<Expression, ParseError> {
        let target = self.parse_conditional()?;

        let operator = match self.current.token {
            Token::Equal => AssignmentOperator::Simple,
            Token::PlusEqual => AssignmentOperator::Add,
            Token::MinusEqual => AssignmentOperator::Subtract,
            _ => return Ok(target),
        };

        if !matches!(
            target,
            Expression::Identifier(_)
                | Expression::PropertyAccess { .. }
                | Expression::ElementAccess { .. }
        ) {
            return Err(ParseError {
                message: "The left-hand side of an assignment expression must be a variable or a property access.".to_string(),
                range: target.range(),
                code: 2364,
            });
        }

        self.advance();
        let value = self.parse_assignment()?;
        let range = target.range().cover(value.range());

        Ok(Expression::Assignment {
            target: Box::new(target),
            operator,
            value: Box::new(value),
            range,
        })
    }

    fn parse_conditional(&mut self) -> Result<Expression, ParseError> {
        let condition = self.parse_binary(1)?;

        if !self.match_token(&Token::Question) {
            return Ok(condition);
        }

        let when_true = self.parse_assignment()?;
        self.consume(&Token::Colon, ":")?;
        let when_false = self.parse_assignment()?;
        let range = condition.range().cover(when_false.range());

        Ok(Expression::Conditional {
            condition: Box::new(condition),
            when_true: Box::new(when_true),
            when_false: Box::new(when_false),
            range,
        })
    }

    /// Precedence climbing over all binary operators
    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expression, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some((operator, precedence)) = binary_operator(&self.current.token) {
            if precedence < min_precedence {
                break;
            }
            self.descend()?;
            self.advance();

            let right = self.nested(|parser| parser.parse_binary(precedence + 1))?;
            let range = left.range().cover(right.range());
            left = Expression::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
                range,
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        let start = self.current.range.start;

        let operator = match self.current.token {
            Token::Not => UnaryOperator::Not,
            Token::Minus => UnaryOperator::Negative,
            Token::Plus => UnaryOperator::Positive,
            Token::Typeof => {
                self.advance();
                let operand = self.nested(Self::parse_unary)?;
                return Ok(Expression::TypeOf {
                    operand: Box::new(operand),
                    range: self.range_from(start),
                });
            }
            _ => return self.parse_call(),
        };

        self.advance();
        let operand = self.nested(Self::parse_unary)?;

        Ok(Expression::Unary {
            operator,
            operand: Box::new(operand),
            range: self.range_from(start),
        })
    }

    fn parse_call(&mut self) -> Result<Expression, ParseError> {
        let start = self.current.range.start;
        let mut expr = self.parse_primary()?;

        loop {
            if matches!(
                self.current.token,
                Token::LeftParen | Token::Dot | Token::LeftBracket
            ) {
                self.descend()?;
            }

            if self.match_token(&Token::LeftParen) {
                let arguments = self.parse_expression_list(&Token::RightParen)?;
                self.consume(&Token::RightParen, ")")?;
                expr = Expression::Call {
                    callee: Box::new(expr),
                    arguments,
                    range: self.range_from(start),
                };
            } else if self.match_token(&Token::Dot) {
                let name = self.expect_identifier()?;
                expr = Expression::PropertyAccess {
                    object: Box::new(expr),
                    name,
                    range: self.range_from(start),
                };
            } else if self.match_token(&Token::LeftBracket) {
                let index = self.parse_expression()?;
                self.consume(&Token::RightBracket, "]")?;
                expr = Expression::ElementAccess {
                    object: Box::new(expr),
                    index: Box::new(index),
                    range: self.range_from(start),
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Comma separated expressions up to (not including) `terminator`,
    /// allowing a trailing comma
    fn parse_expression_list(&mut self, terminator: &Token) -> Result<Vec<Expression>, ParseError> {
        let mut expressions = Vec::new();

        while !self.check(terminator) {
            expressions.push(self.parse_assignment()?);
            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        Ok(expressions)
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let range = self.current.range;

        match &self.current.token {
            Token::NumberLiteral(value) => {
                let value = *value;
                self.advance();
                Ok(Expression::NumericLiteral { value, range })
            }
            Token::StringLiteral(value) => {
                let value = value.clone();
                self.advance();
                Ok(Expression::StringLiteral { value, range })
            }
            Token::True | Token::False => {
                let value = self.check(&Token::True);
                self.advance();
                Ok(Expression::BooleanLiteral { value, range })
            }
            Token::Null => {
                self.advance();
                Ok(Expression::Null { range })
            }
            Token::LeftParen => {
                self.advance();
                let expression = self.parse_expression()?;
                self.consume(&Token::RightParen, ")")?;
                Ok(Expression::Parenthesized {
                    expression: Box::new(expression),
                    range: self.range_from(range.start),
                })
            }
            Token::LeftBracket => {
                self.advance();
                let elements = self.parse_expression_list(&Token::RightBracket)?;
                self.consume(&Token::RightBracket, "]")?;
                Ok(Expression::ArrayLiteral {
                    elements,
                    range: self.range_from(range.start),
                })
            }
            token if matches!(token, Token::Identifier(_)) || token.keyword_identifier().is_some() => {
                self.expect_identifier().map(Expression::Identifier)
            }
            _ => Err(ParseError::expression_expected(range)),
        }
    }

    fn parse_type(&mut self) -> Result<TypeNode, ParseError> {
        self.nested(Self::parse_type_at_depth)
    }

    fn parse_type_at_depth(&mut self) -> Result<TypeNode, ParseError> {
        let start = self.current.range.start;
        let first = self.parse_array_type()?;

        if !self.check(&Token::BitwiseOr) {
            return Ok(first);
        }

        let mut types = vec![first];
        while self.match_token(&Token::BitwiseOr) {
            types.push(self.parse_array_type()?);
        }

        Ok(TypeNode::Union {
            types,
            range: self.range_from(start),
        })
    }

    fn parse_array_type(&mut self) -> Result<TypeNode, ParseError> {
        let start = self.current.range.start;
        let mut ty = self.parse_primary_type()?;

        while self.check(&Token::LeftBracket) {
            self.descend()?;
            self.advance();
            self.consume(&Token::RightBracket, "]")?;
            ty = TypeNode::Array {
                element: Box::new(ty),
                range: self.range_from(start),
            };
        }

        Ok(ty)
    }

    fn parse_primary_type(&mut self) -> Result<TypeNode, ParseError> {
        let range = self.current.range;

        let keyword = match &self.current.token {
            Token::Boolean => TypeKeyword::Boolean,
            Token::Number => TypeKeyword::Number,
            Token::String => TypeKeyword::String,
            Token::Any => TypeKeyword::Any,
            Token::Unknown => TypeKeyword::Unknown,
            Token::Void => TypeKeyword::Void,
            Token::Never => TypeKeyword::Never,
            Token::Object => TypeKeyword::Object,
            Token::Null => TypeKeyword::Null,
            Token::Identifier(name) if name == "undefined" => TypeKeyword::Undefined,
            Token::True | Token::False => {
                let value = self.check(&Token::True);
                self.advance();
                return Ok(TypeNode::Literal { value, range });
            }
            Token::Identifier(_) => return self.expect_identifier().map(TypeNode::Reference),
            Token::LeftParen => {
                self.advance();
                let ty = self.parse_type()?;
                self.consume(&Token::RightParen, ")")?;
                return Ok(ty);
            }
            _ => return Err(ParseError::type_expected(range)),
        };

        self.advance();
        Ok(TypeNode::Keyword { keyword, range })
    }
}

fn binary_operator(token: &Token) -> Option<(BinaryOperator, u8)> {
    let entry = match token {
        Token::Or => (BinaryOperator::Or, 1),
        Token::QuestionQuestion => (BinaryOperator::Coalesce, 1),
        Token::And => (BinaryOperator::And, 2),
        Token::BitwiseOr => (BinaryOperator::BitwiseOr, 3),
        Token::BitwiseXor => (BinaryOperator::BitwiseXor, 4),
        Token::BitwiseAnd => (BinaryOperator::BitwiseAnd, 5),
        Token::EqualEqual => (BinaryOperator::Equal, 6),
        Token::NotEqual => (BinaryOperator::NotEqual, 6),
        Token::EqualEqualEqual => (BinaryOperator::StrictEqual, 6),
        Token::NotEqualEqual => (BinaryOperator::StrictNotEqual, 6),
        Token::Less => (BinaryOperator::LessThan, 7),
        Token::LessEqual => (BinaryOperator::LessThanOrEqual, 7),
        Token::Greater => (BinaryOperator::GreaterThan, 7),
        Token::GreaterEqual => (BinaryOperator::GreaterThanOrEqual, 7),
        Token::LeftShift => (BinaryOperator::LeftShift, 8),
        Token::RightShift => (BinaryOperator::RightShift, 8),
        Token::Plus => (BinaryOperator::Add, 9),
        Token::Minus => (BinaryOperator::Subtract, 9),
        Token::Star => (BinaryOperator::Multiply, 10),
        Token::Slash => (BinaryOperator::Divide, 10),
        Token::Percent => (BinaryOperator::Modulo, 10),
        _ => return None,
    };
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SOURCE: &str = r#"
// comments should be ignored
let isReady = true;
const limit: number = 10, isLarge = limit > 5;

function isEven(n: number): boolean {
    return n % 2 === 0;
}

function main() {
    let total = 0;
    for (let i = 0; i < limit; i += 1) {
        if (isEven(i)) {
            total = total + i;
        } else {
            total -= 1;
        }
    }
    while (total > 100) total = total / 2
    return total;
}
"#;

    fn parse_ok(text: &str) -> SourceFile {
        let (file, errors) = parse_source_file("test.ts", text);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        file
    }

    #[test]
    fn test_parser() {
        let file = parse_ok(TEST_SOURCE);
        assert_eq!(file.statements.len(), 4);

        let Statement::Variable(var_stmt) = &file.statements[1] else {
            panic!("expected a variable statement");
        };
        assert_eq!(var_stmt.list.kind, DeclarationKind::Const);
        let names: Vec<_> = var_stmt
            .list
            .declarations
            .iter()
            .map(|d| d.name.text.as_str())
            .collect();
        assert_eq!(names, ["limit", "isLarge"]);
        assert!(var_stmt.list.declarations[0].type_annotation.is_some());
    }

    #[test]
    fn declaration_range_starts_at_name() {
        let text = "let isReady = 1;";
        let file = parse_ok(text);
        let Statement::Variable(var_stmt) = &file.statements[0] else {
            panic!("expected a variable statement");
        };
        let decl = &var_stmt.list.declarations[0];
        assert_eq!(file.slice(decl.name.range), "isReady");
        assert_eq!(file.slice(decl.range), "isReady = 1");
        assert_eq!(file.slice(var_stmt.range), text);
    }

    #[test]
    fn binary_precedence() {
        let file = parse_ok("let x = 1 + 2 * 3 === 7 && ok;");
        let Statement::Variable(var_stmt) = &file.statements[0] else {
            panic!("expected a variable statement");
        };
        let Some(Expression::Binary { operator, left, .. }) =
            &var_stmt.list.declarations[0].initializer
        else {
            panic!("expected a binary initializer");
        };
        assert_eq!(*operator, BinaryOperator::And);
        assert!(matches!(
            **left,
            Expression::Binary {
                operator: BinaryOperator::StrictEqual,
                ..
            }
        ));
    }

    #[test]
    fn union_and_array_types() {
        let file = parse_ok("let isOpen: boolean | undefined; let xs: number[] = [1, 2,];");
        let Statement::Variable(first) = &file.statements[0] else {
            panic!("expected a variable statement");
        };
        assert!(matches!(
            first.list.declarations[0].type_annotation,
            Some(TypeNode::Union { ref types, .. }) if types.len() == 2
        ));
        let Statement::Variable(second) = &file.statements[1] else {
            panic!("expected a variable statement");
        };
        assert!(matches!(
            second.list.declarations[0].type_annotation,
            Some(TypeNode::Array { .. })
        ));
    }

    #[test]
    fn recovers_after_syntax_error() {
        let (file, errors) = parse_source_file("bad.ts", "let = 3;\nlet isOk = 1;\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, 1003);
        assert_eq!(file.statements.len(), 1);
    }

    #[test]
    fn stray_closing_brace_does_not_stall() {
        let (file, errors) = parse_source_file("bad.ts", "} let a = 1;");
        assert_eq!(errors.len(), 1);
        assert_eq!(file.statements.len(), 1);
    }

    #[test]
    fn lexer_errors_become_parse_errors() {
        let (file, errors) = parse_source_file("bad.ts", "let a = 1 # 2;\nlet b = 2;");
        assert!(errors.iter().any(|e| e.code == 1127));
        assert!(!file.statements.is_empty());
    }

    #[test]
    fn invalid_assignment_target() {
        let (_, errors) = parse_source_file("bad.ts", "1 = 2;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, 2364);
    }

    #[test]
    fn strict_parse_reports_all_errors() {
        let err = parse("broken.ts", "function (").unwrap_err();
        let DotJsError::Parse { file_name, errors } = err else {
            panic!("expected a parse error");
        };
        assert_eq!(file_name, "broken.ts");
        assert!(!errors.is_empty());

        let diagnostic = errors[0].to_diagnostic(&file_name);
        assert_eq!(diagnostic.code, errors[0].code);
        assert_eq!(diagnostic.start, errors[0].range.start);
        assert_eq!(diagnostic.source, None);
        assert_eq!(diagnostic.category, DiagnosticCategory::Error);
    }

    fn depth_errors(errors: &[ParseError]) -> usize {
        errors.iter().filter(|e| e.code == 1999).count()
    }

    #[test]
    fn deep_parentheses_are_a_syntax_error() {
        let depth = 10_000;
        let text = format!("let isX = {}1{};\nlet after = 1;", "(".repeat(depth), ")".repeat(depth));
        let (file, errors) = parse_source_file("deep.ts", &text);

        assert_eq!(errors.len(), 1);
        assert_eq!(depth_errors(&errors), 1);
        assert!(errors[0].message.contains("100"));
        assert_eq!(file.statements.len(), 1);
    }

    #[test]
    fn nesting_below_the_limit_parses() {
        let text = format!("let isX = {}1{};", "(".repeat(50), ")".repeat(50));
        let file = parse_ok(&text);
        assert_eq!(file.statements.len(), 1);
    }

    #[test]
    fn deep_unary_and_binary_chains_are_bounded() {
        let (_, errors) = parse_source_file("deep.ts", &format!("let a = {}b;", "!".repeat(10_000)));
        assert_eq!(depth_errors(&errors), 1);

        let (_, errors) = parse_source_file("deep.ts", &format!("let a = 1{};", " + 1".repeat(10_000)));
        assert_eq!(depth_errors(&errors), 1);

        let (_, errors) = parse_source_file("deep.ts", &format!("let a = b{};", ".c".repeat(10_000)));
        assert_eq!(depth_errors(&errors), 1);

        let (_, errors) = parse_source_file("deep.ts", &format!("let a: number{};", "[]".repeat(10_000)));
        assert_eq!(depth_errors(&errors), 1);
    }

    #[test]
    fn deep_blocks_do_not_overflow() {
        let depth = 10_000;
        let text = format!("{}let a = 1;{}", "{".repeat(depth), "}".repeat(depth));
        let (_, errors) = parse_source_file("deep.ts", &text);
        assert_eq!(errors[0].code, 1999);
        assert!(depth_errors(&errors) <= 2);
    }
}
