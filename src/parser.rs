// ABOUTME: Pratt parser turning a token stream into an AST plus a list of error strings

use crate::ast::{
    ArrayLiteral, BlockStatement, CallExpression, Expression, ExpressionStatement, ForExpression,
    FunctionLiteral, HashLiteral, Identifier, IfExpression, InfixExpression, LetStatement,
    PrefixExpression, Program, ReturnStatement, Statement, WhileExpression,
};
use crate::lexer::Lexer;
use crate::token::{Token, TokenType};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
enum Precedence {
    Lowest,
    Equals,      // == !=
    LessGreater, // > <
    Sum,         // + -
    Product,     // * /
    Prefix,      // -x or !x
    Call,        // foo(x)
}

fn precedence_of(kind: TokenType) -> Precedence {
    match kind {
        TokenType::Eq | TokenType::NotEq => Precedence::Equals,
        TokenType::Lt | TokenType::Gt => Precedence::LessGreater,
        TokenType::Plus | TokenType::Minus => Precedence::Sum,
        TokenType::Slash | TokenType::Asterisk => Precedence::Product,
        TokenType::LParen => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

/// A hand-written recursive-descent / Pratt parser. Tokenizes eagerly up front rather
/// than pulling from the lexer lazily, so `peek`/`advance` are simple index bumps.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<String>,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token();
            let is_eof = tok.kind == TokenType::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Parser {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    pub fn parse_program(mut self) -> (Program, Vec<String>) {
        let mut statements = Vec::new();
        while self.current().kind != TokenType::Eof {
            match self.parse_statement() {
                Some(stmt) => statements.push(stmt),
                None => {}
            }
            self.advance();
        }
        (Program { statements }, self.errors)
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos + 1).unwrap_or(&self.tokens[self.tokens.len() - 1])
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn current_is(&self, kind: TokenType) -> bool {
        self.current().kind == kind
    }

    fn peek_is(&self, kind: TokenType) -> bool {
        self.peek().kind == kind
    }

    /// Advances past the peeked token if it matches, else records an error and leaves
    /// the cursor where it was.
    fn expect_peek(&mut self, kind: TokenType) -> bool {
        if self.peek_is(kind) {
            self.advance();
            true
        } else {
            self.errors.push(format!(
                "expected next token to be {:?}, got {:?} instead",
                kind,
                self.peek().kind
            ));
            false
        }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current().kind {
            TokenType::Let => self.parse_let_statement(),
            TokenType::Return => self.parse_return_statement(),
            TokenType::Break => self.parse_break_statement(),
            TokenType::Continue => self.parse_continue_statement(),
            TokenType::Print => self.parse_print_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_break_statement(&mut self) -> Option<Statement> {
        let token = self.current().clone();

        if self.peek_is(TokenType::Semicolon) {
            self.advance();
        }

        Some(Statement::Break(token))
    }

    fn parse_continue_statement(&mut self) -> Option<Statement> {
        let token = self.current().clone();

        if self.peek_is(TokenType::Semicolon) {
            self.advance();
        }

        Some(Statement::Continue(token))
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        let token = self.current().clone();

        if !self.expect_peek(TokenType::Id) {
            return None;
        }
        let name = Identifier {
            token: self.current().clone(),
            value: self.current().literal.clone(),
        };

        if !self.expect_peek(TokenType::Assign) {
            return None;
        }
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenType::Semicolon) {
            self.advance();
        }

        Some(Statement::Let(LetStatement { token, name, value }))
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let token = self.current().clone();
        self.advance();

        let value = if self.current_is(TokenType::Semicolon) {
            None
        } else {
            self.parse_expression(Precedence::Lowest)
        };

        if self.peek_is(TokenType::Semicolon) {
            self.advance();
        }

        Some(Statement::Return(ReturnStatement { token, value }))
    }

    /// `print <expr>;` lowers to a call of the `print` built-in — see DESIGN.md for why
    /// this stays a single call mechanism instead of a dedicated AST node.
    fn parse_print_statement(&mut self) -> Option<Statement> {
        let token = self.current().clone();
        self.advance();

        let mut arguments = Vec::new();
        if let Some(first) = self.parse_expression(Precedence::Lowest) {
            arguments.push(first);
        }
        while self.peek_is(TokenType::Comma) {
            self.advance();
            self.advance();
            if let Some(arg) = self.parse_expression(Precedence::Lowest) {
                arguments.push(arg);
            }
        }

        if self.peek_is(TokenType::Semicolon) {
            self.advance();
        }

        let call = Expression::Call(CallExpression {
            token: token.clone(),
            function: Box::new(Expression::Identifier(Identifier {
                token: token.clone(),
                value: "print".to_string(),
            })),
            arguments,
        });

        Some(Statement::Expression(ExpressionStatement {
            token,
            expression: call,
        }))
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.current().clone();
        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenType::Semicolon) {
            self.advance();
        }

        Some(Statement::Expression(ExpressionStatement { token, expression }))
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let token = self.current().clone();
        let mut statements = Vec::new();
        self.advance();

        while !self.current_is(TokenType::RBrace) && !self.current_is(TokenType::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.advance();
        }

        BlockStatement { token, statements }
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenType::Semicolon) && precedence < precedence_of(self.peek().kind)
        {
            match self.peek().kind {
                TokenType::Plus
                | TokenType::Minus
                | TokenType::Slash
                | TokenType::Asterisk
                | TokenType::Eq
                | TokenType::NotEq
                | TokenType::Lt
                | TokenType::Gt => {
                    self.advance();
                    left = self.parse_infix_expression(left)?;
                }
                TokenType::LParen => {
                    self.advance();
                    left = self.parse_call_expression(left)?;
                }
                _ => return Some(left),
            }
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.current().kind {
            TokenType::Id if self.current().literal == "for" => self.parse_for_expression(),
            TokenType::Id => Some(Expression::Identifier(Identifier {
                token: self.current().clone(),
                value: self.current().literal.clone(),
            })),
            TokenType::Int => self.parse_integer_literal(),
            TokenType::String => Some(Expression::StringLiteral {
                token: self.current().clone(),
                value: self.current().literal.clone(),
            }),
            TokenType::True | TokenType::False => Some(Expression::Boolean {
                token: self.current().clone(),
                value: self.current_is(TokenType::True),
            }),
            TokenType::Bang | TokenType::Minus => self.parse_prefix_expression(),
            TokenType::LParen => self.parse_grouped_expression(),
            TokenType::If => self.parse_if_expression(),
            TokenType::Function => self.parse_function_literal(),
            TokenType::While => self.parse_while_expression(),
            TokenType::LBracket => self.parse_array_literal(),
            TokenType::LBrace => self.parse_hash_literal(),
            other => {
                self.errors
                    .push(format!("no prefix parse function for {:?} found", other));
                None
            }
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.current().clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::IntegerLiteral { token, value }),
            Err(_) => {
                self.errors
                    .push(format!("could not parse {:?} as integer", token.literal));
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.current().clone();
        let operator = token.literal.clone();
        self.advance();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix(PrefixExpression {
            token,
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.current().clone();
        let operator = token.literal.clone();
        let precedence = precedence_of(token.kind);
        self.advance();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix(InfixExpression {
            token,
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.advance();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        Some(expr)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        let token = self.current().clone();

        if !self.expect_peek(TokenType::LParen) {
            return None;
        }
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        if !self.expect_peek(TokenType::LBrace) {
            return None;
        }
        let consequence = self.parse_block_statement();

        let alternative = if self.peek_is(TokenType::Else) {
            self.advance();
            if !self.expect_peek(TokenType::LBrace) {
                return None;
            }
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expression::If(IfExpression {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        }))
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let token = self.current().clone();

        if !self.expect_peek(TokenType::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenType::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Expression::Function(FunctionLiteral {
            token,
            parameters,
            body,
        }))
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut identifiers = Vec::new();

        if self.peek_is(TokenType::RParen) {
            self.advance();
            return Some(identifiers);
        }

        self.advance();
        identifiers.push(Identifier {
            token: self.current().clone(),
            value: self.current().literal.clone(),
        });

        while self.peek_is(TokenType::Comma) {
            self.advance();
            self.advance();
            identifiers.push(Identifier {
                token: self.current().clone(),
                value: self.current().literal.clone(),
            });
        }

        if !self.expect_peek(TokenType::RParen) {
            return None;
        }

        Some(identifiers)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let token = self.current().clone();
        let arguments = self.parse_expression_list(TokenType::RParen)?;
        Some(Expression::Call(CallExpression {
            token,
            function: Box::new(function),
            arguments,
        }))
    }

    fn parse_expression_list(&mut self, end: TokenType) -> Option<Vec<Expression>> {
        let mut list = Vec::new();

        if self.peek_is(end) {
            self.advance();
            return Some(list);
        }

        self.advance();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenType::Comma) {
            self.advance();
            self.advance();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }

    fn parse_while_expression(&mut self) -> Option<Expression> {
        let token = self.current().clone();

        if !self.expect_peek(TokenType::LParen) {
            return None;
        }
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        if !self.expect_peek(TokenType::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Expression::While(WhileExpression {
            token,
            condition: Box::new(condition),
            body,
        }))
    }

    /// `for (init; cond; step) { body }` — initializer and step are both optional.
    ///
    /// `for` is not a reserved word in the token set (see token.rs), so it's dispatched
    /// from `parse_prefix` by the literal text of a plain `Id` token, the same way
    /// `parse_prefix` recognizes any other expression form — this keeps `for` usable as
    /// an expression anywhere `while` is, not just as a bare statement.
    fn parse_for_expression(&mut self) -> Option<Expression> {
        let token = self.current().clone();

        if !self.expect_peek(TokenType::LParen) {
            return None;
        }
        self.advance();

        let initializer = if self.current_is(TokenType::Semicolon) {
            None
        } else {
            let stmt = self.parse_statement()?;
            Some(Box::new(stmt))
        };
        if !self.current_is(TokenType::Semicolon) {
            self.advance();
        }
        self.advance();

        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenType::Semicolon) {
            return None;
        }
        self.advance();

        let step = if self.current_is(TokenType::RParen) {
            None
        } else {
            let stmt = self.parse_statement()?;
            let step = Some(Box::new(stmt));
            if !self.expect_peek(TokenType::RParen) {
                return None;
            }
            step
        };

        if !self.current_is(TokenType::RParen) {
            self.errors.push(format!(
                "expected next token to be {:?}, got {:?} instead",
                TokenType::RParen,
                self.current().kind
            ));
            return None;
        }
        if !self.expect_peek(TokenType::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Expression::For(ForExpression {
            token,
            initializer,
            condition: Box::new(condition),
            step,
            body,
        }))
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let token = self.current().clone();
        let elements = self.parse_expression_list(TokenType::RBracket)?;
        Some(Expression::Array(ArrayLiteral { token, elements }))
    }

    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let token = self.current().clone();
        let mut pairs = Vec::new();

        while !self.peek_is(TokenType::RBrace) {
            self.advance();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(TokenType::Colon) {
                return None;
            }
            self.advance();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.peek_is(TokenType::RBrace) && !self.expect_peek(TokenType::Comma) {
                return None;
            }
        }

        if !self.expect_peek(TokenType::RBrace) {
            return None;
        }

        Some(Expression::Hash(HashLiteral { token, pairs }))
    }
}

/// Parses a complete program, returning the AST and any parse error strings.
pub fn parse(input: &str) -> (Program, Vec<String>) {
    Parser::new(input).parse_program()
}
