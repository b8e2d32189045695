// ABOUTME: Abstract syntax tree node taxonomy shared by evaluator and compiler

use std::fmt;

use crate::token::Token;

/// Capability every statement and expression node reports: its first token's literal
/// text (used for diagnostics) and a pretty-printed textual form.
pub trait Node: fmt::Display {
    fn token_literal(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Node for Program {
    fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map(|s| s.token_literal())
            .unwrap_or("")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

impl Node for Identifier {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub token: Token,
    pub name: Identifier,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub token: Token,
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub token: Token,
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl Node for BlockStatement {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Break(Token),
    Continue(Token),
    Expression(ExpressionStatement),
    Block(BlockStatement),
}

impl Node for Statement {
    fn token_literal(&self) -> &str {
        match self {
            Statement::Let(s) => &s.token.literal,
            Statement::Return(s) => &s.token.literal,
            Statement::Break(t) => &t.literal,
            Statement::Continue(t) => &t.literal,
            Statement::Expression(s) => &s.token.literal,
            Statement::Block(s) => s.token_literal(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(s) => {
                write!(f, "{} {} = ", s.token.literal, s.name)?;
                write!(f, "{}", s.value)?;
                write!(f, ";")
            }
            Statement::Return(s) => {
                write!(f, "{} ", s.token.literal)?;
                if let Some(value) = &s.value {
                    write!(f, "{}", value)?;
                }
                write!(f, ";")
            }
            Statement::Break(t) => write!(f, "{}", t.literal),
            Statement::Continue(t) => write!(f, "{}", t.literal),
            Statement::Expression(s) => write!(f, "{}", s.expression),
            Statement::Block(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpression {
    pub token: Token,
    pub operator: String,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpression {
    pub token: Token,
    pub left: Box<Expression>,
    pub operator: String,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpression {
    pub token: Token,
    pub condition: Box<Expression>,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub token: Token,
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub token: Token,
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForExpression {
    pub token: Token,
    pub initializer: Option<Box<Statement>>,
    pub condition: Box<Expression>,
    /// A statement, not a bare expression: the language has no assignment-expression
    /// operator, so the idiomatic way to advance a loop variable is a re-`let` in the
    /// loop's per-duration environment (see evaluator loop semantics).
    pub step: Option<Box<Statement>>,
    pub body: BlockStatement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileExpression {
    pub token: Token,
    pub condition: Box<Expression>,
    pub body: BlockStatement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub token: Token,
    pub elements: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashLiteral {
    pub token: Token,
    pub pairs: Vec<(Expression, Expression)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral { token: Token, value: i64 },
    FloatLiteral { token: Token, value: f64 },
    StringLiteral { token: Token, value: String },
    Boolean { token: Token, value: bool },
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    If(IfExpression),
    Function(FunctionLiteral),
    Call(CallExpression),
    For(ForExpression),
    While(WhileExpression),
    Array(ArrayLiteral),
    Hash(HashLiteral),
}

impl Node for Expression {
    fn token_literal(&self) -> &str {
        match self {
            Expression::Identifier(e) => &e.token.literal,
            Expression::IntegerLiteral { token, .. } => &token.literal,
            Expression::FloatLiteral { token, .. } => &token.literal,
            Expression::StringLiteral { token, .. } => &token.literal,
            Expression::Boolean { token, .. } => &token.literal,
            Expression::Prefix(e) => &e.token.literal,
            Expression::Infix(e) => &e.token.literal,
            Expression::If(e) => &e.token.literal,
            Expression::Function(e) => &e.token.literal,
            Expression::Call(e) => &e.token.literal,
            Expression::For(e) => &e.token.literal,
            Expression::While(e) => &e.token.literal,
            Expression::Array(e) => &e.token.literal,
            Expression::Hash(e) => &e.token.literal,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(e) => write!(f, "{}", e.value),
            Expression::IntegerLiteral { token, .. } => write!(f, "{}", token.literal),
            Expression::FloatLiteral { token, .. } => write!(f, "{}", token.literal),
            Expression::StringLiteral { token, .. } => write!(f, "{}", token.literal),
            Expression::Boolean { token, .. } => write!(f, "{}", token.literal),
            Expression::Prefix(e) => write!(f, "({}{})", e.operator, e.right),
            Expression::Infix(e) => write!(f, "({} {} {})", e.left, e.operator, e.right),
            Expression::If(e) => {
                write!(f, "if{} {}", e.condition, e.consequence)?;
                if let Some(alt) = &e.alternative {
                    write!(f, "else {}", alt)?;
                }
                Ok(())
            }
            Expression::Function(e) => {
                let params: Vec<String> = e.parameters.iter().map(|p| p.to_string()).collect();
                write!(
                    f,
                    "{}({}) {}",
                    e.token.literal,
                    params.join(", "),
                    e.body
                )
            }
            Expression::Call(e) => {
                let args: Vec<String> = e.arguments.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", e.function, args.join(", "))
            }
            Expression::For(e) => {
                write!(f, "for ")?;
                if let Some(init) = &e.initializer {
                    write!(f, "{}", init)?;
                }
                write!(f, "; {}; ", e.condition)?;
                if let Some(step) = &e.step {
                    write!(f, "{}", step)?;
                }
                write!(f, " {}", e.body)
            }
            Expression::While(e) => write!(f, "while{} {}", e.condition, e.body),
            Expression::Array(e) => {
                let elements: Vec<String> = e.elements.iter().map(|el| el.to_string()).collect();
                write!(f, "[{}]", elements.join(", "))
            }
            Expression::Hash(e) => {
                let pairs: Vec<String> = e
                    .pairs
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect();
                write!(f, "{{{}}}", pairs.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    #[test]
    fn program_display_matches_source_shape() {
        let program = Program {
            statements: vec![Statement::Let(LetStatement {
                token: Token::new(TokenType::Let, "let"),
                name: Identifier {
                    token: Token::new(TokenType::Id, "myVar"),
                    value: "myVar".to_string(),
                },
                value: Expression::Identifier(Identifier {
                    token: Token::new(TokenType::Id, "anotherVar"),
                    value: "anotherVar".to_string(),
                }),
            })],
        };

        assert_eq!(program.to_string(), "let myVar = anotherVar;");
    }

    #[test]
    fn token_literal_of_empty_program_is_empty() {
        let program = Program { statements: vec![] };
        assert_eq!(program.token_literal(), "");
    }

    #[test]
    fn infix_expression_displays_with_parens() {
        let expr = Expression::Infix(InfixExpression {
            token: Token::new(TokenType::Plus, "+"),
            left: Box::new(Expression::IntegerLiteral {
                token: Token::new(TokenType::Int, "1"),
                value: 1,
            }),
            operator: "+".to_string(),
            right: Box::new(Expression::IntegerLiteral {
                token: Token::new(TokenType::Int, "2"),
                value: 2,
            }),
        });
        assert_eq!(expr.to_string(), "(1 + 2)");
    }
}
