// ABOUTME: Lexer module turning source text into a stream of tokens

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, tag, take_while, take_while1},
    character::complete::{char, digit1, multispace0, none_of, one_of},
    combinator::{opt, recognize, value},
    sequence::preceded,
    IResult, Parser,
};

use crate::token::{Token, TokenType};

/// Scans source text one token at a time.
///
/// Each call to [`Lexer::next_token`] advances past the recognized lexeme; the lexer
/// itself carries no other state than the remaining input slice.
pub struct Lexer<'a> {
    remaining: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { remaining: input }
    }

    pub fn next_token(&mut self) -> Token {
        let (rest, _) = multispace0::<_, nom::error::Error<&str>>(self.remaining)
            .unwrap_or((self.remaining, ""));
        self.remaining = rest;

        if self.remaining.is_empty() {
            return Token::new(TokenType::Eof, "");
        }

        match lex_token(self.remaining) {
            Ok((rest, tok)) => {
                self.remaining = rest;
                tok
            }
            Err(_) => {
                let mut chars = self.remaining.chars();
                let illegal = chars.next().unwrap();
                self.remaining = chars.as_str();
                Token::new(TokenType::Illegal, illegal.to_string())
            }
        }
    }
}

/// Tokenizes the full input, always ending with a single `Eof` token.
pub fn tokenize(input: &str) -> Vec<Token> {
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
    tokens
}

fn lex_token(input: &str) -> IResult<&str, Token> {
    alt((
        lex_two_char_operator,
        lex_one_char_operator,
        lex_number,
        lex_string,
        lex_ident_or_keyword,
    ))
    .parse(input)
}

fn lex_two_char_operator(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::new(TokenType::Eq, "=="), tag("==")),
        value(Token::new(TokenType::NotEq, "!="), tag("!=")),
    ))
    .parse(input)
}

fn lex_one_char_operator(input: &str) -> IResult<&str, Token> {
    let (rest, c) = one_of("=+-!*/<>,;(){}[]:")(input)?;
    let kind = match c {
        '=' => TokenType::Assign,
        '+' => TokenType::Plus,
        '-' => TokenType::Minus,
        '!' => TokenType::Bang,
        '*' => TokenType::Asterisk,
        '/' => TokenType::Slash,
        '<' => TokenType::Lt,
        '>' => TokenType::Gt,
        ',' => TokenType::Comma,
        ';' => TokenType::Semicolon,
        '(' => TokenType::LParen,
        ')' => TokenType::RParen,
        '{' => TokenType::LBrace,
        '}' => TokenType::RBrace,
        '[' => TokenType::LBracket,
        ']' => TokenType::RBracket,
        ':' => TokenType::Colon,
        _ => unreachable!("one_of only matches the listed characters"),
    };
    Ok((rest, Token::new(kind, c.to_string())))
}

fn lex_number(input: &str) -> IResult<&str, Token> {
    let (rest, text) = recognize((digit1, opt((char('.'), digit1)))).parse(input)?;
    if text.contains('.') {
        Ok((rest, Token::new(TokenType::Float, text)))
    } else {
        Ok((rest, Token::new(TokenType::Int, text)))
    }
}

fn lex_string(input: &str) -> IResult<&str, Token> {
    let (rest, content) = preceded(
        char('"'),
        alt((
            |i| escaped_transform_string(i),
            value(String::new(), char('"')),
        )),
    )
    .parse(input)?;
    Ok((rest, Token::new(TokenType::String, content)))
}

fn escaped_transform_string(input: &str) -> IResult<&str, String> {
    let (rest, content) = escaped_transform(
        none_of("\"\\"),
        '\\',
        alt((
            value("\"", tag("\"")),
            value("\\", tag("\\")),
            value("\n", tag("n")),
            value("\t", tag("t")),
        )),
    )
    .parse(input)?;
    let (rest, _) = char('"')(rest)?;
    Ok((rest, content))
}

fn lex_ident_or_keyword(input: &str) -> IResult<&str, Token> {
    let (rest, ident) = recognize((
        one_of("abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_"),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse(input)?;
    let kind = Token::lookup_ident(ident);
    Ok((rest, Token::new(kind, ident)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenType> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokenizes_let_statement() {
        let toks = tokenize("let five = 5;");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenType::Let,
                TokenType::Id,
                TokenType::Assign,
                TokenType::Int,
                TokenType::Semicolon,
                TokenType::Eof,
            ]
        );
        assert_eq!(toks[1].literal, "five");
        assert_eq!(toks[3].literal, "5");
    }

    #[test]
    fn tokenizes_two_char_operators() {
        assert_eq!(kinds("== !="), vec![TokenType::Eq, TokenType::NotEq, TokenType::Eof]);
    }

    #[test]
    fn tokenizes_float() {
        let toks = tokenize("3.14");
        assert_eq!(toks[0].kind, TokenType::Float);
        assert_eq!(toks[0].literal, "3.14");
    }

    #[test]
    fn tokenizes_string_with_escapes() {
        let toks = tokenize(r#""hello\nworld""#);
        assert_eq!(toks[0].kind, TokenType::String);
        assert_eq!(toks[0].literal, "hello\nworld");
    }

    #[test]
    fn tokenizes_empty_string() {
        let toks = tokenize(r#""""#);
        assert_eq!(toks[0].kind, TokenType::String);
        assert_eq!(toks[0].literal, "");
    }

    #[test]
    fn tokenizes_keywords() {
        assert_eq!(
            kinds("fn let true false if else return break continue print while"),
            vec![
                TokenType::Function,
                TokenType::Let,
                TokenType::True,
                TokenType::False,
                TokenType::If,
                TokenType::Else,
                TokenType::Return,
                TokenType::Break,
                TokenType::Continue,
                TokenType::Print,
                TokenType::While,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn tokenizes_illegal_character() {
        let toks = tokenize("@");
        assert_eq!(toks[0].kind, TokenType::Illegal);
        assert_eq!(toks[0].literal, "@");
    }

    #[test]
    fn skips_whitespace_between_tokens() {
        let toks = tokenize("  5   +   10  ");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenType::Int, TokenType::Plus, TokenType::Int, TokenType::Eof]
        );
    }

    #[test]
    fn tokenizes_full_function_definition() {
        let input = "let add = fn(x, y) { x + y; };";
        let kinds: Vec<_> = kinds(input);
        assert_eq!(
            kinds,
            vec![
                TokenType::Let,
                TokenType::Id,
                TokenType::Assign,
                TokenType::Function,
                TokenType::LParen,
                TokenType::Id,
                TokenType::Comma,
                TokenType::Id,
                TokenType::RParen,
                TokenType::LBrace,
                TokenType::Id,
                TokenType::Plus,
                TokenType::Id,
                TokenType::Semicolon,
                TokenType::RBrace,
                TokenType::Semicolon,
                TokenType::Eof,
            ]
        );
    }
}
