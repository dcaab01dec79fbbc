use std::fmt::{self, Display, Formatter};

use ast::Span;

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier,
    Number(f64),
    /// String literal contents, quotes removed. Escapes are kept verbatim.
    String(String),
    Operator(Operator),
    Punctuation(Punctuation),
    EndOfInput,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    Var,
    If,
    Else,
    While,
    For,
    Print,
    Input,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Or,
    And,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    Equal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Punctuation {
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Semicolon,
    Comma,
}

impl Keyword {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        Some(match lexeme {
            "var" => Keyword::Var,
            "if" => Keyword::If,
            "else" => Keyword::Else,
            "while" => Keyword::While,
            "for" => Keyword::For,
            "print" => Keyword::Print,
            "input" => Keyword::Input,
            _ => return None,
        })
    }
}

impl Operator {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        Some(match lexeme {
            "||" => Operator::Or,
            "&&" => Operator::And,
            "==" => Operator::EqualEqual,
            "!=" => Operator::BangEqual,
            "<" => Operator::Less,
            "<=" => Operator::LessEqual,
            ">" => Operator::Greater,
            ">=" => Operator::GreaterEqual,
            "+" => Operator::Plus,
            "-" => Operator::Minus,
            "*" => Operator::Star,
            "/" => Operator::Slash,
            "!" => Operator::Bang,
            "=" => Operator::Equal,
            _ => return None,
        })
    }
}

impl Punctuation {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        Some(match lexeme {
            "(" => Punctuation::LeftParen,
            ")" => Punctuation::RightParen,
            "{" => Punctuation::LeftBrace,
            "}" => Punctuation::RightBrace,
            ";" => Punctuation::Semicolon,
            "," => Punctuation::Comma,
            _ => return None,
        })
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(_) => write!(f, "keyword"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Number(_) => write!(f, "number"),
            TokenKind::String(_) => write!(f, "string"),
            TokenKind::Operator(_) => write!(f, "operator"),
            TokenKind::Punctuation(_) => write!(f, "punctuation"),
            TokenKind::EndOfInput => write!(f, "end of input"),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfInput => write!(f, "end of input"),
            _ => write!(f, "{} '{}'", self.kind, self.text),
        }
    }
}
