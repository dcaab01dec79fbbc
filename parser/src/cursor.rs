use ast::{Error, Span, Spanned};

use crate::token::{Token, TokenKind};

/// Recursive-descent parser over a lexed token vector.
///
/// The token vector always ends with `EndOfInput`; `peek` never moves past it.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::EndOfInput) {
            let span = tokens
                .last()
                .map(|t| Span::new(t.span.end, t.span.end, t.span.line, t.span.column))
                .unwrap_or_else(|| Span::new(0, 0, 1, 1));
            tokens.push(Token {
                kind: TokenKind::EndOfInput,
                text: String::new(),
                span,
            });
        }
        Self {
            tokens,
            position: 0,
        }
    }

    pub(crate) fn peek(&self) -> &Token {
        self.lookahead(0)
    }

    pub(crate) fn lookahead(&self, distance: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.position + distance).min(last)]
    }

    pub(crate) fn at_end(&self) -> bool {
        self.peek().kind == TokenKind::EndOfInput
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.at_end() {
            self.position += 1;
        }
        token
    }

    /// Consumes the current token if it is of `kind`.
    pub(crate) fn consume(&mut self, kind: &TokenKind) -> Option<Token> {
        self.check(kind).then(|| self.advance())
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind, construct: &str) -> Result<Token, Error> {
        self.consume(kind).ok_or_else(|| self.error(construct))
    }

    pub(crate) fn expect_identifier(&mut self, construct: &str) -> Result<Spanned<String>, Error> {
        if self.check(&TokenKind::Identifier) {
            let token = self.advance();
            Ok((token.span, token.text))
        } else {
            Err(self.error(construct))
        }
    }

    /// `expected <construct>, found <current token>`
    pub(crate) fn error(&self, construct: &str) -> Error {
        let found = self.peek();
        Error::parse(found.span, format!("expected {construct}, found {found}"))
    }
}
