use ast::{parse_number_literal, Error, Span};
use log::trace;
use pest::{iterators::Pair, Parser};

use crate::token::{Keyword, Operator, Punctuation, Token, TokenKind};

#[derive(pest_derive::Parser)]
#[grammar = "grammar.pest"]
struct TokenGrammar;

/// Lazy token stream over a source string.
///
/// Yields `Ok` tokens up to and including a single `EndOfInput`, or stops
/// after the first `Err`. Clone the lexer (or create a new one) to replay
/// from the start.
#[derive(Clone, Debug)]
pub struct Lexer<'i> {
    source: &'i str,
    offset: usize,
    chars: usize,
    line: usize,
    column: usize,
    finished: bool,
}

impl<'i> Lexer<'i> {
    pub fn new(source: &'i str) -> Self {
        Self {
            source,
            offset: 0,
            chars: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    fn here(&self) -> Span {
        Span::new(self.chars, self.chars, self.line, self.column)
    }

    fn advance(&mut self, text: &str) {
        for c in text.chars() {
            self.chars += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset += text.len();
    }

    fn lex_token(&mut self) -> Result<Token, Error> {
        let source = self.source;
        let rest = &source[self.offset..];
        let pair = TokenGrammar::parse(Rule::Next, rest)
            .map_err(|e| Error::lex(self.here(), e))?
            .next()
            .and_then(|next| next.into_inner().next())
            .ok_or_else(|| Error::lex(self.here(), "token grammar produced no token"))?;

        self.advance(&rest[..pair.as_span().start()]);
        let start = self.here();
        self.advance(pair.as_str());
        let span = Span::new(start.start, self.chars, start.line, start.column);

        let kind = token_kind(&pair, span)?;
        Ok(Token {
            kind,
            text: pair.as_str().to_string(),
            span,
        })
    }
}

fn token_kind(pair: &Pair<Rule>, span: Span) -> Result<TokenKind, Error> {
    let text = pair.as_str();
    let unknown = || Error::lex(span, format!("unrecognised token '{text}'"));

    Ok(match pair.as_rule() {
        Rule::End => TokenKind::EndOfInput,
        Rule::Keyword => TokenKind::Keyword(Keyword::from_lexeme(text).ok_or_else(unknown)?),
        Rule::Ident => TokenKind::Identifier,
        Rule::Number => TokenKind::Number(parse_number_literal(text).ok_or_else(unknown)?),
        Rule::Str => TokenKind::String(text[1..text.len() - 1].to_string()),
        Rule::Operator => TokenKind::Operator(Operator::from_lexeme(text).ok_or_else(unknown)?),
        Rule::Punct => {
            TokenKind::Punctuation(Punctuation::from_lexeme(text).ok_or_else(unknown)?)
        }
        Rule::OpenComment => return Err(Error::lex(span, "unterminated block comment")),
        Rule::Illegal if text == "\"" || text == "'" => {
            return Err(Error::lex(span, "unterminated string literal"))
        }
        Rule::Illegal => return Err(Error::lex(span, format!("illegal character '{text}'"))),
        _ => return Err(unknown()),
    })
}

impl<'i> Iterator for Lexer<'i> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.lex_token();
        match &result {
            Ok(token) => {
                trace!("{}:{} {}", token.span.line, token.span.column, token);
                self.finished = token.kind == TokenKind::EndOfInput;
            }
            Err(_) => self.finished = true,
        }
        Some(result)
    }
}

impl<'i> std::iter::FusedIterator for Lexer<'i> {}

/// Lexes the whole source, ending with the `EndOfInput` token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    Lexer::new(source).collect()
}
