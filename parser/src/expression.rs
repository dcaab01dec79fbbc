use ast::{
    ArithmeticOperator, ComparisonOperator, EqualityOperator, Error, Expression, UnaryOperator,
    Value,
};

use crate::{
    cursor::Parser,
    token::{Operator, Punctuation, TokenKind},
};

// Precedence, loosest first: || && (== !=) (< <= > >=) (+ -) (* /) unary primary.
// Every binary level parses the next tighter level and folds to the left.
impl Parser {
    pub(crate) fn expression(&mut self) -> Result<Expression, Error> {
        self.or_expression()
    }

    fn or_expression(&mut self) -> Result<Expression, Error> {
        let mut expr = self.and_expression()?;

        while let Some(op) = self.consume(&TokenKind::Operator(Operator::Or)) {
            let rhs = self.and_expression()?;
            expr = Expression::Or(Box::new(expr), op.span, Box::new(rhs));
        }

        Ok(expr)
    }

    fn and_expression(&mut self) -> Result<Expression, Error> {
        let mut expr = self.equality_expression()?;

        while let Some(op) = self.consume(&TokenKind::Operator(Operator::And)) {
            let rhs = self.equality_expression()?;
            expr = Expression::And(Box::new(expr), op.span, Box::new(rhs));
        }

        Ok(expr)
    }

    fn equality_expression(&mut self) -> Result<Expression, Error> {
        let mut expr = self.comparison_expression()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Operator(Operator::EqualEqual) => EqualityOperator::Equal,
                TokenKind::Operator(Operator::BangEqual) => EqualityOperator::NotEqual,
                _ => break,
            };
            let span = self.advance().span;
            let rhs = self.comparison_expression()?;
            expr = Expression::Equality(Box::new(expr), (span, op), Box::new(rhs));
        }

        Ok(expr)
    }

    fn comparison_expression(&mut self) -> Result<Expression, Error> {
        let mut expr = self.additive_expression()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Operator(Operator::Less) => ComparisonOperator::LessThan,
                TokenKind::Operator(Operator::LessEqual) => ComparisonOperator::LessThanOrEqual,
                TokenKind::Operator(Operator::Greater) => ComparisonOperator::GreaterThan,
                TokenKind::Operator(Operator::GreaterEqual) => {
                    ComparisonOperator::GreaterThanOrEqual
                }
                _ => break,
            };
            let span = self.advance().span;
            let rhs = self.additive_expression()?;
            expr = Expression::Comparison(Box::new(expr), (span, op), Box::new(rhs));
        }

        Ok(expr)
    }

    fn additive_expression(&mut self) -> Result<Expression, Error> {
        let mut expr = self.multiplicative_expression()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Operator(Operator::Plus) => ArithmeticOperator::Add,
                TokenKind::Operator(Operator::Minus) => ArithmeticOperator::Subtract,
                _ => break,
            };
            let span = self.advance().span;
            let rhs = self.multiplicative_expression()?;
            expr = Expression::Arithmetic(Box::new(expr), (span, op), Box::new(rhs));
        }

        Ok(expr)
    }

    fn multiplicative_expression(&mut self) -> Result<Expression, Error> {
        let mut expr = self.unary_expression()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Operator(Operator::Star) => ArithmeticOperator::Multiply,
                TokenKind::Operator(Operator::Slash) => ArithmeticOperator::Divide,
                _ => break,
            };
            let span = self.advance().span;
            let rhs = self.unary_expression()?;
            expr = Expression::Arithmetic(Box::new(expr), (span, op), Box::new(rhs));
        }

        Ok(expr)
    }

    fn unary_expression(&mut self) -> Result<Expression, Error> {
        let op = match self.peek().kind {
            TokenKind::Operator(Operator::Bang) => UnaryOperator::Not,
            TokenKind::Operator(Operator::Minus) => UnaryOperator::Negate,
            _ => return self.primary_expression(),
        };
        let span = self.advance().span;
        let operand = self.unary_expression()?;

        Ok(Expression::Unary((span, op), Box::new(operand)))
    }

    fn primary_expression(&mut self) -> Result<Expression, Error> {
        match &self.peek().kind {
            TokenKind::Number(n) => {
                let value = Value::Number(*n);
                self.advance();
                Ok(Expression::Literal(value))
            }
            TokenKind::String(s) => {
                let value = Value::String(s.clone());
                self.advance();
                Ok(Expression::Literal(value))
            }
            TokenKind::Identifier => {
                let name = self.advance();
                let name = (name.span, name.text);
                if self
                    .consume(&TokenKind::Punctuation(Punctuation::LeftParen))
                    .is_some()
                {
                    Ok(Expression::Call(name, self.arguments()?))
                } else {
                    Ok(Expression::Identifier(name))
                }
            }
            TokenKind::Punctuation(Punctuation::LeftParen) => {
                self.advance();
                let inner = self.expression()?;
                self.expect(
                    &TokenKind::Punctuation(Punctuation::RightParen),
                    "')' after expression",
                )?;
                Ok(Expression::Grouping(Box::new(inner)))
            }
            _ => Err(self.error("expression")),
        }
    }
}
