use ast::{
    Assignment, BlockStatement, Error, Expression, ForStatement, IfStatement, InputStatement,
    PrintStatement, Program, Statement, VarDeclaration, WhileStatement,
};
use log::debug;

use crate::{
    cursor::Parser,
    token::{Keyword, Operator, Punctuation, TokenKind},
};

const SEMICOLON: TokenKind = TokenKind::Punctuation(Punctuation::Semicolon);
const LEFT_PAREN: TokenKind = TokenKind::Punctuation(Punctuation::LeftParen);
const RIGHT_PAREN: TokenKind = TokenKind::Punctuation(Punctuation::RightParen);
const LEFT_BRACE: TokenKind = TokenKind::Punctuation(Punctuation::LeftBrace);
const RIGHT_BRACE: TokenKind = TokenKind::Punctuation(Punctuation::RightBrace);
const COMMA: TokenKind = TokenKind::Punctuation(Punctuation::Comma);

impl Parser {
    pub fn parse_program(&mut self) -> Result<Program, Error> {
        let mut statements = vec![];
        while !self.at_end() {
            statements.push(self.statement()?);
        }
        Ok(Program { statements })
    }

    fn statement(&mut self) -> Result<Statement, Error> {
        let token = self.peek();
        debug!(
            "statement at {}:{} starting with {}",
            token.span.line, token.span.column, token
        );

        match token.kind {
            TokenKind::Keyword(Keyword::Var) => {
                let declaration = self.var_declaration()?;
                self.expect(&SEMICOLON, "';' after variable declaration")?;
                Ok(Statement::VarDeclaration(declaration))
            }
            TokenKind::Keyword(Keyword::If) => self.if_statement(),
            TokenKind::Keyword(Keyword::While) => self.while_statement(),
            TokenKind::Keyword(Keyword::For) => self.for_statement(),
            TokenKind::Keyword(Keyword::Print) => self.print_statement(),
            TokenKind::Keyword(Keyword::Input) => self.input_statement(),
            TokenKind::Punctuation(Punctuation::LeftBrace) => {
                Ok(Statement::BlockStatement(self.block()?))
            }
            TokenKind::Identifier => {
                let statement = self.simple_statement()?;
                self.expect(&SEMICOLON, "';' after statement")?;
                Ok(statement)
            }
            _ => Err(self.error("statement")),
        }
    }

    /// `var NAME ("=" expression)?`, without the trailing semicolon.
    fn var_declaration(&mut self) -> Result<VarDeclaration, Error> {
        self.expect(&TokenKind::Keyword(Keyword::Var), "'var'")?;
        let name = self.expect_identifier("variable name after 'var'")?;
        let initializer = if self.consume(&TokenKind::Operator(Operator::Equal)).is_some() {
            Some(self.expression()?)
        } else {
            None
        };
        Ok(VarDeclaration { name, initializer })
    }

    /// An assignment or a call, without the trailing semicolon.
    ///
    /// `NAME =` starts an assignment. Anything else is parsed as an expression,
    /// which is only accepted when it is a call.
    fn simple_statement(&mut self) -> Result<Statement, Error> {
        if self.check(&TokenKind::Identifier)
            && self.lookahead(1).kind == TokenKind::Operator(Operator::Equal)
        {
            return Ok(Statement::Assignment(self.assignment()?));
        }

        let start = self.peek().clone();
        match self.expression()? {
            call @ Expression::Call(..) => Ok(Statement::ExpressionStatement(call)),
            _ => Err(Error::parse(
                start.span,
                format!("expected statement, found {start}"),
            )),
        }
    }

    fn assignment(&mut self) -> Result<Assignment, Error> {
        let lhs = self.expect_identifier("variable name")?;
        self.expect(&TokenKind::Operator(Operator::Equal), "'=' in assignment")?;
        let rhs = self.expression()?;
        Ok(Assignment { lhs, rhs })
    }

    /// `else` binds to the nearest `if`: it is consumed as soon as the
    /// then-branch ends.
    fn if_statement(&mut self) -> Result<Statement, Error> {
        self.expect(&TokenKind::Keyword(Keyword::If), "'if'")?;
        self.expect(&LEFT_PAREN, "'(' after 'if'")?;
        let condition = self.expression()?;
        self.expect(&RIGHT_PAREN, "')' after if condition")?;
        let if_branch = Box::new(self.statement()?);
        let else_branch = if self.consume(&TokenKind::Keyword(Keyword::Else)).is_some() {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Statement::IfStatement(IfStatement {
            condition,
            if_branch,
            else_branch,
        }))
    }

    fn while_statement(&mut self) -> Result<Statement, Error> {
        self.expect(&TokenKind::Keyword(Keyword::While), "'while'")?;
        self.expect(&LEFT_PAREN, "'(' after 'while'")?;
        let condition = self.expression()?;
        self.expect(&RIGHT_PAREN, "')' after while condition")?;
        let body = Box::new(self.statement()?);

        Ok(Statement::WhileStatement(WhileStatement { condition, body }))
    }

    fn for_statement(&mut self) -> Result<Statement, Error> {
        self.expect(&TokenKind::Keyword(Keyword::For), "'for'")?;
        self.expect(&LEFT_PAREN, "'(' after 'for'")?;

        let initializer = match self.peek().kind {
            TokenKind::Punctuation(Punctuation::Semicolon) => None,
            TokenKind::Keyword(Keyword::Var) => {
                Some(Box::new(Statement::VarDeclaration(self.var_declaration()?)))
            }
            TokenKind::Identifier
                if self.lookahead(1).kind == TokenKind::Operator(Operator::Equal) =>
            {
                Some(Box::new(Statement::Assignment(self.assignment()?)))
            }
            _ => {
                return Err(self.error("variable declaration or assignment in for initializer"))
            }
        };
        self.expect(&SEMICOLON, "';' after for initializer")?;

        let condition = if self.check(&SEMICOLON) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(&SEMICOLON, "';' after for condition")?;

        let update = if self.check(&RIGHT_PAREN) {
            None
        } else {
            Some(Box::new(self.simple_statement()?))
        };
        self.expect(&RIGHT_PAREN, "')' after for clauses")?;

        let body = Box::new(self.statement()?);

        Ok(Statement::ForStatement(ForStatement {
            initializer,
            condition,
            update,
            body,
        }))
    }

    fn print_statement(&mut self) -> Result<Statement, Error> {
        let keyword = self.expect(&TokenKind::Keyword(Keyword::Print), "'print'")?;
        self.expect(&LEFT_PAREN, "'(' after 'print'")?;
        let arguments = self.arguments()?;
        self.expect(&SEMICOLON, "';' after print statement")?;

        Ok(Statement::PrintStatement(PrintStatement {
            span: keyword.span,
            arguments,
        }))
    }

    fn input_statement(&mut self) -> Result<Statement, Error> {
        self.expect(&TokenKind::Keyword(Keyword::Input), "'input'")?;
        self.expect(&LEFT_PAREN, "'(' after 'input'")?;
        let target = self.expect_identifier("variable name in input")?;
        self.expect(&RIGHT_PAREN, "')' after input variable")?;
        self.expect(&SEMICOLON, "';' after input statement")?;

        Ok(Statement::InputStatement(InputStatement { target }))
    }

    fn block(&mut self) -> Result<BlockStatement, Error> {
        self.expect(&LEFT_BRACE, "'{'")?;
        let mut statements = vec![];
        while !self.check(&RIGHT_BRACE) {
            if self.at_end() {
                return Err(self.error("'}' to close block"));
            }
            statements.push(self.statement()?);
        }
        self.advance();

        Ok(BlockStatement { statements })
    }

    /// Comma-separated expressions up to and including the closing `)`.
    /// The opening `(` has already been consumed.
    pub(crate) fn arguments(&mut self) -> Result<Vec<Expression>, Error> {
        let mut arguments = vec![];
        if self.consume(&RIGHT_PAREN).is_some() {
            return Ok(arguments);
        }
        loop {
            arguments.push(self.expression()?);
            if self.consume(&COMMA).is_none() {
                break;
            }
        }
        self.expect(&RIGHT_PAREN, "',' or ')' after argument")?;
        Ok(arguments)
    }
}

#[cfg(test)]
mod tests {
    use ast::{ArithmeticOperator, ComparisonOperator, ErrorKind, Span, Value};

    use crate::parse;

    use super::*;

    fn statements(source: &str) -> Vec<Statement> {
        parse(source)
            .unwrap_or_else(|e| panic!("\n{e}\n"))
            .statements
    }

    fn parse_error(source: &str) -> String {
        let error = parse(source).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Parse, "{error}");
        error.to_string()
    }

    #[test]
    fn declarations_and_assignment() {
        assert_eq!(
            statements("var x = 1; var y; y = x;"),
            vec![
                Statement::VarDeclaration(VarDeclaration {
                    name: (Span::new(4, 5, 1, 5), "x".to_string()),
                    initializer: Some(Expression::Literal(Value::Number(1.0))),
                }),
                Statement::VarDeclaration(VarDeclaration {
                    name: (Span::new(15, 16, 1, 16), "y".to_string()),
                    initializer: None,
                }),
                Statement::Assignment(Assignment {
                    lhs: (Span::new(18, 19, 1, 19), "y".to_string()),
                    rhs: Expression::Identifier((Span::new(22, 23, 1, 23), "x".to_string())),
                }),
            ]
        );
    }

    #[test]
    fn print_takes_any_number_of_arguments() {
        let parsed = statements(r#"print(); print("n =", n, 'done');"#);

        let Statement::PrintStatement(empty) = &parsed[0] else {
            panic!("expected print, got {:?}", parsed[0]);
        };
        assert!(empty.arguments.is_empty());

        let Statement::PrintStatement(three) = &parsed[1] else {
            panic!("expected print, got {:?}", parsed[1]);
        };
        assert_eq!(three.arguments.len(), 3);
        assert_eq!(
            three.arguments[0],
            Expression::Literal(Value::String("n =".to_string()))
        );
    }

    #[test]
    fn input_names_one_variable() {
        assert_eq!(
            statements("input(n);"),
            vec![Statement::InputStatement(InputStatement {
                target: (Span::new(6, 7, 1, 7), "n".to_string())
            })]
        );

        insta::assert_snapshot!(
            parse_error("input(1);"),
            @"Parse Error at 1:7: expected variable name in input, found number '1'"
        );
    }

    #[test]
    fn dangling_else_binds_to_nearest_if() {
        let parsed = statements("if (a) if (b) print(1); else print(2);");

        let Statement::IfStatement(outer) = &parsed[0] else {
            panic!("expected if, got {:?}", parsed[0]);
        };
        assert!(outer.else_branch.is_none());

        let Statement::IfStatement(inner) = outer.if_branch.as_ref() else {
            panic!("expected nested if, got {:?}", outer.if_branch);
        };
        assert!(inner.else_branch.is_some());
    }

    #[test]
    fn for_clauses_are_optional() {
        let parsed = statements("for (;;) {}");

        assert_eq!(
            parsed,
            vec![Statement::ForStatement(ForStatement {
                initializer: None,
                condition: None,
                update: None,
                body: Box::new(Statement::BlockStatement(BlockStatement {
                    statements: vec![]
                })),
            })]
        );
    }

    #[test]
    fn full_for_loop() {
        let parsed = statements("for (var i = 0; i < 3; i = i + 1) print(i);");

        let Statement::ForStatement(ForStatement {
            initializer: Some(initializer),
            condition: Some(condition),
            update: Some(update),
            body,
        }) = &parsed[0]
        else {
            panic!("expected complete for loop, got {:?}", parsed[0]);
        };

        assert!(matches!(initializer.as_ref(), Statement::VarDeclaration(_)));
        assert!(matches!(
            condition,
            Expression::Comparison(_, (_, ComparisonOperator::LessThan), _)
        ));
        let Statement::Assignment(Assignment { lhs, rhs }) = update.as_ref() else {
            panic!("expected assignment update, got {update:?}");
        };
        assert_eq!(lhs.1, "i");
        assert!(matches!(
            rhs,
            Expression::Arithmetic(_, (_, ArithmeticOperator::Add), _)
        ));
        assert!(matches!(body.as_ref(), Statement::PrintStatement(_)));
    }

    #[test]
    fn for_initializer_may_assign_existing_variable() {
        let parsed = statements("var i; for (i = 10; i; i = i - 1) {}");

        let Statement::ForStatement(for_statement) = &parsed[1] else {
            panic!("expected for, got {:?}", parsed[1]);
        };
        assert!(matches!(
            for_statement.initializer.as_deref(),
            Some(Statement::Assignment(_))
        ));
    }

    #[test]
    fn calls_are_statements_but_other_expressions_are_not() {
        let parsed = statements("launch(1, 2);");
        assert!(matches!(
            &parsed[0],
            Statement::ExpressionStatement(Expression::Call(name, args))
                if name.1 == "launch" && args.len() == 2
        ));

        insta::assert_snapshot!(
            parse_error("var x; x + 1;"),
            @"Parse Error at 1:8: expected statement, found identifier 'x'"
        );
        insta::assert_snapshot!(
            parse_error("42;"),
            @"Parse Error at 1:1: expected statement, found number '42'"
        );
    }

    #[test]
    fn nested_blocks() {
        let parsed = statements("{ var x = 2; { print(x); } }");

        let Statement::BlockStatement(outer) = &parsed[0] else {
            panic!("expected block, got {:?}", parsed[0]);
        };
        assert_eq!(outer.statements.len(), 2);
        assert!(matches!(
            &outer.statements[1],
            Statement::BlockStatement(inner) if inner.statements.len() == 1
        ));
    }

    #[test]
    fn errors_name_the_expected_construct() {
        insta::assert_snapshot!(
            parse_error("var x = 1"),
            @"Parse Error at 1:10: expected ';' after variable declaration, found end of input"
        );
        insta::assert_snapshot!(
            parse_error("{ print(1);"),
            @"Parse Error at 1:12: expected '}' to close block, found end of input"
        );
        insta::assert_snapshot!(
            parse_error("while x < 3 {}"),
            @"Parse Error at 1:7: expected '(' after 'while', found identifier 'x'"
        );
        insta::assert_snapshot!(
            parse_error("for (print(1);;) {}"),
            @"Parse Error at 1:6: expected variable declaration or assignment in for initializer, found keyword 'print'"
        );
        insta::assert_snapshot!(
            parse_error("print(1, );"),
            @"Parse Error at 1:10: expected expression, found punctuation ')'"
        );
        insta::assert_snapshot!(
            parse_error("else {}"),
            @"Parse Error at 1:1: expected statement, found keyword 'else'"
        );
    }
}
