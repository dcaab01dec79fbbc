use ast::{Error, Program};
use log::info;

mod cursor;
mod expression;
mod lexer;
mod statement;
mod token;

pub use cursor::Parser;
pub use lexer::{tokenize, Lexer};
pub use token::*;

/// Lexes and parses a whole program.
pub fn parse(source: &str) -> Result<Program, Error> {
    let tokens = tokenize(source)?;
    info!("lexed {} tokens", tokens.len());

    let program = Parser::new(tokens).parse_program()?;
    info!("parsed {} statements", program.statements.len());

    Ok(program)
}

#[cfg(test)]
mod tests {
    use ast::{
        ArithmeticOperator, Assignment, BlockStatement, ComparisonOperator, ErrorKind, Expression,
        IfStatement, PrintStatement, Span, Statement, VarDeclaration, Value, WhileStatement,
    };

    use super::*;

    #[test]
    fn example_1() {
        let program = parse(
            r#"
                var n = 3; // counter
                while (n > 0) {
                    print("n is", n);
                    n = n - 1;
                }
            "#,
        )
        .unwrap_or_else(|e| panic!("\n{e}\n"));

        let n = |start: usize, line: usize, column: usize| {
            (Span::new(start, start + 1, line, column), "n".to_string())
        };

        assert_eq!(
            program,
            Program {
                statements: vec![
                    Statement::VarDeclaration(VarDeclaration {
                        name: n(21, 2, 21),
                        initializer: Some(Expression::Literal(Value::Number(3.0))),
                    }),
                    Statement::WhileStatement(WhileStatement {
                        condition: Expression::Comparison(
                            Box::new(Expression::Identifier(n(62, 3, 24))),
                            (Span::new(64, 65, 3, 26), ComparisonOperator::GreaterThan),
                            Box::new(Expression::Literal(Value::Number(0.0))),
                        ),
                        body: Box::new(Statement::BlockStatement(BlockStatement {
                            statements: vec![
                                Statement::PrintStatement(PrintStatement {
                                    span: Span::new(91, 96, 4, 21),
                                    arguments: vec![
                                        Expression::Literal(Value::String("n is".to_string())),
                                        Expression::Identifier(n(105, 4, 35)),
                                    ],
                                }),
                                Statement::Assignment(Assignment {
                                    lhs: n(129, 5, 21),
                                    rhs: Expression::Arithmetic(
                                        Box::new(Expression::Identifier(n(133, 5, 25))),
                                        (Span::new(135, 136, 5, 27), ArithmeticOperator::Subtract),
                                        Box::new(Expression::Literal(Value::Number(1.0))),
                                    ),
                                }),
                            ]
                        })),
                    }),
                ]
            }
        );
    }

    #[test]
    fn example_2() {
        let program = parse(
            r#"
            if (x == 1) { print('one'); } else print('other');
            "#,
        )
        .unwrap_or_else(|e| panic!("\n{e}\n"));

        let [Statement::IfStatement(IfStatement {
            if_branch,
            else_branch: Some(else_branch),
            ..
        })] = &program.statements[..]
        else {
            panic!("expected a single if/else, got {program:?}");
        };
        assert!(matches!(if_branch.as_ref(), Statement::BlockStatement(_)));
        assert!(matches!(else_branch.as_ref(), Statement::PrintStatement(_)));
    }

    #[test]
    fn empty_program() {
        assert_eq!(parse("  // nothing\n").unwrap(), Program { statements: vec![] });
    }

    #[test]
    fn lex_errors_surface_through_parse() {
        let error = parse("var x = #;").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Lex);
    }

    #[test]
    fn parser_accepts_tokens_without_end_marker() {
        let mut tokens = tokenize("print(1);").unwrap();
        tokens.pop();

        let program = Parser::new(tokens).parse_program().unwrap();
        assert_eq!(program.statements.len(), 1);
    }
}
