use ast::*;
use log::{debug, info};

mod environment;
mod io;

pub use environment::{Environment, Undefined};
pub use io::{classify_input, BufferOutput, Input, Output, ScriptedInput, StdInput, StdOutput};

/// Runs `program` against stdin/stdout.
pub fn run(program: &Program) -> Result<(), Error> {
    Interpreter::new().run(program)
}

/// Tree-walking evaluator. Owns the environment chain for one run and the
/// collaborators `print` and `input` talk to.
pub struct Interpreter<O = StdOutput, I = StdInput> {
    environment: Environment,
    output: O,
    input: I,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_io(StdOutput::default(), StdInput)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Output, I: Input> Interpreter<O, I> {
    pub fn with_io(output: O, input: I) -> Self {
        Self {
            environment: Environment::new(),
            output,
            input,
        }
    }

    pub fn run(&mut self, program: &Program) -> Result<(), Error> {
        program.run(self)?;
        info!("program finished");
        Ok(())
    }

    pub fn execute(&mut self, statement: &Statement) -> Result<(), Error> {
        statement.run(self)
    }

    pub fn evaluate(&mut self, expression: &Expression) -> Result<Value, Error> {
        expression.run(self)
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }

    /// Runs `f` inside a fresh child frame, popping it on every exit path.
    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        self.environment.push_scope();
        let result = f(self);
        self.environment.pop_scope();
        result
    }
}

trait Interpretable {
    type Value;
    fn run<O: Output, I: Input>(
        &self,
        interpreter: &mut Interpreter<O, I>,
    ) -> Result<Self::Value, Error>;
}

impl Interpretable for Program {
    type Value = ();
    fn run<O: Output, I: Input>(
        &self,
        interpreter: &mut Interpreter<O, I>,
    ) -> Result<Self::Value, Error> {
        for statement in &self.statements {
            statement.run(interpreter)?;
        }
        Ok(())
    }
}

impl Interpretable for Statement {
    type Value = ();
    fn run<O: Output, I: Input>(
        &self,
        interpreter: &mut Interpreter<O, I>,
    ) -> Result<Self::Value, Error> {
        match self {
            Statement::VarDeclaration(VarDeclaration { name, initializer }) => {
                let value = match initializer {
                    Some(initializer) => initializer.run(interpreter)?,
                    None => Value::Uninitialized,
                };
                debug!("declare {} = {value:?}", name.1);
                interpreter.environment.declare(&name.1, value);
            }
            Statement::Assignment(Assignment { lhs, rhs }) => {
                let value = rhs.run(interpreter)?;
                debug!("assign {} = {value:?}", lhs.1);
                interpreter
                    .environment
                    .assign(&lhs.1, value)
                    .map_err(|e| Error::name(lhs.0, e))?;
            }
            Statement::IfStatement(IfStatement {
                condition,
                if_branch,
                else_branch,
            }) => {
                if condition.run(interpreter)?.is_truthy() {
                    if_branch.run(interpreter)?;
                } else if let Some(else_branch) = else_branch {
                    else_branch.run(interpreter)?;
                }
            }
            Statement::WhileStatement(WhileStatement { condition, body }) => {
                while condition.run(interpreter)?.is_truthy() {
                    interpreter.scoped(|interpreter| body.run(interpreter))?;
                }
            }
            Statement::ForStatement(ForStatement {
                initializer,
                condition,
                update,
                body,
            }) => interpreter.scoped(|interpreter| {
                if let Some(initializer) = initializer {
                    initializer.run(interpreter)?;
                }
                loop {
                    if let Some(condition) = condition {
                        if !condition.run(interpreter)?.is_truthy() {
                            break;
                        }
                    }
                    interpreter.scoped(|interpreter| body.run(interpreter))?;
                    if let Some(update) = update {
                        update.run(interpreter)?;
                    }
                }
                Ok(())
            })?,
            Statement::PrintStatement(PrintStatement { span, arguments }) => {
                let values = arguments
                    .iter()
                    .map(|argument| argument.run(interpreter))
                    .collect::<Result<Vec<_>, _>>()?;
                interpreter
                    .output
                    .print(&values)
                    .map_err(|e| Error::io(*span, e))?;
            }
            Statement::InputStatement(InputStatement { target }) => {
                let (span, name) = target;
                interpreter
                    .environment
                    .lookup(name)
                    .map_err(|e| Error::name(*span, e))?;
                let line = interpreter
                    .input
                    .read_line()
                    .map_err(|e| Error::io(*span, e))?
                    .ok_or_else(|| Error::io(*span, "input exhausted"))?;
                let value = classify_input(&line);
                debug!("input {name} = {value:?}");
                interpreter
                    .environment
                    .assign(name, value)
                    .map_err(|e| Error::name(*span, e))?;
            }
            Statement::BlockStatement(BlockStatement { statements }) => {
                interpreter.scoped(|interpreter| {
                    for statement in statements {
                        statement.run(interpreter)?;
                    }
                    Ok(())
                })?;
            }
            Statement::ExpressionStatement(expression) => {
                expression.run(interpreter)?;
            }
        }
        Ok(())
    }
}

fn numbers(
    op: impl std::fmt::Display,
    span: Span,
    left: Value,
    right: Value,
) -> Result<(f64, f64), Error> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok((l, r)),
        (l, r) => Err(Error::type_error(
            span,
            format!(
                "'{op}' expects two numbers, found {} and {}",
                l.kind(),
                r.kind()
            ),
        )),
    }
}

impl Interpretable for Expression {
    type Value = Value;

    fn run<O: Output, I: Input>(
        &self,
        interpreter: &mut Interpreter<O, I>,
    ) -> Result<Self::Value, Error> {
        match self {
            Expression::Or(left, _, right) => {
                let truthy =
                    left.run(interpreter)?.is_truthy() || right.run(interpreter)?.is_truthy();
                Ok(Value::Boolean(truthy))
            }
            Expression::And(left, _, right) => {
                let truthy =
                    left.run(interpreter)?.is_truthy() && right.run(interpreter)?.is_truthy();
                Ok(Value::Boolean(truthy))
            }
            Expression::Equality(left, (_, op), right) => {
                let left = left.run(interpreter)?;
                let right = right.run(interpreter)?;
                let equal = match (&left, &right) {
                    (Value::Number(l), Value::Number(r)) => l == r,
                    (Value::String(l), Value::String(r)) => l == r,
                    (Value::Boolean(l), Value::Boolean(r)) => l == r,
                    (Value::Uninitialized, Value::Uninitialized) => true,
                    _ => false,
                };
                match op {
                    EqualityOperator::Equal => Ok(Value::Boolean(equal)),
                    EqualityOperator::NotEqual => Ok(Value::Boolean(!equal)),
                }
            }
            Expression::Comparison(left, (span, op), right) => {
                let left = left.run(interpreter)?;
                let right = right.run(interpreter)?;
                let (l, r) = numbers(op, *span, left, right)?;
                Ok(Value::Boolean(match op {
                    ComparisonOperator::LessThan => l < r,
                    ComparisonOperator::LessThanOrEqual => l <= r,
                    ComparisonOperator::GreaterThan => l > r,
                    ComparisonOperator::GreaterThanOrEqual => l >= r,
                }))
            }
            Expression::Arithmetic(left, (span, op), right) => {
                let left = left.run(interpreter)?;
                let right = right.run(interpreter)?;
                match op {
                    ArithmeticOperator::Add => match (left, right) {
                        (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
                        (l @ Value::String(_), r) | (l, r @ Value::String(_)) => {
                            Ok(Value::String(format!("{l}{r}")))
                        }
                        (l, r) => Err(Error::type_error(
                            *span,
                            format!(
                                "'+' expects numbers or a string, found {} and {}",
                                l.kind(),
                                r.kind()
                            ),
                        )),
                    },
                    ArithmeticOperator::Subtract => {
                        let (l, r) = numbers(op, *span, left, right)?;
                        Ok(Value::Number(l - r))
                    }
                    ArithmeticOperator::Multiply => {
                        let (l, r) = numbers(op, *span, left, right)?;
                        Ok(Value::Number(l * r))
                    }
                    ArithmeticOperator::Divide => {
                        let (l, r) = numbers(op, *span, left, right)?;
                        if r == 0.0 {
                            return Err(Error::division_by_zero(*span));
                        }
                        Ok(Value::Number(l / r))
                    }
                }
            }
            Expression::Unary((span, op), operand) => {
                let value = operand.run(interpreter)?;
                match op {
                    UnaryOperator::Not => Ok(Value::Boolean(!value.is_truthy())),
                    UnaryOperator::Negate => match value {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        v => Err(Error::type_error(
                            *span,
                            format!("'-' expects a number, found {}", v.kind()),
                        )),
                    },
                }
            }
            Expression::Literal(value) => Ok(value.clone()),
            Expression::Identifier((span, name)) => {
                match interpreter
                    .environment
                    .lookup(name)
                    .map_err(|e| Error::name(*span, e))?
                {
                    Value::Uninitialized => Err(Error::name(
                        *span,
                        format!("variable '{name}' used before assignment"),
                    )),
                    value => Ok(value.clone()),
                }
            }
            // No functions are callable from expressions.
            Expression::Call((span, name), _) => {
                Err(Error::name(*span, format!("unknown function '{name}'")))
            }
            Expression::Grouping(inner) => inner.run(interpreter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(value: Value) -> Box<Expression> {
        Box::new(Expression::Literal(value))
    }

    fn interpreter() -> Interpreter<BufferOutput, ScriptedInput> {
        Interpreter::with_io(BufferOutput::default(), ScriptedInput::default())
    }

    #[test]
    fn string_concatenation_uses_display() {
        let expression = Expression::Arithmetic(
            literal(Value::Number(1.5)),
            (Span::default(), ArithmeticOperator::Add),
            literal(Value::String("!".to_string())),
        );

        assert_eq!(
            interpreter().evaluate(&expression),
            Ok(Value::String("1.5!".to_string()))
        );
    }

    #[test]
    fn mismatched_equality_is_not_an_error() {
        let expression = Expression::Equality(
            literal(Value::Number(1.0)),
            (Span::default(), EqualityOperator::NotEqual),
            literal(Value::String("1".to_string())),
        );

        assert_eq!(
            interpreter().evaluate(&expression),
            Ok(Value::Boolean(true))
        );
    }

    #[test]
    fn booleans_do_not_add() {
        let expression = Expression::Arithmetic(
            literal(Value::Boolean(true)),
            (Span::new(2, 3, 1, 3), ArithmeticOperator::Add),
            literal(Value::Number(1.0)),
        );

        let error = interpreter().evaluate(&expression).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Type);
        insta::assert_snapshot!(
            error.to_string(),
            @"Type Error at 1:3: '+' expects numbers or a string, found boolean and number"
        );
    }

    #[test]
    fn failing_block_still_pops_its_scope() {
        let block = Statement::BlockStatement(BlockStatement {
            statements: vec![Statement::Assignment(Assignment {
                lhs: (Span::default(), "missing".to_string()),
                rhs: Expression::Literal(Value::Number(1.0)),
            })],
        });

        let mut interpreter = interpreter();
        assert!(interpreter.execute(&block).is_err());
        assert_eq!(interpreter.environment().depth(), 1);
    }
}
