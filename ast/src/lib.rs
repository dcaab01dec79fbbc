use std::fmt::{self, Display, Formatter};

mod error;
mod span;
mod value;

pub use error::*;
pub use span::*;
pub use value::*;

#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    VarDeclaration(VarDeclaration),
    Assignment(Assignment),
    IfStatement(IfStatement),
    WhileStatement(WhileStatement),
    ForStatement(ForStatement),
    PrintStatement(PrintStatement),
    InputStatement(InputStatement),
    BlockStatement(BlockStatement),
    ExpressionStatement(Expression),
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarDeclaration {
    pub name: Spanned<String>,
    pub initializer: Option<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub lhs: Spanned<String>,
    pub rhs: Expression,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub if_branch: Box<Statement>,
    pub else_branch: Option<Box<Statement>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Box<Statement>,
}

/// `for (initializer; condition; update) body`. Every clause may be omitted;
/// a missing condition loops forever.
#[derive(Clone, Debug, PartialEq)]
pub struct ForStatement {
    pub initializer: Option<Box<Statement>>,
    pub condition: Option<Expression>,
    pub update: Option<Box<Statement>>,
    pub body: Box<Statement>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PrintStatement {
    pub span: Span,
    pub arguments: Vec<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InputStatement {
    pub target: Spanned<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EqualityOperator {
    Equal,
    NotEqual,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ComparisonOperator {
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UnaryOperator {
    Not,
    Negate,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Or(Box<Expression>, Span, Box<Expression>),
    And(Box<Expression>, Span, Box<Expression>),
    Equality(
        Box<Expression>,
        Spanned<EqualityOperator>,
        Box<Expression>,
    ),
    Comparison(
        Box<Expression>,
        Spanned<ComparisonOperator>,
        Box<Expression>,
    ),
    Arithmetic(
        Box<Expression>,
        Spanned<ArithmeticOperator>,
        Box<Expression>,
    ),
    Unary(Spanned<UnaryOperator>, Box<Expression>),
    Literal(Value),
    Identifier(Spanned<String>),
    Call(Spanned<String>, Vec<Expression>),
    Grouping(Box<Expression>),
}

impl Display for EqualityOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EqualityOperator::Equal => write!(f, "=="),
            EqualityOperator::NotEqual => write!(f, "!="),
        }
    }
}

impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOperator::LessThan => write!(f, "<"),
            ComparisonOperator::LessThanOrEqual => write!(f, "<="),
            ComparisonOperator::GreaterThan => write!(f, ">"),
            ComparisonOperator::GreaterThanOrEqual => write!(f, ">="),
        }
    }
}

impl Display for ArithmeticOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticOperator::Add => write!(f, "+"),
            ArithmeticOperator::Subtract => write!(f, "-"),
            ArithmeticOperator::Multiply => write!(f, "*"),
            ArithmeticOperator::Divide => write!(f, "/"),
        }
    }
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Not => write!(f, "!"),
            UnaryOperator::Negate => write!(f, "-"),
        }
    }
}
