//! Abstract syntax tree for the bsonshift source dialects.
//!
//! One tree shape serves JavaScript, shell and Python input. Dialect differences are normalized at parse time:
//! Python dicts become [`ExprKind::Object`], lists and tuples become [`ExprKind::Array`], `and`/`or`/`not` become
//! the logical operators.
//!
//! Every [`Expr`] carries a [`NodeId`] that is unique within one parse. The transpiler keys its per-node side table
//! (types, coercions, indentation depth) on these ids instead of mutating the tree.

use bsonshift_core::lang::operators::{self, OperatorId};

// ============================================================================
// Spans and ids
// ============================================================================

/// Byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Slice the source text covered by this span.
    ///
    /// Returns an empty string if the span does not fall on character boundaries of `source`.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.end.saturating_sub(span.start)).into()
    }
}

/// Identity of a node within one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

// ============================================================================
// Program
// ============================================================================

/// A parsed source text: one or more expression statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Expr>,
    /// Number of node ids handed out; every [`NodeId`] in the tree is below this.
    pub node_count: u32,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Identifier(String),
    This,
    /// `{k: v, ...}` or a Python dict.
    Object(Vec<Property>),
    /// `[a, , b]`; `None` marks an elision. Python tuples land here too.
    Array(Vec<Option<Expr>>),
    Call {
        callee: Box<Expr>,
        args: Vec<Argument>,
    },
    /// `new X` or `new X(args)`; in the latter case `target` is the [`ExprKind::Call`].
    New(Box<Expr>),
    Member {
        object: Box<Expr>,
        property: String,
        property_span: Span,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Paren(Box<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Equality {
        op: OperatorId,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Ternary {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// `function (...) { ... }`; the body is kept as raw source via the node span.
    Function,
    /// Python `lambda ...: ...`; kept as raw source like [`ExprKind::Function`].
    Lambda,
}

impl ExprKind {
    /// Grammar-level name of this expression form, used in "not yet implemented" diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ExprKind::Literal(_) => "LiteralExpression",
            ExprKind::Identifier(_) => "IdentifierExpression",
            ExprKind::This => "ThisExpression",
            ExprKind::Object(_) => "ObjectLiteralExpression",
            ExprKind::Array(_) => "ArrayLiteralExpression",
            ExprKind::Call { .. } => "FuncCallExpression",
            ExprKind::New(_) => "NewExpression",
            ExprKind::Member { .. } => "GetAttributeExpression",
            ExprKind::Index { .. } => "MemberIndexExpression",
            ExprKind::Paren(_) => "ParenthesizedExpression",
            ExprKind::Unary { op, .. } => op.name(),
            ExprKind::Binary { op, .. } => op.name(),
            ExprKind::Equality { .. } => "EqualityExpression",
            ExprKind::Ternary { .. } => "TernaryExpression",
            ExprKind::Assign { .. } => "AssignmentExpression",
            ExprKind::Function => "FunctionExpression",
            ExprKind::Lambda => "LambdaExpression",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Undefined,
    Bool(bool),
    /// Decoded string value; the quoted source text is available through the node span.
    String(String),
    Number { kind: NumberKind, text: String },
    Regex { pattern: String, flags: String },
}

/// Lexical class of a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    Integer,
    Decimal,
    Hex,
    Octal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: PropertyKey,
    pub key_span: Span,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// Bare identifier key (`{x: 1}`).
    Identifier(String),
    /// Quoted key; holds the decoded value.
    String(String),
    /// Numeric key, as written.
    Number(String),
    /// Any other key expression (Python dict keys).
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Positional(Expr),
    /// Python `name=value`.
    Keyword { name: String, value: Expr, span: Span },
}

impl Argument {
    pub fn span(&self) -> Span {
        match self {
            Argument::Positional(expr) => expr.span,
            Argument::Keyword { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Minus,
    Plus,
    Not,
    Typeof,
    Void,
    Delete,
}

impl UnaryOp {
    pub fn name(&self) -> &'static str {
        match self {
            UnaryOp::Minus => "UnaryMinusExpression",
            UnaryOp::Plus => "UnaryPlusExpression",
            UnaryOp::Not => "NotExpression",
            UnaryOp::Typeof => "TypeofExpression",
            UnaryOp::Void => "VoidExpression",
            UnaryOp::Delete => "DeleteExpression",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Arithmetic(OperatorId),
    Relational(OperatorId),
    And,
    Or,
    In,
    Instanceof,
    Is,
}

impl BinaryOp {
    pub fn name(&self) -> &'static str {
        match self {
            BinaryOp::Arithmetic(OperatorId::Plus | OperatorId::Minus) => "AdditiveExpression",
            BinaryOp::Arithmetic(OperatorId::StarStar) => "PowerExpression",
            BinaryOp::Arithmetic(_) => "MultiplicativeExpression",
            BinaryOp::Relational(_) => "RelationalExpression",
            BinaryOp::And => "LogicalAndExpression",
            BinaryOp::Or => "LogicalOrExpression",
            BinaryOp::In => "InExpression",
            BinaryOp::Instanceof => "InstanceofExpression",
            BinaryOp::Is => "IdentityExpression",
        }
    }

    /// Source spelling of arithmetic and relational operators.
    pub fn spelling(&self) -> &'static str {
        match self {
            BinaryOp::Arithmetic(op) | BinaryOp::Relational(op) => operators::as_str(*op),
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::In => "in",
            BinaryOp::Instanceof => "instanceof",
            BinaryOp::Is => "is",
        }
    }
}

// ============================================================================
// Traversal helpers
// ============================================================================

impl Expr {
    /// Strip any number of enclosing parentheses.
    pub fn unparenthesized(&self) -> &Expr {
        let mut expr = self;
        while let ExprKind::Paren(inner) = &expr.kind {
            expr = inner;
        }
        expr
    }

    /// Return the single operand of a transparent wrapper (parentheses or a sign).
    pub fn single_operand(&self) -> Option<&Expr> {
        match &self.kind {
            ExprKind::Paren(inner) => Some(inner),
            ExprKind::Unary {
                op: UnaryOp::Minus | UnaryOp::Plus,
                operand,
            } => Some(operand),
            _ => None,
        }
    }

    /// Dotted path of a member chain rooted at an identifier (`a.b.c`), if this is one.
    pub fn dotted_path(&self) -> Option<String> {
        match &self.kind {
            ExprKind::Identifier(name) => Some(name.clone()),
            ExprKind::Member { object, property, .. } => {
                object.dotted_path().map(|base| format!("{base}.{property}"))
            }
            _ => None,
        }
    }
}
