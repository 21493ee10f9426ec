//! Restricted evaluator over the constructor grammar.
//!
//! The walker evaluates arguments here when the target needs a computed value rather than source text (an
//! `ObjectId` from a timestamp, the 64-bit value of `Long.fromBits(...)`, a parsed date), and value mode evaluates
//! whole expressions. Only literals, containers, unary signs, equality and the calls listed in [`builtins`] are
//! evaluable; there is no global state and no user-defined code runs.

pub mod builtins;
pub mod dates;

use bsonshift_core::lang::languages::LanguageId;
use bsonshift_core::lang::operators::OperatorId;
use bsonshift_core::numbers;
use bsonshift_syntax::ast::{Argument, Expr, ExprKind, Literal, NumberKind, Property, PropertyKey, UnaryOp};

use crate::errors::{TranspileError, TranspileResult};
use crate::value::Value;

pub struct Sandbox<'s> {
    input: LanguageId,
    source: &'s str,
}

impl<'s> Sandbox<'s> {
    pub fn new(input: LanguageId, source: &'s str) -> Self {
        Self { input, source }
    }

    #[tracing::instrument(level = "trace", skip_all, fields(node = expr.kind.name()))]
    pub fn evaluate(&self, expr: &Expr) -> TranspileResult<Value> {
        match &expr.kind {
            ExprKind::Literal(lit) => self.literal(lit),
            ExprKind::Identifier(name) => self.identifier(name),
            ExprKind::Object(props) => self.document(props),
            ExprKind::Array(items) => items
                .iter()
                .map(|item| match item {
                    Some(e) => self.evaluate(e),
                    None => Ok(Value::Null),
                })
                .collect::<TranspileResult<Vec<_>>>()
                .map(Value::Array),
            ExprKind::Call { callee, args } => self.evaluate_call(callee, args, false),
            ExprKind::New(inner) => match &inner.kind {
                ExprKind::Call { callee, args } => self.evaluate_call(callee, args, true),
                _ => self.evaluate_call(inner, &[], true),
            },
            ExprKind::Member { object, property, .. } => self.member(expr, object, property),
            ExprKind::Paren(inner) => self.evaluate(inner),
            ExprKind::Unary { op, operand } => self.unary(*op, operand),
            ExprKind::Equality { op, lhs, rhs } => {
                let equal = loose_equals(&self.evaluate(lhs)?, &self.evaluate(rhs)?);
                Ok(Value::Bool(match op {
                    OperatorId::NotEq | OperatorId::NotEqEq => !equal,
                    _ => equal,
                }))
            }
            ExprKind::Function => Ok(Value::String(expr.span.text(self.source).to_string())),
            other => Err(TranspileError::not_implemented(other.name())),
        }
    }

    fn evaluate_call(&self, callee: &Expr, args: &[Argument], is_new: bool) -> TranspileResult<Value> {
        let args = args
            .iter()
            .map(|arg| match arg {
                Argument::Positional(e) => Ok(e),
                Argument::Keyword { .. } => Err(TranspileError::not_implemented("KeywordArgument")),
            })
            .collect::<TranspileResult<Vec<_>>>()?;
        self.call(callee, &args, is_new)
    }

    /// Evaluate `callee(args)`, as if written with `new` when `is_new` is set.
    pub fn call(&self, callee: &Expr, args: &[&Expr], is_new: bool) -> TranspileResult<Value> {
        let values = args
            .iter()
            .map(|arg| self.evaluate(arg))
            .collect::<TranspileResult<Vec<_>>>()?;

        let callee = callee.unparenthesized();
        if let Some(path) = callee.dotted_path() {
            if builtins::is_function(self.input, &path) {
                tracing::trace!(%path, "sandbox call");
                return builtins::call(self.input, &path, &values, is_new);
            }
        }
        match &callee.kind {
            ExprKind::Member { object, property, .. } => {
                let receiver = self.evaluate(object)?;
                builtins::method(&receiver, property, &values)
            }
            ExprKind::Identifier(name) => Err(TranspileError::Reference(format!("{name} is not defined"))),
            other => Err(TranspileError::not_implemented(other.name())),
        }
    }

    fn literal(&self, lit: &Literal) -> TranspileResult<Value> {
        Ok(match lit {
            Literal::Null => Value::Null,
            Literal::Undefined => Value::Undefined,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Regex { pattern, flags } => Value::Regex {
                pattern: pattern.clone(),
                flags: flags.clone(),
            },
            Literal::Number {
                kind: NumberKind::Decimal,
                text,
            } => Value::Double(parse_number(text)?),
            Literal::Number { text, .. } => match numbers::parse_integer(text) {
                Some(v) => match i32::try_from(v) {
                    Ok(small) => Value::Int32(small),
                    Err(_) if self.input == LanguageId::Python => Value::Int64(v),
                    Err(_) => Value::Double(v as f64),
                },
                None => Value::Double(parse_number(text)?),
            },
        })
    }

    fn identifier(&self, name: &str) -> TranspileResult<Value> {
        match (self.input, name) {
            (LanguageId::Python, _) => {}
            (_, "undefined") => return Ok(Value::Undefined),
            (_, "NaN") => return Ok(Value::Double(f64::NAN)),
            (_, "Infinity") => return Ok(Value::Double(f64::INFINITY)),
            _ => {}
        }
        Err(TranspileError::Reference(format!("{name} is not defined")))
    }

    fn member(&self, expr: &Expr, object: &Expr, property: &str) -> TranspileResult<Value> {
        if let Some(value) = expr.dotted_path().and_then(|p| builtins::constant(self.input, &p)) {
            return Ok(value);
        }
        let receiver = self.evaluate(object)?;
        builtins::attribute(&receiver, property)
    }

    fn document(&self, props: &[Property]) -> TranspileResult<Value> {
        let mut entries = Vec::with_capacity(props.len());
        for prop in props {
            let key = match &prop.key {
                PropertyKey::Identifier(name) | PropertyKey::String(name) => name.clone(),
                PropertyKey::Number(text) => numbers::js_number_string(parse_number(text)?),
                PropertyKey::Computed(expr) => match self.evaluate(expr)? {
                    Value::String(s) => s,
                    other => match other.as_f64() {
                        Some(v) => numbers::js_number_string(v),
                        None => {
                            return Err(TranspileError::Type(format!(
                                "{} cannot be used as a key",
                                other.type_name()
                            )));
                        }
                    },
                },
            };
            entries.push((key, self.evaluate(&prop.value)?));
        }
        Ok(builtins::document(entries))
    }

    fn unary(&self, op: UnaryOp, operand: &Expr) -> TranspileResult<Value> {
        let value = self.evaluate(operand)?;
        match op {
            UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
            UnaryOp::Plus => match value {
                Value::Int32(_) | Value::Int64(_) | Value::Double(_) => Ok(value),
                other => Err(TranspileError::Type(format!("bad operand type for unary +: {}", other.type_name()))),
            },
            UnaryOp::Minus => match value {
                Value::Int32(v) => Ok(v.checked_neg().map(Value::Int32).unwrap_or(Value::Int64(-i64::from(v)))),
                Value::Int64(v) => Ok(v.checked_neg().map(Value::Int64).unwrap_or(Value::Double(-(v as f64)))),
                Value::Double(v) => Ok(Value::Double(-v)),
                other => Err(TranspileError::Type(format!("bad operand type for unary -: {}", other.type_name()))),
            },
            other => Err(TranspileError::not_implemented(other.name())),
        }
    }
}

fn parse_number(text: &str) -> TranspileResult<f64> {
    numbers::parse_number(text).ok_or_else(|| TranspileError::Internal(format!("unparseable number '{text}'")))
}

fn loose_equals(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => match (a, b) {
            (Value::Null | Value::Undefined, Value::Null | Value::Undefined) => true,
            _ => a == b,
        },
    }
}
