//! Tree walker: renders a parsed program into the output language.
//!
//! The walker visits each node once (twice when an argument is retyped by a cast), assigns it a catalog type, records
//! the import codes it needs, and returns its rendered text. Per-node facts live in a side table keyed by
//! [`NodeId`], so the AST itself stays immutable.
//!
//! ## Notes
//!
//! - **Typing**: every visited node ends with a type. Calls take the return type of their callee, members the type of
//!   the attribute, literals their literal type. An untyped or unknown member chain is typed `_undefined` and rendered
//!   verbatim.
//! - **Casting**: when a numeric literal meets a parameter that wants a different numeric type it is retyped and
//!   re-rendered; the pre-cast type is kept as the node's *original* type so templates can select on it.
//! - **Process hooks**: calls whose rendering needs computed values (`ObjectId.createFromTime`, `Long.fromBits`,
//!   dates, regular expressions) are handled in [`process`]; everything else goes through the catalog templates.
//!
//! ## See also
//! - [`crate::catalog`]: the descriptors and templates the walker consults.
//! - [`crate::targets`]: per-target overrides.

mod access;
mod arguments;
mod calls;
mod containers;
mod literals;
mod process;

use std::collections::HashMap;

use bsonshift_core::lang::operators;
use bsonshift_core::lang::types::TypeKey;
use bsonshift_syntax::ast::{Expr, ExprKind, NodeId, Program, UnaryOp};

use crate::catalog::imports::RequiredImports;
use crate::catalog::template::Args;
use crate::catalog::{Catalog, DescId, Descriptor};
use crate::errors::{TranspileError, TranspileResult};
use crate::sandbox::Sandbox;

pub(crate) use containers::property_name;

/// Facts recorded for one node while walking.
#[derive(Debug, Clone, Default)]
struct NodeInfo {
    ty: Option<DescId>,
    /// Type before a numeric cast.
    original: Option<DescId>,
    indent_depth: usize,
    /// The node is the target of `new`.
    was_new: bool,
    /// Rendered receiver of a member access, for `{lhs}` in argument templates.
    receiver: Option<String>,
}

pub struct Walker<'a> {
    catalog: &'a Catalog,
    source: &'a str,
    imports: &'a mut RequiredImports,
    idiomatic: bool,
    info: HashMap<NodeId, NodeInfo>,
    depth: usize,
    root: Option<NodeId>,
}

impl<'a> Walker<'a> {
    pub fn new(catalog: &'a Catalog, source: &'a str, imports: &'a mut RequiredImports, idiomatic: bool) -> Self {
        Self {
            catalog,
            source,
            imports,
            idiomatic,
            info: HashMap::new(),
            depth: 0,
            root: None,
        }
    }

    /// Render every statement, joined by the target's statement separator.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.statements.len()))]
    pub fn walk(&mut self, program: &Program) -> TranspileResult<String> {
        self.info.reserve(program.node_count as usize);
        let mut rendered = Vec::with_capacity(program.statements.len());
        for statement in &program.statements {
            self.root = Some(statement.unparenthesized().id);
            self.depth = 0;
            rendered.push(self.visit(statement)?);
        }
        Ok(rendered.join(&self.catalog.syntax.eos).trim().to_string())
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Render one expression and record its type.
    pub(crate) fn visit(&mut self, expr: &Expr) -> TranspileResult<String> {
        tracing::trace!(node = expr.kind.name(), id = expr.id.0, "visit");
        match &expr.kind {
            ExprKind::Literal(lit) => self.visit_literal(expr, lit),
            ExprKind::Identifier(name) => self.visit_identifier(expr, name),
            ExprKind::Member { object, property, .. } => self.visit_member(expr, object, property),
            ExprKind::Call { callee, args } => self.visit_call(expr, callee, args),
            ExprKind::New(target) => self.visit_new(expr, target),
            ExprKind::Object(props) => self.visit_object(expr, props),
            ExprKind::Array(items) => self.visit_array(expr, items),
            ExprKind::Paren(inner) => {
                let rendered = self.visit(inner)?;
                self.inherit(expr.id, inner.id);
                Ok(format!("({rendered})"))
            }
            ExprKind::Unary {
                op: op @ (UnaryOp::Minus | UnaryOp::Plus),
                operand,
            } => {
                let rendered = self.visit(operand)?;
                self.inherit(expr.id, operand.id);
                let sign = if *op == UnaryOp::Minus { "-" } else { "+" };
                Ok(format!("{sign}{rendered}"))
            }
            ExprKind::Equality { op, lhs, rhs } => {
                let lhs = self.visit(lhs)?;
                let rhs = self.visit(rhs)?;
                let ty = self.catalog.type_of(TypeKey::Bool)?;
                self.set_type(expr.id, ty);
                let op = operators::as_str(*op);
                Ok(match &self.catalog.syntax.equality {
                    Some(template) => {
                        template.render(&Args::new().with("lhs", lhs).with("op", op).with("rhs", rhs))
                    }
                    None => format!("{lhs} {op} {rhs}"),
                })
            }
            other => Err(TranspileError::not_implemented(other.name())),
        }
    }

    // ========================================================================
    // Side table
    // ========================================================================

    fn info_mut(&mut self, id: NodeId) -> &mut NodeInfo {
        self.info.entry(id).or_default()
    }

    fn ty(&self, id: NodeId) -> Option<DescId> {
        self.info.get(&id).and_then(|i| i.ty)
    }

    fn original(&self, id: NodeId) -> Option<DescId> {
        self.info.get(&id).and_then(|i| i.original)
    }

    fn was_new(&self, id: NodeId) -> bool {
        self.info.get(&id).is_some_and(|i| i.was_new)
    }

    fn receiver(&self, id: NodeId) -> Option<&str> {
        self.info.get(&id).and_then(|i| i.receiver.as_deref())
    }

    fn set_type(&mut self, id: NodeId, ty: DescId) {
        self.info_mut(id).ty = Some(ty);
    }

    fn inherit(&mut self, id: NodeId, from: NodeId) {
        let (ty, original) = match self.info.get(&from) {
            Some(info) => (info.ty, info.original),
            None => (None, None),
        };
        let info = self.info_mut(id);
        info.ty = ty;
        info.original = original;
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Descriptor lookup that borrows the catalog, not the walker.
    fn descriptor(&self, id: DescId) -> &'a Descriptor {
        self.catalog.get(id)
    }

    fn type_of(&self, key: TypeKey) -> TranspileResult<DescId> {
        self.catalog.type_of(key)
    }

    fn record(&mut self, code: Option<u16>) {
        if let Some(code) = code {
            self.imports.add(code);
        }
    }

    pub(crate) fn record_code(&mut self, code: u16) {
        self.imports.add(code);
    }

    pub(crate) fn record_name(&mut self, code: u16, name: &str) {
        self.imports.add_name(code, name);
    }

    fn text(&self, expr: &Expr) -> &'a str {
        expr.span.text(self.source)
    }

    fn sandbox(&self) -> Sandbox<'a> {
        Sandbox::new(self.catalog.input(), self.source)
    }

    /// The innermost node under parentheses and signs; casts retype this node.
    fn typed_node(expr: &Expr) -> &Expr {
        let mut node = expr;
        while let Some(inner) = node.single_operand() {
            node = inner;
        }
        node
    }

    fn node_type(&self, expr: &Expr) -> TranspileResult<DescId> {
        let node = Self::typed_node(expr);
        self.ty(node.id).ok_or_else(|| {
            TranspileError::Internal(format!("'{}' was rendered without a type", self.text(node)))
        })
    }

    /// Render a value through the `_string` template.
    fn render_string(&self, value: &str) -> TranspileResult<String> {
        let ty = self.type_of(TypeKey::String)?;
        Ok(match &self.descriptor(ty).template {
            Some(template) => template.render(&Args::positional([value])),
            None => bsonshift_core::strings::single_quote_stringify(value),
        })
    }
}

/// Escape raw source text so it can sit inside a string literal.
fn escape_raw(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\n', "\\n").replace('\r', "\\r")
}

#[cfg(test)]
mod tests;
