//! Member access.

use bsonshift_core::lang::types::TypeKey;
use bsonshift_syntax::ast::{Expr, ExprKind};

use super::Walker;
use crate::catalog::template::Args;
use crate::errors::{TranspileError, TranspileResult};

impl Walker<'_> {
    /// `object.property`
    ///
    /// Members of domain types resolve through the catalog; a chain that leaves the catalog (an unknown member of a
    /// non-domain symbol) is typed `_undefined` and rendered as written.
    pub(super) fn visit_member(&mut self, expr: &Expr, object: &Expr, property: &str) -> TranspileResult<String> {
        match &object.unparenthesized().kind {
            ExprKind::Identifier(_) | ExprKind::Call { .. } | ExprKind::Member { .. } | ExprKind::New(_) => {}
            _ => {
                return Err(TranspileError::Unimplemented(
                    "Attribute access for non-symbols not currently supported".to_string(),
                ));
            }
        }

        let lhs = self.visit(object)?;
        let owner = self.node_type(object)?;
        let object_text = self.text(object);
        let verbatim = |lhs: &str, name: &str| {
            if lhs.is_empty() {
                format!("{object_text}.{name}")
            } else {
                format!("{lhs}.{name}")
            }
        };

        let Some(member) = self.catalog.member(owner, property)? else {
            let undefined = self.type_of(TypeKey::Undefined)?;
            let rendered = verbatim(&lhs, property);
            self.set_type(expr.id, undefined);
            return Ok(rendered);
        };

        let desc = self.descriptor(member);
        let rendered = match &desc.template {
            Some(template) => template.render(&Args::new().with("lhs", lhs.as_str()).with("rhs", property)),
            None => verbatim(&lhs, &desc.name),
        };
        self.set_type(expr.id, member);
        self.info_mut(expr.id).receiver = Some(lhs);
        self.record(desc.code);
        Ok(rendered)
    }
}
