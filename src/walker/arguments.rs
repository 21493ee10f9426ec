//! Argument checking and numeric casts.

use bsonshift_core::lang::types;
use bsonshift_syntax::ast::Expr;

use super::Walker;
use crate::errors::{TranspileError, TranspileResult};

/// Outcome of matching one argument against one parameter slot.
enum Cast {
    Rendered(String),
    /// The argument's type id, for the error message.
    Mismatch(String),
}

impl Walker<'_> {
    /// Render `args` against the parameter slots `expected`, casting numeric literals where a slot asks for it.
    ///
    /// A slot is a list of accepted type ids; a `None` entry makes the slot optional.
    ///
    /// ## Errors
    /// - `Argument` on a count mismatch or when an argument's type is in no accepted alternative.
    pub(super) fn check_arguments(
        &mut self,
        expected: &[Vec<Option<String>>],
        args: &[&Expr],
        name: &str,
    ) -> TranspileResult<Vec<String>> {
        if args.is_empty() && expected.first().is_some_and(|slot| !slot.contains(&None)) {
            return Err(TranspileError::Argument(format!(
                "Argument count mismatch: '{name}' requires least one argument"
            )));
        }
        if args.len() > expected.len() {
            return Err(TranspileError::Argument(format!(
                "Argument count mismatch: '{name}' expects {} args and got {}",
                expected.len(),
                args.len()
            )));
        }

        let mut rendered = Vec::with_capacity(args.len());
        for (i, slot) in expected.iter().enumerate() {
            let Some(arg) = args.get(i) else {
                if slot.contains(&None) {
                    break;
                }
                return Err(TranspileError::Argument(format!(
                    "Argument count mismatch: too few arguments passed to '{name}'"
                )));
            };
            match self.cast_type(slot, arg)? {
                Cast::Rendered(text) => rendered.push(text),
                Cast::Mismatch(actual) => {
                    let accepted: Vec<&str> = slot
                        .iter()
                        .map(|e| e.as_deref().unwrap_or("[optional]"))
                        .collect();
                    return Err(TranspileError::Argument(format!(
                        "Argument type mismatch: '{name}' expects types {} but got type {actual} for argument at index {i}",
                        accepted.join(",")
                    )));
                }
            }
        }
        Ok(rendered)
    }

    /// Render `arg` and match it against one slot.
    fn cast_type(&mut self, slot: &[Option<String>], arg: &Expr) -> TranspileResult<Cast> {
        let rendered = self.visit(arg)?;
        let typed = Self::typed_node(arg);
        let ty = self.node_type(arg)?;
        let desc = self.descriptor(ty);

        let accepted: Vec<&str> = slot.iter().flatten().map(String::as_str).collect();
        if accepted.contains(&desc.id.as_str()) {
            return Ok(Cast::Rendered(rendered));
        }

        let numeric = desc.key.is_some_and(types::is_numeric);
        let wrapper = desc.key.is_some_and(types::is_numeric_wrapper);
        if accepted.contains(&types::as_str(types::TypeKey::Numeric)) && (numeric || wrapper) {
            return Ok(Cast::Rendered(rendered));
        }

        if numeric {
            let target = accepted
                .iter()
                .filter_map(|id| self.catalog.type_id(id))
                .find(|id| self.descriptor(*id).key.is_some_and(types::is_numeric));
            if let Some(target) = target {
                tracing::debug!(from = %desc.id, to = %self.descriptor(target).id, "numeric cast");
                let info = self.info_mut(typed.id);
                info.original.get_or_insert(ty);
                info.ty = Some(target);
                let rendered = self.visit(arg)?;
                // Re-visiting a call resets its type to the return type.
                self.set_type(typed.id, target);
                self.inherit_chain(arg);
                return Ok(Cast::Rendered(rendered));
            }
        }

        Ok(Cast::Mismatch(desc.id.clone()))
    }

    /// Copy the type of the innermost node back up through parentheses and signs.
    fn inherit_chain(&mut self, expr: &Expr) {
        if let Some(inner) = expr.single_operand() {
            self.inherit_chain(inner);
            self.inherit(expr.id, inner.id);
        }
    }
}
