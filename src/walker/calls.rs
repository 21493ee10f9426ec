//! Calls and `new`.

use bsonshift_core::lang::types::TypeKey;
use bsonshift_syntax::ast::{Argument, Expr, ExprKind};

use super::Walker;
use crate::catalog::template::Args;
use crate::catalog::{Callable, Descriptor};
use crate::errors::{TranspileError, TranspileResult};
use crate::targets::{self, DateArg, EmitCall};

/// A call being rendered: the call node, its resolved callee and its positional arguments.
pub(super) struct CallSite<'e, 'a> {
    /// The node that receives the call's type (the `Call`, or a bare `new X`).
    pub call: &'e Expr,
    pub callee: &'e Expr,
    pub desc: &'a Descriptor,
    /// Rendered callee.
    pub lhs: String,
    pub args: &'e [&'e Expr],
    pub was_new: bool,
}

impl<'a> Walker<'a> {
    pub(super) fn visit_call(&mut self, expr: &Expr, callee: &Expr, args: &[Argument]) -> TranspileResult<String> {
        let lhs = self.visit(callee)?;
        let args = args
            .iter()
            .map(|arg| match arg {
                Argument::Positional(e) => Ok(e),
                Argument::Keyword { .. } => Err(TranspileError::not_implemented("KeywordArgument")),
            })
            .collect::<TranspileResult<Vec<_>>>()?;
        self.finish_call(expr, callee, lhs, &args)
    }

    pub(super) fn visit_new(&mut self, expr: &Expr, target: &Expr) -> TranspileResult<String> {
        let rendered = match &target.kind {
            ExprKind::Call { .. } => {
                self.info_mut(target.id).was_new = true;
                let rendered = self.visit(target)?;
                self.inherit(expr.id, target.id);
                rendered
            }
            // `new X` without an argument list
            _ => {
                self.info_mut(expr.id).was_new = true;
                let lhs = self.visit(target)?;
                self.finish_call(expr, target, lhs, &[])?
            }
        };
        Ok(rendered)
    }

    /// Type-check and render a call whose callee has been visited.
    fn finish_call(&mut self, call: &Expr, callee: &Expr, lhs: String, args: &[&Expr]) -> TranspileResult<String> {
        let callee_ty = self.node_type(callee)?;
        let desc = self.descriptor(callee_ty);

        // Calls on values the catalog does not know are passed through.
        if desc.is_key(TypeKey::Undefined) {
            let rendered = args.iter().map(|a| self.visit(a)).collect::<TranspileResult<Vec<_>>>()?;
            self.set_type(call.id, callee_ty);
            return Ok(format!("{lhs}({})", rendered.join(", ")));
        }

        let site = CallSite {
            call,
            callee,
            desc,
            lhs,
            args,
            was_new: self.was_new(call.id),
        };

        if let Some(key) = desc.key {
            if let Some(rendered) = self.process(&site, key)? {
                return Ok(rendered);
            }
            if let Some(emit) = targets::emit_for(self.catalog.output(), key) {
                let raw: Vec<&str> = args.iter().map(|a| self.text(a)).collect();
                let rendered = emit(&EmitCall {
                    raw: &raw,
                    ..EmitCall::default()
                })?;
                self.set_return_type(&site)?;
                self.record(desc.code);
                return Ok(rendered);
            }
        }

        if desc.callable == Callable::Var {
            return Err(TranspileError::Type(format!("{} is not callable", desc.id)));
        }

        let rendered = self.check_arguments(&desc.args, args, &desc.id)?;
        self.set_return_type(&site)?;
        self.generate_call(&site, Args::positional(rendered.iter().map(String::as_str)), &rendered, None)
    }

    fn set_return_type(&mut self, site: &CallSite<'_, '_>) -> TranspileResult<()> {
        let ret = match site.desc.ret {
            Some(ret) => ret,
            None => self.type_of(TypeKey::Undefined)?,
        };
        self.set_type(site.call.id, ret);
        Ok(())
    }

    /// Assemble the call text from prepared arguments.
    ///
    /// A target override for the callee's key wins; otherwise the callee's argument template is rendered (with
    /// `{lhs}` bound to a member call's receiver) and appended to the rendered callee, or the display arguments are
    /// joined into a plain argument list. The target's `new` keyword is applied last, to constructors only.
    pub(super) fn generate_call(
        &mut self,
        site: &CallSite<'_, '_>,
        args: Args,
        display: &[String],
        date: Option<&DateArg>,
    ) -> TranspileResult<String> {
        let desc = site.desc;
        self.record(desc.code);

        if let Some(emit) = desc.key.and_then(|key| targets::emit_for(self.catalog.output(), key)) {
            let raw: Vec<&str> = site.args.iter().map(|a| self.text(a)).collect();
            return emit(&EmitCall {
                args: args.positional_values(),
                raw: &raw,
                date,
            });
        }

        let rendered = match &desc.args_template {
            Some(template) => {
                let receiver = self.receiver(site.callee.unparenthesized().id).unwrap_or_default();
                template.render(&args.with("lhs", receiver))
            }
            None => format!("({})", display.join(", ")),
        };
        let expr = format!("{}{rendered}", site.lhs);
        Ok(self
            .catalog
            .syntax
            .apply_new(expr, desc.callable != Callable::Constructor, desc.code))
    }
}
