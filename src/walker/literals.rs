//! Literals, identifiers and regular expressions.

use bsonshift_core::lang::import_codes;
use bsonshift_core::lang::languages::LanguageId;
use bsonshift_core::lang::types::TypeKey;
use bsonshift_core::strings;
use bsonshift_syntax::ast::{Expr, Literal, NodeId, NumberKind, Span};

use super::Walker;
use crate::catalog::template::Args;
use crate::errors::TranspileResult;

impl Walker<'_> {
    pub(super) fn visit_literal(&mut self, expr: &Expr, lit: &Literal) -> TranspileResult<String> {
        let key = match lit {
            Literal::Regex { pattern, flags } => return self.render_regex(expr.id, pattern, flags, false),
            Literal::Null => TypeKey::Null,
            Literal::Undefined => TypeKey::Undefined,
            Literal::Bool(_) => TypeKey::Bool,
            Literal::String(_) => TypeKey::String,
            Literal::Number { kind, .. } => match kind {
                NumberKind::Integer => TypeKey::Long,
                NumberKind::Decimal => TypeKey::Decimal,
                NumberKind::Hex => TypeKey::Hex,
                NumberKind::Octal => TypeKey::Octal,
            },
        };

        // A cast may already have retyped this node.
        let ty = match self.ty(expr.id) {
            Some(ty) => ty,
            None => {
                let ty = self.type_of(key)?;
                self.set_type(expr.id, ty);
                ty
            }
        };
        let desc = self.descriptor(ty);

        let mut text = match lit {
            Literal::String(value) => self.string_source(expr.span, value),
            _ => self.text(expr).to_string(),
        };
        let mut origin = match self.original(expr.id) {
            Some(original) => self.descriptor(original).id.clone(),
            None => desc.id.clone(),
        };

        // Octal text is not valid in every target numeric form, so it is rewritten before retyping.
        if key == TypeKey::Octal && !desc.is_key(TypeKey::Octal) {
            let octal = self.descriptor(self.type_of(TypeKey::Octal)?);
            if let Some(template) = &octal.template {
                text = template.render(&Args::positional([text.as_str(), octal.id.as_str()]));
            }
            origin = octal.id.clone();
        }

        self.record(desc.code);
        Ok(match &desc.template {
            Some(template) => template.render(&Args::positional([text, origin])),
            None => text,
        })
    }

    /// Source text of a string literal, re-quoted when the source spelling is not a plain quoted string.
    fn string_source(&self, span: Span, value: &str) -> String {
        let raw = span.text(self.source);
        let plain = (raw.starts_with('\'') || raw.starts_with('"'))
            && !raw.starts_with("'''")
            && !raw.starts_with("\"\"\"");
        if plain {
            raw.to_string()
        } else {
            let escaped = value.replace('\\', "\\\\").replace('\n', "\\n").replace('\'', "\\'");
            format!("'{escaped}'")
        }
    }

    pub(super) fn visit_identifier(&mut self, expr: &Expr, name: &str) -> TranspileResult<String> {
        let id = self.catalog.lookup(name)?;
        self.set_type(expr.id, id);
        let desc = self.descriptor(id);
        self.record(desc.code);
        Ok(match &desc.template {
            Some(template) => template.render(&Args::new()),
            None => desc.name.clone(),
        })
    }

    /// Render a regular expression with flags already in source spelling.
    ///
    /// `from_string` marks a pattern that came from string text (`RegExp('a/b')`), whose slashes need escaping in a
    /// literal-syntax target.
    pub(super) fn render_regex(
        &mut self,
        id: NodeId,
        pattern: &str,
        flags: &str,
        from_string: bool,
    ) -> TranspileResult<String> {
        let flags = self.catalog.syntax.regex_flags.translate(flags)?;
        let pattern = match self.catalog.output() {
            LanguageId::JavaScript | LanguageId::Shell if from_string => strings::escape_quote(pattern, '/'),
            _ => pattern.to_string(),
        };
        let ty = self.type_of(TypeKey::Regex)?;
        self.set_type(id, ty);
        self.imports.add(import_codes::REGEX);
        Ok(match &self.descriptor(ty).template {
            Some(template) => template.render(&Args::positional([pattern, flags])),
            None => format!("/{pattern}/{flags}"),
        })
    }
}
