//! Object and array literals.

use bsonshift_core::lang::import_codes;
use bsonshift_core::lang::types::TypeKey;
use bsonshift_core::strings;
use bsonshift_syntax::ast::{Expr, ExprKind, Literal, Property, PropertyKey};

use super::{Walker, escape_raw};
use crate::catalog::template::Args;
use crate::errors::TranspileResult;
use crate::targets;

/// Static name of a property key; `None` for computed keys.
pub(crate) fn property_name(prop: &Property) -> Option<&str> {
    match &prop.key {
        PropertyKey::Identifier(name) | PropertyKey::String(name) | PropertyKey::Number(name) => Some(name),
        PropertyKey::Computed(_) => None,
    }
}

impl Walker<'_> {
    pub(super) fn visit_object(&mut self, expr: &Expr, props: &[Property]) -> TranspileResult<String> {
        let ty = self.type_of(TypeKey::Object)?;
        self.set_type(expr.id, ty);

        if self.idiomatic && self.root == Some(expr.id) {
            if let Some(rendered) = self.idiomatic_object(props)? {
                return Ok(rendered);
            }
        }

        self.imports.add(import_codes::OBJECT);
        self.depth += 1;
        let depth = self.depth;
        self.info_mut(expr.id).indent_depth = depth;
        let items = self.render_properties(props);
        self.depth -= 1;
        Ok(self.layout_object(&items?, depth))
    }

    /// Try the target's native form of a top-level document.
    fn idiomatic_object(&mut self, props: &[Property]) -> TranspileResult<Option<String>> {
        let Some(render) = targets::idiomatic_object(self.catalog.output()) else {
            return Ok(None);
        };
        let rendered = self.attempt(|walker| render(walker, props))?;
        if rendered.is_none() {
            tracing::debug!("idiomatic form rejected, using generic document");
        }
        Ok(rendered)
    }

    /// Try the target's native form of a top-level array.
    fn idiomatic_array(&mut self, items: &[Option<Expr>]) -> TranspileResult<Option<String>> {
        let Some(render) = targets::idiomatic_array(self.catalog.output()) else {
            return Ok(None);
        };
        let rendered = self.attempt(|walker| render(walker, items))?;
        if rendered.is_none() {
            tracing::debug!("idiomatic form rejected, using generic array");
        }
        Ok(rendered)
    }

    /// Run `render`; when it declines (`Ok(None)`), the imports it recorded are rolled back.
    pub(crate) fn attempt<T>(
        &mut self,
        render: impl FnOnce(&mut Self) -> TranspileResult<Option<T>>,
    ) -> TranspileResult<Option<T>> {
        let snapshot = self.imports.snapshot();
        let rendered = render(self)?;
        if rendered.is_none() {
            self.imports.restore(snapshot);
        }
        Ok(rendered)
    }

    fn render_properties(&mut self, props: &[Property]) -> TranspileResult<Vec<(String, String)>> {
        let mut items = Vec::with_capacity(props.len());
        for prop in props {
            let key = self.property_key(prop)?;
            let value = if property_name(prop) == Some("$where") && !is_string_literal(&prop.value) {
                // `$where` carries script text, never a value.
                self.render_string(&escape_raw(self.text(&prop.value)))?
            } else {
                self.visit(&prop.value)?
            };
            items.push((key, value));
        }
        Ok(items)
    }

    fn property_key(&mut self, prop: &Property) -> TranspileResult<String> {
        Ok(match &prop.key {
            PropertyKey::Identifier(name) | PropertyKey::Number(name) => name.clone(),
            PropertyKey::String(value) => {
                let raw = prop.key_span.text(self.source);
                if raw.starts_with('\'') || raw.starts_with('"') {
                    raw.to_string()
                } else {
                    strings::single_quote_stringify(value)
                }
            }
            PropertyKey::Computed(expr) => self.visit(expr)?,
        })
    }

    fn layout_object(&self, items: &[(String, String)], depth: usize) -> String {
        let layout = &self.catalog.containers.object;
        if items.is_empty() {
            return layout.empty.clone();
        }
        let rendered: Vec<String> = items
            .iter()
            .enumerate()
            .map(|(i, (key, value))| {
                let args = Args::new().with("key", key.as_str()).with("value", value.as_str());
                match (&layout.first, i) {
                    (Some(first), 0) => first.render(&args),
                    _ => layout.item.render(&args),
                }
            })
            .collect();

        if layout.multiline {
            let pad = " ".repeat(layout.indent * depth);
            let close_pad = " ".repeat(layout.indent * depth.saturating_sub(1));
            let separator = format!("{}\n", layout.separator);
            let body = rendered
                .iter()
                .map(|item| format!("{pad}{item}"))
                .collect::<Vec<_>>()
                .join(&separator);
            format!("{}\n{body}\n{close_pad}{}", layout.open, layout.close)
        } else {
            format!("{}{}{}", layout.open, rendered.join(&layout.separator), layout.close)
        }
    }

    pub(super) fn visit_array(&mut self, expr: &Expr, items: &[Option<Expr>]) -> TranspileResult<String> {
        let ty = self.type_of(TypeKey::Array)?;
        self.set_type(expr.id, ty);

        if self.idiomatic && self.root == Some(expr.id) {
            if let Some(rendered) = self.idiomatic_array(items)? {
                return Ok(rendered);
            }
        }

        self.imports.add(import_codes::ARRAY);

        let mut rendered = Vec::with_capacity(items.len());
        for item in items {
            rendered.push(match item {
                Some(item) => self.visit(item)?,
                None => self.render_elision()?,
            });
        }
        let layout = &self.catalog.containers.array;
        Ok(if rendered.is_empty() {
            layout.empty.clone()
        } else {
            format!("{}{}{}", layout.open, rendered.join(&layout.separator), layout.close)
        })
    }

    /// The hole in `[1, , 2]`.
    pub(crate) fn render_elision(&mut self) -> TranspileResult<String> {
        let ty = self.type_of(TypeKey::Undefined)?;
        let desc = self.descriptor(ty);
        self.record(desc.code);
        Ok(match &desc.template {
            Some(template) => template.render(&Args::new()),
            None => "null".to_string(),
        })
    }
}

fn is_string_literal(expr: &Expr) -> bool {
    matches!(expr.unparenthesized().kind, ExprKind::Literal(Literal::String(_)))
}
