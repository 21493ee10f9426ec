//! Process hooks: calls that need evaluated arguments before they can be rendered.
//!
//! Each hook checks the arguments itself, computes what the templates need (a 64-bit value, a hex id, a date, a
//! regex with translated flags), sets the call's type and finishes through [`Walker::generate_call`].

use bsonshift_core::lang::import_codes;
use bsonshift_core::lang::languages::LanguageId;
use bsonshift_core::lang::types::TypeKey;
use bsonshift_core::strings;
use bsonshift_syntax::ast::{ExprKind, Literal};

use super::calls::CallSite;
use super::{Walker, escape_raw};
use crate::catalog::template::Args;
use crate::errors::{ErrorKind, TranspileError, TranspileResult};
use crate::targets::DateArg;
use crate::value::Value;

const INVALID_DATE_ARGS: &str =
    "Invalid argument to Date: requires either no args, one string or number, or up to 7 numbers";

impl Walker<'_> {
    /// Run the hook for `key`, if there is one.
    pub(super) fn process(&mut self, site: &CallSite<'_, '_>, key: TypeKey) -> TranspileResult<Option<String>> {
        let rendered = match key {
            TypeKey::Code => self.process_code(site)?,
            TypeKey::ObjectId | TypeKey::ObjectIdCreateFromHexString => self.process_object_id(site)?,
            TypeKey::Binary => return Err(TranspileError::Unimplemented("Binary type not supported".to_string())),
            TypeKey::Int64
            | TypeKey::LongFromBits
            | TypeKey::LongFromString
            | TypeKey::LongFromNumber
            | TypeKey::LongFromInt => self.process_long(site)?,
            TypeKey::LongToString => self.process_long_to_string(site)?,
            TypeKey::Decimal128 | TypeKey::Decimal128FromString => self.process_decimal128(site)?,
            TypeKey::Date | TypeKey::IsoDate => self.process_date(site)?,
            TypeKey::ObjectIdCreateFromTime => self.process_create_from_time(site)?,
            TypeKey::BsonRegExp => self.process_bson_regex(site)?,
            TypeKey::RegExp => self.process_regexp(site)?,
            TypeKey::Number | TypeKey::Double | TypeKey::Int32 => self.process_number(site)?,
            _ => return Ok(None),
        };
        Ok(Some(rendered))
    }

    fn returns(&mut self, site: &CallSite<'_, '_>, key: Option<TypeKey>) -> TranspileResult<()> {
        let ty = match (key, site.desc.ret) {
            (Some(key), _) => self.type_of(key)?,
            (None, Some(ret)) => ret,
            (None, None) => self.type_of(TypeKey::Undefined)?,
        };
        self.set_type(site.call.id, ty);
        Ok(())
    }

    /// `Code(code[, scope])`
    ///
    /// A function argument is taken as source text. The scope is always rendered as a generic document.
    fn process_code(&mut self, site: &CallSite<'_, '_>) -> TranspileResult<String> {
        let [first, rest @ ..] = site.args else {
            return Err(TranspileError::Argument(
                "Argument count mismatch: Code requires one or two arguments".to_string(),
            ));
        };
        if rest.len() > 1 {
            return Err(TranspileError::Argument(
                "Argument count mismatch: Code requires one or two arguments".to_string(),
            ));
        }

        let code = match &first.unparenthesized().kind {
            ExprKind::Function | ExprKind::Lambda => escape_raw(self.text(first)),
            _ => {
                let slots = site.desc.args.first().map(|slot| vec![slot.clone()]).unwrap_or_default();
                self.check_arguments(&slots, &[*first], &site.desc.id)?
                    .into_iter()
                    .next()
                    .unwrap_or_default()
            }
        };

        let mut args = vec![code];
        if let Some(scope) = rest.first() {
            let idiomatic = std::mem::replace(&mut self.idiomatic, false);
            let rendered = self.visit(scope);
            self.idiomatic = idiomatic;
            let rendered = rendered?;
            if !self.descriptor(self.node_type(scope)?).is_key(TypeKey::Object) {
                return Err(TranspileError::Argument(
                    "Argument type mismatch: Code requires scope to be an object".to_string(),
                ));
            }
            self.imports.add(import_codes::CODE_WITH_SCOPE);
            self.imports.add(import_codes::OBJECT);
            args.push(rendered);
        }

        self.returns(site, None)?;
        self.generate_call(site, Args::positional(args.iter().map(String::as_str)), &args, None)
    }

    /// `ObjectId([hex])`: the argument is evaluated so every target sees a normalized hex string.
    fn process_object_id(&mut self, site: &CallSite<'_, '_>) -> TranspileResult<String> {
        self.returns(site, None)?;
        if site.args.is_empty() {
            return self.generate_call(site, Args::new(), &[], None);
        }
        self.check_arguments(&site.desc.args, site.args, &site.desc.id)?;
        let hex = match self.sandbox().call(site.callee, site.args, true)? {
            Value::ObjectId(bytes) => Value::object_id_hex(&bytes),
            other => return Err(unexpected(&site.desc.id, &other)),
        };
        let display = [strings::double_quote_stringify(&hex)];
        self.generate_call(site, Args::positional([hex.as_str()]), &display, None)
    }

    /// `Long.fromBits(lo, hi)`, `NumberLong(...)` and friends render their evaluated 64-bit value.
    fn process_long(&mut self, site: &CallSite<'_, '_>) -> TranspileResult<String> {
        self.check_arguments(&site.desc.args, site.args, &site.desc.id)?;
        let value = match self.sandbox().call(site.callee, site.args, true)? {
            Value::Int64(v) => v,
            Value::Int32(v) => i64::from(v),
            other => return Err(unexpected(&site.desc.id, &other)),
        };
        self.returns(site, None)?;
        let text = value.to_string();
        let long = self.type_of(TypeKey::Long)?;
        let args = Args::positional([text.as_str(), self.descriptor(long).id.as_str()]);
        self.generate_call(site, args, &[text.clone()], None)
    }

    /// `long.toString([radix])` becomes a string literal of the evaluated text.
    fn process_long_to_string(&mut self, site: &CallSite<'_, '_>) -> TranspileResult<String> {
        let numeric = self.descriptor(self.type_of(TypeKey::Numeric)?).id.clone();
        self.check_arguments(&[vec![Some(numeric), None]], site.args, "Long toString")?;
        let text = match self.sandbox().call(site.callee, site.args, false)? {
            Value::String(s) => s,
            other => return Err(unexpected("Long toString", &other)),
        };
        self.returns(site, Some(TypeKey::String))?;
        self.record(site.desc.code);
        self.render_string(&strings::single_quote_stringify(&text))
    }

    fn process_decimal128(&mut self, site: &CallSite<'_, '_>) -> TranspileResult<String> {
        self.check_arguments(&site.desc.args, site.args, &site.desc.id)?;
        let text = match self.sandbox().call(site.callee, site.args, true)? {
            Value::Decimal128(text) => text,
            other => return Err(unexpected(&site.desc.id, &other)),
        };
        self.returns(site, None)?;
        self.generate_call(site, Args::positional([text.as_str()]), &[text.clone()], None)
    }

    /// `Date(...)`, `new Date(...)`, `ISODate(...)`, `datetime.datetime(...)`.
    ///
    /// In the JavaScript dialects `Date()` without `new` is a string of the current time, whatever its arguments.
    fn process_date(&mut self, site: &CallSite<'_, '_>) -> TranspileResult<String> {
        let python = self.catalog.input() == LanguageId::Python;
        let as_string = site.desc.is_key(TypeKey::Date) && !site.was_new && !python;

        if !site.args.is_empty() {
            match self.check_arguments(&site.desc.args, site.args, &site.desc.id) {
                Err(err) if err.kind() == ErrorKind::Argument && !python => {
                    return Err(TranspileError::Argument(INVALID_DATE_ARGS.to_string()));
                }
                other => {
                    other?;
                }
            }
        }

        let date = if site.args.is_empty() || as_string {
            None
        } else {
            match self.sandbox().call(site.callee, site.args, true)? {
                Value::DateTime(date) => Some(date),
                other => return Err(unexpected(&site.desc.id, &other)),
            }
        };

        if as_string {
            self.imports.add(import_codes::DATE_STRING);
            self.returns(site, Some(TypeKey::String))?;
        } else {
            self.returns(site, Some(TypeKey::Date))?;
        }
        self.imports.add(import_codes::DATE);
        let arg = DateArg { date, as_string };
        self.generate_call(site, Args::new(), &[], Some(&arg))
    }

    /// `ObjectId.createFromTime(seconds | date)`
    fn process_create_from_time(&mut self, site: &CallSite<'_, '_>) -> TranspileResult<String> {
        let rendered = self.check_arguments(&site.desc.args, site.args, &site.desc.id)?;
        let [arg] = site.args else {
            return Err(TranspileError::Argument(format!(
                "Argument count mismatch: '{}' expects 1 args and got {}",
                site.desc.id,
                site.args.len()
            )));
        };
        let first = rendered.into_iter().next().unwrap_or_default();
        let is_date = self.descriptor(self.node_type(arg)?).is_key(TypeKey::Date);

        let args = if is_date {
            Args::positional([first.as_str(), "true"])
        } else {
            let seconds = self.sandbox().evaluate(arg)?;
            let seconds = seconds.as_f64().ok_or_else(|| unexpected(&site.desc.id, &seconds))?;
            let millis = (seconds * 1000.0).trunc() as i64;
            Args::positional([first.as_str(), ""]).with("ms", millis.to_string())
        };
        self.imports.add(import_codes::DATE);
        self.returns(site, None)?;
        self.generate_call(site, args, &[first.clone()], None)
    }

    /// `BSONRegExp(pattern[, flags])` with flags mapped through the target's BSON flag table.
    fn process_bson_regex(&mut self, site: &CallSite<'_, '_>) -> TranspileResult<String> {
        self.check_arguments(&site.desc.args, site.args, &site.desc.id)?;
        let (pattern, flags) = match self.sandbox().call(site.callee, site.args, true)? {
            Value::Regex { pattern, flags } => (pattern, flags),
            other => return Err(unexpected(&site.desc.id, &other)),
        };
        let flags = self.catalog.syntax.bson_regex_flags.translate(&flags)?;
        let pattern = pattern.replace('\\', "\\\\");
        self.returns(site, None)?;
        let display = [strings::single_quote_stringify(&pattern), strings::single_quote_stringify(&flags)];
        self.generate_call(site, Args::positional([pattern.as_str(), flags.as_str()]), &display, None)
    }

    /// `RegExp(pattern[, flags])` renders like a regex literal.
    fn process_regexp(&mut self, site: &CallSite<'_, '_>) -> TranspileResult<String> {
        self.check_arguments(&site.desc.args, site.args, &site.desc.id)?;
        let (pattern, flags) = match self.sandbox().call(site.callee, site.args, true)? {
            Value::Regex { pattern, flags } => (pattern, flags),
            other => return Err(unexpected(&site.desc.id, &other)),
        };
        let from_string = !site.args.first().is_some_and(|arg| {
            matches!(arg.unparenthesized().kind, ExprKind::Literal(Literal::Regex { .. }))
        });
        self.record(site.desc.code);
        self.render_regex(site.call.id, &pattern, &flags, from_string)
    }

    /// `Number(x)`, `Double(x)`, `Int32(x)`, `NumberInt(x)`.
    ///
    /// The argument's type before any cast is passed as `{1}` so a template can choose between a cast and a parse.
    fn process_number(&mut self, site: &CallSite<'_, '_>) -> TranspileResult<String> {
        let rendered = self.check_arguments(&site.desc.args, site.args, &site.desc.id)?;
        let number = site.desc.is_key(TypeKey::Number);
        self.returns(site, number.then_some(TypeKey::Decimal))?;

        let (value, origin) = match (rendered.into_iter().next(), site.args.first()) {
            (Some(value), Some(arg)) => {
                let typed = Self::typed_node(arg);
                let origin = match self.original(typed.id) {
                    Some(original) => original,
                    None => self.node_type(arg)?,
                };
                (value, self.descriptor(origin).id.clone())
            }
            _ => ("0".to_string(), self.descriptor(self.type_of(TypeKey::Integer)?).id.clone()),
        };
        let args = Args::positional([value.as_str(), origin.as_str()]);
        self.generate_call(site, args, &[value.clone()], None)
    }
}

fn unexpected(name: &str, value: &Value) -> TranspileError {
    TranspileError::Internal(format!("'{name}' evaluated to {}", value.type_name()))
}
