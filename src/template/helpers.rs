//! Handlebars helpers shared by every export family
//!
//! Helpers take JSON arguments, so a missing field renders as an empty string
//! instead of failing the whole file.

use handlebars::{
    Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, ScopedJson,
    handlebars_helper,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref INVALID_NAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_-]").unwrap();
}

/// Textual form of a JSON scalar; `null` becomes empty
pub fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Turn an arbitrary display name into a valid Terraform resource name
///
/// Applying it twice yields the same result as applying it once.
pub fn escape_name(name: &str) -> String {
    let replaced = INVALID_NAME_CHARS.replace_all(name, "_");
    match replaced.chars().next() {
        None => "_".to_string(),
        Some(c) if c.is_ascii_digit() || c == '-' => format!("_{}", replaced),
        Some(_) => replaced.into_owned(),
    }
}

/// Escape a value for use inside an HCL double-quoted string
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    escape_interpolation(&out)
}

/// Neutralise `${` and `%{` sequences so HCL keeps them literal
pub fn escape_interpolation(value: &str) -> String {
    value.replace("${", "$${").replace("%{", "%%{")
}

/// Quote a word for a POSIX shell
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Render a JSON array as an HCL list literal
pub fn list(value: &Value) -> String {
    let items: Vec<String> = match value {
        Value::Array(items) => items.iter().map(list_item).collect(),
        Value::Null => Vec::new(),
        single => vec![list_item(single)],
    };
    format!("[{}]", items.join(", "))
}

fn list_item(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", escape(s)),
        other => other.to_string(),
    }
}

/// First element of `collection` whose `field` has the same textual form as `id`
pub fn find_by_id<'a>(collection: &'a Value, field: &str, id: &Value) -> Option<&'a Value> {
    let wanted = text(id);
    collection
        .as_array()?
        .iter()
        .find(|item| item.get(field).map(text).as_deref() == Some(wanted.as_str()))
}

handlebars_helper!(EscapeNameHelper: |v: Json| escape_name(&text(v)));
handlebars_helper!(EscapeHelper: |v: Json| escape(&text(v)));
handlebars_helper!(EscapeInterpolationHelper: |v: Json| escape_interpolation(&text(v)));
handlebars_helper!(ShellQuoteHelper: |v: Json| shell_quote(&text(v)));
handlebars_helper!(JsonHelper: |v: Json| v.to_string());
handlebars_helper!(ListHelper: |v: Json| list(v));
handlebars_helper!(LowerHelper: |v: Json| text(v).to_lowercase());
handlebars_helper!(FindByIdHelper: |collection: Json, field: str, id: Json| {
    find_by_id(collection, field, id).cloned().unwrap_or(Value::Null)
});

/// Helper resolving its single ID argument against the root of the data being
/// rendered, so cross-references work inside any `#each`/`#with` block
pub struct RootLookup<T>(pub fn(&Value, &Value) -> T);

impl<T: Into<Value>> HelperDef for RootLookup<T> {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let id = h.param(0).map(|p| p.value().clone()).unwrap_or(Value::Null);
        Ok(ScopedJson::Derived((self.0)(ctx.data(), &id).into()))
    }
}

/// Register the shared helpers on a registry
pub fn register(hb: &mut Handlebars<'static>) {
    hb.register_helper("escape_name", Box::new(EscapeNameHelper));
    hb.register_helper("escape", Box::new(EscapeHelper));
    hb.register_helper("escape_interpolation", Box::new(EscapeInterpolationHelper));
    hb.register_helper("shell_quote", Box::new(ShellQuoteHelper));
    hb.register_helper("json", Box::new(JsonHelper));
    hb.register_helper("list", Box::new(ListHelper));
    hb.register_helper("lower", Box::new(LowerHelper));
    hb.register_helper("find_by_id", Box::new(FindByIdHelper));
}
