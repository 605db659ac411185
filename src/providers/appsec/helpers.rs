//! Cross-reference lookups over the appsec snapshot
//!
//! Each takes the snapshot root and an ID. A dangling ID yields an empty
//! string (or `false`) so one bad reference never aborts the whole render.
//! Templates pass only the ID: `{{rule_name id}}`.

use handlebars::Handlebars;
use serde_json::Value;

use crate::template::helpers::{RootLookup, find_by_id, text};

fn field_of(root: &Value, collection: &str, id: &Value, field: &str) -> Option<Value> {
    find_by_id(root.get(collection)?, "id", id)?.get(field).cloned()
}

/// Title of a WAF rule, on one line so it can sit in an HCL comment
pub fn rule_name(root: &Value, id: &Value) -> String {
    field_of(root, "rules", id, "title")
        .map(|v| text(&v).replace("\r\n", " ").replace(['\r', '\n'], " "))
        .unwrap_or_default()
}

/// Resource name of a custom rule
pub fn custom_rule_name(root: &Value, id: &Value) -> String {
    field_of(root, "custom_rules", id, "resource_name")
        .map(|v| text(&v))
        .unwrap_or_default()
}

/// Resource name of a rate policy
pub fn rate_policy_name(root: &Value, id: &Value) -> String {
    field_of(root, "rate_policies", id, "resource_name")
        .map(|v| text(&v))
        .unwrap_or_default()
}

/// Resource name of a malware policy
pub fn malware_policy_name(root: &Value, id: &Value) -> String {
    field_of(root, "malware_policies", id, "resource_name")
        .map(|v| text(&v))
        .unwrap_or_default()
}

/// Whether a custom rule was built with the structured editor
pub fn is_structured_rule(root: &Value, id: &Value) -> bool {
    field_of(root, "custom_rules", id, "structured")
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

pub fn register(hb: &mut Handlebars<'static>) {
    hb.register_helper("rule_name", Box::new(RootLookup(rule_name)));
    hb.register_helper("custom_rule_name", Box::new(RootLookup(custom_rule_name)));
    hb.register_helper("rate_policy_name", Box::new(RootLookup(rate_policy_name)));
    hb.register_helper("malware_policy_name", Box::new(RootLookup(malware_policy_name)));
    hb.register_helper("is_structured_rule", Box::new(RootLookup(is_structured_rule)));
}
