//! Datacenter lookups for GTM templates

use handlebars::{Handlebars, handlebars_helper};
use serde_json::Value;

use crate::template::helpers::{RootLookup, find_by_id, text};

/// Datacenters every GTM domain gets for free; they are never exported
pub const DEFAULT_DATACENTERS: [i64; 3] = [5400, 5401, 5402];

pub fn is_default_datacenter(id: &Value) -> bool {
    let id = text(id);
    DEFAULT_DATACENTERS.iter().any(|d| d.to_string() == id)
}

/// Resource name of the datacenter with `id`, empty when unknown
pub fn datacenter_name(root: &Value, id: &Value) -> String {
    root.get("datacenters")
        .and_then(|dcs| find_by_id(dcs, "datacenterId", id))
        .and_then(|dc| dc.get("resource_name"))
        .map(text)
        .unwrap_or_default()
}

/// HCL expression for a datacenter ID
///
/// Exported datacenters are referenced through their resource so Terraform
/// orders creation; default and unknown datacenters stay literal.
pub fn datacenter_ref(root: &Value, id: &Value) -> String {
    if is_default_datacenter(id) {
        return text(id);
    }
    match datacenter_name(root, id) {
        name if name.is_empty() => text(id),
        name => format!("akamai_gtm_datacenter.{}.datacenter_id", name),
    }
}

handlebars_helper!(IsDefaultDatacenterHelper: |id: Json| is_default_datacenter(id));

/// `datacenter_name` and `datacenter_ref` take only the ID; the datacenters
/// come from the root of the render data
pub fn register(hb: &mut Handlebars<'static>) {
    hb.register_helper("is_default_datacenter", Box::new(IsDefaultDatacenterHelper));
    hb.register_helper("datacenter_name", Box::new(RootLookup(datacenter_name)));
    hb.register_helper("datacenter_ref", Box::new(RootLookup(datacenter_ref)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn root() -> Value {
        json!({
            "datacenters": [
                {"datacenterId": 3131, "resource_name": "DC1"},
                {"datacenterId": 5400, "resource_name": "default_5400"}
            ]
        })
    }

    #[test]
    fn test_default_datacenters() {
        assert!(is_default_datacenter(&json!(5400)));
        assert!(is_default_datacenter(&json!("5402")));
        assert!(!is_default_datacenter(&json!(3131)));
    }

    #[test]
    fn test_datacenter_ref() {
        let root = root();
        assert_eq!(
            datacenter_ref(&root, &json!(3131)),
            "akamai_gtm_datacenter.DC1.datacenter_id"
        );
        assert_eq!(datacenter_ref(&root, &json!(5400)), "5400");
        assert_eq!(datacenter_ref(&root, &json!(9999)), "9999");
        assert_eq!(datacenter_name(&root, &json!(9999)), "");
        assert_eq!(datacenter_name(&json!({}), &json!(3131)), "");
    }

    #[test]
    fn test_datacenter_ref_inside_blocks() {
        let mut hb = Handlebars::new();
        hb.register_escape_fn(handlebars::no_escape);
        register(&mut hb);
        let mut data = root();
        data["properties"] = json!([{"targets": [{"datacenterId": 3131}, {"datacenterId": 5401}]}]);

        let out = hb
            .render_template(
                "{{#each properties}}{{#each targets}}{{datacenter_ref datacenterId}};{{/each}}{{/each}}",
                &data,
            )
            .unwrap();

        assert_eq!(out, "akamai_gtm_datacenter.DC1.datacenter_id;5401;");
    }
}
