pub mod helpers;
pub mod processor;

pub use processor::{
    FsTemplateProcessor, TemplateError, TemplateProcessor, TemplateSet, template_data,
};

/// Partials shared by every template set
pub const COMMON_PARTIALS: &[(&str, &str)] = &[
    ("provider", include_str!("partials/provider.hbs")),
    ("common_variables", include_str!("partials/common_variables.hbs")),
    ("import_statements", include_str!("partials/import_statements.hbs")),
];
