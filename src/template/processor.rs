use handlebars::Handlebars;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use super::COMMON_PARTIALS;
use super::helpers;
use crate::traits::FileSystem;

/// Failures while turning a data snapshot into files
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("invalid template '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: handlebars::TemplateError,
    },

    #[error("template '{0}' is not registered")]
    NotFound(String),

    #[error("failed to render template '{name}': {source}")]
    Render {
        name: String,
        #[source]
        source: handlebars::RenderError,
    },

    #[error("failed to serialize template data: {0}")]
    Data(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

/// Renders one data object into the files of a command
pub trait TemplateProcessor {
    fn process_templates(&self, data: &Value) -> Result<(), TemplateError>;
}

/// Serialize a snapshot into the JSON value templates render against
pub fn template_data<T: Serialize>(snapshot: &T) -> Result<Value, TemplateError> {
    Ok(serde_json::to_value(snapshot)?)
}

/// The templates, partials and extra helpers of one export family
pub struct TemplateSet {
    pub templates: &'static [(&'static str, &'static str)],
    pub partials: &'static [(&'static str, &'static str)],
    pub helpers: fn(&mut Handlebars<'static>),
}

/// Handlebars-backed processor writing through a [`FileSystem`]
///
/// Targets are processed in insertion order. A failure stops processing but
/// leaves earlier files in place.
pub struct FsTemplateProcessor {
    registry: Handlebars<'static>,
    targets: IndexMap<String, PathBuf>,
    fs: Arc<dyn FileSystem>,
}

impl FsTemplateProcessor {
    pub fn new(
        set: &TemplateSet,
        targets: IndexMap<String, PathBuf>,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        helpers::register(&mut registry);
        (set.helpers)(&mut registry);

        for (name, source) in COMMON_PARTIALS.iter().chain(set.partials) {
            registry
                .register_partial(name, *source)
                .map_err(|source| TemplateError::Parse {
                    name: name.to_string(),
                    source,
                })?;
        }
        for (name, source) in set.templates {
            registry
                .register_template_string(name, *source)
                .map_err(|source| TemplateError::Parse {
                    name: name.to_string(),
                    source,
                })?;
        }

        Ok(Self {
            registry,
            targets,
            fs,
        })
    }
}

impl TemplateProcessor for FsTemplateProcessor {
    fn process_templates(&self, data: &Value) -> Result<(), TemplateError> {
        for (name, path) in &self.targets {
            if !self.registry.has_template(name) {
                return Err(TemplateError::NotFound(name.clone()));
            }

            let rendered = self
                .registry
                .render(name, data)
                .map_err(|source| TemplateError::Render {
                    name: name.clone(),
                    source,
                })?;

            self.fs
                .write(path, &rendered)
                .map_err(|source| TemplateError::Write {
                    path: path.clone(),
                    source,
                })?;
            tracing::debug!(template = %name, path = %path.display(), "rendered");
        }

        Ok(())
    }
}
