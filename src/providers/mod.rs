//! One module per exported resource family
//!
//! Each family has an API trait implemented on [`EdgeGridClient`], a snapshot
//! builder that turns API responses into template data, and its own set of
//! embedded templates.
//!
//! [`EdgeGridClient`]: crate::edgegrid::EdgeGridClient

pub mod appsec;
pub mod cloudlets;
pub mod dns;
pub mod gtm;
pub mod property;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// Map each template to its output file under `work_dir`
pub fn target_map(work_dir: &Path, files: &[(&str, &str)]) -> IndexMap<String, PathBuf> {
    files
        .iter()
        .map(|(template, file)| (template.to_string(), work_dir.join(file)))
        .collect()
}

/// Deserialize `null` as the type's default value
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
